use thiserror::Error;

/// Structural rule a warp, action, input or brand violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("at least one action is required")]
    NoActions,

    #[error("invalid action at index {index}: {source}")]
    Action {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },

    #[error("invalid input at index {index}: {source}")]
    Input {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },

    #[error("invalid {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid input source: {0}")]
    InvalidSource(String),

    #[error("invalid input position: {0}")]
    InvalidPosition(String),
}

impl ValidationError {
    pub(crate) fn required(field: &'static str) -> Self {
        ValidationError::Required { field }
    }

    pub(crate) fn at_action(index: usize, source: ValidationError) -> Self {
        ValidationError::Action {
            index,
            source: Box::new(source),
        }
    }

    pub(crate) fn at_input(index: usize, source: ValidationError) -> Self {
        ValidationError::Input {
            index,
            source: Box::new(source),
        }
    }
}

/// Errors surfaced by the warps client.
#[derive(Debug, Error)]
pub enum WarpError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("remote error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Remote { status: Option<u16>, message: String },

    #[error("config error: {0}")]
    Config(String),
}

impl WarpError {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        WarpError::Decode(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        WarpError::Config(msg.into())
    }

    pub(crate) fn remote_status(status: u16, message: impl Into<String>) -> Self {
        WarpError::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WarpError::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, WarpError::Remote { .. })
    }
}

impl From<serde_json::Error> for WarpError {
    fn from(err: serde_json::Error) -> Self {
        WarpError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for WarpError {
    fn from(err: reqwest::Error) -> Self {
        WarpError::Remote {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for WarpError {
    fn from(err: url::ParseError) -> Self {
        WarpError::Config(format!("invalid url: {err}"))
    }
}

impl From<config::ConfigError> for WarpError {
    fn from(err: config::ConfigError) -> Self {
        WarpError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WarpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_validation_messages_carry_indices() {
        let err = ValidationError::at_action(
            2,
            ValidationError::at_input(0, ValidationError::InvalidPosition("arg:0".into())),
        );
        assert_eq!(
            err.to_string(),
            "invalid action at index 2: invalid input at index 0: invalid input position: arg:0"
        );
    }

    #[test]
    fn remote_errors_mention_status_when_known() {
        let err = WarpError::remote_status(404, "not found");
        assert_eq!(err.to_string(), "remote error (status 404): not found");

        let err = WarpError::Remote {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "remote error: connection refused");
    }
}
