//! Structural validation of warps and brands.

use crate::error::ValidationError;
use url::Url;
use warps_types::{
    ActionKind, Brand, CollectAction, ContractAction, InputPosition, InputSource, LinkAction,
    QueryAction, Warp, WarpAction, WarpActionInput, METHOD_GET, METHOD_POST,
};

type Result<T> = std::result::Result<T, ValidationError>;

/// Checks that a warp is well formed before it is built, inscribed or
/// returned to a caller.
///
/// Validation is purely structural: nothing is fetched and no JSON schema is
/// evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarpValidator;

impl WarpValidator {
    pub fn new() -> Self {
        Self
    }

    /// Fails fast on the first violation, reporting action and input indices.
    pub fn validate(&self, warp: &Warp) -> Result<()> {
        require(&warp.protocol, "protocol")?;
        require(&warp.name, "name")?;
        require(&warp.title, "title")?;
        if warp.actions.is_empty() {
            return Err(ValidationError::NoActions);
        }

        for (index, action) in warp.actions.iter().enumerate() {
            validate_action(action).map_err(|err| ValidationError::at_action(index, err))?;
        }
        Ok(())
    }

    pub fn validate_brand(&self, brand: &Brand) -> Result<()> {
        require(&brand.protocol, "brand protocol")?;
        require(&brand.name, "brand name")?;
        require(&brand.description, "brand description")?;
        require(&brand.logo, "brand logo")?;
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn validate_action(action: &WarpAction) -> Result<()> {
    require(&action.label, "action label")?;

    match &action.kind {
        ActionKind::Transfer(_) => {}
        ActionKind::Contract(contract) => validate_contract(contract)?,
        ActionKind::Query(query) => validate_query(query)?,
        ActionKind::Collect(collect) => validate_collect(collect)?,
        ActionKind::Link(link) => validate_link(link)?,
    }

    for (index, input) in action.inputs.iter().enumerate() {
        validate_input(input).map_err(|err| ValidationError::at_input(index, err))?;
    }
    Ok(())
}

fn validate_contract(action: &ContractAction) -> Result<()> {
    require(&action.address, "contract address")
}

fn validate_query(action: &QueryAction) -> Result<()> {
    require(&action.address, "query address")?;
    require(&action.func, "query function")
}

fn validate_collect(action: &CollectAction) -> Result<()> {
    let destination = &action.destination;
    require(&destination.url, "destination URL")?;
    parse_url(&destination.url, "destination URL")?;

    match destination.method.as_str() {
        METHOD_GET | METHOD_POST => Ok(()),
        other => Err(ValidationError::UnsupportedMethod(other.to_string())),
    }
}

fn validate_link(action: &LinkAction) -> Result<()> {
    require(&action.url, "URL")?;
    parse_url(&action.url, "URL")
}

fn parse_url(url: &str, field: &'static str) -> Result<()> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidUrl {
            field,
            url: url.to_string(),
        })
}

fn validate_input(input: &WarpActionInput) -> Result<()> {
    require(&input.name, "input name")?;
    require(&input.input_type, "input type")?;
    require(&input.position, "input position")?;
    require(&input.source, "input source")?;

    input
        .source
        .parse::<InputSource>()
        .map_err(|_| ValidationError::InvalidSource(input.source.clone()))?;
    input
        .position
        .parse::<InputPosition>()
        .map_err(|_| ValidationError::InvalidPosition(input.position.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warps_types::{CollectDestination, TransferAction};

    fn warp_with(actions: Vec<WarpAction>) -> Warp {
        Warp {
            protocol: "warp-0.0.2".into(),
            name: "n".into(),
            title: "t".into(),
            actions,
            ..Default::default()
        }
    }

    fn link(url: &str) -> WarpAction {
        WarpAction::new("Open", ActionKind::Link(LinkAction { url: url.into() }))
    }

    fn input_at(position: &str) -> WarpActionInput {
        WarpActionInput {
            name: "amount".into(),
            input_type: "biguint".into(),
            position: position.into(),
            source: "field".into(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_warp() {
        let warp = warp_with(vec![link("https://docs.example")]);
        assert_eq!(WarpValidator::new().validate(&warp), Ok(()));
    }

    #[test]
    fn requires_header_fields_and_actions() {
        let validator = WarpValidator::new();

        let mut warp = warp_with(vec![link("https://docs.example")]);
        warp.name.clear();
        assert_eq!(
            validator.validate(&warp),
            Err(ValidationError::required("name"))
        );

        let warp = warp_with(vec![]);
        assert_eq!(validator.validate(&warp), Err(ValidationError::NoActions));
    }

    #[test]
    fn contract_without_address_reports_index() {
        let action: WarpAction =
            serde_json::from_value(json!({"type": "contract", "label": "l"})).unwrap();
        let warp = warp_with(vec![link("https://docs.example"), action]);

        let err = WarpValidator::new().validate(&warp).unwrap_err();
        assert_eq!(
            err,
            ValidationError::at_action(1, ValidationError::required("contract address"))
        );
        assert!(err.to_string().ends_with("contract address is required"));
    }

    #[test]
    fn query_requires_function() {
        let action = WarpAction::new(
            "Balance",
            ActionKind::Query(QueryAction {
                address: "erd1contract".into(),
                ..Default::default()
            }),
        );
        let err = WarpValidator::new()
            .validate(&warp_with(vec![action]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::at_action(0, ValidationError::required("query function"))
        );
    }

    #[test]
    fn collect_checks_url_and_method() {
        let collect = |url: &str, method: &str| {
            warp_with(vec![WarpAction::new(
                "Send",
                ActionKind::Collect(CollectAction {
                    destination: CollectDestination {
                        url: url.into(),
                        method: method.into(),
                        ..Default::default()
                    },
                }),
            )])
        };
        let validator = WarpValidator::new();

        assert_eq!(validator.validate(&collect("https://hook.example", "POST")), Ok(()));
        assert!(matches!(
            validator.validate(&collect("https://hook.example", "PUT")),
            Err(ValidationError::Action { source, .. })
                if *source == ValidationError::UnsupportedMethod("PUT".into())
        ));
        assert!(matches!(
            validator.validate(&collect("not a url", "GET")),
            Err(ValidationError::Action { source, .. })
                if matches!(*source, ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn empty_label_is_rejected() {
        let action = WarpAction::new("", ActionKind::Transfer(TransferAction::default()));
        let err = WarpValidator::new()
            .validate(&warp_with(vec![action]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::at_action(0, ValidationError::required("action label"))
        );
    }

    #[test]
    fn input_positions_must_be_one_based() {
        let validator = WarpValidator::new();

        let ok = warp_with(vec![link("https://docs.example").with_input(input_at("arg:1"))]);
        assert_eq!(validator.validate(&ok), Ok(()));

        let bad = warp_with(vec![link("https://docs.example").with_input(input_at("arg:0"))]);
        assert_eq!(
            validator.validate(&bad),
            Err(ValidationError::at_action(
                0,
                ValidationError::at_input(0, ValidationError::InvalidPosition("arg:0".into()))
            ))
        );
    }

    #[test]
    fn input_fields_are_required() {
        let validator = WarpValidator::new();
        let cases: [(fn(&mut WarpActionInput), &'static str); 3] = [
            (|input| input.name.clear(), "input name"),
            (|input| input.input_type.clear(), "input type"),
            (|input| input.source.clear(), "input source"),
        ];

        for (blank, field) in cases {
            let mut input = input_at("arg:1");
            blank(&mut input);
            let warp = warp_with(vec![link("https://docs.example").with_input(input)]);
            assert_eq!(
                validator.validate(&warp),
                Err(ValidationError::at_action(
                    0,
                    ValidationError::at_input(0, ValidationError::Required { field })
                )),
                "{field}"
            );
        }
    }

    #[test]
    fn link_url_must_parse() {
        let err = WarpValidator::new()
            .validate(&warp_with(vec![link("docs.example/no-scheme")]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::at_action(
                0,
                ValidationError::InvalidUrl {
                    field: "URL",
                    url: "docs.example/no-scheme".into(),
                }
            )
        );
    }

    #[test]
    fn input_source_must_be_known() {
        let mut input = input_at("receiver");
        input.source = "header".into();
        let warp = warp_with(vec![link("https://docs.example").with_input(input)]);
        assert_eq!(
            WarpValidator::new().validate(&warp),
            Err(ValidationError::at_action(
                0,
                ValidationError::at_input(0, ValidationError::InvalidSource("header".into()))
            ))
        );
    }

    #[test]
    fn brand_requires_every_descriptive_field() {
        let validator = WarpValidator::new();
        let mut brand = Brand {
            protocol: "brand-0.0.2".into(),
            name: "Acme".into(),
            description: "Tools".into(),
            logo: "https://acme.example/logo.png".into(),
            ..Default::default()
        };
        assert_eq!(validator.validate_brand(&brand), Ok(()));

        brand.logo.clear();
        assert_eq!(
            validator.validate_brand(&brand),
            Err(ValidationError::required("brand logo"))
        );
    }
}
