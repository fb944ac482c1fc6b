//! Warps Command Line Interface
//!
//! Build links and QR codes, resolve warps, scan pages and prepare
//! inscriptions from the terminal.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use warps_sdk::types::{ChainEnv, Identifier};
use warps_sdk::{WarpConfig, WarpSdk};

#[derive(Parser)]
#[command(name = "warps")]
#[command(about = "Warps Command Line Interface", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file (TOML, JSON or YAML); WARP_* variables override it
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Chain environment (mainnet, testnet, devnet)
    #[arg(long)]
    env: Option<ChainEnv>,
    /// Client base URL used when building links
    #[arg(long)]
    client_url: Option<String>,
    /// Chain API URL
    #[arg(long)]
    chain_api_url: Option<String>,
    /// Cache TTL in seconds (0 disables caching)
    #[arg(long)]
    cache_ttl: Option<u64>,
    /// Address used as sender of prepared transactions
    #[arg(long)]
    user_address: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Info,
    /// Build the canonical URL for an identifier (hash:<id>, alias:<id> or bare)
    Link {
        identifier: String,
    },
    /// Render the canonical URL of an identifier as an SVG QR code
    Qr {
        identifier: String,
        /// Edge length in pixels
        #[arg(long, default_value_t = 256)]
        size: u32,
        /// Write the SVG here instead of stdout
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Resolve a warp URL or identifier
    Detect {
        input: String,
    },
    /// Find and resolve every warp link in an HTML document ("-" reads stdin)
    Scan {
        file: PathBuf,
    },
    /// Search the warp index
    Search {
        query: String,
    },
    /// Validate a warp JSON document
    Validate {
        file: PathBuf,
    },
    /// Prepare an unsigned inscription transaction for a warp JSON document
    Inscribe {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    let sdk = WarpSdk::new(config).context("failed to initialise warps client")?;

    let outcome = run(&sdk, cli.command).await;
    sdk.shutdown().await;
    outcome
}

fn load_config(args: &GlobalArgs) -> Result<WarpConfig> {
    let config = WarpConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    Ok(apply_overrides(config, args))
}

/// Command-line flags win over file and environment settings.
fn apply_overrides(mut config: WarpConfig, args: &GlobalArgs) -> WarpConfig {
    if let Some(env) = args.env {
        config.env = env;
    }
    if let Some(url) = &args.client_url {
        config.client_url = Some(url.clone());
    }
    if let Some(url) = &args.chain_api_url {
        config.chain_api_url = Some(url.clone());
    }
    if let Some(ttl) = args.cache_ttl {
        config.cache_ttl = ttl;
    }
    if let Some(address) = &args.user_address {
        config.user_address = Some(address.clone());
    }
    config
}

async fn run(sdk: &WarpSdk, command: Commands) -> Result<()> {
    match command {
        Commands::Info => print_json(&EffectiveConfig::from(sdk.config())),
        Commands::Link { identifier } => {
            let id = parse_identifier(&identifier)?;
            println!("{}", sdk.link().build(id.kind, &id.value));
            Ok(())
        }
        Commands::Qr {
            identifier,
            size,
            output,
        } => {
            let id = parse_identifier(&identifier)?;
            let svg = sdk.link().generate_qr_code(id.kind, &id.value, size)?;
            match output {
                Some(path) => {
                    fs::write(&path, svg)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("QR code written to {}", path.display());
                }
                None => println!("{svg}"),
            }
            Ok(())
        }
        Commands::Detect { input } => {
            let result = sdk.link().detect(&input).await?;
            if !result.matched {
                bail!("no warp found for {input}");
            }
            print_json(&result)
        }
        Commands::Scan { file } => {
            let content = read_input(&file)?;
            print_json(&sdk.link().detect_from_html(&content).await)
        }
        Commands::Search { query } => print_json(&sdk.registry().search(&query).await?),
        Commands::Validate { file } => {
            let raw = read_input(&file)?;
            let warp = sdk.builder().create_from_raw(&raw, true)?;
            println!("{} is a valid warp ({} actions)", warp.name, warp.actions.len());
            Ok(())
        }
        Commands::Inscribe { file } => {
            let raw = read_input(&file)?;
            let builder = sdk.builder();
            let warp = builder.create_from_raw(&raw, true)?;
            print_json(&builder.create_inscription_transaction(&warp)?)
        }
    }
}

fn parse_identifier(token: &str) -> Result<Identifier> {
    Identifier::classify(token).with_context(|| format!("not a warp identifier: {token}"))
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Configuration with every default resolved, as printed by `info`.
#[derive(Serialize)]
struct EffectiveConfig<'a> {
    env: ChainEnv,
    chain_id: &'a str,
    client_url: &'a str,
    chain_api_url: &'a str,
    registry_contract: &'a str,
    index_url: &'a str,
    index_search_param_name: &'a str,
    cache_ttl: u64,
    user_address: Option<&'a str>,
}

impl<'a> From<&'a WarpConfig> for EffectiveConfig<'a> {
    fn from(config: &'a WarpConfig) -> Self {
        Self {
            env: config.env,
            chain_id: config.env.chain_id(),
            client_url: config.client_url(),
            chain_api_url: config.chain_api_url(),
            registry_contract: config.registry_contract(),
            index_url: config.index_url(),
            index_search_param_name: config.index_search_param_name(),
            cache_ttl: config.cache_ttl,
            user_address: config.user_address(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_loaded_config() {
        let cli = Cli::parse_from([
            "warps",
            "--env",
            "devnet",
            "--cache-ttl",
            "5",
            "--user-address",
            "erd1me",
            "info",
        ]);
        let loaded = WarpConfig::mainnet().with_client_url("https://from-file.example");
        let config = apply_overrides(loaded, &cli.global);
        assert_eq!(config.env, ChainEnv::Devnet);
        assert_eq!(config.cache_ttl, 5);
        assert_eq!(config.user_address(), Some("erd1me"));
        assert_eq!(config.client_url(), "https://from-file.example");
    }

    #[test]
    fn absent_flags_keep_loaded_values() {
        let cli = Cli::parse_from(["warps", "info"]);
        let loaded = WarpConfig::testnet()
            .with_user_address("erd1file")
            .with_chain_api_url("https://api.from-file.example");
        let config = apply_overrides(loaded, &cli.global);
        assert_eq!(config.env, ChainEnv::Testnet);
        assert_eq!(config.user_address(), Some("erd1file"));
        assert_eq!(config.chain_api_url(), "https://api.from-file.example");
        assert_eq!(config.cache_ttl, 3600);
    }

    #[test]
    fn identifiers_must_classify() {
        assert!(parse_identifier("hash:abc").is_ok());
        assert!(parse_identifier("a b").is_err());
    }
}
