use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use wizard_core::common::CommonOptions;
use wizard_core::{
    build_generic, print_contract, source_hash, Access, Erc20Options, Error, GenericOptions,
    Info, PrintOptions,
};

/// Cairo Wizard - generate StarkNet Cairo contracts from options
#[derive(Parser)]
#[command(name = "wizard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an ERC20 token from command-line flags
    Erc20 {
        #[command(flatten)]
        token: Erc20Flags,
        /// Print the contract model as JSON instead of Cairo
        #[arg(long)]
        json: bool,
    },

    /// Generate a contract from a JSON options file
    Generate {
        /// Path to options .json file (tagged by "kind")
        file: PathBuf,
        /// Print the contract model as JSON instead of Cairo
        #[arg(long)]
        json: bool,
    },

    /// Compute the SHA-256 of the Cairo source generated from an options file
    Hash {
        /// Path to options .json file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct Erc20Flags {
    /// Token name
    #[arg(long, default_value = "MyToken")]
    name: String,
    /// Token symbol
    #[arg(long, default_value = "MTK")]
    symbol: String,
    /// Decimal places
    #[arg(long, default_value_t = 18)]
    decimals: u8,
    /// Holders can destroy their tokens
    #[arg(long)]
    burnable: bool,
    /// Privileged account can take balance snapshots
    #[arg(long)]
    snapshots: bool,
    /// Privileged account can pause transfers
    #[arg(long)]
    pausable: bool,
    /// Privileged account can mint new tokens
    #[arg(long)]
    mintable: bool,
    /// Gasless approvals through signed messages
    #[arg(long)]
    permit: bool,
    /// Delegated voting power (requires --permit)
    #[arg(long)]
    votes: bool,
    /// Flash loans of the token
    #[arg(long)]
    flashmint: bool,
    /// Access control mode: ownable or roles
    #[arg(long, default_value_t = Access::Ownable)]
    access: Access,
    /// Deploy behind a proxy
    #[arg(long)]
    upgradeable: bool,
    /// Security contact recorded as a natspec tag
    #[arg(long, default_value = "")]
    security_contact: String,
    /// SPDX license identifier
    #[arg(long, default_value = "MIT")]
    license: String,
}

impl From<Erc20Flags> for Erc20Options {
    fn from(f: Erc20Flags) -> Self {
        Erc20Options {
            name: f.name,
            symbol: f.symbol,
            decimals: f.decimals,
            burnable: f.burnable,
            snapshots: f.snapshots,
            pausable: f.pausable,
            mintable: f.mintable,
            permit: f.permit,
            votes: f.votes,
            flashmint: f.flashmint,
            common: CommonOptions {
                access: f.access,
                upgradeable: f.upgradeable,
                info: Info {
                    security_contact: f.security_contact,
                    license: f.license,
                },
            },
        }
    }
}

/// Failure of a command, mapped to the process exit code
enum CliError {
    /// Invalid options (exit 1)
    Invalid(String),
    /// File could not be read (exit 2)
    Io(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Invalid(_) => 1,
            CliError::Io(_) => 2,
        }
    }
}

impl From<Error> for CliError {
    fn from(e: Error) -> Self {
        CliError::Invalid(e.to_string())
    }
}

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Erc20 { token, json } => {
            emit(&GenericOptions::Erc20(token.into()), json)
        }
        Commands::Generate { file, json } => {
            read_options(&file).and_then(|opts| emit(&opts, json))
        }
        Commands::Hash { file } => read_options(&file).and_then(|opts| {
            let contract = build_generic(&opts)?;
            let source = print_contract(&contract, &PrintOptions::default())?;
            println!("{}", source_hash(&source));
            Ok(())
        }),
        Commands::Version => {
            println!(
                "wizard {} (wizard-core {})",
                env!("CARGO_PKG_VERSION"),
                wizard_core::VERSION
            );
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            let msg = match &e {
                CliError::Invalid(m) | CliError::Io(m) => m,
            };
            eprintln!("{} {}", "error:".red().bold(), msg);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

fn read_options(path: &Path) -> Result<GenericOptions, CliError> {
    tracing::debug!(path = %path.display(), "reading options");
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Invalid(format!("{}: {}", path.display(), e)))
}

fn emit(opts: &GenericOptions, json: bool) -> Result<(), CliError> {
    let contract = build_generic(opts)?;
    if json {
        let out = serde_json::to_string_pretty(&contract)
            .map_err(|e| CliError::Invalid(e.to_string()))?;
        println!("{}", out);
    } else {
        print!("{}", print_contract(&contract, &PrintOptions::default())?);
    }
    Ok(())
}
