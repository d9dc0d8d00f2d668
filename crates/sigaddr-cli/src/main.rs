use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{CliConfig, DumpArgs};

#[derive(Parser)]
#[command(name = "sigaddr")]
#[command(about = "Compile, scan and resolve byte signatures against memory dumps")]
struct Args {
    /// Optional TOML file with defaults for dump, base and module
    #[arg(short, long, default_value = "sigaddr.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the padded signature and its chunk values and masks
    Compile {
        /// Signature text, e.g. "48 8B 05 ?? ?? ?? ??"
        signature: String,
    },
    /// List every match of a signature
    Scan {
        #[command(flatten)]
        dump: DumpArgs,

        signature: String,

        /// Stop listing after this many matches
        #[arg(long, default_value_t = 32)]
        max: usize,
    },
    /// Resolve every descriptor in a descriptor file
    Resolve {
        #[command(flatten)]
        dump: DumpArgs,

        /// JSON descriptor file
        #[arg(short, long)]
        descriptors: PathBuf,

        /// Also write a JSON resolution dump here
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print raw bytes at an address
    Hexdump {
        #[command(flatten)]
        dump: DumpArgs,

        /// Address (hex, 0x prefix optional)
        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value_t = 256)]
        size: usize,

        /// Show ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sigaddr=info".parse()?))
        .init();

    let args = Args::parse();
    let config = CliConfig::load_or_default(&args.config);
    debug!("Using config {:?}", config);

    match args.command {
        Command::Compile { signature } => commands::compile::run(&signature),
        Command::Scan {
            dump,
            signature,
            max,
        } => commands::scan::run(&dump.settings(&config)?, &signature, max),
        Command::Resolve {
            dump,
            descriptors,
            json,
        } => commands::resolve::run(&dump.settings(&config)?, &descriptors, json.as_deref()),
        Command::Hexdump {
            dump,
            address,
            size,
            ascii,
        } => {
            let address = commands::hex_utils::parse_hex_address(&address)?;
            commands::hexdump::run(&dump.settings(&config)?, address, size, ascii)
        }
    }
}
