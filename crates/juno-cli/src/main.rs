//! `juno` - control an Atlona Juno 451 HDMI matrix from the command line.
//!
//! ```text
//! juno --host 192.168.1.50 --username admin --password Atlona power
//! juno --config juno.yaml power on
//! juno --config juno.yaml source 3
//! juno --config juno.yaml inputs
//! juno --config juno.yaml raw Version
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use juno_client::protocol::PowerState;
use juno_client::{duration_from_secs, Juno451, SessionConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "juno", version, about = "Control an Atlona Juno 451 HDMI matrix")]
struct Cli {
    /// YAML file with host, port, username, password, timeout_secs, settle_delay_secs, debug.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hostname or IP address of the matrix.
    #[arg(long, global = true, env = "JUNO_HOST")]
    host: Option<String>,

    /// Telnet port.
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Console username.
    #[arg(short, long, global = true, env = "JUNO_USERNAME")]
    username: Option<String>,

    /// Console password.
    #[arg(short, long, global = true, env = "JUNO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-read timeout in seconds.
    #[arg(short, long, global = true)]
    timeout: Option<f64>,

    /// Trace every byte exchanged with the matrix.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the power state, or switch it with `on` / `off`.
    Power {
        /// `on` or `off`.
        state: Option<String>,
    },
    /// Show which inputs have a signal.
    Inputs,
    /// Show the routed input, or route input 1-4 to the output.
    Source {
        /// Input number.
        input: Option<u8>,
    },
    /// Send a raw console command and print the result line.
    Raw {
        /// Command text, e.g. `Version`.
        command: String,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let host = cli.host.clone().context("--host or --config is required")?;
            let username = cli.username.clone().context("--username or --config is required")?;
            let password = cli.password.clone().context("--password or --config is required")?;
            SessionConfig::new(host, username, password)
        }
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = duration_from_secs("--timeout", timeout, false)?;
    }
    config.debug |= cli.debug;

    config.validate()?;

    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    debug!("using {:?}", config);
    let juno = Juno451::new(config);

    match cli.command {
        Commands::Power { state: None } => {
            println!("{}", juno.get_power_state()?);
        }
        Commands::Power { state: Some(state) } => {
            let state: PowerState = state.parse()?;
            println!("{}", juno.set_power_state(state)?);
        }
        Commands::Inputs => {
            let status = juno.get_input_status()?;
            for (i, connected) in status.as_slice().iter().enumerate() {
                println!("input {}: {}", i + 1, if *connected { "connected" } else { "no signal" });
            }
        }
        Commands::Source { input: None } => {
            println!("{}", juno.get_source()?);
        }
        Commands::Source { input: Some(input) } => {
            println!("{}", juno.set_source(input)?);
        }
        Commands::Raw { command } => {
            println!("{}", juno.command(&command)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    run(cli)
}
