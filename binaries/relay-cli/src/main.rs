//! Relay CLI - drive ROS nodes through a relay server.
//!
//! Each invocation opens one session against the relay, performs a single
//! grouped operation and prints the merged result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Ask the relay which protocol version it speaks
//! relay-cli --host 192.168.122.125 version
//!
//! # Start nodes and read observations
//! relay-cli start camera_node lidar_node odom_node
//! relay-cli observe odom_pose lidar_angles lidar_vector
//!
//! # Reset with keyword arguments
//! relay-cli reset --set 'unity_system_argument={"isRandom":true,"rackNum":2}'
//! ```

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use relay_env::{RelayEnvironment, VERSION};
use relay_transport::{Map, Value};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI arguments for the relay controller.
#[derive(Parser, Debug)]
#[command(
    name = "relay-cli",
    about = "Start, reset and observe ROS nodes through a relay server",
    version,
    author
)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Relay host.
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Relay port.
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Enable JSON log output.
    #[arg(long)]
    json_logs: bool,

    /// Fail when any node gives no answer.
    #[arg(long)]
    strict: bool,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the relay for its protocol version.
    Version,

    /// Start nodes by name.
    Start {
        #[arg(value_name = "NODE")]
        nodes: Vec<String>,
    },

    /// Stop nodes by name.
    Stop {
        #[arg(value_name = "NODE")]
        nodes: Vec<String>,
    },

    /// Reset the nodes owning the given keys.
    Reset {
        #[arg(value_name = "KEY")]
        keys: Vec<String>,

        /// Keyword argument as KEY=JSON; repeatable.
        #[arg(long = "set", value_name = "KEY=JSON", value_parser = parse_assignment)]
        kwargs: Vec<(String, Value)>,
    },

    /// Read observations for the given keys.
    Observe {
        #[arg(value_name = "KEY")]
        keys: Vec<String>,

        /// Keyword argument as KEY=JSON; repeatable.
        #[arg(long = "set", value_name = "KEY=JSON", value_parser = parse_assignment)]
        kwargs: Vec<(String, Value)>,
    },
}

/// Parses `KEY=VALUE`. The value is read as a tagged JSON value
/// (`{"float": 1.5}`), then as plain JSON, and finally taken as a bare string.
fn parse_assignment(input: &str) -> Result<(String, Value), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{input}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{input}`"));
    }

    let value = serde_json::from_str::<Value>(raw)
        .or_else(|_| serde_json::from_str::<serde_json::Value>(raw).map(Value::from))
        .unwrap_or_else(|_| Value::from(raw));
    Ok((key.to_string(), value))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = if let Some(ref path) = args.config {
        CliConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        CliConfig::default()
    };
    config.merge_cli_args(&args);
    config.validate()?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(command) = args.command else {
        anyhow::bail!("No command given; see --help");
    };

    init_tracing(&config.logging)?;

    info!(
        endpoint = %config.environment.relay.endpoint(),
        strict = config.environment.strict,
        "Connecting to relay"
    );

    let env = RelayEnvironment::connect(config.environment)
        .context("Failed to open relay session")?;

    let outcome = run(&env, command);
    env.close();
    let output = outcome?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(env: &RelayEnvironment, command: Command) -> Result<serde_json::Value> {
    let merged = match command {
        Command::Version => {
            return Ok(serde_json::json!({
                "client": VERSION,
                "server": env.server_version(),
            }));
        }
        Command::Start { nodes } => env.init_nodes(&nodes, &Map::new())?,
        Command::Stop { nodes } => env.stop_nodes(&nodes, &Map::new())?,
        Command::Reset { keys, kwargs } => env.reset(&keys, &kwargs.into_iter().collect())?,
        Command::Observe { keys, kwargs } => {
            env.collect_observations(&keys, &kwargs.into_iter().collect())?
        }
    };

    Ok(serde_json::Value::from(Value::Map(merged)))
}

/// Initializes tracing. Logs go to stderr so stdout carries only results.
fn init_tracing(config: &config::LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Failed to parse log filter")?;

    match config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
        }
    }

    Ok(())
}
