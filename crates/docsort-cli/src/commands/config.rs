//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use docsort_core::DocsortConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "templates.min_score")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (parsed as JSON, otherwise taken as a string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map_or_else(default_config_path, PathBuf::from);
    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => {
            let config = read_or_default(&path)?;
            let value = lookup(&config, &key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let config = assign(read_or_default(&path)?, &key, value.clone())?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                key,
                serde_json::to_string(&value)?
            );
            Ok(())
        }
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsort")
        .join("config.json")
}

/// Config from `-c`, else the user config file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsortConfig> {
    match config_path {
        Some(path) => Ok(DocsortConfig::from_file(Path::new(path))?),
        None => read_or_default(&default_config_path()),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<DocsortConfig> {
    if path.exists() {
        debug!("Using config file {}", path.display());
        Ok(DocsortConfig::from_file(path)?)
    } else {
        Ok(DocsortConfig::default())
    }
}

/// `templates.min_score` -> `/templates/min_score`
fn pointer(key: &str) -> anyhow::Result<String> {
    if key.is_empty() || key.split('.').any(str::is_empty) {
        anyhow::bail!("Invalid configuration key: {:?}", key);
    }
    Ok(key.split('.').map(|part| format!("/{part}")).collect())
}

/// JSON if it parses, a plain string otherwise.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn lookup(config: &DocsortConfig, key: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(config)?
        .pointer(&pointer(key)?)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
}

/// Replace an existing key; the result must deserialize and validate.
fn assign(
    config: DocsortConfig,
    key: &str,
    value: serde_json::Value,
) -> anyhow::Result<DocsortConfig> {
    let mut json = serde_json::to_value(&config)?;
    let slot = json
        .pointer_mut(&pointer(key)?)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    *slot = value;

    let config: DocsortConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    config.validate()?;
    Ok(config)
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = read_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs, path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    DocsortConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'docsort config init' to create a configuration file.");
    }

    Ok(())
}
