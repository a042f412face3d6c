//! sealwand CLI
//!
//! Seal and open text with key-bound AEAD wands.

mod config;
mod format;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sealwand_crypto::{
    Algorithm, CipherWand, SecretKey, new_cipher_wand_with_config, new_secret_key,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use config::Config;
use format::OutputFormat;

/// sealwand - authenticated encryption with sealed boxes
#[derive(Parser)]
#[command(name = "sealwand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path [default: platform config dir]
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new secret key file
    Keygen {
        /// Output file for the key [default: configured key file]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// AEAD algorithm [default: configured algorithm]
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Seal text into a box (reads stdin when no text is given)
    Seal {
        /// Clear text
        text: Option<String>,

        /// Key file [default: configured key file]
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// Additional authenticated data
        #[arg(long, default_value = "")]
        aad: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Hex)]
        format: OutputFormat,
    },

    /// Open a sealed box (hex envelope or JSON; reads stdin when omitted)
    Open {
        /// Sealed box
        sealed: Option<String>,

        /// Key file [default: configured key file]
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// Additional authenticated data used when sealing
        #[arg(long, default_value = "")]
        aad: String,
    },

    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if cli.config.is_some() {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        Config::load_or_default(&config_path)?
    };

    // Initialize logging (stderr keeps stdout clean for piping)
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Keygen {
            output,
            algorithm,
            force,
        } => {
            generate_key(output, algorithm, force, &config)?;
        }
        Commands::Seal {
            text,
            key,
            aad,
            format,
        } => {
            seal_text(text, key, aad, format, &config).await?;
        }
        Commands::Open { sealed, key, aad } => {
            open_box(sealed, key, aad, &config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => show_config(&config_path, &config)?,
            ConfigAction::Init { force } => init_config(&config_path, force)?,
        },
    }

    Ok(())
}

/// Generate and persist a new secret key
fn generate_key(
    output: Option<PathBuf>,
    algorithm: Option<Algorithm>,
    force: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| config.keys.default_key_file.clone());
    let algorithm = algorithm.unwrap_or(config.keys.algorithm);

    if path.exists() && !force {
        anyhow::bail!(
            "Key file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    tracing::info!("Generating {} key", algorithm);
    let key = new_secret_key(algorithm)?;
    key.write_to(&path)
        .with_context(|| format!("Failed to write key file {}", path.display()))?;

    println!("Algorithm: {}", algorithm);
    println!("Key saved to: {}", path.display());
    println!("\nKeep this file secure! Anyone holding it can open your boxes.");

    Ok(())
}

/// Seal text and print the box
async fn seal_text(
    text: Option<String>,
    key: Option<PathBuf>,
    aad: String,
    format: OutputFormat,
    config: &Config,
) -> anyhow::Result<()> {
    let key = load_key(key, config)?;
    let algorithm = key.algorithm();
    let wand = new_cipher_wand_with_config(key, config.wand.clone())?;

    let text = match text {
        Some(text) => Zeroizing::new(text),
        None => read_stdin()?,
    };

    let sealed = wand
        .encrypt_string_with_aad(&text, aad.as_bytes())
        .await
        .context("Failed to seal text")?;

    println!("{}", format::render(format, algorithm, sealed)?);
    Ok(())
}

/// Open a box and print its text
async fn open_box(
    sealed: Option<String>,
    key: Option<PathBuf>,
    aad: String,
    config: &Config,
) -> anyhow::Result<()> {
    let input = match sealed {
        Some(sealed) => sealed,
        None => read_stdin()?.to_string(),
    };
    let (algorithm, sealed) = format::parse(&input).context("Failed to parse sealed box")?;

    let key = load_key(key, config)?;
    if key.algorithm() != algorithm {
        anyhow::bail!(
            "Box was sealed with {} but the key is for {}",
            algorithm,
            key.algorithm()
        );
    }

    let wand = new_cipher_wand_with_config(key, config.wand.clone())?;
    let clear = Zeroizing::new(
        wand.decrypt_string_with_aad(&sealed, aad.as_bytes())
            .await
            .context("Failed to open box")?,
    );

    println!("{}", clear.as_str());
    Ok(())
}

/// Print the effective configuration
fn show_config(path: &Path, config: &Config) -> anyhow::Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write a default configuration file
fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Configuration written to: {}", path.display());
    Ok(())
}

fn load_key(key: Option<PathBuf>, config: &Config) -> anyhow::Result<SecretKey> {
    let path = key.unwrap_or_else(|| config.keys.default_key_file.clone());
    SecretKey::read_from(&path)
        .with_context(|| format!("Failed to read key file {}", path.display()))
}

fn read_stdin() -> anyhow::Result<Zeroizing<String>> {
    let mut input = Zeroizing::new(String::new());
    std::io::stdin().read_to_string(&mut input)?;
    // Drop a single trailing newline from piped input
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}
