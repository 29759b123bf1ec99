//! SealBox CLI - Command line interface for passphrase encryption.
//!
//! Encrypts short text values and small text files with a passphrase,
//! rewriting files in place.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sealbox_common::Passphrase;
use sealbox_storage::LocalFileSystem;
use sealbox_vault::{FileTransaction, SealConfig};

#[derive(Parser)]
#[command(name = "sealbox")]
#[command(about = "SealBox - Passphrase-based file and text encryption")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file (nonce mode, commit strategy).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Passphrase to use instead of prompting.
    #[arg(long, global = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a text value and print the encoded envelope.
    EncryptText {
        /// Text to encrypt.
        text: String,
    },

    /// Decrypt an encoded envelope and print the text.
    DecryptText {
        /// Base64 envelope to decrypt.
        envelope: String,
    },

    /// Encrypt a file in place.
    EncryptFile {
        /// File to encrypt.
        path: PathBuf,
    },

    /// Decrypt a file in place.
    DecryptFile {
        /// File to decrypt.
        path: PathBuf,
    },

    /// Restore a file left behind by an interrupted run.
    Recover {
        /// File to recover.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => SealConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SealConfig::default(),
    };

    let preset = cli.passphrase.map(Passphrase::new);

    match cli.command {
        Commands::EncryptText { text } => cmd_encrypt_text(&config, preset, &text),
        Commands::DecryptText { envelope } => cmd_decrypt_text(&config, preset, &envelope),
        Commands::EncryptFile { path } => cmd_encrypt_file(&config, preset, &path),
        Commands::DecryptFile { path } => cmd_decrypt_file(&config, preset, &path),
        Commands::Recover { path } => cmd_recover(&config, &path),
    }
}

/// Prompt for passphrase securely.
fn prompt_passphrase(prompt: &str) -> Result<Passphrase> {
    let passphrase = rpassword::prompt_password(prompt).context("Failed to read passphrase")?;
    Ok(Passphrase::new(passphrase))
}

/// Passphrase for encryption, confirmed twice when prompted.
fn encryption_passphrase(preset: Option<Passphrase>) -> Result<Passphrase> {
    if let Some(passphrase) = preset {
        return Ok(passphrase);
    }

    let passphrase = prompt_passphrase("Enter passphrase: ")?;
    let confirm = prompt_passphrase("Confirm passphrase: ")?;

    if passphrase.expose() != confirm.expose() {
        anyhow::bail!("Passphrases do not match");
    }

    Ok(passphrase)
}

fn decryption_passphrase(preset: Option<Passphrase>) -> Result<Passphrase> {
    match preset {
        Some(passphrase) => Ok(passphrase),
        None => prompt_passphrase("Enter passphrase: "),
    }
}

fn transaction(config: &SealConfig) -> FileTransaction<LocalFileSystem> {
    FileTransaction::with_config(LocalFileSystem::new(), config)
}

fn cmd_encrypt_text(config: &SealConfig, preset: Option<Passphrase>, text: &str) -> Result<()> {
    let passphrase = encryption_passphrase(preset)?;
    let encoded = config
        .cryptor()
        .encrypt(text, &passphrase)
        .context("Failed to encrypt text")?;

    println!("{}", encoded);
    Ok(())
}

fn cmd_decrypt_text(config: &SealConfig, preset: Option<Passphrase>, envelope: &str) -> Result<()> {
    let passphrase = decryption_passphrase(preset)?;
    let text = config
        .cryptor()
        .decrypt(envelope, &passphrase)
        .context("Failed to decrypt text")?;

    println!("{}", text);
    Ok(())
}

fn cmd_encrypt_file(config: &SealConfig, preset: Option<Passphrase>, path: &Path) -> Result<()> {
    info!("Encrypting file: {}", path.display());

    let passphrase = encryption_passphrase(preset)?;
    transaction(config)
        .encrypt_file(path, &passphrase)
        .with_context(|| format!("Failed to encrypt {}", path.display()))?;

    println!("File encrypted: {}", path.display());
    Ok(())
}

fn cmd_decrypt_file(config: &SealConfig, preset: Option<Passphrase>, path: &Path) -> Result<()> {
    info!("Decrypting file: {}", path.display());

    let passphrase = decryption_passphrase(preset)?;
    transaction(config)
        .decrypt_file(path, &passphrase)
        .with_context(|| format!("Failed to decrypt {}", path.display()))?;

    println!("File decrypted: {}", path.display());
    Ok(())
}

fn cmd_recover(config: &SealConfig, path: &Path) -> Result<()> {
    let recovered = transaction(config)
        .recover(path)
        .with_context(|| format!("Failed to recover {}", path.display()))?;

    if recovered {
        println!("Restored original content of {}", path.display());
    } else {
        println!("Nothing to recover for {}", path.display());
    }
    Ok(())
}
