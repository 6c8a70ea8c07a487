#![forbid(unsafe_code)]
//! Command line front end: key generation, signing and admission checks.

use chaingate::blockchain::Blockchain;
use chaingate::config::load_config;
use chaingate::crypto::{KeyPair, Secp256k1KeyManager};
use chaingate::logging::{init_logging, log_process_id};
use chaingate::transaction::{SigningScheme, Transaction, Validator};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a new secp256k1 key pair and prints its address
    Keygen,
    /// Prints the bytes a transaction's signature must cover
    Payload {
        /// JSON transaction file
        #[arg(long)]
        tx: PathBuf,
        #[arg(long, value_enum, default_value_t = Scheme::Legacy)]
        scheme: Scheme,
    },
    /// Signs a JSON transaction and prints it with the signature attached
    Sign {
        /// Hex-encoded secret key
        #[arg(long)]
        secret_key: String,
        /// JSON transaction file
        #[arg(long)]
        tx: PathBuf,
        #[arg(long, value_enum, default_value_t = Scheme::Legacy)]
        scheme: Scheme,
    },
    /// Checks whether a JSON transaction would be admitted
    Verify {
        /// TOML configuration with the registered clients
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
        /// JSON transaction file
        #[arg(long)]
        tx: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scheme {
    Legacy,
    IncludeNativeAmount,
}

impl From<Scheme> for SigningScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Legacy => SigningScheme::Legacy,
            Scheme::IncludeNativeAmount => SigningScheme::IncludeNativeAmount,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => keygen()?,
        Commands::Payload { tx, scheme } => payload(&tx, scheme.into())?,
        Commands::Sign {
            secret_key,
            tx,
            scheme,
        } => sign(&secret_key, &tx, scheme.into())?,
        Commands::Verify { config, tx } => {
            if !verify(&config, &tx)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_transaction(path: &Path) -> Result<Transaction, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read transaction file {}: {}", path.display(), e))?;
    Ok(Transaction::from_json(&json)?)
}

fn keygen() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    println!("{} {}", "Secret key:".bright_yellow(), keypair.secret_key_hex());
    println!(
        "{} {}",
        "Public key:".bright_cyan(),
        keypair.verification_key().to_hex()
    );
    println!("{} {}", "Address:   ".bright_green(), keypair.address());
    Ok(())
}

fn payload(path: &Path, scheme: SigningScheme) -> Result<(), Box<dyn std::error::Error>> {
    let tx = read_transaction(path)?;
    let payload = tx.signing_payload_with(scheme)?;
    println!("{}", String::from_utf8_lossy(&payload));
    Ok(())
}

fn sign(
    secret_key: &str,
    path: &Path,
    scheme: SigningScheme,
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::from_secret_hex(secret_key)?;
    let mut tx = read_transaction(path)?;
    if tx.sender != keypair.address() {
        eprintln!(
            "{} sender {} does not match key address {}",
            "warning:".yellow().bold(),
            tx.sender,
            keypair.address()
        );
    }
    tx.sign_with_scheme(&keypair, scheme)?;
    println!("{}", tx.to_json()?);
    Ok(())
}

fn verify(config_path: &Path, tx_path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    init_logging(&config.node.log_level);
    log_process_id();

    let chain = Blockchain::from_config(&config)?;
    let validator = Validator::new(config.node.signing_scheme);
    let tx = read_transaction(tx_path)?;

    match validator.validate(&tx, &chain, &Secp256k1KeyManager) {
        Ok(tx_type) => {
            println!("{} transaction {} as {}", "ADMITTED".green().bold(), tx.id, tx_type);
            Ok(true)
        }
        Err(reason) => {
            println!(
                "{} transaction {} ({:?}): {}",
                "REJECTED".red().bold(),
                tx.id,
                reason.kind(),
                reason
            );
            Ok(false)
        }
    }
}
