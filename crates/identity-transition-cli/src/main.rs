//! `idtx`: command-line front end for identity-transition.
//!
//! Manages an encrypted HD wallet, builds signed identity-create
//! transitions from asset lock proofs, and checks saved transitions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use zeroize::Zeroize;

use identity_transition::crypto::random::random_seed;
use identity_transition::wallet::{
    load_wallet, next_unused_identity_index, read_wallet_metadata, record_used_identity_index,
    save_wallet,
};
use identity_transition::{
    fibonacci, nearest_greater_fibonacci, AssetLockProof, HdWalletAccount,
    IdentityCreateTransition, LocalWallet, Network, Platform, PlatformConfig, Secp256k1KeyPair,
};

const PASSPHRASE_ENV: &str = "IDTX_PASSPHRASE";
const DEFAULT_WALLET_FILE: &str = "default.wallet";

// ── Directory helpers ─────────────────────────────────────────────────────────

fn idtx_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("IDTX_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("neither IDTX_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".idtx"))
}

fn wallet_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(idtx_dir()?.join(DEFAULT_WALLET_FILE)),
    }
}

// ── Passphrase helper ─────────────────────────────────────────────────────────

/// Passphrase from `IDTX_PASSPHRASE`, or one line of stdin.
fn read_passphrase(prompt: &str) -> Result<String> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        return Ok(passphrase);
    }
    eprint!("{prompt}");
    let mut passphrase = String::new();
    std::io::stdin()
        .read_line(&mut passphrase)
        .context("failed to read passphrase")?;
    Ok(passphrase.trim().to_string())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// identity-transition CLI: HD wallet and identity-create transitions.
#[derive(Parser, Debug)]
#[command(
    name = "idtx",
    about = "identity-transition CLI",
    version,
    long_about = "idtx: identity-transition CLI\n\nManage an encrypted HD wallet, build signed identity-create transitions\nfrom asset lock proofs, and check saved transitions."
)]
struct Cli {
    /// Wallet file (default: $IDTX_HOME/default.wallet or ~/.idtx/default.wallet)
    #[arg(long, global = true)]
    wallet: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the HD wallet
    Wallet {
        #[command(subcommand)]
        subcommand: WalletCommands,
    },

    /// Build and sign an identity-create transition
    Create {
        /// JSON file holding the asset lock proof
        #[arg(long)]
        proof: PathBuf,

        /// Asset lock funding private key (hex)
        #[arg(long, conflicts_with = "funding_index")]
        funding_key: Option<String>,

        /// Derive the funding key from the wallet at this registration index
        #[arg(long)]
        funding_index: Option<u32>,

        /// Write the result JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip the local basic structure check
        #[arg(long)]
        no_validate: bool,

        /// Give up after this many seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },

    /// Run the basic structure check on a saved transition
    Verify {
        /// JSON file holding the transition (or a full `create` result)
        #[arg(long)]
        transition: PathBuf,
    },

    /// Print the n-th Fibonacci number
    Fib {
        #[arg(value_parser = clap::value_parser!(u32).range(0..=40))]
        n: u32,
    },

    /// Print the smallest Fibonacci number not below VALUE
    NearestFib { value: u64 },
}

#[derive(Subcommand, Debug)]
enum WalletCommands {
    /// Create a new wallet from a random seed
    Init {
        /// Network the wallet derives keys for
        #[arg(long, default_value = "testnet")]
        network: Network,

        /// Overwrite an existing wallet file
        #[arg(long)]
        force: bool,
    },

    /// Show wallet metadata (no passphrase needed)
    Show,

    /// Print the registration funding key at an index
    FundingKey {
        #[arg(long, default_value = "0")]
        index: u32,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let wallet = cli.wallet;

    let result = match cli.command {
        Commands::Wallet { subcommand } => wallet_path(wallet).and_then(|wallet| match subcommand {
            WalletCommands::Init { network, force } => {
                cmd_wallet_init(&wallet, network, force, verbose)
            }
            WalletCommands::Show => cmd_wallet_show(&wallet, verbose),
            WalletCommands::FundingKey { index } => cmd_wallet_funding_key(&wallet, index),
        }),
        Commands::Create {
            proof,
            funding_key,
            funding_index,
            output,
            no_validate,
            timeout_secs,
        } => wallet_path(wallet).and_then(|wallet| {
            cmd_create(
                &wallet,
                &proof,
                funding_key.as_deref(),
                funding_index,
                output.as_deref(),
                no_validate,
                timeout_secs,
                verbose,
            )
        }),
        Commands::Verify { transition } => cmd_verify(&transition, verbose),
        Commands::Fib { n } => fibonacci(n)
            .map(|f| println!("{f}"))
            .ok_or_else(|| anyhow!("fib({n}) does not fit in 64 bits")),
        Commands::NearestFib { value } => nearest_greater_fibonacci(value)
            .map(|f| println!("{f}"))
            .ok_or_else(|| anyhow!("no Fibonacci number >= {value} fits in 64 bits")),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Wallet commands ───────────────────────────────────────────────────────────

fn cmd_wallet_init(path: &Path, network: Network, force: bool, verbose: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "wallet already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    let passphrase = read_passphrase("Enter passphrase for new wallet: ")?;
    if passphrase.is_empty() {
        return Err(anyhow!("passphrase cannot be empty"));
    }
    if std::env::var(PASSPHRASE_ENV).is_err() {
        let confirm = read_passphrase("Confirm passphrase: ")?;
        if passphrase != confirm {
            return Err(anyhow!("passphrases do not match"));
        }
    }

    let mut seed = random_seed();
    let account = HdWalletAccount::from_seed(&seed, network);
    seed.zeroize();
    let account = account.context("failed to create wallet account")?;

    save_wallet(&account, path, &passphrase).context("failed to save wallet")?;

    println!("Created {network} wallet");
    println!("  File: {}", path.display());
    if verbose {
        let funding = account.identity_registration_funding_key(0)?;
        println!("  Funding key 0: {}", hex::encode(funding.public_key_bytes()));
    }
    Ok(())
}

fn cmd_wallet_show(path: &Path, verbose: bool) -> Result<()> {
    let wallet_file = read_wallet_metadata(path)
        .with_context(|| format!("failed to read wallet at {}", path.display()))?;

    let used: Vec<String> = wallet_file
        .used_identity_indices
        .iter()
        .map(u32::to_string)
        .collect();

    println!("Wallet: {}", path.display());
    println!("  Network:       {}", wallet_file.network);
    println!(
        "  Used indices:  {}",
        if used.is_empty() {
            "none".to_string()
        } else {
            used.join(", ")
        }
    );
    println!(
        "  Next index:    {}",
        next_unused_identity_index(&wallet_file)?
    );
    if verbose {
        println!(
            "  Encryption:    {} / {}",
            wallet_file.encryption.algorithm, wallet_file.encryption.kdf
        );
    }
    Ok(())
}

fn cmd_wallet_funding_key(path: &Path, index: u32) -> Result<()> {
    let passphrase = read_passphrase("Wallet passphrase: ")?;
    let account = load_wallet(path, &passphrase).context("failed to load wallet")?;
    let key = account
        .identity_registration_funding_key(index)
        .context("failed to derive funding key")?;

    let mut secret = key.secret_key_hex();
    println!("Funding key {index}");
    println!("  Public key:  {}", hex::encode(key.public_key_bytes()));
    println!("  Key hash:    {}", hex::encode(key.public_key_hash()));
    println!("  Private key: {secret}");
    secret.zeroize();
    Ok(())
}

// ── Transition commands ───────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn cmd_create(
    wallet: &Path,
    proof_path: &Path,
    funding_key: Option<&str>,
    funding_index: Option<u32>,
    output: Option<&Path>,
    no_validate: bool,
    timeout_secs: u64,
    verbose: bool,
) -> Result<()> {
    let proof_json = std::fs::read_to_string(proof_path)
        .with_context(|| format!("failed to read proof {}", proof_path.display()))?;
    let proof: AssetLockProof =
        serde_json::from_str(&proof_json).context("--proof must hold an asset lock proof")?;
    log::debug!("asset lock proof loaded from {}", proof_path.display());

    let passphrase = read_passphrase("Wallet passphrase: ")?;
    let account = load_wallet(wallet, &passphrase).context("failed to load wallet")?;

    let funding = match (funding_key, funding_index) {
        (Some(hex_key), _) => {
            Secp256k1KeyPair::from_hex(hex_key).context("--funding-key is not a valid key")?
        }
        (None, Some(index)) => account
            .identity_registration_funding_key(index)
            .context("failed to derive funding key")?,
        (None, None) => return Err(anyhow!("pass --funding-key or --funding-index")),
    };

    let config = PlatformConfig::from_env()?
        .with_network(account.network())
        .with_validate_basic(!no_validate);
    let platform = Platform::new(LocalWallet::new(account), config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let result = runtime
        .block_on(async {
            tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                platform.create_identity_create_transition(proof, &funding),
            )
            .await
        })
        .map_err(|_| anyhow!("timed out after {timeout_secs}s"))?
        .context("failed to build identity-create transition")?;

    record_used_identity_index(wallet, result.identity_index)
        .context("failed to record identity index")?;

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Identity {}", result.identity.id);
            println!("  Index:  {}", result.identity_index);
            println!("  Output: {}", path.display());
        }
        None => println!("{json}"),
    }

    if verbose {
        eprintln!("signed by {}", hex::encode(funding.public_key_bytes()));
    }
    Ok(())
}

fn cmd_verify(path: &Path, verbose: bool) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&json).context("invalid JSON")?;
    let value = match value.get("identityCreateTransition") {
        Some(inner) => inner.clone(),
        None => value,
    };
    let transition: IdentityCreateTransition =
        serde_json::from_value(value).context("not an identity-create transition")?;

    println!("Transition for identity {}", transition.identity_id());
    println!("  Keys: {}", transition.public_keys().len());
    if verbose {
        if let Ok(signer) = transition.recover_signer() {
            println!("  Signer: {}", hex::encode(signer.serialize()));
        }
    }

    let result = transition.validate_basic();
    if result.is_valid() {
        println!("  Basic check: valid");
        Ok(())
    } else {
        for message in result.messages() {
            println!("  - {message}");
        }
        Err(anyhow!(
            "basic check failed with {} error(s)",
            result.errors().len()
        ))
    }
}
