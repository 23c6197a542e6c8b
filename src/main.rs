//! Multisig Wallet CLI Application
//!
//! A command-line interface for operating a multi-owner wallet with a
//! daily spending limit.

use clap::{Parser, Subcommand, ValueEnum};
use multisig_wallet::cli::{self, AppState};
use multisig_wallet::config::WalletConfig;
use multisig_wallet::crypto::Address;
use multisig_wallet::multisig::{GovernanceCall, TxFilter, TxId};
use multisig_wallet::units::parse_ether;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A multi-owner wallet with a daily spending limit", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet
    Init {
        /// JSON file with owners, required and daily_limit
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Owner address (repeatable)
        #[arg(short, long = "owner")]
        owners: Vec<String>,

        /// Confirmations required
        #[arg(short, long, default_value = "1")]
        required: usize,

        /// Daily limit in ether
        #[arg(short = 'l', long, default_value = "0")]
        daily_limit: String,

        /// Initial deposit in ether
        #[arg(long)]
        deposit: Option<String>,

        /// Account making the initial deposit
        #[arg(long)]
        deployer: Option<String>,

        /// Overwrite an existing wallet
        #[arg(long)]
        force: bool,
    },

    /// Send ether to the wallet
    Deposit {
        /// Sending account
        #[arg(short, long)]
        from: String,

        /// Amount in ether
        #[arg(short, long)]
        amount: String,
    },

    /// Submit a transaction
    Submit {
        /// Submitting owner
        #[arg(short, long)]
        owner: String,

        /// Destination address
        #[arg(short, long)]
        to: String,

        /// Amount in ether
        #[arg(short, long, default_value = "0")]
        amount: String,

        /// Hex-encoded call data
        #[arg(long)]
        data: Option<String>,
    },

    /// Propose an owner or limit change
    Propose {
        /// Proposing owner
        #[arg(short, long)]
        owner: String,

        #[command(subcommand)]
        action: ProposeCommands,
    },

    /// Confirm a transaction
    Confirm {
        #[arg(short, long)]
        owner: String,

        /// Transaction id
        id: TxId,
    },

    /// Revoke a confirmation
    Revoke {
        #[arg(short, long)]
        owner: String,

        /// Transaction id
        id: TxId,
    },

    /// Execute a confirmed transaction
    Execute {
        #[arg(short, long)]
        owner: String,

        /// Transaction id
        id: TxId,
    },

    /// Display wallet information
    Show,

    /// Show a transaction
    Tx {
        /// Transaction id
        id: TxId,
    },

    /// List transactions
    List {
        /// Which transactions to include
        #[arg(short, long, value_enum, default_value = "all")]
        status: Status,

        /// First id (inclusive)
        #[arg(long)]
        from: Option<TxId>,

        /// Last id (exclusive)
        #[arg(long)]
        to: Option<TxId>,
    },

    /// Show recent events
    Events {
        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Make calls to an account revert
    Reject {
        /// Account address
        account: String,

        /// Let calls succeed again
        #[arg(long)]
        undo: bool,
    },

    /// Export wallet state to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import wallet state from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProposeCommands {
    /// Add an owner
    AddOwner { owner: String },
    /// Remove an owner
    RemoveOwner { owner: String },
    /// Replace an owner with a new one
    ReplaceOwner { owner: String, new_owner: String },
    /// Change the number of required confirmations
    ChangeRequirement { required: usize },
    /// Change the daily limit (in ether)
    ChangeDailyLimit { limit: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Status {
    Pending,
    Executed,
    All,
}

impl From<Status> for TxFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => TxFilter::PENDING,
            Status::Executed => TxFilter::EXECUTED,
            Status::All => TxFilter::ALL,
        }
    }
}

impl ProposeCommands {
    fn into_call(self) -> Result<GovernanceCall, Box<dyn std::error::Error>> {
        Ok(match self {
            ProposeCommands::AddOwner { owner } => GovernanceCall::AddOwner {
                owner: Address::new(owner),
            },
            ProposeCommands::RemoveOwner { owner } => GovernanceCall::RemoveOwner {
                owner: Address::new(owner),
            },
            ProposeCommands::ReplaceOwner { owner, new_owner } => GovernanceCall::ReplaceOwner {
                owner: Address::new(owner),
                new_owner: Address::new(new_owner),
            },
            ProposeCommands::ChangeRequirement { required } => {
                GovernanceCall::ChangeRequirement { required }
            }
            ProposeCommands::ChangeDailyLimit { limit } => GovernanceCall::ChangeDailyLimit {
                limit: parse_ether(&limit)?,
            },
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (no state exists yet)
    if let Commands::Init {
        config,
        owners,
        required,
        daily_limit,
        deposit,
        deployer,
        force,
    } = &cli.command
    {
        let wallet_config = match config {
            Some(path) => WalletConfig::from_file(path)?,
            None => WalletConfig {
                owners: owners.iter().map(|o| Address::new(o.as_str())).collect(),
                required: *required,
                daily_limit: daily_limit.clone(),
                deployer: deployer.as_deref().map(Address::from),
                initial_deposit: deposit.clone(),
            },
        };
        return cli::cmd_init(&cli.data_dir, &wallet_config, *force);
    }

    let mut state = AppState::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Deposit { from, amount } => {
            cli::cmd_deposit(&mut state, &Address::new(from), &amount)?;
        }

        Commands::Submit {
            owner,
            to,
            amount,
            data,
        } => {
            cli::cmd_submit(
                &mut state,
                &Address::new(owner),
                Address::new(to),
                &amount,
                data.as_deref(),
            )?;
        }

        Commands::Propose { owner, action } => {
            cli::cmd_propose(&mut state, &Address::new(owner), action.into_call()?)?;
        }

        Commands::Confirm { owner, id } => {
            cli::cmd_confirm(&mut state, &Address::new(owner), id)?;
        }

        Commands::Revoke { owner, id } => {
            cli::cmd_revoke(&mut state, &Address::new(owner), id)?;
        }

        Commands::Execute { owner, id } => {
            cli::cmd_execute(&mut state, &Address::new(owner), id)?;
        }

        Commands::Show => {
            cli::cmd_show(&state)?;
        }

        Commands::Tx { id } => {
            cli::cmd_tx(&state, id)?;
        }

        Commands::List { status, from, to } => {
            cli::cmd_list(&state, status.into(), from, to)?;
        }

        Commands::Events { count } => {
            cli::cmd_events(&state, count)?;
        }

        Commands::Reject { account, undo } => {
            cli::cmd_reject(&mut state, Address::new(account), undo)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
