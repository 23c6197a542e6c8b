//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface. Each invocation
//! loads the persisted wallet state, applies one operation and saves.

use crate::chain::AccountBook;
use crate::config::WalletConfig;
use crate::crypto::Address;
use crate::multisig::{
    Environment, ExecutionOutcome, GovernanceCall, Transaction, TxFilter, TxId,
};
use crate::storage::{Storage, StorageConfig, WalletState};
use crate::units::{format_ether, parse_ether};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub state: WalletState,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the persisted wallet
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;

        if !storage.exists() {
            return Err(format!(
                "No wallet found in {:?}. Create one with: multisig init",
                data_dir
            )
            .into());
        }

        log::debug!("Loading wallet state from {:?}", data_dir);
        let state = storage.load()?;

        Ok(Self {
            state,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.state)?;
        Ok(())
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

fn print_outcome(id: TxId, outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Executed(path) => {
            println!("✅ Transaction {} executed via {}", id, path)
        }
        ExecutionOutcome::Failed { path, reason } => {
            println!("❌ Transaction {} executed via {} but failed: {}", id, path, reason);
            println!("   Submit a new transaction to retry.");
        }
        ExecutionOutcome::Pending => println!("⏳ Transaction {} is pending", id),
    }
}

/// Initialize a new wallet
pub fn cmd_init(data_dir: &Path, config: &WalletConfig, force: bool) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() && !force {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        println!("   Use --force to reinitialize (the current state is kept as backup 0)");
        return Ok(());
    }

    config.validate()?;

    let accounts = AccountBook::new();
    let mut wallet = config.build(accounts.now())?;

    if let Some(amount) = config.initial_deposit_wei()? {
        let deployer = config
            .deployer
            .clone()
            .unwrap_or_else(|| Address::new("deployer"));
        wallet.deposit(&deployer, amount, &accounts)?;
    }

    println!("✅ Wallet initialized!");
    println!("   📍 Address: {}", wallet.address());
    println!("   👥 Owners: {} ({})", wallet.owners().len(), wallet.description());
    println!("   📅 Daily limit: {} ETH", format_ether(wallet.daily_limit()));
    println!("   💰 Balance: {} ETH", format_ether(wallet.balance()));

    storage.save(&WalletState { wallet, accounts })?;
    Ok(())
}

/// Send value to the wallet
pub fn cmd_deposit(app: &mut AppState, from: &Address, amount: &str) -> CliResult<()> {
    let value = parse_ether(amount)?;
    let WalletState { wallet, accounts } = &mut app.state;
    wallet.deposit(from, value, accounts)?;

    println!("💰 Deposited {} ETH from {}", format_ether(value), from);
    println!("   Balance: {} ETH", format_ether(wallet.balance()));

    app.save()
}

/// Submit a transaction
pub fn cmd_submit(
    app: &mut AppState,
    caller: &Address,
    to: Address,
    amount: &str,
    data: Option<&str>,
) -> CliResult<()> {
    let value = parse_ether(amount)?;
    let payload = match data {
        Some(hex_data) => hex::decode(hex_data.trim_start_matches("0x"))?,
        None => Vec::new(),
    };

    let WalletState { wallet, accounts } = &mut app.state;
    let submission = wallet.submit_transaction(caller, to, value, payload, accounts)?;

    println!("📤 Transaction {} submitted by {}", submission.id, caller);
    print_outcome(submission.id, &submission.outcome);

    app.save()
}

/// Submit a governance change addressed to the wallet itself
pub fn cmd_propose(app: &mut AppState, caller: &Address, call: GovernanceCall) -> CliResult<()> {
    let payload = call.encode()?;

    let WalletState { wallet, accounts } = &mut app.state;
    let target = wallet.address().clone();
    let submission = wallet.submit_transaction(caller, target, 0, payload, accounts)?;

    println!("🏛️  Governance proposal {} submitted: {:?}", submission.id, call);
    print_outcome(submission.id, &submission.outcome);

    app.save()
}

/// Confirm a transaction
pub fn cmd_confirm(app: &mut AppState, caller: &Address, id: TxId) -> CliResult<()> {
    let WalletState { wallet, accounts } = &mut app.state;
    let outcome = wallet.confirm_transaction(caller, id, accounts)?;

    println!(
        "✍️  {} confirmed transaction {} ({}/{})",
        caller,
        id,
        wallet.confirmation_count(id)?,
        wallet.required()
    );
    print_outcome(id, &outcome);

    app.save()
}

/// Revoke a confirmation
pub fn cmd_revoke(app: &mut AppState, caller: &Address, id: TxId) -> CliResult<()> {
    let WalletState { wallet, accounts } = &mut app.state;
    wallet.revoke_confirmation(caller, id, accounts)?;

    println!(
        "↩️  {} revoked confirmation of transaction {} ({}/{})",
        caller,
        id,
        wallet.confirmation_count(id)?,
        wallet.required()
    );

    app.save()
}

/// Execute a transaction
pub fn cmd_execute(app: &mut AppState, caller: &Address, id: TxId) -> CliResult<()> {
    let WalletState { wallet, accounts } = &mut app.state;
    let result = wallet.execute_transaction(caller, id, accounts);

    // A failed effect still marks the transaction executed
    app.save()?;

    let outcome = result?;
    print_outcome(id, &outcome);
    Ok(())
}

/// Mark an external account as reverting calls, or undo it
pub fn cmd_reject(app: &mut AppState, account: Address, undo: bool) -> CliResult<()> {
    if undo {
        app.state.accounts.accept_calls(&account);
        println!("🔓 Calls to {} will succeed", account);
    } else {
        app.state.accounts.reject_calls(account.clone());
        println!("🔒 Calls to {} will revert", account);
    }

    app.save()
}

/// Display wallet info
pub fn cmd_show(app: &AppState) -> CliResult<()> {
    let WalletState { wallet, accounts } = &app.state;
    let now = accounts.now();

    println!("🔐 Wallet {}", wallet.address());
    println!("   ├─ Requirement: {}", wallet.description());
    println!(
        "   ├─ Created: {}",
        wallet.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("   ├─ Balance: {} ETH", format_ether(wallet.balance()));
    println!("   ├─ Daily limit: {} ETH", format_ether(wallet.daily_limit()));
    println!("   ├─ Spent today: {} ETH", format_ether(wallet.spent_today(now)));
    println!(
        "   ├─ Max withdraw now: {} ETH",
        format_ether(wallet.calc_max_withdraw(now))
    );
    println!(
        "   ├─ Transactions: {} pending, {} executed",
        wallet.transaction_count(TxFilter::PENDING),
        wallet.transaction_count(TxFilter::EXECUTED)
    );
    println!("   └─ Owners:");
    for owner in wallet.owners() {
        println!("      └─ {}", owner);
    }

    Ok(())
}

fn print_transaction(tx: &Transaction, confirmations: usize, required: usize) {
    let status = if tx.executed { "executed" } else { "pending" };
    println!(
        "   #{} | {} | {} ETH -> {} | {}/{} | {}",
        tx.id,
        status,
        format_ether(tx.value),
        tx.destination,
        confirmations,
        required,
        tx.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
}

/// Show one transaction in detail
pub fn cmd_tx(app: &AppState, id: TxId) -> CliResult<()> {
    let wallet = &app.state.wallet;
    let tx = wallet.transaction(id)?;

    println!("📄 Transaction {}", id);
    println!("   ├─ Destination: {}", tx.destination);
    println!("   ├─ Value: {} ETH", format_ether(tx.value));
    if tx.payload.is_empty() {
        println!("   ├─ Payload: (none)");
    } else if let Ok(call) = GovernanceCall::decode(&tx.payload) {
        println!("   ├─ Payload: {:?}", call);
    } else {
        println!("   ├─ Payload: 0x{}", hex::encode(&tx.payload));
    }
    println!("   ├─ Submitted by: {}", tx.submitted_by);
    println!("   ├─ Executed: {}", tx.executed);
    let confirmations = wallet.confirmations(id)?;
    println!(
        "   └─ Confirmations ({}/{}):",
        confirmations.len(),
        wallet.required()
    );
    for owner in confirmations {
        println!("      └─ {}", owner);
    }

    Ok(())
}

/// List transactions
pub fn cmd_list(
    app: &AppState,
    filter: TxFilter,
    from: Option<TxId>,
    to: Option<TxId>,
) -> CliResult<()> {
    let wallet = &app.state.wallet;
    let ids = wallet.transaction_ids(
        from.unwrap_or(0),
        to.unwrap_or(TxId::MAX),
        filter,
    );

    if ids.is_empty() {
        println!("📭 No transactions found");
        return Ok(());
    }

    println!("📋 Transactions:");
    for id in ids {
        let tx = wallet.transaction(id)?;
        print_transaction(tx, wallet.confirmation_count(id)?, wallet.required());
    }

    Ok(())
}

/// Show the event log
pub fn cmd_events(app: &AppState, count: usize) -> CliResult<()> {
    let events = app.state.wallet.events();
    let start = events.len().saturating_sub(count);

    println!("📜 Events ({} total):", events.len());
    for event in &events[start..] {
        println!(
            "   {} | {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.kind
        );
    }

    Ok(())
}

/// Export wallet state to file
pub fn cmd_export(app: &AppState, path: &Path) -> CliResult<()> {
    crate::storage::save_to_file(&app.state, path)?;
    println!("📦 Wallet exported to {:?}", path);
    Ok(())
}

/// Import wallet state from file
pub fn cmd_import(app: &mut AppState, path: &Path) -> CliResult<()> {
    app.state = crate::storage::load_from_file(path)?;
    app.save()?;

    println!("📥 Wallet imported from {:?}", path);
    println!("   Address: {}", app.state.wallet.address());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(data_dir: &Path) {
        let config = WalletConfig {
            owners: vec!["a".into(), "b".into(), "c".into()],
            required: 2,
            daily_limit: "1".to_string(),
            deployer: Some("deployer".into()),
            initial_deposit: Some("10".to_string()),
        };
        cmd_init(data_dir, &config, false).unwrap();
    }

    #[test]
    fn test_init_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        init(temp_dir.path());

        let app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(app.state.wallet.required(), 2);
        assert_eq!(app.state.wallet.balance(), parse_ether("10").unwrap());
    }

    #[test]
    fn test_force_init_keeps_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        init(temp_dir.path());
        let first = AppState::load(temp_dir.path().to_path_buf()).unwrap();

        let config = WalletConfig {
            owners: vec!["x".into(), "y".into()],
            required: 1,
            daily_limit: "0".to_string(),
            deployer: None,
            initial_deposit: None,
        };
        cmd_init(temp_dir.path(), &config, true).unwrap();

        let app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(app.state.wallet.owners().len(), 2);
        cmd_show(&app).unwrap();

        let backup = app.storage.restore_backup(0).unwrap();
        assert_eq!(backup.wallet.address(), first.state.wallet.address());
        assert_eq!(backup.wallet.created_at(), first.state.wallet.created_at());
    }

    #[test]
    fn test_load_without_wallet() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(AppState::load(temp_dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_submit_confirm_flow_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        init(temp_dir.path());

        let mut app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        cmd_submit(&mut app, &"a".into(), "shop".into(), "5", None).unwrap();
        cmd_confirm(&mut app, &"b".into(), 0).unwrap();

        let app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        assert!(app.state.wallet.transaction(0).unwrap().executed);
        assert_eq!(
            app.state.accounts.balance_of(&"shop".into()),
            parse_ether("5").unwrap()
        );
    }

    #[test]
    fn test_failed_execution_is_saved() {
        let temp_dir = tempfile::tempdir().unwrap();
        init(temp_dir.path());

        let mut app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        cmd_reject(&mut app, "vault".into(), false).unwrap();
        cmd_submit(&mut app, &"a".into(), "vault".into(), "5", None).unwrap();

        // Lower the requirement so a single confirmation is enough
        cmd_propose(
            &mut app,
            &"a".into(),
            GovernanceCall::ChangeRequirement { required: 1 },
        )
        .unwrap();
        assert_eq!(app.state.wallet.required(), 2);
        cmd_confirm(&mut app, &"b".into(), 1).unwrap();
        assert_eq!(app.state.wallet.required(), 1);

        assert!(cmd_execute(&mut app, &"c".into(), 0).is_err());

        let app = AppState::load(temp_dir.path().to_path_buf()).unwrap();
        assert!(app.state.wallet.transaction(0).unwrap().executed);
        assert_eq!(app.state.wallet.balance(), parse_ether("10").unwrap());
    }
}
