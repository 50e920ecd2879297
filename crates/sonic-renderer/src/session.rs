//! Latest known facts about the open wallet.

use serde_json::Value;
use sonic_core::{Balance, DaemonConnectionInfo, NodeFee, SyncStatus};
use std::collections::VecDeque;

/// Backend log lines kept per session; older lines are evicted first.
pub const LOG_CAPACITY: usize = 1000;

/// Where a session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the backend to report the wallet active. A session
    /// opened by a wallet switch first waits for the previous wallet to
    /// be reported closed.
    Created,
    /// Receiving updates for the open wallet.
    Active,
    /// Replaced by a newer session.
    Superseded,
}

/// One wallet's worth of state. Every setter replaces the previous value.
#[derive(Debug)]
pub struct Session {
    generation: u64,
    phase: SessionPhase,
    awaiting_close: bool,
    balance: Balance,
    transactions: Vec<Value>,
    transaction_count: u64,
    sync_status: SyncStatus,
    daemon_connection_info: Option<DaemonConnectionInfo>,
    primary_address: Option<String>,
    node_fee: Option<NodeFee>,
    backend_log: VecDeque<String>,
    prepared_transaction_hash: Option<String>,
    wallet_password_set: bool,
}

impl Session {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            phase: SessionPhase::Created,
            awaiting_close: false,
            balance: Balance::default(),
            transactions: Vec::new(),
            transaction_count: 0,
            sync_status: SyncStatus::default(),
            daemon_connection_info: None,
            primary_address: None,
            node_fee: None,
            backend_log: VecDeque::new(),
            prepared_transaction_hash: None,
            wallet_password_set: false,
        }
    }

    /// A session replacing an open wallet. Activity reports only count
    /// once the backend has reported that wallet inactive.
    pub fn reopened(generation: u64) -> Self {
        Self {
            awaiting_close: true,
            ..Self::new(generation)
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// The backend reported the wallet open.
    pub fn activate(&mut self) {
        if self.phase == SessionPhase::Created {
            self.phase = SessionPhase::Active;
        }
    }

    /// Apply a `walletActiveStatus` report.
    ///
    /// Returns `false` when the report still describes the previous wallet.
    pub fn report_wallet_active(&mut self, active: bool) -> bool {
        if self.awaiting_close {
            if active {
                return false;
            }
            self.awaiting_close = false;
        }
        if active {
            self.activate();
        }
        true
    }

    pub(crate) fn supersede(&mut self) {
        self.phase = SessionPhase::Superseded;
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }

    pub fn transactions(&self) -> &[Value] {
        &self.transactions
    }

    /// Up to `count` transactions starting at `start`.
    pub fn transactions_page(&self, start: usize, count: usize) -> &[Value] {
        let start = start.min(self.transactions.len());
        let end = start.saturating_add(count).min(self.transactions.len());
        &self.transactions[start..end]
    }

    pub fn set_transactions(&mut self, transactions: Vec<Value>) {
        self.transactions = transactions;
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn set_transaction_count(&mut self, count: u64) {
        self.transaction_count = count;
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn set_sync_status(&mut self, status: SyncStatus) {
        self.sync_status = status;
    }

    pub fn daemon_connection_info(&self) -> Option<&DaemonConnectionInfo> {
        self.daemon_connection_info.as_ref()
    }

    pub fn set_daemon_connection_info(&mut self, info: DaemonConnectionInfo) {
        self.daemon_connection_info = Some(info);
    }

    pub fn primary_address(&self) -> Option<&str> {
        self.primary_address.as_deref()
    }

    pub fn set_primary_address(&mut self, address: String) {
        self.primary_address = Some(address);
    }

    pub fn node_fee(&self) -> Option<&NodeFee> {
        self.node_fee.as_ref()
    }

    pub fn set_node_fee(&mut self, fee: NodeFee) {
        self.node_fee = Some(fee);
    }

    pub fn backend_log(&self) -> impl Iterator<Item = &str> {
        self.backend_log.iter().map(String::as_str)
    }

    pub fn add_backend_log_line(&mut self, line: String) {
        if self.backend_log.len() == LOG_CAPACITY {
            self.backend_log.pop_front();
        }
        self.backend_log.push_back(line);
    }

    pub fn prepared_transaction_hash(&self) -> Option<&str> {
        self.prepared_transaction_hash.as_deref()
    }

    pub fn set_prepared_transaction_hash(&mut self, hash: Option<String>) {
        self.prepared_transaction_hash = hash;
    }

    pub fn has_wallet_password(&self) -> bool {
        self.wallet_password_set
    }

    pub fn set_wallet_password_set(&mut self, set: bool) {
        self.wallet_password_set = set;
    }
}
