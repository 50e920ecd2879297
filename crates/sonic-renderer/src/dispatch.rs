//! Renderer dispatch.
//!
//! One task owns the [`AppContext`] and drains a single queue of inputs:
//! frames relayed by the host and commands from the UI. Each input is
//! handled to completion before the next, so every session field has one
//! writer and later values always replace earlier ones.

use crate::config_manager::ConfigStore;
use crate::context::AppContext;
use crate::modals;
use crate::ui::{UiCommand, UiEvent};
use serde_json::Value;
use sonic_core::{
    BackendEvent, Channel, ConfigPush, Frame, HostControl, HostNotice, Message, SaveAs, UiRequest,
    WalletConfig,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Buffered UI events per subscriber before the slowest one starts lagging.
const UI_EVENT_CAPACITY: usize = 64;

/// One item on the dispatcher queue.
#[derive(Debug)]
pub enum Input {
    Frame(Frame),
    Command(UiCommand),
}

/// Cheap handle for feeding the dispatcher from other tasks.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    inputs: mpsc::UnboundedSender<Input>,
    ui: broadcast::Sender<UiEvent>,
}

impl DispatcherHandle {
    /// Queue a frame. Returns `false` once the dispatcher has stopped.
    pub fn frame(&self, frame: Frame) -> bool {
        self.inputs.send(Input::Frame(frame)).is_ok()
    }

    /// Queue a UI command. Returns `false` once the dispatcher has stopped.
    pub fn command(&self, command: UiCommand) -> bool {
        self.inputs.send(Input::Command(command)).is_ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.ui.subscribe()
    }
}

pub struct Dispatcher {
    context: AppContext,
    link: mpsc::UnboundedSender<Frame>,
    ui: broadcast::Sender<UiEvent>,
    store: Arc<dyn ConfigStore>,
}

impl Dispatcher {
    /// `link` carries frames to the host.
    pub fn new(link: mpsc::UnboundedSender<Frame>, store: Arc<dyn ConfigStore>) -> Self {
        let (ui, _) = broadcast::channel(UI_EVENT_CAPACITY);
        Self {
            context: AppContext::new(WalletConfig::defaults()),
            link,
            ui,
            store,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.ui.subscribe()
    }

    /// Move the dispatcher onto its own task.
    pub fn spawn(self) -> (DispatcherHandle, tokio::task::JoinHandle<()>) {
        let (inputs, rx) = mpsc::unbounded_channel();
        let handle = DispatcherHandle {
            inputs,
            ui: self.ui.clone(),
        };
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    /// Drain `inputs` until every sender is gone.
    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<Input>) {
        while let Some(input) = inputs.recv().await {
            self.handle(input);
        }
        tracing::debug!("dispatcher queue closed");
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Frame(frame) => self.handle_frame(frame),
            Input::Command(command) => self.handle_command(command),
        }
    }

    pub fn handle_frame(&mut self, frame: Frame) {
        let Frame { channel, envelope } = frame;
        match channel {
            Channel::FromBackend => match BackendEvent::decode(envelope) {
                Ok(event) => self.handle_backend(event),
                Err(e) => tracing::warn!("dropping malformed backend message: {}", e),
            },
            Channel::FromMain => match HostNotice::decode(envelope) {
                Ok(notice) => self.handle_notice(notice),
                Err(e) => tracing::info!("dropping malformed host message: {}", e),
            },
            _ => tracing::warn!(
                "unexpected `{}` on {:?}",
                envelope.message_type,
                channel
            ),
        }
    }

    fn handle_notice(&mut self, notice: HostNotice) {
        match notice {
            HostNotice::Config(push) => self.apply_config(push),
            HostNotice::Unknown { message_type, data } => {
                tracing::info!("unhandled host message `{}`: {}", message_type, data);
            }
        }
    }

    fn apply_config(&mut self, push: ConfigPush) {
        let wallet_file = push.config.wallet_file().unwrap_or_default().to_string();
        self.context.apply_config(push, Arc::clone(&self.store));
        self.emit_dark_mode(self.context.config().dark_mode());
        self.reinit_wallet(&wallet_file);
        self.notify_host(&HostControl::FrontReady);
    }

    /// Close whatever is open and start over with `wallet_path`.
    pub fn reinit_wallet(&mut self, wallet_path: &str) {
        tracing::info!("reinitializing wallet with {}", wallet_path);

        self.send(&UiRequest::OpenNewWallet);
        if let Err(e) = self
            .context
            .set_config_value("walletFile", Value::String(wallet_path.to_string()))
        {
            tracing::warn!("could not persist wallet path: {}", e);
        }
        self.send(&UiRequest::Config(self.context.config().clone()));

        let generation = self.context.start_new_session();
        tracing::debug!("now on session {}", generation);
        self.emit(UiEvent::GoToLogin);
        self.emit(UiEvent::RefreshLogin);
    }

    pub fn handle_backend(&mut self, event: BackendEvent) {
        if event.is_wallet_fact() && !self.context.session().is_active() {
            tracing::debug!(
                "dropping `{}` for a wallet that is no longer open (session {})",
                event.message_type(),
                self.context.session().generation()
            );
            return;
        }

        let session = self.context.session_mut();
        match event {
            BackendEvent::Balance(balance) => {
                session.set_balance(balance);
                self.emit(UiEvent::GotBalance(balance));
            }
            BackendEvent::SyncStatus(status) => {
                session.set_sync_status(status);
                self.emit(UiEvent::GotSyncStatus(status));
            }
            BackendEvent::TransactionList(rows) => {
                session.set_transactions(rows);
                self.emit(UiEvent::GotNewTransactions);
            }
            BackendEvent::TransactionCount(count) => {
                session.set_transaction_count(count);
                self.emit(UiEvent::GotTransactionCount(count));
            }
            BackendEvent::NodeFee(fee) => {
                session.set_node_fee(fee.clone());
                self.emit(UiEvent::GotNodeFee(fee));
            }
            BackendEvent::PrimaryAddress(address) => session.set_primary_address(address),
            BackendEvent::DaemonConnectionInfo(info) => session.set_daemon_connection_info(info),
            BackendEvent::BackendLogLine(line) => session.add_backend_log_line(line),
            BackendEvent::WalletActiveStatus(active) => {
                if session.report_wallet_active(active) {
                    self.context.login_counter_mut().set_wallet_active(active);
                } else {
                    tracing::debug!("ignoring activity report for the previous wallet");
                }
            }
            BackendEvent::SendTransactionResponse(response) => {
                let modal = if response.is_success() {
                    modals::transaction_sent(&response)
                } else {
                    modals::transaction_failed(&response)
                };
                self.emit(UiEvent::OpenModal(modal));
            }
            BackendEvent::PrepareTransactionResponse(response) => {
                if response.is_success() {
                    session.set_prepared_transaction_hash(response.hash);
                } else {
                    session.set_prepared_transaction_hash(None);
                    self.emit(UiEvent::OpenModal(modals::transaction_failed(&response)));
                }
            }
            BackendEvent::PasswordChangeResponse(response) => {
                let modal = if response.is_success() {
                    modals::password_changed()
                } else {
                    modals::password_change_failed(response.error.as_ref())
                };
                self.emit(UiEvent::OpenModal(modal));
            }
            BackendEvent::SaveWalletResponse(saved) => {
                let modal = if saved {
                    modals::wallet_saved()
                } else {
                    modals::wallet_save_failed()
                };
                self.emit(UiEvent::OpenModal(modal));
            }
            BackendEvent::RescanResponse(height) => {
                self.emit(UiEvent::OpenModal(modals::rescanning(&height)));
            }
            BackendEvent::AuthenticationError(error) => {
                self.emit(UiEvent::OpenModal(modals::wallet_open_error(&error)));
            }
            BackendEvent::HandleLedgerImport => self.emit(UiEvent::ImportLedger),
            BackendEvent::LedgerPrompt => self.emit(UiEvent::OpenModal(modals::ledger_prompt())),
            BackendEvent::LedgerPromptClose => self.emit(UiEvent::CloseModal),
            BackendEvent::Unknown { message_type, .. } => {
                tracing::debug!("ignoring unknown backend message `{}`", message_type);
            }
        }
    }

    pub fn handle_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::SendTransaction => {
                match self.context.session().prepared_transaction_hash() {
                    Some(hash) => {
                        let request = UiRequest::SendTransaction {
                            hash: hash.to_string(),
                        };
                        self.send(&request);
                    }
                    None => tracing::warn!("no prepared transaction to send"),
                }
            }
            UiCommand::OpenWallet(path) => self.reinit_wallet(&path),
            UiCommand::RequestTransactions(count) => self.send(&UiRequest::Transactions(count)),
            UiCommand::SaveWalletAs(path) => {
                if self.require_ready() {
                    self.send(&UiRequest::SaveWalletAs(SaveAs {
                        notify: true,
                        save_path: path,
                    }));
                }
            }
            UiCommand::ExportToCsv(path) => {
                if self.require_ready() {
                    self.send(&UiRequest::ExportToCsv(path));
                }
            }
            UiCommand::BackupToFile(path) => {
                if self.context.login_counter().is_ready() {
                    self.send(&UiRequest::BackupToFile(path));
                }
            }
            UiCommand::BackupToClipboard => {
                if self.context.login_counter().is_ready() {
                    self.send(&UiRequest::BackupToClipboard);
                }
            }
            UiCommand::Lock => {
                if self.context.login_counter().is_logged_in
                    && self.context.session().has_wallet_password()
                {
                    self.emit(UiEvent::LogOut);
                }
            }
            UiCommand::LoggedIn { password_set } => {
                self.context.login_counter_mut().set_logged_in(true);
                self.context
                    .session_mut()
                    .set_wallet_password_set(password_set);
            }
            UiCommand::LoginFailed => self.context.login_counter_mut().set_login_failed(),
            UiCommand::SetConfig { key, value } => self.set_config(&key, value),
        }
    }

    fn set_config(&mut self, key: &str, value: Value) {
        let changed = match self.context.set_config_value(key, value) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!("could not persist {}: {}", key, e);
                true
            }
        };
        if !changed {
            return;
        }
        match key {
            "darkMode" => self.emit_dark_mode(self.context.config().dark_mode()),
            "closeToTray" => {
                let state = self.context.config().close_to_tray();
                self.notify_host(&HostControl::CloseToTrayToggle(state));
            }
            _ => {}
        }
    }

    /// Logged in with an open wallet; otherwise send the UI back to login.
    fn require_ready(&self) -> bool {
        if self.context.login_counter().is_ready() {
            true
        } else {
            self.emit(UiEvent::RefreshLogin);
            false
        }
    }

    fn emit_dark_mode(&self, on: bool) {
        self.emit(if on {
            UiEvent::DarkModeOn
        } else {
            UiEvent::DarkModeOff
        });
    }

    fn emit(&self, event: UiEvent) {
        // Fails only when no UI is subscribed.
        let _ = self.ui.send(event);
    }

    fn send(&self, request: &UiRequest) {
        self.deliver(Channel::FromFrontend, request);
    }

    fn notify_host(&self, control: &HostControl) {
        self.deliver(Channel::ToMain, control);
    }

    fn deliver<M: Message>(&self, channel: Channel, message: &M) {
        let envelope = match message.to_envelope() {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("could not encode message: {}", e);
                return;
            }
        };
        if self.link.send(Frame::new(channel, envelope)).is_err() {
            tracing::debug!("host gone, dropped `{}`", message.message_type());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::MemoryStore;
    use crate::ui::{Modal, ModalAction};
    use serde_json::json;
    use sonic_core::{Balance, Envelope};

    struct Harness {
        dispatcher: Dispatcher,
        sent: mpsc::UnboundedReceiver<Frame>,
        events: broadcast::Receiver<UiEvent>,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            let (link, sent) = mpsc::unbounded_channel();
            let store = MemoryStore::new();
            let dispatcher = Dispatcher::new(link, Arc::new(store.clone()));
            let events = dispatcher.subscribe();
            Self {
                dispatcher,
                sent,
                events,
                store,
            }
        }

        fn backend(&mut self, message_type: &str, data: Value) {
            self.dispatcher.handle_frame(Frame::new(
                Channel::FromBackend,
                Envelope::new(message_type, data),
            ));
        }

        fn host(&mut self, message_type: &str, data: Value) {
            self.dispatcher.handle_frame(Frame::new(
                Channel::FromMain,
                Envelope::new(message_type, data),
            ));
        }

        fn open_wallet(&mut self) {
            self.backend("walletActiveStatus", json!(true));
        }

        fn log_in(&mut self) {
            self.open_wallet();
            self.dispatcher
                .handle_command(UiCommand::LoggedIn { password_set: true });
        }

        fn sent(&mut self) -> Vec<Frame> {
            let mut frames = Vec::new();
            while let Ok(frame) = self.sent.try_recv() {
                frames.push(frame);
            }
            frames
        }

        fn events(&mut self) -> Vec<UiEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }

        fn modals(&mut self) -> Vec<Modal> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    UiEvent::OpenModal(modal) => Some(modal),
                    _ => None,
                })
                .collect()
        }

        fn session(&self) -> &crate::session::Session {
            self.dispatcher.context().session()
        }
    }

    fn types(frames: &[Frame]) -> Vec<(Channel, &str)> {
        frames
            .iter()
            .map(|f| (f.channel, f.envelope.message_type.as_str()))
            .collect()
    }

    #[test]
    fn config_push_reinitializes_wallet() {
        let mut h = Harness::new();
        h.host(
            "config",
            json!({"config": {"walletFile": "/a.wallet", "darkMode": true}, "configPath": "/x"}),
        );

        let context = h.dispatcher.context();
        assert_eq!(context.config_manager().unwrap().config_path(), "/x");
        assert_eq!(context.config().wallet_file(), Some("/a.wallet"));
        assert_eq!(context.session().generation(), 2);

        let frames = h.sent();
        assert_eq!(
            types(&frames),
            vec![
                (Channel::FromFrontend, "openNewWallet"),
                (Channel::FromFrontend, "config"),
                (Channel::ToMain, "frontReady"),
            ]
        );
        assert_eq!(frames[1].envelope.data["walletFile"], "/a.wallet");

        let (path, written) = h.store.last_write().unwrap();
        assert_eq!(path, "/x");
        assert_eq!(written.wallet_file(), Some("/a.wallet"));

        assert_eq!(
            h.events(),
            vec![UiEvent::DarkModeOn, UiEvent::GoToLogin, UiEvent::RefreshLogin]
        );
    }

    #[test]
    fn config_push_without_config_is_dropped() {
        let mut h = Harness::new();
        h.host("config", json!({"configPath": "/x"}));

        assert!(h.dispatcher.context().config_manager().is_none());
        assert_eq!(h.dispatcher.context().config(), &WalletConfig::defaults());
        assert_eq!(h.session().generation(), 1);
        assert!(h.sent().is_empty());
        assert!(h.events().is_empty());
    }

    #[test]
    fn insufficient_funds_opens_error_modal() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("balance", json!([500, 0]));
        h.events();

        h.backend(
            "sendTransactionResponse",
            json!({"status": "FAILURE", "error": {"errorString": "insufficient funds"}}),
        );

        let modals = h.modals();
        assert_eq!(modals.len(), 1);
        assert_eq!(modals[0].title, "Error!");
        assert!(modals[0].mentions("The transaction was not successful."));
        assert!(modals[0].mentions("insufficient funds"));
        assert_eq!(modals[0].confirm_action, Some(ModalAction::TransactionCancel));
        assert_eq!(
            h.session().balance(),
            Balance {
                unlocked: 500,
                locked: 0
            }
        );
    }

    #[test]
    fn successful_send_shows_hash() {
        let mut h = Harness::new();
        h.backend(
            "sendTransactionResponse",
            json!({"status": "SUCCESS", "hash": "abc123"}),
        );
        let modals = h.modals();
        assert_eq!(modals[0].title, "Success!");
        assert!(modals[0].mentions("abc123"));
    }

    #[test]
    fn latest_transaction_count_wins() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("transactionCount", json!(5));
        h.backend("transactionCount", json!(12));

        assert_eq!(h.session().transaction_count(), 12);
        assert_eq!(
            h.events(),
            vec![
                UiEvent::GotTransactionCount(5),
                UiEvent::GotTransactionCount(12)
            ]
        );
    }

    #[test]
    fn latest_balance_wins() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("balance", json!([1, 2]));
        h.backend("balance", json!([30, 40]));
        assert_eq!(
            h.session().balance(),
            Balance {
                unlocked: 30,
                locked: 40
            }
        );
    }

    #[test]
    fn unknown_message_changes_nothing() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("balance", json!([7, 0]));
        h.events();

        h.backend("totallyNewThing", json!({"x": 1}));

        assert_eq!(h.session().balance().unlocked, 7);
        assert!(h.events().is_empty());
        assert!(h.sent().is_empty());
    }

    #[test]
    fn malformed_backend_payload_is_dropped() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("balance", json!([3, 0]));
        h.backend("balance", json!("lots"));
        assert_eq!(h.session().balance().unlocked, 3);
    }

    #[test]
    fn wallet_switch_discards_old_state() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("transactionList", json!([{"hash": "old"}]));
        assert_eq!(h.session().transactions().len(), 1);

        h.dispatcher
            .handle_command(UiCommand::OpenWallet("/b.wallet".to_string()));
        assert!(h.session().transactions().is_empty());
        assert_eq!(h.dispatcher.context().config().wallet_file(), Some("/b.wallet"));

        // Late list for the old wallet.
        h.backend("transactionList", json!([{"hash": "stale"}]));
        assert!(h.session().transactions().is_empty());

        h.backend("walletActiveStatus", json!(false));
        h.open_wallet();
        h.backend("transactionList", json!([{"hash": "new"}]));
        assert_eq!(h.session().transactions()[0]["hash"], "new");
    }

    #[test]
    fn late_activity_report_from_old_wallet_is_ignored() {
        let mut h = Harness::new();
        h.open_wallet();
        h.backend("transactionList", json!([{"hash": "old"}]));

        h.dispatcher
            .handle_command(UiCommand::OpenWallet("/b.wallet".to_string()));
        h.backend("walletActiveStatus", json!(true));
        h.backend("transactionList", json!([{"hash": "old"}]));

        assert!(h.session().transactions().is_empty());
        assert!(!h.session().is_active());
        assert!(!h.dispatcher.context().login_counter().wallet_active);
    }

    #[test]
    fn failure_with_unexpected_error_shape_still_opens_modal() {
        let mut h = Harness::new();
        h.backend(
            "sendTransactionResponse",
            json!({"status": "FAILURE", "error": {"errorCode": 5}}),
        );
        h.backend(
            "passwordChangeResponse",
            json!({"status": "FAILURE", "error": 5}),
        );

        let modals = h.modals();
        assert_eq!(modals.len(), 2);
        assert!(modals[0].mentions("The transaction was not successful."));
        assert!(modals[0].mentions("errorCode"));
        assert_eq!(modals[1].title, "Error!");
        assert!(modals[1].mentions("The password was not changed."));
    }

    #[test]
    fn wrong_current_password_modal() {
        let mut h = Harness::new();
        h.backend(
            "passwordChangeResponse",
            json!({"status": "FAILURE", "error": "AUTHERROR"}),
        );
        let modals = h.modals();
        assert_eq!(modals[0].title, "Incorrect Password!");
        assert!(modals[0].mentions("did not enter your current password correctly"));
    }

    #[test]
    fn password_changed_reopens_wallet() {
        let mut h = Harness::new();
        h.backend("passwordChangeResponse", json!({"status": "SUCCESS"}));
        let modals = h.modals();
        assert_eq!(modals[0].confirm_action, Some(ModalAction::OpenNewWallet));
    }

    #[test]
    fn save_as_while_logged_out_refreshes_login() {
        let mut h = Harness::new();
        h.dispatcher
            .handle_command(UiCommand::SaveWalletAs("/copy.wallet".to_string()));
        assert!(h.sent().is_empty());
        assert_eq!(h.events(), vec![UiEvent::RefreshLogin]);
    }

    #[test]
    fn save_as_when_ready_sends_request() {
        let mut h = Harness::new();
        h.log_in();
        h.dispatcher
            .handle_command(UiCommand::SaveWalletAs("/copy.wallet".to_string()));
        let frames = h.sent();
        assert_eq!(types(&frames), vec![(Channel::FromFrontend, "saveWalletAs")]);
        assert_eq!(
            frames[0].envelope.data,
            json!({"notify": true, "savePath": "/copy.wallet"})
        );
    }

    #[test]
    fn backup_while_logged_out_is_ignored() {
        let mut h = Harness::new();
        h.dispatcher.handle_command(UiCommand::BackupToClipboard);
        assert!(h.sent().is_empty());
        assert!(h.events().is_empty());
    }

    #[test]
    fn send_uses_prepared_hash() {
        let mut h = Harness::new();
        h.dispatcher.handle_command(UiCommand::SendTransaction);
        assert!(h.sent().is_empty());

        h.backend(
            "prepareTransactionResponse",
            json!({"status": "SUCCESS", "hash": "beef"}),
        );
        h.dispatcher.handle_command(UiCommand::SendTransaction);
        let frames = h.sent();
        assert_eq!(
            types(&frames),
            vec![(Channel::FromFrontend, "sendTransactionRequest")]
        );
        assert_eq!(frames[0].envelope.data, json!("beef"));
    }

    #[test]
    fn lock_needs_password() {
        let mut h = Harness::new();
        h.open_wallet();
        h.dispatcher
            .handle_command(UiCommand::LoggedIn { password_set: false });
        h.dispatcher.handle_command(UiCommand::Lock);
        assert!(h.events().is_empty());

        h.dispatcher
            .handle_command(UiCommand::LoggedIn { password_set: true });
        h.dispatcher.handle_command(UiCommand::Lock);
        assert_eq!(h.events(), vec![UiEvent::LogOut]);
    }

    #[test]
    fn close_to_tray_tells_host() {
        let mut h = Harness::new();
        h.dispatcher.handle_command(UiCommand::SetConfig {
            key: "closeToTray".to_string(),
            value: json!(true),
        });
        let frames = h.sent();
        assert_eq!(types(&frames), vec![(Channel::ToMain, "closeToTrayToggle")]);
        assert_eq!(frames[0].envelope.data, json!(true));
    }

    #[test]
    fn dark_mode_toggle_emits_event() {
        let mut h = Harness::new();
        h.dispatcher.handle_command(UiCommand::SetConfig {
            key: "darkMode".to_string(),
            value: json!(false),
        });
        assert_eq!(h.events(), vec![UiEvent::DarkModeOff]);
    }

    #[test]
    fn ledger_prompt_opens_and_closes() {
        let mut h = Harness::new();
        h.backend("ledgerPrompt", Value::Null);
        h.backend("ledgerPromptClose", Value::Null);
        let events = h.events();
        assert!(matches!(&events[0], UiEvent::OpenModal(m) if m.title == "Ledger"));
        assert_eq!(events[1], UiEvent::CloseModal);
    }

    #[tokio::test]
    async fn spawned_dispatcher_processes_in_order() {
        let (link, mut sent) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(link, Arc::new(MemoryStore::new()));
        let (handle, task) = dispatcher.spawn();
        let mut events = handle.subscribe();

        handle.frame(Frame::new(
            Channel::FromBackend,
            Envelope::new("walletActiveStatus", json!(true)),
        ));
        handle.frame(Frame::new(
            Channel::FromBackend,
            Envelope::new("transactionCount", json!(5)),
        ));
        handle.frame(Frame::new(
            Channel::FromBackend,
            Envelope::new("transactionCount", json!(12)),
        ));
        handle.command(UiCommand::RequestTransactions(20));

        assert_eq!(events.recv().await.unwrap(), UiEvent::GotTransactionCount(5));
        assert_eq!(events.recv().await.unwrap(), UiEvent::GotTransactionCount(12));
        let request = sent.recv().await.unwrap();
        assert_eq!(request.envelope.message_type, "transactionRequest");
        assert_eq!(request.envelope.data, json!(20));

        drop(handle);
        task.await.unwrap();
    }
}
