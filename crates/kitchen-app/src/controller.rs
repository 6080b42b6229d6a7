//! View controller for the order board

use crate::config::UiConfig;
use crate::error::ControllerError;
use crate::menu::FOOD_ITEMS;
use kitchen_core::{same_address, Difficulty, OrderId, OrderRecord, OrderStatus};
use kitchen_ledger::{ContractWriter, WalletSigner};
use kitchen_orders::{
    OrderStats, OrderStore, RevealConfig, RevealError, RevealFlow, RevealPhase, SignatureParams,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Top-level tabs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Orders,
    Stats,
    Guide,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Pending,
    Success,
    Error,
}

/// Transaction status toast
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionStatus {
    pub visible: bool,
    pub kind: ToastKind,
    pub message: String,
}

/// Contents of the create-order modal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderDraft {
    pub difficulty: u8,

    /// One quantity per entry of `FOOD_ITEMS`
    pub items: Vec<i64>,
}

impl Default for NewOrderDraft {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::MIN,
            items: vec![0; FOOD_ITEMS.len()],
        }
    }
}

/// Everything the page renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// Initial load in progress
    pub loading: bool,

    pub refreshing: bool,

    /// Cached orders, newest first
    pub orders: Vec<OrderRecord>,

    pub active_tab: Tab,
    pub show_order_modal: bool,
    pub show_tutorial: bool,

    /// Order submission in progress
    pub creating: bool,

    pub transaction: TransactionStatus,
    pub draft: NewOrderDraft,

    /// Order shown in the detail view
    pub selected_order: Option<OrderRecord>,

    /// Decoded items of the selected order, once revealed
    pub revealed_items: Option<Vec<i64>>,

    pub decrypting: bool,

    /// Refresh button pulse
    pub animate_refresh: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: true,
            refreshing: false,
            orders: Vec::new(),
            active_tab: Tab::default(),
            show_order_modal: false,
            show_tutorial: false,
            creating: false,
            transaction: TransactionStatus::default(),
            draft: NewOrderDraft::default(),
            selected_order: None,
            revealed_items: None,
            decrypting: false,
            animate_refresh: false,
        }
    }
}

/// Effects applied after a delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Effect {
    /// Hide the toast if it is still the one with this sequence number
    DismissToast(u64),

    /// Hide the toast, close the modal, reset the draft
    SettleSubmission(u64),

    EndRefreshAnimation,
}

#[derive(Debug)]
struct Scheduled {
    due: Instant,
    effect: Effect,
}

/// Dispatches user actions and owns the view state
pub struct KitchenController {
    state: ViewState,
    store: OrderStore,
    wallet: Option<Arc<dyn WalletSigner>>,
    reveal: Option<RevealFlow>,
    reveal_config: RevealConfig,
    ui: UiConfig,
    scheduled: Vec<Scheduled>,
    toast_seq: u64,
}

impl KitchenController {
    pub fn new(store: OrderStore, ui: UiConfig, reveal_config: RevealConfig) -> Self {
        Self {
            state: ViewState::default(),
            store,
            wallet: None,
            reveal: None,
            reveal_config,
            ui,
            scheduled: Vec::new(),
            toast_seq: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Attach a wallet and the contract client it signs for
    pub fn connect_wallet(&mut self, wallet: Arc<dyn WalletSigner>, signer: Arc<dyn ContractWriter>) {
        tracing::info!("Wallet {} connected", wallet.address());
        self.wallet = Some(wallet);
        self.store.set_signer(Some(signer));
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet = None;
        self.store.set_signer(None);
        self.hide_reveal();
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn address(&self) -> Option<String> {
        self.wallet.as_ref().map(|w| w.address())
    }

    /// Whether the connected wallet is `chef`
    pub fn is_chef(&self, chef: &str) -> bool {
        self.wallet
            .as_ref()
            .map(|w| same_address(&w.address(), chef))
            .unwrap_or(false)
    }

    /// First load: fetch orders and prepare the reveal signature request
    pub async fn init(&mut self) {
        self.reload().await;

        let params = SignatureParams::prepare(
            self.store.reader().as_ref(),
            self.wallet.as_deref(),
            self.store.clock().as_ref(),
            &self.reveal_config,
        )
        .await;
        self.reveal = Some(RevealFlow::new(params, self.store.codec(), &self.reveal_config));
        self.state.loading = false;
    }

    /// Refresh button: reload orders and pulse the button
    pub async fn refresh(&mut self) {
        self.state.animate_refresh = true;
        self.schedule(self.ui.animation(), Effect::EndRefreshAnimation);
        self.reload().await;
    }

    pub fn stats(&self) -> OrderStats {
        OrderStats::from_orders(&self.state.orders)
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
    }

    pub fn open_order_modal(&mut self) {
        self.state.show_order_modal = true;
    }

    pub fn close_order_modal(&mut self) {
        self.state.show_order_modal = false;
    }

    pub fn toggle_tutorial(&mut self) {
        self.state.show_tutorial = !self.state.show_tutorial;
    }

    pub fn set_draft_item(&mut self, index: usize, quantity: i64) -> Result<(), ControllerError> {
        let len = self.state.draft.items.len();
        let slot = self
            .state
            .draft
            .items
            .get_mut(index)
            .ok_or(ControllerError::ItemOutOfRange { index, len })?;
        *slot = quantity;
        Ok(())
    }

    pub fn set_draft_difficulty(&mut self, level: u8) -> Result<(), ControllerError> {
        self.state.draft.difficulty = Difficulty::new(level)?.level();
        Ok(())
    }

    /// Create an order from the draft with the connected wallet as chef
    pub async fn submit_order(&mut self) -> Result<OrderRecord, ControllerError> {
        let chef = self.address().ok_or(ControllerError::NotConnected)?;
        let difficulty = Difficulty::new(self.state.draft.difficulty)?;

        self.state.creating = true;
        self.show_toast(ToastKind::Pending, "Encrypting order...");

        let items = self.state.draft.items.clone();
        let result = self.store.create(&chef, difficulty, &items).await;
        self.state.creating = false;

        match result {
            Ok(record) => {
                let seq = self.show_toast(ToastKind::Success, "Encrypted order submitted!");
                self.reload().await;
                self.schedule(self.ui.success_dismiss(), Effect::SettleSubmission(seq));
                Ok(record)
            }
            Err(e) => {
                let message = if e.is_rejection() {
                    "Transaction rejected by user".to_string()
                } else {
                    format!("Submission failed: {}", e)
                };
                tracing::warn!("{}", message);
                self.show_error(message);
                Err(e.into())
            }
        }
    }

    /// Mark an order completed. Only its chef may do this, and only once.
    pub async fn complete_order(&mut self, id: &OrderId) -> Result<(), ControllerError> {
        self.update_status(id, OrderStatus::Completed).await
    }

    /// Mark an order failed. Only its chef may do this, and only once.
    pub async fn fail_order(&mut self, id: &OrderId) -> Result<(), ControllerError> {
        self.update_status(id, OrderStatus::Failed).await
    }

    /// Open the detail view of a loaded order
    pub fn select_order(&mut self, id: &OrderId) -> Result<(), ControllerError> {
        let order = self
            .find_order(id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownOrder(id.clone()))?;
        self.hide_reveal();
        self.state.selected_order = Some(order);
        Ok(())
    }

    pub fn close_order(&mut self) {
        self.hide_reveal();
        self.state.selected_order = None;
    }

    /// Show or hide the ingredients of the selected order
    pub async fn toggle_reveal(&mut self) -> Result<Option<Vec<i64>>, ControllerError> {
        let encoded = self
            .state
            .selected_order
            .as_ref()
            .map(|o| o.encoded_items.clone())
            .ok_or(ControllerError::NoSelection)?;
        let wallet = self.wallet.clone().ok_or(ControllerError::NotConnected)?;
        let flow = self
            .reveal
            .as_mut()
            .ok_or(ControllerError::Reveal(RevealError::WalletUnavailable))?;

        // The wallet may have connected or switched chains since init
        match wallet.chain_id().await {
            Ok(chain_id) => flow.set_chain_id(chain_id),
            Err(e) => tracing::warn!("Could not read chain id: {}", e),
        }

        self.state.decrypting = true;
        let result = flow.toggle(Some(wallet.as_ref()), &encoded).await;
        self.state.decrypting = false;

        match result {
            Ok(items) => {
                self.state.revealed_items = items.clone();
                Ok(items)
            }
            Err(e) => {
                tracing::warn!("Decryption failed: {}", e);
                self.state.revealed_items = None;
                Err(e.into())
            }
        }
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal
            .as_ref()
            .map(RevealFlow::phase)
            .unwrap_or_default()
    }

    /// Apply every delayed effect due at `now`
    pub fn tick(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.scheduled.drain(..).partition(|s| s.due <= now);
        self.scheduled = pending;

        for scheduled in due {
            match scheduled.effect {
                Effect::DismissToast(seq) => {
                    if seq == self.toast_seq {
                        self.state.transaction = TransactionStatus::default();
                    }
                }
                Effect::SettleSubmission(seq) => {
                    if seq == self.toast_seq {
                        self.state.transaction = TransactionStatus::default();
                    }
                    self.state.show_order_modal = false;
                    self.state.draft = NewOrderDraft::default();
                }
                Effect::EndRefreshAnimation => self.state.animate_refresh = false,
            }
        }
    }

    /// When the next delayed effect is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduled.iter().map(|s| s.due).min()
    }

    async fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<(), ControllerError> {
        let viewer = self.address().ok_or(ControllerError::NotConnected)?;
        let order = self
            .find_order(id)
            .ok_or_else(|| ControllerError::UnknownOrder(id.clone()))?;
        if !order.is_chef(&viewer) {
            return Err(ControllerError::NotChef(id.clone()));
        }
        if !order.is_pending() {
            return Err(ControllerError::NotPending(id.clone()));
        }

        self.show_toast(ToastKind::Pending, "Processing encrypted order...");
        match self.store.set_status(id, status).await {
            Ok(()) => {
                let message = match status {
                    OrderStatus::Completed => "Order completed successfully!",
                    _ => "Order marked as failed!",
                };
                let seq = self.show_toast(ToastKind::Success, message);
                self.reload().await;
                self.schedule(self.ui.success_dismiss(), Effect::DismissToast(seq));
                Ok(())
            }
            Err(e) => {
                let message = match status {
                    OrderStatus::Completed => format!("Failed to complete order: {}", e),
                    _ => format!("Failed to update order: {}", e),
                };
                tracing::warn!("{}", message);
                self.show_error(message);
                Err(e.into())
            }
        }
    }

    async fn reload(&mut self) {
        self.state.refreshing = true;
        self.state.orders = self.store.load_all().await;
        self.state.refreshing = false;
        self.state.loading = false;

        // Keep the detail view pointing at fresh data
        let selected_id = self.state.selected_order.as_ref().map(|o| o.id.clone());
        if let Some(fresh) = selected_id.and_then(|id| self.find_order(&id).cloned()) {
            self.state.selected_order = Some(fresh);
        }
    }

    fn find_order(&self, id: &OrderId) -> Option<&OrderRecord> {
        self.state.orders.iter().find(|o| &o.id == id)
    }

    fn hide_reveal(&mut self) {
        if let Some(flow) = self.reveal.as_mut() {
            flow.hide();
        }
        self.state.revealed_items = None;
    }

    fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.toast_seq += 1;
        self.state.transaction = TransactionStatus {
            visible: true,
            kind,
            message: message.into(),
        };
        self.toast_seq
    }

    fn show_error(&mut self, message: String) {
        let seq = self.show_toast(ToastKind::Error, message);
        self.schedule(self.ui.error_dismiss(), Effect::DismissToast(seq));
    }

    fn schedule(&mut self, delay: Duration, effect: Effect) {
        self.scheduled.push(Scheduled {
            due: Instant::now() + delay,
            effect,
        });
    }
}
