//! End-to-end tests of the order board controller against an in-memory ledger

use kitchen_app::{ControllerError, KitchenController, Tab, ToastKind, UiConfig};
use kitchen_core::{OrderCodec, OrderStatus, TaggedBase64Codec};
use async_trait::async_trait;
use kitchen_ledger::{LocalWallet, MemoryLedger, WalletError, WalletSignature, WalletSigner};
use parking_lot::Mutex;
use kitchen_orders::{OrderStore, RevealConfig, RevealError, RevealPhase, SyncError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{advance, Instant};

struct Table {
    ledger: MemoryLedger,
    controller: KitchenController,
    wallet: Arc<LocalWallet>,
}

fn controller(ledger: &MemoryLedger) -> KitchenController {
    let store = OrderStore::new(Arc::new(ledger.clone()));
    KitchenController::new(store, UiConfig::default(), RevealConfig::default())
}

async fn connected_table(seed: u8) -> Table {
    let ledger = MemoryLedger::new();
    let wallet = Arc::new(LocalWallet::from_seed([seed; 32], 31337));
    let mut controller = controller(&ledger);
    controller.connect_wallet(wallet.clone(), Arc::new(ledger.clone()));
    controller.init().await;
    Table {
        ledger,
        controller,
        wallet,
    }
}

/// Local wallet that keeps every message it was asked to sign
struct RecordingWallet {
    inner: LocalWallet,
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl WalletSigner for RecordingWallet {
    fn address(&self) -> String {
        self.inner.address()
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.inner.chain_id().await
    }

    async fn sign_message(&self, message: &str) -> Result<WalletSignature, WalletError> {
        self.messages.lock().push(message.to_string());
        self.inner.sign_message(message).await
    }
}

async fn place_order(controller: &mut KitchenController, items: &[i64], difficulty: u8) {
    controller.open_order_modal();
    for (slot, quantity) in items.iter().enumerate() {
        controller.set_draft_item(slot, *quantity).unwrap();
    }
    controller.set_draft_difficulty(difficulty).unwrap();
    controller.submit_order().await.unwrap();
}

mod board {
    use super::*;

    #[tokio::test]
    async fn test_init_on_empty_ledger() {
        let ledger = MemoryLedger::new();
        let mut controller = controller(&ledger);
        assert!(controller.state().loading);

        controller.init().await;

        let state = controller.state();
        assert!(!state.loading);
        assert!(!state.refreshing);
        assert!(state.orders.is_empty());
        assert_eq!(state.active_tab, Tab::Orders);
        assert_eq!(controller.reveal_phase(), RevealPhase::Idle);
    }

    #[tokio::test]
    async fn test_unavailable_ledger_shows_no_orders() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;

        table.ledger.set_available(false);
        table.controller.refresh().await;
        assert!(table.controller.state().orders.is_empty());
    }

    #[tokio::test]
    async fn test_tabs_and_tutorial() {
        let mut table = connected_table(1).await;

        table.controller.select_tab(Tab::Stats);
        assert_eq!(table.controller.state().active_tab, Tab::Stats);

        table.controller.toggle_tutorial();
        assert!(table.controller.state().show_tutorial);
        table.controller.toggle_tutorial();
        assert!(!table.controller.state().show_tutorial);
    }

    #[tokio::test]
    async fn test_draft_validation() {
        let mut table = connected_table(1).await;

        assert_eq!(
            table.controller.set_draft_item(4, 1),
            Err(ControllerError::ItemOutOfRange { index: 4, len: 4 })
        );
        assert!(matches!(
            table.controller.set_draft_difficulty(0),
            Err(ControllerError::InvalidDraft(_))
        ));
        assert_eq!(table.controller.state().draft.difficulty, 1);
    }

    #[tokio::test]
    async fn test_stats_follow_orders() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;
        place_order(&mut table.controller, &[0, 1, 0, 0], 2).await;

        let id = table.controller.state().orders[0].id.clone();
        table.controller.complete_order(&id).await.unwrap();

        let stats = table.controller.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_animation_ends() {
        let mut table = connected_table(1).await;

        table.controller.refresh().await;
        assert!(table.controller.state().animate_refresh);

        advance(Duration::from_millis(1000)).await;
        table.controller.tick(Instant::now());
        assert!(!table.controller.state().animate_refresh);
        assert!(table.controller.next_deadline().is_none());
    }
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn test_submit_requires_wallet() {
        let ledger = MemoryLedger::new();
        let mut controller = controller(&ledger);
        controller.init().await;

        assert_eq!(
            controller.submit_order().await.unwrap_err(),
            ControllerError::NotConnected
        );
        assert_eq!(ledger.tx_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submission_settles_after_delay() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[2, 0, 1, 3], 2).await;

        let state = table.controller.state();
        assert_eq!(state.orders.len(), 1);
        assert!(!state.creating);
        assert!(state.show_order_modal);
        assert_eq!(state.transaction.kind, ToastKind::Success);
        assert_eq!(state.transaction.message, "Encrypted order submitted!");

        let order = &state.orders[0];
        assert_eq!(order.chef, table.wallet.address());
        assert_eq!(order.difficulty.level(), 2);
        assert_eq!(TaggedBase64Codec.decode(&order.encoded_items), vec![2, 0, 1, 3]);

        advance(Duration::from_millis(1999)).await;
        table.controller.tick(Instant::now());
        assert!(table.controller.state().transaction.visible);

        advance(Duration::from_millis(1)).await;
        table.controller.tick(Instant::now());
        let state = table.controller.state();
        assert!(!state.transaction.visible);
        assert!(!state.show_order_modal);
        assert_eq!(state.draft.items, vec![0, 0, 0, 0]);
        assert_eq!(state.draft.difficulty, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_shows_error() {
        let mut table = connected_table(1).await;
        table.ledger.reject_next_writes(1);

        let err = table.controller.submit_order().await.unwrap_err();
        assert!(matches!(err, ControllerError::Sync(SyncError::Rejected(_))));

        let toast = &table.controller.state().transaction;
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Transaction rejected by user");

        advance(Duration::from_millis(2999)).await;
        table.controller.tick(Instant::now());
        assert!(table.controller.state().transaction.visible);

        advance(Duration::from_millis(1)).await;
        table.controller.tick(Instant::now());
        assert!(!table.controller.state().transaction.visible);
    }

    #[tokio::test]
    async fn test_unavailable_ledger_fails_submission() {
        let mut table = connected_table(1).await;
        table.ledger.set_available(false);

        table.controller.submit_order().await.unwrap_err();
        assert!(table
            .controller
            .state()
            .transaction
            .message
            .starts_with("Submission failed: "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_toast_survives_older_dismissal() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;

        advance(Duration::from_millis(1500)).await;
        table.ledger.reject_next_writes(1);
        table.controller.submit_order().await.unwrap_err();

        // The success dismissal falls due while the error toast is showing
        advance(Duration::from_millis(500)).await;
        table.controller.tick(Instant::now());
        assert_eq!(table.controller.state().transaction.kind, ToastKind::Error);
        assert!(table.controller.state().transaction.visible);
    }
}

mod status_changes {
    use super::*;

    #[tokio::test]
    async fn test_chef_completes_order_once() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 1, 0, 0], 1).await;
        let id = table.controller.state().orders[0].id.clone();

        table.controller.complete_order(&id).await.unwrap();
        let state = table.controller.state();
        assert_eq!(state.orders[0].status, OrderStatus::Completed);
        assert_eq!(state.transaction.message, "Order completed successfully!");

        assert_eq!(
            table.controller.fail_order(&id).await,
            Err(ControllerError::NotPending(id.clone()))
        );
    }

    #[tokio::test]
    async fn test_chef_fails_order() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[0, 0, 0, 1], 3).await;
        let id = table.controller.state().orders[0].id.clone();

        table.controller.fail_order(&id).await.unwrap();
        assert_eq!(table.controller.state().orders[0].status, OrderStatus::Failed);
        assert_eq!(
            table.controller.state().transaction.message,
            "Order marked as failed!"
        );
    }

    #[tokio::test]
    async fn test_other_player_cannot_change_status() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;
        let id = table.controller.state().orders[0].id.clone();

        let mut guest = controller(&table.ledger);
        guest.connect_wallet(
            Arc::new(LocalWallet::from_seed([2u8; 32], 31337)),
            Arc::new(table.ledger.clone()),
        );
        guest.init().await;

        assert_eq!(
            guest.complete_order(&id).await,
            Err(ControllerError::NotChef(id.clone()))
        );
        assert_eq!(guest.state().orders[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_chef_match_ignores_case() {
        let table = connected_table(1).await;
        let upper = table.wallet.address().to_uppercase().replacen("0X", "0x", 1);

        assert!(table.controller.is_chef(&upper));
        assert!(!table.controller.is_chef("0x0000000000000000000000000000000000000000"));
    }

    #[tokio::test]
    async fn test_missing_record_reports_failure() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;
        let id = table.controller.state().orders[0].id.clone();

        // Record vanished after the board was loaded
        table.ledger.raw_put(&id.record_key(), Vec::new());

        let err = table.controller.complete_order(&id).await.unwrap_err();
        assert_eq!(err, ControllerError::Sync(SyncError::NotFound(id)));

        let toast = &table.controller.state().transaction;
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.starts_with("Failed to complete order: Order not found"));
    }
}

mod reveal {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reveal_and_hide_selected_order() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[3, 1, 0, 2], 2).await;
        let id = table.controller.state().orders[0].id.clone();

        table.controller.select_order(&id).unwrap();
        assert!(table.controller.state().revealed_items.is_none());

        let shown = table.controller.toggle_reveal().await.unwrap();
        assert_eq!(shown, Some(vec![3, 1, 0, 2]));
        assert_eq!(table.controller.state().revealed_items, Some(vec![3, 1, 0, 2]));
        assert!(!table.controller.state().decrypting);

        let hidden = table.controller.toggle_reveal().await.unwrap();
        assert_eq!(hidden, None);
        assert!(table.controller.state().revealed_items.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_signature_keeps_items_hidden() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;
        let id = table.controller.state().orders[0].id.clone();
        table.controller.select_order(&id).unwrap();

        table.wallet.set_reject_signatures(true);
        let err = table.controller.toggle_reveal().await.unwrap_err();

        assert_eq!(err, ControllerError::Reveal(RevealError::Rejected));
        assert!(table.controller.state().revealed_items.is_none());
        assert_eq!(table.controller.reveal_phase(), RevealPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_order_hides_items() {
        let mut table = connected_table(1).await;
        place_order(&mut table.controller, &[1, 0, 0, 0], 1).await;
        let id = table.controller.state().orders[0].id.clone();

        table.controller.select_order(&id).unwrap();
        table.controller.toggle_reveal().await.unwrap();
        table.controller.close_order();

        assert!(table.controller.state().selected_order.is_none());
        assert!(table.controller.state().revealed_items.is_none());
        assert_eq!(table.controller.reveal_phase(), RevealPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wallet_connected_after_init_signs_its_chain() {
        let ledger = MemoryLedger::new();
        let mut controller = controller(&ledger);
        controller.init().await;

        let wallet = Arc::new(RecordingWallet {
            inner: LocalWallet::from_seed([5u8; 32], 11155111),
            messages: Mutex::new(Vec::new()),
        });
        controller.connect_wallet(wallet.clone(), Arc::new(ledger.clone()));
        place_order(&mut controller, &[1, 2, 0, 0], 1).await;

        let id = controller.state().orders[0].id.clone();
        controller.select_order(&id).unwrap();
        controller.toggle_reveal().await.unwrap();

        let messages = wallet.messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].lines().nth(2),
            Some("contractsChainId:11155111")
        );
    }

    #[tokio::test]
    async fn test_reveal_needs_selection() {
        let mut table = connected_table(1).await;
        assert_eq!(
            table.controller.toggle_reveal().await,
            Err(ControllerError::NoSelection)
        );
    }
}
