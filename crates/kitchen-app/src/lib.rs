//! # Kitchen App
//!
//! Client-side state for the Kitchen cooking game.
//!
//! The page state lives in a single [`ViewState`] value owned by
//! [`KitchenController`]. Each user action is a controller method that
//! talks to the order store or the reveal flow and then updates the state.
//! Time-based effects (toast dismissal, modal close, button animation) are
//! queued and applied by [`KitchenController::tick`].
//!
//! ```text
//!   user action ──► KitchenController ──► OrderStore ──► contract
//!                        │      ▲              │
//!                        │      └── reload ◄───┘
//!                        ▼
//!                    ViewState ──► renderer (CLI, UI shell)
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod menu;

pub use config::{AppConfig, LedgerSettings, LoggingConfig, UiConfig, WalletSettings};
pub use controller::{KitchenController, NewOrderDraft, Tab, ToastKind, TransactionStatus, ViewState};
pub use error::ControllerError;
pub use menu::{FoodItem, TutorialStep, FOOD_ITEMS, TUTORIAL_STEPS};
