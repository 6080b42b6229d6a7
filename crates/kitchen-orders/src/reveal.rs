//! Signature-gated ingredient reveal
//!
//! Before the ingredients of an order are shown, the player signs a
//! structured message with their wallet. The signature is not a decryption
//! key and is thrown away; it only gates the UI. After a short pause the
//! stored value is decoded with the order codec.
//!
//! ```text
//!   Idle ──reveal──► Signing ──signed──► Revealing ──delay──► Revealed(items)
//!     ▲                 │                                          │
//!     └────rejected─────┘◄──────────────toggle / hide──────────────┘
//! ```

use crate::config::RevealConfig;
use crate::error::RevealError;
use kitchen_core::{Clock, OrderCodec};
use kitchen_ledger::{ContractReader, WalletSigner};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Values embedded in the reveal signature request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureParams {
    /// Random public-key-like hex string
    pub public_key: String,

    pub contract_address: String,

    pub chain_id: u64,

    /// Start of the validity window, unix seconds
    pub start_timestamp: i64,

    pub duration_days: u32,
}

impl SignatureParams {
    /// Collect the parameters at startup. Missing contract address or chain
    /// id fall back to empty / zero.
    pub async fn prepare(
        reader: &dyn ContractReader,
        wallet: Option<&dyn WalletSigner>,
        clock: &dyn Clock,
        config: &RevealConfig,
    ) -> Self {
        let contract_address = match reader.address().await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Could not read contract address: {}", e);
                String::new()
            }
        };

        let chain_id = match wallet {
            Some(wallet) => wallet.chain_id().await.unwrap_or_else(|e| {
                tracing::warn!("Could not read chain id: {}", e);
                0
            }),
            None => 0,
        };

        Self {
            public_key: generate_public_key(config.public_key_hex_len),
            contract_address,
            chain_id,
            start_timestamp: clock.now_secs(),
            duration_days: config.duration_days,
        }
    }

    /// Text presented to the wallet
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.contract_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }
}

/// `0x` followed by `hex_len` random hex digits
pub fn generate_public_key(hex_len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    let digits: String = (0..hex_len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect();
    format!("0x{}", digits)
}

/// Current step of the reveal flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RevealPhase {
    #[default]
    Idle,
    Signing,
    Revealing,
    Revealed(Vec<i64>),
}

impl RevealPhase {
    pub fn revealed_items(&self) -> Option<&[i64]> {
        match self {
            Self::Revealed(items) => Some(items),
            _ => None,
        }
    }
}

/// Reveal state machine for one order detail view
pub struct RevealFlow {
    params: SignatureParams,
    codec: Arc<dyn OrderCodec>,
    delay: Duration,
    phase: watch::Sender<RevealPhase>,
}

impl RevealFlow {
    pub fn new(params: SignatureParams, codec: Arc<dyn OrderCodec>, config: &RevealConfig) -> Self {
        let (phase, _) = watch::channel(RevealPhase::Idle);
        Self {
            params,
            codec,
            delay: config.delay(),
            phase,
        }
    }

    pub fn params(&self) -> &SignatureParams {
        &self.params
    }

    /// Chain id announced in later signature requests
    pub fn set_chain_id(&mut self, chain_id: u64) {
        self.params.chain_id = chain_id;
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase.borrow().clone()
    }

    /// Watch phase changes
    pub fn subscribe(&self) -> watch::Receiver<RevealPhase> {
        self.phase.subscribe()
    }

    /// Signing or revealing in progress
    pub fn is_busy(&self) -> bool {
        matches!(
            *self.phase.borrow(),
            RevealPhase::Signing | RevealPhase::Revealing
        )
    }

    /// Ask for a signature, then decode `encoded`
    pub async fn reveal(
        &mut self,
        wallet: Option<&dyn WalletSigner>,
        encoded: &str,
    ) -> Result<Vec<i64>, RevealError> {
        let wallet = wallet.ok_or(RevealError::WalletUnavailable)?;

        self.set_phase(RevealPhase::Signing);
        if let Err(e) = wallet.sign_message(&self.params.message()).await {
            self.set_phase(RevealPhase::Idle);
            tracing::info!("Reveal cancelled: {}", e);
            return Err(e.into());
        }

        self.set_phase(RevealPhase::Revealing);
        tokio::time::sleep(self.delay).await;

        let items = self.codec.decode(encoded);
        self.set_phase(RevealPhase::Revealed(items.clone()));
        Ok(items)
    }

    /// Hide revealed items, or start a reveal. Returns the items when shown.
    pub async fn toggle(
        &mut self,
        wallet: Option<&dyn WalletSigner>,
        encoded: &str,
    ) -> Result<Option<Vec<i64>>, RevealError> {
        if matches!(*self.phase.borrow(), RevealPhase::Revealed(_)) {
            self.hide();
            return Ok(None);
        }
        self.reveal(wallet, encoded).await.map(Some)
    }

    /// Drop revealed items client-side
    pub fn hide(&mut self) {
        self.set_phase(RevealPhase::Idle);
    }

    fn set_phase(&self, phase: RevealPhase) {
        tracing::trace!(?phase, "reveal phase");
        self.phase.send_replace(phase);
    }
}
