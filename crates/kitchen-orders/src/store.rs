//! Order store synchronization
//!
//! Loads the order index and records from the contract, creates new orders
//! and rewrites order status. The local copy is never patched in place:
//! callers reload with [`OrderStore::load_all`] after every mutation.

use crate::config::{IndexWriteMode, SyncConfig};
use crate::error::SyncError;
use kitchen_core::record::{encode_index, parse_index, with_status};
use kitchen_core::{
    Clock, Difficulty, OrderCodec, OrderId, OrderRecord, OrderStatus, StoredOrder, SystemClock,
    TaggedBase64Codec, ORDER_INDEX_KEY,
};
use kitchen_ledger::{ContractReader, ContractWriter, LedgerError};
use std::sync::Arc;

/// Client-side order store over a contract key-value ledger
pub struct OrderStore {
    /// Read-only contract client
    reader: Arc<dyn ContractReader>,

    /// Signer-bound client, absent until a wallet is connected
    signer: Option<Arc<dyn ContractWriter>>,

    /// Ingredient codec
    codec: Arc<dyn OrderCodec>,

    clock: Arc<dyn Clock>,

    config: SyncConfig,
}

impl OrderStore {
    /// Create a read-only store with the default codec and system clock
    pub fn new(reader: Arc<dyn ContractReader>) -> Self {
        Self {
            reader,
            signer: None,
            codec: Arc::new(TaggedBase64Codec),
            clock: Arc::new(SystemClock),
            config: SyncConfig::default(),
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn ContractWriter>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn OrderCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach or detach the signer-bound client
    pub fn set_signer(&mut self, signer: Option<Arc<dyn ContractWriter>>) {
        self.signer = signer;
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    pub fn reader(&self) -> &Arc<dyn ContractReader> {
        &self.reader
    }

    pub fn codec(&self) -> Arc<dyn OrderCodec> {
        Arc::clone(&self.codec)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Load every order listed in the index, newest first.
    ///
    /// An unavailable ledger yields an empty list. Records that are missing,
    /// unreadable or malformed are skipped; ties in `created_at` keep index
    /// order.
    pub async fn load_all(&self) -> Vec<OrderRecord> {
        match self.reader.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Contract not available, no orders loaded");
                return Vec::new();
            }
            Err(e) => {
                tracing::debug!("Availability check failed: {}", e);
                return Vec::new();
            }
        }

        let index_bytes = match self.reader.get_data(ORDER_INDEX_KEY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Error loading order keys: {}", e);
                return Vec::new();
            }
        };
        let ids = match parse_index(&index_bytes) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Error parsing order keys: {}", e);
                Vec::new()
            }
        };

        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            let bytes = match self.reader.get_data(&id.record_key()).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Error loading order {}: {}", id, e);
                    continue;
                }
            };
            if bytes.is_empty() {
                continue;
            }
            match StoredOrder::from_bytes(&bytes) {
                Ok(stored) => orders.push(stored.into_record(id)),
                Err(e) => tracing::warn!("Error parsing order data for {}: {}", id, e),
            }
        }

        // Stable sort keeps index order for equal timestamps
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!("Loaded {} orders", orders.len());
        orders
    }

    /// Encode `items`, store a new pending order and append it to the index.
    ///
    /// The record is written before the index. If the index write fails the
    /// record stays on the ledger unreferenced.
    pub async fn create(
        &self,
        chef: &str,
        difficulty: Difficulty,
        items: &[i64],
    ) -> Result<OrderRecord, SyncError> {
        let signer = self.signer()?;

        let record = OrderRecord {
            id: OrderId::generate(self.clock.now_millis()),
            encoded_items: self.codec.encode(items),
            created_at: self.clock.now_secs(),
            chef: chef.to_string(),
            status: OrderStatus::Pending,
            difficulty,
        };

        let receipt = signer
            .set_data(
                &record.id.record_key(),
                StoredOrder::from_record(&record).to_bytes(),
            )
            .await?;
        tracing::debug!("Order record {} written in {}", record.id, receipt.tx_hash);

        self.append_to_index(signer.as_ref(), &record.id).await?;

        tracing::info!(
            "Order {} created by {} (difficulty {})",
            record.id,
            chef,
            difficulty.level()
        );
        Ok(record)
    }

    /// Overwrite the status of an existing order.
    ///
    /// Any status may replace any other; no ownership check is made.
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), SyncError> {
        let signer = self.signer()?;

        let key = id.record_key();
        let bytes = signer.get_data(&key).await?;
        if bytes.is_empty() {
            return Err(SyncError::NotFound(id.clone()));
        }

        let updated = with_status(&bytes, status)?;
        signer.set_data(&key, updated).await?;

        tracing::info!("Order {} marked {}", id, status);
        Ok(())
    }

    fn signer(&self) -> Result<Arc<dyn ContractWriter>, SyncError> {
        self.signer.clone().ok_or(SyncError::SignerUnavailable)
    }

    async fn append_to_index(
        &self,
        signer: &dyn ContractWriter,
        id: &OrderId,
    ) -> Result<(), SyncError> {
        match self.config.index_write {
            IndexWriteMode::Overwrite => {
                let bytes = signer.get_data(ORDER_INDEX_KEY).await?;
                let mut ids = parse_index_lenient(&bytes);
                ids.push(id.clone());
                signer.set_data(ORDER_INDEX_KEY, encode_index(&ids)).await?;
                Ok(())
            }
            IndexWriteMode::Conditional => {
                let mut attempts = 0;
                loop {
                    attempts += 1;
                    let current = signer.get_versioned(ORDER_INDEX_KEY).await?;
                    let mut ids = parse_index_lenient(&current.value);
                    ids.push(id.clone());

                    match signer
                        .set_data_if_version(ORDER_INDEX_KEY, encode_index(&ids), current.version)
                        .await
                    {
                        Ok(_) => return Ok(()),
                        Err(LedgerError::VersionConflict { actual, .. })
                            if attempts <= self.config.conflict_retries =>
                        {
                            tracing::warn!(
                                "Order index moved to version {} during append of {}, retrying",
                                actual,
                                id
                            );
                        }
                        Err(LedgerError::VersionConflict { .. }) => {
                            return Err(SyncError::IndexConflict { attempts });
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }
}

/// An unreadable index is treated as empty, so the append starts a new one
fn parse_index_lenient(bytes: &[u8]) -> Vec<OrderId> {
    parse_index(bytes).unwrap_or_else(|e| {
        tracing::warn!("Error parsing keys: {}", e);
        Vec::new()
    })
}
