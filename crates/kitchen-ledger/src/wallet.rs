//! Wallet signing interface and a local ed25519 wallet

use crate::error::WalletError;
use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Raw signature bytes returned by a wallet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSignature(pub Vec<u8>);

impl fmt::Display for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// A connected wallet able to sign plain-text messages
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Account address, 0x-prefixed hex
    fn address(&self) -> String;

    /// Chain the wallet is connected to
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the user to sign `message`
    async fn sign_message(&self, message: &str) -> Result<WalletSignature, WalletError>;
}

/// Software wallet holding an ed25519 key
pub struct LocalWallet {
    signing_key: SigningKey,
    address: String,
    chain_id: u64,
    reject_signatures: AtomicBool,
}

impl LocalWallet {
    pub fn from_seed(seed: [u8; 32], chain_id: u64) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = derive_address(signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            address,
            chain_id,
            reject_signatures: AtomicBool::new(false),
        }
    }

    /// Fresh random key
    pub fn random(chain_id: u64) -> Self {
        Self::from_seed(rand::random(), chain_id)
    }

    /// Key from a 64-character hex seed
    pub fn from_hex(seed_hex: &str, chain_id: u64) -> Result<Self, WalletError> {
        let bytes = hex::decode(seed_hex.trim().trim_start_matches("0x"))
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| WalletError::InvalidKey("seed must be 32 bytes".to_string()))?;
        Ok(Self::from_seed(seed, chain_id))
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Simulate the user declining every signature prompt
    pub fn set_reject_signatures(&self, reject: bool) {
        self.reject_signatures.store(reject, Ordering::SeqCst);
    }

    /// Check a signature produced by this wallet
    pub fn verify(&self, message: &str, signature: &WalletSignature) -> bool {
        match Signature::from_slice(&signature.0) {
            Ok(sig) => self
                .signing_key
                .verifying_key()
                .verify(message.as_bytes(), &sig)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// 20-byte address from the tail of the public key hash
fn derive_address(public_key: &[u8]) -> String {
    let hash = blake3::hash(public_key);
    format!("0x{}", hex::encode(&hash.as_bytes()[12..]))
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    async fn sign_message(&self, message: &str) -> Result<WalletSignature, WalletError> {
        if self.reject_signatures.load(Ordering::SeqCst) {
            tracing::debug!("Signature request declined");
            return Err(WalletError::Rejected);
        }
        let signature = self.signing_key.sign(message.as_bytes());
        Ok(WalletSignature(signature.to_bytes().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_shape() {
        let wallet = LocalWallet::from_seed([7u8; 32], 1);
        let address = wallet.address();

        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert_eq!(address, LocalWallet::from_seed([7u8; 32], 1).address());
    }

    #[test]
    fn test_hex_seed_roundtrip() {
        let wallet = LocalWallet::random(11155111);
        let restored = LocalWallet::from_hex(&wallet.seed_hex(), 11155111).unwrap();
        assert_eq!(wallet.address(), restored.address());

        assert!(LocalWallet::from_hex("abcd", 1).is_err());
        assert!(LocalWallet::from_hex("zz", 1).is_err());
    }

    #[tokio::test]
    async fn test_sign_and_verify() {
        let wallet = LocalWallet::from_seed([1u8; 32], 31337);
        let signature = wallet.sign_message("publickey:0xabc").await.unwrap();

        assert_eq!(signature.0.len(), 64);
        assert!(wallet.verify("publickey:0xabc", &signature));
        assert!(!wallet.verify("publickey:0xabd", &signature));
        assert_eq!(wallet.chain_id().await.unwrap(), 31337);
    }

    #[tokio::test]
    async fn test_rejection() {
        let wallet = LocalWallet::from_seed([1u8; 32], 1);
        wallet.set_reject_signatures(true);
        assert_eq!(wallet.sign_message("hi").await, Err(WalletError::Rejected));
    }
}
