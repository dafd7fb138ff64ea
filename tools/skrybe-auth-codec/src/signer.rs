//! Local secp256k1 signer for the designated authority.

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};
use skrybe_auth_types::{AuthorizingSigner, SignerError};

use crate::encoder::{eth_signed_message_hash, keccak256_bytes};

/// Authorizer key held in-process.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// Parse a 32-byte private key from hex, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self, SignerError> {
        let raw = key.trim();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        let bytes = hex::decode(raw).map_err(|_| SignerError::InvalidKey)?;
        let key = SigningKey::from_slice(&bytes).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self::new(key))
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

impl core::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl AuthorizingSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: FixedBytes<32>) -> Result<[u8; 65], SignerError> {
        sign_authorization(&self.key, digest)
    }
}

/// Ethereum address of a public key: last 20 bytes of `keccak256(x || y)`.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256_bytes(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Sign an authorization digest as a personal message and return `r || s || v` with v in {27, 28}.
pub fn sign_authorization(
    key: &SigningKey,
    digest: FixedBytes<32>,
) -> Result<[u8; 65], SignerError> {
    let prehash = eth_signed_message_hash(digest);
    let (mut signature, mut recovery_id) = key
        .sign_prehash_recoverable(prehash.as_slice())
        .map_err(|_| SignerError::SigningFailed)?;

    // Verifiers reject high-S signatures (EIP-2); flipping s flips the y parity.
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(out)
}
