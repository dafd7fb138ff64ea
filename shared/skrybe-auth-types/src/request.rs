use alloc::string::String;
use core::fmt;

use alloy_primitives::U256;

/// Action tag bound into every collection-creation authorization.
pub const ACTION_CREATE: &str = "CREATE";

/// Proposed collection, as submitted to the factory's `createCollection`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CreationRequest {
    /// Unique collection identifier (non-empty).
    pub collection_id: String,
    /// Public mint price in wei.
    pub price: U256,
    /// Whitelist mint price in wei.
    pub whitelist_price: U256,
    pub max_supply: U256,
    /// `0` means unlimited.
    pub max_per_txn: U256,
    /// `0` means unlimited.
    pub max_per_whitelist: U256,
    /// `0` means unlimited.
    pub max_per_wallet: U256,
    /// Boolean flag carried as `0`/`1`.
    pub uses_whitelist: u8,
    /// Unix seconds.
    pub launch_timestamp: U256,
    /// Unix seconds.
    pub whitelist_launch_timestamp: U256,
}

impl CreationRequest {
    /// Reject requests no verifier could accept.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.collection_id.is_empty() {
            return Err(RequestError::EmptyCollectionId);
        }
        if self.max_supply.is_zero() {
            return Err(RequestError::ZeroMaxSupply);
        }
        if self.uses_whitelist > 1 {
            return Err(RequestError::InvalidWhitelistFlag(self.uses_whitelist));
        }
        Ok(())
    }

    /// Numeric terms in struct-payload order.
    pub fn terms(&self) -> CollectionTerms {
        CollectionTerms {
            price: self.price,
            whitelist_price: self.whitelist_price,
            max_supply: self.max_supply,
            max_per_txn: self.max_per_txn,
            max_per_whitelist: self.max_per_whitelist,
            uses_whitelist: self.uses_whitelist,
        }
    }
}

/// Fixed-order numeric projection of a request, encoded as six `uint256` words:
/// `(price, whitelistPrice, maxSupply, maxPerTxn, maxPerWhitelist, usesWhitelist)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionTerms {
    pub price: U256,
    pub whitelist_price: U256,
    pub max_supply: U256,
    pub max_per_txn: U256,
    pub max_per_whitelist: U256,
    pub uses_whitelist: u8,
}

/// The request payload bound into an authorization message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestPayload {
    /// Raw collection identifier.
    CollectionId(String),
    /// ABI-encoded terms, carried as their `0x` hex text.
    Terms(CollectionTerms),
}

/// Which payload shape a signer/verifier pair agreed on.
///
/// Both sides must use the same variant; mixing them silently breaks verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    #[default]
    CollectionId,
    Terms,
}

impl PayloadEncoding {
    pub fn payload_for(&self, request: &CreationRequest) -> RequestPayload {
        match self {
            PayloadEncoding::CollectionId => {
                RequestPayload::CollectionId(request.collection_id.clone())
            }
            PayloadEncoding::Terms => RequestPayload::Terms(request.terms()),
        }
    }
}

/// Request-level validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    EmptyCollectionId,
    ZeroMaxSupply,
    /// `usesWhitelist` outside `{0, 1}`.
    InvalidWhitelistFlag(u8),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::EmptyCollectionId => f.write_str("collection id must not be empty"),
            RequestError::ZeroMaxSupply => f.write_str("max supply must be greater than zero"),
            RequestError::InvalidWhitelistFlag(v) => {
                write!(f, "uses-whitelist flag must be 0 or 1, got {v}")
            }
        }
    }
}
