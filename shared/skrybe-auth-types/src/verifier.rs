use alloc::string::String;
use core::fmt;

use alloy_primitives::{Address, B256, U256};

use crate::request::{CreationRequest, RequestError};

/// Outcome of an accepted `createCollection`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationReceipt {
    pub collection_id: String,
    /// Address of the deployed (or derived) collection.
    pub collection: Address,
    pub requester: Address,
    /// Transaction hash, when the verifier is a live chain.
    pub tx_hash: Option<B256>,
}

/// Reasons a creation request is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreationError {
    /// Recovered signer is not the configured authorizer (or the signature is malformed).
    InvalidCreationSignature,
    InvalidRequest(RequestError),
    /// A collection with this id already exists.
    CollectionExists(String),
    /// The verifier cannot submit on behalf of this requester.
    RequesterUnavailable(Address),
    /// Opaque transport failure (including timeouts); never retried here.
    Transport(String),
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationError::InvalidCreationSignature => f.write_str("InvalidCreationSignature"),
            CreationError::InvalidRequest(e) => write!(f, "invalid creation request: {e}"),
            CreationError::CollectionExists(id) => write!(f, "collection `{id}` already exists"),
            CreationError::RequesterUnavailable(a) => {
                write!(f, "cannot submit on behalf of requester {a}")
            }
            CreationError::Transport(msg) => write!(f, "transport failure: {msg}"),
        }
    }
}

impl From<RequestError> for CreationError {
    fn from(e: RequestError) -> Self {
        CreationError::InvalidRequest(e)
    }
}

/// The party that checks an authorization and creates the collection.
///
/// Implemented by the in-process reference factory and by the JSON-RPC client.
pub trait CreationVerifier {
    /// Submit `request` on behalf of `requester` with the authorizer's `signature`.
    fn create_collection(
        &mut self,
        requester: Address,
        request: &CreationRequest,
        fee: U256,
        signature: &[u8],
    ) -> Result<CreationReceipt, CreationError>;

    /// Look up a created collection (`collections(string)`).
    fn collection_of(&self, collection_id: &str) -> Result<Option<Address>, CreationError>;
}
