//! Shared types for Skrybe collection-creation authorization (signer + verifier side).

#![no_std]

extern crate alloc;

pub mod authorizer;
pub mod request;
pub mod verifier;

pub use authorizer::{AuthorizingSigner, SignerError};
pub use request::{
    CollectionTerms, CreationRequest, PayloadEncoding, RequestError, RequestPayload, ACTION_CREATE,
};
pub use verifier::{CreationError, CreationReceipt, CreationVerifier};
