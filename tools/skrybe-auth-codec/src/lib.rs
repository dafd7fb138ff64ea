//! Off-chain authorization codec for `SkrybeFactory.createCollection`.
//!
//! The authority signs `keccak256(abi.encode(requester, payload, "CREATE"))` as a personal
//! message; the factory recomputes the digest and accepts only the configured authorizer.

pub mod abi;
pub mod bytes;
pub mod encoder;
pub mod errors;
pub mod factory;
pub mod recover;
pub mod signer;

#[cfg(test)]
mod tests;

pub use encoder::{
    build_authorization_hash, creation_digest, encode_payload, encode_terms,
    eth_signed_message_hash,
};
pub use errors::{EncodeError, SignatureError};
pub use factory::{FactoryEvent, LocalFactory};
pub use recover::{recover_signer, verify_authorization};
pub use signer::LocalSigner;
pub use skrybe_auth_types::*;
