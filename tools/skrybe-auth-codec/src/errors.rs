use skrybe_auth_types::RequestError;
use thiserror::Error;

/// Malformed codec input. Fatal: raised before any signing or network interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("invalid creation request: {0}")]
    InvalidRequest(RequestError),
    #[error("action tag must not be empty")]
    EmptyActionTag,
    #[error("terms payload has {actual} fields, expected {expected}")]
    FieldCount { expected: usize, actual: usize },
    #[error("terms payload must be {expected} bytes, got {actual}")]
    TermsLength { expected: usize, actual: usize },
    #[error("terms field `{field}` exceeds its declared range")]
    FieldOutOfRange { field: &'static str },
    #[error("terms payload is not 0x-prefixed hex")]
    InvalidHex,
}

impl From<RequestError> for EncodeError {
    fn from(e: RequestError) -> Self {
        EncodeError::InvalidRequest(e)
    }
}

/// Signature parsing / recovery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature must be 65 bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("malleable signature (high S value)")]
    MalleableSignature,
    #[error("invalid signature format")]
    InvalidFormat,
    #[error("failed to recover public key")]
    RecoveryFailed,
}
