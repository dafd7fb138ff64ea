use alloy_primitives::{Address, FixedBytes, U256};
use alloy_sol_types::SolValue;
use log::debug;
use sha3::{Digest, Keccak256};
use skrybe_auth_types::{
    CollectionTerms, CreationRequest, PayloadEncoding, RequestError, RequestPayload, ACTION_CREATE,
};

use crate::bytes::{read_u256_be, WORD};
use crate::errors::EncodeError;

/// Number of `uint256` words in the terms payload.
pub const TERMS_FIELDS: usize = 6;
/// Byte length of ABI-encoded terms.
pub const TERMS_LEN: usize = TERMS_FIELDS * WORD;

const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub(crate) fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    FixedBytes(Keccak256::digest(bytes).into())
}

/// ABI-encode terms as six `uint256` words:
/// `(price, whitelistPrice, maxSupply, maxPerTxn, maxPerWhitelist, usesWhitelist)`.
pub fn encode_terms(terms: &CollectionTerms) -> Vec<u8> {
    let mut buf = Vec::with_capacity(TERMS_LEN);
    buf.extend_from_slice(&terms.price.to_be_bytes::<32>());
    buf.extend_from_slice(&terms.whitelist_price.to_be_bytes::<32>());
    buf.extend_from_slice(&terms.max_supply.to_be_bytes::<32>());
    buf.extend_from_slice(&terms.max_per_txn.to_be_bytes::<32>());
    buf.extend_from_slice(&terms.max_per_whitelist.to_be_bytes::<32>());
    buf.extend_from_slice(&U256::from(terms.uses_whitelist).to_be_bytes::<32>());
    buf
}

/// Build terms from a word list in payload order.
pub fn terms_from_words(words: &[U256]) -> Result<CollectionTerms, EncodeError> {
    let [price, whitelist_price, max_supply, max_per_txn, max_per_whitelist, flag] = words else {
        return Err(EncodeError::FieldCount {
            expected: TERMS_FIELDS,
            actual: words.len(),
        });
    };
    if *flag > U256::from(1u8) {
        return Err(EncodeError::FieldOutOfRange {
            field: "usesWhitelist",
        });
    }
    Ok(CollectionTerms {
        price: *price,
        whitelist_price: *whitelist_price,
        max_supply: *max_supply,
        max_per_txn: *max_per_txn,
        max_per_whitelist: *max_per_whitelist,
        uses_whitelist: if flag.is_zero() { 0 } else { 1 },
    })
}

/// Decode ABI-encoded terms. Trailing bytes are rejected.
pub fn decode_terms(bytes: &[u8]) -> Result<CollectionTerms, EncodeError> {
    if bytes.len() != TERMS_LEN {
        return Err(EncodeError::TermsLength {
            expected: TERMS_LEN,
            actual: bytes.len(),
        });
    }
    let mut i = 0usize;
    let mut words = Vec::with_capacity(TERMS_FIELDS);
    while let Some(word) = read_u256_be(bytes, &mut i) {
        words.push(word);
    }
    terms_from_words(&words)
}

/// Parse the `0x` hex text form of a terms payload.
pub fn decode_terms_hex(text: &str) -> Result<CollectionTerms, EncodeError> {
    let raw = text.strip_prefix("0x").ok_or(EncodeError::InvalidHex)?;
    let bytes = hex::decode(raw).map_err(|_| EncodeError::InvalidHex)?;
    decode_terms(&bytes)
}

/// Text form of a payload as it enters the message: the raw id, or `0x` + lowercase hex of the
/// ABI-encoded terms.
pub fn encode_payload(payload: &RequestPayload) -> String {
    match payload {
        RequestPayload::CollectionId(id) => id.clone(),
        RequestPayload::Terms(terms) => format!("0x{}", hex::encode(encode_terms(terms))),
    }
}

/// ABI-encode the parameter tuple `(address requester, string payload, string action)`.
pub fn encode_authorization_message(requester: Address, payload: &str, action_tag: &str) -> Vec<u8> {
    (requester, payload.to_string(), action_tag.to_string()).abi_encode_params()
}

/// Compute the authorization digest the authority signs and the factory recomputes.
///
/// `keccak256(abi.encode(requester, payload, actionTag))`
pub fn build_authorization_hash(
    requester: Address,
    payload: &RequestPayload,
    action_tag: &str,
) -> Result<FixedBytes<32>, EncodeError> {
    if action_tag.is_empty() {
        return Err(EncodeError::EmptyActionTag);
    }
    match payload {
        RequestPayload::CollectionId(id) if id.is_empty() => {
            return Err(RequestError::EmptyCollectionId.into());
        }
        RequestPayload::Terms(terms) if terms.uses_whitelist > 1 => {
            return Err(EncodeError::FieldOutOfRange {
                field: "usesWhitelist",
            });
        }
        _ => {}
    }

    let message = encode_authorization_message(requester, &encode_payload(payload), action_tag);
    let digest = keccak256_bytes(&message);
    debug!("authorization digest {digest} for requester {requester} ({action_tag})");
    Ok(digest)
}

/// Validate `request` and build its `CREATE` digest under the agreed payload encoding.
pub fn creation_digest(
    requester: Address,
    request: &CreationRequest,
    encoding: PayloadEncoding,
) -> Result<FixedBytes<32>, EncodeError> {
    request.validate()?;
    build_authorization_hash(requester, &encoding.payload_for(request), ACTION_CREATE)
}

/// Personal-message hash actually signed: `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
pub fn eth_signed_message_hash(digest: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    keccak256_bytes(&buf)
}
