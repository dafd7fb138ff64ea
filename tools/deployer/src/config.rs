//! Request and key loading for the CLI.

use std::{fs, path::Path};

use alloy_primitives::U256;
use anyhow::{anyhow, Context, Result};
use skrybe_auth_types::CreationRequest;
use time::OffsetDateTime;

/// 0.02 ether.
pub const DEFAULT_PRICE: u128 = 20_000_000_000_000_000;
pub const DEFAULT_MAX_SUPPLY: u64 = 10_000;
/// 0.00035 ether, forwarded to the ethscriber.
pub const ETHSCRIPTION_BASE_FEE: u128 = 350_000_000_000_000;

/// Request used when no request file is given: public sale, no whitelist, launching now.
pub fn default_request(collection_id: &str, launch_timestamp: u64) -> CreationRequest {
    CreationRequest {
        collection_id: collection_id.to_string(),
        price: U256::from(DEFAULT_PRICE),
        whitelist_price: U256::ZERO,
        max_supply: U256::from(DEFAULT_MAX_SUPPLY),
        max_per_txn: U256::ZERO,
        max_per_whitelist: U256::ZERO,
        max_per_wallet: U256::ZERO,
        uses_whitelist: 0,
        launch_timestamp: U256::from(launch_timestamp),
        whitelist_launch_timestamp: U256::ZERO,
    }
}

/// Load a request from a camelCase JSON file, or build the default one.
///
/// `collection_id` overrides the id in the file.
pub fn load_request(path: Option<&Path>, collection_id: Option<&str>) -> Result<CreationRequest> {
    let mut request = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading request {}", path.display()))?;
            serde_json::from_str::<CreationRequest>(&raw)
                .with_context(|| format!("failed parsing request JSON in {}", path.display()))?
        }
        None => {
            let id = collection_id
                .ok_or_else(|| anyhow!("provide --request or --collection-id"))?;
            let now = OffsetDateTime::now_utc().unix_timestamp().max(0) as u64;
            default_request(id, now)
        }
    };
    if let Some(id) = collection_id {
        request.collection_id = id.to_string();
    }
    request
        .validate()
        .map_err(|e| anyhow!("invalid creation request: {e}"))?;
    Ok(request)
}

/// Resolve a private key given inline or as a file path.
pub fn read_key(inline: Option<&str>, path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading key file {}", path.display()))?;
        return Ok(raw.trim().to_string());
    }
    inline
        .map(|k| k.trim().to_string())
        .ok_or_else(|| anyhow!("missing key: provide a key or a key file"))
}
