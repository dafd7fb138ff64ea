//! Deployments ledger (eg `deployments.devnet.json`).
//!
//! Layout:
//! `{ "network", "updated_at", "deployments": { <key>: { "address", "tx_hash", ... } } }`

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// A factory deployment as recorded in the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryDeployment {
    pub address: Address,
    pub tx_hash: B256,
    pub authorizer: Address,
    pub ethscriber: Address,
}

/// Insert or replace `deployments[contract_key]`, preserving unrelated entries.
pub fn record_deployment(
    path: &Path,
    network: &str,
    contract_key: &str,
    rpc_url: &str,
    deployment: &FactoryDeployment,
) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let mut root = read_ledger(path)?;

    root["network"] = json!(network);
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    root["deployments"][contract_key] = json!({
        "address": deployment.address.to_string(),
        "tx_hash": deployment.tx_hash.to_string(),
        "authorizer": deployment.authorizer.to_string(),
        "ethscriber": deployment.ethscriber.to_string(),
        "rpc_url": rpc_url,
        "deployed_at": now,
    });

    write_json_atomic(path, &root)
}

/// Address stored under `deployments[contract_key]`, if any.
pub fn recorded_address(path: &Path, contract_key: &str) -> Result<Option<Address>> {
    if !path.exists() {
        return Ok(None);
    }
    let root = read_ledger(path)?;
    let Some(raw) = root["deployments"][contract_key]["address"].as_str() else {
        return Ok(None);
    };
    let address = raw
        .parse::<Address>()
        .with_context(|| format!("bad address `{raw}` for `{contract_key}` in {}", path.display()))?;
    Ok(Some(address))
}

fn read_ledger(path: &Path) -> Result<Value> {
    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?
    } else {
        String::new()
    };

    let root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?
    };

    Ok(if root.is_object() { root } else { json!({}) })
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
