//! JSON-RPC side: factory deployment and `createCollection` submission.
//!
//! Submissions are blocking: a current-thread runtime drives each request until the receipt
//! arrives or the timeout elapses. Nothing here retries.

use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, B256, U256};
use anyhow::{anyhow, Context, Result};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, MiddlewareError, Provider},
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Address as EthAddress, TransactionReceipt,
        TransactionRequest, U64,
    },
};
use log::{debug, info};
use skrybe_auth_codec::abi::{
    collections_calldata, constructor_args, create_collection_calldata,
    decode_collections_return, is_invalid_creation_signature,
};
use skrybe_auth_types::{CreationError, CreationReceipt, CreationRequest, CreationVerifier};
use tokio::runtime::Runtime;

use crate::deployments::FactoryDeployment;

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A funded account connected to a node.
pub struct Connection {
    runtime: Runtime,
    client: Arc<Client>,
    timeout: Duration,
}

impl Connection {
    /// Connect to `rpc_url` as the account holding `private_key`.
    pub fn open(rpc_url: &str, private_key: &str, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed building runtime")?;
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC URL `{rpc_url}`"))?;
        let chain_id = runtime
            .block_on(provider.get_chainid())
            .with_context(|| format!("failed querying chain id from {rpc_url}"))?;
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .context("invalid account private key")?
            .with_chain_id(chain_id.as_u64());
        debug!("connected to {rpc_url} (chain {chain_id}) as {:?}", wallet.address());

        Ok(Self {
            runtime,
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            timeout,
        })
    }

    /// The connected (sending) account.
    pub fn account(&self) -> Address {
        from_eth(self.client.address())
    }

    /// Deploy the factory's creation bytecode with constructor `(authorizer, ethscriber)`.
    pub fn deploy_factory(
        &self,
        bytecode: &[u8],
        authorizer: Address,
        ethscriber: Address,
    ) -> Result<FactoryDeployment> {
        let mut data = bytecode.to_vec();
        data.extend_from_slice(&constructor_args(authorizer, ethscriber));

        let receipt = self
            .send(TransactionRequest::new().data(data))
            .map_err(|e| anyhow!("factory deployment failed: {e}"))?;
        let address = receipt
            .contract_address
            .map(from_eth)
            .ok_or_else(|| anyhow!("deployment receipt has no contract address"))?;
        info!("deployed factory at {address}");

        Ok(FactoryDeployment {
            address,
            tx_hash: B256::from(receipt.transaction_hash.0),
            authorizer,
            ethscriber,
        })
    }

    /// Send a transaction and block until its receipt (or the timeout).
    fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt, CreationError> {
        let client = self.client.clone();
        let timeout = self.timeout;
        self.runtime.block_on(async move {
            let pending = client.send_transaction(tx, None).await.map_err(classify)?;
            let tx_hash = *pending;
            debug!("submitted {tx_hash:?}");

            let receipt = tokio::time::timeout(timeout, pending)
                .await
                .map_err(|_| {
                    CreationError::Transport(format!("no receipt for {tx_hash:?} within {timeout:?}"))
                })?
                .map_err(|e| CreationError::Transport(e.to_string()))?
                .ok_or_else(|| {
                    CreationError::Transport(format!("{tx_hash:?} dropped from the mempool"))
                })?;

            if receipt.status != Some(U64::from(1u64)) {
                return Err(CreationError::Transport(format!("{tx_hash:?} reverted")));
            }
            Ok(receipt)
        })
    }

    /// Read-only call.
    fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, CreationError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to_eth(to)).data(data).into();
        let client = self.client.clone();
        let timeout = self.timeout;
        self.runtime.block_on(async move {
            let out = tokio::time::timeout(timeout, client.call(&tx, None))
                .await
                .map_err(|_| CreationError::Transport(format!("eth_call timed out after {timeout:?}")))?
                .map_err(classify)?;
            Ok(out.to_vec())
        })
    }
}

/// Map a middleware error to a creation outcome: the factory's signature revert, or transport.
fn classify<E: MiddlewareError>(e: E) -> CreationError {
    let revert = e.as_error_response().and_then(|r| r.as_revert_data());
    let rejected = match revert {
        Some(data) => is_invalid_creation_signature(&data),
        None => e.to_string().contains("InvalidCreationSignature"),
    };
    if rejected {
        CreationError::InvalidCreationSignature
    } else {
        CreationError::Transport(e.to_string())
    }
}

/// `SkrybeFactory` reached over JSON-RPC.
pub struct RemoteFactory {
    connection: Connection,
    address: Address,
}

impl RemoteFactory {
    pub fn new(connection: Connection, address: Address) -> Self {
        Self {
            connection,
            address,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl CreationVerifier for RemoteFactory {
    fn create_collection(
        &mut self,
        requester: Address,
        request: &CreationRequest,
        fee: U256,
        signature: &[u8],
    ) -> Result<CreationReceipt, CreationError> {
        // msg.sender is whoever the connection signs as.
        if requester != self.connection.account() {
            return Err(CreationError::RequesterUnavailable(requester));
        }
        request.validate()?;

        let data = create_collection_calldata(request, fee, signature);
        let receipt = self
            .connection
            .send(TransactionRequest::new().to(to_eth(self.address)).data(data))?;

        let collection = self.collection_of(&request.collection_id)?.ok_or_else(|| {
            CreationError::Transport(format!(
                "collection `{}` not registered after creation",
                request.collection_id
            ))
        })?;
        info!(
            "collection `{}` created at {collection} (tx {:?})",
            request.collection_id, receipt.transaction_hash
        );

        Ok(CreationReceipt {
            collection_id: request.collection_id.clone(),
            collection,
            requester,
            tx_hash: Some(B256::from(receipt.transaction_hash.0)),
        })
    }

    fn collection_of(&self, collection_id: &str) -> Result<Option<Address>, CreationError> {
        let out = self
            .connection
            .call(self.address, collections_calldata(collection_id))?;
        let collection = decode_collections_return(&out)
            .map_err(|e| CreationError::Transport(format!("bad collections() return: {e}")))?;
        Ok((collection != Address::ZERO).then_some(collection))
    }
}

fn to_eth(address: Address) -> EthAddress {
    EthAddress::from_slice(address.as_slice())
}

fn from_eth(address: EthAddress) -> Address {
    Address::from_slice(address.as_bytes())
}

/// Creation bytecode from a compiled artifact: Hardhat (`"bytecode": "0x.."`) or Foundry
/// (`"bytecode": { "object": "0x.." }`).
pub fn artifact_bytecode(artifact: &serde_json::Value) -> Result<Vec<u8>> {
    let raw = artifact["bytecode"]
        .as_str()
        .or_else(|| artifact["bytecode"]["object"].as_str())
        .ok_or_else(|| anyhow!("artifact has no `bytecode`"))?;
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    if raw.is_empty() {
        return Err(anyhow!("artifact bytecode is empty (abstract contract or interface?)"));
    }
    hex::decode(raw).context("artifact bytecode is not valid hex")
}
