//! Solidity ABI bindings for `SkrybeFactory`.
//!
//! Only the surface the tooling calls is declared here; the factory's event ABI is not modelled.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall, SolError, SolValue};
use skrybe_auth_types::CreationRequest;

sol! {
    /// `SkrybeFactory.CollectionRequest`, field order as declared on-chain.
    struct CollectionRequest {
        string collectionId;
        uint256 price;
        uint256 whitelistPrice;
        uint256 maxSupply;
        uint256 maxPerTxn;
        uint256 maxPerWhitelist;
        uint256 maxPerWallet;
        uint8 usesWhitelist;
        uint256 launchTimestamp;
        uint256 whitelistLaunchTimestamp;
    }

    interface ISkrybeFactory {
        function createCollection(CollectionRequest request, uint256 fee, bytes signature) external;
        function collections(string collectionId) external view returns (address);

        error InvalidCreationSignature();
    }
}

impl From<&CreationRequest> for CollectionRequest {
    fn from(r: &CreationRequest) -> Self {
        CollectionRequest {
            collectionId: r.collection_id.clone(),
            price: r.price,
            whitelistPrice: r.whitelist_price,
            maxSupply: r.max_supply,
            maxPerTxn: r.max_per_txn,
            maxPerWhitelist: r.max_per_whitelist,
            maxPerWallet: r.max_per_wallet,
            usesWhitelist: r.uses_whitelist,
            launchTimestamp: r.launch_timestamp,
            whitelistLaunchTimestamp: r.whitelist_launch_timestamp,
        }
    }
}

/// Calldata for `createCollection(request, fee, signature)`.
pub fn create_collection_calldata(request: &CreationRequest, fee: U256, signature: &[u8]) -> Vec<u8> {
    ISkrybeFactory::createCollectionCall {
        request: request.into(),
        fee,
        signature: Bytes::copy_from_slice(signature),
    }
    .abi_encode()
}

/// Calldata for `collections(collectionId)`.
pub fn collections_calldata(collection_id: &str) -> Vec<u8> {
    ISkrybeFactory::collectionsCall {
        collectionId: collection_id.to_string(),
    }
    .abi_encode()
}

pub fn decode_collections_return(data: &[u8]) -> Result<Address, alloy_sol_types::Error> {
    let ret = ISkrybeFactory::collectionsCall::abi_decode_returns(data, true)?;
    Ok(ret._0)
}

/// Constructor arguments `(address signer, address ethscriber)`, appended to the creation bytecode.
pub fn constructor_args(authorizer: Address, ethscriber: Address) -> Vec<u8> {
    (authorizer, ethscriber).abi_encode_params()
}

/// Whether revert data carries the `InvalidCreationSignature()` selector.
pub fn is_invalid_creation_signature(revert_data: &[u8]) -> bool {
    revert_data.starts_with(&ISkrybeFactory::InvalidCreationSignature::SELECTOR)
}
