//! In-process reference verifier.
//!
//! Behaves like the factory's admission path for `createCollection`, without a chain:
//! request validation, authorization check, duplicate-id rejection, and a creation event.
//! Useful for exercising signer tooling off-chain.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use log::info;
use skrybe_auth_types::{
    CreationError, CreationReceipt, CreationRequest, CreationVerifier, PayloadEncoding,
};

use crate::{
    encoder::{creation_digest, keccak256_bytes},
    errors::EncodeError,
    recover::verify_authorization,
};

/// Events recorded by [`LocalFactory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactoryEvent {
    CollectionCreated {
        collection_id: String,
        collection: Address,
        creator: Address,
    },
}

/// A created collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionRecord {
    pub address: Address,
    pub creator: Address,
    pub request: CreationRequest,
    /// Ethscription fee attached at creation.
    pub fee: U256,
}

pub struct LocalFactory {
    address: Address,
    authorizer: Address,
    ethscriber: Address,
    encoding: PayloadEncoding,
    collections: BTreeMap<String, CollectionRecord>,
    events: Vec<FactoryEvent>,
}

impl LocalFactory {
    /// Factory at `address` trusting `authorizer`, with the default payload encoding.
    pub fn new(address: Address, authorizer: Address, ethscriber: Address) -> Self {
        Self {
            address,
            authorizer,
            ethscriber,
            encoding: PayloadEncoding::default(),
            collections: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Recompute digests with `encoding` instead of the default.
    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn authorizer(&self) -> Address {
        self.authorizer
    }

    pub fn ethscriber(&self) -> Address {
        self.ethscriber
    }

    pub fn events(&self) -> &[FactoryEvent] {
        &self.events
    }

    pub fn record(&self, collection_id: &str) -> Option<&CollectionRecord> {
        self.collections.get(collection_id)
    }
}

impl CreationVerifier for LocalFactory {
    fn create_collection(
        &mut self,
        requester: Address,
        request: &CreationRequest,
        fee: U256,
        signature: &[u8],
    ) -> Result<CreationReceipt, CreationError> {
        let digest = creation_digest(requester, request, self.encoding).map_err(|e| match e {
            EncodeError::InvalidRequest(r) => CreationError::InvalidRequest(r),
            // Validated requests always encode; anything else is a bad signature input.
            _ => CreationError::InvalidCreationSignature,
        })?;
        verify_authorization(digest, signature, self.authorizer)?;

        if self.collections.contains_key(&request.collection_id) {
            return Err(CreationError::CollectionExists(request.collection_id.clone()));
        }

        let collection = collection_address(self.address, &request.collection_id);
        self.collections.insert(
            request.collection_id.clone(),
            CollectionRecord {
                address: collection,
                creator: requester,
                request: request.clone(),
                fee,
            },
        );
        self.events.push(FactoryEvent::CollectionCreated {
            collection_id: request.collection_id.clone(),
            collection,
            creator: requester,
        });
        info!(
            "collection `{}` created at {collection} for {requester}",
            request.collection_id
        );

        Ok(CreationReceipt {
            collection_id: request.collection_id.clone(),
            collection,
            requester,
            tx_hash: None,
        })
    }

    fn collection_of(&self, collection_id: &str) -> Result<Option<Address>, CreationError> {
        Ok(self.collections.get(collection_id).map(|r| r.address))
    }
}

/// Deterministic collection address = last 20 bytes of keccak256(factory || collectionId).
pub fn collection_address(factory: Address, collection_id: &str) -> Address {
    let mut buf = Vec::with_capacity(20 + collection_id.len());
    buf.extend_from_slice(factory.as_slice());
    buf.extend_from_slice(collection_id.as_bytes());
    let hash = keccak256_bytes(&buf);
    Address::from_slice(&hash[12..])
}
