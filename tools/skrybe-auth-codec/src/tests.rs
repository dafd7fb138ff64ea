#[cfg(test)]
mod tests {
    use crate::abi::{
        collections_calldata, constructor_args, create_collection_calldata,
        decode_collections_return, is_invalid_creation_signature, ISkrybeFactory,
    };
    use crate::encoder::{
        build_authorization_hash, decode_terms, decode_terms_hex, encode_authorization_message,
        encode_payload, encode_terms, eth_signed_message_hash, terms_from_words, TERMS_LEN,
    };
    use crate::errors::{EncodeError, SignatureError};
    use crate::recover::{recover_signer, verify_authorization};
    use crate::signer::{address_of, sign_authorization, LocalSigner};
    use alloy_primitives::{address, b256, Address, U256};
    use alloy_sol_types::{sol, SolCall, SolError};
    use skrybe_auth_types::{
        AuthorizingSigner, CollectionTerms, CreationError, CreationRequest, RequestError,
        RequestPayload, ACTION_CREATE,
    };

    // Hardhat development accounts #2 (authorizer) and #3 (requester).
    const AUTHORIZER_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";
    const AUTHORIZER: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
    const USER_KEY: &str = "7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6";
    const USER: Address = address!("90F79bf6EB2c4f870365E785982E1f101E93b906");

    const PRICE: u128 = 20_000_000_000_000_000; // 0.02 ether

    sol! {
        function authorize(address requester, string payload, string action) external;
    }

    fn terms() -> CollectionTerms {
        CollectionTerms {
            price: U256::from(PRICE),
            whitelist_price: U256::ZERO,
            max_supply: U256::from(10_000u64),
            max_per_txn: U256::ZERO,
            max_per_whitelist: U256::ZERO,
            uses_whitelist: 0,
        }
    }

    fn id_payload(id: &str) -> RequestPayload {
        RequestPayload::CollectionId(id.to_string())
    }

    #[test]
    fn test_encode_authorization_message_layout() {
        let encoded = encode_authorization_message(USER, "test", ACTION_CREATE);

        // address (32) + 2 offsets (64) + "test" tail (64) + "CREATE" tail (64)
        assert_eq!(encoded.len(), 224);
        assert_eq!(&encoded[12..32], USER.as_slice());
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(96u64));
        assert_eq!(U256::from_be_slice(&encoded[64..96]), U256::from(160u64));
        assert_eq!(U256::from_be_slice(&encoded[96..128]), U256::from(4u64));
        assert_eq!(&encoded[128..132], b"test");
        assert_eq!(U256::from_be_slice(&encoded[160..192]), U256::from(6u64));
        assert_eq!(&encoded[192..198], b"CREATE");
    }

    #[test]
    fn test_encode_authorization_message_matches_sol_abi() {
        let payload = encode_payload(&RequestPayload::Terms(terms()));
        for p in ["test", "", "test-collection-id", payload.as_str()] {
            let call = authorizeCall {
                requester: USER,
                payload: p.to_string(),
                action: ACTION_CREATE.to_string(),
            };
            assert_eq!(
                encode_authorization_message(USER, p, ACTION_CREATE),
                call.abi_encode()[4..].to_vec()
            );
        }
    }

    #[test]
    fn test_build_authorization_hash_known_vectors() {
        let digest = build_authorization_hash(USER, &id_payload("test"), ACTION_CREATE).unwrap();
        assert_eq!(
            digest,
            b256!("ee85817fa5f9587c6103a8c0a570b7075f54e104b1875f23de68a3a95fcfb9c3")
        );
        assert_eq!(
            eth_signed_message_hash(digest),
            b256!("7f8e343148773bfa76a2600ef7f17bfd67985e4b52c31ff1fd428a1011ce37c3")
        );

        let digest =
            build_authorization_hash(USER, &id_payload("test-collection-id"), ACTION_CREATE)
                .unwrap();
        assert_eq!(
            digest,
            b256!("f64f03d3c423519cdcc15ebf50db6cb46fe76ef4a57b51c3e926065cdaf08024")
        );

        let digest =
            build_authorization_hash(USER, &RequestPayload::Terms(terms()), ACTION_CREATE)
                .unwrap();
        assert_eq!(
            digest,
            b256!("6cc5e3cac5472b7a874ffa85eb2dbce2c030d6b4965b917a51199eea80447caa")
        );
    }

    #[test]
    fn test_build_authorization_hash_is_deterministic() {
        let a = build_authorization_hash(USER, &RequestPayload::Terms(terms()), ACTION_CREATE);
        let b = build_authorization_hash(USER, &RequestPayload::Terms(terms()), ACTION_CREATE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_terms_field_changes_digest() {
        let base = build_authorization_hash(USER, &RequestPayload::Terms(terms()), ACTION_CREATE)
            .unwrap();
        let one = U256::from(1u64);
        let variants: Vec<CollectionTerms> = vec![
            // 0.02 -> 0.021 ether
            CollectionTerms { price: U256::from(21_000_000_000_000_000u128), ..terms() },
            CollectionTerms { whitelist_price: one, ..terms() },
            CollectionTerms { max_supply: U256::from(10_001u64), ..terms() },
            CollectionTerms { max_per_txn: one, ..terms() },
            CollectionTerms { max_per_whitelist: one, ..terms() },
            CollectionTerms { uses_whitelist: 1, ..terms() },
        ];
        for t in variants {
            let d = build_authorization_hash(USER, &RequestPayload::Terms(t.clone()), ACTION_CREATE)
                .unwrap();
            assert_ne!(d, base, "digest unchanged for {t:?}");
        }

        let other_requester = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let d = build_authorization_hash(other_requester, &RequestPayload::Terms(terms()), ACTION_CREATE)
            .unwrap();
        assert_ne!(d, base);
        let d = build_authorization_hash(USER, &RequestPayload::Terms(terms()), "UPDATE").unwrap();
        assert_ne!(d, base);
    }

    #[test]
    fn test_build_authorization_hash_rejects_malformed_input() {
        assert_eq!(
            build_authorization_hash(USER, &id_payload("test"), ""),
            Err(EncodeError::EmptyActionTag)
        );
        assert_eq!(
            build_authorization_hash(USER, &id_payload(""), ACTION_CREATE),
            Err(EncodeError::InvalidRequest(RequestError::EmptyCollectionId))
        );
        let bad = CollectionTerms { uses_whitelist: 2, ..terms() };
        assert_eq!(
            build_authorization_hash(USER, &RequestPayload::Terms(bad), ACTION_CREATE),
            Err(EncodeError::FieldOutOfRange { field: "usesWhitelist" })
        );
    }

    #[test]
    fn test_terms_encoding() {
        let encoded = encode_terms(&terms());
        assert_eq!(encoded.len(), TERMS_LEN);
        assert_eq!(U256::from_be_slice(&encoded[0..32]), U256::from(PRICE));
        assert_eq!(U256::from_be_slice(&encoded[64..96]), U256::from(10_000u64));
        assert_eq!(decode_terms(&encoded), Ok(terms()));

        let text = encode_payload(&RequestPayload::Terms(terms()));
        assert_eq!(text.len(), 2 + 2 * TERMS_LEN);
        assert!(text.starts_with("0x00"));
        assert_eq!(decode_terms_hex(&text), Ok(terms()));
        assert_eq!(decode_terms_hex(&text[2..]), Err(EncodeError::InvalidHex));
    }

    #[test]
    fn test_terms_decoding_rejects_bad_shapes() {
        let mut encoded = encode_terms(&terms());
        encoded.push(0);
        assert_eq!(
            decode_terms(&encoded),
            Err(EncodeError::TermsLength { expected: TERMS_LEN, actual: TERMS_LEN + 1 })
        );

        let mut encoded = encode_terms(&terms());
        encoded[TERMS_LEN - 1] = 2;
        assert_eq!(
            decode_terms(&encoded),
            Err(EncodeError::FieldOutOfRange { field: "usesWhitelist" })
        );

        let words = [U256::ZERO; 5];
        assert_eq!(
            terms_from_words(&words),
            Err(EncodeError::FieldCount { expected: 6, actual: 5 })
        );
    }

    #[test]
    fn test_local_signer_address() {
        let authorizer = LocalSigner::from_hex(AUTHORIZER_KEY).unwrap();
        assert_eq!(authorizer.address(), AUTHORIZER);
        assert_eq!(address_of(authorizer.signing_key().verifying_key()), AUTHORIZER);
        let user = LocalSigner::from_hex(USER_KEY).unwrap();
        assert_eq!(user.address(), USER);

        assert!(LocalSigner::from_hex("0xzz").is_err());
        assert!(LocalSigner::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_sign_and_recover() {
        let authorizer = LocalSigner::from_hex(AUTHORIZER_KEY).unwrap();
        let digest = build_authorization_hash(USER, &id_payload("test"), ACTION_CREATE).unwrap();
        let sig = authorizer.sign_digest(digest).unwrap();

        assert!(sig[64] == 27 || sig[64] == 28);
        assert_eq!(recover_signer(digest, &sig), Ok(AUTHORIZER));
        assert_eq!(verify_authorization(digest, &sig, AUTHORIZER), Ok(()));

        // RFC 6979: same key + digest always yields the same signature.
        assert_eq!(authorizer.sign_digest(digest).unwrap(), sig);
        assert_eq!(sign_authorization(authorizer.signing_key(), digest).unwrap(), sig);

        // v in {0, 1} is accepted as well.
        let mut compact_v = sig;
        compact_v[64] -= 27;
        assert_eq!(recover_signer(digest, &compact_v), Ok(AUTHORIZER));
    }

    #[test]
    fn test_verify_rejects_wrong_signer_and_tampering() {
        let user = LocalSigner::from_hex(USER_KEY).unwrap();
        let digest = build_authorization_hash(USER, &id_payload("test"), ACTION_CREATE).unwrap();
        let sig = user.sign_digest(digest).unwrap();
        assert_eq!(
            verify_authorization(digest, &sig, AUTHORIZER),
            Err(CreationError::InvalidCreationSignature)
        );

        let authorizer = LocalSigner::from_hex(AUTHORIZER_KEY).unwrap();
        let sig = authorizer.sign_digest(digest).unwrap();
        let tampered =
            build_authorization_hash(USER, &id_payload("test2"), ACTION_CREATE).unwrap();
        assert_eq!(
            verify_authorization(tampered, &sig, AUTHORIZER),
            Err(CreationError::InvalidCreationSignature)
        );
    }

    #[test]
    fn test_recover_rejects_malformed_signatures() {
        let authorizer = LocalSigner::from_hex(AUTHORIZER_KEY).unwrap();
        let digest = build_authorization_hash(USER, &id_payload("test"), ACTION_CREATE).unwrap();
        let sig = authorizer.sign_digest(digest).unwrap();

        assert_eq!(recover_signer(digest, &sig[..64]), Err(SignatureError::InvalidLength(64)));

        let mut bad_v = sig;
        bad_v[64] = 29;
        assert_eq!(recover_signer(digest, &bad_v), Err(SignatureError::InvalidRecoveryId(29)));

        let zero = [0u8; 65];
        assert_eq!(
            verify_authorization(digest, &zero, AUTHORIZER),
            Err(CreationError::InvalidCreationSignature)
        );

        // Flip s to n - s (the malleable twin) and the parity with it.
        let n = U256::from_be_slice(&hex_literal(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        ));
        let s = U256::from_be_slice(&sig[32..64]);
        let mut high_s = sig;
        high_s[32..64].copy_from_slice(&(n - s).to_be_bytes::<32>());
        high_s[64] = if sig[64] == 27 { 28 } else { 27 };
        assert_eq!(recover_signer(digest, &high_s), Err(SignatureError::MalleableSignature));
    }

    fn hex_literal(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn test_abi_bindings() {
        assert_eq!(ISkrybeFactory::InvalidCreationSignature::SELECTOR, [0xd3, 0xbe, 0xea, 0x48]);
        assert!(is_invalid_creation_signature(&[0xd3, 0xbe, 0xea, 0x48]));
        assert!(!is_invalid_creation_signature(&[0x08, 0xc3, 0x79, 0xa0]));

        let calldata = collections_calldata("test");
        assert_eq!(&calldata[..4], &[0x66, 0xe5, 0x4d, 0x7b]);

        let mut ret = vec![0u8; 32];
        ret[12..].copy_from_slice(AUTHORIZER.as_slice());
        assert_eq!(decode_collections_return(&ret).unwrap(), AUTHORIZER);

        let args = constructor_args(AUTHORIZER, USER);
        assert_eq!(args.len(), 64);
        assert_eq!(&args[12..32], AUTHORIZER.as_slice());
        assert_eq!(&args[44..64], USER.as_slice());

        let request = CreationRequest {
            collection_id: "test".to_string(),
            price: U256::from(PRICE),
            whitelist_price: U256::ZERO,
            max_supply: U256::from(10_000u64),
            max_per_txn: U256::ZERO,
            max_per_whitelist: U256::ZERO,
            max_per_wallet: U256::ZERO,
            uses_whitelist: 0,
            launch_timestamp: U256::from(1_700_000_000u64),
            whitelist_launch_timestamp: U256::ZERO,
        };
        let calldata = create_collection_calldata(&request, U256::from(1_000_000u64), &[1u8; 65]);
        let decoded = ISkrybeFactory::createCollectionCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded.request.collectionId, "test");
        assert_eq!(decoded.request.maxSupply, U256::from(10_000u64));
        assert_eq!(decoded.fee, U256::from(1_000_000u64));
        assert_eq!(decoded.signature.len(), 65);
    }
}
