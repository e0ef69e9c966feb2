use apex_bridge_rs::{
    check_transfer, decode_bech32, encode_bech32, regroup, CardanoAddress, CredentialKind,
    NetworkId, StakeCredential, TokenId, TransferRequest, ValidationError,
};
use apex_bridge_rs::{AmountBounds, BridgingMode, BridgingSettings, ChainId, ChainSettings};
use apex_bridge_rs::{DirectionRule, ModeLimits};
use proptest::prelude::*;

fn any_credential() -> impl Strategy<Value = StakeCredential> {
    (any::<bool>(), prop::array::uniform28(any::<u8>())).prop_map(|(script, hash)| {
        let kind = if script {
            CredentialKind::Script
        } else {
            CredentialKind::Key
        };
        StakeCredential::new(kind, hash)
    })
}

fn known_network() -> impl Strategy<Value = NetworkId> {
    (0u8..4).prop_map(NetworkId)
}

fn any_address() -> impl Strategy<Value = CardanoAddress> {
    prop_oneof![
        (
            known_network(),
            any_credential(),
            any_credential(),
            prop::collection::vec(any::<u8>(), 0..8)
        )
            .prop_map(|(network, payment, stake, extra)| CardanoAddress::Base {
                network,
                payment,
                stake,
                extra,
            }),
        (known_network(), any_credential())
            .prop_map(|(network, payment)| CardanoAddress::Enterprise { network, payment }),
        (known_network(), any_credential())
            .prop_map(|(network, stake)| CardanoAddress::Reward { network, stake }),
    ]
}

fn single_limit_settings(min: u128, max: u128) -> BridgingSettings {
    let mut settings = BridgingSettings::default();
    settings
        .chains
        .insert(ChainId::Prime, ChainSettings::new(TokenId(1)));
    settings
        .chains
        .insert(ChainId::Nexus, ChainSettings::new(TokenId(4)));
    settings.directions.push(DirectionRule {
        source: ChainId::Prime,
        destination: ChainId::Nexus,
        mode: BridgingMode::Reactor,
        tokens: vec![],
    });
    settings.limits.push(ModeLimits {
        mode: BridgingMode::Reactor,
        chain: ChainId::Prime,
        currency: AmountBounds::new(min, max),
        wrapped: AmountBounds::default(),
    });
    settings
}

proptest! {
    #[test]
    fn regroup_bytes_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let words = regroup(&bytes, 8, 5, true).unwrap();
        prop_assert!(words.iter().all(|w| *w < 32));
        prop_assert_eq!(words.len(), (bytes.len() * 8).div_ceil(5));

        let back = regroup(&words, 5, 8, false).unwrap();
        prop_assert_eq!(back, bytes);
    }

    #[test]
    fn regroup_rejects_out_of_range_symbols(
        mut words in prop::collection::vec(0u8..32, 1..64),
        index in any::<prop::sample::Index>(),
        bad in 32u8..=255,
    ) {
        let i = index.index(words.len());
        words[i] = bad;
        prop_assert!(regroup(&words, 5, 8, true).is_err());
    }

    #[test]
    fn strict_decode_is_canonical(words in prop::collection::vec(0u8..32, 0..64)) {
        // Whatever strict decoding accepts must be the unique padded encoding
        if let Ok(bytes) = regroup(&words, 5, 8, false) {
            prop_assert_eq!(regroup(&bytes, 8, 5, true).unwrap(), words);
        }
    }

    #[test]
    fn bech32_bytes_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let text = encode_bech32("addr_test", &bytes).unwrap();
        let (prefix, decoded) = decode_bech32(&text).unwrap();
        prop_assert_eq!(prefix, "addr_test");
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn address_text_roundtrip(addr in any_address()) {
        let text = addr.to_bech32(None).unwrap();
        let decoded = CardanoAddress::from_bech32(&text).unwrap();
        prop_assert_eq!(decoded.to_bech32(None), Some(text));
        prop_assert_eq!(&decoded, &addr);
        prop_assert_eq!(CardanoAddress::from_bytes(&addr.to_bytes()), Some(addr));
    }

    #[test]
    fn from_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        if let Some(addr) = CardanoAddress::from_bytes(&bytes) {
            prop_assert_eq!(addr.to_bytes(), bytes);
        }
    }

    #[test]
    fn raising_the_amount_never_trips_the_minimum(
        min in 0u128..1_000_000_000,
        amount in 0u128..2_000_000_000,
        extra in 0u128..1_000_000_000,
    ) {
        let settings = single_limit_settings(min, 0);
        let request = |amount| TransferRequest {
            source: ChainId::Prime,
            destination: ChainId::Nexus,
            receiver: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            amount,
            token: TokenId(1),
        };

        let low = check_transfer(&settings, &request(amount));
        let high = check_transfer(&settings, &request(amount + extra));
        prop_assert_eq!(low.is_ok(), amount >= min);
        if low.is_ok() {
            prop_assert!(high.is_ok());
        }
        if let Err(e) = high {
            let is_below_minimum = matches!(e, ValidationError::BelowMinimum { .. });
            prop_assert!(is_below_minimum);
        }
    }

    #[test]
    fn maximum_is_inclusive(max in 1u128..1_000_000_000, over in 1u128..1_000) {
        let settings = single_limit_settings(0, max);
        let request = |amount| TransferRequest {
            source: ChainId::Prime,
            destination: ChainId::Nexus,
            receiver: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            amount,
            token: TokenId(1),
        };
        prop_assert!(check_transfer(&settings, &request(max)).is_ok());
        let above_maximum = matches!(
            check_transfer(&settings, &request(max + over)),
            Err(ValidationError::AboveMaximum { .. })
        );
        prop_assert!(above_maximum);
    }
}
