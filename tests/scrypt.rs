use cryptal::derivation::{
    CancellationToken, DerivationError, ParamError, Scrypt, ScryptParameters, scrypt,
};
use zeroize::Zeroize;

fn params(salt: &[u8], cost: u64, block_size: u32, parallelism: u32) -> ScryptParameters {
    ScryptParameters::builder()
        .with_salt(salt)
        .with_cost(cost)
        .with_block_size(block_size)
        .with_parallelism(parallelism)
        .build()
}

// -------------------------------------------------------
// 1. RFC 7914 VECTORS
// -------------------------------------------------------

/// RFC 7914 section 12, first vector: empty password and salt,
/// N = 16, r = 1, p = 1, 64-byte key.
#[test]
fn scrypt_rfc7914_empty_inputs() {
    let expected = hex::decode(
        "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
         fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906",
    )
    .unwrap();

    let key = scrypt(b"", &params(b"", 16, 1, 1), 64).unwrap();
    assert_eq!(key.as_slice(), expected.as_slice());
}

/// RFC 7914 section 12, second vector: "password" / "NaCl",
/// N = 1024, r = 8, p = 16, 64-byte key.
#[test]
fn scrypt_rfc7914_password_nacl() {
    let expected = hex::decode(
        "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162\
         2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640",
    )
    .unwrap();

    let key = scrypt(b"password", &params(b"NaCl", 1024, 8, 16), 64).unwrap();
    assert_eq!(key.as_slice(), expected.as_slice());
}

/// RFC 7914 section 12, third vector: "pleaseletmein" / "SodiumChloride",
/// N = 16384, r = 8, p = 1, 64-byte key.
#[test]
fn scrypt_rfc7914_pleaseletmein() {
    let expected = hex::decode(
        "7023bdcb3afd7348461c06cd81fd38ebfda8fbba904f8e3ea9b543f6545da1f2\
         d5432955613f0fcf62d49705242a9af9e61e85dc0d651e40dfcf017b45575887",
    )
    .unwrap();

    let key = scrypt(
        b"pleaseletmein",
        &params(b"SodiumChloride", 16384, 8, 1),
        64,
    )
    .unwrap();
    assert_eq!(key.as_slice(), expected.as_slice());
}

// -------------------------------------------------------
// 2. ENGINE BEHAVIOUR
// -------------------------------------------------------

#[test]
fn scrypt_is_deterministic() {
    let engine = Scrypt::new(b"password", &params(b"NaCl", 64, 2, 3)).unwrap();

    let a = engine.get_bytes(40).unwrap();
    let b = engine.get_bytes(40).unwrap();
    assert_eq!(a, b);

    let copy = engine.clone();
    assert_eq!(copy.get_bytes(40).unwrap(), a);
}

#[test]
fn shorter_output_is_a_prefix() {
    // The contraction step is a single PBKDF2 pass, so unlike Argon2 the
    // key length does not feed back into the mixing.
    let engine = Scrypt::new(b"password", &params(b"NaCl", 16, 1, 1)).unwrap();

    let long = engine.get_bytes(100).unwrap();
    let short = engine.get_bytes(33).unwrap();
    assert_eq!(&long[..33], &short[..]);
}

#[test]
fn doubling_cost_changes_output() {
    let a = scrypt(b"password", &params(b"NaCl", 32, 2, 1), 32).unwrap();
    let b = scrypt(b"password", &params(b"NaCl", 64, 2, 1), 32).unwrap();
    assert_ne!(a, b);
}

#[test]
fn every_parameter_feeds_the_output() {
    let base = scrypt(b"password", &params(b"NaCl", 32, 2, 2), 32).unwrap();

    for other in [
        params(b"NaCk", 32, 2, 2),
        params(b"NaCl", 32, 3, 2),
        params(b"NaCl", 32, 2, 3),
    ] {
        let key = scrypt(b"password", &other, 32).unwrap();
        assert_ne!(key, base, "{other:?}");
    }

    let key = scrypt(b"passwore", &params(b"NaCl", 32, 2, 2), 32).unwrap();
    assert_ne!(key, base);
}

#[test]
fn single_byte_output_is_accepted() {
    let key = scrypt(b"password", &params(b"NaCl", 16, 1, 1), 1).unwrap();
    assert_eq!(key.len(), 1);
}

#[test]
fn empty_output_rejected_per_call() {
    let engine = Scrypt::new(b"password", &params(b"NaCl", 16, 1, 1)).unwrap();
    assert!(matches!(
        engine.get_bytes(0),
        Err(DerivationError::OutputTooShort {
            requested: 0,
            minimum: 1
        })
    ));
}

#[test]
fn cancellation_is_reported() {
    let engine = Scrypt::new(b"password", &params(b"NaCl", 16, 1, 4)).unwrap();
    let token = CancellationToken::new();

    assert_eq!(
        engine.get_bytes_cancellable(16, &token).unwrap(),
        engine.get_bytes(16).unwrap()
    );

    token.cancel();
    assert!(matches!(
        engine.get_bytes_cancellable(16, &token),
        Err(DerivationError::Cancelled)
    ));
}

#[test]
fn cleared_engine_refuses_to_derive() {
    let mut engine = Scrypt::new(b"password", &params(b"NaCl", 16, 1, 1)).unwrap();
    engine.clear();

    assert!(matches!(engine.get_bytes(16), Err(DerivationError::Cleared)));
    assert!(engine.parameters().salt().iter().all(|b| *b == 0));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn async_derivation_matches_blocking() {
    let engine = Scrypt::new(b"password", &params(b"NaCl", 16, 1, 2)).unwrap();

    let from_worker = engine
        .get_bytes_async(64, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(from_worker, engine.get_bytes(64).unwrap());
}

// -------------------------------------------------------
// 3. PARAMETER VALIDATION
// -------------------------------------------------------

#[test]
fn builder_defaults() {
    let defaults = ScryptParameters::default();
    assert_eq!(defaults.cost(), 16384);
    assert_eq!(defaults.block_size(), 8);
    assert_eq!(defaults.parallelism(), 1);
    assert_eq!(defaults.lane_memory_bytes(), Some(16 * 1024 * 1024));
}

#[test]
fn cost_must_be_a_power_of_two_above_one() {
    for cost in [0, 1, 3, 48, 1000] {
        assert!(
            matches!(
                Scrypt::new(b"password", &params(b"NaCl", cost, 1, 1)),
                Err(DerivationError::InvalidParams(ParamError::CostNotPowerOfTwo(c))) if c == cost
            ),
            "cost = {cost}"
        );
    }

    assert!(Scrypt::new(b"password", &params(b"NaCl", 2, 1, 1)).is_ok());
}

#[test]
fn cost_bounded_by_block_size() {
    assert!(matches!(
        Scrypt::new(b"password", &params(b"NaCl", 1 << 16, 1, 1)),
        Err(DerivationError::InvalidParams(ParamError::CostTooLarge {
            cost: 65536,
            block_size: 1
        }))
    ));

    // One step below the bound is only validated, never run.
    assert!(Scrypt::new(b"password", &params(b"NaCl", 1 << 15, 1, 1)).is_ok());
    assert!(Scrypt::new(b"password", &params(b"NaCl", 1 << 16, 2, 1)).is_ok());

    assert!(matches!(
        Scrypt::new(b"password", &params(b"NaCl", 1 << 32, 8, 1)),
        Err(DerivationError::InvalidParams(ParamError::CostTooLarge { .. }))
    ));
}

#[test]
fn zero_block_size_rejected() {
    assert!(matches!(
        Scrypt::new(b"password", &params(b"NaCl", 16, 0, 1)),
        Err(DerivationError::InvalidParams(ParamError::BlockSizeTooSmall))
    ));
}

#[test]
fn parallelism_bounds() {
    assert!(matches!(
        Scrypt::new(b"password", &params(b"NaCl", 16, 8, 0)),
        Err(DerivationError::InvalidParams(
            ParamError::ParallelismOutOfRange { parallelism: 0, .. }
        ))
    ));

    let bounds = params(b"NaCl", 16, 8, 1);
    let maximum = bounds.max_parallelism();
    assert_eq!(maximum, 262_143);

    assert!(Scrypt::new(b"password", &params(b"NaCl", 16, 8, maximum)).is_ok());
    assert!(matches!(
        Scrypt::new(b"password", &params(b"NaCl", 16, 8, maximum + 1)),
        Err(DerivationError::InvalidParams(
            ParamError::ParallelismOutOfRange { .. }
        ))
    ));
}

#[test]
fn debug_output_redacts_salt() {
    let rendered = format!("{:?}", params(b"pepperoni", 16, 1, 1));
    assert!(!rendered.contains("salt:"));
    assert!(rendered.contains("salt_len: 9"));
}

#[test]
fn zeroize_matches_clear() {
    let mut wiped = params(b"NaCl", 16, 1, 1);
    let mut cleared = wiped.clone();

    wiped.zeroize();
    cleared.clear();

    assert_eq!(wiped.salt(), &[0u8; 4]);
    assert_eq!(cleared.salt(), wiped.salt());
    assert_eq!(wiped.cost(), 16);
}
