use edwards25519::{Error, open, publickey, sign};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn decode32(s: &str) -> [u8; 32] {
    hex::decode(s).unwrap().try_into().unwrap()
}

fn decode64(s: &str) -> [u8; 64] {
    hex::decode(s).unwrap().try_into().unwrap()
}

/// First official test vector: empty message.
#[test]
fn rfc_vector_1() {
    let sk = decode32("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let expected_pk =
        decode32("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
    let expected_sig = decode64(
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
         5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
    );

    let pk = publickey(&sk);
    assert_eq!(pk, expected_pk);

    let sig = sign(&[], &sk, &pk);
    assert_eq!(sig, expected_sig);

    assert!(open(&[], &pk, &sig).is_ok());
}

/// Second official test vector: one-byte message 0x72.
#[test]
fn rfc_vector_2() {
    let sk = decode32("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb");
    let expected_pk =
        decode32("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c");
    let expected_sig = decode64(
        "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
         085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00",
    );

    let pk = publickey(&sk);
    assert_eq!(pk, expected_pk);

    let sig = sign(&[0x72], &sk, &pk);
    assert_eq!(sig, expected_sig);

    assert!(open(&[0x72], &pk, &sig).is_ok());
}

#[test]
fn corrupted_signature_is_rejected() {
    let sk = decode32("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb");
    let pk = publickey(&sk);
    let mut sig = sign(&[0x72], &sk, &pk);

    sig[63] ^= 0x01;
    assert_eq!(open(&[0x72], &pk, &sig), Err(Error::InvalidSignature));
}

#[test]
fn out_of_range_s_fails_before_any_curve_work() {
    let sk = decode32("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let pk = publickey(&sk);
    let mut sig = sign(&[], &sk, &pk);

    sig[63] = 0x20;
    assert_eq!(open(&[], &pk, &sig), Err(Error::InvalidScalar));

    // The same scalar check must fire even with a garbage public key,
    // since it runs first.
    let bogus_pk = [0xffu8; 32];
    assert_eq!(open(&[], &bogus_pk, &sig), Err(Error::InvalidScalar));
}

#[test]
fn off_curve_public_key_is_rejected() {
    let sk = decode32("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let pk = publickey(&sk);
    let sig = sign(b"payload", &sk, &pk);

    // Scan for an encoding with no curve point behind it; about half of
    // all y values qualify, so this terminates immediately in practice.
    let mut bad_pk = None;
    for n in 2u8..64 {
        let mut candidate = [0u8; 32];
        candidate[0] = n;
        if open(b"payload", &candidate, &sig) == Err(Error::InvalidPoint) {
            bad_pk = Some(candidate);
            break;
        }
    }
    assert!(bad_pk.is_some());
}

#[test]
fn empty_message_round_trips() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut sk = [0u8; 32];
    rng.fill_bytes(&mut sk);

    let pk = publickey(&sk);
    let sig = sign(&[], &sk, &pk);
    assert!(open(&[], &pk, &sig).is_ok());
}

#[test]
fn random_keys_round_trip() {
    let mut rng = StdRng::seed_from_u64(0xe07c_6514);
    for i in 0..64 {
        let mut sk = [0u8; 32];
        rng.fill_bytes(&mut sk);
        let mut msg = vec![0u8; i * 3];
        rng.fill_bytes(&mut msg);

        let pk = publickey(&sk);
        let sig = sign(&msg, &sk, &pk);
        assert!(open(&msg, &pk, &sig).is_ok(), "round {i}");
    }
}

#[test]
fn bit_flips_are_detected() {
    let mut rng = StdRng::seed_from_u64(0xd5a7_9147);
    let mut sk = [0u8; 32];
    rng.fill_bytes(&mut sk);
    let mut msg = [0u8; 48];
    rng.fill_bytes(&mut msg);

    let pk = publickey(&sk);
    let sig = sign(&msg, &sk, &pk);

    // Any single-bit change in the message must invalidate the signature.
    for byte in 0..msg.len() {
        let mut tampered = msg;
        tampered[byte] ^= 1 << (byte % 8);
        assert!(open(&tampered, &pk, &sig).is_err());
    }

    // Likewise for every byte of the signature itself.
    for byte in 0..64 {
        let mut tampered = sig;
        tampered[byte] ^= 1 << (byte % 8);
        assert!(open(&msg, &pk, &tampered).is_err());
    }

    // And for the public key, where decoding may fail outright instead.
    for byte in 0..32 {
        let mut tampered = pk;
        tampered[byte] ^= 1 << (byte % 8);
        assert!(open(&msg, &tampered, &sig).is_err());
    }
}

#[test]
fn signatures_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(0x2774_2317);
    let mut sk = [0u8; 32];
    rng.fill_bytes(&mut sk);

    let pk = publickey(&sk);
    assert_eq!(sign(b"same input", &sk, &pk), sign(b"same input", &sk, &pk));
    assert_ne!(sign(b"one input", &sk, &pk), sign(b"another input", &sk, &pk));
}

/// The long soak the scheme description asks for. Ignored by default; run
/// with `cargo test --release -- --ignored` when touching the arithmetic.
#[test]
#[ignore]
fn ten_thousand_random_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x8f25_d51a);
    let mut msg = [0u8; 96];
    for i in 0..10_000 {
        let mut sk = [0u8; 32];
        rng.fill_bytes(&mut sk);
        rng.fill_bytes(&mut msg);
        let len = (i % 97) as usize;

        let pk = publickey(&sk);
        let sig = sign(&msg[..len], &sk, &pk);
        assert!(open(&msg[..len], &pk, &sig).is_ok(), "round {i}");
    }
}
