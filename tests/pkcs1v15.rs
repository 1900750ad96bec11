//! Known-answer tests against a fixed 1024-bit key.

use base64ct::{Base64, Encoding};
use hex_literal::hex;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_forge::{
    engine,
    padding::{analyze_padding, pkcs1v15_unpad, BlockType},
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, Error, HashAlgorithm, KeyPair,
};

fn hex_uint(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
}

fn get_private_key() -> KeyPair {
    // https://github.com/C2SP/wycheproof/blob/main/testvectors/rsa_oaep_misc_test.json
    KeyPair::from_components(
        hex_uint("d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9"),
        BigUint::from(65_537u64),
        Some(hex_uint("5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801")),
        vec![
            hex_uint("e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b064e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681"),
            hex_uint("e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559"),
        ],
    )
    .unwrap()
}

fn decode_uint(b64: &str) -> BigUint {
    BigUint::from_bytes_be(&Base64::decode_vec(b64).unwrap())
}

#[test]
fn decrypt_known_ciphertexts() {
    let priv_key = get_private_key();

    let tests = [
        (
            "f0f4qsNunKxRgsag5/p3AER7uoqs/Gupe33kuJWGAkLjobLsLszxp7uwVngeoxpDi87rTcJ9y0Sbu2QfnV/KvwEHiuQ8NL1FCRt4ujwgNtQms9XHjkTeLUX9tapoxdA0QhLsjblZFdb3fAvZXHGKPTBdHkxHut6LHG37SxbHeQY=",
            "x",
        ),
        (
            "l+L4+CdrgcFJ9LngppA+o7pZAKmZs4Gu5cRsum7OAji0+XNamTaPKxgtAio5A8ltRLJxrfZnRFOIOyn4964vMIB2YfVG/Vak//kLIn/rbgaVGndmWxQuR6ykEruOuqn5JUqv4JHaW30aDzEkCbpXWpFJ7dhfrWZdSv4XKpt9cY4=",
            "testing.",
        ),
        (
            "JtlpY3lTeCmkRRrIgfuOXH0ubMOL1U/n6nM6r6kF2iuRiFIPapfEzHF2WSvrbxZXa8gzJo1PuAJiJ6Vy90vOWbP43VEXLk5wyGZPePwHQ1WwOcE+6okZ9j9zmAmAnQUyaUjPfhwyDC64ObjiSKeIPCYSsdURy/Z67lcTZ6JJ8+8=",
            "testing.\n",
        ),
        (
            "TcyqI5jrGyln5AspqnvWShPIjKIZtXbNApf9TqAZrsl31RS+k6blEJy6YVZeow9QKis+UyIcz08nMGX/D3lm/JA4bwpyBFAvSFr2MNjNpGh9QqEcGryI0CpLA1fy56x7YGB/Y0eJZXnSj91udGubJTEI9ULTouoFAKxoWq7ioTc=",
            "01234567890123456789012345678901234567890123456789012",
        ),
    ];

    for (ciphertext, plaintext) in tests {
        let c = decode_uint(ciphertext);
        assert_eq!(
            engine::decrypt_block(&priv_key, &c).unwrap(),
            plaintext.as_bytes()
        );

        // the same ciphertexts work through the long message path
        assert_eq!(
            engine::decrypt_long(&priv_key, &[c.clone(), c]).unwrap(),
            [plaintext.as_bytes(), plaintext.as_bytes()].concat()
        );
    }
}

#[test]
fn sign_unprefixed_known_answer() {
    let msg = b"Thu Dec 19 18:06:16 EST 2013\n";
    let expected_sig = Base64::decode_vec("E3O2B8toxZitc013ZK0TRP4uo47Clpm/Me/o+Yv5qpU7ZP6x9gFUc8IVv2LkX7kUtkgPl/85f/ehJhcXCsoRoOEbcio8PR3JCt/uPJSzokTvNx7bmYxXTJox6oF3kM3+NI+21jh8CZVyk81lTtFulLfmzAsH4L4w5QJcwWtNJpE=").unwrap();
    let priv_key = get_private_key();

    let sig = engine::sign_prehash(&priv_key, msg).unwrap();
    assert_eq!(sig.to_bytes_be(), expected_sig);

    let pub_key = priv_key.to_public_key();
    assert!(engine::verify_prehash(&pub_key, msg, &sig));

    let mut tampered = expected_sig.clone();
    tampered[10] ^= 1;
    let tampered = BigUint::from_bytes_be(&tampered);
    assert!(!engine::verify_prehash(&pub_key, msg, &tampered));
}

#[test]
fn signature_recovers_type_one_block() {
    let priv_key = get_private_key();
    let digest = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");

    let sig = engine::sign_digest(&priv_key, b"abc", HashAlgorithm::Sha256).unwrap();

    // applying the public exponent recovers the padded block
    let em = sig.modpow(priv_key.e(), priv_key.n()).to_bytes_be();
    let mut block = vec![0u8; priv_key.size() - em.len()];
    block.extend_from_slice(&em);

    let report = analyze_padding(&block);
    assert!(report.is_valid(), "{:?}", report);
    assert_eq!(report.block_type, Some(1));
    assert_eq!(report.message_len, 32);
    assert_eq!(report.padding_len, 128 - 3 - 32);
    assert_eq!(
        pkcs1v15_unpad(&block, BlockType::Signature).unwrap(),
        digest
    );
}

#[test]
fn public_key_cannot_decrypt_or_sign() {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let pub_key = get_private_key().to_public_key();
    assert!(pub_key.d().is_none());

    let c = engine::encrypt_block(&mut rng, &pub_key, b"secret").unwrap();
    assert_eq!(
        engine::decrypt_block(&pub_key, &c),
        Err(Error::PrivateKeyRequired)
    );
    assert_eq!(
        engine::sign_digest(&pub_key, b"secret", HashAlgorithm::Sha256),
        Err(Error::PrivateKeyRequired)
    );
    assert_eq!(
        engine::decrypt_block(&get_private_key(), &c).unwrap(),
        b"secret"
    );
}

#[cfg(feature = "hazmat")]
#[test]
fn raw_primitives_invert_each_other() {
    use rsa_forge::hazmat::{rsa_decrypt, rsa_encrypt};

    let key = get_private_key();
    let m = BigUint::from(0x1234_5678u32);
    let c = rsa_encrypt(&key, &m).unwrap();
    assert_eq!(rsa_decrypt(&key, &c).unwrap(), m);
    assert_eq!(rsa_encrypt(&key, key.n()), Err(Error::NumberTooLarge));
}
