//! Text encoding of keys.
//!
//! A key string is the standard base64 encoding of a JSON record:
//!
//! ```json
//! {"type": "RSA_PUBLIC_KEY", "n": "<decimal>", "e": "<decimal>", "key_size": 2048}
//! ```
//!
//! Private records use the type `RSA_PRIVATE_KEY` and carry `d` as well.
//! Numbers are written as decimal strings; `0x`-prefixed hexadecimal is also
//! accepted on import.

use base64ct::{Base64, Encoding};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};
use crate::key::KeyPair;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

const PUBLIC_KEY_TYPE: &str = "RSA_PUBLIC_KEY";
const PRIVATE_KEY_TYPE: &str = "RSA_PRIVATE_KEY";

#[derive(Deserialize, Serialize)]
struct KeyRecord {
    #[serde(rename = "type")]
    kind: String,
    n: String,
    e: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    d: Option<String>,
    key_size: usize,
}

impl Drop for KeyRecord {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

impl KeyRecord {
    fn public(key: &KeyPair) -> Self {
        KeyRecord {
            kind: PUBLIC_KEY_TYPE.into(),
            n: key.n().to_string(),
            e: key.e().to_string(),
            d: None,
            key_size: key.key_size(),
        }
    }

    fn private(key: &KeyPair) -> Result<Self> {
        let d = key.d().ok_or(Error::PrivateKeyRequired)?;
        Ok(KeyRecord {
            kind: PRIVATE_KEY_TYPE.into(),
            n: key.n().to_string(),
            e: key.e().to_string(),
            d: Some(d.to_string()),
            key_size: key.key_size(),
        })
    }

    fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| Error::MalformedKey(e.to_string()))?;
        let json = Zeroizing::new(json);
        Ok(Base64::encode_string(&json))
    }

    fn decode(s: &str) -> Result<Self> {
        let json = match Base64::decode_vec(s.trim()) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(_) => return Err(Error::MalformedKey("invalid base64".into())),
        };
        serde_json::from_slice(&json).map_err(|e| Error::MalformedKey(e.to_string()))
    }

    fn into_key(self, with_private: bool) -> Result<KeyPair> {
        let n = parse_uint("n", &self.n)?;
        let e = parse_uint("e", &self.e)?;
        let d = if with_private {
            match &self.d {
                Some(d) => Some(parse_uint("d", d)?),
                None => return Err(Error::MalformedKey("missing field `d`".into())),
            }
        } else {
            None
        };

        let key = KeyPair::from_components(n, e, d, Vec::new())?;
        if key.key_size() != self.key_size {
            return Err(Error::MalformedKey(format!(
                "key_size {} does not match the {}-bit modulus",
                self.key_size,
                key.key_size()
            )));
        }

        Ok(key)
    }
}

fn parse_uint(field: &str, value: &str) -> Result<BigUint> {
    let (digits, radix) = match value.get(..2) {
        Some("0x") | Some("0X") => (&value[2..], 16),
        _ => (value, 10),
    };

    let not_a_number = || Error::MalformedKey(format!("field `{}` is not a number", field));
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(not_a_number());
    }

    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(not_a_number)
}

/// Both halves of a key pair in their text form.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ExportedKeyPair {
    /// Public key string.
    pub public_key: String,
    /// Private key string, absent for public-only keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl Drop for ExportedKeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl KeyPair {
    /// Encodes the public half of this key.
    pub fn export_public_key(&self) -> Result<String> {
        KeyRecord::public(self).encode()
    }

    /// Encodes the full key. Fails with [`Error::PrivateKeyRequired`] for
    /// public-only keys.
    pub fn export_private_key(&self) -> Result<String> {
        KeyRecord::private(self)?.encode()
    }

    /// Encodes the private key if present, the public key otherwise.
    pub fn export(&self) -> Result<String> {
        if self.has_private_key() {
            self.export_private_key()
        } else {
            self.export_public_key()
        }
    }

    /// Encodes both halves.
    pub fn export_key_pair(&self) -> Result<ExportedKeyPair> {
        let private_key = if self.has_private_key() {
            Some(self.export_private_key()?)
        } else {
            None
        };

        Ok(ExportedKeyPair {
            public_key: self.export_public_key()?,
            private_key,
        })
    }

    /// Decodes a public key string. Only `n` and `e` are read.
    pub fn from_public_key_string(s: &str) -> Result<KeyPair> {
        let record = KeyRecord::decode(s)?;
        if record.kind != PUBLIC_KEY_TYPE {
            return Err(Error::MalformedKey(format!(
                "expected {}, got {}",
                PUBLIC_KEY_TYPE, record.kind
            )));
        }

        record.into_key(false)
    }

    /// Decodes a private key string.
    pub fn from_private_key_string(s: &str) -> Result<KeyPair> {
        let record = KeyRecord::decode(s)?;
        if record.kind != PRIVATE_KEY_TYPE {
            return Err(Error::MalformedKey(format!(
                "expected {}, got {}",
                PRIVATE_KEY_TYPE, record.kind
            )));
        }

        record.into_key(true)
    }

    /// Decodes either kind of key string.
    pub fn import(s: &str) -> Result<KeyPair> {
        let record = KeyRecord::decode(s)?;
        match record.kind.as_str() {
            PUBLIC_KEY_TYPE => record.into_key(false),
            PRIVATE_KEY_TYPE => record.into_key(true),
            other => Err(Error::MalformedKey(format!("unknown key type {}", other))),
        }
    }

    /// Decodes an [`ExportedKeyPair`], preferring the private half.
    ///
    /// When both halves are present they must describe the same public key.
    pub fn from_exported_key_pair(exported: &ExportedKeyPair) -> Result<KeyPair> {
        let public = Self::from_public_key_string(&exported.public_key)?;

        match &exported.private_key {
            Some(private_key) => {
                let key = Self::from_private_key_string(private_key)?;
                if key.n() != public.n() || key.e() != public.e() {
                    return Err(Error::MalformedKey(
                        "public and private halves do not match".into(),
                    ));
                }
                Ok(key)
            }
            None => Ok(public),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tests::get_private_key;
    use serde_json::json;

    fn encode_json(value: serde_json::Value) -> String {
        Base64::encode_string(value.to_string().as_bytes())
    }

    #[test]
    fn test_public_key_record() {
        let key = get_private_key();
        let exported = key.export_public_key().unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&Base64::decode_vec(&exported).unwrap()).unwrap();
        assert_eq!(json["type"], "RSA_PUBLIC_KEY");
        assert_eq!(json["e"], "65537");
        assert_eq!(json["n"], key.n().to_string());
        assert_eq!(json["key_size"], 1024);
        assert!(json.get("d").is_none());

        let imported = KeyPair::from_public_key_string(&exported).unwrap();
        assert_eq!(imported, key.to_public_key());
        assert!(!imported.has_private_key());
    }

    #[test]
    fn test_private_key_record() {
        let key = get_private_key();
        let exported = key.export_private_key().unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&Base64::decode_vec(&exported).unwrap()).unwrap();
        assert_eq!(json["type"], "RSA_PRIVATE_KEY");
        assert_eq!(json["d"], key.d().unwrap().to_string());

        let imported = KeyPair::from_private_key_string(&exported).unwrap();
        assert_eq!(imported, key);
        assert!(imported.primes().is_empty());

        // exporting the imported key reproduces the same string
        assert_eq!(imported.export_private_key().unwrap(), exported);
        assert_eq!(KeyPair::import(&exported).unwrap(), key);
        assert_eq!(key.export().unwrap(), exported);
    }

    #[test]
    fn test_public_only_key_cannot_export_private() {
        let public = get_private_key().to_public_key();
        assert_eq!(public.export_private_key(), Err(Error::PrivateKeyRequired));
        let exported = public.export_public_key().unwrap();
        assert_eq!(public.export().unwrap(), exported);

        let pair = public.export_key_pair().unwrap();
        assert!(pair.private_key.is_none());
        assert_eq!(KeyPair::from_exported_key_pair(&pair).unwrap(), public);
    }

    #[test]
    fn test_exported_key_pair() {
        let key = get_private_key();
        let pair = key.export_key_pair().unwrap();
        assert_eq!(KeyPair::from_exported_key_pair(&pair).unwrap(), key);

        let serialized = serde_json::to_string(&pair).unwrap();
        let parsed: ExportedKeyPair = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, pair);

        let other = KeyPair::from_components(
            BigUint::from(3233u32),
            BigUint::from(17u32),
            Some(BigUint::from(2753u32)),
            vec![],
        )
        .unwrap();
        let mismatched = ExportedKeyPair {
            public_key: pair.public_key.clone(),
            private_key: Some(other.export_private_key().unwrap()),
        };
        assert!(matches!(
            KeyPair::from_exported_key_pair(&mismatched),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn test_wrong_record_type() {
        let key = get_private_key();
        let public = key.export_public_key().unwrap();
        let private = key.export_private_key().unwrap();

        assert!(matches!(
            KeyPair::from_private_key_string(&public),
            Err(Error::MalformedKey(_))
        ));
        assert!(matches!(
            KeyPair::from_public_key_string(&private),
            Err(Error::MalformedKey(_))
        ));
        assert!(!KeyPair::import(&public).unwrap().has_private_key());
    }

    #[test]
    fn test_hex_numbers_accepted() {
        for n in ["0xca1", "0XCA1"] {
            let s = encode_json(json!({
                "type": "RSA_PUBLIC_KEY",
                "n": n,
                "e": "17",
                "key_size": 12,
            }));
            let key = KeyPair::from_public_key_string(&s).unwrap();
            assert_eq!(key.n(), &BigUint::from(3233u32));
        }
    }

    #[test]
    fn test_malformed_strings() {
        let public = |n: &str, key_size: u32| {
            json!({"type": "RSA_PUBLIC_KEY", "n": n, "e": "17", "key_size": key_size})
        };
        let documents = [
            json!({"type": "RSA_PUBLIC_KEY", "e": "17", "key_size": 12}),
            public("12a", 12),
            public("", 12),
            public("0x", 12),
            public("-3233", 12),
            public("3233", 2048),
            json!({"type": "RSA_PRIVATE_KEY", "n": "3233", "e": "17", "key_size": 12}),
            json!({"type": "DSA_KEY", "n": "3233", "e": "17", "key_size": 12}),
        ];

        let mut cases = vec!["not base64!".to_string()];
        cases.push(Base64::encode_string(b"not json"));
        cases.extend(documents.into_iter().map(encode_json));

        for (i, case) in cases.iter().enumerate() {
            assert!(
                matches!(KeyPair::import(case), Err(Error::MalformedKey(_))),
                "case {} should be rejected",
                i
            );
        }
    }
}
