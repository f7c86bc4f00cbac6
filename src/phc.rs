//! PHC string codec
//!
//! Format:
//! `$<algorithm>$v=<version>$<k1>=<v1>,<k2>=<v2>,...$<b64(salt)>$<b64(digest)>`
//!
//! - Parameters are kept in a `BTreeMap`, so they are always emitted sorted by key
//! - Salt and digest use standard-alphabet base64 without padding
//! - Parameter values are passed through as strings; engines validate them

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use zeroize::Zeroize;

use crate::error::{PwdHashError, Result};

/// Number of `$`-separated segments, counting the empty one before the leading `$`
const SEGMENTS: usize = 6;

const VERSION_PREFIX: &str = "v=";

/// Decoding tolerates non-zero trailing bits, so a digest cut short still
/// parses and simply fails to match. Encoding stays canonical.
const LENIENT_NO_PAD: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::RequireNone)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_NO_PAD);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_NO_PAD);

/// A parsed (or about to be serialized) PHC record
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    pub algorithm: String,
    pub version: u32,
    pub params: BTreeMap<String, String>,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl EncodedRecord {
    pub fn new(algorithm: impl Into<String>, version: u32) -> Self {
        Self {
            algorithm: algorithm.into(),
            version,
            params: BTreeMap::new(),
            salt: Vec::new(),
            digest: Vec::new(),
        }
    }

    /// Add a parameter, replacing any previous value under the same key
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = salt.to_vec();
        self
    }

    pub fn with_digest(mut self, digest: &[u8]) -> Self {
        self.digest = digest.to_vec();
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl Drop for EncodedRecord {
    fn drop(&mut self) {
        self.salt.zeroize();
        self.digest.zeroize();
    }
}

// Salt and digest are left out on purpose
impl fmt::Debug for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedRecord")
            .field("algorithm", &self.algorithm)
            .field("version", &self.version)
            .field("params", &self.params)
            .field("salt_len", &self.salt.len())
            .field("digest_len", &self.digest.len())
            .finish()
    }
}

/// Serialize a record into its PHC string
pub fn encode(record: &EncodedRecord) -> String {
    let params = record
        .params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "${}${}{}${}${}${}",
        record.algorithm,
        VERSION_PREFIX,
        record.version,
        params,
        STANDARD_NO_PAD.encode(&record.salt),
        STANDARD_NO_PAD.encode(&record.digest),
    )
}

/// Parse a PHC string
///
/// The string is split on its first five `$` delimiters; whatever follows the
/// fifth is the digest segment. Parameter values are not interpreted here.
pub fn decode(encoded: &str) -> Result<EncodedRecord> {
    let rest = encoded
        .strip_prefix('$')
        .ok_or_else(|| PwdHashError::MalformedInput("missing leading '$'".into()))?;

    let parts: Vec<&str> = rest.splitn(SEGMENTS - 1, '$').collect();
    if parts.len() < SEGMENTS - 1 {
        return Err(PwdHashError::MalformedInput(format!(
            "expected {} '$'-separated segments, found {}",
            SEGMENTS,
            parts.len() + 1
        )));
    }

    let algorithm = parts[0];
    if algorithm.is_empty() {
        return Err(PwdHashError::MalformedInput("empty algorithm identifier".into()));
    }

    let version = parse_version(parts[1])?;
    let params = parse_params(parts[2])?;
    let salt = decode_b64(parts[3]).map_err(|e| PwdHashError::InvalidEncoding(format!("salt: {}", e)))?;
    let digest =
        decode_b64(parts[4]).map_err(|e| PwdHashError::InvalidEncoding(format!("digest: {}", e)))?;

    Ok(EncodedRecord {
        algorithm: algorithm.to_string(),
        version,
        params,
        salt,
        digest,
    })
}

fn parse_version(segment: &str) -> Result<u32> {
    let digits = segment
        .strip_prefix(VERSION_PREFIX)
        .ok_or(PwdHashError::MissingVersion)?;

    // u32::from_str accepts a leading '+'
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PwdHashError::InvalidVersion(digits.to_string()));
    }

    digits
        .parse::<u32>()
        .map_err(|_| PwdHashError::InvalidVersion(digits.to_string()))
}

fn parse_params(segment: &str) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    if segment.is_empty() {
        return Ok(params);
    }

    for clause in segment.split(',') {
        let (key, value) = clause
            .split_once('=')
            .ok_or_else(|| PwdHashError::InvalidParam(format!("'{}' is not key=value", clause)))?;

        if key.is_empty() || value.is_empty() || value.contains('=') {
            return Err(PwdHashError::InvalidParam(format!(
                "'{}' is not key=value",
                clause
            )));
        }

        if params.insert(key.to_string(), value.to_string()).is_some() {
            return Err(PwdHashError::InvalidParam(format!("duplicate key '{}'", key)));
        }
    }

    Ok(params)
}

fn decode_b64(segment: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    STANDARD_LENIENT
        .decode(segment)
        .or_else(|err| URL_SAFE_LENIENT.decode(segment).map_err(|_| err))
}

impl fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for EncodedRecord {
    type Err = PwdHashError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use proptest::prelude::*;

    fn sample() -> EncodedRecord {
        EncodedRecord::new("argon2id", 19)
            .with_param("t", 3)
            .with_param("p", 4)
            .with_param("m", 65536)
            .with_salt(b"0123456789abcdef")
            .with_digest(b"abcdefghijklmnopqrstuvwx")
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode(&sample());
        assert_eq!(
            encoded,
            "$argon2id$v=19$m=65536,p=4,t=3$MDEyMzQ1Njc4OWFiY2RlZg$YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = EncodedRecord::new("x", 1).with_param("b", 2).with_param("a", 1);
        let b = EncodedRecord::new("x", 1).with_param("a", 1).with_param("b", 2);
        assert_eq!(encode(&a), encode(&b));
        assert_eq!(encode(&a), encode(&a));
    }

    #[test]
    fn test_decode_valid() {
        let record = sample();
        let parsed = decode(&encode(&record)).unwrap();

        assert_eq!(parsed.algorithm, "argon2id");
        assert_eq!(parsed.version, 19);
        assert_eq!(parsed.param("m"), Some("65536"));
        assert_eq!(parsed.salt, b"0123456789abcdef");
        assert_eq!(parsed.digest, b"abcdefghijklmnopqrstuvwx");
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_decode_accepts_url_safe_alphabet() {
        let record = EncodedRecord::new("x", 1)
            .with_param("a", 1)
            .with_salt(&[0xfb, 0xff, 0xfe])
            .with_digest(&[0xff; 4]);
        let url = format!(
            "$x$v=1$a=1${}${}",
            URL_SAFE_NO_PAD.encode(&record.salt),
            URL_SAFE_NO_PAD.encode(&record.digest)
        );
        assert!(url.contains('_') || url.contains('-'));
        assert_eq!(decode(&url).unwrap(), record);
    }

    #[test]
    fn test_empty_params_round_trip() {
        let record = EncodedRecord::new("plain", 1).with_salt(b"salt").with_digest(b"hash");
        let encoded = encode(&record);
        assert!(encoded.contains("$v=1$$"));
        assert_eq!(decode(&encoded).unwrap(), record);
    }

    #[test]
    fn test_malformed_segments() {
        for input in ["$argon2id$", "not-even-delimited", "", "$argon2id$v=19$m=1$c2FsdA"] {
            let err = decode(input).unwrap_err();
            assert!(matches!(err, PwdHashError::MalformedInput(_)), "{}: {:?}", input, err);
        }
    }

    #[test]
    fn test_empty_algorithm() {
        let err = decode("$$v=19$m=1$c2FsdA$aGFzaA").unwrap_err();
        assert!(matches!(err, PwdHashError::MalformedInput(_)));
    }

    #[test]
    fn test_missing_version() {
        let err = decode("$argon2id$19$m=1$c2FsdA$aGFzaA").unwrap_err();
        assert!(matches!(err, PwdHashError::MissingVersion));
    }

    #[test]
    fn test_invalid_version() {
        for version in ["v=abc", "v=", "v=-1", "v=+19", "v=1.0"] {
            let input = format!("$argon2id${}$m=1$c2FsdA$aGFzaA", version);
            let err = decode(&input).unwrap_err();
            assert!(matches!(err, PwdHashError::InvalidVersion(_)), "{}", version);
        }
    }

    #[test]
    fn test_invalid_params() {
        for params in ["m", "m=1,t", "=1", "m=", "m=1=2", "m=1,,t=2", "m=1,m=2"] {
            let input = format!("$argon2id$v=19${}$c2FsdA$aGFzaA", params);
            let err = decode(&input).unwrap_err();
            assert!(matches!(err, PwdHashError::InvalidParam(_)), "{}", params);
        }
    }

    #[test]
    fn test_invalid_encoding() {
        let err = decode("$argon2id$v=19$m=1$!!!$aGFzaA").unwrap_err();
        assert!(matches!(err, PwdHashError::InvalidEncoding(_)));

        let err = decode("$argon2id$v=19$m=1$c2FsdA$aGFzaA==").unwrap_err();
        assert!(matches!(err, PwdHashError::InvalidEncoding(_)));
    }

    #[test]
    fn test_extra_delimiter_lands_in_digest() {
        let err = decode("$argon2id$v=19$m=1$c2FsdA$aGFzaA$extra").unwrap_err();
        assert!(matches!(err, PwdHashError::InvalidEncoding(ref msg) if msg.starts_with("digest")));
    }

    #[test]
    fn test_decode_tolerates_trailing_bits() {
        // "aGFzaB" differs from canonical "aGFzaA" only in the unused low bits.
        let record = decode("$argon2id$v=19$m=1$c2FsdA$aGFzaB").unwrap();
        assert_eq!(record.digest, b"hash");

        let truncated = encode(&sample());
        let truncated = &truncated[..truncated.len() - 4];
        assert_eq!(decode(truncated).unwrap().digest.len(), 21);
    }

    #[test]
    fn test_encode_stays_canonical() {
        let record = decode("$argon2id$v=19$m=1$c2FsdA$aGFzaB").unwrap();
        assert!(encode(&record).ends_with("$aGFzaA"));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let printed = format!("{:?}", sample());
        assert!(printed.contains("salt_len: 16"));
        assert!(!printed.contains("0123456789abcdef"));
    }

    #[test]
    fn test_display_and_from_str() {
        let record = sample();
        let parsed: EncodedRecord = record.to_string().parse().unwrap();
        assert_eq!(parsed, record);
    }

    fn ident() -> impl Strategy<Value = String> {
        "[a-z0-9-]{1,12}"
    }

    fn value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9.+/_-]{1,16}"
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            algorithm in ident(),
            version in any::<u32>(),
            params in prop::collection::btree_map(ident(), value(), 0..6),
            salt in prop::collection::vec(any::<u8>(), 0..64),
            digest in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let record = EncodedRecord { algorithm, version, params, salt, digest };
            let encoded = encode(&record);
            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(&decoded, &record);
            prop_assert_eq!(encode(&decoded), encoded);
        }
    }
}
