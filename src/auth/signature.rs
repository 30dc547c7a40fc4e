use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sm3::{Digest, Sm3};

use crate::params::RequestParams;
use crate::{Result, YidunError};

pub const SIGNATURE_KEY: &str = "signature";
pub const SIGNATURE_METHOD_KEY: &str = "signatureMethod";

/// Digest used to sign the canonical parameter string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureMethod {
    #[default]
    Md5,
    Sm3,
}

impl SignatureMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sm3 => "SM3",
        }
    }

    fn digest_hex(self, bytes: &[u8]) -> String {
        match self {
            Self::Md5 => hex_encode(&Md5::digest(bytes)),
            Self::Sm3 => hex_encode(&Sm3::digest(bytes)),
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = YidunError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MD5" => Ok(Self::Md5),
            "SM3" => Ok(Self::Sm3),
            other => Err(YidunError::InvalidConfig(format!(
                "unknown signature method {other:?} (expected MD5 or SM3)"
            ))),
        }
    }
}

/// Builds `k1v1k2v2...secret` over every parameter except `signature`.
///
/// Keys come out of [`RequestParams`] in ascending byte order already.
pub fn canonical_string(params: &RequestParams, secret_key: &str) -> String {
    let mut out = String::new();
    for (key, value) in params.iter() {
        if key == SIGNATURE_KEY {
            continue;
        }
        out.push_str(key);
        out.push_str(&value.to_string());
    }
    out.push_str(secret_key);
    out
}

/// Lowercase hex digest of the canonical string.
pub fn sign(params: &RequestParams, secret_key: &str, method: SignatureMethod) -> String {
    method.digest_hex(canonical_string(params, secret_key).as_bytes())
}

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}
