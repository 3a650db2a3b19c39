use sha1::{Digest, Sha1};

/// Lowercase hex lookup table, matching the usual `hexdigest()` rendering.
pub const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Length of a SHA1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// Fingerprints candidate strings during a scan.
///
/// The scan only needs equality on the output, so any deterministic function
/// works. The output must expose its bytes so a trial can record it as hex.
pub trait Digester {
    type Output: PartialEq + AsRef<[u8]>;

    fn digest(&self, input: &[u8]) -> Self::Output;
}

/// SHA1, the digest the recorded reports use.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Digester;

impl Digester for Sha1Digester {
    type Output = [u8; SHA1_LEN];

    #[inline(always)]
    fn digest(&self, input: &[u8]) -> Self::Output {
        sha1(input)
    }
}

/// Computes the raw SHA1 digest of `input`.
#[inline(always)]
pub fn sha1(input: &[u8]) -> [u8; SHA1_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Computes the lowercase hex SHA1 digest of `input`.
pub fn sha1_hex(input: &str) -> String {
    to_hex(&sha1(input.as_bytes()))
}

/// Renders bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}
