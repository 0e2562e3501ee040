//! Stacks address parsing.
//!
//! Literal addresses use the c32check encoding:
//! - a leading `S`
//! - one c32 character carrying the address version (`P` mainnet, `T` testnet, ...)
//! - the c32-encoded payload: a hash160 followed by a 4-byte checksum
//!
//! The checksum is the first 4 bytes of `sha256(sha256(version || hash160))`.
//!
//! This module is the single place in the workspace that decides whether a
//! string is a literal address. Account aliases such as `wallet_1` are never
//! addresses.

use sha2::{Digest, Sha256};
use std::fmt;

/// Crockford-style base32 alphabet used by c32check.
pub const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// The all-zero testnet address.
pub const TESTNET_ZERO_ADDRESS: &str = "ST000000000000000000002AMW42H";

pub const MAINNET_SINGLE_SIG: u8 = 22;
pub const MAINNET_MULTI_SIG: u8 = 20;
pub const TESTNET_SINGLE_SIG: u8 = 26;
pub const TESTNET_MULTI_SIG: u8 = 21;

/// A decoded literal address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StacksAddress {
    /// Address version (see the `*_SIG` constants).
    pub version: u8,
    /// Decoded payload without the checksum, normally 20 bytes.
    pub hash160: Vec<u8>,
}

impl StacksAddress {
    pub fn is_mainnet(&self) -> bool {
        matches!(self.version, MAINNET_SINGLE_SIG | MAINNET_MULTI_SIG)
    }

    pub fn hash160_hex(&self) -> String {
        hex::encode(&self.hash160)
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_address(self.version, &self.hash160))
    }
}

/// Why a candidate string is not a literal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Addresses are longer than 5 characters.
    InvalidLength(usize),
    /// Addresses start with an uppercase `S`.
    MissingPrefix,
    /// A character outside the c32 alphabet.
    InvalidCharacter(char),
    ChecksumMismatch { expected: String, got: String },
    /// Version does not fit in a single c32 digit.
    InvalidVersion(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidLength(len) => {
                write!(f, "Invalid c32 address: invalid length {}", len)
            }
            AddressError::MissingPrefix => {
                write!(f, "Invalid c32 address: must start with \"S\"")
            }
            AddressError::InvalidCharacter(c) => {
                write!(f, "Not a c32-encoded string: unexpected character {:?}", c)
            }
            AddressError::ChecksumMismatch { expected, got } => write!(
                f,
                "Invalid c32check string: checksum mismatch (expected {}, got {})",
                expected, got
            ),
            AddressError::InvalidVersion(version) => {
                write!(f, "Invalid c32 address version {}", version)
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// Parse a literal address.
///
/// # Examples
///
/// ```
/// use simnet_harness_types::address::{parse_address, TESTNET_SINGLE_SIG};
///
/// let addr = parse_address("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5").unwrap();
/// assert_eq!(addr.version, TESTNET_SINGLE_SIG);
/// assert_eq!(addr.hash160.len(), 20);
///
/// assert!(parse_address("wallet_1").is_err());
/// ```
pub fn parse_address(candidate: &str) -> Result<StacksAddress, AddressError> {
    let len = candidate.chars().count();
    if len <= 5 {
        return Err(AddressError::InvalidLength(len));
    }
    let rest = candidate
        .strip_prefix('S')
        .ok_or(AddressError::MissingPrefix)?;

    let normalized = c32_normalize(rest);
    let mut chars = normalized.chars();
    let version_char = chars.next().ok_or(AddressError::InvalidLength(len))?;
    let version = c32_digit(version_char)?;
    let data = c32_decode(chars.as_str())?;

    if data.len() < 4 {
        return Err(AddressError::ChecksumMismatch {
            expected: "4 checksum bytes".to_string(),
            got: hex::encode(&data),
        });
    }
    let (hash160, checksum) = data.split_at(data.len() - 4);
    let expected = c32_checksum(version, hash160);
    if expected != checksum {
        return Err(AddressError::ChecksumMismatch {
            expected: hex::encode(expected),
            got: hex::encode(checksum),
        });
    }

    Ok(StacksAddress {
        version,
        hash160: hash160.to_vec(),
    })
}

/// Returns true iff `candidate` parses as a literal address.
///
/// Parse failures are swallowed; this never errors.
pub fn is_address(candidate: &str) -> bool {
    parse_address(candidate).is_ok()
}

/// Encode a version and payload as a c32check address string.
///
/// Versions above 31 cannot be encoded; they are reported by
/// [`try_encode_address`]. This function clamps them into the alphabet.
pub fn encode_address(version: u8, hash160: &[u8]) -> String {
    try_encode_address(version, hash160)
        .unwrap_or_else(|_| encode_unchecked(version & 0x1f, hash160))
}

/// Encode a version and payload, rejecting versions above 31.
pub fn try_encode_address(version: u8, hash160: &[u8]) -> Result<String, AddressError> {
    if usize::from(version) >= C32_ALPHABET.len() {
        return Err(AddressError::InvalidVersion(version));
    }
    Ok(encode_unchecked(version, hash160))
}

fn encode_unchecked(version: u8, hash160: &[u8]) -> String {
    let mut data = hash160.to_vec();
    data.extend_from_slice(&c32_checksum(version, hash160));

    let mut out = String::with_capacity(2 + data.len() * 8 / 5 + 1);
    out.push('S');
    out.push(C32_ALPHABET[usize::from(version)] as char);
    out.push_str(&c32_encode(&data));
    out
}

fn c32_normalize(input: &str) -> String {
    input
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            'L' | 'I' => '1',
            other => other,
        })
        .collect()
}

fn c32_digit(c: char) -> Result<u8, AddressError> {
    C32_ALPHABET
        .iter()
        .position(|&a| char::from(a) == c)
        .map(|idx| idx as u8)
        .ok_or(AddressError::InvalidCharacter(c))
}

/// Decode a c32 string as a big-endian number.
///
/// Every leading `0` digit becomes one leading zero byte.
fn c32_decode(input: &str) -> Result<Vec<u8>, AddressError> {
    let digits = input.chars().map(c32_digit).collect::<Result<Vec<_>, _>>()?;
    let leading_zeros = digits.iter().take_while(|&&d| d == 0).count();

    let mut bytes = Vec::with_capacity(digits.len() * 5 / 8 + 1);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &digit in digits.iter().rev() {
        acc |= u32::from(digit) << bits;
        bits += 5;
        while bits >= 8 {
            bytes.push((acc & 0xff) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        bytes.push((acc & 0xff) as u8);
    }
    bytes.reverse();

    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let mut decoded = vec![0u8; leading_zeros];
    decoded.extend_from_slice(&bytes[first_nonzero..]);
    Ok(decoded)
}

/// Inverse of [`c32_decode`].
fn c32_encode(data: &[u8]) -> String {
    let leading_zeros = data.iter().take_while(|&&b| b == 0).count();

    let mut digits = Vec::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in data.iter().rev() {
        acc |= u32::from(byte) << bits;
        bits += 8;
        while bits >= 5 {
            digits.push((acc & 0x1f) as usize);
            acc >>= 5;
            bits -= 5;
        }
    }
    if bits > 0 {
        digits.push((acc & 0x1f) as usize);
    }
    while digits.last() == Some(&0) {
        digits.pop();
    }

    let mut out = "0".repeat(leading_zeros);
    out.extend(digits.iter().rev().map(|&d| char::from(C32_ALPHABET[d])));
    out
}

fn c32_checksum(version: u8, payload: &[u8]) -> [u8; 4] {
    let mut hasher = Sha256::new();
    hasher.update([version]);
    hasher.update(payload);
    let first = hasher.finalize();
    let second = Sha256::digest(first);

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&second[..4]);
    checksum
}
