//! Two-word representation of 64-bit integer values.
//!
//! `LongBits` holds a 64-bit bit pattern as two unsigned 32-bit words and does
//! all of its arithmetic on those words with explicit carries. Decimal parsing
//! accumulates 16-bit limbs, so no step depends on a wide native integer or on
//! float precision. The one lossy boundary is [`LongBits::to_number`].
//!
//! `LongHash` is the 8-byte key form of a `LongBits`: the little-endian bytes
//! of `lo` followed by those of `hi`. It is an opaque map key, not text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LongBitsError, Result};

/// 2^32 as a float, the weight of the `hi` word.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Decimal digits folded into the accumulator per step. 10^4 fits in 16 bits,
/// which keeps every limb product below 2^32.
const DECIMAL_CHUNK: usize = 4;

const POW10: [u32; DECIMAL_CHUNK + 1] = [1, 10, 100, 1_000, 10_000];

/// A 64-bit bit pattern split into low and high unsigned 32-bit words.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct LongBits {
    /// Low 32 bits.
    pub lo: u32,
    /// High 32 bits.
    pub hi: u32,
}

/// The `{ low, high, unsigned }` shape used by arbitrary-precision long types.
///
/// Words are signed here, as such types store them; conversion to `LongBits`
/// reinterprets the bits without renormalizing.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Long {
    pub low: i32,
    pub high: i32,
    pub unsigned: bool,
}

/// Any input shape a 64-bit field value may arrive in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LongValue<'a> {
    /// A plain number. Fractions truncate toward zero.
    Number(f64),
    /// Decimal text with an optional sign. May exceed float precision.
    Text(&'a str),
    /// Explicit low/high words.
    Parts(Long),
}

impl LongBits {
    /// The zero pattern.
    pub const ZERO: Self = Self { lo: 0, hi: 0 };

    pub const fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// Convert any supported input shape.
    ///
    /// Fails only when numeric text is malformed.
    pub fn from_value(value: LongValue<'_>) -> Result<Self> {
        match value {
            LongValue::Number(n) => Ok(Self::from_number(n)),
            LongValue::Text(s) => s.parse(),
            LongValue::Parts(long) => Ok(Self::from(long)),
        }
    }

    /// Convert a float, truncating toward zero.
    ///
    /// Zero (either sign), NaN, and infinities give [`LongBits::ZERO`].
    /// Negative values produce the two's-complement pattern of their
    /// magnitude. Magnitudes of 2^64 and above wrap.
    pub fn from_number(value: f64) -> Self {
        if value == 0.0 || !value.is_finite() {
            return Self::ZERO;
        }
        let negative = value < 0.0;
        let magnitude = value.abs();
        let lo = to_uint32(magnitude);
        let hi = to_uint32((magnitude - f64::from(lo)) / TWO_POW_32);
        let bits = Self { lo, hi };
        if negative { bits.negate() } else { bits }
    }

    /// Reconstruct a float from the two words.
    ///
    /// With `unsigned == false` a set high bit means a negative two's-complement
    /// value. Exact only up to 2^53 in magnitude; larger values round to the
    /// nearest representable `f64`.
    pub fn to_number(self, unsigned: bool) -> f64 {
        if !unsigned && self.hi >> 31 != 0 {
            let Self { lo, hi } = self.negate();
            return -(f64::from(lo) + f64::from(hi) * TWO_POW_32);
        }
        f64::from(self.lo) + f64::from(self.hi) * TWO_POW_32
    }

    /// The `{ low, high, unsigned }` form of this pattern.
    pub fn to_long(self, unsigned: bool) -> Long {
        Long {
            low: self.lo as i32,
            high: self.hi as i32,
            unsigned,
        }
    }

    /// Encode as an 8-byte hash key.
    pub fn to_hash(self) -> LongHash {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&self.lo.to_le_bytes());
        bytes[4..].copy_from_slice(&self.hi.to_le_bytes());
        LongHash(bytes)
    }

    /// Decode an 8-byte hash key. Any other length yields [`LongBits::ZERO`].
    pub fn from_hash(hash: &[u8]) -> Self {
        match LongHash::try_from_slice(hash) {
            Some(hash) => Self::from(hash),
            None => {
                tracing::debug!("long hash has {} bytes, expected 8; using zero", hash.len());
                Self::ZERO
            }
        }
    }

    /// ZigZag-encode a signed pattern so small magnitudes stay small.
    pub fn zz_encode(self) -> Self {
        let mask = ((self.hi as i32) >> 31) as u32;
        Self {
            lo: (self.lo << 1) ^ mask,
            hi: ((self.hi << 1) | (self.lo >> 31)) ^ mask,
        }
    }

    /// Inverse of [`LongBits::zz_encode`].
    pub fn zz_decode(self) -> Self {
        let mask = (self.lo & 1).wrapping_neg();
        Self {
            lo: ((self.lo >> 1) | (self.hi << 31)) ^ mask,
            hi: (self.hi >> 1) ^ mask,
        }
    }

    /// Bytes this value takes as a base-128 varint (1..=10).
    pub fn varint_len(self) -> usize {
        let part0 = self.lo;
        let part1 = (self.lo >> 28) | (self.hi << 4);
        let part2 = self.hi >> 24;
        if part2 != 0 {
            return if part2 < 1 << 7 { 9 } else { 10 };
        }
        let (part, base) = if part1 == 0 { (part0, 0) } else { (part1, 4) };
        base + match part {
            p if p < 1 << 7 => 1,
            p if p < 1 << 14 => 2,
            p if p < 1 << 21 => 3,
            _ => 4,
        }
    }

    pub const fn from_u64(value: u64) -> Self {
        Self {
            lo: value as u32,
            hi: (value >> 32) as u32,
        }
    }

    pub const fn to_u64(self) -> u64 {
        (self.hi as u64) << 32 | self.lo as u64
    }

    pub const fn from_i64(value: i64) -> Self {
        Self::from_u64(value as u64)
    }

    pub const fn to_i64(self) -> i64 {
        self.to_u64() as i64
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Two's-complement negation, carrying from `lo` into `hi`.
    fn negate(self) -> Self {
        let lo = (!self.lo).wrapping_add(1);
        let hi = if lo == 0 { (!self.hi).wrapping_add(1) } else { !self.hi };
        Self { lo, hi }
    }

    /// `self * mul + add` modulo 2^64, computed over 16-bit limbs.
    ///
    /// `mul` and `add` must each fit in 16 bits.
    fn mul_add(self, mul: u32, add: u32) -> Self {
        let mut limbs = [self.lo & 0xffff, self.lo >> 16, self.hi & 0xffff, self.hi >> 16];
        let mut carry = add;
        for limb in &mut limbs {
            let product = *limb * mul + carry;
            *limb = product & 0xffff;
            carry = product >> 16;
        }
        Self {
            lo: limbs[0] | limbs[1] << 16,
            hi: limbs[2] | limbs[3] << 16,
        }
    }
}

/// ECMAScript-style ToUint32 on an already finite, non-negative value.
fn to_uint32(value: f64) -> u32 {
    value.trunc().rem_euclid(TWO_POW_32) as u32
}

impl FromStr for LongBits {
    type Err = LongBitsError;

    /// Parse optionally signed decimal text. Values wider than 64 bits wrap.
    fn from_str(s: &str) -> Result<Self> {
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() {
            return Err(LongBitsError::Empty);
        }
        let sign_len = s.len() - digits.len();
        if let Some(pos) = digits.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(LongBitsError::InvalidDigit {
                input: s.to_string(),
                position: sign_len + pos,
            });
        }

        let mut bits = Self::ZERO;
        for chunk in digits.as_bytes().chunks(DECIMAL_CHUNK) {
            let value = chunk
                .iter()
                .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
            bits = bits.mul_add(POW10[chunk.len()], value);
        }
        Ok(if negative { bits.negate() } else { bits })
    }
}

impl From<Long> for LongBits {
    fn from(long: Long) -> Self {
        Self {
            lo: long.low as u32,
            hi: long.high as u32,
        }
    }
}

impl From<u64> for LongBits {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<i64> for LongBits {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<LongBits> for u64 {
    fn from(bits: LongBits) -> u64 {
        bits.to_u64()
    }
}

impl From<LongHash> for LongBits {
    fn from(hash: LongHash) -> Self {
        let [b0, b1, b2, b3, b4, b5, b6, b7] = hash.0;
        Self {
            lo: u32::from_le_bytes([b0, b1, b2, b3]),
            hi: u32::from_le_bytes([b4, b5, b6, b7]),
        }
    }
}

impl From<LongBits> for LongHash {
    fn from(bits: LongBits) -> Self {
        bits.to_hash()
    }
}

impl From<f64> for LongValue<'_> {
    fn from(n: f64) -> Self {
        LongValue::Number(n)
    }
}

impl From<i32> for LongValue<'_> {
    fn from(n: i32) -> Self {
        LongValue::Number(f64::from(n))
    }
}

impl<'a> From<&'a str> for LongValue<'a> {
    fn from(s: &'a str) -> Self {
        LongValue::Text(s)
    }
}

impl From<Long> for LongValue<'_> {
    fn from(long: Long) -> Self {
        LongValue::Parts(long)
    }
}

// ── Hash keys ───────────────────────────────────────────────────────────────

/// Opaque 8-byte key encoding of a [`LongBits`].
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongHash([u8; 8]);

/// The hash of [`LongBits::ZERO`].
pub const ZERO_HASH: LongHash = LongHash([0; 8]);

impl LongHash {
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// The raw 8 bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Reconstruct from a byte slice (must be exactly 8 bytes).
    pub fn try_from_slice(b: &[u8]) -> Option<Self> {
        <[u8; 8]>::try_from(b).ok().map(Self)
    }

    /// Lowercase hex of the raw bytes, in storage order. For logs only.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for LongHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LongHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LongHash({})", self.to_hex())
    }
}

// ── Comparison ──────────────────────────────────────────────────────────────

/// Whether `candidate` names a different 64-bit value than `(lo, hi)`.
///
/// `Parts` candidates are compared word by word as given. Numbers and text
/// are converted first, so malformed text is reported as an error.
pub fn long_ne(candidate: LongValue<'_>, lo: u32, hi: u32) -> Result<bool> {
    let bits = match candidate {
        LongValue::Parts(long) => LongBits::from(long),
        other => LongBits::from_value(other)?,
    };
    Ok(bits.lo != lo || bits.hi != hi)
}

// ============================================================================
// Tests
// ============================================================================
