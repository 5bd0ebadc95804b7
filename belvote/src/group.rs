//! Value types over the ed25519 group.
//!
//! `Point` and `Scalar` wrap the dalek types and pin down the wire encodings
//! the rest of the protocol hashes over: points as lowercase hex of the
//! byte-reversed compressed Edwards encoding, scalars as strict decimal
//! strings. Both encodings must stay bit-compatible with the ballot format or
//! every Fiat-Shamir challenge in the system changes.

use crate::Error;
use curve25519_dalek::constants;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar as EdScalar;
use curve25519_dalek::traits::Identity;
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Add, Mul, Neg, Sub};

lazy_static! {
    /// Order L of the prime-order subgroup, as an integer.
    static ref GROUP_ORDER: BigUint =
        BigUint::from_bytes_le(constants::BASEPOINT_ORDER.as_bytes());
}

/// An element of the ed25519 curve. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point(EdwardsPoint);

impl Point {
    pub fn generator() -> Point {
        Point(constants::ED25519_BASEPOINT_POINT)
    }

    pub fn identity() -> Point {
        Point(EdwardsPoint::identity())
    }

    /// True iff the point lies in the prime-order subgroup and is not the
    /// identity. Every alpha/beta pulled from a ballot must pass this before
    /// being used in any proof check; accepting small-subgroup points would
    /// break the homomorphic properties the proofs rely on.
    pub fn is_valid(&self) -> bool {
        self.0.is_torsion_free() && self.0 != EdwardsPoint::identity()
    }

    /// Hex encoding of the byte-reversed compressed point.
    pub fn to_hex(&self) -> String {
        let mut bytes = self.0.compress().to_bytes();
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Strict decode: exactly 64 lowercase hex chars that decompress to a
    /// curve point. Subgroup membership is a separate concern (`is_valid`).
    pub fn from_hex(s: &str) -> Result<Point, Error> {
        if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(Error::MalformedPoint(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::MalformedPoint(s.to_string()))?;
        bytes.reverse();
        CompressedEdwardsY(bytes)
            .decompress()
            .map(Point)
            .ok_or_else(|| Error::MalformedPoint(s.to_string()))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0 + other.0)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    fn mul(self, other: Scalar) -> Point {
        Point(self.0 * other.0)
    }
}

impl Serialize for Point {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Point::from_hex(&s).map_err(de::Error::custom)
    }
}

/// An integer in [0, L), L being the group order. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar(EdScalar);

impl Scalar {
    pub fn zero() -> Scalar {
        Scalar(EdScalar::zero())
    }

    pub fn one() -> Scalar {
        Scalar(EdScalar::one())
    }

    pub fn from_u64(n: u64) -> Scalar {
        Scalar(EdScalar::from(n))
    }

    /// Uniform scalar from 512 bits of rng output reduced mod L.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);
        Scalar(EdScalar::from_bytes_mod_order_wide(&wide))
    }

    /// Interpret up to 64 big-endian bytes as an integer and reduce mod L.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Scalar {
        debug_assert!(bytes.len() <= 64);
        let mut wide = [0u8; 64];
        for (i, b) in bytes.iter().rev().enumerate() {
            wide[i] = *b;
        }
        Scalar(EdScalar::from_bytes_mod_order_wide(&wide))
    }

    /// Decimal wire encoding.
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_le(self.0.as_bytes()).to_str_radix(10)
    }

    /// Strict decimal parse: digits only, no redundant leading zeros, and the
    /// value must already be reduced mod L. Anything else is rejected rather
    /// than coerced.
    pub fn from_decimal(s: &str) -> Result<Scalar, Error> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedScalar(s.to_string()));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(Error::MalformedScalar(s.to_string()));
        }
        let n: BigUint = s
            .parse()
            .map_err(|_| Error::MalformedScalar(s.to_string()))?;
        if n >= *GROUP_ORDER {
            return Err(Error::MalformedScalar(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        let le = n.to_bytes_le();
        bytes[..le.len()].copy_from_slice(&le);
        Ok(Scalar(EdScalar::from_bits(bytes)))
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar(self.0 + other.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        Scalar(self.0 - other.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar(self.0 * other.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Scalar::from_decimal(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn point_hex_roundtrip() {
        let mut csprng = OsRng {};
        let p = Point::generator() * Scalar::random(&mut csprng);
        let hex = p.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Point::from_hex(&hex).unwrap(), p);
    }

    #[test]
    fn point_hex_is_byte_reversed() {
        // The wire encoding reverses the compressed bytes, so the generator's
        // canonical 0x58...66 compressed form ends with "58" on the wire.
        let hex = Point::generator().to_hex();
        assert!(hex.ends_with("58"));
    }

    #[test]
    fn point_hex_strict() {
        let hex = Point::generator().to_hex();
        assert!(Point::from_hex(&hex.to_uppercase()).is_err());
        assert!(Point::from_hex(&hex[..62]).is_err());
        assert!(Point::from_hex("zz").is_err());
    }

    #[test]
    fn identity_is_not_valid() {
        assert!(!Point::identity().is_valid());
        assert!(Point::generator().is_valid());
    }

    #[test]
    fn scalar_decimal_roundtrip() {
        let mut csprng = OsRng {};
        for _ in 0..10 {
            let s = Scalar::random(&mut csprng);
            assert_eq!(Scalar::from_decimal(&s.to_decimal()).unwrap(), s);
        }
        assert_eq!(Scalar::zero().to_decimal(), "0");
        assert_eq!(Scalar::from_decimal("0").unwrap(), Scalar::zero());
    }

    #[test]
    fn scalar_decimal_strict() {
        assert!(Scalar::from_decimal("").is_err());
        assert!(Scalar::from_decimal("01").is_err());
        assert!(Scalar::from_decimal("1a").is_err());
        assert!(Scalar::from_decimal("-1").is_err());
        // L itself is out of range
        assert!(Scalar::from_decimal(
            "7237005577332262213973186563042994240857116359379907606001950938285454250989"
        )
        .is_err());
        // L - 1 is fine
        assert!(Scalar::from_decimal(
            "7237005577332262213973186563042994240857116359379907606001950938285454250988"
        )
        .is_ok());
    }

    #[test]
    fn reduction_matches_bigint_arithmetic() {
        // 2^256 - 1 mod L, computed independently
        let bytes = [0xffu8; 32];
        let reduced = Scalar::from_be_bytes_mod_order(&bytes);
        let expected = BigUint::from_bytes_be(&bytes) % &*GROUP_ORDER;
        assert_eq!(reduced.to_decimal(), expected.to_str_radix(10));
    }
}
