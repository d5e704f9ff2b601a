use std::{fmt, str::FromStr};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

/// A prime number that fits in 31 bits. This is the characteristic of an [`Fp`](crate::field::Fp)
/// base field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidPrime {
    p: u32,
}

pub const fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    // (2..p).take_while(k * k <= p).all(|k| p % k != 0), but make it const
    let mut k = 2;
    while k * k <= p {
        if p % k == 0 {
            return false;
        }
        k += 1;
    }
    true
}

impl ValidPrime {
    pub const fn new(p: u32) -> Self {
        // Products of two reduced elements are computed in u64, so p has to fit in 31 bits for
        // `p * p` not to overflow in intermediate sums.
        assert!(p < (1 << 31), "Tried to construct a prime larger than 2^31");
        assert!(is_prime(p), "Tried to construct a composite dynamic prime");
        Self { p }
    }

    pub const fn as_u32(self) -> u32 {
        self.p
    }

    pub const fn as_i64(self) -> i64 {
        self.p as i64
    }

    /// Computes the sum mod p. This takes care of overflow.
    pub fn sum(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 + n2 as u64) % self.p as u64) as u32
    }

    /// Computes the product mod p. This takes care of overflow.
    pub fn product(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 * n2 as u64) % self.p as u64) as u32
    }

    /// Reduce a signed integer to its representative in `0..p`.
    pub fn reduce(self, n: i64) -> u32 {
        n.rem_euclid(self.as_i64()) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeError {
    NotAnInteger(std::num::ParseIntError),
    InvalidPrime(u32),
}

impl fmt::Display for PrimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnInteger(s) => write!(f, "Not an integer: {s}"),
            Self::InvalidPrime(p) => write!(f, "{p} is not a valid prime"),
        }
    }
}

impl std::error::Error for PrimeError {}

impl TryFrom<u32> for ValidPrime {
    type Error = PrimeError;

    fn try_from(p: u32) -> Result<Self, PrimeError> {
        if p < (1 << 31) && is_prime(p) {
            Ok(Self { p })
        } else {
            Err(PrimeError::InvalidPrime(p))
        }
    }
}

impl FromStr for ValidPrime {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p: u32 = s.trim().parse().map_err(PrimeError::NotAnInteger)?;
        Self::try_from(p)
    }
}

impl PartialEq<u32> for ValidPrime {
    fn eq(&self, other: &u32) -> bool {
        self.p == *other
    }
}

impl From<ValidPrime> for u32 {
    fn from(value: ValidPrime) -> u32 {
        value.p
    }
}

impl fmt::Display for ValidPrime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <u32 as fmt::Display>::fmt(&self.p, f)
    }
}

impl Serialize for ValidPrime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.p.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidPrime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let p: u32 = u32::deserialize(deserializer)?;
        Self::try_from(p).map_err(D::Error::custom)
    }
}

/// Compute b^e mod p.
pub const fn power_mod(p: u32, mut b: u32, mut e: u32) -> u32 {
    assert!(p > 0);
    let mut result: u32 = 1;
    while e > 0 {
        if (e & 1) == 1 {
            result = ((result as u64) * (b as u64) % (p as u64)) as u32;
        }
        b = (((b as u64) * (b as u64)) % (p as u64)) as u32;
        e >>= 1;
    }
    result
}

/// The multiplicative inverse of `k` mod `p`, by Fermat's little theorem.
pub fn inverse(p: ValidPrime, k: u32) -> u32 {
    assert!(k > 0 && p.as_u32() > k);
    power_mod(p.as_u32(), k, p.as_u32() - 2)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{inverse, is_prime, PrimeError, ValidPrime};
    use proptest::prelude::*;

    #[test]
    fn validprime_test() {
        for p in (0..(1 << 12)).filter(|&p| is_prime(p)) {
            assert_eq!(ValidPrime::new(p), p);
        }
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(!is_prime(91));
    }

    #[test]
    fn validprime_invalid() {
        assert_eq!(
            ValidPrime::try_from(4).unwrap_err(),
            PrimeError::InvalidPrime(4)
        );
        assert_eq!(
            "4".parse::<ValidPrime>().unwrap_err(),
            PrimeError::InvalidPrime(4)
        );
        assert_eq!(
            "4.0".parse::<ValidPrime>().unwrap_err(),
            PrimeError::NotAnInteger("4.0".parse::<u32>().unwrap_err())
        );
    }

    #[test]
    fn inverse_test() {
        for p in [2, 3, 5, 7, 11, 13, 65521] {
            let p = ValidPrime::new(p);
            for k in (1..p.as_u32()).take(500) {
                assert_eq!(p.product(inverse(p, k), k), 1);
            }
        }
    }

    #[test]
    fn reduce_negative() {
        let p = ValidPrime::new(7);
        assert_eq!(p.reduce(-1), 6);
        assert_eq!(p.reduce(-14), 0);
        assert_eq!(p.reduce(23), 2);
    }

    proptest! {
        #[test]
        fn arithmetic_matches_integers(a in -1000i64..1000, b in -1000i64..1000) {
            let p = ValidPrime::new(31);
            let (x, y) = (p.reduce(a), p.reduce(b));
            prop_assert_eq!(p.sum(x, y), p.reduce(a + b));
            prop_assert_eq!(p.product(x, y), p.reduce(a * b));
        }
    }

    #[test]
    fn serde_roundtrip_rejects_composites() {
        let p: ValidPrime = serde_json::from_str("13").unwrap();
        assert_eq!(p, 13);
        assert!(serde_json::from_str::<ValidPrime>("15").is_err());
    }
}
