use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::Field;

/// The field of rational numbers, with arbitrary precision numerators and denominators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rationals;

impl fmt::Display for Rationals {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QQ")
    }
}

impl Field for Rationals {
    type Element = BigRational;

    fn characteristic(self) -> u32 {
        0
    }

    fn zero(self) -> BigRational {
        BigRational::zero()
    }

    fn one(self) -> BigRational {
        BigRational::one()
    }

    fn element(self, n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn is_zero(self, a: &BigRational) -> bool {
        a.is_zero()
    }

    fn add(self, a: &BigRational, b: &BigRational) -> BigRational {
        a + b
    }

    fn neg(self, a: &BigRational) -> BigRational {
        -a
    }

    fn mul(self, a: &BigRational, b: &BigRational) -> BigRational {
        a * b
    }

    fn inv(self, a: &BigRational) -> Option<BigRational> {
        if a.is_zero() {
            None
        } else {
            Some(a.recip())
        }
    }
}
