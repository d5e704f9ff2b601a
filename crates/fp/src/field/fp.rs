use std::fmt;

use super::Field;
use crate::prime::{inverse, ValidPrime};

/// A prime field. This is just a wrapper around a prime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fp {
    p: ValidPrime,
}

impl Fp {
    pub const fn new(p: ValidPrime) -> Self {
        Self { p }
    }

    pub const fn prime(self) -> ValidPrime {
        self.p
    }
}

impl fmt::Display for Fp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GF({})", self.p)
    }
}

impl Field for Fp {
    type Element = u32;

    fn characteristic(self) -> u32 {
        self.p.as_u32()
    }

    fn zero(self) -> u32 {
        0
    }

    fn one(self) -> u32 {
        1 % self.p.as_u32()
    }

    fn element(self, n: i64) -> u32 {
        self.p.reduce(n)
    }

    fn is_zero(self, a: &u32) -> bool {
        *a == 0
    }

    fn add(self, a: &u32, b: &u32) -> u32 {
        self.p.sum(*a, *b)
    }

    fn neg(self, a: &u32) -> u32 {
        if *a == 0 {
            0
        } else {
            self.p.as_u32() - *a
        }
    }

    fn mul(self, a: &u32, b: &u32) -> u32 {
        self.p.product(*a, *b)
    }

    fn inv(self, a: &u32) -> Option<u32> {
        if *a == 0 {
            None
        } else {
            Some(inverse(self.p, *a))
        }
    }
}
