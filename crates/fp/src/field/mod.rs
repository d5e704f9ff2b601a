use std::{fmt, hash::Hash};

mod fp;
mod rational;

pub use self::{fp::Fp, rational::Rationals};

/// An exact field of coefficients.
///
/// A field is a small `Copy` value that knows how to operate on its elements. Elements are plain
/// data (`u32` residues or big rationals) and carry no reference to the field, so every operation
/// goes through the field.
pub trait Field: fmt::Debug + fmt::Display + Copy + PartialEq + Eq + Send + Sync + 'static {
    type Element: Clone + fmt::Debug + fmt::Display + PartialEq + Eq + Hash + Send + Sync;

    /// The characteristic of the field, with 0 for the rationals.
    fn characteristic(self) -> u32;

    fn zero(self) -> Self::Element;
    fn one(self) -> Self::Element;

    /// The image of an integer under the unique ring map `Z -> F`.
    fn element(self, n: i64) -> Self::Element;

    fn is_zero(self, a: &Self::Element) -> bool;

    fn add(self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn neg(self, a: &Self::Element) -> Self::Element;
    fn mul(self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Returns `None` when `a` is zero.
    fn inv(self, a: &Self::Element) -> Option<Self::Element>;

    fn sub(self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    fn div(self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        Some(self.mul(a, &self.inv(b)?))
    }

    fn is_one(self, a: &Self::Element) -> bool {
        *a == self.one()
    }

    fn is_minus_one(self, a: &Self::Element) -> bool {
        *a == self.neg(&self.one())
    }
}
