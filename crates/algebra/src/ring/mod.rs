use std::fmt;

mod polynomial;

pub use polynomial::{LinearForm, Monomial, Polynomial, PolynomialRing};

/// A commutative ring whose elements are exact values.
///
/// As with [`fp::field::Field`], the ring object performs the arithmetic and the elements are
/// plain data. The free module code only ever adds, negates and multiplies ring elements and asks
/// whether they are zero, so this is all the trait requires.
pub trait Ring: fmt::Display + Send + Sync + 'static {
    type Element: Clone + fmt::Debug + PartialEq + Send + Sync;

    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;

    /// The image of an integer under the unique ring map `Z -> R`.
    fn from_integer(&self, n: i64) -> Self::Element;

    fn is_zero(&self, x: &Self::Element) -> bool;

    fn add_assign(&self, x: &mut Self::Element, y: &Self::Element);
    fn neg(&self, x: &Self::Element) -> Self::Element;
    fn mul(&self, x: &Self::Element, y: &Self::Element) -> Self::Element;

    fn element_to_string(&self, x: &Self::Element) -> String;

    fn add(&self, x: &Self::Element, y: &Self::Element) -> Self::Element {
        let mut result = x.clone();
        self.add_assign(&mut result, y);
        result
    }

    fn sub(&self, x: &Self::Element, y: &Self::Element) -> Self::Element {
        self.add(x, &self.neg(y))
    }

    fn is_one(&self, x: &Self::Element) -> bool {
        *x == self.one()
    }

    fn is_minus_one(&self, x: &Self::Element) -> bool {
        *x == self.neg(&self.one())
    }
}
