//! Types and traits for working with polynomial coefficient rings and the free modules over them.
//!
//! A [`ring::PolynomialRing`] is a commutative polynomial ring over an exact [`fp::field::Field`]
//! with a finite ordered list of named indeterminates. A [`module::FreeModule`] is the free module
//! over such a ring on an arbitrary (possibly infinite) set of basis keys, and its elements are
//! finite formal linear combinations. Maps out of a free module are specified on basis keys and
//! extended linearly through [`module::homomorphism::ModuleHomomorphism`].

pub mod module;
pub mod ring;

pub use ring::{Monomial, Polynomial, PolynomialRing, Ring};
