//! Exact arithmetic for the coefficients of polynomials and module elements.
//!
//! The [`field::Field`] trait abstracts over the two kinds of base field we support: finite prime
//! fields [`field::Fp`] and the rational numbers [`field::Rationals`]. Both are exact, so equality
//! with zero is a genuine equality test.

#![allow(clippy::many_single_char_names)]
#![warn(clippy::default_trait_access)]
#![warn(clippy::if_not_else)]
#![warn(clippy::explicit_iter_loop)]

pub mod field;
pub mod prime;
