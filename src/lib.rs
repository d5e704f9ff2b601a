//! This crate checks candidate DGA structures on the minimal free resolution of the binomial edge
//! ideal of the complete graph `K_n`.
//!
//! # Overview
//! A basis element of the resolution in homological degree `h` is a pair consisting of a
//! monomial exponent vector in the `2n` variables `x_0, ..., x_{n-1}, y_0, ..., y_{n-1}` and an
//! [`SBasisPart`](basis::SBasisPart), which is either empty (in degree 0) or a choice of `h + 1`
//! vertices together with a split `x_deg + y_deg = h + 1`. The modules here are
//!
//!  - [`grading`]: turning combinations into compositions, which enumerate exponent vectors.
//!  - [`basis`]: enumerating the basis in each bidegree.
//!  - [`differential`]: the boundary map of the resolution.
//!  - [`product`]: a candidate multiplication whose coefficients are two families of unknowns
//!    `A_k` and `B_k` in a polynomial ring.
//!  - [`leibniz`]: evaluating both sides of the graded Leibniz rule.
//!  - [`constraints`]: turning a failed Leibniz check into linear equations on the unknowns and
//!    solving them.
//!  - [`resolution`]: a context object tying all of the above together for a fixed
//!    [`ResolutionConfig`](config::ResolutionConfig).
//!
//! # Example
//! ```
//! use bei_dga::basis::{BasisElement, SBasisPart};
//! use bei_dga::config::ResolutionConfig;
//! use bei_dga::constraints::{ConstraintSolution, LeibnizConstraints};
//! use bei_dga::resolution::Resolution;
//! use bei_dga::fp::field::Rationals;
//!
//! let config: ResolutionConfig = "5,5@QQ".parse().unwrap();
//! let resolution = Resolution::new(config, Rationals).unwrap();
//!
//! let f1 = resolution.monomial(BasisElement::new(vec![0; 10], SBasisPart::new((1, 1), vec![0, 1])));
//! let f2 = resolution.monomial(BasisElement::new(vec![0; 10], SBasisPart::new((1, 2), vec![1, 2, 3])));
//! assert!(!resolution.verify_leibniz_rule(&f1, &f2));
//!
//! // The failure is a linear system on the unknowns. Solving it and substituting the solution
//! // into the product makes the rule hold.
//! let constraints = LeibnizConstraints::from_defect(&resolution.leibniz_defect(&f1, &f2));
//! let ConstraintSolution::Solution(solution) =
//!     resolution.solve_leibniz_constraints(&constraints).unwrap()
//! else {
//!     panic!("the constraints are consistent");
//! };
//! assert_eq!(solution.to_string_with(resolution.ring()), "A1 = -1, A2 = 1");
//!
//! let specialized = resolution.specialize(&solution).unwrap();
//! assert!(specialized.verify_leibniz_rule(&f1, &f2));
//! ```
//!
//! # Features
//! With the `concurrent` feature, sweeps over whole bidegrees such as
//! [`Resolution::check_chain_condition`](resolution::Resolution::check_chain_condition) run on
//! the rayon thread pool.

#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::upper_case_acronyms)]
#![warn(clippy::default_trait_access)]
#![warn(clippy::if_not_else)]
#![warn(clippy::needless_continue)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::explicit_into_iter_loop)]

pub mod basis;
pub mod config;
pub mod constraints;
pub mod differential;
pub mod grading;
pub mod leibniz;
pub mod product;
pub mod resolution;

pub use algebra;
pub use fp;

use algebra::module::{FreeModule, FreeModuleElement, TensorModule};
use algebra::PolynomialRing;

use crate::basis::BasisElement;

/// The free module spanned by the basis of the resolution in all degrees at once.
pub type ResolutionModule<F> = FreeModule<BasisElement, PolynomialRing<F>>;

/// An element of [`ResolutionModule`].
pub type Element<F> = FreeModuleElement<BasisElement, PolynomialRing<F>>;

/// The tensor square of [`ResolutionModule`], the domain of the product.
pub type TensorSquare<F> = TensorModule<BasisElement, BasisElement, PolynomialRing<F>>;

/// An element of [`TensorSquare`].
pub type TensorElement<F> = FreeModuleElement<(BasisElement, BasisElement), PolynomialRing<F>>;
