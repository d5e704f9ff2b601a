//! The basis of the resolution.
//!
//! In homological degree `h > 0` and internal degree `d`, a basis element is a monomial of degree
//! `d - h - 1` in the variables `x_0, ..., x_{n-1}, y_0, ..., y_{n-1}` together with an
//! [`SBasisPart`] recording `h + 1` vertices and a split `x_deg + y_deg = h + 1`. In degree 0 the
//! monomial has degree `d` and the S-part is empty.
//!
//! Bases are always enumerated in a fixed order: coefficient monomials in the outer loop, ordered
//! lexicographically by their composition, and S-parts in the inner loop, ordered by `x_deg` and
//! then lexicographically by vertex set.

use std::{fmt, sync::Arc};

use dashmap::DashMap as HashMap;
use itertools::{Either, Itertools};

use crate::grading::{binomial, compositions, number_of_compositions};

/// The combinatorial part of a basis element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SBasisPart {
    /// The S-part of every basis element in homological degree 0.
    Empty,
    /// `degrees = (x_deg, y_deg)` with `x_deg + y_deg = vertices.len()`. The vertices are
    /// strictly increasing.
    Positive {
        degrees: (u32, u32),
        vertices: Vec<usize>,
    },
}

impl SBasisPart {
    /// # Panics
    /// Panics if either degree is zero, if the vertices are not strictly increasing, or if there
    /// are not `x_deg + y_deg` of them.
    pub fn new(degrees: (u32, u32), vertices: Vec<usize>) -> Self {
        assert!(
            degrees.0 >= 1 && degrees.1 >= 1,
            "S-part degrees {degrees:?} must be positive"
        );
        assert_eq!(
            (degrees.0 + degrees.1) as usize,
            vertices.len(),
            "S-part degrees {degrees:?} do not match vertices {vertices:?}"
        );
        assert!(
            vertices.iter().tuple_windows().all(|(a, b)| a < b),
            "S-part vertices {vertices:?} are not strictly increasing"
        );
        Self::Positive { degrees, vertices }
    }

    pub fn homological_degree(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Positive { vertices, .. } => vertices.len() as u32 - 1,
        }
    }

    /// `x_deg + y_deg`, which is zero for the empty part.
    pub fn degree_sum(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Positive {
                degrees: (x, y), ..
            } => x + y,
        }
    }

    pub fn vertices(&self) -> &[usize] {
        match self {
            Self::Empty => &[],
            Self::Positive { vertices, .. } => vertices,
        }
    }
}

impl fmt::Display for SBasisPart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "()"),
            Self::Positive {
                degrees: (x, y),
                vertices,
            } => write!(f, "(({x}, {y}), ({}))", vertices.iter().format(", ")),
        }
    }
}

/// A basis element of the resolution. The coefficient vector has length `2n`: the exponents of
/// `x_0, ..., x_{n-1}` followed by those of `y_0, ..., y_{n-1}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasisElement {
    pub coefficients: Vec<u32>,
    pub s_part: SBasisPart,
}

impl BasisElement {
    pub fn new(coefficients: Vec<u32>, s_part: SBasisPart) -> Self {
        assert!(
            coefficients.len() % 2 == 0,
            "Coefficient vector {coefficients:?} has odd length"
        );
        Self {
            coefficients,
            s_part,
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.coefficients.len() / 2
    }

    pub fn homological_degree(&self) -> u32 {
        self.s_part.homological_degree()
    }

    /// The internal degree, which is the degree of the coefficient monomial plus `x_deg + y_deg`.
    pub fn ring_degree(&self) -> u32 {
        self.coefficients.iter().sum::<u32>() + self.s_part.degree_sum()
    }

    /// The coefficient vector with each position in `positions` incremented once.
    pub fn incremented_coefficients(&self, positions: &[usize]) -> Vec<u32> {
        let mut coefficients = self.coefficients.clone();
        for &i in positions {
            coefficients[i] += 1;
        }
        coefficients
    }
}

impl fmt::Display for BasisElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "(({}), {})",
            self.coefficients.iter().format(", "),
            self.s_part
        )
    }
}

/// The degree of the coefficient monomial of a basis element in bidegree `(h, ring_degree)`, or
/// `None` if the bidegree is empty.
pub fn coefficient_degree(h: u32, ring_degree: i32) -> Option<u32> {
    let c = if h == 0 {
        ring_degree
    } else {
        ring_degree - (h as i32 + 1)
    };
    u32::try_from(c).ok()
}

/// The S-parts in homological degree `h`, in basis order.
pub fn s_basis_parts(h: u32, n_vertices: usize) -> impl Iterator<Item = SBasisPart> + Clone {
    if h == 0 {
        return Either::Left(std::iter::once(SBasisPart::Empty));
    }
    Either::Right((1..=h).flat_map(move |x_deg| {
        (0..n_vertices)
            .combinations(h as usize + 1)
            .map(move |vertices| SBasisPart::Positive {
                degrees: (x_deg, h + 1 - x_deg),
                vertices,
            })
    }))
}

/// A lazy enumeration of the basis in bidegree `(h, ring_degree)`.
pub fn basis_elements(
    h: u32,
    ring_degree: i32,
    n_vertices: usize,
) -> impl Iterator<Item = BasisElement> + Clone {
    let parts = s_basis_parts(h, n_vertices);
    coefficient_degree(h, ring_degree)
        .into_iter()
        .flat_map(move |c| {
            compositions(c, 2 * n_vertices)
                .cartesian_product(parts.clone())
                .map(|(coefficients, s_part)| BasisElement {
                    coefficients,
                    s_part,
                })
        })
}

pub fn compute_basis_elements(h: u32, ring_degree: i32, n_vertices: usize) -> Vec<BasisElement> {
    basis_elements(h, ring_degree, n_vertices).collect()
}

/// The S-parts in homological degree `h`, each paired with the zero coefficient vector. These
/// are the generators of the resolution as a free module over the polynomial ring.
pub fn compute_s_basis_elements(h: u32, n_vertices: usize) -> Vec<BasisElement> {
    s_basis_parts(h, n_vertices)
        .map(|s_part| BasisElement {
            coefficients: vec![0; 2 * n_vertices],
            s_part,
        })
        .collect()
}

/// The size of the basis in bidegree `(h, ring_degree)`, computed without enumerating it.
pub fn number_of_basis_elements(h: u32, ring_degree: i32, n_vertices: usize) -> u64 {
    let Some(c) = coefficient_degree(h, ring_degree) else {
        return 0;
    };
    let num_parts = if h == 0 {
        1
    } else {
        h as u64 * binomial(n_vertices as u64, h as u64 + 1)
    };
    number_of_compositions(c, 2 * n_vertices) * num_parts
}

/// The basis in internal degree `ring_degree` across all homological degrees `0..n_vertices`.
pub fn resolution_basis(ring_degree: i32, n_vertices: usize) -> Vec<BasisElement> {
    (0..n_vertices as u32)
        .flat_map(|h| basis_elements(h, ring_degree, n_vertices))
        .collect()
}

/// A thread safe cache of bases, keyed by `(h, ring_degree, n_vertices)`.
#[derive(Default)]
pub struct BasisCache {
    bases: HashMap<(u32, i32, usize), Arc<[BasisElement]>>,
}

impl BasisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, h: u32, ring_degree: i32, n_vertices: usize) -> Arc<[BasisElement]> {
        let basis = self
            .bases
            .entry((h, ring_degree, n_vertices))
            .or_insert_with(|| {
                let basis: Arc<[BasisElement]> =
                    basis_elements(h, ring_degree, n_vertices).collect();
                tracing::debug!(h, ring_degree, n_vertices, size = basis.len(), "computed basis");
                basis
            });
        Arc::clone(basis.value())
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}
