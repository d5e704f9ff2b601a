//! Linear conditions on the unknowns of the product.
//!
//! When the product has symbolic coefficients, the Leibniz defect of a pair of generators is a
//! combination of basis elements whose coefficients are polynomials in the unknowns. The rule
//! holds for some specialization of the unknowns exactly when all of these polynomials vanish
//! there. For the product of [`crate::product`] they are affine-linear, so we can solve them by
//! row reduction over the base field.

use std::{collections::BTreeMap, fmt};

use algebra::{Polynomial, PolynomialRing, Ring};
use fp::field::Field;
use itertools::Itertools;

use crate::basis::BasisElement;
use crate::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The coefficient of this basis element has a term of degree at least 2.
    NonLinear { key: String, constraint: String },
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonLinear { key, constraint } => write!(
                f,
                "The constraint {constraint} = 0 from the coefficient of {key} is not linear"
            ),
        }
    }
}

impl std::error::Error for ConstraintError {}

/// A value for each ring generator that occurs in a system of constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<F: Field> {
    values: BTreeMap<usize, F::Element>,
}

impl<F: Field> Assignment<F> {
    pub fn values(&self) -> &BTreeMap<usize, F::Element> {
        &self.values
    }

    pub fn get(&self, var: usize) -> Option<&F::Element> {
        self.values.get(&var)
    }

    /// The value of a generator by name, e.g. `"A1"`.
    pub fn get_by_name(&self, ring: &PolynomialRing<F>, name: &str) -> Option<&F::Element> {
        self.get(ring.variable_index(name)?)
    }

    pub fn apply(&self, ring: &PolynomialRing<F>, poly: &Polynomial<F>) -> Polynomial<F> {
        ring.substitute(poly, &self.values)
    }

    /// The nonzero values as `A1 = -1, A2 = 1`.
    pub fn to_string_with(&self, ring: &PolynomialRing<F>) -> String {
        let field = ring.field();
        self.values
            .iter()
            .filter(|(_, value)| !field.is_zero(value))
            .map(|(&var, value)| format!("{} = {value}", ring.names()[var]))
            .join(", ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintSolution<F: Field> {
    /// Every constraint vanishes under this assignment. Generators that the constraints leave
    /// free are set to zero.
    Solution(Assignment<F>),
    Inconsistent,
}

/// A system of equations `poly = 0`, one for each basis element in the support of a defect.
pub struct LeibnizConstraints<F: Field> {
    equations: Vec<(BasisElement, Polynomial<F>)>,
}

impl<F: Field> Default for LeibnizConstraints<F> {
    fn default() -> Self {
        Self {
            equations: Vec::new(),
        }
    }
}

impl<F: Field> LeibnizConstraints<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defect(defect: &Element<F>) -> Self {
        let mut result = Self::new();
        result.add_defect(defect);
        result
    }

    /// Add the coefficients of another defect to the system.
    pub fn add_defect(&mut self, defect: &Element<F>) {
        self.equations
            .extend(defect.iter().map(|(key, c)| (key.clone(), c.clone())));
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BasisElement, &Polynomial<F>)> + '_ {
        self.equations.iter().map(|(key, poly)| (key, poly))
    }

    /// Solve the system by Gauss-Jordan elimination over the base field of `ring`.
    pub fn solve(&self, ring: &PolynomialRing<F>) -> Result<ConstraintSolution<F>, ConstraintError> {
        let field = ring.field();

        let mut forms = Vec::with_capacity(self.equations.len());
        for (key, poly) in &self.equations {
            let form = ring
                .linear_form(poly)
                .ok_or_else(|| ConstraintError::NonLinear {
                    key: key.to_string(),
                    constraint: ring.element_to_string(poly),
                })?;
            forms.push(form);
        }

        let variables: Vec<usize> = forms
            .iter()
            .flat_map(|form| form.coefficients.keys().copied())
            .sorted()
            .dedup()
            .collect();
        let columns = variables.len();
        let column_of: BTreeMap<usize, usize> = variables
            .iter()
            .enumerate()
            .map(|(col, &var)| (var, col))
            .collect();

        // The last column holds the right hand side -constant.
        let mut matrix: Vec<Vec<F::Element>> = forms
            .iter()
            .map(|form| {
                let mut row = vec![field.zero(); columns + 1];
                for (var, c) in &form.coefficients {
                    row[column_of[var]] = c.clone();
                }
                row[columns] = field.neg(&form.constant);
                row
            })
            .collect();

        let column_to_pivot_row = row_reduce(field, &mut matrix, columns);

        if matrix[column_to_pivot_row.iter().flatten().count()..]
            .iter()
            .any(|row| !field.is_zero(&row[columns]))
        {
            tracing::debug!(constraints = self.len(), "inconsistent constraints");
            return Ok(ConstraintSolution::Inconsistent);
        }

        let values = variables
            .iter()
            .zip(&column_to_pivot_row)
            .map(|(&var, pivot)| {
                let value = match pivot {
                    Some(row) => matrix[*row][columns].clone(),
                    None => field.zero(),
                };
                (var, value)
            })
            .collect();
        Ok(ConstraintSolution::Solution(Assignment { values }))
    }
}

/// Reduce `matrix` to reduced row echelon form in its first `columns` columns and return, for
/// each of these columns, the row of its pivot if there is one. The pivot rows are the first rows
/// of the matrix, in order.
fn row_reduce<F: Field>(
    field: F,
    matrix: &mut [Vec<F::Element>],
    columns: usize,
) -> Vec<Option<usize>> {
    let rows = matrix.len();
    let mut column_to_pivot_row = vec![None; columns];
    let mut pivot = 0;
    for pivot_column in 0..columns {
        // Search down column for a nonzero entry.
        let Some(pivot_row) = (pivot..rows).find(|&i| !field.is_zero(&matrix[i][pivot_column]))
        else {
            continue;
        };
        column_to_pivot_row[pivot_column] = Some(pivot);
        matrix.swap(pivot, pivot_row);

        let Some(c_inv) = field.inv(&matrix[pivot][pivot_column]) else {
            unreachable!("Pivot entries are nonzero");
        };
        for entry in &mut matrix[pivot] {
            *entry = field.mul(entry, &c_inv);
        }

        let pivot_row = matrix[pivot].clone();
        for (i, row) in matrix.iter_mut().enumerate() {
            if i == pivot || field.is_zero(&row[pivot_column]) {
                continue;
            }
            let coeff = row[pivot_column].clone();
            for (entry, p) in row.iter_mut().zip(&pivot_row) {
                *entry = field.sub(entry, &field.mul(&coeff, p));
            }
        }
        pivot += 1;
    }
    column_to_pivot_row
}
