//! A context object for computations on a fixed resolution.

use std::sync::Arc;

use algebra::module::homomorphism::ModuleHomomorphism;
use algebra::module::TensorModule;
use algebra::PolynomialRing;
use anyhow::Context;
use fp::field::Field;
use itertools::Itertools;

#[cfg(feature = "concurrent")]
use rayon::prelude::*;

use crate::basis::{compute_s_basis_elements, number_of_basis_elements, BasisCache, BasisElement};
use crate::config::{ConfigError, ResolutionConfig};
use crate::constraints::{Assignment, ConstraintError, ConstraintSolution, LeibnizConstraints};
use crate::differential::Differential;
use crate::leibniz;
use crate::product::{MultigradedProduct, ProductCoefficients};
use crate::{Element, ResolutionModule, TensorSquare};

/// The resolution of the binomial edge ideal of `K_n` together with its differential and a
/// candidate product.
///
/// The coefficient ring is `F[A0, ..., A{m-1}, B0, ..., B{m-1}]`, where `m` is
/// [`ResolutionConfig::family_size`]. A freshly constructed resolution uses the product whose
/// coefficients are these generators. [`Resolution::specialize`] replaces some of them by
/// constants.
pub struct Resolution<F: Field> {
    config: ResolutionConfig,
    ring: Arc<PolynomialRing<F>>,
    module: Arc<ResolutionModule<F>>,
    tensor: TensorSquare<F>,
    differential: Arc<Differential<F>>,
    product: MultigradedProduct<F>,
    bases: Arc<BasisCache>,
}

impl<F: Field> Resolution<F> {
    /// # Errors
    /// Fails if the configuration is invalid or names a field of a different characteristic
    /// than `field`.
    #[tracing::instrument(skip(field), fields(field = %field))]
    pub fn new(config: ResolutionConfig, field: F) -> anyhow::Result<Self> {
        config.validate()?;
        if config.field.characteristic() != field.characteristic() {
            return Err(ConfigError::FieldMismatch {
                expected: config.field,
                found: field.characteristic(),
            }
            .into());
        }

        let family_size = config.family_size();
        let ring = Arc::new(PolynomialRing::with_families(
            field,
            &[("A", family_size), ("B", family_size)],
        ));
        let module = Arc::new(ResolutionModule::new(Arc::clone(&ring), "F"));
        let tensor = TensorModule::new(Arc::clone(&module), Arc::clone(&module));
        let differential = Arc::new(Differential::new(Arc::clone(&module)));
        let coefficients = ProductCoefficients::symbolic(&ring, family_size)?;
        let product =
            MultigradedProduct::new(Arc::clone(&module), coefficients, config.n_vertices)?;

        Ok(Self {
            config,
            ring,
            module,
            tensor,
            differential,
            product,
            bases: Arc::new(BasisCache::new()),
        })
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn n_vertices(&self) -> usize {
        self.config.n_vertices
    }

    pub fn ring(&self) -> &Arc<PolynomialRing<F>> {
        &self.ring
    }

    pub fn module(&self) -> &Arc<ResolutionModule<F>> {
        &self.module
    }

    pub fn tensor(&self) -> &TensorSquare<F> {
        &self.tensor
    }

    pub fn differential(&self) -> &Differential<F> {
        &self.differential
    }

    pub fn product(&self) -> &MultigradedProduct<F> {
        &self.product
    }

    pub fn monomial(&self, b: BasisElement) -> Element<F> {
        self.module.monomial(b)
    }

    /// The basis in homological degree `h` and the configured ring degree.
    pub fn basis(&self, h: u32) -> Arc<[BasisElement]> {
        self.bases
            .get(h, self.config.ring_degree, self.config.n_vertices)
    }

    pub fn basis_size(&self, h: u32) -> u64 {
        number_of_basis_elements(h, self.config.ring_degree, self.config.n_vertices)
    }

    /// The generators of the resolution in homological degree `h`, as module elements.
    pub fn generators(&self, h: u32) -> Vec<Element<F>> {
        compute_s_basis_elements(h, self.config.n_vertices)
            .into_iter()
            .map(|b| self.monomial(b))
            .collect()
    }

    pub fn apply_differential(&self, x: &Element<F>) -> Element<F> {
        self.differential.image_of(x)
    }

    pub fn multiply(&self, x: &Element<F>, y: &Element<F>) -> Element<F> {
        self.product.image_of(&self.tensor.tensor(x, y))
    }

    pub fn compute_leibniz_expression(&self, f: &Element<F>, g: &Element<F>) -> Element<F> {
        leibniz::compute_leibniz_expression(
            f,
            g,
            &*self.differential,
            &self.product,
            &self.tensor,
        )
    }

    pub fn leibniz_defect(&self, f: &Element<F>, g: &Element<F>) -> Element<F> {
        leibniz::leibniz_defect(f, g, &*self.differential, &self.product, &self.tensor)
    }

    pub fn verify_leibniz_rule(&self, f: &Element<F>, g: &Element<F>) -> bool {
        leibniz::verify_leibniz_rule(f, g, &*self.differential, &self.product, &self.tensor)
    }

    /// The basis elements `b` in homological degree `h` with `d(d(b)) != 0`.
    #[tracing::instrument(skip(self))]
    pub fn check_chain_condition(&self, h: u32) -> Vec<BasisElement> {
        let basis = self.basis(h);

        #[cfg(feature = "concurrent")]
        let iter = basis.par_iter();
        #[cfg(not(feature = "concurrent"))]
        let iter = basis.iter();

        let failures: Vec<BasisElement> = iter
            .filter(|&b| {
                let db = self.differential.image_of_basis(b);
                !self.apply_differential(&db).is_zero()
            })
            .cloned()
            .collect();
        tracing::info!(
            checked = basis.len(),
            failures = failures.len(),
            "checked chain condition"
        );
        failures
    }

    /// The pairs of generators in homological degrees `h1` and `h2` for which the Leibniz rule
    /// fails.
    #[tracing::instrument(skip(self))]
    pub fn leibniz_failures(&self, h1: u32, h2: u32) -> Vec<(BasisElement, BasisElement)> {
        let pairs = self.generator_pairs(h1, h2);

        #[cfg(feature = "concurrent")]
        let iter = pairs.into_par_iter();
        #[cfg(not(feature = "concurrent"))]
        let iter = pairs.into_iter();

        let failures: Vec<_> = iter
            .filter(|(f, g)| {
                !self.verify_leibniz_rule(&self.monomial(f.clone()), &self.monomial(g.clone()))
            })
            .collect();
        tracing::info!(failures = failures.len(), "checked Leibniz rule");
        failures
    }

    /// The conditions on the unknowns for the Leibniz rule to hold on all pairs of generators in
    /// homological degrees `h1` and `h2`.
    pub fn leibniz_constraints(&self, h1: u32, h2: u32) -> LeibnizConstraints<F> {
        let mut constraints = LeibnizConstraints::new();
        for (f, g) in self.generator_pairs(h1, h2) {
            let defect = self.leibniz_defect(&self.monomial(f), &self.monomial(g));
            constraints.add_defect(&defect);
        }
        constraints
    }

    pub fn solve_leibniz_constraints(
        &self,
        constraints: &LeibnizConstraints<F>,
    ) -> Result<ConstraintSolution<F>, ConstraintError> {
        let solution = constraints.solve(&self.ring)?;
        if let ConstraintSolution::Solution(assignment) = &solution {
            tracing::info!(
                equations = constraints.len(),
                solution = %assignment.to_string_with(&self.ring),
                "solved Leibniz constraints"
            );
        }
        Ok(solution)
    }

    /// The same resolution with the product coefficients specialized by `assignment`. The
    /// differential and the basis cache are shared with `self`.
    pub fn specialize(&self, assignment: &Assignment<F>) -> anyhow::Result<Self> {
        let coefficients = self
            .product
            .coefficients()
            .specialize(&self.ring, assignment.values());
        let product =
            MultigradedProduct::new(Arc::clone(&self.module), coefficients, self.n_vertices())
                .context("Failed to specialize product")?;
        Ok(Self {
            config: self.config.clone(),
            ring: Arc::clone(&self.ring),
            module: Arc::clone(&self.module),
            tensor: TensorModule::new(Arc::clone(&self.module), Arc::clone(&self.module)),
            differential: Arc::clone(&self.differential),
            product,
            bases: Arc::clone(&self.bases),
        })
    }

    fn generator_pairs(&self, h1: u32, h2: u32) -> Vec<(BasisElement, BasisElement)> {
        let n = self.config.n_vertices;
        compute_s_basis_elements(h1, n)
            .into_iter()
            .cartesian_product(compute_s_basis_elements(h2, n))
            .collect()
    }
}
