//! The boundary map of the resolution.
//!
//! A generator with vertices `v_0 < ... < v_h` and degrees `(x_deg, y_deg)` maps to the
//! alternating sum over `idx` of the generators obtained by dropping `v_idx`, lowering one of the
//! two degrees and multiplying by the matching variable `x_{v_idx}` or `y_{v_idx}`. In homological
//! degree 1 the image is the binomial `x_i y_j - x_j y_i`.

use std::sync::Arc;

use algebra::module::homomorphism::{FreeModuleHomomorphism, ModuleHomomorphism};
use algebra::{PolynomialRing, Ring};
use dashmap::DashMap as HashMap;
use fp::field::Field;

use crate::basis::{BasisElement, SBasisPart};
use crate::{Element, ResolutionModule};

/// The image of a single basis element under the differential.
pub fn compute_differential<F: Field>(
    module: &ResolutionModule<F>,
    element: &BasisElement,
) -> Element<F> {
    let n = element.n_vertices();
    let (x_deg, y_deg, vertices) = match &element.s_part {
        SBasisPart::Empty => return module.zero(),
        SBasisPart::Positive {
            degrees: (x_deg, y_deg),
            vertices,
        } => (*x_deg, *y_deg, vertices),
    };

    if let [i, j] = vertices[..] {
        let forward = BasisElement::new(
            element.incremented_coefficients(&[i, j + n]),
            SBasisPart::Empty,
        );
        let backward = BasisElement::new(
            element.incremented_coefficients(&[j, i + n]),
            SBasisPart::Empty,
        );
        return module.sub(&module.monomial(forward), &module.monomial(backward));
    }

    let ring = module.ring();
    let mut result = module.zero();
    for (idx, &v) in vertices.iter().enumerate() {
        let sign_x = if idx % 2 == 0 { 1 } else { -1 };
        let sign_y = -sign_x;
        let remaining: Vec<usize> = vertices
            .iter()
            .enumerate()
            .filter_map(|(k, &w)| (k != idx).then_some(w))
            .collect();

        if x_deg > 1 {
            let term = BasisElement::new(
                element.incremented_coefficients(&[v]),
                SBasisPart::new((x_deg - 1, y_deg), remaining.clone()),
            );
            module.add_basis_element(&mut result, term, &ring.from_integer(sign_x));
        }
        if y_deg > 1 {
            let term = BasisElement::new(
                element.incremented_coefficients(&[v + n]),
                SBasisPart::new((x_deg, y_deg - 1), remaining),
            );
            module.add_basis_element(&mut result, term, &ring.from_integer(sign_y));
        }
    }
    result
}

/// The differential as a module homomorphism, without memoization.
pub fn create_differential_morphism<F: Field>(
    module: Arc<ResolutionModule<F>>,
) -> FreeModuleHomomorphism<
    BasisElement,
    BasisElement,
    PolynomialRing<F>,
    impl Fn(&BasisElement) -> Element<F> + Send + Sync,
> {
    let m = Arc::clone(&module);
    module.module_morphism(move |b| compute_differential(&m, b), Arc::clone(&module))
}

/// The differential of the resolution, remembering the image of every basis element it has seen.
pub struct Differential<F: Field> {
    module: Arc<ResolutionModule<F>>,
    images: HashMap<BasisElement, Element<F>>,
}

impl<F: Field> Differential<F> {
    pub fn new(module: Arc<ResolutionModule<F>>) -> Self {
        Self {
            module,
            images: HashMap::new(),
        }
    }

    pub fn image_of_basis(&self, element: &BasisElement) -> Element<F> {
        if let Some(image) = self.images.get(element) {
            return image.value().clone();
        }
        let image = compute_differential(&self.module, element);
        self.images.insert(element.clone(), image.clone());
        image
    }

    /// The number of basis elements whose images are memoized.
    pub fn num_cached(&self) -> usize {
        self.images.len()
    }
}

impl<F: Field> ModuleHomomorphism for Differential<F> {
    type Source = BasisElement;
    type Target = BasisElement;
    type Ring = PolynomialRing<F>;

    fn target(&self) -> Arc<ResolutionModule<F>> {
        Arc::clone(&self.module)
    }

    fn apply_to_basis_element(
        &self,
        result: &mut Element<F>,
        coeff: &<PolynomialRing<F> as Ring>::Element,
        input: &BasisElement,
    ) {
        let image = self.image_of_basis(input);
        self.module.add_scaled(result, coeff, &image);
    }
}
