//! A candidate multiplication on the resolution.
//!
//! The product of two generators is only allowed to land on generators of the right multidegree.
//! Up to scalars, the possible targets are obtained from the union of the two vertex sets by
//! lowering one of the two degrees and, when the vertex sets are disjoint, dropping a vertex. The
//! scalars are the unknowns `A_k` (for the terms lowering `x_deg`) and `B_k` (for the terms
//! lowering `y_deg`), where `k` is one more than the position of the vertex used.

use std::{collections::BTreeMap, fmt, sync::Arc};

use algebra::module::homomorphism::{FreeModuleHomomorphism, ModuleHomomorphism};
use algebra::{Polynomial, PolynomialRing, Ring};
use dashmap::DashMap as HashMap;
use fp::field::Field;
use itertools::Itertools;

use crate::basis::{BasisElement, SBasisPart};
use crate::{Element, ResolutionModule, TensorSquare};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    NotEnoughUnknowns { required: usize, a: usize, b: usize },
    MissingUnknown(String),
}

impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughUnknowns { required, a, b } => write!(
                f,
                "The product needs {required} unknowns in each family, but there are {a} A's and {b} B's"
            ),
            Self::MissingUnknown(name) => write!(f, "The coefficient ring has no variable {name}"),
        }
    }
}

impl std::error::Error for ProductError {}

/// The two families of scalars `A` and `B` used by the product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductCoefficients<F: Field> {
    pub a: Vec<Polynomial<F>>,
    pub b: Vec<Polynomial<F>>,
}

impl<F: Field> ProductCoefficients<F> {
    pub fn new(a: Vec<Polynomial<F>>, b: Vec<Polynomial<F>>) -> Self {
        Self { a, b }
    }

    /// The generators `A0, A1, ...` and `B0, B1, ...` of `ring`, `family_size` of each.
    pub fn symbolic(ring: &PolynomialRing<F>, family_size: usize) -> Result<Self, ProductError> {
        let family = |prefix: &str| {
            (0..family_size)
                .map(|i| {
                    let name = format!("{prefix}{i}");
                    ring.variable_index(&name)
                        .map(|var| ring.gen(var))
                        .ok_or(ProductError::MissingUnknown(name))
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            a: family("A")?,
            b: family("B")?,
        })
    }

    /// Replace the ring generators in `values` by constants in every coefficient.
    pub fn specialize(
        &self,
        ring: &PolynomialRing<F>,
        values: &BTreeMap<usize, F::Element>,
    ) -> Self {
        Self {
            a: self.a.iter().map(|c| ring.substitute(c, values)).collect(),
            b: self.b.iter().map(|c| ring.substitute(c, values)).collect(),
        }
    }

    /// Indices up to `n_vertices + 1` are used.
    pub fn check(&self, n_vertices: usize) -> Result<(), ProductError> {
        let required = n_vertices + 2;
        if self.a.len() < required || self.b.len() < required {
            return Err(ProductError::NotEnoughUnknowns {
                required,
                a: self.a.len(),
                b: self.b.len(),
            });
        }
        Ok(())
    }
}

/// Multiplication by an element of homological degree 0, which only multiplies the coefficient
/// monomials.
///
/// # Panics
/// Panics if the coefficient vectors have different lengths.
pub fn scalar_multiply_basis(elem1: &BasisElement, elem2: &BasisElement) -> BasisElement {
    assert_eq!(
        elem1.coefficients.len(),
        elem2.coefficients.len(),
        "Multiplying {elem1} and {elem2} with coefficient vectors of different lengths"
    );
    let coefficients = elem1
        .coefficients
        .iter()
        .zip(&elem2.coefficients)
        .map(|(a, b)| a + b)
        .collect();
    let s_part = match &elem1.s_part {
        SBasisPart::Empty => elem2.s_part.clone(),
        _ => elem1.s_part.clone(),
    };
    BasisElement::new(coefficients, s_part)
}

/// The product of two basis elements.
///
/// # Panics
/// Panics if the coefficient families have fewer than `n_vertices + 2` entries.
pub fn compute_multigraded_product<F: Field>(
    module: &ResolutionModule<F>,
    coefficients: &ProductCoefficients<F>,
    elem1: &BasisElement,
    elem2: &BasisElement,
) -> Element<F> {
    let n = elem1.n_vertices();
    let ((x1, y1), v1, (x2, y2), v2) = match (&elem1.s_part, &elem2.s_part) {
        (SBasisPart::Empty, _) | (_, SBasisPart::Empty) => {
            return module.monomial(scalar_multiply_basis(elem1, elem2));
        }
        (
            SBasisPart::Positive {
                degrees: d1,
                vertices: v1,
            },
            SBasisPart::Positive {
                degrees: d2,
                vertices: v2,
            },
        ) => (*d1, v1, *d2, v2),
    };

    if v1.len() + v2.len() > n + 1 {
        return module.zero();
    }
    if v1.len() == 2 && v2.len() == 2 && v1[0] > v2[0] {
        return module.neg(&compute_multigraded_product(
            module,
            coefficients,
            elem2,
            elem1,
        ));
    }

    let new_vertices: Vec<usize> = v1.iter().chain(v2).copied().sorted().dedup().collect();
    let intersection: Vec<usize> = v1.iter().filter(|v| v2.contains(v)).copied().collect();
    let (x_deg, y_deg) = (x1 + x2, y1 + y2);
    let base = scalar_multiply_basis(
        &BasisElement::new(elem1.coefficients.clone(), SBasisPart::Empty),
        &BasisElement::new(elem2.coefficients.clone(), SBasisPart::Empty),
    );

    let mut result = module.zero();
    let mut emit = |k: usize, v: usize, vertices: Vec<usize>| {
        let x_term = BasisElement::new(
            base.incremented_coefficients(&[v]),
            SBasisPart::new((x_deg - 1, y_deg), vertices.clone()),
        );
        let y_term = BasisElement::new(
            base.incremented_coefficients(&[n + v]),
            SBasisPart::new((x_deg, y_deg - 1), vertices),
        );
        module.add_basis_element(&mut result, x_term, &coefficients.a[k + 1]);
        module.add_basis_element(&mut result, y_term, &coefficients.b[k + 1]);
    };

    match intersection[..] {
        [] => {
            for (k, &v) in new_vertices.iter().enumerate() {
                let modified = new_vertices.iter().copied().filter(|&w| w != v).collect();
                emit(k, v, modified);
            }
        }
        [v] => {
            let k = new_vertices
                .iter()
                .position(|&w| w == v)
                .unwrap_or_else(|| unreachable!("{v} is in the union of the vertex sets"));
            emit(k, v, new_vertices.clone());
        }
        // Two shared vertices cannot both be accounted for by the multidegree.
        _ => {}
    }
    result
}

/// The product as a homomorphism out of the tensor square, without memoization.
pub fn create_product_morphism<F: Field>(
    tensor: &TensorSquare<F>,
    module: Arc<ResolutionModule<F>>,
    coefficients: ProductCoefficients<F>,
    n_vertices: usize,
) -> Result<
    FreeModuleHomomorphism<
        (BasisElement, BasisElement),
        BasisElement,
        PolynomialRing<F>,
        impl Fn(&(BasisElement, BasisElement)) -> Element<F> + Send + Sync,
    >,
    ProductError,
> {
    coefficients.check(n_vertices)?;
    let m = Arc::clone(&module);
    Ok(tensor.module().module_morphism(
        move |(b1, b2): &(BasisElement, BasisElement)| {
            compute_multigraded_product(&m, &coefficients, b1, b2)
        },
        module,
    ))
}

/// The product `F (x) F -> F`, remembering the image of every pair it has seen.
pub struct MultigradedProduct<F: Field> {
    module: Arc<ResolutionModule<F>>,
    coefficients: ProductCoefficients<F>,
    images: HashMap<(BasisElement, BasisElement), Element<F>>,
}

impl<F: Field> MultigradedProduct<F> {
    pub fn new(
        module: Arc<ResolutionModule<F>>,
        coefficients: ProductCoefficients<F>,
        n_vertices: usize,
    ) -> Result<Self, ProductError> {
        coefficients.check(n_vertices)?;
        Ok(Self {
            module,
            coefficients,
            images: HashMap::new(),
        })
    }

    pub fn coefficients(&self) -> &ProductCoefficients<F> {
        &self.coefficients
    }

    pub fn image_of_pair(&self, elem1: &BasisElement, elem2: &BasisElement) -> Element<F> {
        let key = (elem1.clone(), elem2.clone());
        if let Some(image) = self.images.get(&key) {
            return image.value().clone();
        }
        let image = compute_multigraded_product(&self.module, &self.coefficients, elem1, elem2);
        self.images.insert(key, image.clone());
        image
    }

    /// The number of pairs whose products are memoized.
    pub fn num_cached(&self) -> usize {
        self.images.len()
    }
}

impl<F: Field> ModuleHomomorphism for MultigradedProduct<F> {
    type Source = (BasisElement, BasisElement);
    type Target = BasisElement;
    type Ring = PolynomialRing<F>;

    fn target(&self) -> Arc<ResolutionModule<F>> {
        Arc::clone(&self.module)
    }

    fn apply_to_basis_element(
        &self,
        result: &mut Element<F>,
        coeff: &<PolynomialRing<F> as Ring>::Element,
        (elem1, elem2): &(BasisElement, BasisElement),
    ) {
        let image = self.image_of_pair(elem1, elem2);
        self.module.add_scaled(result, coeff, &image);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basis::compute_basis_elements;
    use algebra::module::TensorModule;
    use expect_test::expect;
    use fp::field::Rationals;

    struct Setup {
        module: Arc<ResolutionModule<Rationals>>,
        product: MultigradedProduct<Rationals>,
    }

    fn setup(n_vertices: usize) -> Setup {
        let ring = Arc::new(PolynomialRing::with_families(
            Rationals,
            &[("A", n_vertices + 2), ("B", n_vertices + 2)],
        ));
        let module = Arc::new(ResolutionModule::new(Arc::clone(&ring), "F"));
        let coefficients = ProductCoefficients::symbolic(&ring, n_vertices + 2).unwrap();
        let product = MultigradedProduct::new(Arc::clone(&module), coefficients, n_vertices).unwrap();
        Setup { module, product }
    }

    fn generator(n: usize, degrees: (u32, u32), vertices: &[usize]) -> BasisElement {
        BasisElement::new(vec![0; 2 * n], SBasisPart::new(degrees, vertices.to_vec()))
    }

    #[test]
    fn singleton_intersection() {
        let Setup { module, product } = setup(5);
        let f1 = generator(5, (1, 1), &[0, 1]);
        let f2 = generator(5, (1, 2), &[1, 2, 3]);
        let image = product.image_of_pair(&f1, &f2);
        expect![[r#"B2*((0, 0, 0, 0, 0, 0, 1, 0, 0, 0), ((2, 2), (0, 1, 2, 3))) + A2*((0, 1, 0, 0, 0, 0, 0, 0, 0, 0), ((1, 3), (0, 1, 2, 3)))"#]]
            .assert_eq(&module.element_to_string(&image));
    }

    #[test]
    fn disjoint_vertices() {
        let Setup { module, product } = setup(4);
        let f = generator(4, (1, 1), &[0, 1]);
        let g = generator(4, (1, 1), &[2, 3]);
        let image = product.image_of_pair(&f, &g);
        assert_eq!(image.len(), 8);
        let ring = module.ring();
        let a1 = ring.gen(ring.variable_index("A1").unwrap());
        let b4 = ring.gen(ring.variable_index("B4").unwrap());
        let x_term = BasisElement::new(
            vec![1, 0, 0, 0, 0, 0, 0, 0],
            SBasisPart::new((1, 2), vec![1, 2, 3]),
        );
        let y_term = BasisElement::new(
            vec![0, 0, 0, 0, 0, 0, 0, 1],
            SBasisPart::new((2, 1), vec![0, 1, 2]),
        );
        assert_eq!(image.coefficient(&x_term), Some(&a1));
        assert_eq!(image.coefficient(&y_term), Some(&b4));
    }

    #[test]
    fn degree_zero_absorbs() {
        let Setup { module, product } = setup(3);
        let scalar = BasisElement::new(vec![1, 0, 0, 0, 2, 0], SBasisPart::Empty);
        let f = BasisElement::new(vec![0, 1, 0, 0, 0, 0], SBasisPart::new((1, 1), vec![0, 2]));
        let expected = module.monomial(BasisElement::new(
            vec![1, 1, 0, 0, 2, 0],
            SBasisPart::new((1, 1), vec![0, 2]),
        ));
        assert_eq!(product.image_of_pair(&scalar, &f), expected);
        assert_eq!(product.image_of_pair(&f, &scalar), expected);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn mismatched_lengths() {
        let scalar = BasisElement::new(vec![1, 0], SBasisPart::Empty);
        let f = BasisElement::new(vec![0; 6], SBasisPart::new((1, 1), vec![0, 2]));
        scalar_multiply_basis(&scalar, &f);
    }

    #[test]
    fn vanishing_products() {
        let Setup { product, .. } = setup(4);
        // Too many vertices in total.
        let f = generator(4, (1, 2), &[0, 1, 2]);
        let g = generator(4, (2, 1), &[1, 2, 3]);
        assert!(product.image_of_pair(&f, &g).is_zero());

        let Setup { product, .. } = setup(5);
        // Two shared vertices.
        let f = generator(5, (1, 1), &[0, 1]);
        let g = generator(5, (1, 2), &[0, 1, 2]);
        assert!(product.image_of_pair(&f, &g).is_zero());
    }

    #[test]
    fn degree_bound_on_whole_bidegrees() {
        let Setup { product, .. } = setup(4);
        for f in compute_basis_elements(2, 4, 4) {
            for g in compute_basis_elements(2, 3, 4) {
                assert!(product.image_of_pair(&f, &g).is_zero(), "{f} * {g}");
            }
        }
    }

    #[test]
    fn anticommutative_in_degree_one() {
        let Setup { module, product } = setup(4);
        let generators = compute_basis_elements(1, 2, 4);
        for f in &generators {
            for g in &generators {
                if f.s_part.vertices()[0] == g.s_part.vertices()[0] {
                    continue;
                }
                let fg = product.image_of_pair(f, g);
                let gf = product.image_of_pair(g, f);
                assert_eq!(fg, module.neg(&gf), "{f} * {g}");
                assert_eq!(module.neg(&module.neg(&fg)), fg);
            }
        }
    }

    #[test]
    fn morphism_agrees_with_memoized() {
        let Setup { module, product } = setup(4);
        let tensor = TensorModule::new(Arc::clone(&module), Arc::clone(&module));
        let plain = create_product_morphism(
            &tensor,
            Arc::clone(&module),
            product.coefficients().clone(),
            4,
        )
        .unwrap();
        let basis = compute_basis_elements(1, 3, 4);
        let x = module.sum(basis.iter().take(5).cloned().map(|b| module.monomial(b)));
        let y = module.sum(basis.iter().skip(7).take(5).cloned().map(|b| module.monomial(b)));
        let xy = tensor.tensor(&x, &y);
        assert_eq!(plain.image_of(&xy), product.image_of(&xy));
        assert!(product.num_cached() > 0);
    }

    #[test]
    fn not_enough_unknowns() {
        let ring = Arc::new(PolynomialRing::with_families(Rationals, &[("A", 5), ("B", 5)]));
        let module = Arc::new(ResolutionModule::new(Arc::clone(&ring), "F"));
        let coefficients = ProductCoefficients::symbolic(&ring, 5).unwrap();
        let error = MultigradedProduct::new(module, coefficients, 5).err();
        assert_eq!(
            error,
            Some(ProductError::NotEnoughUnknowns {
                required: 7,
                a: 5,
                b: 5
            })
        );
        assert_eq!(
            ProductCoefficients::symbolic(&ring, 6),
            Err(ProductError::MissingUnknown("A5".to_string()))
        );
    }

    #[test]
    fn specialized_coefficients_are_constants() {
        let Setup { module, product } = setup(3);
        let ring = module.ring();
        let a2 = ring.variable_index("A2").unwrap();
        let values = BTreeMap::from([(a2, Rationals.element(3))]);
        let specialized = product.coefficients().specialize(ring, &values);
        assert_eq!(specialized.a[2], ring.from_integer(3));
        assert_eq!(specialized.a[1], product.coefficients().a[1]);
    }
}
