//! The graded Leibniz rule `d(f g) = d(f) g + (-1)^|f| f d(g)`.
//!
//! The functions here are generic over the differential and the product, so they apply equally to
//! the memoized [`Differential`](crate::differential::Differential) and
//! [`MultigradedProduct`](crate::product::MultigradedProduct) and to plain module morphisms.

use algebra::module::homomorphism::ModuleHomomorphism;
use algebra::PolynomialRing;
use fp::field::Field;

use crate::basis::{BasisElement, SBasisPart};
use crate::{Element, TensorSquare};

/// The degree `|f|` used for the Leibniz sign. This is `x_deg + y_deg` of the leading term, or 0
/// if `f` is zero or its leading term lies in homological degree 0. The leading term is the first
/// term in the ordering of basis elements.
pub fn element_degree<F: Field>(f: &Element<F>) -> u32 {
    match f.leading_term() {
        None => 0,
        Some((b, _)) => match &b.s_part {
            SBasisPart::Empty => 0,
            SBasisPart::Positive { degrees: (x, y), .. } => x + y,
        },
    }
}

/// The right hand side `p(d(f) (x) g) -/+ p(f (x) d(g))` of the Leibniz rule, with a minus sign
/// when `|f|` is even.
pub fn compute_leibniz_expression<F, D, P>(
    f: &Element<F>,
    g: &Element<F>,
    d: &D,
    p: &P,
    tensor: &TensorSquare<F>,
) -> Element<F>
where
    F: Field,
    D: ModuleHomomorphism<Source = BasisElement, Target = BasisElement, Ring = PolynomialRing<F>>,
    P: ModuleHomomorphism<
        Source = (BasisElement, BasisElement),
        Target = BasisElement,
        Ring = PolynomialRing<F>,
    >,
{
    let module = p.target();
    let df_g = p.image_of(&tensor.tensor(&d.image_of(f), g));
    let f_dg = p.image_of(&tensor.tensor(f, &d.image_of(g)));
    if element_degree(f) % 2 == 0 {
        module.sub(&df_g, &f_dg)
    } else {
        module.add(&df_g, &f_dg)
    }
}

/// `d(p(f (x) g))` minus the right hand side of the Leibniz rule. The rule holds for `f` and `g`
/// exactly when this is zero.
pub fn leibniz_defect<F, D, P>(
    f: &Element<F>,
    g: &Element<F>,
    d: &D,
    p: &P,
    tensor: &TensorSquare<F>,
) -> Element<F>
where
    F: Field,
    D: ModuleHomomorphism<Source = BasisElement, Target = BasisElement, Ring = PolynomialRing<F>>,
    P: ModuleHomomorphism<
        Source = (BasisElement, BasisElement),
        Target = BasisElement,
        Ring = PolynomialRing<F>,
    >,
{
    let lhs = d.image_of(&p.image_of(&tensor.tensor(f, g)));
    let rhs = compute_leibniz_expression(f, g, d, p, tensor);
    d.target().sub(&lhs, &rhs)
}

pub fn verify_leibniz_rule<F, D, P>(
    f: &Element<F>,
    g: &Element<F>,
    d: &D,
    p: &P,
    tensor: &TensorSquare<F>,
) -> bool
where
    F: Field,
    D: ModuleHomomorphism<Source = BasisElement, Target = BasisElement, Ring = PolynomialRing<F>>,
    P: ModuleHomomorphism<
        Source = (BasisElement, BasisElement),
        Target = BasisElement,
        Ring = PolynomialRing<F>,
    >,
{
    leibniz_defect(f, g, d, p, tensor).is_zero()
}
