use std::{collections::BTreeMap, fmt, hash::Hash, marker::PhantomData, sync::Arc};

use crate::module::homomorphism::FreeModuleHomomorphism;
use crate::ring::Ring;

/// Anything that can index a basis element of a [`FreeModule`]. The ordering fixes the canonical
/// order in which terms of an element are stored and printed.
pub trait BasisKey: Clone + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T: Clone + Ord + Hash + fmt::Debug + Send + Sync + 'static> BasisKey for T {}

/// A finite formal linear combination of basis keys. Only nonzero coefficients are stored, so an
/// element is zero exactly when it has no terms.
pub struct FreeModuleElement<B, R: Ring> {
    terms: BTreeMap<B, R::Element>,
}

impl<B, R: Ring> Default for FreeModuleElement<B, R> {
    fn default() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }
}

impl<B: Clone, R: Ring> Clone for FreeModuleElement<B, R> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
        }
    }
}

impl<B: fmt::Debug, R: Ring> fmt::Debug for FreeModuleElement<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.terms.iter()).finish()
    }
}

impl<B: PartialEq, R: Ring> PartialEq for FreeModuleElement<B, R> {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl<B: BasisKey, R: Ring> FreeModuleElement<B, R> {
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of basis elements with nonzero coefficient.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_zero()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&B, &R::Element)> + '_ {
        self.terms.iter()
    }

    pub fn support(&self) -> impl Iterator<Item = &B> + '_ {
        self.terms.keys()
    }

    pub fn coefficient(&self, key: &B) -> Option<&R::Element> {
        self.terms.get(key)
    }

    /// The first term in the canonical order of basis keys.
    pub fn leading_term(&self) -> Option<(&B, &R::Element)> {
        self.terms.iter().next()
    }
}

/// The free module over `R` on the set of all values of `B`.
///
/// The module does not record a list of generators. Any value of `B` is a valid basis key.
pub struct FreeModule<B, R: Ring> {
    ring: Arc<R>,
    name: String,
    _basis: PhantomData<fn() -> B>,
}

impl<B, R: Ring> fmt::Display for FreeModule<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<B: BasisKey, R: Ring> FreeModule<B, R> {
    pub fn new(ring: Arc<R>, name: impl Into<String>) -> Self {
        Self {
            ring,
            name: name.into(),
            _basis: PhantomData,
        }
    }

    pub fn ring(&self) -> &Arc<R> {
        &self.ring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zero(&self) -> FreeModuleElement<B, R> {
        FreeModuleElement::default()
    }

    pub fn monomial(&self, key: B) -> FreeModuleElement<B, R> {
        self.term(key, self.ring.one())
    }

    pub fn term(&self, key: B, coeff: R::Element) -> FreeModuleElement<B, R> {
        let mut result = self.zero();
        self.add_basis_element(&mut result, key, &coeff);
        result
    }

    /// Add `coeff * key` to `x`, dropping the term if it cancels.
    pub fn add_basis_element(&self, x: &mut FreeModuleElement<B, R>, key: B, coeff: &R::Element) {
        if self.ring.is_zero(coeff) {
            return;
        }
        match x.terms.entry(key) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(coeff.clone());
            }
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                self.ring.add_assign(entry.get_mut(), coeff);
                if self.ring.is_zero(entry.get()) {
                    entry.remove();
                }
            }
        }
    }

    pub fn add_assign(&self, x: &mut FreeModuleElement<B, R>, y: &FreeModuleElement<B, R>) {
        for (key, c) in y.iter() {
            self.add_basis_element(x, key.clone(), c);
        }
    }

    /// `x += coeff * y`.
    pub fn add_scaled(
        &self,
        x: &mut FreeModuleElement<B, R>,
        coeff: &R::Element,
        y: &FreeModuleElement<B, R>,
    ) {
        if self.ring.is_one(coeff) {
            return self.add_assign(x, y);
        }
        for (key, c) in y.iter() {
            self.add_basis_element(x, key.clone(), &self.ring.mul(coeff, c));
        }
    }

    pub fn add(
        &self,
        x: &FreeModuleElement<B, R>,
        y: &FreeModuleElement<B, R>,
    ) -> FreeModuleElement<B, R> {
        let mut result = x.clone();
        self.add_assign(&mut result, y);
        result
    }

    pub fn neg(&self, x: &FreeModuleElement<B, R>) -> FreeModuleElement<B, R> {
        FreeModuleElement {
            terms: x
                .iter()
                .map(|(key, c)| (key.clone(), self.ring.neg(c)))
                .collect(),
        }
    }

    pub fn sub(
        &self,
        x: &FreeModuleElement<B, R>,
        y: &FreeModuleElement<B, R>,
    ) -> FreeModuleElement<B, R> {
        let mut result = x.clone();
        self.add_scaled(&mut result, &self.ring.from_integer(-1), y);
        result
    }

    pub fn scale(&self, coeff: &R::Element, x: &FreeModuleElement<B, R>) -> FreeModuleElement<B, R> {
        let mut result = self.zero();
        self.add_scaled(&mut result, coeff, x);
        result
    }

    pub fn sum(
        &self,
        elements: impl IntoIterator<Item = FreeModuleElement<B, R>>,
    ) -> FreeModuleElement<B, R> {
        let mut result = self.zero();
        for x in elements {
            self.add_assign(&mut result, &x);
        }
        result
    }

    /// Extend a function defined on basis keys to a module homomorphism into `codomain`.
    pub fn module_morphism<C, Func>(
        &self,
        on_basis: Func,
        codomain: Arc<FreeModule<C, R>>,
    ) -> FreeModuleHomomorphism<B, C, R, Func>
    where
        C: BasisKey,
        Func: Fn(&B) -> FreeModuleElement<C, R> + Send + Sync,
    {
        FreeModuleHomomorphism::new(on_basis, codomain)
    }

    pub fn element_to_string(&self, x: &FreeModuleElement<B, R>) -> String
    where
        B: fmt::Display,
    {
        if x.is_zero() {
            return "0".to_string();
        }
        let mut result = String::new();
        for (i, (key, c)) in x.iter().enumerate() {
            let coeff = self.ring.element_to_string(c);
            let term = if self.ring.is_one(c) {
                format!("{key}")
            } else if self.ring.is_minus_one(c) {
                format!("-{key}")
            } else if coeff.contains(' ') {
                format!("({coeff})*{key}")
            } else {
                format!("{coeff}*{key}")
            };
            match (i, term.strip_prefix('-')) {
                (0, _) => result.push_str(&term),
                (_, Some(rest)) => {
                    result.push_str(" - ");
                    result.push_str(rest);
                }
                (_, None) => {
                    result.push_str(" + ");
                    result.push_str(&term);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ring::PolynomialRing;
    use expect_test::expect;
    use fp::field::Rationals;

    fn module() -> FreeModule<u32, PolynomialRing<Rationals>> {
        let ring = Arc::new(PolynomialRing::with_families(Rationals, &[("A", 2)]));
        FreeModule::new(ring, "F")
    }

    #[test]
    fn cancellation_leaves_no_terms() {
        let m = module();
        let x = m.add(&m.monomial(1), &m.monomial(2));
        let y = m.sub(&x, &m.monomial(1));
        assert_eq!(y, m.monomial(2));
        assert!(m.sub(&y, &m.monomial(2)).is_zero());
        assert_eq!(m.sum([m.monomial(3), m.neg(&m.monomial(3))]), m.zero());
    }

    #[test]
    fn symbolic_coefficients() {
        let m = module();
        let ring = Arc::clone(m.ring());
        let a0 = ring.gen(0);
        let a1 = ring.gen(1);

        let mut x = m.term(5, a0.clone());
        m.add_basis_element(&mut x, 5, &a1);
        m.add_basis_element(&mut x, 2, &ring.from_integer(-1));
        m.add_basis_element(&mut x, 7, &ring.from_integer(3));
        expect![[r#"-2 + (A0 + A1)*5 + 3*7"#]].assert_eq(&m.element_to_string(&x));

        let scaled = m.scale(&a0, &x);
        expect![[r#"-A0*2 + (A0*A1 + A0^2)*5 + 3*A0*7"#]].assert_eq(&m.element_to_string(&scaled));

        assert_eq!(x.leading_term().map(|(k, _)| *k), Some(2));
        assert_eq!(x.len(), 3);
        assert!(m.scale(&ring.zero(), &x).is_zero());
    }
}
