use std::{collections::BTreeMap, fmt};

use fp::field::Field;
use itertools::Itertools;
use rustc_hash::FxHashMap as HashMap;

use super::Ring;

/// A monomial in the generators of a [`PolynomialRing`], stored sparsely as a list of
/// `(variable index, exponent)` pairs sorted by variable index. Zero exponents are never stored,
/// so equal monomials have equal representations.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(Vec<(usize, u32)>);

impl Monomial {
    pub fn one() -> Self {
        Self(Vec::new())
    }

    pub fn variable(var: usize) -> Self {
        Self(vec![(var, 1)])
    }

    pub fn from_exponents(exponents: impl IntoIterator<Item = (usize, u32)>) -> Self {
        let mut result: BTreeMap<usize, u32> = BTreeMap::new();
        for (var, e) in exponents {
            *result.entry(var).or_default() += e;
        }
        Self(result.into_iter().filter(|&(_, e)| e > 0).collect())
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.iter().map(|&(_, e)| e).sum()
    }

    pub fn exponent(&self, var: usize) -> u32 {
        self.0
            .binary_search_by_key(&var, |&(v, _)| v)
            .map_or(0, |i| self.0[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().copied()
    }

    pub fn mul(&self, other: &Self) -> Self {
        let mut result = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (a, b) = (self.0[i], other.0[j]);
            match a.0.cmp(&b.0) {
                std::cmp::Ordering::Less => {
                    result.push(a);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    result.push(b);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    result.push((a.0, a.1 + b.1));
                    i += 1;
                    j += 1;
                }
            }
        }
        result.extend_from_slice(&self.0[i..]);
        result.extend_from_slice(&other.0[j..]);
        Self(result)
    }
}

/// A polynomial with coefficients in `F`. The terms are kept in a `BTreeMap` so that iteration
/// order, and hence printing, is deterministic. Zero coefficients are never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<F: Field> {
    terms: BTreeMap<Monomial, F::Element>,
}

impl<F: Field> Default for Polynomial<F> {
    fn default() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }
}

impl<F: Field> Polynomial<F> {
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &F::Element)> + '_ {
        self.terms.iter()
    }

    pub fn coefficient(&self, monomial: &Monomial) -> Option<&F::Element> {
        self.terms.get(monomial)
    }

    /// The largest total degree of a term, or `None` for the zero polynomial.
    pub fn total_degree(&self) -> Option<u32> {
        self.terms.keys().map(Monomial::degree).max()
    }

    /// Add `c * monomial` to `self`, dropping the term if it cancels.
    fn add_term(&mut self, field: F, monomial: Monomial, c: &F::Element) {
        if field.is_zero(c) {
            return;
        }
        match self.terms.entry(monomial) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(c.clone());
            }
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                let sum = field.add(entry.get(), c);
                if field.is_zero(&sum) {
                    entry.remove();
                } else {
                    *entry.get_mut() = sum;
                }
            }
        }
    }
}

/// An affine-linear polynomial `constant + sum coefficients[v] * x_v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearForm<F: Field> {
    pub coefficients: BTreeMap<usize, F::Element>,
    pub constant: F::Element,
}

/// A commutative polynomial ring over `F` with a finite ordered list of named indeterminates.
pub struct PolynomialRing<F: Field> {
    field: F,
    names: Vec<String>,
    name_to_index: HashMap<String, usize>,
}

impl<F: Field> fmt::Display for PolynomialRing<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.field, self.names.iter().format(", "))
    }
}

impl<F: Field> PolynomialRing<F> {
    pub fn new(field: F, names: Vec<String>) -> Self {
        let mut name_to_index = HashMap::default();
        for (i, name) in names.iter().enumerate() {
            let previous = name_to_index.insert(name.clone(), i);
            assert!(previous.is_none(), "Duplicate variable name {name}");
        }
        Self {
            field,
            names,
            name_to_index,
        }
    }

    /// A ring whose generators are grouped into families `prefix0, prefix1, ...`, one family
    /// after another.
    pub fn with_families(field: F, families: &[(&str, usize)]) -> Self {
        let names = families
            .iter()
            .flat_map(|&(prefix, count)| (0..count).map(move |i| format!("{prefix}{i}")))
            .collect();
        Self::new(field, names)
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn num_gens(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn gen(&self, var: usize) -> Polynomial<F> {
        assert!(
            var < self.num_gens(),
            "Variable index {var} out of range for {self}"
        );
        self.monomial(Monomial::variable(var), self.field.one())
    }

    pub fn gens(&self) -> Vec<Polynomial<F>> {
        (0..self.num_gens()).map(|var| self.gen(var)).collect()
    }

    pub fn constant(&self, c: F::Element) -> Polynomial<F> {
        self.monomial(Monomial::one(), c)
    }

    pub fn monomial(&self, monomial: Monomial, c: F::Element) -> Polynomial<F> {
        let mut result = Polynomial::default();
        result.add_term(self.field, monomial, &c);
        result
    }

    pub fn monomial_to_string(&self, monomial: &Monomial) -> String {
        if monomial.is_one() {
            return "1".to_string();
        }
        monomial
            .iter()
            .map(|(var, e)| {
                if e == 1 {
                    self.names[var].clone()
                } else {
                    format!("{}^{e}", self.names[var])
                }
            })
            .join("*")
    }

    /// Replace the variables in `values` by the given constants.
    pub fn substitute(
        &self,
        poly: &Polynomial<F>,
        values: &BTreeMap<usize, F::Element>,
    ) -> Polynomial<F> {
        let field = self.field;
        let mut result = Polynomial::default();
        for (monomial, c) in poly.terms() {
            let mut coeff = c.clone();
            let mut remaining = Vec::new();
            for (var, e) in monomial.iter() {
                match values.get(&var) {
                    Some(value) => {
                        for _ in 0..e {
                            coeff = field.mul(&coeff, value);
                        }
                    }
                    None => remaining.push((var, e)),
                }
            }
            result.add_term(field, Monomial(remaining), &coeff);
        }
        result
    }

    /// The value of `poly` at `values`, or `None` if a variable of `poly` is not assigned.
    pub fn evaluate(
        &self,
        poly: &Polynomial<F>,
        values: &BTreeMap<usize, F::Element>,
    ) -> Option<F::Element> {
        let reduced = self.substitute(poly, values);
        if reduced.terms.keys().any(|m| !m.is_one()) {
            return None;
        }
        Some(
            reduced
                .coefficient(&Monomial::one())
                .cloned()
                .unwrap_or_else(|| self.field.zero()),
        )
    }

    /// Decompose an affine-linear polynomial. Returns `None` if some term has degree at least 2.
    pub fn linear_form(&self, poly: &Polynomial<F>) -> Option<LinearForm<F>> {
        let mut form = LinearForm {
            coefficients: BTreeMap::new(),
            constant: self.field.zero(),
        };
        for (monomial, c) in poly.terms() {
            match monomial.0.as_slice() {
                [] => form.constant = c.clone(),
                [(var, 1)] => {
                    form.coefficients.insert(*var, c.clone());
                }
                _ => return None,
            }
        }
        Some(form)
    }
}

impl<F: Field> Ring for PolynomialRing<F> {
    type Element = Polynomial<F>;

    fn zero(&self) -> Polynomial<F> {
        Polynomial::default()
    }

    fn one(&self) -> Polynomial<F> {
        self.constant(self.field.one())
    }

    fn from_integer(&self, n: i64) -> Polynomial<F> {
        self.constant(self.field.element(n))
    }

    fn is_zero(&self, x: &Polynomial<F>) -> bool {
        x.is_zero()
    }

    fn add_assign(&self, x: &mut Polynomial<F>, y: &Polynomial<F>) {
        for (monomial, c) in y.terms() {
            x.add_term(self.field, monomial.clone(), c);
        }
    }

    fn neg(&self, x: &Polynomial<F>) -> Polynomial<F> {
        Polynomial {
            terms: x
                .terms()
                .map(|(m, c)| (m.clone(), self.field.neg(c)))
                .collect(),
        }
    }

    fn mul(&self, x: &Polynomial<F>, y: &Polynomial<F>) -> Polynomial<F> {
        let mut result = Polynomial::default();
        for (m1, c1) in x.terms() {
            for (m2, c2) in y.terms() {
                result.add_term(self.field, m1.mul(m2), &self.field.mul(c1, c2));
            }
        }
        result
    }

    fn element_to_string(&self, x: &Polynomial<F>) -> String {
        if x.is_zero() {
            return "0".to_string();
        }
        let field = self.field;
        let mut result = String::new();
        for (i, (monomial, c)) in x.terms().enumerate() {
            let term = if monomial.is_one() {
                format!("{c}")
            } else if field.is_one(c) {
                self.monomial_to_string(monomial)
            } else if field.is_minus_one(c) {
                format!("-{}", self.monomial_to_string(monomial))
            } else {
                format!("{c}*{}", self.monomial_to_string(monomial))
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
    use expect_test::expect;
    use fp::{
        field::{Fp, Rationals},
        prime::ValidPrime,
    };

    fn ring() -> PolynomialRing<Rationals> {
        PolynomialRing::with_families(Rationals, &[("A", 3), ("B", 3)])
    }

    #[test]
    fn families_are_named_in_order() {
        let r = ring();
        assert_eq!(r.num_gens(), 6);
        assert_eq!(r.variable_index("A2"), Some(2));
        assert_eq!(r.variable_index("B0"), Some(3));
        assert_eq!(r.variable_index("C0"), None);
        expect![[r#"QQ[A0, A1, A2, B0, B1, B2]"#]].assert_eq(&r.to_string());
    }

    #[test]
    fn arithmetic_cancels_exactly() {
        let r = ring();
        let a1 = r.gen(1);
        let b2 = r.gen(5);
        let sum = r.add(&a1, &b2);
        let square = r.mul(&sum, &sum);
        expect![[r#"2*A1*B2 + A1^2 + B2^2"#]].assert_eq(&r.element_to_string(&square));

        let difference = r.sub(&r.mul(&sum, &r.sub(&a1, &b2)), &r.mul(&a1, &a1));
        expect![[r#"-B2^2"#]].assert_eq(&r.element_to_string(&difference));

        assert!(r.is_zero(&r.sub(&square, &square)));
        assert_eq!(r.element_to_string(&r.zero()), "0");
    }

    #[test]
    fn signs_in_output() {
        let r = ring();
        let x = r.sub(&r.from_integer(1), &r.gen(2));
        expect![[r#"1 - A2"#]].assert_eq(&r.element_to_string(&x));
        let y = r.add(&r.neg(&r.gen(0)), &r.mul(&r.from_integer(-3), &r.gen(3)));
        expect![[r#"-A0 - 3*B0"#]].assert_eq(&r.element_to_string(&y));
    }

    #[test]
    fn substitute_and_linear_form() {
        let r = ring();
        let poly = r.add(
            &r.sub(&r.gen(0), &r.mul(&r.from_integer(2), &r.gen(4))),
            &r.from_integer(5),
        );
        let form = r.linear_form(&poly).unwrap();
        assert_eq!(form.constant, Rationals.element(5));
        assert_eq!(form.coefficients[&0], Rationals.element(1));
        assert_eq!(form.coefficients[&4], Rationals.element(-2));

        let values = BTreeMap::from([(0, Rationals.element(1)), (4, Rationals.element(3))]);
        assert!(r.is_zero(&r.substitute(&poly, &values)));
        assert_eq!(r.evaluate(&poly, &values), Some(Rationals.zero()));
        assert_eq!(r.evaluate(&poly, &BTreeMap::from([(0, Rationals.element(1))])), None);
        assert_eq!(r.evaluate(&r.zero(), &BTreeMap::new()), Some(Rationals.zero()));

        let nonlinear = r.mul(&r.gen(0), &r.gen(1));
        assert_eq!(r.linear_form(&nonlinear), None);
    }

    #[test]
    fn prime_field_coefficients_wrap() {
        let r = PolynomialRing::with_families(Fp::new(ValidPrime::new(3)), &[("A", 2)]);
        let x = r.mul(&r.from_integer(2), &r.gen(0));
        assert!(r.is_zero(&r.add(&x, &r.gen(0))));
        expect![[r#"GF(3)[A0, A1]"#]].assert_eq(&r.to_string());
    }

    #[test]
    fn monomial_multiplication_merges() {
        let m1 = Monomial::from_exponents([(3, 1), (0, 2)]);
        let m2 = Monomial::from_exponents([(1, 1), (3, 2), (5, 0)]);
        let product = m1.mul(&m2);
        assert_eq!(product, Monomial::from_exponents([(0, 2), (1, 1), (3, 3)]));
        assert_eq!(product.degree(), 6);
        assert_eq!(product.exponent(3), 3);
        assert_eq!(product.exponent(2), 0);
    }
}
