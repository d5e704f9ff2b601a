use bei_dga::basis::{BasisElement, SBasisPart};
use bei_dga::config::{FieldSpec, ResolutionConfig};
use bei_dga::constraints::{ConstraintSolution, LeibnizConstraints};
use bei_dga::fp::field::{Field, Fp, Rationals};
use bei_dga::fp::prime::ValidPrime;
use bei_dga::resolution::Resolution;
use bei_dga::Element;

fn unit(n: usize, positions: &[usize]) -> Vec<u32> {
    let mut v = vec![0; 2 * n];
    for &i in positions {
        v[i] += 1;
    }
    v
}

fn generators<F: Field>(resolution: &Resolution<F>) -> (Element<F>, Element<F>) {
    let f1 = resolution.monomial(BasisElement::new(
        vec![0; 10],
        SBasisPart::new((1, 1), vec![0, 1]),
    ));
    let f2 = resolution.monomial(BasisElement::new(
        vec![0; 10],
        SBasisPart::new((1, 2), vec![1, 2, 3]),
    ));
    (f1, f2)
}

#[test]
fn differential_of_degree_one_generator() {
    let resolution = Resolution::new("5,5@QQ".parse().unwrap(), Rationals).unwrap();
    let module = resolution.module();
    let (f1, _) = generators(&resolution);
    let expected = module.sub(
        &module.monomial(BasisElement::new(unit(5, &[0, 6]), SBasisPart::Empty)),
        &module.monomial(BasisElement::new(unit(5, &[1, 5]), SBasisPart::Empty)),
    );
    assert_eq!(resolution.apply_differential(&f1), expected);
}

#[test]
fn symbolic_product_needs_specialization() {
    let resolution = Resolution::new("5,5@QQ".parse().unwrap(), Rationals).unwrap();
    let ring = resolution.ring();
    let (f1, f2) = generators(&resolution);

    assert!(!resolution.verify_leibniz_rule(&f1, &f2));

    let defect = resolution.leibniz_defect(&f1, &f2);
    let constraints = LeibnizConstraints::from_defect(&defect);
    assert_eq!(constraints.len(), 8);

    let ConstraintSolution::Solution(solution) =
        resolution.solve_leibniz_constraints(&constraints).unwrap()
    else {
        panic!("The Leibniz constraints for f1 and f2 are consistent");
    };
    assert_eq!(solution.to_string_with(ring), "A1 = -1, A2 = 1");
    for name in ["A3", "A4", "B1", "B2", "B3", "B4"] {
        assert_eq!(
            solution.get_by_name(ring, name),
            Some(&Rationals.zero()),
            "{name}"
        );
    }
    assert_eq!(solution.get_by_name(ring, "A0"), None);

    let specialized = resolution.specialize(&solution).unwrap();
    assert!(specialized.verify_leibniz_rule(&f1, &f2));
    assert!(specialized.leibniz_defect(&f1, &f2).is_zero());
}

#[test]
fn specialization_over_a_prime_field() {
    let config = ResolutionConfig::new(5, 5, FieldSpec::Prime(ValidPrime::new(7))).unwrap();
    let field = Fp::new(ValidPrime::new(7));
    let resolution = Resolution::new(config, field).unwrap();
    let (f1, f2) = generators(&resolution);

    let constraints = LeibnizConstraints::from_defect(&resolution.leibniz_defect(&f1, &f2));
    let Ok(ConstraintSolution::Solution(solution)) = resolution.solve_leibniz_constraints(&constraints)
    else {
        panic!("The Leibniz constraints for f1 and f2 are consistent");
    };
    assert_eq!(solution.get_by_name(resolution.ring(), "A1"), Some(&6));
    assert!(resolution
        .specialize(&solution)
        .unwrap()
        .verify_leibniz_rule(&f1, &f2));
}

#[test]
fn expression_sign_follows_first_factor() {
    let resolution = Resolution::new("5,5".parse().unwrap(), Rationals).unwrap();
    let module = resolution.module();
    let (f1, f2) = generators(&resolution);

    // |f1| = 2 is even, so the two terms are subtracted.
    let df_g = resolution.multiply(&resolution.apply_differential(&f1), &f2);
    let f_dg = resolution.multiply(&f1, &resolution.apply_differential(&f2));
    assert_eq!(
        resolution.compute_leibniz_expression(&f1, &f2),
        module.sub(&df_g, &f_dg)
    );

    // |f2| = 3 is odd, so they are added.
    let df_g = resolution.multiply(&resolution.apply_differential(&f2), &f1);
    let f_dg = resolution.multiply(&f2, &resolution.apply_differential(&f1));
    assert_eq!(
        resolution.compute_leibniz_expression(&f2, &f1),
        module.add(&df_g, &f_dg)
    );
}

#[test]
fn degree_one_failures() {
    let resolution = Resolution::new("4,4".parse().unwrap(), Rationals).unwrap();
    let failures = resolution.leibniz_failures(1, 1);
    fn generator(vertices: &[usize]) -> BasisElement {
        BasisElement::new(vec![0; 8], SBasisPart::new((1, 1), vertices.to_vec()))
    }

    // Only the squares of generators pass. Their products vanish and the two terms on the right
    // cancel since |f| = 2.
    assert_eq!(failures.len(), 30);
    for f in resolution.generators(1) {
        let Some((b, _)) = f.leading_term() else {
            unreachable!("generators are nonzero");
        };
        assert!(!failures.contains(&(b.clone(), b.clone())), "{b}");
        assert!(resolution.verify_leibniz_rule(&f, &f));
    }

    let f = generator(&[0, 1]);
    for vertices in [[0, 2], [1, 2], [2, 3]] {
        let g = generator(&vertices);
        assert!(failures.contains(&(f.clone(), g.clone())), "{f} {g}");
    }
    assert_eq!(failures[0], (generator(&[0, 1]), generator(&[0, 2])));
}
