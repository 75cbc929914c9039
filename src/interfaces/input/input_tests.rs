use approx::assert_relative_eq;
use num_complex::Complex;

use super::Input;

type C128 = Complex<f64>;

#[test]
fn test_interfaces_input_kanamori() {
    let yaml = "\
kanamori:
  norb: 2
  u: 4.0
  up: 3.0
  j: 0.5
  jp: 0.25
";
    let inp = Input::from_yaml(yaml).unwrap();
    let kanamori = inp.kanamori.as_ref().unwrap();
    assert_eq!(kanamori.norb, 2);
    assert_relative_eq!(kanamori.u, 4.0);
    assert_relative_eq!(kanamori.up, 3.0);
    assert_relative_eq!(kanamori.j, 0.5);
    assert_relative_eq!(kanamori.jp, 0.25);

    let params = inp.kanamori_parameters().unwrap();
    assert_relative_eq!((params.u() - C128::new(4.0, 0.0)).norm(), 0.0);
    assert_relative_eq!((params.up() - C128::new(3.0, 0.0)).norm(), 0.0);
    assert_relative_eq!((params.jp() - C128::new(0.25, 0.0)).norm(), 0.0);

    assert!(inp.block_structure.is_none());
    assert!(inp.fundamental_operator_basis().is_err());
}

#[test]
fn test_interfaces_input_kanamori_defaults() {
    let yaml = "\
kanamori:
  norb: 1
  u: 4.0
";
    let inp = Input::from_yaml(yaml).unwrap();
    let kanamori = inp.kanamori.as_ref().unwrap();
    assert_eq!(kanamori.norb, 1);
    assert_relative_eq!(kanamori.u, 4.0);
    assert_relative_eq!(kanamori.up, 0.0);
    assert_relative_eq!(kanamori.j, 0.0);
    assert_relative_eq!(kanamori.jp, 0.0);
}

#[test]
fn test_interfaces_input_block_structure() {
    let yaml = "\
block_structure:
  - [up, [0, 1]]
  - [dn, [0, 1]]
";
    let inp = Input::from_yaml(yaml).unwrap();
    let basis = inp.fundamental_operator_basis().unwrap();
    assert_eq!(basis.len(), 4);
    assert_eq!(basis.operators()[0].to_string(), "c⁺(up, 0)");
    assert_eq!(basis.operators()[3].to_string(), "c⁺(dn, 1)");

    assert!(inp.kanamori.is_none());
    assert!(inp.kanamori_parameters().is_err());
}

#[test]
fn test_interfaces_input_empty_and_invalid() {
    let inp = Input::from_yaml("{}").unwrap();
    assert!(inp.kanamori.is_none());
    assert!(inp.block_structure.is_none());

    assert!(Input::from_yaml("kanamori: [not, a, mapping]").is_err());

    // Duplicate operators in the block structure are rejected downstream.
    let duplicated = Input::from_yaml(
        "\
block_structure:
  - [up, [0, 0]]
",
    )
    .unwrap();
    assert!(duplicated.fundamental_operator_basis().is_err());
}
