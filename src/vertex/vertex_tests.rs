// use env_logger;
use approx::assert_relative_eq;
use itertools::iproduct;
use ndarray::{Array4, ArrayD, ArrayViewD, ArrayViewMutD, IxDyn};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::basis::FundamentalOperatorBasis;
use crate::symmetrisation::permutation_symmetrise;
use crate::vertex::{
    constant_vertex, rpa_tensor_from_operator, symmetrise_and_reorder, OperatorOrder,
    QuarticExtraction, QuarticTensor, VertexTemplate,
};

type C128 = Complex<f64>;

fn random_tensor(n: usize, seed: u64) -> Array4<C128> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array4::from_shape_fn((n, n, n, n), |_| {
        C128::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5)
    })
}

/// A mock extraction strategy that ignores the operator and serves a stored coefficient tensor.
struct StoredCoefficients {
    tensor: Array4<C128>,
}

impl QuarticExtraction<(), C128> for StoredCoefficients {
    fn quartic_tensor(
        &self,
        _operator: &(),
        _basis: &FundamentalOperatorBasis,
    ) -> Result<Array4<C128>, anyhow::Error> {
        Ok(self.tensor.clone())
    }
}

/// A mock frequency-resolved template with one bosonic, two fermionic and four orbital axes.
#[derive(Clone)]
struct MockSusceptibility {
    beta: f64,
    data: ArrayD<C128>,
}

impl VertexTemplate<C128> for MockSusceptibility {
    fn inverse_temperature(&self) -> f64 {
        self.beta
    }

    fn data(&self) -> ArrayViewD<'_, C128> {
        self.data.view()
    }

    fn data_mut(&mut self) -> ArrayViewMutD<'_, C128> {
        self.data.view_mut()
    }
}

#[test]
fn test_vertex_quartic_tensor_validation() {
    let u = QuarticTensor::cre_cre_ann_ann(random_tensor(3, 5)).unwrap();
    assert_eq!(u.order(), OperatorOrder::CreCreAnnAnn);
    assert_eq!(u.basis_size(), 3);
    assert_eq!(u.data().dim(), (3, 3, 3, 3));

    let rectangular = Array4::<C128>::zeros((2, 3, 2, 2));
    assert!(QuarticTensor::cre_cre_ann_ann(rectangular).is_err());
}

#[test]
fn test_vertex_operator_order_display() {
    assert_eq!(OperatorOrder::CreCreAnnAnn.to_string(), "c⁺c⁺cc");
    assert_eq!(OperatorOrder::AnnCreAnnCre.to_string(), "cc⁺cc⁺");
}

#[test]
fn test_vertex_symmetrise_and_reorder_relabelling() {
    let n = 3;
    let u = random_tensor(n, 17);
    let expected = permutation_symmetrise(u.view()).mapv(|x| x * C128::new(4.0, 0.0));

    let gamma = symmetrise_and_reorder(&QuarticTensor::cre_cre_ann_ann(u).unwrap()).unwrap();
    assert_eq!(gamma.order(), OperatorOrder::AnnCreAnnCre);

    // The reordering is a pure relabelling of the antisymmetrised tensor.
    for (a, b, c, d) in iproduct!(0..n, 0..n, 0..n, 0..n) {
        assert_relative_eq!(
            (gamma.data()[(c, a, d, b)] - expected[(a, b, c, d)]).norm(),
            0.0,
            epsilon = 1e-12
        );
    }

    // Exchanging the two creation labels of the vertex negates it.
    for (a, b, c, d) in iproduct!(0..n, 0..n, 0..n, 0..n) {
        assert_relative_eq!(
            (gamma.data()[(c, a, d, b)] + gamma.data()[(c, b, d, a)]).norm(),
            0.0,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_vertex_symmetrise_and_reorder_rejects_vertex_order() {
    let gamma = QuarticTensor::ann_cre_ann_cre(random_tensor(2, 29)).unwrap();
    assert!(symmetrise_and_reorder(&gamma).is_err());
}

#[test]
fn test_vertex_rpa_tensor_from_operator() {
    // env_logger::init();
    let basis = FundamentalOperatorBasis::from_block_structure(&[
        ("up".to_string(), vec![0]),
        ("dn".to_string(), vec![0]),
    ])
    .unwrap();

    let extraction = StoredCoefficients {
        tensor: random_tensor(2, 43),
    };
    let gamma = rpa_tensor_from_operator(&extraction, &(), &basis).unwrap();
    assert_eq!(gamma.order(), OperatorOrder::AnnCreAnnCre);
    assert_eq!(gamma.basis_size(), basis.len());

    // A coefficient tensor whose size disagrees with the basis is rejected.
    let oversized = StoredCoefficients {
        tensor: random_tensor(3, 47),
    };
    assert!(rpa_tensor_from_operator(&oversized, &(), &basis).is_err());
}

#[test]
fn test_vertex_constant_vertex() {
    let n = 2;
    let beta = 5.0;
    let template = MockSusceptibility {
        beta,
        data: ArrayD::zeros(IxDyn(&[3, 2, 2, n, n, n, n])),
    };
    let u = QuarticTensor::ann_cre_ann_cre(random_tensor(n, 61)).unwrap();

    let vertex = constant_vertex(&template, &u).unwrap();
    assert_relative_eq!(vertex.inverse_temperature(), beta);
    let data = vertex.data();
    for (w, n1, n2) in iproduct!(0..3, 0..2, 0..2) {
        for (a, abar, b, bbar) in iproduct!(0..n, 0..n, 0..n, 0..n) {
            let value = data[IxDyn(&[w, n1, n2, a, abar, b, bbar])];
            let expected = u.data()[(a, abar, b, bbar)] / C128::new(beta * beta, 0.0);
            assert_relative_eq!((value - expected).norm(), 0.0, epsilon = 1e-14);
        }
    }
}

#[test]
fn test_vertex_constant_vertex_rejects_incompatible_inputs() {
    let n = 2;
    let template = MockSusceptibility {
        beta: 1.0,
        data: ArrayD::zeros(IxDyn(&[3, 2, 2, n, n, n, n])),
    };

    // Wrong operator ordering.
    let u_normal = QuarticTensor::cre_cre_ann_ann(random_tensor(n, 71)).unwrap();
    assert!(constant_vertex(&template, &u_normal).is_err());

    // Mismatched orbital dimensions.
    let u_large = QuarticTensor::ann_cre_ann_cre(random_tensor(3, 73)).unwrap();
    assert!(constant_vertex(&template, &u_large).is_err());

    // Template without the full frequency resolution.
    let flat_template = MockSusceptibility {
        beta: 1.0,
        data: ArrayD::zeros(IxDyn(&[3, n, n, n, n])),
    };
    let u = QuarticTensor::ann_cre_ann_cre(random_tensor(n, 79)).unwrap();
    assert!(constant_vertex(&flat_template, &u).is_err());
}
