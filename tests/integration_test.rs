use ndarray::{Array4, IxDyn};
use num_complex::Complex;

use qvertex::basis::FundamentalOperatorBasis;
use qvertex::channel::{split_charge_and_spin, DEFAULT_SPIN_CONSERVATION_TOLERANCE};
use qvertex::interfaces::input::Input;
use qvertex::kanamori::{self, KanamoriParameters};
use qvertex::mesh::{GeneralisedSusceptibility, Statistic, TripleFrequencyMesh};
use qvertex::vertex::{
    constant_vertex, rpa_tensor_from_operator, OperatorOrder, QuarticExtraction,
};

type C128 = Complex<f64>;

fn close(x: C128, y: C128) -> bool {
    (x - y).norm() < 1e-12
}

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

#[test]
fn test_kanamori_tensor_from_input() {
    let input = Input::from_yaml(
        "kanamori:\n  norb: 2\n  u: 4.0\n  up: 2.0\n  j: 0.8\n  jp: 0.8\n",
    )
    .expect("Unable to parse the input.");
    let params = input
        .kanamori_parameters()
        .expect("Unable to construct the Kanamori parameters.");
    let norb = input
        .kanamori
        .as_ref()
        .expect("No Kanamori specification found.")
        .norb;

    let u4 = kanamori::quartic_tensor(norb, &params);
    assert_eq!(u4.order(), OperatorOrder::AnnCreAnnCre);
    assert_eq!(u4.basis_size(), 2 * norb);

    // Composite index s * norb + orb: ↑-orbital-0 is 0 and ↓-orbital-0 is 2.
    let data = u4.data();
    assert!(close(data[(0, 0, 0, 0)], C128::from(0.0)));
    assert!(close(data[(0, 0, 2, 2)], C128::from(-4.0)));
    assert!(close(data[(0, 2, 2, 0)], C128::from(4.0)));
    // Inter-orbital ↑↑↓↓ block at orbitals (0, 1, 1, 0): -(U_c + U_s) / 2 with
    // U_c = 2J - U' = -0.4 and U_s = U' = 2.0.
    assert!(close(data[(0, 1, 3, 2)], C128::from(-0.8)));
}

#[test]
fn test_rpa_tensor_pipeline() {
    let input = Input::from_yaml("block_structure:\n- [up, [0]]\n- [dn, [0]]\n")
        .expect("Unable to parse the input.");
    let basis = input
        .fundamental_operator_basis()
        .expect("Unable to construct the fundamental operator basis.");
    assert_eq!(basis.len(), 2);

    let mut tensor = Array4::<C128>::zeros((2, 2, 2, 2));
    tensor[(0, 1, 0, 1)] = C128::from(1.0);
    let extraction = StoredCoefficients { tensor };

    let gamma = rpa_tensor_from_operator(&extraction, &(), &basis)
        .expect("Unable to construct the particle-hole interaction tensor.");
    assert_eq!(gamma.order(), OperatorOrder::AnnCreAnnCre);

    // The single coefficient spreads over the four signed leg exchanges and is then relabelled
    // as Γ_{cadb} = U_{abcd}.
    let data = gamma.data();
    assert!(close(data[(0, 0, 1, 1)], C128::from(1.0)));
    assert!(close(data[(0, 1, 1, 0)], C128::from(-1.0)));
    assert!(close(data[(1, 0, 0, 1)], C128::from(-1.0)));
    assert!(close(data[(1, 1, 0, 0)], C128::from(1.0)));
    let total_magnitude = data.iter().map(|x| x.norm()).sum::<f64>();
    assert!((total_magnitude - 4.0).abs() < 1e-12);
}

#[test]
fn test_kanamori_channel_round_trip() {
    let params = KanamoriParameters::new(
        C128::from(4.0),
        C128::from(2.4),
        C128::from(0.8),
        C128::from(0.8),
    );
    let norb = 3;

    let (u_c, u_s) = kanamori::charge_and_spin_tensors(norb, &params);
    let merged = kanamori::quartic_tensor(norb, &params);
    let (u_c_split, u_s_split) =
        split_charge_and_spin(merged.data().view(), DEFAULT_SPIN_CONSERVATION_TOLERANCE)
            .expect("Unable to split the merged Kanamori tensor.");

    assert!(u_c
        .iter()
        .zip(u_c_split.iter())
        .all(|(x, y)| close(*x, *y)));
    assert!(u_s
        .iter()
        .zip(u_s_split.iter())
        .all(|(x, y)| close(*x, *y)));
}

#[test]
fn test_constant_vertex_pipeline() {
    let input = Input::from_yaml(
        "kanamori:\n  norb: 1\n  u: 4.0\nblock_structure:\n- [up, [0]]\n- [dn, [0]]\n",
    )
    .expect("Unable to parse the input.");
    let basis = input
        .fundamental_operator_basis()
        .expect("Unable to construct the fundamental operator basis.");
    let params = input
        .kanamori_parameters()
        .expect("Unable to construct the Kanamori parameters.");
    let norb = input
        .kanamori
        .as_ref()
        .expect("No Kanamori specification found.")
        .norb;

    let u4 = kanamori::quartic_tensor(norb, &params);
    assert_eq!(u4.basis_size(), basis.len());

    let beta = 10.0;
    let mesh = TripleFrequencyMesh::new(beta, 2, 4).expect("Unable to construct the mesh.");
    assert_eq!(mesh.components()[0].statistic(), Statistic::Boson);
    let chi0 = GeneralisedSusceptibility::<C128>::zeros(mesh, basis.len())
        .expect("Unable to construct the susceptibility.");

    let vertex = constant_vertex(&chi0, &u4).expect("Unable to construct the vertex function.");
    let data = vertex.into_data();
    assert_eq!(data.shape(), &[2, 4, 4, 2, 2, 2, 2]);

    let expected = C128::from(-4.0 / (beta * beta));
    for w in 0..2 {
        for n1 in 0..4 {
            for n2 in 0..4 {
                assert!(close(data[IxDyn(&[w, n1, n2, 0, 0, 1, 1])], expected));
                assert!(close(data[IxDyn(&[w, n1, n2, 0, 1, 1, 0])], -expected));
                assert!(close(
                    data[IxDyn(&[w, n1, n2, 0, 0, 0, 0])],
                    C128::from(0.0)
                ));
            }
        }
    }
}
