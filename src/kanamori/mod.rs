//! Analytic Kanamori parametrisation of multi-orbital interaction tensors.

use derive_builder::Builder;
use itertools::iproduct;
use ndarray::Array4;
use ndarray_linalg::types::Lapack;
use num_complex::ComplexFloat;

use crate::channel::merge_charge_and_spin;
use crate::vertex::QuarticTensor;


// ==================
// Struct definitions
// ==================

/// A structure containing the coupling constants of a Kanamori interaction Hamiltonian.
#[derive(Builder, Clone, Debug)]
pub struct KanamoriParameters<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// The intra-orbital Hubbard interaction $`U`$.
    u: T,

    /// The inter-orbital Hubbard interaction $`U'`$.
    #[builder(default = "T::zero()")]
    up: T,

    /// The Hund's exchange coupling $`J`$.
    #[builder(default = "T::zero()")]
    j: T,

    /// The pair-hopping amplitude $`J'`$.
    #[builder(default = "T::zero()")]
    jp: T,
}

impl<T> KanamoriParameters<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// Returns a builder to construct a new [`KanamoriParameters`].
    pub fn builder() -> KanamoriParametersBuilder<T> {
        KanamoriParametersBuilder::default()
    }

    /// Creates a parameter set with all four couplings specified.
    pub fn new(u: T, up: T, j: T, jp: T) -> Self {
        Self { u, up, j, jp }
    }

    /// Creates a parameter set with only the intra-orbital interaction, all other couplings
    /// vanishing.
    pub fn hubbard(u: T) -> Self {
        Self {
            u,
            up: T::zero(),
            j: T::zero(),
            jp: T::zero(),
        }
    }

    /// Returns the intra-orbital Hubbard interaction $`U`$.
    pub fn u(&self) -> T {
        self.u
    }

    /// Returns the inter-orbital Hubbard interaction $`U'`$.
    pub fn up(&self) -> T {
        self.up
    }

    /// Returns the Hund's exchange coupling $`J`$.
    pub fn j(&self) -> T {
        self.j
    }

    /// Returns the pair-hopping amplitude $`J'`$.
    pub fn jp(&self) -> T {
        self.jp
    }
}

// =========
// Functions
// =========

/// Builds the charge and spin channel interaction tensors of a Kanamori Hamiltonian with
/// `n_orb` orbitals.
///
/// All $`n_{\mathrm{orb}}^4`$ index quadruples $`(a, \bar{a}, b, \bar{b})`$ are enumerated and
/// the four mutually exclusive coincidence patterns assign the channel scalars:
///
/// * $`a = \bar{a} = b = \bar{b}`$: $`(U_c, U_s) = (U, U)`$,
/// * $`a = \bar{b}`$, $`a \ne b`$, $`\bar{a} = b`$: $`(U_c, U_s) = (-U' + 2J, U')`$,
/// * $`a = \bar{a}`$, $`a \ne b`$, $`b = \bar{b}`$: $`(U_c, U_s) = (2U' - J, J)`$,
/// * $`a = b`$, $`a \ne \bar{a}`$, $`\bar{a} = \bar{b}`$: $`(U_c, U_s) = (J', J')`$.
///
/// All other quadruples vanish in both channels.
///
/// # Arguments
///
/// * `n_orb` - The number of orbitals.
/// * `params` - The Kanamori coupling constants.
///
/// # Returns
///
/// The charge channel and spin channel tensors, each with four orbital axes of length `n_orb`.
pub fn charge_and_spin_tensors<T>(
    n_orb: usize,
    params: &KanamoriParameters<T>,
) -> (Array4<T>, Array4<T>)
where
    T: ComplexFloat + Lapack,
{
    let two = T::from(2.0).expect("Unable to convert 2 to the tensor element type.");
    let mut u_c = Array4::<T>::zeros((n_orb, n_orb, n_orb, n_orb));
    let mut u_s = Array4::<T>::zeros((n_orb, n_orb, n_orb, n_orb));
    for (a, abar, b, bbar) in iproduct!(0..n_orb, 0..n_orb, 0..n_orb, 0..n_orb) {
        let mut scalar_c = T::zero();
        let mut scalar_s = T::zero();

        if a == abar && a == b && b == bbar {
            scalar_c = params.u;
            scalar_s = params.u;
        }

        if a == bbar && a != b && abar == b {
            scalar_c = two * params.j - params.up;
            scalar_s = params.up;
        }

        if a == abar && a != b && b == bbar {
            scalar_c = two * params.up - params.j;
            scalar_s = params.j;
        }

        if a == b && a != abar && abar == bbar {
            scalar_c = params.jp;
            scalar_s = params.jp;
        }

        u_c[(a, abar, b, bbar)] = scalar_c;
        u_s[(a, abar, b, bbar)] = scalar_s;
    }
    (u_c, u_s)
}

/// Builds the spin-full Kanamori interaction tensor in the particle-hole
/// $`c c^{\dagger} c c^{\dagger}`$ ordering by merging the charge and spin channel tensors of a
/// Kanamori Hamiltonian with `n_orb` orbitals.
///
/// The four composite axes of the result have length $`2 n_{\mathrm{orb}}`$ with spin slow and
/// orbital fast.
pub fn quartic_tensor<T>(n_orb: usize, params: &KanamoriParameters<T>) -> QuarticTensor<T>
where
    T: ComplexFloat + Lapack,
{
    let (u_c, u_s) = charge_and_spin_tensors(n_orb, params);
    let merged = merge_charge_and_spin(u_c.view(), u_s.view())
        .expect("Unable to merge the Kanamori channel tensors.");
    QuarticTensor::ann_cre_ann_cre(merged)
        .expect("Unable to construct the spin-full Kanamori tensor.")
}
