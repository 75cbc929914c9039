//! Signed symmetry operations on rank-4 interaction tensors and the quartic symmetrisers built
//! from them.

use std::fmt;

use ndarray::{s, Array4, ArrayView4};
use ndarray_linalg::types::Lapack;
use num_complex::ComplexFloat;


// ================
// Enum definitions
// ================

/// An enumerated type to handle the sign carried by a tensor symmetry operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    /// Variant for operations entering with a factor $`+1`$.
    Even,

    /// Variant for operations entering with a factor $`-1`$.
    Odd,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

// ==================
// Struct definitions
// ==================

/// A structure to represent a signed, optionally conjugating axis permutation acting on a rank-4
/// tensor.
///
/// Acting with the operation on a tensor $`U`$ produces the tensor $`U'`$ with
///
/// ```math
///     U'_{k_{\sigma(0)} k_{\sigma(1)} k_{\sigma(2)} k_{\sigma(3)}}
///         = (\pm 1) \times K^{\kappa} U_{k_0 k_1 k_2 k_3},
/// ```
///
/// where $`\sigma`$ is the axis image of the permutation, $`K`$ denotes complex conjugation
/// applied $`\kappa \in \{0, 1\}`$ times, and the sign is fixed by the parity of the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorSymmetry {
    /// The axis image of the permutation: axis $`i`$ of the transformed tensor is axis `image[i]`
    /// of the original tensor.
    image: [usize; 4],

    /// The parity fixing the sign with which the operation enters an average.
    parity: Parity,

    /// A boolean indicating if the operation conjugates the tensor elements.
    conjugation: bool,
}

impl TensorSymmetry {
    /// Creates a tensor symmetry operation from an axis image, a parity, and a conjugation flag.
    ///
    /// # Panics
    ///
    /// Panics if `image` is not a permutation of the four tensor axes.
    pub fn new(image: [usize; 4], parity: Parity, conjugation: bool) -> Self {
        let mut sorted_image = image;
        sorted_image.sort_unstable();
        assert_eq!(
            sorted_image,
            [0, 1, 2, 3],
            "The axis image `{image:?}` is not a permutation of the four tensor axes."
        );
        Self {
            image,
            parity,
            conjugation,
        }
    }

    /// Returns the identity operation.
    pub fn identity() -> Self {
        Self::new([0, 1, 2, 3], Parity::Even, false)
    }

    /// Returns the axis image of the operation.
    pub fn image(&self) -> &[usize; 4] {
        &self.image
    }

    /// Returns the parity of the operation.
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Returns `true` if the operation conjugates the tensor elements.
    pub fn conjugation(&self) -> bool {
        self.conjugation
    }

    /// Applies the operation to a rank-4 tensor, yielding the transformed tensor.
    pub fn apply<T>(&self, u: ArrayView4<'_, T>) -> Array4<T>
    where
        T: ComplexFloat + Lapack,
    {
        let permuted = u.permuted_axes(self.image);
        let mut transformed = if self.conjugation {
            permuted.mapv(|x| x.conj())
        } else {
            permuted.to_owned()
        };
        if self.parity == Parity::Odd {
            transformed.mapv_inplace(|x| -x);
        }
        transformed
    }
}

impl fmt::Display for TensorSymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}{}",
            if self.parity == Parity::Odd { "-" } else { "+" },
            self.image,
            if self.conjugation { "*" } else { "" }
        )
    }
}

// =========
// Functions
// =========

/// Averages a rank-4 tensor over a list of symmetry operations.
///
/// The result is divided by the number of operations: averaging over a group whose action leaves
/// a tensor invariant returns that tensor unchanged. Callers requiring the *unaveraged*
/// symmetrised tensor must rescale by the group order themselves.
///
/// # Arguments
///
/// * `u` - A rank-4 tensor with four axes of equal length.
/// * `operations` - The symmetry operations to average over.
///
/// # Returns
///
/// The averaged tensor.
///
/// # Panics
///
/// Panics if `operations` is empty or if the axes of `u` do not all have the same length.
pub fn average_over_operations<T>(
    u: ArrayView4<'_, T>,
    operations: &[TensorSymmetry],
) -> Array4<T>
where
    T: ComplexFloat + Lapack,
{
    assert!(
        !operations.is_empty(),
        "At least one symmetry operation is required for an average."
    );
    let (d0, d1, d2, d3) = u.dim();
    assert!(
        d0 == d1 && d1 == d2 && d2 == d3,
        "The tensor axes must all have the same length, but the shape {:?} was found.",
        u.shape()
    );
    let order = T::from(operations.len())
        .expect("Unable to convert the number of operations to the tensor element type.");
    let mut average = Array4::<T>::zeros(u.raw_dim());
    for operation in operations {
        average = average + &operation.apply(u.view());
    }
    average.mapv(|x| x / order)
}

/// Returns the four signed operations generated by exchanging the two creation legs (axes 0, 1)
/// and, independently, the two annihilation legs (axes 2, 3) of a quartic tensor in
/// $`c^{\dagger} c^{\dagger} c c`$ order, each leg exchange entering with fermionic parity.
pub fn leg_exchange_operations() -> Vec<TensorSymmetry> {
    vec![
        TensorSymmetry::identity(),
        TensorSymmetry::new([1, 0, 2, 3], Parity::Odd, false),
        TensorSymmetry::new([0, 1, 3, 2], Parity::Odd, false),
        TensorSymmetry::new([1, 0, 3, 2], Parity::Even, false),
    ]
}

/// Returns the two operations whose average imposes hermiticity on a quartic tensor in
/// $`c^{\dagger} c^{\dagger} c c`$ order: the identity and the conjugating axis reversal.
pub fn conjugation_operations() -> Vec<TensorSymmetry> {
    vec![
        TensorSymmetry::identity(),
        TensorSymmetry::new([3, 2, 1, 0], Parity::Even, true),
    ]
}

/// Antisymmetrises a quartic tensor in $`c^{\dagger} c^{\dagger} c c`$ order under exchange of
/// the two creation legs and, independently, of the two annihilation legs.
///
/// This is the average over [`leg_exchange_operations`] and therefore carries the $`1/4`$ of the
/// group order; it is a projector, so applying it twice changes nothing further.
pub fn permutation_symmetrise<T>(u: ArrayView4<'_, T>) -> Array4<T>
where
    T: ComplexFloat + Lapack,
{
    average_over_operations(u, &leg_exchange_operations())
}

/// Symmetrises a quartic tensor in $`c^{\dagger} c^{\dagger} c c`$ order under hermitian
/// conjugation, so that the result satisfies $`U_{abcd} = U^{*}_{dcba}`$.
pub fn conjugation_symmetrise<T>(u: ArrayView4<'_, T>) -> Array4<T>
where
    T: ComplexFloat + Lapack,
{
    average_over_operations(u, &conjugation_operations())
}

/// Zeroes the Pauli-forbidden entries of a quartic tensor in $`c^{\dagger} c^{\dagger} c c`$
/// order: elements with coinciding creation indices, $`U_{aa\cdot\cdot}`$, or coinciding
/// annihilation indices, $`U_{\cdot\cdot cc}`$, multiply a vanishing operator product.
pub fn pauli_symmetrise<T>(u: ArrayView4<'_, T>) -> Array4<T>
where
    T: ComplexFloat + Lapack,
{
    let mut symmetrised = u.to_owned();
    let n = symmetrised.dim().0;
    for i in 0..n {
        symmetrised.slice_mut(s![i, i, .., ..]).fill(T::zero());
        symmetrised.slice_mut(s![.., .., i, i]).fill(T::zero());
    }
    symmetrised
}

/// Applies the full quartic symmetrisation chain: leg-exchange antisymmetrisation, optionally
/// hermitian conjugation symmetrisation, and finally Pauli zeroing.
///
/// # Arguments
///
/// * `u` - A quartic tensor in $`c^{\dagger} c^{\dagger} c c`$ order.
/// * `conjugation` - A boolean indicating if hermiticity is to be imposed as well.
///
/// # Returns
///
/// The symmetrised tensor, averaged over the applied operations.
pub fn symmetrise_quartic_tensor<T>(u: ArrayView4<'_, T>, conjugation: bool) -> Array4<T>
where
    T: ComplexFloat + Lapack,
{
    let symmetrised = permutation_symmetrise(u);
    let symmetrised = if conjugation {
        conjugation_symmetrise(symmetrised.view())
    } else {
        symmetrised
    };
    pauli_symmetrise(symmetrised.view())
}
