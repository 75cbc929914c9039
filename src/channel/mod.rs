//! Charge and spin channel transforms of spin-full quartic interaction tensors.
//!
//! A spin-full tensor carries composite (spin, orbital) indices on each of its four axes, with
//! spin slow and orbital fast. For spin-conserving interactions such a tensor decomposes into a
//! charge channel component and a spin channel component, each resolved over orbital indices
//! only.

use std::error::Error;
use std::fmt;

use itertools::{iproduct, Itertools};
use ndarray::{Array4, ArrayD, ArrayView4, ArrayViewD, ArrayViewMutD, Axis, Ix4, IxDyn};
use ndarray_linalg::types::Lapack;
use num_complex::ComplexFloat;
use num_traits::ToPrimitive;


/// The default tolerance below which a forbidden spin block is considered vanishing.
pub const DEFAULT_SPIN_CONSERVATION_TOLERANCE: f64 = 1e-7;

/// The ten spin index combinations of a spin-first rank-8 tensor that a spin-conserving
/// interaction cannot populate.
pub const FORBIDDEN_SPIN_BLOCKS: [[usize; 4]; 10] = [
    [0, 0, 0, 1],
    [0, 0, 1, 0],
    [0, 1, 0, 0],
    [1, 0, 0, 0],
    [1, 1, 1, 0],
    [1, 1, 0, 1],
    [1, 0, 1, 1],
    [0, 1, 1, 1],
    [1, 0, 1, 0],
    [0, 1, 0, 1],
];

// ================
// Error definition
// ================

/// An enumerated type for managing errors arising in channel transforms of spin-full quartic
/// tensors.
#[derive(Debug, Clone)]
pub enum ChannelTransformError {
    /// Variant for tensors whose shapes are incompatible with the requested transform. The
    /// associated string describes the mismatch.
    IncompatibleShape(String),

    /// Variant for spin-full tensors that populate spin blocks forbidden by spin conservation.
    SpinConservation {
        /// The populated forbidden spin blocks, each with the largest magnitude found in it.
        violations: Vec<([usize; 4], f64)>,

        /// The largest offending magnitude across all populated forbidden blocks.
        max_violation: f64,
    },
}

impl fmt::Display for ChannelTransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelTransformError::IncompatibleShape(msg) => {
                write!(f, "Channel transform error: {msg}.")
            }
            ChannelTransformError::SpinConservation {
                violations,
                max_violation,
            } => {
                write!(
                    f,
                    "Channel transform error: spin conservation is violated in the spin blocks {}; the largest offending magnitude is {max_violation:.3e}.",
                    violations
                        .iter()
                        .map(|(block, _)| format!("{block:?}"))
                        .join(", ")
                )
            }
        }
    }
}

impl Error for ChannelTransformError {}

// =========
// Functions
// =========

/// Splits a spin-full quartic tensor into its charge and spin channel components.
///
/// Each composite axis is unfolded into a spin axis of length 2 and an orbital axis, with spin
/// slow and orbital fast; the spin axes are brought to the front, and the ten spin blocks
/// forbidden by spin conservation are required to vanish to `tolerance`. The channel components
/// are then read off the spin-diagonal blocks:
///
/// ```math
///     U_c = -U_{\uparrow\uparrow\uparrow\uparrow} - U_{\uparrow\uparrow\downarrow\downarrow},
///     \quad
///     U_s = U_{\uparrow\uparrow\uparrow\uparrow} - U_{\uparrow\uparrow\downarrow\downarrow}.
/// ```
///
/// # Arguments
///
/// * `u` - A spin-full quartic tensor with four composite axes of equal, even length.
/// * `tolerance` - The largest magnitude a forbidden spin block may carry. See
///   [`DEFAULT_SPIN_CONSERVATION_TOLERANCE`].
///
/// # Returns
///
/// The charge channel and spin channel tensors, each with four orbital axes of half the
/// composite length.
///
/// # Errors
///
/// Errors if the axes of `u` are unequal or odd, or if any forbidden spin block carries a
/// magnitude above `tolerance`.
pub fn split_charge_and_spin<T>(
    u: ArrayView4<'_, T>,
    tolerance: f64,
) -> Result<(Array4<T>, Array4<T>), ChannelTransformError>
where
    T: ComplexFloat + Lapack,
{
    let (d0, d1, d2, d3) = u.dim();
    if !(d0 == d1 && d1 == d2 && d2 == d3) {
        log::error!(
            "The spin-full tensor axes have unequal lengths: {:?}.",
            u.shape()
        );
        return Err(ChannelTransformError::IncompatibleShape(format!(
            "the spin-full tensor axes have unequal lengths: {:?}",
            u.shape()
        )));
    }
    if d0 % 2 != 0 {
        log::error!(
            "The spin-full tensor axes have odd length {d0}, which cannot be unfolded into (spin, orbital) components."
        );
        return Err(ChannelTransformError::IncompatibleShape(format!(
            "the spin-full tensor axes have odd length {d0}"
        )));
    }
    let norb = d0 / 2;
    let u_8 = to_spin_first(u, norb);

    let mut violations: Vec<([usize; 4], f64)> = Vec::new();
    for block in FORBIDDEN_SPIN_BLOCKS {
        let max_magnitude = spin_block(&u_8, block).iter().fold(0.0_f64, |acc, x| {
            acc.max(
                ComplexFloat::abs(*x)
                    .to_f64()
                    .expect("Unable to convert a tensor magnitude to `f64`."),
            )
        });
        if max_magnitude > tolerance {
            violations.push((block, max_magnitude));
        }
    }
    if !violations.is_empty() {
        let max_violation = violations
            .iter()
            .map(|(_, magnitude)| *magnitude)
            .fold(0.0_f64, f64::max);
        log::error!(
            "The spin-full tensor violates spin conservation in {} spin blocks; the largest offending magnitude is {max_violation:.3e}.",
            violations.len()
        );
        return Err(ChannelTransformError::SpinConservation {
            violations,
            max_violation,
        });
    }
    log::debug!(
        "All {} forbidden spin blocks vanish to {tolerance:.3e}.",
        FORBIDDEN_SPIN_BLOCKS.len()
    );

    let uuuu = spin_block(&u_8, [0, 0, 0, 0])
        .to_owned()
        .into_dimensionality::<Ix4>()
        .expect("Unable to convert the ↑↑↑↑ spin block to a rank-4 array.");
    let uudd = spin_block(&u_8, [0, 0, 1, 1])
        .to_owned()
        .into_dimensionality::<Ix4>()
        .expect("Unable to convert the ↑↑↓↓ spin block to a rank-4 array.");

    // Charge and spin diagonalisation in the particle-hole c⁺cc⁺c form. In the pair c⁺c⁺cc form
    // it would instead read
    //     U_c =  U8[0, 0, 0, 0] + U8[0, 1, 1, 0]
    //     U_s = -U8[0, 0, 0, 0] + U8[0, 1, 1, 0]
    let u_c = -(&uuuu + &uudd);
    let u_s = &uuuu - &uudd;

    Ok((u_c, u_s))
}

/// Reassembles a spin-full quartic tensor from its charge and spin channel components.
///
/// The nonzero spin blocks of the spin-first rank-8 tensor are populated according to
///
/// ```math
///     U_{ssss} = -\tfrac{1}{2} (U_c - U_s), \quad
///     U_{ss\bar{s}\bar{s}} = -\tfrac{1}{2} (U_c + U_s), \quad
///     U_{s\bar{s}\bar{s}s} = U_s,
/// ```
///
/// after which the spin and orbital axes are interleaved and fused back into composite axes with
/// spin slow and orbital fast. The result satisfies spin conservation by construction, so
/// [`split_charge_and_spin`] recovers `charge` and `spin` exactly.
///
/// # Arguments
///
/// * `charge` - The charge channel tensor with four orbital axes of equal length.
/// * `spin` - The spin channel tensor with the same shape as `charge`.
///
/// # Returns
///
/// The spin-full quartic tensor with four composite axes of doubled length.
///
/// # Errors
///
/// Errors if the axes of `charge` are unequal or if the shapes of `charge` and `spin` differ.
pub fn merge_charge_and_spin<T>(
    charge: ArrayView4<'_, T>,
    spin: ArrayView4<'_, T>,
) -> Result<Array4<T>, ChannelTransformError>
where
    T: ComplexFloat + Lapack,
{
    let (d0, d1, d2, d3) = charge.dim();
    if !(d0 == d1 && d1 == d2 && d2 == d3) {
        log::error!(
            "The charge channel tensor axes have unequal lengths: {:?}.",
            charge.shape()
        );
        return Err(ChannelTransformError::IncompatibleShape(format!(
            "the charge channel tensor axes have unequal lengths: {:?}",
            charge.shape()
        )));
    }
    if charge.dim() != spin.dim() {
        log::error!(
            "The charge and spin channel tensors have mismatched shapes: {:?} versus {:?}.",
            charge.shape(),
            spin.shape()
        );
        return Err(ChannelTransformError::IncompatibleShape(format!(
            "the charge and spin channel tensors have mismatched shapes: {:?} versus {:?}",
            charge.shape(),
            spin.shape()
        )));
    }
    let norb = d0;

    let half = T::from(0.5).expect("Unable to convert 1/2 to the tensor element type.");
    let u_uu = (&spin - &charge).mapv(|x| x * half);
    let minus_u_ud = (&charge + &spin).mapv(|x| -(x * half));

    let mut u_8 = ArrayD::<T>::zeros(IxDyn(&[2, 2, 2, 2, norb, norb, norb, norb]));
    for (s1, s2) in iproduct!(0..2_usize, 0..2_usize) {
        if s1 == s2 {
            spin_block_mut(&mut u_8, [s1, s1, s1, s1]).assign(&u_uu);
        } else {
            spin_block_mut(&mut u_8, [s1, s1, s2, s2]).assign(&minus_u_ud);
            spin_block_mut(&mut u_8, [s1, s2, s2, s1]).assign(&spin);
        }
    }

    let interleaved = u_8.permuted_axes(IxDyn(&[0, 4, 1, 5, 2, 6, 3, 7]));
    let merged = interleaved
        .as_standard_layout()
        .into_owned()
        .into_shape(IxDyn(&[2 * norb; 4]))
        .expect("Unable to fuse the spin and orbital axes of the merged tensor.")
        .into_dimensionality::<Ix4>()
        .expect("Unable to convert the merged tensor to a rank-4 array.");
    Ok(merged)
}

// A spin-full composite axis of length 2m unfolds into a spin axis of length 2 (slow) and an
// orbital axis of length m (fast).
fn to_spin_first<T>(u: ArrayView4<'_, T>, norb: usize) -> ArrayD<T>
where
    T: ComplexFloat + Lapack,
{
    u.as_standard_layout()
        .into_owned()
        .into_shape(IxDyn(&[2, norb, 2, norb, 2, norb, 2, norb]))
        .expect("Unable to unfold the spin-full tensor into spin and orbital axes.")
        .permuted_axes(IxDyn(&[0, 2, 4, 6, 1, 3, 5, 7]))
}

fn spin_block<'a, T>(u_8: &'a ArrayD<T>, block: [usize; 4]) -> ArrayViewD<'a, T> {
    u_8.index_axis(Axis(0), block[0])
        .index_axis_move(Axis(0), block[1])
        .index_axis_move(Axis(0), block[2])
        .index_axis_move(Axis(0), block[3])
}

fn spin_block_mut<'a, T>(u_8: &'a mut ArrayD<T>, block: [usize; 4]) -> ArrayViewMutD<'a, T> {
    u_8.index_axis_mut(Axis(0), block[0])
        .index_axis_move(Axis(0), block[1])
        .index_axis_move(Axis(0), block[2])
        .index_axis_move(Axis(0), block[3])
}
