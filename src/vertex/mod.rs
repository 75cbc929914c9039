//! Quartic interaction vertices.
//!
//! This module provides the validated container for quartic interaction tensors, the extraction
//! of such tensors from many-body operators, and the construction of frequency-independent
//! two-particle vertex functions.

use std::error::Error;
use std::fmt;

use anyhow::format_err;
use derive_builder::Builder;
use itertools::iproduct;
use ndarray::{Array4, ArrayViewD, ArrayViewMutD, Axis};
use ndarray_linalg::types::Lapack;
use num_complex::ComplexFloat;

use crate::basis::FundamentalOperatorBasis;
use crate::symmetrisation::{leg_exchange_operations, permutation_symmetrise};

#[cfg(test)]
mod vertex_tests;

// ================
// Enum definitions
// ================

/// An enumerated type for the operator orderings in which a quartic interaction tensor can be
/// expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorOrder {
    /// Variant for the normal ordering $`c^{\dagger}_a c^{\dagger}_b c_c c_d`$ in which quartic
    /// coefficients of a many-body operator are extracted.
    CreCreAnnAnn,

    /// Variant for the particle-hole ordering $`c_a c^{\dagger}_{\bar{a}} c_b
    /// c^{\dagger}_{\bar{b}}`$ in which two-particle vertex functions are expressed.
    AnnCreAnnCre,
}

impl fmt::Display for OperatorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorOrder::CreCreAnnAnn => write!(f, "c⁺c⁺cc"),
            OperatorOrder::AnnCreAnnCre => write!(f, "cc⁺cc⁺"),
        }
    }
}

// ================
// Error definition
// ================

/// A structure for managing errors arising in the manipulation of quartic interaction vertices.
#[derive(Debug, Clone)]
pub struct VertexError(pub String);

impl fmt::Display for VertexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex error: {}.", self.0)
    }
}

impl Error for VertexError {}

// ==================
// Struct definitions
// ==================

/// A structure containing a quartic interaction tensor together with the operator ordering in
/// which its elements are to be read.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct QuarticTensor<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// The rank-4 tensor of interaction amplitudes. All four axes run over the same fundamental
    /// operator basis and must therefore have equal lengths.
    data: Array4<T>,

    /// The operator ordering in which the axes of [`Self::data`] are to be read.
    order: OperatorOrder,
}

impl<T> QuarticTensorBuilder<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    fn validate(&self) -> Result<(), String> {
        let data = self.data.as_ref().ok_or("No tensor data found.".to_string())?;
        let (d0, d1, d2, d3) = data.dim();
        let square = d0 == d1 && d1 == d2 && d2 == d3;
        if !square {
            log::error!(
                "The interaction tensor axes have unequal lengths: {:?}.",
                data.shape()
            );
        }
        if square {
            Ok(())
        } else {
            Err("Quartic tensor validation failed.".to_string())
        }
    }
}

impl<T> QuarticTensor<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// Returns a builder to construct a new [`QuarticTensor`].
    pub fn builder() -> QuarticTensorBuilder<T> {
        QuarticTensorBuilder::default()
    }

    /// Creates a quartic tensor in the normal ordering $`c^{\dagger} c^{\dagger} c c`$.
    ///
    /// # Errors
    ///
    /// Errors if the axes of `data` do not all have the same length.
    pub fn cre_cre_ann_ann(data: Array4<T>) -> Result<Self, QuarticTensorBuilderError> {
        Self::builder()
            .data(data)
            .order(OperatorOrder::CreCreAnnAnn)
            .build()
    }

    /// Creates a quartic tensor in the particle-hole ordering $`c c^{\dagger} c c^{\dagger}`$.
    ///
    /// # Errors
    ///
    /// Errors if the axes of `data` do not all have the same length.
    pub fn ann_cre_ann_cre(data: Array4<T>) -> Result<Self, QuarticTensorBuilderError> {
        Self::builder()
            .data(data)
            .order(OperatorOrder::AnnCreAnnCre)
            .build()
    }

    /// Returns the operator ordering of the tensor.
    pub fn order(&self) -> OperatorOrder {
        self.order
    }

    /// Returns the common length of the four tensor axes.
    pub fn basis_size(&self) -> usize {
        self.data.dim().0
    }

    /// Returns a shared reference to the tensor of interaction amplitudes.
    pub fn data(&self) -> &Array4<T> {
        &self.data
    }

    /// Consumes the structure and returns the tensor of interaction amplitudes.
    pub fn into_data(self) -> Array4<T> {
        self.data
    }
}

// =================
// Trait definitions
// =================

/// A trait for extracting the quartic coefficients of a many-body operator with respect to a
/// fundamental operator basis.
pub trait QuarticExtraction<O, T>
where
    T: ComplexFloat + Lapack,
{
    /// Extracts the rank-4 tensor $`U_{abcd}`$ of coefficients of the normal-ordered quartic
    /// terms $`c^{\dagger}_a c^{\dagger}_b c_c c_d`$ of `operator`, where the indices run over
    /// the operators in `basis`.
    ///
    /// # Errors
    ///
    /// Errors if the coefficients of `operator` cannot be resolved in `basis`.
    fn quartic_tensor(
        &self,
        operator: &O,
        basis: &FundamentalOperatorBasis,
    ) -> Result<Array4<T>, anyhow::Error>;
}

/// A trait for frequency-resolved two-particle objects that can serve as templates for the
/// construction of vertex functions.
///
/// A template supplies the inverse temperature of its Matsubara meshes and a data array resolved
/// over one bosonic frequency axis, two fermionic frequency axes and four orbital axes; vertex
/// construction overwrites the values of a clone of the template.
pub trait VertexTemplate<T>
where
    T: ComplexFloat + Lapack,
{
    /// The inverse temperature $`\beta`$ of the Matsubara frequency meshes of the object.
    fn inverse_temperature(&self) -> f64;

    /// A view of the frequency-and-orbital resolved data array of the object.
    fn data(&self) -> ArrayViewD<'_, T>;

    /// A mutable view of the frequency-and-orbital resolved data array of the object.
    fn data_mut(&mut self) -> ArrayViewMutD<'_, T>;
}

// =========
// Functions
// =========

/// Antisymmetrises a quartic tensor given in $`c^{\dagger} c^{\dagger} c c`$ order and reorders
/// it into the particle-hole ordering $`c c^{\dagger} c c^{\dagger}`$ used by two-particle
/// vertex functions.
///
/// The antisymmetrised tensor is rescaled by the leg-exchange group order so that the four
/// signed permutation images are summed rather than averaged, and the reordering is the pure
/// index relabelling
///
/// ```math
///     \Gamma_{c a d b} = U_{a b c d}.
/// ```
///
/// # Arguments
///
/// * `u` - A quartic tensor in $`c^{\dagger} c^{\dagger} c c`$ order.
///
/// # Returns
///
/// The antisymmetrised tensor in $`c c^{\dagger} c c^{\dagger}`$ order.
///
/// # Errors
///
/// Errors if `u` is not in $`c^{\dagger} c^{\dagger} c c`$ order.
pub fn symmetrise_and_reorder<T>(u: &QuarticTensor<T>) -> Result<QuarticTensor<T>, VertexError>
where
    T: ComplexFloat + Lapack,
{
    if u.order() != OperatorOrder::CreCreAnnAnn {
        log::error!(
            "A quartic tensor in {} order is required, but one in {} order was found.",
            OperatorOrder::CreCreAnnAnn,
            u.order()
        );
        return Err(VertexError(
            "Only quartic tensors in c⁺c⁺cc order can be reordered into vertex form".to_string(),
        ));
    }
    let group_order = T::from(leg_exchange_operations().len())
        .expect("Unable to convert the leg-exchange group order to the tensor element type.");
    let antisymmetrised = permutation_symmetrise(u.data().view()).mapv(|x| x * group_order);
    let reordered = antisymmetrised.permuted_axes([2, 0, 3, 1]);
    QuarticTensor::builder()
        .data(reordered.as_standard_layout().to_owned())
        .order(OperatorOrder::AnnCreAnnCre)
        .build()
        .map_err(|err| VertexError(err.to_string()))
}

/// Computes the particle-hole interaction tensor of a many-body operator for use in
/// random-phase-approximation calculations.
///
/// The quartic coefficients of `operator` are first extracted in
/// $`c^{\dagger} c^{\dagger} c c`$ order with respect to `basis` and then antisymmetrised,
/// rescaled and reordered into $`c c^{\dagger} c c^{\dagger}`$ order by
/// [`symmetrise_and_reorder`].
///
/// # Arguments
///
/// * `extraction` - A strategy for extracting quartic coefficients from `operator`.
/// * `operator` - A many-body operator containing quartic interaction terms.
/// * `basis` - The fundamental operator basis over which the tensor indices run.
///
/// # Returns
///
/// The particle-hole interaction tensor of `operator`.
///
/// # Errors
///
/// Errors if the extraction fails or if the extracted tensor is incompatible with `basis`.
pub fn rpa_tensor_from_operator<E, O, T>(
    extraction: &E,
    operator: &O,
    basis: &FundamentalOperatorBasis,
) -> Result<QuarticTensor<T>, anyhow::Error>
where
    E: QuarticExtraction<O, T>,
    T: ComplexFloat + Lapack,
{
    let n = basis.len();
    log::debug!(
        "Constructing the particle-hole interaction tensor over {n} fundamental operators..."
    );
    let raw = extraction.quartic_tensor(operator, basis)?;
    if raw.dim() != (n, n, n, n) {
        return Err(format_err!(
            "The extracted quartic tensor has shape {:?}, which is incompatible with the fundamental operator basis of {} operators.",
            raw.shape(),
            n
        ));
    }
    let u = QuarticTensor::cre_cre_ann_ann(raw)
        .map_err(|err| format_err!("Unable to construct a quartic tensor: {err}"))?;
    let gamma = symmetrise_and_reorder(&u)?;
    log::debug!(
        "Constructing the particle-hole interaction tensor over {n} fundamental operators... Done."
    );
    Ok(gamma)
}

/// Builds a frequency-independent vertex function from a particle-hole interaction tensor by
/// broadcasting $`U / \beta^2`$ over every frequency triple of a template object.
///
/// # Arguments
///
/// * `template` - A frequency-resolved template whose meshes and shape the vertex inherits; the
///   values of the template are ignored.
/// * `u` - A particle-hole interaction tensor in $`c c^{\dagger} c c^{\dagger}`$ order.
///
/// # Returns
///
/// A clone of `template` whose every frequency triple holds $`U / \beta^2`$.
///
/// # Errors
///
/// Errors if `u` is not in $`c c^{\dagger} c c^{\dagger}`$ order, or if the data array of
/// `template` does not consist of three frequency axes followed by four orbital axes matching
/// the basis size of `u`.
pub fn constant_vertex<G, T>(template: &G, u: &QuarticTensor<T>) -> Result<G, VertexError>
where
    G: VertexTemplate<T> + Clone,
    T: ComplexFloat + Lapack,
{
    if u.order() != OperatorOrder::AnnCreAnnCre {
        log::error!(
            "A quartic tensor in {} order is required, but one in {} order was found.",
            OperatorOrder::AnnCreAnnCre,
            u.order()
        );
        return Err(VertexError(
            "Only quartic tensors in cc⁺cc⁺ order can be broadcast into a vertex function"
                .to_string(),
        ));
    }
    let n = u.basis_size();
    let (n_w, n_n1, n_n2) = {
        let data = template.data();
        if data.ndim() != 7 {
            log::error!(
                "A frequency-resolved template of rank 7 is required, but one of rank {} was found.",
                data.ndim()
            );
            return Err(VertexError(
                "Incompatible template rank for vertex construction".to_string(),
            ));
        }
        if data.shape()[3..] != [n, n, n, n] {
            log::error!(
                "The orbital axes of the template have lengths {:?}, which do not match the basis size {} of the interaction tensor.",
                &data.shape()[3..],
                n
            );
            return Err(VertexError(
                "Incompatible template orbital dimensions for vertex construction".to_string(),
            ));
        }
        (data.shape()[0], data.shape()[1], data.shape()[2])
    };

    let beta = template.inverse_temperature();
    let beta_sq = T::from(beta * beta)
        .expect("Unable to convert the squared inverse temperature to the tensor element type.");
    let scaled = u.data().mapv(|x| x / beta_sq);

    log::debug!(
        "Broadcasting the interaction tensor over {} frequency triples...",
        n_w * n_n1 * n_n2
    );
    let mut vertex = template.clone();
    for (w, n1, n2) in iproduct!(0..n_w, 0..n_n1, 0..n_n2) {
        let mut block = vertex
            .data_mut()
            .index_axis_move(Axis(0), w)
            .index_axis_move(Axis(0), n1)
            .index_axis_move(Axis(0), n2);
        block.assign(&scaled);
    }
    log::debug!(
        "Broadcasting the interaction tensor over {} frequency triples... Done.",
        n_w * n_n1 * n_n2
    );
    Ok(vertex)
}
