//! YAML input specifications for interaction tensor construction.

use anyhow::{self, format_err};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use serde_yaml;

use crate::basis::FundamentalOperatorBasis;
use crate::kanamori::KanamoriParameters;

/// A structure containing the specification of a Kanamori interaction which can be serialised
/// into and deserialised from a YAML input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KanamoriInput {
    /// The number of orbitals.
    pub norb: usize,

    /// The intra-orbital Hubbard interaction $`U`$.
    pub u: f64,

    /// The inter-orbital Hubbard interaction $`U'`$.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `0.0`.
    #[serde(default)]
    pub up: f64,

    /// The Hund's exchange coupling $`J`$.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `0.0`.
    #[serde(default)]
    pub j: f64,

    /// The pair-hopping amplitude $`J'`$.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `0.0`.
    #[serde(default)]
    pub jp: f64,
}

impl KanamoriInput {
    /// Converts the specification into complex-valued Kanamori coupling constants.
    pub fn to_parameters(&self) -> KanamoriParameters<Complex<f64>> {
        KanamoriParameters::new(
            Complex::from(self.u),
            Complex::from(self.up),
            Complex::from(self.j),
            Complex::from(self.jp),
        )
    }
}

/// A structure containing input parameters for interaction tensor construction which can be
/// serialised into and deserialised from a YAML input.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Input {
    /// Specification for a Kanamori interaction. If `None`, no analytic Kanamori tensors can be
    /// constructed from this input.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `None`.
    #[serde(default)]
    pub kanamori: Option<KanamoriInput>,

    /// The block structure of the fundamental operator basis: a sequence of (block name, orbital
    /// indices) pairs. If `None`, no fundamental operator basis can be constructed from this
    /// input.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `None`.
    #[serde(default)]
    pub block_structure: Option<Vec<(String, Vec<usize>)>>,
}

impl Input {
    /// Deserialises an input specification from a YAML string.
    ///
    /// # Errors
    ///
    /// Errors if the string cannot be deserialised into an [`Input`] structure.
    pub fn from_yaml(yaml: &str) -> Result<Self, anyhow::Error> {
        serde_yaml::from_str(yaml).map_err(|err| format_err!(err))
    }

    /// Constructs the complex-valued Kanamori coupling constants specified by the input.
    ///
    /// # Errors
    ///
    /// Errors if the input contains no Kanamori section.
    pub fn kanamori_parameters(&self) -> Result<KanamoriParameters<Complex<f64>>, anyhow::Error> {
        self.kanamori
            .as_ref()
            .map(KanamoriInput::to_parameters)
            .ok_or_else(|| format_err!("No Kanamori specification found in the input."))
    }

    /// Constructs the fundamental operator basis specified by the input's block structure.
    ///
    /// # Errors
    ///
    /// Errors if the input contains no block structure or if the block structure specifies
    /// duplicate operators.
    pub fn fundamental_operator_basis(&self) -> Result<FundamentalOperatorBasis, anyhow::Error> {
        let block_structure = self
            .block_structure
            .as_ref()
            .ok_or_else(|| format_err!("No block structure found in the input."))?;
        FundamentalOperatorBasis::from_block_structure(block_structure)
            .map_err(|err| format_err!("Unable to construct the fundamental operator basis: {err}"))
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
