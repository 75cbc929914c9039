//! Matsubara frequency meshes and frequency-resolved two-particle containers.
//!
//! The meshes here are minimal descriptors carrying statistics, sizes and the inverse
//! temperature; they contain no Fourier or lattice machinery.

use std::fmt;

use derive_builder::Builder;
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn};
use ndarray_linalg::types::Lapack;
use num_complex::ComplexFloat;

use crate::vertex::VertexTemplate;


// ================
// Enum definitions
// ================

/// An enumerated type for the statistics of Matsubara frequency meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statistic {
    /// Variant for bosonic Matsubara frequencies $`i\omega_n = 2n\pi i / \beta`$.
    Boson,

    /// Variant for fermionic Matsubara frequencies $`i\nu_n = (2n + 1)\pi i / \beta`$.
    Fermion,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Boson => write!(f, "boson"),
            Statistic::Fermion => write!(f, "fermion"),
        }
    }
}

// ==================
// Struct definitions
// ==================

/// A structure to handle a Matsubara frequency mesh.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct FrequencyMesh {
    /// The inverse temperature $`\beta`$ of the mesh.
    beta: f64,

    /// The statistic of the mesh frequencies.
    statistic: Statistic,

    /// The number of frequencies in the mesh.
    n_points: usize,
}

impl FrequencyMeshBuilder {
    fn validate(&self) -> Result<(), String> {
        let beta = self
            .beta
            .ok_or("No inverse temperature found.".to_string())?;
        let positive_beta = beta > 0.0;
        if !positive_beta {
            log::error!("The inverse temperature must be positive, but {beta} was found.");
        }
        let n_points = self
            .n_points
            .ok_or("No number of frequencies found.".to_string())?;
        let populated = n_points > 0;
        if !populated {
            log::error!("A frequency mesh must contain at least one frequency.");
        }
        if positive_beta && populated {
            Ok(())
        } else {
            Err("Frequency mesh validation failed.".to_string())
        }
    }
}

impl FrequencyMesh {
    /// Returns a builder to construct a new [`FrequencyMesh`].
    pub fn builder() -> FrequencyMeshBuilder {
        FrequencyMeshBuilder::default()
    }

    /// Creates a mesh of `n_points` frequencies with the given statistic at inverse temperature
    /// `beta`.
    ///
    /// # Errors
    ///
    /// Errors if `beta` is not positive or if `n_points` is zero.
    pub fn new(
        beta: f64,
        statistic: Statistic,
        n_points: usize,
    ) -> Result<Self, FrequencyMeshBuilderError> {
        Self::builder()
            .beta(beta)
            .statistic(statistic)
            .n_points(n_points)
            .build()
    }

    /// Returns the inverse temperature of the mesh.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns the statistic of the mesh frequencies.
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Returns the number of frequencies in the mesh.
    pub fn n_points(&self) -> usize {
        self.n_points
    }
}

// -------
// Display
// -------

impl fmt::Display for FrequencyMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mesh of {} frequencies at β = {}",
            self.statistic, self.n_points, self.beta
        )
    }
}

/// A structure to handle the three-frequency Matsubara mesh of a two-particle object: one
/// bosonic transfer frequency followed by two fermionic frequencies, all sharing one inverse
/// temperature.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TripleFrequencyMesh {
    /// The component meshes in (bosonic, fermionic, fermionic) order.
    components: [FrequencyMesh; 3],
}

impl TripleFrequencyMeshBuilder {
    fn validate(&self) -> Result<(), String> {
        let components = self
            .components
            .as_ref()
            .ok_or("No component meshes found.".to_string())?;
        let statistics = components[0].statistic() == Statistic::Boson
            && components[1].statistic() == Statistic::Fermion
            && components[2].statistic() == Statistic::Fermion;
        if !statistics {
            log::error!(
                "A (boson, fermion, fermion) sequence of component meshes is required, but ({}, {}, {}) was found.",
                components[0].statistic(),
                components[1].statistic(),
                components[2].statistic()
            );
        }
        let betas = components
            .iter()
            .all(|mesh| approx::relative_eq!(mesh.beta(), components[0].beta()));
        if !betas {
            log::error!("The component meshes do not share a common inverse temperature.");
        }
        if statistics && betas {
            Ok(())
        } else {
            Err("Three-frequency mesh validation failed.".to_string())
        }
    }
}

impl TripleFrequencyMesh {
    /// Returns a builder to construct a new [`TripleFrequencyMesh`].
    pub fn builder() -> TripleFrequencyMeshBuilder {
        TripleFrequencyMeshBuilder::default()
    }

    /// Creates a (bosonic, fermionic, fermionic) mesh with `n_w` bosonic and `n_nu` fermionic
    /// frequencies at inverse temperature `beta`.
    ///
    /// # Errors
    ///
    /// Errors if `beta` is not positive or if either frequency count is zero.
    pub fn new(
        beta: f64,
        n_w: usize,
        n_nu: usize,
    ) -> Result<Self, TripleFrequencyMeshBuilderError> {
        let bosonic = FrequencyMesh::new(beta, Statistic::Boson, n_w)
            .map_err(|err| TripleFrequencyMeshBuilderError::from(err.to_string()))?;
        let fermionic = FrequencyMesh::new(beta, Statistic::Fermion, n_nu)
            .map_err(|err| TripleFrequencyMeshBuilderError::from(err.to_string()))?;
        Self::builder()
            .components([bosonic, fermionic.clone(), fermionic])
            .build()
    }

    /// Returns the component meshes in (bosonic, fermionic, fermionic) order.
    pub fn components(&self) -> &[FrequencyMesh; 3] {
        &self.components
    }

    /// Returns the common inverse temperature of the component meshes, read from the bosonic
    /// component.
    pub fn beta(&self) -> f64 {
        self.components[0].beta()
    }
}

/// A structure containing a generalised susceptibility resolved over a three-frequency Matsubara
/// mesh and four target orbital axes.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GeneralisedSusceptibility<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// The three-frequency Matsubara mesh over which the susceptibility is resolved.
    mesh: TripleFrequencyMesh,

    /// The rank-7 data array: one bosonic and two fermionic frequency axes followed by four
    /// orbital axes of equal length.
    data: ArrayD<T>,
}

impl<T> GeneralisedSusceptibilityBuilder<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    fn validate(&self) -> Result<(), String> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or("No three-frequency mesh found.".to_string())?;
        let data = self.data.as_ref().ok_or("No data array found.".to_string())?;
        if data.ndim() != 7 {
            log::error!(
                "A rank-7 data array is required, but one of rank {} was found.",
                data.ndim()
            );
            return Err("Generalised susceptibility validation failed.".to_string());
        }
        let shape = data.shape();
        let frequencies = shape[0] == mesh.components()[0].n_points()
            && shape[1] == mesh.components()[1].n_points()
            && shape[2] == mesh.components()[2].n_points();
        if !frequencies {
            log::error!(
                "The frequency axes of the data array have lengths {:?}, which do not match the mesh sizes ({}, {}, {}).",
                &shape[..3],
                mesh.components()[0].n_points(),
                mesh.components()[1].n_points(),
                mesh.components()[2].n_points()
            );
        }
        let orbitals = shape[3] == shape[4] && shape[4] == shape[5] && shape[5] == shape[6];
        if !orbitals {
            log::error!(
                "The orbital axes of the data array have unequal lengths: {:?}.",
                &shape[3..]
            );
        }
        if frequencies && orbitals {
            Ok(())
        } else {
            Err("Generalised susceptibility validation failed.".to_string())
        }
    }
}

impl<T> GeneralisedSusceptibility<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    /// Returns a builder to construct a new [`GeneralisedSusceptibility`].
    pub fn builder() -> GeneralisedSusceptibilityBuilder<T> {
        GeneralisedSusceptibilityBuilder::default()
    }

    /// Creates an all-zero susceptibility on `mesh` with four orbital axes of length
    /// `target_size`.
    ///
    /// # Errors
    ///
    /// Errors if the builder validation fails.
    pub fn zeros(
        mesh: TripleFrequencyMesh,
        target_size: usize,
    ) -> Result<Self, GeneralisedSusceptibilityBuilderError> {
        let shape = [
            mesh.components()[0].n_points(),
            mesh.components()[1].n_points(),
            mesh.components()[2].n_points(),
            target_size,
            target_size,
            target_size,
            target_size,
        ];
        let data = ArrayD::<T>::zeros(IxDyn(&shape));
        Self::builder().mesh(mesh).data(data).build()
    }

    /// Returns the three-frequency mesh of the susceptibility.
    pub fn mesh(&self) -> &TripleFrequencyMesh {
        &self.mesh
    }

    /// Returns the common length of the four orbital axes.
    pub fn target_size(&self) -> usize {
        self.data.shape()[3]
    }

    /// Consumes the structure and returns the data array.
    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }
}

impl<T> VertexTemplate<T> for GeneralisedSusceptibility<T>
where
    T: ComplexFloat + Clone + Lapack,
{
    fn inverse_temperature(&self) -> f64 {
        self.mesh.beta()
    }

    fn data(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    fn data_mut(&mut self) -> ArrayViewMutD<'_, T> {
        self.data.view_mut()
    }
}
