//! # qvertex: Quartic Vertex Algebra for Many-Body Lattice Models
//!
//! `qvertex` is a library for the construction and manipulation of quartic interaction tensors
//! of Hubbard-like quantum many-body lattice models. It is capable of performing the following:
//! - construction of fundamental operator bases from block structures of single-particle states
//!   and extraction of quartic coefficient tensors with respect to such bases,
//! - symmetrisation of rank-4 tensors over signed permutation and complex-conjugation
//!   operations,
//! - construction of antisymmetrised particle-hole interaction tensors suitable for
//!   random-phase-approximation calculations,
//! - promotion of static interaction tensors to frequency-independent two-particle vertex
//!   functions on triple Matsubara frequency meshes,
//! - evaluation of analytic Kanamori interaction tensors in the charge and spin channels, and
//! - splitting and merging of spin-full interaction tensors between the spin-diagonal form and
//!   the charge/spin channel form.
//!
//! This documentation details the public API of the `qvertex` crate.
//!
//! ## Getting started
//!
//! To use `qvertex` in your Rust project, simply add this crate to your project's `Cargo.toml`.
//! The available features defined by this crate are:
//!
//! ### Linear algebra backend
//!
//! There are six features defining six different ways a linear algebra backend can be configured
//! for `qvertex`. These are inherited from the
//! [`ndarray-linalg`](https://docs.rs/ndarray-linalg/latest/ndarray_linalg/) crate. The tensor
//! algebra in this crate invokes no backend routines on its own, so none of these features is
//! required by default; enable one (and only one) of them whenever `qvertex` is used alongside
//! code that performs dense linear algebra through `ndarray-linalg`:
//! - `openblas-static`: Downloads, builds OpenBLAS, and links statically
//! - `openblas-system`: Finds and links existing OpenBLAS in the system
//! - `netlib-static`: Downloads, builds LAPACK, and links statically
//! - `netlib-system`: Finds and links existing LAPACK in the system
//! - `intel-mkl-static`: Finds and links existing static Intel MKL in the system, or downloads
//!   and links statically if not found
//! - `intel-mkl-system`: Finds and links existing shared Intel MKL in the system
//!
//! If the `*-static` backends give rise to numerical problems, please try installing the linear
//! algebra backends directly (either via your system's package manager or by compiling from
//! source) and then using the corresponding `*-system` backends.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions. For more explanation, please consult this documentation.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod basis;
pub mod channel;
pub mod interfaces;
pub mod kanamori;
pub mod mesh;
pub mod symmetrisation;
pub mod vertex;
