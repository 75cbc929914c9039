//! Fundamental operators and the ordered bases they form for tensor indexing.

use std::fmt;
use std::slice;

use derive_builder::Builder;
use indexmap::IndexSet;
use itertools::Itertools;
use log;


// ==================
// Struct definitions
// ==================

/// A structure to represent a fundamental creation operator $`c^{\dagger}_{B\nu}`$ labelled by a
/// block $`B`$ and an orbital index $`\nu`$ within that block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FundamentalOperator {
    /// The block label, *e.g.* a spin species such as `up` or `dn`.
    block: String,

    /// The orbital index within the block.
    orbital: usize,
}

impl FundamentalOperator {
    /// Creates a fundamental creation operator from a block label and an orbital index.
    pub fn new(block: &str, orbital: usize) -> Self {
        Self {
            block: block.to_string(),
            orbital,
        }
    }

    /// Returns the block label of the operator.
    pub fn block(&self) -> &str {
        &self.block
    }

    /// Returns the orbital index of the operator.
    pub fn orbital(&self) -> usize {
        self.orbital
    }
}

impl fmt::Display for FundamentalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c⁺({}, {})", self.block, self.orbital)
    }
}

/// A structure to manage an ordered basis of fundamental creation operators.
///
/// The position of an operator in the basis fixes the meaning of the corresponding index on every
/// tensor axis: a rank-4 interaction tensor built against this basis has elements
/// $`U_{abcd}`$ where each of $`a, b, c, d`$ runs over `0..self.len()` in basis order. The basis
/// is immutable once built.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct FundamentalOperatorBasis {
    /// The ordered fundamental operators.
    #[builder(setter(custom))]
    operators: Vec<FundamentalOperator>,
}

impl FundamentalOperatorBasisBuilder {
    pub fn operators(&mut self, ops: &[FundamentalOperator]) -> &mut Self {
        self.operators = Some(ops.to_vec());
        self
    }

    fn validate(&self) -> Result<(), String> {
        let operators = self
            .operators
            .as_ref()
            .ok_or("No fundamental operators found.".to_string())?;
        let unique = operators.iter().collect::<IndexSet<_>>();
        if unique.len() != operators.len() {
            log::error!("The fundamental operators contain duplicates.");
            Err("Fundamental operator basis validation failed.".to_string())
        } else {
            Ok(())
        }
    }
}

impl FundamentalOperatorBasis {
    /// Returns a builder to construct a new [`FundamentalOperatorBasis`].
    pub fn builder() -> FundamentalOperatorBasisBuilder {
        FundamentalOperatorBasisBuilder::default()
    }

    /// Constructs the basis of fundamental operators associated with a block structure.
    ///
    /// Each element of `blocks` pairs a block label with the orbital indices it contains. The
    /// resulting basis lists one creation operator per (block, orbital) pair, preserving first the
    /// block order and then the intra-block orbital order, so that tensors indexed against this
    /// basis follow the block-structure ordering.
    ///
    /// # Arguments
    ///
    /// * `blocks` - The block structure, *e.g.* `[("up", [0, 1]), ("dn", [0, 1])]`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the ordered basis, or a builder error if the block structure repeats
    /// a (block, orbital) pair.
    pub fn from_block_structure(
        blocks: &[(String, Vec<usize>)],
    ) -> Result<Self, FundamentalOperatorBasisBuilderError> {
        let operators = blocks
            .iter()
            .flat_map(|(block, orbitals)| {
                orbitals
                    .iter()
                    .map(|orbital| FundamentalOperator::new(block, *orbital))
            })
            .collect::<Vec<_>>();
        Self::builder().operators(&operators).build()
    }

    /// Returns the number of fundamental operators in the basis, which is also the length of every
    /// axis of a tensor indexed against it.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns `true` if the basis contains no operators.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Returns a shared reference to the ordered fundamental operators.
    pub fn operators(&self) -> &Vec<FundamentalOperator> {
        &self.operators
    }

    /// Returns the position of an operator in the basis, if present.
    pub fn position(&self, op: &FundamentalOperator) -> Option<usize> {
        self.operators.iter().position(|o| o == op)
    }

    pub fn iter(&self) -> slice::Iter<'_, FundamentalOperator> {
        self.operators.iter()
    }
}

// =====================
// Trait implementations
// =====================

// -------
// Display
// -------
impl fmt::Display for FundamentalOperatorBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.operators.iter().join(", "))
    }
}
