//! Interfaces between the crate and external input specifications.

pub mod input;
