//! Block layout on irregular site boundaries.
//!
//! A [`Packer`] orients a catalogue of rectangular unit types to the longest
//! edge of the boundary, builds a lattice of candidate points aligned to that
//! edge and fills it: first with the smallest unit, then with a weighted mix
//! of all unit types, dropping or downgrading blocks that overlap.

pub mod geometry;
pub mod packer;
mod types;

pub use packer::Packer;
pub use types::*;
