//! The `cellterp` crate provides interpolation of cell-centred fields on
//! polyhedral meshes.
//!
//! A field stores one value per mesh cell. An interpolation scheme bound to
//! the field evaluates it at arbitrary positions inside the cells, either one
//! position at a time or in batches. Schemes are constructed by name from
//! per-value-type registries, optionally selected per field from a parameter file.
pub mod error;
pub mod field;
pub mod geometry;
pub mod interpolation;
pub mod io;
pub mod locate;
pub mod mapping;
pub mod mesh;
pub mod num;
pub mod reconstruction;
