//! Sweep triangulated tubes along 3D centerlines.
//!
//! The pipeline is:
//! 1. read centerline rows into points ([`io::centerline`]),
//! 2. validate them as a [`Centerline`],
//! 3. resolve a radius per vertex ([`resolve_radii`]),
//! 4. propagate rotation-minimizing [`Frame`]s ([`sweep_frames`]),
//! 5. emit and stitch vertex rings into a [`TubeMesh`] ([`build_mesh`]),
//!
//! with [`build_tube`] running steps 2 to 5. The mesh can then be written as STL ([`io::stl`]).
use rustc_hash::FxHashSet as HashSet;
use std::fmt;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod centerline;
mod error;
mod extents;
mod frame;
#[cfg(feature = "io")]
pub mod io;
mod mesh;
mod point;
mod radius;
mod tube;

pub use centerline::*;
pub use error::*;
pub use extents::*;
pub use frame::*;
pub use mesh::*;
pub use point::*;
pub use radius::*;
pub use tube::*;

/// Area can be calculated from an object.
///
/// Note that area is contextual from the object.
/// For instance, a [`TubeMesh`] would be the _surface area_ of the tube walls.
/// If implementing this trait be sure to be **explicit** about the area being calculated.
pub trait Area {
    /// Calculate the area of an object.
    fn area(&self) -> f64;
}
