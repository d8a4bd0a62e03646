//! Mesh segmentation engine for fibula-to-mandible surgical reconstruction
//! planning: a closed triangle mesh is sliced by an ordered sequence of
//! cutting planes, the resulting regions are labeled by flood fill, merged
//! into segments between consecutive planes, re-triangulated at the cut
//! boundaries, and partitioned into kept and discarded pieces — with a
//! dedicated assembly step that stitches a transferred fibula piece into the
//! mandible's kept geometry.
//!
//! The pipeline is a sequence of pure stages, each consuming the previous
//! stage's immutable output:
//!
//! `intersection → flood → segment → smooth → cut → assemble`
//!
//! [`planner::CutPlanner`] composes the stages, owns every derived cache,
//! and rebuilds them wholesale whenever the plane set or a plane's
//! placement changes. Rendering, camera control, plane widgets, curve
//! following, and file I/O live outside this crate and talk to it through
//! the planner's accessors and [`event::PlannerEvent`]s.
//!
//! # Features
//! - **f64** (default) / **f32**: scalar precision for `Real`

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod plane;
pub mod registry;
pub mod intersection;
pub mod flood;
pub mod segment;
pub mod smooth;
pub mod cut;
pub mod assemble;
pub mod event;
pub mod config;
pub mod planner;
pub mod shapes;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use cut::Side;
pub use mesh::Mesh;
pub use plane::{Movable, Plane};
pub use planner::CutPlanner;
pub use registry::PlaneId;
