//! Point values, their committed transfer datatype and struct-of-arrays point
//! clouds with ASCII PLY export.
//!
//! # Panics
//!
//! Contract breaches, such as a normal count that differs from the point count
//! or inconsistent column lengths at export, are reported with `panic!`. They
//! terminate the process only when the final binary is built with
//! `panic = "abort"`, as this workspace's release profile is. Under unwinding
//! a breach can be caught, e.g. by `JoinHandle::join` when it happens on a
//! spawned thread. A failed commit of the `Point` datatype always aborts.

mod cloud;
pub mod comm;
pub mod datatype;
#[cfg(feature = "cuda")]
pub mod device;
mod error;
mod layout;
mod ply;
mod scalar;

pub use cloud::{NormalsSettable, PointCloud};
pub use error::{CloudError, CommError, DatatypeError};
pub use layout::point_datatype;
pub use ply::write_ply;
pub use point_gpu::Point;
pub use scalar::Scalar;
