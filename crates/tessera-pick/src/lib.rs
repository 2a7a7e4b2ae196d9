#![warn(missing_docs)]

//! Ray-based part picking for the tessera engine.
//!
//! Turns a pointer position plus camera state into a world-space ray and
//! resolves the nearest part it hits.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray representation with origin and direction
//! - [`Camera`] - Perspective camera that unprojects pointer positions
//! - [`intersect_triangle`] - Möller–Trumbore ray/triangle test
//! - [`PickIndex`] - World-space triangles and bounds per part, built once per model
//!
//! # Example
//!
//! ```ignore
//! use tessera_pick::{Camera, PickIndex};
//!
//! let index = PickIndex::build(scene.list_parts());
//! let ray = camera.ray_from_pixel(412.0, 300.0, 1280.0, 720.0)?;
//! match index.pick(&ray, 1e-9) {
//!     Some(hit) => println!("picked {} at {:.2} m", hit.part_id, hit.hit_distance),
//!     None => println!("deselect"),
//! }
//! ```

mod camera;
pub mod error;
mod picker;
mod ray;

pub use camera::Camera;
pub use error::{PickError, Result};
pub use picker::{pick, PickIndex, PickResult, PickStats};
pub use ray::{intersect_triangle, Ray};
