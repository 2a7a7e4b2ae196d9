#![warn(missing_docs)]

//! Scene adapter for the tessera engine.
//!
//! Wraps an already-loaded model as a flat list of pickable leaf parts,
//! each with local-space triangles and a world transform. The adapter knows
//! nothing about the loader that produced the parts and never mutates them.
//!
//! # Example
//!
//! ```ignore
//! use tessera_scene::{MemoryScene, SceneAdapter};
//!
//! let scene = MemoryScene::from_scene_file(&scene_file);
//! for part in scene.list_parts() {
//!     println!("{}: {} triangles", part.id, part.triangle_count());
//! }
//! ```

pub mod error;
mod part;
mod scene;

pub use error::{Result, SceneError};
pub use part::{cuboid, Part, Triangle};
pub use scene::{MemoryScene, SceneAdapter};

pub use tessera_ir::{ModelRef, PartId};
