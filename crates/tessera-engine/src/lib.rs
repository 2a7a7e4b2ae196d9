#![warn(missing_docs)]

//! Material assignment engine for building models.
//!
//! Given a loaded model as a flat list of parts, the engine tracks which
//! catalog material the user has applied to each part, keeps a linear
//! undo/redo history of those assignments, estimates each part's surface
//! area and prices the result.
//!
//! # Architecture
//!
//! - [`OverrideStore`] - Part → material bindings as immutable snapshots with history
//! - [`AreaCache`] - Per-part surface area, memoized until the model changes
//! - [`compute_total`] - Per-part cost and grand total from a mapping and a catalog
//! - [`to_record`] / [`from_record`] - Conversion to and from persisted [`ProjectRecord`]s
//! - [`Session`] - Everything above wired to one loaded model, for a UI to drive
//!
//! # Example
//!
//! ```ignore
//! use tessera_engine::{EngineConfig, MemoryCatalog, Session};
//! use tessera_scene::MemoryScene;
//!
//! let catalog = MemoryCatalog::from_toml(&std::fs::read_to_string("catalog.toml")?)?;
//! let mut session = Session::new(EngineConfig::default(), catalog);
//! session.load(MemoryScene::from_scene_file(&scene_file));
//!
//! if let Some(hit) = session.pick(&ray)? {
//!     session.apply(&hit.part_id, &"oak".into())?;
//! }
//! println!("total: {}", session.price()?.total);
//! ```

pub mod area;
pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod overrides;
pub mod pricing;
pub mod serializer;
mod session;

pub use area::{estimate_area, AreaCache};
pub use catalog::{Catalog, MemoryCatalog};
pub use config::{AreaMethod, EngineConfig, RecordPolicy};
pub use error::{EngineError, Result};
pub use history::History;
pub use overrides::{OverrideMapping, OverrideStore, Snapshot};
pub use pricing::{compute_total, format_price, PriceLine, PriceResult, SkippedEntry};
pub use serializer::{from_record, overwrite, to_record, RecordMeta, RestoredOverrides};
pub use session::{LoadTicket, Session};

pub use tessera_ir::{MaterialId, MaterialSpec, PartId, ProjectRecord, Selection};
