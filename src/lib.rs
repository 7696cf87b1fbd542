//! promptcraft - Secret prompt composition and validation
//!
//! A creator builds a reusable prompt template ("secret prompt") out of a
//! base instruction, categories of selectable tags and example images, then
//! publishes it once it passes the publish gate.
//!
//! # Architecture
//!
//! Drafts are edited in memory and persisted as whole records:
//! - Every mutation goes through the `DraftEditor`, which enforces caps,
//!   field limits and dense display orders
//! - Saving reads the full collection, upserts by id and writes it back
//! - Only one save may be in flight at a time; entering `published`
//!   requires the draft to pass the publish gate at that moment
//!
//! # Modules
//!
//! - `domain`: Data model (Draft, Category, Tag, ImageRef, OrderedList)
//! - `core`: Behaviour (DraftEditor, assemble, PublishRules, SaveCoordinator)
//! - `store`: Persistence (DraftStore, JsonFileStore, MemoryStore)
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Create a draft
//! promptcraft new --name "Cuddly Monster"
//!
//! # Add a category with two tags
//! promptcraft category add cuddly-monster Fur -t "Fluffy=soft fluffy fur" -t Scaly
//!
//! # Preview the assembled prompt, then publish
//! promptcraft preview cuddly-monster
//! promptcraft publish cuddly-monster
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod store;

// Re-export main types at crate root for convenience
pub use core::{assemble, DraftEditor, EditError, PublishRules, SaveCoordinator};
pub use domain::{Category, Draft, ImageRef, Status, Tag};
pub use store::{DraftStore, JsonFileStore, MemoryStore, StoreError};
