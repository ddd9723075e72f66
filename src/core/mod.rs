//! Core Sell-C-sigma data structures.
//!
//! - `column_store`: the heterogeneous column store (HCS) backing particle payloads.
//! - `sigma_sort`: pre-sorts elements into sigma-bands by particle count.
//! - `layout`: builds the chunk/slice tables from sorted counts.
//! - `gid_map`: the element-id <-> global-id bidirectional map.
//! - `container`: the SCS container itself, tying the pieces together.

pub mod column_store;
pub mod container;
pub mod gid_map;
pub mod layout;
pub mod sigma_sort;

pub use column_store::{Column, ColumnSchema, ColumnStore};
pub use container::ScsContainer;
pub use gid_map::GidMap;
pub use layout::Layout;
