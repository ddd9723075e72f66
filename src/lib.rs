//! A Sell-C-sigma (SCS) sparse particle-in-cell container: partitions a large
//! collection of particles among mesh elements with a chunked, sigma-sorted,
//! vertically sliced layout, and exposes structured parallel iteration plus two
//! layout-preserving mutators (`rebuild` and cross-rank `migrate`).
//!
//! ```
//! use scs_particles::config::ScsConfig;
//! use scs_particles::core::{Column, ColumnSchema, ColumnStore, ScsContainer};
//!
//! struct MassOnly;
//! impl ColumnSchema for MassOnly {
//!     fn empty_columns(&self, len: usize) -> ColumnStore {
//!         ColumnStore::from_columns(vec![Box::new(vec![0.0f32; len]) as Box<dyn Column>])
//!     }
//!     fn num_columns(&self) -> usize {
//!         1
//!     }
//! }
//!
//! let counts = [2u32, 0, 1];
//! let container = ScsContainer::new(
//!     ScsConfig::new(4, 1, 8),
//!     MassOnly,
//!     counts.len(),
//!     counts.iter().sum::<u32>() as usize,
//!     &counts,
//!     None,
//! )
//! .unwrap();
//! assert_eq!(container.num_particles(), 3);
//! ```

pub mod config;
pub mod core;
pub mod debug;
pub mod error;
pub mod migrate;

pub use config::ScsConfig;
pub use core::{Column, ColumnSchema, ColumnStore, GidMap, Layout, ScsContainer};
pub use debug::format_debug;
pub use error::ScsError;
pub use migrate::{local_world, LocalTransport, PeerMessage, Transport};
