//! Configuration for the Sell-C-sigma layout.

pub mod layout_params;

pub use layout_params::ScsConfig;
