//! Utility modules.

pub mod dump;

pub use dump::dump;
