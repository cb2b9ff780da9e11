//! Application-level configuration.
//!
//! - [`TurnParams`] - turn loop control (round limit, confirmation mode)

pub mod turn_params;

pub use turn_params::TurnParams;
