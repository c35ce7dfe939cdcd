//! cvardump SDK - Source RCON Wire Type Definitions
//!
//! This crate contains the constant tables of the Source engine RCON
//! protocol. It has no dependencies and compiles quickly, allowing parallel
//! compilation of dependent crates.
//!
//! # Modules
//!
//! - [`packet`] - Packet type codes and their direction-dependent meaning
//! - [`frame`] - Frame layout and size limits

pub mod frame;
pub mod packet;

pub use frame::*;
pub use packet::*;
