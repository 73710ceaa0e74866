//! Core types for the Local Library.

pub mod id;

pub use id::*;
