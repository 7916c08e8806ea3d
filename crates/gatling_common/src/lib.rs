//! Shared foundational types used across the Gatling logic toolchain.
//!
//! This crate provides interned identifiers and the common result types used
//! by the compiler and simulator crates.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{GatlingResult, InternalError};
