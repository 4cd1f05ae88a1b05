//! Convertinator Core - Fundamental types
//!
//! This crate provides the numeric type shared by the unit table and the
//! conversion pipeline:
//! - `Number`: exact decimal numbers at a fixed working precision
//! - `NumberError`: parse and arithmetic failures

mod number;

pub use number::{Number, NumberError};
