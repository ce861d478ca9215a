//! # larder-core
//!
//! Core crate for Larder. Contains configuration schemas, the traits that
//! other crates implement (cache backends, outbound notifiers), and the
//! unified error taxonomy.
//!
//! This crate has **no** internal dependencies on other Larder crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
