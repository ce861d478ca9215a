//! Field-level encryption for PII columns.

pub mod field;

pub use field::FieldCipher;
