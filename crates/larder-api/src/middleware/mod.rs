//! Tower layers and middleware functions.

pub mod cors;
pub mod logging;
