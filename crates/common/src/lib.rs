//! Common types shared by the Telegraph publishing crates

mod secret;
mod error;

pub use secret::Secret;
pub use error::{Error, Result};
