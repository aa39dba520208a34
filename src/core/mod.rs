pub mod error;
pub mod ports;
pub mod snippet;

pub use error::{Error, Result};
