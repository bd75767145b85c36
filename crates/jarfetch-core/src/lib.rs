pub mod config;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod run;

pub use error::{Error, ErrorCategory, Result};
