pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod shell;
pub mod template;
pub mod ui;
pub mod version;
pub mod workflow;

pub use error::{ReleaseError, Result};
