pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod process;
pub mod project;
pub mod reconcile;
pub mod scaffold;
pub mod status;
pub mod templates;
pub mod tools;

pub use error::{ClaudioError, ProcessError, Result};

/// Version of the templates compiled into this build.
pub const PACKAGED_VERSION: &str = env!("CARGO_PKG_VERSION");
