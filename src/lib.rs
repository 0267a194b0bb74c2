pub mod changelog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod logging;
pub mod persister;
pub mod ui;
pub mod vcs;

pub use error::{ReleaseError, Result};
