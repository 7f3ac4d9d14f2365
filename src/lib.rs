pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, manifest::Manifest};
pub use core::{PlaylistBuilder, SandboxBuilder};
pub use domain::{OperatorState, Playlist, PlaylistItem, PlaylistItemType, Sandbox, SandboxState};
pub use utils::error::{KindError, Result};
