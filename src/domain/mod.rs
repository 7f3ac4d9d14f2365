// Domain layer: the kinds themselves and the storage port. No dependencies beyond serde.

mod closed_set;
pub mod playlist;
pub mod ports;
pub mod sandbox;

pub use playlist::{Playlist, PlaylistItem, PlaylistItemType};
pub use sandbox::{OperatorState, Sandbox, SandboxState};
