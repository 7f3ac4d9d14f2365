pub mod builder;
pub mod codec;

pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
pub use builder::{PlaylistBuilder, SandboxBuilder};
pub use codec::{check, decode, decode_str, encode, encode_pretty, CheckSummary, Kind, KindName};
