use crate::domain::{Playlist, PlaylistItemType, Sandbox, SandboxState};
use crate::utils::error::{KindError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A declared shape that travels as JSON.
pub trait Kind: Serialize + DeserializeOwned {
    const KIND: KindName;

    /// The `name` every kind carries.
    fn name(&self) -> &str;
}

impl Kind for Playlist {
    const KIND: KindName = KindName::Playlist;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Kind for Sandbox {
    const KIND: KindName = KindName::Sandbox;

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum KindName {
    Playlist,
    Sandbox,
}

impl KindName {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindName::Playlist => "playlist",
            KindName::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KindName {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "playlist" => Ok(KindName::Playlist),
            "sandbox" => Ok(KindName::Sandbox),
            other => Err(KindError::InvalidEnumValue {
                field: "kind".to_string(),
                value: other.to_string(),
                expected: "playlist, sandbox".to_string(),
            }),
        }
    }
}

pub fn decode<K: Kind>(bytes: &[u8]) -> Result<K> {
    serde_json::from_slice(bytes).map_err(decode_error)
}

pub fn decode_str<K: Kind>(input: &str) -> Result<K> {
    serde_json::from_str(input).map_err(decode_error)
}

pub fn encode<K: Kind>(kind: &K) -> Result<String> {
    Ok(serde_json::to_string(kind)?)
}

/// Two-space indented JSON.
pub fn encode_pretty<K: Kind>(kind: &K) -> Result<String> {
    Ok(serde_json::to_string_pretty(kind)?)
}

fn missing_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^missing field `([^`]*)`").expect("static pattern"))
}

fn unknown_variant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^unknown variant `([^`]*)`, expected (?:one of )?(.+?)(?: at line \d+ column \d+)?$")
            .expect("static pattern")
    })
}

fn invalid_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^invalid type: (.+?), expected one of (.+?)(?: at line \d+ column \d+)?$")
            .expect("static pattern")
    })
}

/// Which field a closed value list belongs to.
fn closed_set_field(expected: &str) -> Option<&'static str> {
    if expected == SandboxState::expected() {
        Some("state")
    } else if expected == PlaylistItemType::expected() {
        Some("type")
    } else {
        None
    }
}

/// Turns serde's missing-field and unknown-variant failures into the typed
/// errors. A non-string where a closed value is expected (`"state": 5`) is an
/// invalid enum value too; everything else stays a serialization error.
pub fn decode_error(err: serde_json::Error) -> KindError {
    let message = err.to_string();

    if let Some(caps) = missing_field_re().captures(&message) {
        return KindError::missing_field(&caps[1]);
    }

    if let Some(caps) = unknown_variant_re().captures(&message) {
        let expected = caps[2].replace('`', "");
        let field = closed_set_field(&expected).unwrap_or("variant");
        return KindError::InvalidEnumValue {
            field: field.to_string(),
            value: caps[1].to_string(),
            expected,
        };
    }

    if let Some(caps) = invalid_type_re().captures(&message) {
        let expected = caps[2].replace('`', "");
        if let Some(field) = closed_set_field(&expected) {
            // "boolean `true`" -> "true"; "null", "number", "map" stay as they are
            let value = caps[1]
                .split('`')
                .nth(1)
                .unwrap_or(&caps[1])
                .to_string();
            return KindError::InvalidEnumValue {
                field: field.to_string(),
                value,
                expected,
            };
        }
    }

    KindError::SerializationError(err)
}

/// What `check` found in a document that decoded cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub kind: KindName,
    pub name: String,
    /// Playlist items or operator states, whichever the kind carries.
    pub entries: usize,
    pub warnings: Vec<String>,
}

pub fn check(kind: KindName, bytes: &[u8]) -> Result<CheckSummary> {
    match kind {
        KindName::Playlist => {
            let playlist: Playlist = decode(bytes)?;
            let mut warnings = Vec::new();
            if playlist.items.is_none() {
                warnings.push("no items: the playlist cannot rotate".to_string());
            }
            for (index, item) in playlist.items.iter().flatten().enumerate() {
                if item.item_type().is_deprecated() {
                    warnings.push(format!(
                        "items[{}] uses deprecated type {}",
                        index,
                        item.item_type()
                    ));
                }
            }
            Ok(CheckSummary {
                kind,
                name: playlist.name.clone(),
                entries: playlist.len(),
                warnings,
            })
        }
        KindName::Sandbox => {
            let sandbox: Sandbox = decode(bytes)?;
            Ok(CheckSummary {
                kind,
                name: sandbox.name.clone(),
                entries: sandbox.operator_states.as_ref().map(|s| s.len()).unwrap_or(0),
                warnings: Vec::new(),
            })
        }
    }
}
