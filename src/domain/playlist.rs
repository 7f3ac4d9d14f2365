use crate::utils::error::{KindError, Result};
use crate::utils::validation::validate_required_field;
use crate::domain::closed_set::{self, ClosedSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, ordered list of dashboard references shown one after the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Name of the playlist.
    pub name: String,
    /// Time between switching views. Kept as written: no duration format is
    /// defined for it, so it is never parsed here.
    pub interval: String,
    /// The ordered list of items the playlist iterates over.
    ///
    /// Optional on the wire although a playlist without items cannot rotate;
    /// see [`Playlist::rotation_items`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PlaylistItem>>,
    /// Placeholder required by the schema version, carries no meaning.
    pub xxx: String,
}

impl Playlist {
    /// Items in rotation order, for consumers that actually rotate.
    pub fn rotation_items(&self) -> Result<&[PlaylistItem]> {
        validate_required_field("items", &self.items).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type of a playlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistItemType {
    /// The value is the dashboard UID.
    DashboardByUid,
    /// The value is an internal numerical identifier. Not portable between
    /// instances; superseded by `dashboard_by_uid`.
    DashboardById,
    /// The value is a tag; every dashboard carrying it joins the playlist.
    DashboardByTag,
}

impl PlaylistItemType {
    pub const ALL: [PlaylistItemType; 3] = [
        PlaylistItemType::DashboardByUid,
        PlaylistItemType::DashboardById,
        PlaylistItemType::DashboardByTag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistItemType::DashboardByUid => "dashboard_by_uid",
            PlaylistItemType::DashboardById => "dashboard_by_id",
            PlaylistItemType::DashboardByTag => "dashboard_by_tag",
        }
    }

    pub fn is_deprecated(&self) -> bool {
        match self {
            PlaylistItemType::DashboardById => true,
            PlaylistItemType::DashboardByUid | PlaylistItemType::DashboardByTag => false,
        }
    }

    /// Whether the value means the same thing on another instance.
    pub fn is_portable(&self) -> bool {
        match self {
            PlaylistItemType::DashboardByUid | PlaylistItemType::DashboardByTag => true,
            PlaylistItemType::DashboardById => false,
        }
    }

    pub(crate) fn expected() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ClosedSet for PlaylistItemType {
    const VARIANTS: &'static [&'static str] = &["dashboard_by_uid", "dashboard_by_id", "dashboard_by_tag"];

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn as_str(&self) -> &'static str {
        PlaylistItemType::as_str(self)
    }
}

impl<'de> Deserialize<'de> for PlaylistItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        closed_set::deserialize(deserializer)
    }
}

impl fmt::Display for PlaylistItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaylistItemType {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| KindError::InvalidEnumValue {
                field: "type".to_string(),
                value: s.to_string(),
                expected: Self::expected(),
            })
    }
}

/// One dashboard reference. `value` is only meaningful together with `type`,
/// so the two are set and read as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    r#type: PlaylistItemType,
    value: String,
    /// Unused, scheduled for removal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl PlaylistItem {
    pub fn new(item_type: PlaylistItemType, value: impl Into<String>) -> Self {
        Self {
            r#type: item_type,
            value: value.into(),
            title: None,
        }
    }

    pub fn by_uid(uid: impl Into<String>) -> Self {
        Self::new(PlaylistItemType::DashboardByUid, uid)
    }

    /// Numeric ids are stored as text, exactly as received.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new(PlaylistItemType::DashboardById, id)
    }

    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self::new(PlaylistItemType::DashboardByTag, tag)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn item_type(&self) -> PlaylistItemType {
        self.r#type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The `(type, value)` pair.
    pub fn reference(&self) -> (PlaylistItemType, &str) {
        (self.r#type, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_wire_strings() {
        for item_type in PlaylistItemType::ALL {
            let json = serde_json::to_string(&item_type).unwrap();
            assert_eq!(json, format!("\"{}\"", item_type.as_str()));
            assert_eq!(item_type.as_str().parse::<PlaylistItemType>().unwrap(), item_type);
        }
    }

    #[test]
    fn test_item_type_rejects_other_casing() {
        let err = "Dashboard_By_Uid".parse::<PlaylistItemType>().unwrap_err();
        assert!(matches!(err, KindError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_only_id_items_are_deprecated() {
        assert!(PlaylistItemType::DashboardById.is_deprecated());
        assert!(!PlaylistItemType::DashboardById.is_portable());
        assert!(PlaylistItemType::DashboardByTag.is_portable());
        assert!(!PlaylistItemType::DashboardByUid.is_deprecated());
    }

    #[test]
    fn test_rotation_requires_items() {
        let playlist = Playlist {
            name: "Morning".to_string(),
            interval: "5m".to_string(),
            items: None,
            xxx: "v2".to_string(),
        };
        assert!(playlist.is_empty());
        match playlist.rotation_items() {
            Err(KindError::MissingField { field }) => assert_eq!(field, "items"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_item_serializes_type_key() {
        let item = PlaylistItem::by_tag("infra");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "dashboard_by_tag", "value": "infra"})
        );
    }
}
