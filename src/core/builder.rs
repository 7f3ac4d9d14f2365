use crate::core::codec;
use crate::domain::{OperatorState, Playlist, PlaylistItem, Sandbox};
use crate::utils::error::{KindError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Assembles a [`Playlist`] field by field.
///
/// ```
/// use kind_shapes::core::builder::PlaylistBuilder;
/// use kind_shapes::domain::PlaylistItem;
///
/// let playlist = PlaylistBuilder::new("Morning")
///     .interval("5m")
///     .item(PlaylistItem::by_uid("abc-123"))
///     .item(PlaylistItem::by_tag("infra"))
///     .xxx("v2")
///     .build()
///     .unwrap();
/// assert_eq!(playlist.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlaylistBuilder {
    name: String,
    interval: Option<String>,
    items: Option<Vec<PlaylistItem>>,
    xxx: Option<String>,
}

impl PlaylistBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Replaces the item list.
    pub fn items(mut self, items: Vec<PlaylistItem>) -> Self {
        self.items = Some(items);
        self
    }

    /// Appends after the items already set.
    pub fn item(mut self, item: PlaylistItem) -> Self {
        self.items.get_or_insert_with(Vec::new).push(item);
        self
    }

    pub fn xxx(mut self, xxx: impl Into<String>) -> Self {
        self.xxx = Some(xxx.into());
        self
    }

    pub fn build(self) -> Result<Playlist> {
        let interval = self.interval.ok_or_else(|| KindError::missing_field("interval"))?;
        let xxx = self.xxx.ok_or_else(|| KindError::missing_field("xxx"))?;
        Ok(Playlist {
            name: self.name,
            interval,
            items: self.items,
            xxx,
        })
    }

    pub fn marshal_json(&self) -> Result<String> {
        codec::encode(&self.clone().build()?)
    }

    pub fn marshal_indent_json(&self) -> Result<String> {
        codec::encode_pretty(&self.clone().build()?)
    }
}

impl From<Playlist> for PlaylistBuilder {
    fn from(playlist: Playlist) -> Self {
        Self {
            name: playlist.name,
            interval: Some(playlist.interval),
            items: playlist.items,
            xxx: Some(playlist.xxx),
        }
    }
}

/// Assembles a [`Sandbox`]. An unset `nestedStruct` is an empty object and
/// an unset `anythingPlz` is `null`.
#[derive(Debug, Clone, Default)]
pub struct SandboxBuilder {
    name: String,
    nested_struct: Option<Value>,
    anything_plz: Option<Value>,
    some_map: Option<BTreeMap<String, Value>>,
    operator_states: Option<BTreeMap<String, OperatorState>>,
}

impl SandboxBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn nested_struct(mut self, nested_struct: Value) -> Self {
        self.nested_struct = Some(nested_struct);
        self
    }

    pub fn anything_plz(mut self, anything_plz: Value) -> Self {
        self.anything_plz = Some(anything_plz);
        self
    }

    pub fn some_map(mut self, some_map: BTreeMap<String, Value>) -> Self {
        self.some_map = Some(some_map);
        self
    }

    pub fn operator_states(mut self, operator_states: BTreeMap<String, OperatorState>) -> Self {
        self.operator_states = Some(operator_states);
        self
    }

    /// Adds or replaces a single operator's entry.
    pub fn operator_state(mut self, operator_id: impl Into<String>, state: OperatorState) -> Self {
        self.operator_states
            .get_or_insert_with(BTreeMap::new)
            .insert(operator_id.into(), state);
        self
    }

    pub fn build(self) -> Result<Sandbox> {
        Ok(Sandbox {
            name: self.name,
            nested_struct: self
                .nested_struct
                .unwrap_or_else(|| Value::Object(Default::default())),
            anything_plz: self.anything_plz.unwrap_or(Value::Null),
            some_map: self.some_map,
            operator_states: self.operator_states,
        })
    }

    pub fn marshal_json(&self) -> Result<String> {
        codec::encode(&self.clone().build()?)
    }

    pub fn marshal_indent_json(&self) -> Result<String> {
        codec::encode_pretty(&self.clone().build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SandboxState;
    use serde_json::json;

    #[test]
    fn test_playlist_builder_requires_xxx() {
        let err = PlaylistBuilder::new("Morning").interval("5m").build().unwrap_err();
        match err {
            KindError::MissingField { field } => assert_eq!(field, "xxx"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_playlist_builder_requires_interval() {
        let err = PlaylistBuilder::new("Morning").xxx("v2").build().unwrap_err();
        assert!(matches!(err, KindError::MissingField { field } if field == "interval"));
    }

    #[test]
    fn test_items_then_item_appends() {
        let playlist = PlaylistBuilder::new("Morning")
            .interval("5m")
            .xxx("v2")
            .items(vec![PlaylistItem::by_uid("a")])
            .item(PlaylistItem::by_uid("b"))
            .build()
            .unwrap();
        let values: Vec<&str> = playlist
            .rotation_items()
            .unwrap()
            .iter()
            .map(|item| item.value())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_marshal_indent_json() {
        let builder = PlaylistBuilder::new("Morning").interval("5m").xxx("v2");
        let json = builder.marshal_indent_json().unwrap();
        assert!(json.contains("\n  \"name\": \"Morning\""));
        assert!(!json.contains("items"));
    }

    #[test]
    fn test_builder_from_playlist_keeps_fields() {
        let playlist = PlaylistBuilder::new("Morning")
            .interval("5m")
            .xxx("v2")
            .build()
            .unwrap();
        let renamed = PlaylistBuilder::from(playlist).name("Evening").build().unwrap();
        assert_eq!(renamed.name, "Evening");
        assert_eq!(renamed.interval, "5m");
    }

    #[test]
    fn test_sandbox_builder_defaults() {
        let sandbox = SandboxBuilder::new("sb").build().unwrap();
        assert_eq!(sandbox.nested_struct, json!({}));
        assert_eq!(sandbox.anything_plz, Value::Null);
        assert!(sandbox.some_map.is_none());
        assert!(sandbox.operator_states.is_none());

        let json = SandboxBuilder::new("sb").marshal_json().unwrap();
        assert_eq!(json, r#"{"name":"sb","nestedStruct":{},"anythingPlz":null}"#);
    }

    #[test]
    fn test_sandbox_builder_operator_state_is_additive() {
        let sandbox = SandboxBuilder::new("sb")
            .operator_state("op-a", OperatorState::new("1", SandboxState::Success))
            .operator_state("op-b", OperatorState::new("1", SandboxState::InProgress))
            .build()
            .unwrap();
        assert_eq!(sandbox.operator_states.unwrap().len(), 2);
    }
}
