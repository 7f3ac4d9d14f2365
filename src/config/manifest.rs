use crate::core::codec::{self, Kind, KindName};
use crate::domain::{Playlist, Sandbox};
use crate::utils::error::{KindError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_unique, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Playlists and sandboxes to render, read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub output: OutputConfig,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub sandboxes: Vec<Sandbox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub pretty: Option<bool>,
}

/// One kind serialized and ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedKind {
    pub kind: KindName,
    pub name: String,
    pub file_name: String,
    pub json: String,
}

impl Manifest {
    /// 從 TOML 檔案載入 manifest
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the manifest after replacing `${VAR}` with the environment
    /// value. Kinds are decoded through the JSON codec so a bad enum value or
    /// a missing field reports the same error as a JSON document would.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed = Self::substitute_env_vars(content);
        let table: toml::Table = toml::from_str(&processed)?;
        let value = toml_to_json("", toml::Value::Table(table))?;
        serde_json::from_value(value).map_err(codec::decode_error)
    }

    /// 替換環境變數 (例如 ${DASHBOARD_UID})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("environment variable {} is not set", var_name);
                format!("${{{}}}", var_name)
            })
        })
        .into_owned()
    }

    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }

    pub fn kind_count(&self) -> usize {
        self.playlists.len() + self.sandboxes.len()
    }

    /// 依序輸出所有 playlist 與 sandbox
    pub fn render(&self) -> Result<Vec<RenderedKind>> {
        let mut rendered = Vec::with_capacity(self.kind_count());
        for playlist in &self.playlists {
            rendered.push(self.render_one(playlist)?);
        }
        for sandbox in &self.sandboxes {
            rendered.push(self.render_one(sandbox)?);
        }
        Ok(rendered)
    }

    fn render_one<K: Kind>(&self, kind: &K) -> Result<RenderedKind> {
        let json = if self.pretty() {
            codec::encode_pretty(kind)?
        } else {
            codec::encode(kind)?
        };
        tracing::debug!("rendered {} '{}' ({} bytes)", K::KIND, kind.name(), json.len());
        Ok(RenderedKind {
            kind: K::KIND,
            name: kind.name().to_string(),
            file_name: file_name(K::KIND, kind.name()),
            json,
        })
    }
}

/// TOML values as JSON. Datetimes become their RFC 3339 text; floats JSON
/// cannot hold (`nan`, `inf`) are rejected.
fn toml_to_json(path: &str, value: toml::Value) -> Result<serde_json::Value> {
    use serde_json::Value as Json;

    Ok(match value {
        toml::Value::String(s) => Json::String(s),
        toml::Value::Integer(i) => Json::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Json::Number)
            .ok_or_else(|| KindError::InvalidConfigValueError {
                field: path.to_string(),
                value: f.to_string(),
                reason: "Float has no JSON representation".to_string(),
            })?,
        toml::Value::Boolean(b) => Json::Bool(b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| toml_to_json(&format!("{}[{}]", path, i), item))
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => {
            let mut map = serde_json::Map::with_capacity(table.len());
            for (key, item) in table {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                map.insert(key, toml_to_json(&child, item)?);
            }
            Json::Object(map)
        }
    })
}

/// `<kind>-<slug>.json`, the slug being the lowercased name with runs of
/// anything but ASCII letters and digits turned into a single `-`.
pub fn file_name(kind: KindName, name: &str) -> String {
    format!("{}-{}.json", kind, slug(name))
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

impl Validate for Manifest {
    fn validate(&self) -> Result<()> {
        // 驗證輸出路徑
        validate_path("output.path", &self.output.path)?;

        if self.kind_count() == 0 {
            return Err(KindError::ValidationError {
                message: "manifest declares no playlists and no sandboxes".to_string(),
            });
        }

        for playlist in &self.playlists {
            validate_non_empty_string("playlists.name", &slug(&playlist.name))?;
        }
        for sandbox in &self.sandboxes {
            validate_non_empty_string("sandboxes.name", &slug(&sandbox.name))?;
        }

        // Names become file names, so two kinds must not collapse onto one file.
        let file_names: Vec<String> = self
            .playlists
            .iter()
            .map(|p| file_name(KindName::Playlist, &p.name))
            .chain(
                self.sandboxes
                    .iter()
                    .map(|s| file_name(KindName::Sandbox, &s.name)),
            )
            .collect();
        validate_unique("name", file_names.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlaylistItemType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[output]
path = "./out"
pretty = false

[[playlists]]
name = "Morning Rotation"
interval = "5m"
xxx = "v2"

[[playlists.items]]
type = "dashboard_by_uid"
value = "abc-123"

[[playlists.items]]
type = "dashboard_by_tag"
value = "infra"

[[sandboxes]]
name = "sb"
anythingPlz = [1, "two"]
nestedStruct = { foo = "bar" }

[sandboxes.operatorStates.op-a]
lastEvaluation = "12"
state = "in_progress"
"#;

    #[test]
    fn test_parse_basic_manifest() {
        let manifest = Manifest::from_toml_str(BASIC).unwrap();
        assert_eq!(manifest.output.path, "./out");
        assert!(!manifest.pretty());
        assert_eq!(manifest.kind_count(), 2);

        let items = manifest.playlists[0].rotation_items().unwrap();
        assert_eq!(items[0].item_type(), PlaylistItemType::DashboardByUid);
        assert_eq!(items[1].value(), "infra");

        let sandbox = &manifest.sandboxes[0];
        assert_eq!(sandbox.nested_struct, serde_json::json!({"foo": "bar"}));
        assert!(sandbox.operator_state("op-a").is_some());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_render_file_names() {
        let manifest = Manifest::from_toml_str(BASIC).unwrap();
        let rendered = manifest.render().unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].file_name, "playlist-morning-rotation.json");
        assert_eq!(rendered[1].file_name, "sandbox-sb.json");
        assert!(!rendered[0].json.contains('\n'));
    }

    #[test]
    fn test_datetime_in_open_value_is_text() {
        let content = r#"
[output]
path = "./out"

[[sandboxes]]
name = "sb"
anythingPlz = 1979-05-27T07:32:00Z
nestedStruct = { at = 1979-05-27, values = [1.5, 2] }
"#;
        let manifest = Manifest::from_toml_str(content).unwrap();
        let sandbox = &manifest.sandboxes[0];
        assert_eq!(sandbox.anything_plz, serde_json::json!("1979-05-27T07:32:00Z"));
        assert_eq!(sandbox.nested_struct["at"], serde_json::json!("1979-05-27"));
        assert_eq!(sandbox.nested_struct["values"], serde_json::json!([1.5, 2]));

        let rendered = manifest.render().unwrap();
        assert!(!rendered[0].json.contains("toml_private"));
    }

    #[test]
    fn test_nan_in_open_value_is_rejected() {
        let content = r#"
[output]
path = "./out"

[[sandboxes]]
name = "sb"
anythingPlz = nan
nestedStruct = {}
"#;
        match Manifest::from_toml_str(content).unwrap_err() {
            KindError::InvalidConfigValueError { field, .. } => {
                assert_eq!(field, "sandboxes[0].anythingPlz")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Morning Rotation"), "morning-rotation");
        assert_eq!(slug("  NOC / wall #2 "), "noc-wall-2");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn test_bad_state_in_manifest_is_typed() {
        let content = r#"
[output]
path = "./out"

[[sandboxes]]
name = "sb"
anythingPlz = 1
nestedStruct = {}

[sandboxes.operatorStates.op-a]
lastEvaluation = "1"
state = "paused"
"#;
        match Manifest::from_toml_str(content).unwrap_err() {
            KindError::InvalidEnumValue { field, value, .. } => {
                assert_eq!(field, "state");
                assert_eq!(value, "paused");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_manifest_fails_validation() {
        let manifest = Manifest::from_toml_str("[output]\npath = \"./out\"\n").unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(KindError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_manifest_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let manifest = Manifest::from_file(temp_file.path()).unwrap();
        assert_eq!(manifest.playlists[0].name, "Morning Rotation");
    }
}
