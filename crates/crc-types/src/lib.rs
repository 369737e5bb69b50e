//! Shared types for the CRC profile launcher.
//!
//! This crate provides the profile record loaded from disk, the result items
//! handed to a launcher host, and the host theme. All types are serializable
//! so they can cross the stdio plugin boundary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Deserialize a value that may be null or missing (both become the default)
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Deserialize an ISO-8601 timestamp with or without an offset.
///
/// Timestamps without an offset are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| <D::Error as de::Error>::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Profile field names as written by CRC. Keys in a profile file are matched
/// against these without regard to case.
const PROFILE_FIELDS: &[&str] = &[
    "id",
    "version",
    "name",
    "lastUsedAt",
    "artccId",
    "lastUsedEnvironment",
    "lastUsedPositionId",
    "networkRating",
    "role",
    "controllerInfo",
];

/// A CRC controller profile.
///
/// Profiles are produced by CRC itself; this crate only ever reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque identifier passed to CRC as `--profile=<id>`
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: String,

    #[serde(default)]
    pub version: i32,

    /// Display name, also the search key
    #[serde(default)]
    pub name: Option<String>,

    /// File the profile was loaded from. Set by the loader, never read from the file.
    #[serde(default, skip_deserializing)]
    pub file_path: PathBuf,

    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_used_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artcc_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_position_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_rating: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Nested controller details, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_info: Option<Value>,
}

/// Object fields in document order, so later duplicates win the way a
/// streaming reader would apply them.
struct OrderedFields(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OrderedFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = OrderedFields;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    fields.push((key, value));
                }
                Ok(OrderedFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

impl Profile {
    /// Parse a profile document, matching field names case-insensitively.
    ///
    /// Unknown fields are ignored. `file_path` is left empty for the loader to fill.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, is not an object, or a
    /// known field has the wrong type.
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        let OrderedFields(fields) = serde_json::from_str(content)?;

        let mut normalized = Map::new();
        for (key, value) in fields {
            if let Some(canonical) = PROFILE_FIELDS
                .iter()
                .find(|field| field.eq_ignore_ascii_case(&key))
            {
                normalized.insert((*canonical).to_string(), value);
            }
        }

        serde_json::from_value(Value::Object(normalized))
    }

    /// Name used for display and sorting; empty when the profile has none
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Short summary of where the profile was last used, if known
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match (self.artcc_id.as_deref(), self.last_used_position_id.as_deref()) {
            (Some(artcc), Some(position)) => Some(format!("{artcc} · {position}")),
            (Some(artcc), None) => Some(artcc.to_string()),
            (None, Some(position)) => Some(position.to_string()),
            (None, None) => None,
        }
    }
}

/// Launcher theme as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    System,
    Light,
    #[default]
    Dark,
    HighContrastOne,
    HighContrastTwo,
    HighContrastBlack,
    HighContrastWhite,
}

impl Theme {
    /// Whether icons should use the variant drawn for light backgrounds
    #[must_use]
    pub fn is_light(self) -> bool {
        matches!(self, Theme::Light | Theme::HighContrastWhite)
    }
}

/// A selectable result handed to the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub title: String,

    /// Text the host puts in its search box when the result is highlighted
    pub query_text_display: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    pub icon_path: String,

    /// Profile id to launch when the result is selected
    pub launch_key: String,
}

impl ResultItem {
    /// Build the result shown for a profile
    #[must_use]
    pub fn for_profile(profile: &Profile, icon_path: &str) -> Self {
        let title = profile.display_name().to_string();
        Self {
            query_text_display: title.clone(),
            title,
            subtitle: profile.summary(),
            icon_path: icon_path.to_string(),
            launch_key: profile.id.clone(),
        }
    }
}

/// Context menu entry shown beside a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuItem {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<String>,
}
