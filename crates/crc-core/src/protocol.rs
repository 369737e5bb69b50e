//! Line-delimited JSON protocol spoken by stdio launcher plugins.
//!
//! The host writes one request object per line to the plugin's stdin and
//! reads one response object per line from its stdout.

use crate::ResultItem;
use serde::{Deserialize, Serialize};

/// Request read from stdin
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub step: Step,

    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub selected: Option<SelectedItem>,

    /// Secondary action id; this plugin only has the default action
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Initial,
    Search,
    Action,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectedItem {
    pub id: String,
}

/// Response written to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    Results {
        items: Vec<ResponseItem>,

        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },

    Execute {
        close: bool,
    },

    Error {
        message: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl Response {
    #[must_use]
    pub fn results(results: &[ResultItem]) -> Self {
        Response::Results {
            items: results.iter().map(ResponseItem::from).collect(),
            placeholder: Some("Search CRC profiles...".to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
            details: None,
        }
    }
}

/// A result as the host renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    /// Launch key, echoed back in `selected.id`
    pub id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub icon: String,
    pub icon_type: String,
    pub verb: String,
}

impl From<&ResultItem> for ResponseItem {
    fn from(result: &ResultItem) -> Self {
        Self {
            id: result.launch_key.clone(),
            name: result.title.clone(),
            description: result.subtitle.clone(),
            icon: result.icon_path.clone(),
            icon_type: "file".to_string(),
            verb: "Launch".to_string(),
        }
    }
}
