use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// External platform a file or integration belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "tool_source", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolSource {
    Slack,
    Google,
    Microsoft,
    Notion,
    Dropbox,
}

impl ToolSource {
    pub const ALL: [ToolSource; 5] = [
        ToolSource::Slack,
        ToolSource::Google,
        ToolSource::Microsoft,
        ToolSource::Notion,
        ToolSource::Dropbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolSource::Slack => "SLACK",
            ToolSource::Google => "GOOGLE",
            ToolSource::Microsoft => "MICROSOFT",
            ToolSource::Notion => "NOTION",
            ToolSource::Dropbox => "DROPBOX",
        }
    }
}

impl fmt::Display for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
