use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::Database;

const ENABLE_FRONTEND_OPTION: &str = "enable_frontend";
const TRANSLATION_PRIORITY_OPTION: &str = "translation_priority";

/// How custom translations compete with the host engine's translations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Custom translation always wins
    #[default]
    High,
    /// Custom translation only fills in when the engine has none
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Low => "low",
        }
    }

    /// Parse a stored value; anything unrecognised is treated as high.
    pub fn from_option(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            _ => Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub enable_frontend: bool,
    pub translation_priority: Priority,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_frontend: true,
            translation_priority: Priority::High,
        }
    }
}

impl Settings {
    pub async fn load(db: &Database) -> Result<Self> {
        let defaults = Self::default();

        let enable_frontend = db
            .get_option(ENABLE_FRONTEND_OPTION)
            .await?
            .map(|v| v == "1")
            .unwrap_or(defaults.enable_frontend);
        let translation_priority = db
            .get_option(TRANSLATION_PRIORITY_OPTION)
            .await?
            .map(|v| Priority::from_option(&v))
            .unwrap_or(defaults.translation_priority);

        Ok(Self {
            enable_frontend,
            translation_priority,
        })
    }

    pub async fn save(&self, db: &Database) -> Result<()> {
        db.set_option(
            ENABLE_FRONTEND_OPTION,
            if self.enable_frontend { "1" } else { "0" },
        )
        .await?;
        db.set_option(TRANSLATION_PRIORITY_OPTION, self.translation_priority.as_str())
            .await?;
        Ok(())
    }
}
