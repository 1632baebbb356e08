use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A saved prompt. `name` is what the matcher searches, `content` is what gets inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default, alias = "is_pinned")]
    pub is_pinned: bool,
}

impl Prompt {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            content: content.into(),
            is_pinned: false,
        }
    }

    pub fn save_all(records: &[Prompt], path: &Path) -> Result<()> {
        crate::save_json(records, path)
    }

    pub fn load_all(path: &Path) -> Result<Vec<Prompt>> {
        crate::load_json(path)
    }
}
