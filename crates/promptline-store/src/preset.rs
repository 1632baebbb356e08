use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Type-specific payload of a preset, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PresetKind {
    Text {
        #[serde(rename = "textContent", alias = "text_content", default)]
        text_content: String,
    },
    Select {
        #[serde(rename = "selectOptions", alias = "select_options", default)]
        select_options: Vec<String>,
    },
    Dictionary {
        #[serde(rename = "dictionaryItems", alias = "dictionary_items", default)]
        dictionary_items: Vec<DictionaryItem>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetType {
    Text,
    Select,
    Dictionary,
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetType::Text => write!(f, "text"),
            PresetType::Select => write!(f, "select"),
            PresetType::Dictionary => write!(f, "dictionary"),
        }
    }
}

/// A named variable preset, reachable by name or by `name.item` dot notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablePreset {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: PresetKind,
}

impl VariablePreset {
    pub fn text(name: impl Into<String>, text_content: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            PresetKind::Text {
                text_content: text_content.into(),
            },
        )
    }

    pub fn select(name: impl Into<String>, options: Vec<String>) -> Self {
        Self::with_kind(
            name,
            PresetKind::Select {
                select_options: options,
            },
        )
    }

    pub fn dictionary(name: impl Into<String>, items: Vec<DictionaryItem>) -> Self {
        Self::with_kind(
            name,
            PresetKind::Dictionary {
                dictionary_items: items,
            },
        )
    }

    fn with_kind(name: impl Into<String>, kind: PresetKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
        }
    }

    pub fn preset_type(&self) -> PresetType {
        match self.kind {
            PresetKind::Text { .. } => PresetType::Text,
            PresetKind::Select { .. } => PresetType::Select,
            PresetKind::Dictionary { .. } => PresetType::Dictionary,
        }
    }

    pub fn save_all(records: &[VariablePreset], path: &Path) -> Result<()> {
        crate::save_json(records, path)
    }

    pub fn load_all(path: &Path) -> Result<Vec<VariablePreset>> {
        crate::load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_dictionary() {
        let json = r#"{
            "id": "p1",
            "name": "role",
            "type": "dictionary",
            "dictionaryItems": [{"id": "i1", "name": "Customer", "content": "You are a customer."}]
        }"#;
        let preset: VariablePreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.preset_type(), PresetType::Dictionary);
        match preset.kind {
            PresetKind::Dictionary { dictionary_items } => {
                assert_eq!(dictionary_items.len(), 1);
                assert_eq!(dictionary_items[0].name, "Customer");
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_select_and_text() {
        let select: VariablePreset = serde_json::from_str(
            r#"{"id":"s","name":"tone","type":"select","selectOptions":["formal","casual"]}"#,
        )
        .unwrap();
        assert_eq!(select.preset_type(), PresetType::Select);

        let text: VariablePreset = serde_json::from_str(
            r#"{"id":"t","name":"sig","type":"text","textContent":"Regards"}"#,
        )
        .unwrap();
        assert_eq!(
            text.kind,
            PresetKind::Text {
                text_content: "Regards".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<VariablePreset, _> =
            serde_json::from_str(r#"{"id":"x","name":"x","type":"number"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_preset_type_display() {
        assert_eq!(PresetType::Dictionary.to_string(), "dictionary");
        assert_eq!(PresetType::Select.to_string(), "select");
    }
}
