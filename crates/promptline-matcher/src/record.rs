use promptline_store::preset::PresetType;
use promptline_store::prompt::Prompt;
use serde::{Deserialize, Serialize};

use crate::window::WordWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    Prompt,
    Preset,
    PresetItem,
}

/// One suggestion handed to the UI.
///
/// `content` is what gets inserted on execution, which for preset items is the
/// resolved item rather than anything stored on a prompt. The span
/// `match_start..match_end` always ends at the caret and has the same length
/// as `search_term`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub is_pinned: bool,
    pub match_start: usize,
    pub match_end: usize,
    /// Line number of the caret; the text injector works per line.
    pub newline_count: usize,
    pub search_term: String,
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_type: Option<PresetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_preset_id: Option<String>,
    /// Width of the word window that produced this match.
    pub word_count: usize,
}

impl MatchRecord {
    pub fn for_prompt(prompt: &Prompt, window: &WordWindow) -> Self {
        Self::spanning(window, MatchType::Prompt, &prompt.id, &prompt.name, &prompt.content)
            .pinned(prompt.is_pinned)
    }

    pub(crate) fn spanning(
        window: &WordWindow,
        match_type: MatchType,
        id: &str,
        name: &str,
        content: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            is_pinned: false,
            match_start: window.start,
            match_end: window.end,
            newline_count: 0,
            search_term: window.term.clone(),
            match_type,
            preset_type: None,
            parent_preset_id: None,
            word_count: window.word_count,
        }
    }

    fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }
}
