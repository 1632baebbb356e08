use std::cmp::Ordering;
use std::collections::HashSet;

use promptline_common::config::EngineOptions;
use promptline_store::preset::VariablePreset;
use promptline_store::prompt::Prompt;

use crate::preset::{match_preset_items, match_presets, parse_dot_notation};
use crate::record::{MatchRecord, MatchType};
use crate::window::{text_before_caret, word_window, WordWindow};

/// Wider windows win: a two-word hit on "hello world" outranks a one-word hit on "world".
///
/// Equal widths compare equal so that a stable sort keeps discovery order.
pub fn compare_priority(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    b.word_count.cmp(&a.word_count)
}

/// Sort by [`compare_priority`], drop repeated `(type, id)` pairs keeping the
/// first, and cap at `limit`.
pub fn rank(mut candidates: Vec<MatchRecord>, limit: usize) -> Vec<MatchRecord> {
    candidates.sort_by(compare_priority);
    let mut seen: HashSet<(MatchType, String)> = HashSet::new();
    candidates.retain(|m| seen.insert((m.match_type, m.id.clone())));
    candidates.truncate(limit);
    candidates
}

/// Prompts whose name contains the window's term, case-insensitively.
pub fn match_prompts(window: &WordWindow, prompts: &[Prompt]) -> Vec<MatchRecord> {
    let needle = window.term.to_lowercase();
    prompts
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .map(|p| MatchRecord::for_prompt(p, window))
        .collect()
}

/// Runs the word-window matcher for every width from `max_word_count` down to 1.
#[derive(Debug, Clone)]
pub struct MatchStrategy {
    options: EngineOptions,
}

impl MatchStrategy {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options: options.sanitized(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Every window at least `min_search_length` characters long, widest first.
    pub fn windows(&self, before: &str) -> Vec<WordWindow> {
        (1..=self.options.max_word_count)
            .rev()
            .filter_map(|width| word_window(before, width))
            .filter(|w| w.len() >= self.options.min_search_length)
            .collect()
    }

    /// Prompt matches for the text left of `caret`.
    pub fn find_matches(&self, text: &str, caret: usize, prompts: &[Prompt]) -> Vec<MatchRecord> {
        self.collect(text, caret, prompts, None)
    }

    /// Prompt matches plus, when `match_presets` is on, preset and preset-item matches.
    pub fn find_all(
        &self,
        text: &str,
        caret: usize,
        prompts: &[Prompt],
        presets: &[VariablePreset],
    ) -> Vec<MatchRecord> {
        let presets = self.options.match_presets.then_some(presets);
        self.collect(text, caret, prompts, presets)
    }

    fn collect(
        &self,
        text: &str,
        caret: usize,
        prompts: &[Prompt],
        presets: Option<&[VariablePreset]>,
    ) -> Vec<MatchRecord> {
        let before = text_before_caret(text, caret);
        let newline_count = before.matches('\n').count();
        let limit = self.options.max_matches;

        let mut candidates = Vec::new();
        for window in self.windows(before) {
            let found = match_prompts(&window, prompts);
            tracing::trace!(
                "window '{}' ({} words): {} prompt hits",
                window.term,
                window.word_count,
                found.len()
            );
            candidates.extend(found);

            if let Some(presets) = presets {
                if parse_dot_notation(&window.term).is_some() {
                    candidates.extend(match_preset_items(&window, presets, limit));
                } else {
                    candidates.extend(match_presets(&window, presets, limit));
                }
            }
        }

        let mut ranked = rank(candidates, limit);
        for m in &mut ranked {
            m.newline_count = newline_count;
        }
        ranked
    }
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, word_count: usize) -> MatchRecord {
        MatchRecord {
            id: id.to_string(),
            name: id.to_string(),
            content: String::new(),
            is_pinned: false,
            match_start: 0,
            match_end: 0,
            newline_count: 0,
            search_term: String::new(),
            match_type: MatchType::Prompt,
            preset_type: None,
            parent_preset_id: None,
            word_count,
        }
    }

    #[test]
    fn test_compare_priority_wider_first() {
        assert_eq!(compare_priority(&record("a", 2), &record("b", 1)), Ordering::Less);
        assert_eq!(compare_priority(&record("a", 1), &record("b", 3)), Ordering::Greater);
        assert_eq!(compare_priority(&record("a", 2), &record("b", 2)), Ordering::Equal);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(
            vec![record("x", 1), record("y", 1), record("w", 2), record("z", 1)],
            10,
        );
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["w", "x", "y", "z"]);
    }

    #[test]
    fn test_rank_dedup_keeps_widest() {
        let ranked = rank(vec![record("a", 1), record("a", 3), record("b", 2)], 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[0].word_count, 3);
    }

    #[test]
    fn test_rank_same_id_different_type_kept() {
        let mut preset = record("a", 1);
        preset.match_type = MatchType::Preset;
        let ranked = rank(vec![record("a", 1), preset], 10);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_truncates() {
        let ranked = rank((0..10).map(|i| record(&i.to_string(), 1)).collect(), 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_windows_skip_short_terms() {
        let s = MatchStrategy::default();
        let terms: Vec<String> = s.windows("go to hi").into_iter().map(|w| w.term).collect();
        assert_eq!(terms, vec!["go to hi".to_string(), "to hi".to_string()]);
    }
}
