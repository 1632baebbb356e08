//! `preset` and `preset.item` lookups against variable presets.
//!
//! Every function here is pure; a term that does not resolve yields an empty list.

use promptline_store::preset::{PresetKind, VariablePreset};

use crate::record::{MatchRecord, MatchType};
use crate::window::WordWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotNotation<'a> {
    pub preset_name: &'a str,
    pub item_query: &'a str,
}

/// Split `term` at its first `.`. A dot in the first or last position does not count.
pub fn parse_dot_notation(term: &str) -> Option<DotNotation<'_>> {
    let dot = term.find('.')?;
    if dot == 0 || dot + 1 == term.len() {
        return None;
    }
    Some(DotNotation {
        preset_name: &term[..dot],
        item_query: &term[dot + 1..],
    })
}

/// Presets whose name contains the window's term, case-insensitively.
///
/// `content` is a preview only; the inserted text is picked later from the preset's items.
pub fn match_presets(window: &WordWindow, presets: &[VariablePreset], limit: usize) -> Vec<MatchRecord> {
    let needle = window.term.to_lowercase();
    presets
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .take(limit)
        .map(|p| {
            let mut record = MatchRecord::spanning(window, MatchType::Preset, &p.id, &p.name, &preview(p));
            record.preset_type = Some(p.preset_type());
            record
        })
        .collect()
}

/// Items of the preset named exactly (ignoring case) by the `preset.` part of the term.
pub fn match_preset_items(
    window: &WordWindow,
    presets: &[VariablePreset],
    limit: usize,
) -> Vec<MatchRecord> {
    let Some(dot) = parse_dot_notation(&window.term) else {
        return Vec::new();
    };
    let preset_name = dot.preset_name.to_lowercase();
    let Some(preset) = presets.iter().find(|p| p.name.to_lowercase() == preset_name) else {
        tracing::trace!("no preset named '{}'", dot.preset_name);
        return Vec::new();
    };
    let query = dot.item_query.to_lowercase();

    let item = |id: &str, name: &str, content: &str| {
        let mut record = MatchRecord::spanning(window, MatchType::PresetItem, id, name, content);
        record.preset_type = Some(preset.preset_type());
        record.parent_preset_id = Some(preset.id.clone());
        record
    };

    match &preset.kind {
        PresetKind::Dictionary { dictionary_items } => dictionary_items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&query))
            .take(limit)
            .map(|i| item(&i.id, &i.name, &i.content))
            .collect(),
        // An option is its own name and content; its id is its position in the list.
        PresetKind::Select { select_options } => select_options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.to_lowercase().contains(&query))
            .take(limit)
            .map(|(idx, opt)| item(&format!("{}:{}", preset.id, idx), opt, opt))
            .collect(),
        PresetKind::Text { .. } => Vec::new(),
    }
}

fn preview(preset: &VariablePreset) -> String {
    match &preset.kind {
        PresetKind::Text { text_content } => text_content.clone(),
        PresetKind::Select { select_options } => select_options.join(", "),
        PresetKind::Dictionary { dictionary_items } => dictionary_items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}
