//! The suggestion engine: debounced analysis of typed text plus the
//! hidden/visible/selected state the popup renders.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use promptline_common::config::EngineOptions;
use promptline_matcher::{MatchRecord, MatchStrategy};
use promptline_store::preset::VariablePreset;
use promptline_store::prompt::Prompt;

use crate::host::{CaretReader, HostElement};
use crate::listener::SuggestionListener;
use crate::position::{popup_position, PopupPosition};
use crate::scheduler::{ScheduledTask, Scheduler};

/// What the listener needs to hear about, collected under the lock and
/// delivered after it is released.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Notice {
    Show,
    Hide,
    SelectChange(Option<usize>),
}

struct PendingAnalysis {
    generation: u64,
    task: ScheduledTask,
}

#[derive(Default)]
struct EngineState {
    element: Option<Arc<dyn HostElement>>,
    listener: Option<Arc<dyn SuggestionListener>>,
    prompts: Vec<Prompt>,
    presets: Vec<VariablePreset>,
    matches: Vec<MatchRecord>,
    selected: Option<usize>,
    visible: bool,
    pending: Option<PendingAnalysis>,
    generation: u64,
    destroyed: bool,
}

impl EngineState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::trace!("cancelled analysis #{}", pending.generation);
            pending.task.cancel();
        }
    }

    /// Hiding an already hidden engine is silent.
    fn hide(&mut self) -> Vec<Notice> {
        self.matches.clear();
        self.selected = None;
        if self.visible {
            self.visible = false;
            vec![Notice::Hide]
        } else {
            Vec::new()
        }
    }

    fn show(&mut self, matches: Vec<MatchRecord>) -> Vec<Notice> {
        self.matches = matches;
        self.selected = None;
        self.visible = true;
        vec![Notice::Show, Notice::SelectChange(None)]
    }
}

struct Shared {
    strategy: MatchStrategy,
    reader: Arc<dyn CaretReader>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<EngineState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn analyze(&self, generation: u64, content: &str) {
        let (listener, notices) = {
            let mut state = self.lock();
            if state.destroyed {
                return;
            }
            match &state.pending {
                Some(pending) if pending.generation == generation => {}
                _ => {
                    tracing::trace!("dropping stale analysis #{}", generation);
                    return;
                }
            }
            state.pending = None;

            let notices = match state.element.clone() {
                None => state.hide(),
                Some(element) => {
                    let caret = self.reader.caret_position(element.as_ref());
                    let mut matches = self.strategy.find_all(
                        content,
                        caret.offset,
                        &state.prompts,
                        &state.presets,
                    );
                    for m in &mut matches {
                        m.newline_count = caret.newline_count;
                    }
                    tracing::debug!(
                        "analysis #{}: caret {} line {}, {} matches",
                        generation,
                        caret.offset,
                        caret.newline_count,
                        matches.len()
                    );
                    if matches.is_empty() {
                        state.hide()
                    } else {
                        state.show(matches)
                    }
                }
            };
            (state.listener.clone(), notices)
        };
        dispatch(listener, notices);
    }
}

fn dispatch(listener: Option<Arc<dyn SuggestionListener>>, notices: Vec<Notice>) {
    let Some(listener) = listener else {
        return;
    };
    for notice in notices {
        match notice {
            Notice::Show => listener.on_show(),
            Notice::Hide => listener.on_hide(),
            Notice::SelectChange(index) => listener.on_select_change(index),
        }
    }
}

/// One engine per mounted UI. Cloning yields another handle to the same engine.
///
/// Analysis runs `debounce_ms` after the last [`SuggestionEngine::handle_content_change`];
/// until then [`SuggestionEngine::matches`] still reflects older text.
#[derive(Clone)]
pub struct SuggestionEngine {
    shared: Arc<Shared>,
}

impl SuggestionEngine {
    pub fn new(
        options: EngineOptions,
        reader: Arc<dyn CaretReader>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                strategy: MatchStrategy::new(options),
                reader,
                scheduler,
                state: Mutex::new(EngineState::default()),
            }),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        self.shared.strategy.options()
    }

    pub fn set_listener(&self, listener: Arc<dyn SuggestionListener>) {
        let mut state = self.shared.lock();
        if !state.destroyed {
            state.listener = Some(listener);
        }
    }

    /// Swap the element being watched. `None` makes the next analysis hide.
    pub fn set_element(&self, element: Option<Arc<dyn HostElement>>) {
        let mut state = self.shared.lock();
        if !state.destroyed {
            state.element = element;
        }
    }

    pub fn set_prompts(&self, prompts: Vec<Prompt>) {
        let mut state = self.shared.lock();
        if !state.destroyed {
            state.prompts = prompts;
        }
    }

    pub fn set_presets(&self, presets: Vec<VariablePreset>) {
        let mut state = self.shared.lock();
        if !state.destroyed {
            state.presets = presets;
        }
    }

    /// Restart the debounce with `content` as the text to analyze.
    pub fn handle_content_change(&self, content: impl Into<String>) {
        let content = content.into();
        let mut state = self.shared.lock();
        if state.destroyed {
            return;
        }
        state.cancel_pending();
        state.generation += 1;
        let generation = state.generation;

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let task = self.shared.scheduler.schedule(
            self.options().debounce(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.analyze(generation, &content);
                }
            }),
        );
        state.pending = Some(PendingAnalysis { generation, task });
    }

    pub fn select_next(&self) {
        self.navigate(|selected, len| match selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    pub fn select_previous(&self) {
        self.navigate(|selected, _| match selected {
            None => 0,
            Some(i) => i.saturating_sub(1),
        });
    }

    fn navigate(&self, step: impl FnOnce(Option<usize>, usize) -> usize) {
        let (listener, index) = {
            let mut state = self.shared.lock();
            if state.destroyed || state.matches.is_empty() {
                return;
            }
            let index = step(state.selected, state.matches.len());
            state.selected = Some(index);
            (state.listener.clone(), index)
        };
        dispatch(listener, vec![Notice::SelectChange(Some(index))]);
    }

    /// Select `index` directly. An out-of-range index is a caller bug: it is
    /// logged and the selection is left alone.
    pub fn select_at(&self, index: usize) -> bool {
        let listener = {
            let mut state = self.shared.lock();
            if state.destroyed {
                return false;
            }
            if index >= state.matches.len() {
                tracing::warn!(
                    "select_at({}) out of range for {} matches",
                    index,
                    state.matches.len()
                );
                return false;
            }
            state.selected = Some(index);
            state.listener.clone()
        };
        dispatch(listener, vec![Notice::SelectChange(Some(index))]);
        true
    }

    /// Clear the selection without touching visibility.
    pub fn select_reset(&self) {
        let listener = {
            let mut state = self.shared.lock();
            if state.destroyed {
                return;
            }
            state.selected = None;
            state.listener.clone()
        };
        dispatch(listener, vec![Notice::SelectChange(None)]);
    }

    /// Hand the selected match to the listener, then hide.
    ///
    /// Returns `None` without side effects when nothing valid is selected,
    /// otherwise the listener's answer (`false` when no listener is set).
    pub async fn execute(&self) -> Option<bool> {
        let (listener, record) = {
            let state = self.shared.lock();
            if state.destroyed {
                return None;
            }
            let index = state.selected?;
            let record = state.matches.get(index)?.clone();
            (state.listener.clone(), record)
        };

        tracing::debug!("executing '{}' ({:?})", record.name, record.match_type);
        let handled = match listener {
            Some(listener) => listener.on_execute(&record).await,
            None => false,
        };
        self.force_hide();
        Some(handled)
    }

    /// Hide now and drop any analysis still waiting to run.
    pub fn force_hide(&self) {
        let (listener, notices) = {
            let mut state = self.shared.lock();
            if state.destroyed {
                return;
            }
            state.cancel_pending();
            let notices = state.hide();
            (state.listener.clone(), notices)
        };
        dispatch(listener, notices);
    }

    /// Tear down. The final hide is still reported; afterwards every call is a
    /// silent no-op.
    pub fn destroy(&self) {
        let (listener, notices) = {
            let mut state = self.shared.lock();
            if state.destroyed {
                return;
            }
            state.cancel_pending();
            let notices = state.hide();
            let listener = state.listener.take();
            state.element = None;
            state.prompts.clear();
            state.presets.clear();
            state.destroyed = true;
            (listener, notices)
        };
        tracing::debug!("suggestion engine destroyed");
        dispatch(listener, notices);
    }

    pub fn matches(&self) -> Vec<MatchRecord> {
        self.shared.lock().matches.clone()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.shared.lock().selected
    }

    pub fn selected_match(&self) -> Option<MatchRecord> {
        let state = self.shared.lock();
        state.selected.and_then(|i| state.matches.get(i).cloned())
    }

    pub fn is_visible(&self) -> bool {
        self.shared.lock().visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.lock().destroyed
    }

    /// True while an analysis is scheduled but has not run.
    pub fn has_pending_analysis(&self) -> bool {
        self.shared.lock().pending.is_some()
    }

    /// Popup placement for the current element, if there is one.
    pub fn popup_position(&self) -> Option<PopupPosition> {
        let element = self.shared.lock().element.clone()?;
        Some(popup_position(element.as_ref(), self.shared.reader.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> MatchRecord {
        MatchRecord {
            id: id.to_string(),
            name: id.to_string(),
            content: String::new(),
            is_pinned: false,
            match_start: 0,
            match_end: 0,
            newline_count: 0,
            search_term: String::new(),
            match_type: promptline_matcher::MatchType::Prompt,
            preset_type: None,
            parent_preset_id: None,
            word_count: 1,
        }
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut state = EngineState::default();
        assert!(state.hide().is_empty());
        state.show(vec![record("a")]);
        assert_eq!(state.hide(), vec![Notice::Hide]);
        assert!(state.hide().is_empty());
    }

    #[test]
    fn test_show_resets_selection() {
        let mut state = EngineState::default();
        state.show(vec![record("a"), record("b")]);
        state.selected = Some(1);
        let notices = state.show(vec![record("c")]);
        assert_eq!(notices, vec![Notice::Show, Notice::SelectChange(None)]);
        assert_eq!(state.selected, None);
        assert_eq!(state.matches.len(), 1);
    }
}
