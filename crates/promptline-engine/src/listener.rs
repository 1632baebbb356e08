use async_trait::async_trait;
use promptline_matcher::MatchRecord;

/// Callbacks the UI layer registers with the engine.
///
/// They are invoked after the engine has released its internal lock, so a
/// listener may call straight back into the engine.
#[async_trait]
pub trait SuggestionListener: Send + Sync {
    fn on_show(&self) {}

    fn on_hide(&self) {}

    /// `None` means nothing is selected.
    fn on_select_change(&self, _index: Option<usize>) {}

    /// Insert the chosen match. The return value tells the host whether to
    /// also close secondary UI; the engine hides either way.
    async fn on_execute(&self, record: &MatchRecord) -> bool;
}
