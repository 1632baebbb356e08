/// A trailing run of exactly `word_count` whitespace-separated tokens ending at the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordWindow {
    /// The run exactly as typed, inner whitespace included.
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub word_count: usize,
}

impl WordWindow {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The first `caret` characters of `text`. A caret past the end is clamped.
pub fn text_before_caret(text: &str, caret: usize) -> &str {
    match text.char_indices().nth(caret) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Extract the trailing `word_count`-token window of `before`.
///
/// Returns `None` when there are fewer tokens than requested or when the
/// character right before the caret is whitespace.
pub fn word_window(before: &str, word_count: usize) -> Option<WordWindow> {
    if word_count == 0 {
        return None;
    }
    let chars: Vec<char> = before.chars().collect();
    let end = chars.len();
    if end == 0 || chars[end - 1].is_whitespace() {
        return None;
    }

    let mut start = end;
    let mut tokens = 0;
    loop {
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        tokens += 1;
        if tokens == word_count {
            break;
        }
        let mut gap = start;
        while gap > 0 && chars[gap - 1].is_whitespace() {
            gap -= 1;
        }
        if gap == 0 {
            return None;
        }
        start = gap;
    }

    Some(WordWindow {
        term: chars[start..end].iter().collect(),
        start,
        end,
        word_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        let w = word_window("say hello", 1).unwrap();
        assert_eq!(w.term, "hello");
        assert_eq!((w.start, w.end), (4, 9));
    }

    #[test]
    fn test_multi_word_keeps_inner_spacing() {
        let w = word_window("a  hello \t world", 2).unwrap();
        assert_eq!(w.term, "hello \t world");
        assert_eq!(w.start, 3);
        assert_eq!(w.len(), w.term.chars().count());
    }

    #[test]
    fn test_not_enough_tokens() {
        assert!(word_window("hello world", 3).is_none());
        assert!(word_window("   world", 2).is_none());
    }

    #[test]
    fn test_trailing_whitespace_has_no_window() {
        assert!(word_window("hello ", 1).is_none());
        assert!(word_window("   ", 1).is_none());
        assert!(word_window("", 1).is_none());
    }

    #[test]
    fn test_zero_width() {
        assert!(word_window("hello", 0).is_none());
    }

    #[test]
    fn test_whole_text_is_window() {
        let w = word_window("one two three", 3).unwrap();
        assert_eq!(w.start, 0);
        assert_eq!(w.term, "one two three");
    }

    #[test]
    fn test_unicode_offsets_are_chars() {
        let w = word_window("日本語 テキスト", 1).unwrap();
        assert_eq!(w.term, "テキスト");
        assert_eq!((w.start, w.end), (4, 8));
    }

    #[test]
    fn test_text_before_caret() {
        assert_eq!(text_before_caret("héllo world", 5), "héllo");
        assert_eq!(text_before_caret("abc", 10), "abc");
        assert_eq!(text_before_caret("abc", 0), "");
    }
}
