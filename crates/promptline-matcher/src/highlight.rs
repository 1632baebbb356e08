/// Split `name` around the first case-insensitive occurrence of `term`.
///
/// Returns `(segment, highlighted)` pairs in order. Without an occurrence the
/// whole name comes back unhighlighted.
pub fn highlight_segments(name: &str, term: &str) -> Vec<(String, bool)> {
    let name_chars: Vec<char> = name.chars().collect();
    let term_chars: Vec<char> = term.chars().collect();

    let Some(start) = find_ignore_case(&name_chars, &term_chars) else {
        return vec![(name.to_string(), false)];
    };
    let end = start + term_chars.len();

    let mut segments = Vec::with_capacity(3);
    if start > 0 {
        segments.push((name_chars[..start].iter().collect(), false));
    }
    segments.push((name_chars[start..end].iter().collect(), true));
    if end < name_chars.len() {
        segments.push((name_chars[end..].iter().collect(), false));
    }
    segments
}

fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    })
}
