//! Greedy word wrapping for renderer comments and documentation bodies.
//!
//! Whitespace runs between words are preserved verbatim (newlines and tabs
//! become spaces), so deliberate spacing like a double space after a period
//! survives rewrapping. Words longer than the available width are split
//! hard; output lines therefore never exceed their width.

/// Wrap `text` greedily into lines of at most `first_width` characters for
/// the first line and `rest_width` for the rest. Leading whitespace is
/// dropped. Widths are clamped to at least one character.
pub(crate) fn wrap(text: &str, first_width: usize, rest_width: usize) -> Vec<String> {
    let first_width = first_width.max(1);
    let rest_width = rest_width.max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let width = |lines: &Vec<String>| {
        if lines.is_empty() {
            first_width
        } else {
            rest_width
        }
    };

    for (gap, word) in tokens(text) {
        if current.is_empty() {
            let mut rest = word;
            while rest.chars().count() > width(&lines) {
                let w = width(&lines);
                let head: String = rest.chars().take(w).collect();
                rest = rest.chars().skip(w).collect();
                lines.push(head);
            }
            current = rest;
        } else if current.chars().count() + gap.chars().count() + word.chars().count()
            <= width(&lines)
        {
            current.push_str(&gap);
            current.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut current));
            let mut rest = word;
            while rest.chars().count() > width(&lines) {
                let w = width(&lines);
                let head: String = rest.chars().take(w).collect();
                rest = rest.chars().skip(w).collect();
                lines.push(head);
            }
            current = rest;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split into (gap, word) pairs. The gap is the whitespace run preceding
/// the word with newlines and tabs mapped to spaces; the first gap is empty.
fn tokens(text: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut gap = String::new();
    let mut word = String::new();
    let mut seen_word = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                out.push((std::mem::take(&mut gap), std::mem::take(&mut word)));
                seen_word = true;
            }
            if seen_word {
                gap.push(' ');
            }
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        out.push((gap, word));
    }
    out
}

/// Strip the common leading-space run of every line after the first.
/// Caller-authored documentation keeps its first line flush against the
/// opening quote, so that line is excluded from the measurement.
pub(crate) fn dedent_tail(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 {
            out.push_str(line);
        } else if line.trim().is_empty() {
            // whitespace-only lines collapse to empty
        } else {
            out.push_str(&line[indent.min(line.len())..]);
        }
    }
    out
}
