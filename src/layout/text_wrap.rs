//! Approximate text measurement and greedy word wrap.
//!
//! Widths come from a fixed per-character advance
//! ([`APPROX_CHAR_WIDTH`] × font size), not from font metrics.

use crate::writer::APPROX_CHAR_WIDTH;

/// Characters that fit in `max_width` at `font_size`; never less than 1.
pub fn chars_per_line(max_width: f32, font_size: f32) -> usize {
    let char_width = font_size * APPROX_CHAR_WIDTH;
    if !(char_width > 0.0) {
        return 1;
    }
    (max_width / char_width).floor().max(1.0) as usize
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Words are separated by spaces; runs of spaces collapse. A word longer
/// than `max_chars` is split into `max_chars`-sized chunks, and its last
/// chunk may be joined by the following words. Empty or blank input yields
/// no lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();
        let joined_len = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if joined_len <= max_chars {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = joined_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }

        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_chars).peekable();
        current_len = 0;
        while let Some(chunk) = chunks.next() {
            if chunks.peek().is_some() {
                lines.push(chunk.iter().collect());
            } else {
                current = chunk.iter().collect();
                current_len = chunk.len();
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
