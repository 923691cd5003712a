//! Word extraction around the cursor

use serde::{Deserialize, Serialize};

/// Character range of the word under the cursor on a single line.
///
/// `start` and `end` are character (not byte) columns, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordSpan {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl WordSpan {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find the maximal alphanumeric/underscore run touching `(line, column)`.
///
/// Both directions are scanned, so a cursor in the middle of `cust|omer`
/// yields `customer`. Positions past the end of a line are clamped to it and
/// a line past the end of the buffer yields an empty word.
pub fn word_at(text: &str, line: usize, column: usize) -> (String, WordSpan) {
    let Some(line_str) = text.split('\n').nth(line) else {
        return (
            String::new(),
            WordSpan {
                line,
                start: column,
                end: column,
            },
        );
    };
    let chars: Vec<char> = line_str.trim_end_matches('\r').chars().collect();
    let cursor = column.min(chars.len());

    let mut start = cursor;
    while start > 0 && chars.get(start - 1).is_some_and(|c| is_word_char(*c)) {
        start -= 1;
    }

    let mut end = cursor;
    while end < chars.len() && chars.get(end).is_some_and(|c| is_word_char(*c)) {
        end += 1;
    }

    (chars[start..end].iter().collect(), WordSpan { line, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_before_cursor() {
        let (word, span) = word_at("SELECT na", 0, 9);
        assert_eq!(word, "na");
        assert_eq!(span, WordSpan { line: 0, start: 7, end: 9 });
    }

    #[test]
    fn test_word_spans_both_sides() {
        let (word, span) = word_at("SELECT * FROM customer_orders", 0, 18);
        assert_eq!(word, "customer_orders");
        assert_eq!(span.start, 14);
        assert_eq!(span.end, 29);
    }

    #[test]
    fn test_cursor_after_space_is_empty() {
        let (word, span) = word_at("SELECT ", 0, 7);
        assert_eq!(word, "");
        assert!(span.is_empty());
        assert_eq!(span.start, 7);
    }

    #[test]
    fn test_dot_breaks_words() {
        let (word, span) = word_at("users.em", 0, 8);
        assert_eq!(word, "em");
        assert_eq!(span.start, 6);
    }

    #[test]
    fn test_multiline_and_crlf() {
        let text = "SELECT id\r\nFROM ord\r\nWHERE 1";
        let (word, span) = word_at(text, 1, 8);
        assert_eq!(word, "ord");
        assert_eq!(span, WordSpan { line: 1, start: 5, end: 8 });
    }

    #[test]
    fn test_unicode_columns_are_characters() {
        let (word, span) = word_at("SELECT café", 0, 11);
        assert_eq!(word, "café");
        assert_eq!(span.start, 7);
    }

    #[test]
    fn test_out_of_range_positions() {
        let (word, span) = word_at("SELECT id", 0, 99);
        assert_eq!(word, "id");
        assert_eq!(span.end, 9);

        let (word, span) = word_at("SELECT id", 5, 3);
        assert_eq!(word, "");
        assert_eq!(span, WordSpan { line: 5, start: 3, end: 3 });
    }
}
