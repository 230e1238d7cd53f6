//! Word and grapheme boundary tests on normalized text.

use unicode_segmentation::GraphemeCursor;
use unicode_xid::UnicodeXID;

/// Word-constituent characters. `XID_Continue` covers letters, digits,
/// connector punctuation and combining marks, so a mark never ends a word.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_xid_continue()
}

pub fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    if offset == 0 || offset >= text.len() {
        return true;
    }
    if !text.is_char_boundary(offset) {
        return false;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(true)
}

/// `start..end` does not split a word on either side.
///
/// A side is a boundary when one of the two characters meeting there is not
/// word-constituent, or when it is the start/end of the text.
pub fn is_entire_word(text: &str, start: usize, end: usize) -> bool {
    let inner = &text[start..end];
    let (Some(first), Some(last)) = (inner.chars().next(), inner.chars().next_back()) else {
        return false;
    };

    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let start_ok = !(before.is_some_and(is_word_char) && is_word_char(first));
    let end_ok = !(after.is_some_and(is_word_char) && is_word_char(last));
    start_ok && end_ok
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/text/word.rs"]
mod tests;
