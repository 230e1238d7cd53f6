use super::*;

#[test]
fn test_entire_word() {
    assert!(is_entire_word("the cat sat", 4, 7));
    assert!(is_entire_word("cat.", 0, 3));
    assert!(!is_entire_word("category", 0, 3));
    assert!(!is_entire_word("concat", 3, 6));
}

#[test]
fn test_combining_mark_is_not_a_boundary() {
    let text = "cafe\u{301} au lait";
    assert!(!is_entire_word(text, 0, 4));
    assert!(is_entire_word(text, 0, 6));
}

#[test]
fn test_punctuation_edges() {
    assert!(is_entire_word("a-cat", 1, 5));
    assert!(is_entire_word("(cat)", 1, 4));
    assert!(!is_entire_word("", 0, 0));
}

#[test]
fn test_grapheme_boundary() {
    let text = "e\u{301}x";
    assert!(is_grapheme_boundary(text, 0));
    assert!(!is_grapheme_boundary(text, 1));
    assert!(!is_grapheme_boundary(text, 2));
    assert!(is_grapheme_boundary(text, 3));
    assert!(is_grapheme_boundary(text, text.len()));
}

#[test]
fn test_word_chars() {
    assert!(is_word_char('a'));
    assert!(is_word_char('7'));
    assert!(is_word_char('_'));
    assert!(is_word_char('\u{301}'));
    assert!(!is_word_char(' '));
    assert!(!is_word_char('-'));
}
