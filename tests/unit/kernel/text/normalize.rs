use super::*;

fn folded() -> NormalizePolicy {
    NormalizePolicy::new(false, false)
}

#[test]
fn test_fold_case_and_diacritics() {
    let n = normalize("Café", folded());
    assert_eq!(n.as_str(), "cafe");
    assert_eq!(n.original_range(0, 4), Some((0, 5)));
    assert_eq!(n.original_range(3, 4), Some((3, 5)));
}

#[test]
fn test_decomposed_input_maps_to_base_and_mark() {
    let n = normalize("cafe\u{301}", folded());
    assert_eq!(n.as_str(), "cafe");
    assert_eq!(n.original_range(3, 4), Some((3, 6)));
}

#[test]
fn test_keep_diacritics_decomposes() {
    let n = normalize("Café", NormalizePolicy::new(false, true));
    assert_eq!(n.as_str(), "cafe\u{301}");
    assert_eq!(n.original_range(0, n.len()), Some((0, 5)));
}

#[test]
fn test_case_folding_is_independent() {
    let n = normalize("Café", NormalizePolicy::new(true, false));
    assert_eq!(n.as_str(), "Cafe");
}

#[test]
fn test_whitespace_runs_collapse() {
    let n = normalize("a  \n b", folded());
    assert_eq!(n.as_str(), "a b");
    assert_eq!(n.original_range(1, 2), Some((1, 5)));
    assert_eq!(n.original_range(0, 3), Some((0, 6)));
}

#[test]
fn test_lowercase_expansion_keeps_origin() {
    let n = normalize("\u{130}", NormalizePolicy::new(false, true));
    assert_eq!(n.as_str(), "i\u{307}");

    let n = normalize("\u{130}", folded());
    assert_eq!(n.as_str(), "i");
    assert_eq!(n.original_range(0, 1), Some((0, 2)));
}

#[test]
fn test_original_range_rejects_split_characters() {
    let n = normalize("\u{e9}", NormalizePolicy::new(true, true));
    assert_eq!(n.as_str(), "e\u{301}");
    assert_eq!(n.original_range(0, 2), None);
    assert_eq!(n.original_range(1, 1), None);
    assert_eq!(n.original_range(0, 9), None);
}

#[test]
fn test_normalize_query_trims() {
    assert_eq!(normalize_query("  Hello \t World ", folded()), "hello world");
    assert_eq!(normalize_query("   ", folded()), "");
    assert_eq!(normalize_query("\u{301}", folded()), "");
}

#[test]
fn test_policy_slots_are_distinct() {
    let mut slots: Vec<usize> = [(true, true), (true, false), (false, true), (false, false)]
        .into_iter()
        .map(|(case, marks)| NormalizePolicy::new(case, marks).slot())
        .collect();
    slots.sort_unstable();
    slots.dedup();
    assert_eq!(slots.len(), NormalizePolicy::VARIANTS);
    assert!(slots.iter().all(|s| *s < NormalizePolicy::VARIANTS));
}
