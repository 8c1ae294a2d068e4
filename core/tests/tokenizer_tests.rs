use search_core::tokenizer::{tokenize, STOP_WORDS};

#[test]
fn it_lowercases_and_keeps_order() {
    let words = tokenize("Ancient EGYPT was ruled by Pharaohs; Egypt endured.");
    assert_eq!(words, vec!["ancient", "egypt", "was", "ruled", "by", "pharaohs", "egypt", "endured"]);
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog IS in THE list OF words FOR a test");
    for stop in STOP_WORDS {
        assert!(!words.contains(&stop.to_string()), "stop word {stop} leaked");
    }
    assert!(words.contains(&"quick".to_string()));
    assert!(words.contains(&"list".to_string()));
}

#[test]
fn it_drops_short_and_non_alphabetic_fragments() {
    let words = tokenize("x y2k 1998 ramesses_ii Ramesses II b4 z");
    assert_eq!(words, vec!["ramesses", "ii"]);
}

#[test]
fn it_splits_on_punctuation_runs() {
    let words = tokenize("valley--of...the///kings!!!queens");
    assert_eq!(words, vec!["valley", "kings", "queens"]);
}

#[test]
fn it_is_deterministic() {
    let text = "Dynasty after dynasty, the pharaohs built temples at Karnak.";
    assert_eq!(tokenize(text), tokenize(text));
}

#[test]
fn it_handles_empty_input() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \n\t ... ").is_empty());
}
