#![no_main]

use corpus_helpers::repair::repair_number_branches;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|text: &str| {
    let repaired = repair_number_branches(text);
    if !text.contains("[VAR 1101(") {
        assert_eq!(repaired, text);
    }
    assert!(repaired.len() <= text.len());
});
