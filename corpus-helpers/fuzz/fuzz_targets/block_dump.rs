#![no_main]

use std::path::Path;

use corpus_helpers::source::block::BlockSource;
use corpus_helpers_fuzz::{expected_entries, render_dump, sanitize, Block, LANGUAGE};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|blocks: Vec<Block>| {
    let blocks = sanitize(blocks);
    let content = render_dump(&blocks);
    let path = format!("msbt_{LANGUAGE}_lf.txt");

    let dump = BlockSource.parse(Path::new(&path), &content).unwrap();

    assert_eq!(dump.language, LANGUAGE);
    assert_eq!(dump.entries, expected_entries(&blocks));
});
