#![no_main]

use std::path::Path;

use corpus_helpers::source::block::BlockSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|content: &str| {
    let _ = BlockSource.parse(Path::new("msbt_usa_lf.txt"), content);
});
