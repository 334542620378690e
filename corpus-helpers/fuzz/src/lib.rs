use arbitrary::Arbitrary;
use corpus_helpers::source::block::HEADER_PREFIX;
use corpus_helpers::source::DumpEntry;

/// Language code used for generated dumps.
pub const LANGUAGE: &str = "usa";

/// One `Text File : ...` block of a generated MSBT dump.
#[derive(Debug, Arbitrary)]
pub struct Block {
    pub group: String,
    pub entries: Vec<(String, String)>,
}

fn is_single_line(text: &str) -> bool {
    !text.contains('\n')
}

fn is_valid_key(key: &str) -> bool {
    is_single_line(key) && !key.contains('\t') && !key.starts_with(HEADER_PREFIX)
}

/// Drops the parts of `blocks` that cannot be written as a dump.
pub fn sanitize(blocks: Vec<Block>) -> Vec<Block> {
    blocks
        .into_iter()
        .filter(|block| is_single_line(&block.group))
        .map(|block| Block {
            group: block.group,
            entries: block
                .entries
                .into_iter()
                .filter(|(key, text)| is_valid_key(key) && is_single_line(text))
                .collect(),
        })
        .collect()
}

/// Renders `blocks` in the MSBT text export format.
pub fn render_dump(blocks: &[Block]) -> String {
    let mut content = String::new();
    for block in blocks {
        content.push_str(&format!("{HEADER_PREFIX}{}_{LANGUAGE}.msbt\n", block.group));
        for (key, text) in &block.entries {
            content.push_str(&format!("{key}\t{text}\n"));
        }
    }
    content
}

/// The entries a reader should find in `blocks`.
pub fn expected_entries(blocks: &[Block]) -> Vec<DumpEntry> {
    blocks
        .iter()
        .flat_map(|block| {
            block.entries.iter().map(|(key, text)| DumpEntry {
                group: block.group.clone(),
                key: key.clone(),
                text: text.clone(),
            })
        })
        .collect()
}
