#![no_main]

use libfuzzer_sys::fuzz_target;
use token::{decode_base36, escape, unescape, BlockReader, BlockWriter};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Every block that reads back must write out to something that reads the same.
    let mut blocks = Vec::new();
    for block in BlockReader::new(text).take(256) {
        match block {
            Ok(block) => blocks.push(block),
            Err(_) => break,
        }
    }
    let mut writer = BlockWriter::new();
    for block in &blocks {
        writer.write_block(&block.id, &block.tokens);
    }
    let rewritten = writer.finish();
    let reread: Vec<_> = BlockReader::new(&rewritten)
        .map(|block| block.map(|block| (block.id, block.tokens)))
        .collect::<Result<_, _>>()
        .expect("rewritten blocks must read back");
    let original: Vec<_> = blocks
        .into_iter()
        .map(|block| (block.id, block.tokens))
        .collect();
    assert_eq!(reread, original);

    let escaped = escape(text);
    assert_eq!(unescape(&escaped), text);
    let _ = decode_base36(text);
});
