//! Property tests for boundary chunking.

use docchat_rag::chunking::{BoundaryChunker, Chunker};
use docchat_rag::document::{Chunk, Document};
use proptest::prelude::*;

fn start_of(chunk: &Chunk) -> usize {
    chunk.metadata["start_index"].parse().unwrap()
}

/// Words separated by single spaces or newlines, so no window can be blank.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(("[a-zé]{1,8}", prop_oneof![Just(" "), Just("\n")]), 0..120)
        .prop_map(|words| {
            let mut text: String = words.iter().map(|(w, sep)| format!("{w}{sep}")).collect();
            text.push_str("end");
            text
        })
}

fn arb_params() -> impl Strategy<Value = (usize, usize)> {
    (4usize..160).prop_flat_map(|size| (Just(size), 0..size))
}

/// **Chunk bounds and coverage**
/// *For any* text and valid parameters, every chunk is the slice of the
/// document at its `start_index`, is at most `chunk_size` chars, consecutive
/// chunks overlap by exactly `chunk_overlap`, and together they cover the text.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_tile_the_document(text in arb_text(), (size, overlap) in arb_params()) {
            let doc = Document::new("doc", text.clone());
            let chunks = BoundaryChunker::new(size, overlap).unwrap().chunk(&doc);
            let chars: Vec<char> = text.chars().collect();

            prop_assert!(!chunks.is_empty());
            prop_assert_eq!(start_of(&chunks[0]), 0);

            for (i, chunk) in chunks.iter().enumerate() {
                let start = start_of(chunk);
                let len = chunk.text.chars().count();
                prop_assert!(len <= size);
                prop_assert_eq!(chunk.index, i);
                let expected: String = chars[start..start + len].iter().collect();
                prop_assert_eq!(&chunk.text, &expected);
            }

            for pair in chunks.windows(2) {
                let prev_end = start_of(&pair[0]) + pair[0].text.chars().count();
                prop_assert_eq!(start_of(&pair[1]) + overlap, prev_end);
            }

            let last = chunks.last().unwrap();
            prop_assert_eq!(start_of(last) + last.text.chars().count(), chars.len());
        }

        #[test]
        fn unbroken_text_advances_by_size_minus_overlap(
            len in 1usize..600,
            (size, overlap) in arb_params(),
        ) {
            let doc = Document::new("doc", "x".repeat(len));
            let chunks = BoundaryChunker::new(size, overlap).unwrap().chunk(&doc);
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(start_of(chunk), i * (size - overlap));
            }
        }
    }
}
