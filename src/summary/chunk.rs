/// Largest slice of article text sent in a single provider call.
pub const MAX_CHUNK_CHARS: usize = 16_000;

/// Split `text` into contiguous slices of at most `max_chars` characters.
///
/// Splits fall on character boundaries only; words and sentences may be cut.
/// Concatenating the result reproduces `text` exactly, and empty input yields
/// no chunks. A `max_chars` of zero is treated as one.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::{MAX_CHUNK_CHARS, chunk_text};

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(chunk_text("hello", 10), vec!["hello"]);
        assert_eq!(chunk_text("hello", 5), vec!["hello"]);
    }

    #[test]
    fn splits_mid_word_at_exact_boundaries() {
        assert_eq!(chunk_text("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn thirty_five_thousand_chars_make_three_chunks() {
        let text = "x".repeat(35_000);
        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);
        let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lens, vec![16_000, 16_000, 3_000]);
    }

    #[test]
    fn chunks_reassemble_and_respect_the_limit() {
        let text = "Grüße aus Köln. ".repeat(97);
        for max in [1usize, 2, 7, 16, 100, 5_000] {
            let chunks = chunk_text(&text, max);
            assert_eq!(chunks.concat(), text, "max={max}");
            assert!(chunks.iter().all(|c| c.chars().count() <= max));
            let len = text.chars().count();
            assert_eq!(chunks.len(), len.div_ceil(max), "max={max}");
        }
    }

    #[test]
    fn zero_limit_behaves_like_one() {
        assert_eq!(chunk_text("ab", 0), vec!["a", "b"]);
    }
}
