//! Overlapping fixed-size chunking with page provenance.
//!
//! Page texts are concatenated in order and a window of up to `max_size`
//! characters is emitted repeatedly, advancing by `max_size - overlap` each
//! time. The final partial window is still emitted, so no trailing text is
//! ever dropped. A window that spans a page boundary is attributed to the
//! page containing its first character.

use crate::config::ChunkConfig;
use crate::domain::{Page, Segment};
use crate::error::Result;

pub fn split(pages: &[Page], config: &ChunkConfig) -> Result<Vec<Segment>> {
    config.validate()?;

    // Concatenate as chars so the size limits count characters, not bytes.
    let mut chars: Vec<char> = Vec::new();
    let mut starts: Vec<usize> = Vec::with_capacity(pages.len());
    for page in pages {
        starts.push(chars.len());
        chars.extend(page.text.chars());
    }

    let step = config.max_size - config.overlap;
    let mut segments = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = usize::min(start + config.max_size, chars.len());
        let text: String = chars[start..end].iter().collect();
        let page = &pages[page_index_at(&starts, start)];
        segments.push(Segment::new(text, page.source.clone(), page.number));
        if end == chars.len() {
            break;
        }
        start += step;
    }

    Ok(segments)
}

/// Index of the page owning the character at `offset`. Zero-length pages
/// share a start offset with their successor; the later page wins, since it
/// is the one the character belongs to.
fn page_index_at(starts: &[usize], offset: usize) -> usize {
    starts
        .iter()
        .rposition(|&start| start <= offset)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pages_of(texts: &[&str]) -> Vec<Page> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Page::new(*text, "doc.pdf", u32::try_from(i).unwrap()))
            .collect()
    }

    fn config(max_size: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig { max_size, overlap }
    }

    #[test]
    fn two_page_window_scenario() {
        // "AAAA" + "BBBB" with max_size=5, overlap=2: windows step by 3 over
        // the concatenation, so [0:5] and [3:8].
        let segments = split(&pages_of(&["AAAA", "BBBB"]), &config(5, 2)).unwrap();
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["AAAAB", "ABBBB"]);
        assert_eq!(segments[0].page, 0);
        assert_eq!(segments[1].page, 0); // first char at offset 3 is on page 0
    }

    #[test]
    fn overlap_stripped_concatenation_reconstructs_input() {
        let text = "The quick brown fox jumps over the lazy dog, again and again.";
        let segments = split(&pages_of(&[text]), &config(10, 4)).unwrap();

        let mut rebuilt: String = segments[0].text.clone();
        for segment in &segments[1..] {
            rebuilt.extend(segment.text.chars().skip(4));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn consecutive_windows_share_exactly_the_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let overlap = 3;
        let segments = split(&pages_of(&[text]), &config(8, overlap)).unwrap();

        for pair in segments.windows(2) {
            let tail: String = pair[0]
                .text
                .chars()
                .skip(pair[0].len() - overlap)
                .collect();
            let head: String = pair[1].text.chars().take(overlap).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn no_empty_or_oversized_segments() {
        let text = "x".repeat(101);
        let segments = split(&pages_of(&[&text]), &config(25, 10)).unwrap();
        for segment in &segments {
            assert!(!segment.is_empty());
            assert!(segment.len() <= 25);
        }
    }

    #[test]
    fn trailing_text_shorter_than_overlap_is_kept() {
        // 11 chars with step 4: windows at 0, 4, 8; the final window adds
        // only one new character beyond the previous one.
        let segments = split(&pages_of(&["0123456789a"]), &config(6, 2)).unwrap();
        assert_eq!(segments.last().unwrap().text, "89a");
    }

    #[test]
    fn text_shorter_than_max_size_yields_one_segment() {
        let segments = split(&pages_of(&["short"]), &config(1500, 400)).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "short");
    }

    #[test]
    fn page_attribution_follows_first_character() {
        let segments = split(&pages_of(&["aaaa", "bbbb", "cccc"]), &config(4, 0)).unwrap();
        assert_eq!(
            segments.iter().map(|s| s.page).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn empty_pages_do_not_claim_segments() {
        let segments = split(&pages_of(&["aaaa", "", "cccc"]), &config(4, 0)).unwrap();
        assert_eq!(
            segments.iter().map(|s| s.page).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn no_pages_yield_no_segments() {
        let segments = split(&[], &config(10, 2)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn invalid_overlap_is_rejected() {
        assert!(split(&pages_of(&["text"]), &config(5, 5)).is_err());
        assert!(split(&pages_of(&["text"]), &config(5, 9)).is_err());
    }

    #[test]
    fn multibyte_text_is_split_on_character_boundaries() {
        let text = "é".repeat(20);
        let segments = split(&pages_of(&[&text]), &config(8, 2)).unwrap();
        for segment in &segments {
            assert!(segment.len() <= 8);
        }
        let mut rebuilt: String = segments[0].text.clone();
        for segment in &segments[1..] {
            rebuilt.extend(segment.text.chars().skip(2));
        }
        assert_eq!(rebuilt, text);
    }
}
