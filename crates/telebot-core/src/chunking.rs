//! Outbound message chunking.
//!
//! Replies longer than the transport limit are split at paragraph (blank-line)
//! boundaries, greedily packing whole paragraphs into as few messages as
//! possible. A paragraph is only broken up when it alone exceeds the limit,
//! and then only at line boundaries. A single line longer than the limit is
//! passed through unsplit (transport limits are soft; the default limit leaves
//! headroom).
//!
//! Lengths are counted in characters, not bytes.

const PARAGRAPH_SEP: &str = "\n\n";

/// Split `text` into ordered delivery chunks of at most `limit` characters.
///
/// Returns an empty vector iff `text` has no non-blank content.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if char_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut parts: Vec<String> = Vec::new();
    for block in text.split(PARAGRAPH_SEP) {
        if block.trim().is_empty() {
            continue;
        }

        let block_len = char_len(block);
        if block_len > limit {
            split_block_by_lines(block, limit, &mut parts);
            continue;
        }

        match parts.last_mut() {
            Some(prev) if char_len(prev) + PARAGRAPH_SEP.len() + block_len <= limit => {
                prev.push_str(PARAGRAPH_SEP);
                prev.push_str(block);
            }
            _ => parts.push(block.to_string()),
        }
    }

    parts.retain(|p| !p.trim().is_empty());
    parts
}

/// Greedy line accumulation for a paragraph that does not fit on its own.
fn split_block_by_lines(block: &str, limit: usize, parts: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in block.lines() {
        // Each line is counted with its trailing newline.
        let addition = char_len(line) + 1;
        if current_len + addition > limit {
            flush(&mut current, parts);
            current_len = 0;
        }
        current.push_str(line);
        current.push('\n');
        current_len += addition;
    }
    flush(&mut current, parts);
}

fn flush(current: &mut String, parts: &mut Vec<String>) {
    if !current.trim().is_empty() {
        parts.push(current.trim_end().to_string());
    }
    current.clear();
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(seed: char, len: usize) -> String {
        // Words of 9 chars + space, no newlines.
        let word: String = std::iter::repeat(seed).take(9).collect();
        let mut p = String::new();
        while p.chars().count() + 10 <= len {
            p.push_str(&word);
            p.push(' ');
        }
        p.trim_end().to_string()
    }

    fn non_blank_lines(s: &str) -> Vec<String> {
        s.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    fn assert_preserves_content(input: &str, chunks: &[String]) {
        let rejoined = chunks.join(PARAGRAPH_SEP);
        assert_eq!(non_blank_lines(input), non_blank_lines(&rejoined));
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let text = "Had beef brisket noodles yesterday.\n\nPretty good actually.";
        assert_eq!(split_message(text, 3800), vec![text.to_string()]);
    }

    #[test]
    fn text_exactly_at_limit_is_not_split() {
        let text = "a".repeat(50);
        assert_eq!(split_message(&text, 50), vec![text.clone()]);
    }

    #[test]
    fn blank_text_yields_no_chunks() {
        assert!(split_message("", 10).is_empty());
        assert!(split_message("\n\n   \n\n\t\n", 10).is_empty());
        assert!(split_message(&"\n".repeat(40), 10).is_empty());
    }

    #[test]
    fn large_paragraphs_are_never_split_mid_paragraph() {
        let paragraphs: Vec<String> = ['a', 'b', 'c', 'd', 'e']
            .into_iter()
            .map(|c| paragraph(c, 2000))
            .collect();
        let text = paragraphs.join("\n\n");
        assert!(text.chars().count() > 9_900);

        let chunks = split_message(&text, 3800);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 3800);
        }
        // Every paragraph appears whole inside exactly one chunk.
        for p in &paragraphs {
            assert_eq!(chunks.iter().filter(|c| c.contains(p.as_str())).count(), 1);
        }
        assert_preserves_content(&text, &chunks);
    }

    #[test]
    fn small_paragraphs_are_packed_greedily() {
        let text = ["one one", "two two", "three three", "four four"].join("\n\n");
        // "one one\n\ntwo two" is 16 chars; adding "\n\nthree three" would be 29.
        let chunks = split_message(&text, 20);
        assert_eq!(
            chunks,
            vec![
                "one one\n\ntwo two".to_string(),
                "three three".to_string(),
                "four four".to_string(),
            ]
        );
    }

    #[test]
    fn merge_boundary_counts_the_separator() {
        // 4 + 2 + 4 == 10 fits exactly; one more char does not.
        let chunks = split_message("aaaa\n\nbbbb\n\nc", 10);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb".to_string(), "c".to_string()]);
    }

    #[test]
    fn oversized_paragraph_splits_on_lines() {
        let lines: Vec<String> = (0..10).map(|i| format!("line number {i:02}")).collect();
        let block = lines.join("\n");
        let chunks = split_message(&block, 40);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 40, "chunk too long: {chunk:?}");
            assert!(!chunk.ends_with('\n'));
        }
        assert_preserves_content(&block, &chunks);
    }

    #[test]
    fn single_oversized_line_passes_through() {
        let long_line = "x".repeat(120);
        let text = format!("intro\n{long_line}\noutro");
        let chunks = split_message(&text, 50);

        assert_eq!(
            chunks,
            vec!["intro".to_string(), long_line.clone(), "outro".to_string()]
        );
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50 || *chunk == long_line);
        }
    }

    #[test]
    fn blank_blocks_are_dropped() {
        let text = format!("{}\n\n   \n\n{}", "a".repeat(8), "b".repeat(8));
        assert_eq!(
            split_message(&text, 12),
            vec!["a".repeat(8), "b".repeat(8)]
        );
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // 6 CJK chars = 18 bytes.
        let text = "请发送日志内";
        assert_eq!(split_message(text, 6), vec![text.to_string()]);

        let two = format!("{text}\n\n{text}");
        assert_eq!(split_message(&two, 10), vec![text.to_string(), text.to_string()]);
    }

    #[test]
    fn invariants_hold_across_shapes_and_limits() {
        let mut inputs = Vec::new();
        for n in 1..6 {
            let mut doc = Vec::new();
            for i in 0..n * 3 {
                let lines: Vec<String> = (0..(i % 4) + 1)
                    .map(|j| "w".repeat(3 + (i * 7 + j * 5) % 23))
                    .collect();
                doc.push(lines.join("\n"));
            }
            inputs.push(doc.join("\n\n"));
        }

        for input in &inputs {
            for limit in [8, 16, 30, 64, 200] {
                let chunks = split_message(input, limit);
                assert!(!chunks.is_empty());
                assert_preserves_content(input, &chunks);
                for chunk in &chunks {
                    assert!(!chunk.trim().is_empty());
                    let single_line = !chunk.contains('\n');
                    assert!(
                        chunk.chars().count() <= limit || single_line,
                        "limit {limit} violated by multi-line chunk {chunk:?}"
                    );
                }
            }
        }
    }
}
