//! Tokenization (§4.1): turns a raw log line into an ordered word sequence.

use std::collections::BTreeSet;

/// One imported, tokenized log line.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub id: u64,
    pub time_stamp: Vec<u8>,
    pub body: Vec<u8>,
    pub words: Vec<Vec<u8>>,
}

impl LogLine {
    pub fn word_at(&self, depth: usize) -> Option<&[u8]> {
        self.words.get(depth).map(|w| w.as_slice())
    }
}

/// Strips bytes outside RFC 3164 printable range `[0x20, 0x7E] ∪ {0x09}` and trims surrounding
/// whitespace.
fn sanitize(raw: &[u8]) -> Vec<u8> {
    let filtered: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|&b| (0x20..=0x7E).contains(&b) || b == 0x09)
        .collect();
    let start = filtered
        .iter()
        .position(|&b| !b" \t\n\r".contains(&b))
        .unwrap_or(filtered.len());
    let end = filtered
        .iter()
        .rposition(|&b| !b" \t\n\r".contains(&b))
        .map(|p| p + 1)
        .unwrap_or(start);
    filtered[start..end].to_vec()
}

/// Splits `line` on `delimiters`. Runs of consecutive delimiter bytes are coalesced into a
/// single token (§4.2 step 1); concatenating the returned words reproduces `line` exactly.
fn split_words(line: &[u8], delimiters: &BTreeSet<u8>) -> Vec<Vec<u8>> {
    let mut words = Vec::new();
    let mut current = Vec::new();
    let mut delim_run: Option<Vec<u8>> = None;
    for &b in line {
        if delimiters.contains(&b) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            match delim_run.as_mut() {
                Some(run) => run.push(b),
                None => delim_run = Some(vec![b]),
            }
        } else {
            if let Some(run) = delim_run.take() {
                words.push(run);
            }
            current.push(b);
        }
    }
    if let Some(run) = delim_run {
        words.push(run);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Reads, sanitizes, peels the timestamp from, and tokenizes every non-empty line of `raw`.
///
/// Returns a warning count of dropped empty lines alongside the parsed lines, matching the
/// source driver's "do not process empty log lines" policy (§7: not an error).
pub fn tokenize_lines(
    raw: &str,
    time_stamp_length: i64,
    delimiters: &BTreeSet<u8>,
) -> (Vec<LogLine>, u64) {
    let mut lines = Vec::new();
    let mut dropped = 0u64;
    let mut next_id = 0u64;

    for raw_line in raw.lines() {
        if raw_line.is_empty() {
            dropped += 1;
            continue;
        }
        let cleaned = sanitize(raw_line.as_bytes());
        if cleaned.is_empty() {
            dropped += 1;
            continue;
        }

        let (time_stamp, body) = if time_stamp_length >= 0 {
            let split = (time_stamp_length as usize).min(cleaned.len());
            let body_start = (split + 1).min(cleaned.len());
            (cleaned[..split].to_vec(), cleaned[body_start..].to_vec())
        } else {
            (Vec::new(), cleaned.clone())
        };

        let words = split_words(&body, delimiters);
        let id = next_id;
        next_id += 1;
        lines.push(LogLine {
            id,
            time_stamp,
            body,
            words,
        });
    }

    (lines, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delims() -> BTreeSet<u8> {
        [b' ', b':'].into_iter().collect()
    }

    #[test]
    fn coalesces_consecutive_delimiters_into_one_token() {
        let words = split_words(b"a: b", &delims());
        assert_eq!(words, vec![b"a".to_vec(), b": ".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn concatenation_round_trips() {
        let line = b"foo bar: baz";
        let words = split_words(line, &delims());
        let joined: Vec<u8> = words.concat();
        assert_eq!(joined, line);
    }

    #[test]
    fn sanitize_strips_control_bytes_and_trims() {
        assert_eq!(sanitize(b"  \x01hello\x02  "), b"hello".to_vec());
    }

    #[test]
    fn drops_empty_lines() {
        let (lines, dropped) = tokenize_lines("a b\n\nc d\n", -1, &delims());
        assert_eq!(lines.len(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn peels_timestamp() {
        let (lines, _) = tokenize_lines("123456789012345 rest of line\n", 15, &delims());
        assert_eq!(lines[0].time_stamp, b"123456789012345".to_vec());
        assert_eq!(lines[0].body, b"rest of line".to_vec());
    }
}
