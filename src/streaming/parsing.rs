//! Zero-allocation parsing of record-source lines and index rows.

use memchr::memchr;

/// Classification of a single line from a record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// Record-start line carrying the identifier token (possibly empty).
    Header(&'a [u8]),
    /// Residue data with surrounding whitespace and terminators removed.
    Residues(&'a [u8]),
}

/// Classify a raw line (terminator included or not).
///
/// A header is a line whose first non-blank byte is `marker`. Its identifier
/// is the first whitespace-delimited token after the marker; whitespace
/// between the marker and the token is skipped.
#[inline]
pub fn classify_line(line: &[u8], marker: u8) -> LineKind<'_> {
    let line = line.trim_ascii();
    match line.first() {
        None => LineKind::Blank,
        Some(&b) if b == marker => {
            let rest = line[1..].trim_ascii_start();
            let end = rest
                .iter()
                .position(|b| b.is_ascii_whitespace())
                .unwrap_or(rest.len());
            LineKind::Header(&rest[..end])
        }
        Some(_) => LineKind::Residues(line),
    }
}

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters,
/// or does not fit in a u64.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse an `identifier<TAB>offset<TAB>length` index row.
///
/// A trailing `\n` or `\r\n` is tolerated. Returns None if the row has the
/// wrong number of fields or a non-numeric offset/length.
#[inline]
pub fn parse_index_row(line: &[u8]) -> Option<(&[u8], u64, u64)> {
    let line = strip_terminator(line);

    let tab1 = memchr(b'\t', line)?;
    let id = &line[..tab1];
    if id.is_empty() {
        return None;
    }

    let rest = &line[tab1 + 1..];
    let tab2 = memchr(b'\t', rest)?;
    let offset = parse_u64_fast(&rest[..tab2])?;

    let rest = &rest[tab2 + 1..];
    if memchr(b'\t', rest).is_some() {
        return None;
    }
    let length = parse_u64_fast(rest)?;

    Some((id, offset, length))
}

#[inline]
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header() {
        assert_eq!(classify_line(b">r1\n", b'>'), LineKind::Header(b"r1"));
        assert_eq!(
            classify_line(b">chr1 some description\n", b'>'),
            LineKind::Header(b"chr1")
        );
        assert_eq!(
            classify_line(b"  >  read_7\tlane2\r\n", b'>'),
            LineKind::Header(b"read_7")
        );
        assert_eq!(classify_line(b">\n", b'>'), LineKind::Header(b""));
        assert_eq!(classify_line(b">   \n", b'>'), LineKind::Header(b""));
    }

    #[test]
    fn test_classify_residues_and_blank() {
        assert_eq!(
            classify_line(b"  ACGT \r\n", b'>'),
            LineKind::Residues(b"ACGT")
        );
        assert_eq!(classify_line(b"\n", b'>'), LineKind::Blank);
        assert_eq!(classify_line(b" \t \n", b'>'), LineKind::Blank);
        assert_eq!(classify_line(b"", b'>'), LineKind::Blank);
    }

    #[test]
    fn test_classify_custom_marker() {
        assert_eq!(classify_line(b"@q1 x\n", b'@'), LineKind::Header(b"q1"));
        assert_eq!(classify_line(b">q1\n", b'@'), LineKind::Residues(b">q1"));
    }

    #[test]
    fn test_parse_u64_fast() {
        assert_eq!(parse_u64_fast(b"12345"), Some(12345));
        assert_eq!(parse_u64_fast(b"0"), Some(0));
        assert_eq!(parse_u64_fast(b""), None);
        assert_eq!(parse_u64_fast(b"-1"), None);
        assert_eq!(parse_u64_fast(b"123abc"), None);
        assert_eq!(parse_u64_fast(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_u64_fast(b"18446744073709551616"), None);
    }

    #[test]
    fn test_parse_index_row() {
        assert_eq!(parse_index_row(b"r1\t0\t6\n"), Some((&b"r1"[..], 0, 6)));
        assert_eq!(parse_index_row(b"r2\t6\t2\r\n"), Some((&b"r2"[..], 6, 2)));
        assert_eq!(parse_index_row(b"r2\t6\t2"), Some((&b"r2"[..], 6, 2)));
        assert_eq!(parse_index_row(b"r1\t6"), None);
        assert_eq!(parse_index_row(b"r1\t6\t2\textra"), None);
        assert_eq!(parse_index_row(b"\t0\t6"), None);
        assert_eq!(parse_index_row(b"r1\tx\t6"), None);
    }
}
