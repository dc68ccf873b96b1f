//! Delimiter detection.

use crate::config::SNIFF_CANDIDATES;

/// Lines inspected when sniffing.
const SAMPLE_LINES: usize = 20;

/// Guess the field delimiter of a table.
///
/// A candidate wins when it splits every sampled line into the same number
/// of fields; among those the one producing the most fields is chosen.
/// Falls back to the candidate most frequent in the header, then to `,`.
pub fn sniff_delimiter(sample: &str) -> u8 {
    let lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    let Some(header) = lines.first() else {
        return b',';
    };

    let consistent = SNIFF_CANDIDATES
        .iter()
        .filter_map(|&candidate| {
            let counts: Vec<usize> = lines.iter().map(|l| count_unquoted(l, candidate)).collect();
            let first = counts[0];
            (first > 0 && counts.iter().all(|&c| c == first)).then_some((candidate, first))
        })
        .max_by_key(|&(_, count)| count);

    if let Some((delimiter, _)) = consistent {
        return delimiter;
    }

    SNIFF_CANDIDATES
        .iter()
        .map(|&candidate| (candidate, count_unquoted(header, candidate)))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(candidate, _)| candidate)
        .unwrap_or(b',')
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma() {
        assert_eq!(sniff_delimiter("LON,LAT,ANNUAL\n-47.9,-15.7,5012\n"), b',');
    }

    #[test]
    fn test_semicolon_with_decimal_commas() {
        let sample = "LON;LAT;ANNUAL\n-47,9292;-15,7801;5012,5\n-43,1;-22,9;4620\n";
        assert_eq!(sniff_delimiter(sample), b';');
    }

    #[test]
    fn test_tab() {
        assert_eq!(sniff_delimiter("LON\tLAT\tANNUAL\n1\t2\t3\n"), b'\t');
    }

    #[test]
    fn test_quoted_delimiters_are_ignored() {
        let sample = "LON,LAT,ANNUAL\n\"-47,9\",\"-15,7\",5012\n";
        assert_eq!(sniff_delimiter(sample), b',');
    }

    #[test]
    fn test_inconsistent_falls_back_to_header() {
        let sample = "LON|LAT|ANNUAL\n1|2\n";
        assert_eq!(sniff_delimiter(sample), b'|');
    }

    #[test]
    fn test_empty_defaults_to_comma() {
        assert_eq!(sniff_delimiter(""), b',');
        assert_eq!(sniff_delimiter("ANNUAL\n4500\n"), b',');
    }
}
