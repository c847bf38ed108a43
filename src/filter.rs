use std::io::{Read, Write};

use rustc_hash::FxHashSet;

use crate::fingerprint::{fingerprint, is_fingerprint};
use crate::parser::{InputFormat, ParseError};

/// Set of fingerprints used as the exclusion membership test.
pub type SuppressionSet = FxHashSet<String>;

/// Result of partitioning a target list against a suppression set.
///
/// Every input entry lands in exactly one of the two sequences, in its
/// original position relative to the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionResult {
    /// Entries whose fingerprint was not in the suppression set
    pub clean: Vec<String>,
    /// Entries whose fingerprint matched the suppression set
    pub suppressed: Vec<String>,
}

impl PartitionResult {
    pub fn clean_count(&self) -> usize {
        self.clean.len()
    }

    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    pub fn total(&self) -> usize {
        self.clean.len() + self.suppressed.len()
    }
}

/// Build a suppression set from parsed suppression entries.
///
/// Entries that are already a 32-hex-digit fingerprint are inserted
/// verbatim (lowercased) instead of being hashed again - suppression lists
/// are often distributed pre-hashed for privacy. Everything else goes
/// through [`fingerprint`]. Never fails; duplicates collapse in the set.
pub fn build_suppression_set(entries: &[String]) -> SuppressionSet {
    let mut set = SuppressionSet::default();
    for entry in entries {
        let trimmed = entry.trim();
        if is_fingerprint(trimmed) {
            set.insert(trimmed.to_ascii_lowercase());
        } else {
            set.insert(fingerprint(trimmed));
        }
    }
    set
}

/// Partition target entries against a suppression set.
///
/// Single pass, stable order: each entry is fingerprinted and appended to
/// `clean` or `suppressed`. Target entries are always hashed, even when
/// they look like a fingerprint - pre-hash detection applies only to the
/// suppression side.
pub fn partition(entries: Vec<String>, suppression: &SuppressionSet) -> PartitionResult {
    let mut clean = Vec::new();
    let mut suppressed = Vec::new();

    for entry in entries {
        if suppression.contains(&fingerprint(&entry)) {
            suppressed.push(entry);
        } else {
            clean.push(entry);
        }
    }

    PartitionResult { clean, suppressed }
}

/// Write entries one per line, no header, no extra columns.
///
/// Output is always line-oriented regardless of the format the entries
/// were parsed from.
pub fn write_entries<W: Write>(entries: &[String], output: &mut W) -> std::io::Result<()> {
    for entry in entries {
        writeln!(output, "{}", entry)?;
    }
    Ok(())
}

/// Parse both inputs and partition the target list in one call.
///
/// Formats are selected from the filenames. The suppression input is parsed
/// first, so its errors surface first. Any parse error aborts before
/// partitioning starts - there is no partial result.
pub fn partition_streams<R1: Read, R2: Read>(
    targets: R1,
    target_name: &str,
    suppression: R2,
    suppression_name: &str,
) -> Result<PartitionResult, ParseError> {
    let suppression_entries =
        InputFormat::from_filename(suppression_name).parse(suppression, suppression_name)?;
    let target_entries = InputFormat::from_filename(target_name).parse(targets, target_name)?;

    let set = build_suppression_set(&suppression_entries);
    Ok(partition(target_entries, &set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partition_basic() {
        let set = build_suppression_set(&entries(&["b@x.com"]));
        let result = partition(entries(&["a@x.com", "b@x.com", "c@x.com"]), &set);

        assert_eq!(result.clean, vec!["a@x.com", "c@x.com"]);
        assert_eq!(result.suppressed, vec!["b@x.com"]);
        assert_eq!(result.clean_count(), 2);
        assert_eq!(result.suppressed_count(), 1);
    }

    #[test]
    fn test_partition_is_complete() {
        let targets = entries(&["a@x.com", "b@x.com", "c@x.com", "d@x.com", "b@x.com"]);
        let set = build_suppression_set(&entries(&["b@x.com", "d@x.com"]));

        let result = partition(targets.clone(), &set);

        assert_eq!(result.total(), targets.len());
        assert_eq!(result.clean, vec!["a@x.com", "c@x.com"]);
        // Duplicates are not collapsed; both occurrences are suppressed
        assert_eq!(result.suppressed, vec!["b@x.com", "d@x.com", "b@x.com"]);
    }

    #[test]
    fn test_partition_matches_case_insensitively() {
        let set = build_suppression_set(&entries(&["B@X.COM"]));
        let result = partition(entries(&["b@x.com", " b@x.com ", "a@x.com"]), &set);

        assert_eq!(result.suppressed, vec!["b@x.com", " b@x.com "]);
        assert_eq!(result.clean, vec!["a@x.com"]);
    }

    #[test]
    fn test_partition_empty_suppression_set() {
        let set = SuppressionSet::default();
        let result = partition(entries(&["a@x.com", "b@x.com"]), &set);

        assert_eq!(result.clean, vec!["a@x.com", "b@x.com"]);
        assert!(result.suppressed.is_empty());
    }

    #[test]
    fn test_build_set_passes_prehashed_entries_through() {
        // md5("a@b.com")
        let set = build_suppression_set(&entries(&["357a20e8c56e69d6f9734d23ef9517e8"]));

        assert!(set.contains("357a20e8c56e69d6f9734d23ef9517e8"));
        let result = partition(entries(&["a@b.com", "c@d.com"]), &set);
        assert_eq!(result.suppressed, vec!["a@b.com"]);
        assert_eq!(result.clean, vec!["c@d.com"]);
    }

    #[test]
    fn test_build_set_lowercases_prehashed_entries() {
        let set = build_suppression_set(&entries(&["357A20E8C56E69D6F9734D23EF9517E8"]));

        assert!(set.contains("357a20e8c56e69d6f9734d23ef9517e8"));
    }

    #[test]
    fn test_target_entries_are_never_treated_as_prehashed() {
        // A target entry that IS a fingerprint string still gets hashed,
        // so it only matches if the suppression set contains its hash
        let hash = "357a20e8c56e69d6f9734d23ef9517e8".to_string();
        let set = build_suppression_set(&[hash.clone()]);

        let result = partition(vec![hash], &set);
        assert_eq!(result.clean.len(), 1);
        assert!(result.suppressed.is_empty());
    }

    #[test]
    fn test_write_entries_line_oriented() {
        let mut output = Vec::new();
        write_entries(&entries(&["a@x.com", "b@x.com"]), &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "a@x.com\nb@x.com\n");
    }

    #[test]
    fn test_write_entries_empty() {
        let mut output = Vec::new();
        write_entries(&[], &mut output).unwrap();

        assert!(output.is_empty());
    }

    #[test]
    fn test_partition_streams_end_to_end() {
        let targets = "a@x.com\nb@x.com\nc@x.com\n";
        let suppression = "b@x.com\n";

        let result = partition_streams(
            targets.as_bytes(),
            "emails.txt",
            suppression.as_bytes(),
            "suppression.txt",
        )
        .unwrap();

        assert_eq!(result.clean, vec!["a@x.com", "c@x.com"]);
        assert_eq!(result.suppressed, vec!["b@x.com"]);
    }

    #[test]
    fn test_partition_streams_aborts_on_bad_suppression_csv() {
        let targets = "a@x.com\n";
        let suppression = "name\nAlice\n";

        let err = partition_streams(
            targets.as_bytes(),
            "emails.txt",
            suppression.as_bytes(),
            "suppression.csv",
        )
        .unwrap_err();

        assert!(matches!(err, ParseError::MissingEmailColumn { .. }));
        assert!(err.to_string().contains("suppression.csv"));
    }
}
