//! Minimal FASTA reader for command-line input.

use std::path::Path;

use crate::error::Result;

/// A single FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header up to the first whitespace, without the leading `>`.
    /// Empty for sequence text that precedes any header.
    pub id: String,
    pub sequence: String,
}

/// Parse FASTA text.
///
/// Sequence lines are concatenated with all whitespace removed. Blank lines
/// are ignored, and records without sequence data are dropped.
///
/// # Examples
/// ```
/// use bold_identify::fasta::parse_fasta;
///
/// let records = parse_fasta(">seq1 Danaus plexippus\nACGT\nTTGA\n>seq2\nGGCC\n");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].id, "seq1");
/// assert_eq!(records[0].sequence, "ACGTTTGA");
/// ```
pub fn parse_fasta(text: &str) -> Vec<FastaRecord> {
    let mut records = Vec::new();
    let mut current = FastaRecord {
        id: String::new(),
        sequence: String::new(),
    };

    for line in text.lines() {
        if let Some(header) = line.strip_prefix('>') {
            let id = header.split_whitespace().next().unwrap_or_default().to_string();
            let finished = std::mem::replace(
                &mut current,
                FastaRecord {
                    id,
                    sequence: String::new(),
                },
            );
            if !finished.sequence.is_empty() {
                records.push(finished);
            }
        } else {
            current
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if !current.sequence.is_empty() {
        records.push(current);
    }

    records
}

/// Read and parse a FASTA file.
pub fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_fasta(&text))
}
