// src/sequence.rs
// VALUE TYPES: Validated biological sequences (Protein and DNA).
// A Sequence is checked once at construction and never mutated afterwards.

use std::fmt;

use serde::Serialize;

use crate::error::{OptimizeError, Result};

/// The 20 standard amino acids.
pub const PROTEIN_ALPHABET: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
pub const DNA_ALPHABET: &[u8] = b"ACGT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Case-insensitive parse of a single nucleotide.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            _ => None,
        }
    }

    pub fn is_gc(self) -> bool {
        matches!(self, Base::G | Base::C)
    }
}

/// Number of G/C bases in a nucleotide string. Non-ACGT characters count as zero.
pub fn gc_count(dna: &str) -> usize {
    dna.chars()
        .filter_map(Base::from_char)
        .filter(|b| b.is_gc())
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SequenceKind {
    Protein,
    Dna,
}

impl SequenceKind {
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            SequenceKind::Protein => PROTEIN_ALPHABET,
            SequenceKind::Dna => DNA_ALPHABET,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SequenceKind::Protein => "PROTEIN",
            SequenceKind::Dna => "DNA",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable, validated sequence. The stored value is always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sequence {
    #[serde(rename = "sequence")]
    value: String,
    kind: SequenceKind,
}

impl Sequence {
    /// Upper-cases `value` and checks every character against the alphabet of `kind`.
    pub fn new(value: impl AsRef<str>, kind: SequenceKind) -> Result<Self> {
        let alphabet = kind.alphabet();
        let mut normalized = String::with_capacity(value.as_ref().len());

        for (position, c) in value.as_ref().chars().enumerate() {
            let upper = c.to_ascii_uppercase();
            if !upper.is_ascii() || !alphabet.contains(&(upper as u8)) {
                return Err(OptimizeError::Validation {
                    kind: kind.name(),
                    character: c,
                    position,
                });
            }
            normalized.push(upper);
        }

        Ok(Self { value: normalized, kind })
    }

    pub fn protein(value: impl AsRef<str>) -> Result<Self> {
        Self::new(value, SequenceKind::Protein)
    }

    pub fn dna(value: impl AsRef<str>) -> Result<Self> {
        Self::new(value, SequenceKind::Dna)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Residues (protein) or bases (DNA) in order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.value.chars()
    }

    /// Consecutive, non-overlapping triplets. Trailing bases that do not fill a codon are skipped.
    pub fn codons(&self) -> impl Iterator<Item = &str> + '_ {
        self.value
            .as_bytes()
            .chunks_exact(3)
            .filter_map(|c| std::str::from_utf8(c).ok())
    }

    /// Percentage of G/C bases (0.0 for an empty sequence).
    pub fn gc_content(&self) -> f64 {
        if self.value.is_empty() {
            return 0.0;
        }
        gc_count(&self.value) as f64 / self.value.len() as f64 * 100.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_is_uppercased() {
        let seq = Sequence::protein("mkwy").unwrap();
        assert_eq!(seq.value(), "MKWY");
        assert_eq!(seq.kind(), SequenceKind::Protein);
    }

    #[test]
    fn protein_accepts_all_twenty() {
        assert!(Sequence::protein("ACDEFGHIKLMNPQRSTVWY").is_ok());
    }

    #[test]
    fn protein_rejects_digit() {
        let err = Sequence::protein("MA1K").unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::Validation { character: '1', position: 2, .. }
        ));
    }

    #[test]
    fn protein_rejects_unmapped_lowercase() {
        // 'b' upper-cases to 'B', which is not a standard amino acid
        assert!(matches!(
            Sequence::protein("mab"),
            Err(OptimizeError::Validation { character: 'b', .. })
        ));
        assert!(Sequence::protein("MA*").is_err());
        assert!(Sequence::protein("MÄ").is_err());
    }

    #[test]
    fn dna_rejects_uracil() {
        assert!(Sequence::dna("ATGU").is_err());
        assert!(Sequence::dna("atgc").is_ok());
    }

    #[test]
    fn empty_sequences_are_valid() {
        let seq = Sequence::dna("").unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.gc_content(), 0.0);
    }

    #[test]
    fn gc_content_and_codons() {
        let seq = Sequence::dna("ATGGCT").unwrap();
        assert_eq!(seq.gc_content(), 50.0);
        assert_eq!(seq.codons().collect::<Vec<_>>(), vec!["ATG", "GCT"]);
        assert_eq!(gc_count("GGCCAT"), 4);
    }

    #[test]
    fn serializes_as_sequence_and_kind() {
        let seq = Sequence::dna("ATG").unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"{"sequence":"ATG","kind":"DNA"}"#);
    }
}
