// src/codon_table.rs
// CODON USAGE TABLES: amino acid -> ordered synonymous codons with relative frequency.
// Tables are read from JSON files named `<organism>.json` inside a data directory.
//
// Accepted layouts (per codon entry):
//   { "A": { "GCT": { "frequency": 0.18 }, "GCC": { "frequency": 0.26 } } }
//   { "A": { "GCT": 0.18, "GCC": 0.26 } }
// Codon order inside an amino acid follows the file and is the tie-break order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{OptimizeError, Result};
use crate::sequence::{gc_count, Base, PROTEIN_ALPHABET};

/// One synonymous codon and its relative usage.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonUsage {
    pub codon: String,
    pub frequency: f64,
}

impl CodonUsage {
    /// Number of G/C bases in the codon (0..=3).
    pub fn gc_count(&self) -> usize {
        gc_count(&self.codon)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUsage {
    Detailed { frequency: f64 },
    Bare(f64),
}

impl RawUsage {
    fn frequency(&self) -> f64 {
        match self {
            RawUsage::Detailed { frequency } | RawUsage::Bare(frequency) => *frequency,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodonTable {
    entries: BTreeMap<char, Vec<CodonUsage>>,
}

impl CodonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(amino_acid, [(codon, frequency), ...])` groups.
    pub fn from_groups<'a, I, C>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, C)>,
        C: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::new();
        for (amino_acid, codons) in groups {
            for (codon, frequency) in codons {
                table.insert(amino_acid, codon, frequency)?;
            }
        }
        Ok(table)
    }

    /// Adds (or updates) a codon for `amino_acid`, keeping first-insertion order.
    pub fn insert(&mut self, amino_acid: char, codon: &str, frequency: f64) -> Result<()> {
        let amino_acid = amino_acid.to_ascii_uppercase();
        if !amino_acid.is_ascii() || !PROTEIN_ALPHABET.contains(&(amino_acid as u8)) {
            return Err(OptimizeError::Table(format!(
                "'{}' is not a standard amino acid",
                amino_acid
            )));
        }

        let codon = codon.to_ascii_uppercase();
        if codon.len() != 3 || !codon.chars().all(|c| Base::from_char(c).is_some()) {
            return Err(OptimizeError::Table(format!(
                "codon '{}' for '{}' is not a DNA triplet",
                codon, amino_acid
            )));
        }

        if !frequency.is_finite() || frequency <= 0.0 || frequency > 1.0 {
            return Err(OptimizeError::Table(format!(
                "frequency {} of codon {} ('{}') is outside (0, 1]",
                frequency, codon, amino_acid
            )));
        }

        if let Some((other, _)) = self
            .entries
            .iter()
            .find(|(aa, usages)| **aa != amino_acid && usages.iter().any(|u| u.codon == codon))
        {
            return Err(OptimizeError::Table(format!(
                "codon {} is listed under both '{}' and '{}'",
                codon, other, amino_acid
            )));
        }

        let synonyms = self.entries.entry(amino_acid).or_default();
        match synonyms.iter_mut().find(|u| u.codon == codon) {
            Some(existing) => existing.frequency = frequency,
            None => synonyms.push(CodonUsage { codon, frequency }),
        }
        Ok(())
    }

    pub fn synonyms(&self, amino_acid: char) -> Option<&[CodonUsage]> {
        self.entries
            .get(&amino_acid.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Synonyms for the residue at `position`, or `UnknownResidue` if the table lacks it.
    pub fn synonyms_at(&self, residue: char, position: usize) -> Result<&[CodonUsage]> {
        self.synonyms(residue)
            .filter(|s| !s.is_empty())
            .ok_or(OptimizeError::UnknownResidue { residue, position })
    }

    pub fn contains(&self, amino_acid: char) -> bool {
        self.synonyms(amino_acid).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[CodonUsage])> + '_ {
        self.entries.iter().map(|(aa, usages)| (*aa, usages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a JSON table. Zero-frequency codons are dropped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| OptimizeError::Table(format!("invalid JSON: {}", e)))?;

        let mut table = Self::new();
        for (key, codons) in root {
            let mut chars = key.chars();
            let amino_acid = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(OptimizeError::Table(format!(
                        "amino acid key '{}' must be a single letter",
                        key
                    )))
                }
            };

            if amino_acid == '*' {
                warn!("skipping stop codon entry '*'");
                continue;
            }

            let Value::Object(codons) = codons else {
                return Err(OptimizeError::Table(format!(
                    "entry for '{}' must be an object of codons",
                    key
                )));
            };

            for (codon, usage) in codons {
                let usage: RawUsage = serde_json::from_value(usage).map_err(|_| {
                    OptimizeError::Table(format!(
                        "codon {} ('{}') has no numeric frequency",
                        codon, key
                    ))
                })?;
                if usage.frequency() == 0.0 {
                    warn!(amino_acid = %key, codon = %codon, "skipping codon with zero frequency");
                    continue;
                }
                table.insert(amino_acid, &codon, usage.frequency())?;
            }

            if !table.contains(amino_acid) {
                return Err(OptimizeError::Table(format!(
                    "amino acid '{}' has no usable codons",
                    key
                )));
            }
        }

        if table.is_empty() {
            return Err(OptimizeError::Table("table has no amino acids".into()));
        }
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| OptimizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        debug!(path = %path.display(), amino_acids = table.len(), "loaded codon table");
        Ok(table)
    }

    /// Loads `<data_dir>/<organism>.json`. Missing files list the organisms that do exist.
    pub fn load_organism(organism: &str, data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let path = organism_path(organism, data_dir);
        if !path.is_file() {
            let available = available_organisms(data_dir).unwrap_or_default();
            return Err(OptimizeError::Configuration(format!(
                "no codon table found for organism '{}' in {}. Available organisms: {}",
                organism,
                data_dir.display(),
                if available.is_empty() { "none".to_string() } else { available.join(", ") }
            )));
        }
        Self::from_path(path)
    }
}

pub fn organism_path(organism: &str, data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", organism))
}

/// Organism names (file stems of `*.json`) present in `data_dir`, sorted.
pub fn available_organisms(data_dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let data_dir = data_dir.as_ref();
    let reader = fs::read_dir(data_dir).map_err(|source| OptimizeError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let mut organisms: Vec<String> = reader
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    organisms.sort();
    Ok(organisms)
}
