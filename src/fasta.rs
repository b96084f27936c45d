// src/fasta.rs
// FASTA STREAMING: protein records in, optimized coding sequences out.

use std::io::{self, BufRead, Write};
use std::mem;

/// One FASTA record. `header` excludes the leading '>'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

/// Batched reader over a FASTA stream.
///
/// - Flushes a batch once it holds `max_items` records OR roughly `max_bytes` of text.
/// - Joins multi-line sequences and ignores blank lines.
/// - Drops a single trailing '*' (stop) from protein records.
/// - Text before the first header is ignored.
pub struct FastaBatchIterator<R> {
    lines: io::Lines<R>,
    max_items: usize,
    max_bytes: usize,

    pending_header: Option<String>,
    pending_sequence: String,
    exhausted: bool,
}

impl<R: BufRead> FastaBatchIterator<R> {
    pub fn new(reader: R, max_items: usize, max_bytes: usize) -> Self {
        Self {
            lines: reader.lines(),
            max_items: max_items.max(1),
            max_bytes,
            pending_header: None,
            pending_sequence: String::new(),
            exhausted: false,
        }
    }

    fn finish_record(header: String, mut sequence: String) -> FastaRecord {
        if sequence.ends_with('*') {
            sequence.pop();
        }
        FastaRecord { header, sequence }
    }
}

impl<R: BufRead> Iterator for FastaBatchIterator<R> {
    type Item = io::Result<Vec<FastaRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut batch = Vec::new();
        let mut batch_bytes = 0;

        loop {
            if !batch.is_empty() && (batch.len() >= self.max_items || batch_bytes >= self.max_bytes) {
                return Some(Ok(batch));
            }

            match self.lines.next() {
                Some(Ok(raw_line)) => {
                    let line = raw_line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(header) = line.strip_prefix('>') {
                        // A new header closes the record being built
                        if let Some(prev_header) = self.pending_header.replace(header.trim().to_string()) {
                            let prev_seq = mem::take(&mut self.pending_sequence);
                            batch_bytes += prev_header.len() + prev_seq.len();
                            batch.push(Self::finish_record(prev_header, prev_seq));
                        }
                    } else if self.pending_header.is_some() {
                        self.pending_sequence.push_str(line);
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.exhausted = true;
                    if let Some(last_header) = self.pending_header.take() {
                        let last_seq = mem::take(&mut self.pending_sequence);
                        batch.push(Self::finish_record(last_header, last_seq));
                    }
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}

/// Writes one record with the sequence wrapped at `line_width` characters (0 = no wrapping).
pub fn write_record<W: Write>(out: &mut W, header: &str, sequence: &str, line_width: usize) -> io::Result<()> {
    writeln!(out, ">{}", header)?;
    if line_width == 0 || sequence.is_empty() {
        return writeln!(out, "{}", sequence);
    }
    for chunk in sequence.as_bytes().chunks(line_width) {
        out.write_all(chunk)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
