//! Text coefficient files
//!
//! A file is a sequence of sections. A header is any line that does not start
//! with a number; the rows below it belong to that section until the next
//! header or a separator line (`=====`, `---`). Blank lines and `Real`/`Imag`
//! column captions are skipped.
//!
//! ```text
//! FIR Filter Coefficients:
//! 0.00123,
//! -0.00456,
//!
//! SOS sections:
//! 0.01, 0.02, 0.01, 1.0, -1.5, 0.6
//! ---
//! LMS Filter Weights:
//! 0.125+0.5j
//! -0.25, 0.1j
//! ```
//!
//! Complex weights keep only their real part, the filters here are
//! real-valued.

use std::path::Path;

use crate::error::{DspError, Result};
use crate::sample::ComplexSample;

/// Most values accepted from one section
pub const MAX_COEFFS: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    Real(Vec<f64>),
    Complex(ComplexSample),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based source line
    pub line: usize,
    pub values: RowValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: String,
    pub rows: Vec<Row>,
}

impl Section {
    /// All values in order, complex rows contributing their real part
    fn flatten_real(&self) -> Result<Vec<f64>> {
        let mut out = Vec::new();
        for row in &self.rows {
            match &row.values {
                RowValues::Real(values) => out.extend_from_slice(values),
                RowValues::Complex(c) => out.push(c.re),
            }
            if out.len() > MAX_COEFFS {
                return Err(DspError::Parse {
                    line: row.line,
                    message: format!("section '{}' has more than {} values", self.header, MAX_COEFFS),
                });
            }
        }
        Ok(out)
    }
}

/// Parsed coefficient file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientFile {
    pub sections: Vec<Section>,
}

impl CoefficientFile {
    /// Parse coefficient text
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        let mut open = false;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                continue;
            }
            if is_separator(line) {
                open = false;
                continue;
            }
            if is_column_label(line) {
                continue;
            }
            if !starts_numeric(line) {
                sections.push(Section {
                    header: line.trim_end_matches(':').trim().to_string(),
                    rows: Vec::new(),
                });
                open = true;
                continue;
            }

            let values = parse_row(line).ok_or_else(|| DspError::Parse {
                line: line_no,
                message: format!("cannot parse '{}'", line),
            })?;

            match sections.last_mut() {
                Some(section) if open => section.rows.push(Row { line: line_no, values }),
                _ => {
                    return Err(DspError::Parse {
                        line: line_no,
                        message: "values outside of any section".to_string(),
                    })
                }
            }
        }

        tracing::debug!(sections = sections.len(), "parsed coefficient text");
        Ok(Self { sections })
    }

    /// Read and parse a coefficient file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// First non-empty section whose header contains `name` (case-insensitive)
    pub fn section(&self, name: &str) -> Option<&Section> {
        let needle = name.to_ascii_lowercase();
        self.sections
            .iter()
            .find(|s| !s.rows.is_empty() && s.header.to_ascii_lowercase().contains(&needle))
    }

    fn require(&self, name: &str) -> Result<&Section> {
        self.section(name)
            .ok_or_else(|| DspError::MissingSection(name.to_string()))
    }

    /// FIR taps from the section headed `FIR ...`
    pub fn fir_coefficients(&self) -> Result<Vec<f64>> {
        self.require("FIR")?.flatten_real()
    }

    /// `[b0, b1, b2, a0, a1, a2]` rows from the section headed `SOS ...`
    pub fn sos_sections(&self) -> Result<Vec<[f64; 6]>> {
        let section = self.require("SOS")?;
        section
            .rows
            .iter()
            .map(|row| match &row.values {
                RowValues::Real(v) if v.len() == 6 => Ok([v[0], v[1], v[2], v[3], v[4], v[5]]),
                _ => Err(DspError::Parse {
                    line: row.line,
                    message: "SOS row needs exactly 6 real values".to_string(),
                }),
            })
            .collect()
    }

    /// Adaptive filter weights from the section whose header contains
    /// `name` (e.g. `"LMS"`, `"RLS"`)
    pub fn adaptive_weights(&self, name: &str) -> Result<Vec<f64>> {
        self.require(name)?.flatten_real()
    }
}

fn is_separator(line: &str) -> bool {
    line.starts_with("==") || line.starts_with("---")
}

/// `Real` / `Imag` column captions above complex weights
fn is_column_label(line: &str) -> bool {
    line.starts_with("Real") || line.starts_with("Imag")
}

fn starts_numeric(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '+' | '.') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

fn parse_row(line: &str) -> Option<RowValues> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(body) = compact.trim_end_matches(',').strip_suffix('j') {
        return parse_complex(body).map(RowValues::Complex);
    }

    let values = compact
        .split(',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    if values.is_empty() {
        None
    } else {
        Some(RowValues::Real(values))
    }
}

/// `re,im` or `re±im` (the trailing `j` already stripped)
fn parse_complex(body: &str) -> Option<ComplexSample> {
    if let Some((re, im)) = body.split_once(',') {
        return Some(ComplexSample::new(re.parse().ok()?, im.parse().ok()?));
    }

    // split at the last sign that is not a leading sign or an exponent sign
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && !matches!(bytes[i - 1], b'e' | b'E'))?;

    let re = body[..split].parse().ok()?;
    let im = body[split..].parse().ok()?;
    Some(ComplexSample::new(re, im))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
FIR Filter Coefficients:
0.25,
0.5,
0.25

=====
SOS sections:
1.0, 2.0, 1.0, 1.0, -0.5, 0.25
0.5, 0.0, -0.5, 2.0, 0.1, 0.0
---
LMS Filter Weights:
Real Imag
0.125+0.5j
-2.5e-1, 0.1j
RLS Filter Weights:
1.0 - 0.5j
";

    #[test]
    fn test_parse_fir() {
        let file = CoefficientFile::parse(SAMPLE).unwrap();
        assert_eq!(file.fir_coefficients().unwrap(), vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn test_parse_sos() {
        let file = CoefficientFile::parse(SAMPLE).unwrap();
        let sos = file.sos_sections().unwrap();
        assert_eq!(sos.len(), 2);
        assert_eq!(sos[1], [0.5, 0.0, -0.5, 2.0, 0.1, 0.0]);
    }

    #[test]
    fn test_parse_adaptive_weights() {
        let file = CoefficientFile::parse(SAMPLE).unwrap();
        assert_eq!(file.adaptive_weights("LMS").unwrap(), vec![0.125, -0.25]);
        assert_eq!(file.adaptive_weights("rls").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_missing_section() {
        let file = CoefficientFile::parse("FIR:\n1.0\n").unwrap();
        assert!(matches!(file.sos_sections(), Err(DspError::MissingSection(_))));
    }

    #[test]
    fn test_values_before_header_rejected() {
        assert!(matches!(
            CoefficientFile::parse("1.0\n2.0\n"),
            Err(DspError::Parse { line: 1, .. })
        ));
        // a separator closes the section
        assert!(CoefficientFile::parse("FIR:\n1.0\n---\n2.0\n").is_err());
    }

    #[test]
    fn test_bad_sos_row() {
        let file = CoefficientFile::parse("SOS sections:\n1.0, 2.0, 3.0\n").unwrap();
        assert!(matches!(file.sos_sections(), Err(DspError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_garbage_value() {
        assert!(matches!(
            CoefficientFile::parse("FIR:\n1.0, 2.x\n"),
            Err(DspError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_complex_forms() {
        assert_eq!(parse_complex("1e-3-2E+2"), Some(ComplexSample::new(1e-3, -2e2)));
        assert_eq!(parse_complex("-1.5,0.5"), Some(ComplexSample::new(-1.5, 0.5)));
        assert_eq!(parse_complex("3.0"), None);
    }

    #[test]
    fn test_too_many_values() {
        let mut text = String::from("FIR:\n");
        for _ in 0..=MAX_COEFFS {
            text.push_str("0.1\n");
        }
        let file = CoefficientFile::parse(&text).unwrap();
        assert!(file.fir_coefficients().is_err());
    }
}
