//! Parser for the weighted DIMACS (`mwcnf`) format.
//!
//! ```text
//! c comment
//! p mwcnf 4 6
//! w 2 4 1 6 0
//! 1 -3 4 0
//! -1 2 -3 0
//! ...
//! ```
//!
//! Clauses are terminated by `0`, not by the end of a line: a clause may
//! span several lines and one line may hold several clauses. A line starting
//! with `%` ends the input. The parser produces plain literal lists; turning
//! them into an [`Instance`](super::Instance) is a separate step.

use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsParseError {
    #[error("failed to read input")]
    Io(#[from] std::io::Error),

    #[error("missing 'p mwcnf' header")]
    MissingHeader,

    #[error("line {line}: multiple headers found")]
    DuplicateHeader { line: usize },

    #[error("line {line}: '{text}' is an invalid header")]
    InvalidHeader { line: usize, text: String },

    #[error("line {line}: format '{format}' is not supported, expected 'mwcnf'")]
    UnsupportedFormat { line: usize, format: String },

    #[error("line {line}: multiple weight lines found")]
    DuplicateWeights { line: usize },

    #[error("line {line}: expected {expected} weights, but got {parsed}")]
    WeightCount {
        line: usize,
        expected: usize,
        parsed: usize,
    },

    #[error("line {line}: weights are not terminated with a '0'")]
    UnterminatedWeights { line: usize },

    #[error("line {line}: '{text}' is an invalid integer")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: literal {literal} refers to a variable beyond the declared {variable_count}")]
    LiteralOutOfRange {
        line: usize,
        literal: i32,
        variable_count: usize,
    },

    #[error("the last clause is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected {expected} clauses, but parsed {parsed}")]
    ClauseCount { expected: usize, parsed: usize },

    #[error("no weight line found")]
    MissingWeights,

    #[error("no clauses found")]
    MissingClauses,
}

/// Typed contents of an `mwcnf` file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedInstance {
    pub variable_count: usize,
    /// Clauses as DIMACS literals, without the terminating `0`.
    pub clauses: Vec<Vec<i32>>,
    /// `weights[i]` belongs to variable `i + 1`.
    pub weights: Vec<i32>,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    variable_count: usize,
    clause_count: usize,
}

/// Parses an `mwcnf` document from a reader.
pub fn parse_mwcnf(source: impl BufRead) -> Result<ParsedInstance, DimacsParseError> {
    let mut header: Option<Header> = None;
    let mut weights: Option<Vec<i32>> = None;
    let mut clauses = Vec::new();
    let mut clause = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('%') {
            break;
        }

        if let Some(rest) = trimmed.strip_prefix('p') {
            if header.is_some() {
                return Err(DimacsParseError::DuplicateHeader { line: number });
            }
            header = Some(parse_header(rest, trimmed, number)?);
        } else if let Some(rest) = trimmed.strip_prefix('w') {
            let header = header.ok_or(DimacsParseError::MissingHeader)?;
            if weights.is_some() {
                return Err(DimacsParseError::DuplicateWeights { line: number });
            }
            weights = Some(parse_weights(rest, header, number)?);
        } else {
            let header = header.ok_or(DimacsParseError::MissingHeader)?;
            for word in trimmed.split_whitespace() {
                let literal = parse_number(word, number)?;
                if literal == 0 {
                    clauses.push(std::mem::take(&mut clause));
                    continue;
                }
                if literal.unsigned_abs() as usize > header.variable_count {
                    return Err(DimacsParseError::LiteralOutOfRange {
                        line: number,
                        literal,
                        variable_count: header.variable_count,
                    });
                }
                clause.push(literal);
            }
        }
    }

    if !clause.is_empty() {
        return Err(DimacsParseError::UnterminatedClause);
    }
    let header = header.ok_or(DimacsParseError::MissingHeader)?;
    let weights = weights
        .filter(|w| !w.is_empty())
        .ok_or(DimacsParseError::MissingWeights)?;
    if clauses.is_empty() {
        return Err(DimacsParseError::MissingClauses);
    }
    if clauses.len() != header.clause_count {
        return Err(DimacsParseError::ClauseCount {
            expected: header.clause_count,
            parsed: clauses.len(),
        });
    }

    Ok(ParsedInstance {
        variable_count: header.variable_count,
        clauses,
        weights,
    })
}

/// Parses an `mwcnf` document held in memory.
pub fn parse_mwcnf_str(source: &str) -> Result<ParsedInstance, DimacsParseError> {
    parse_mwcnf(source.as_bytes())
}

fn parse_header(rest: &str, line: &str, number: usize) -> Result<Header, DimacsParseError> {
    let invalid = || DimacsParseError::InvalidHeader {
        line: number,
        text: line.to_string(),
    };

    let mut words = rest.split_whitespace();
    let format = words.next().ok_or_else(invalid)?;
    if format != "mwcnf" {
        return Err(DimacsParseError::UnsupportedFormat {
            line: number,
            format: format.to_string(),
        });
    }
    let variable_count = words
        .next()
        .and_then(|w| w.parse().ok())
        .ok_or_else(invalid)?;
    let clause_count = words
        .next()
        .and_then(|w| w.parse().ok())
        .ok_or_else(invalid)?;
    if words.next().is_some() {
        return Err(invalid());
    }

    Ok(Header {
        variable_count,
        clause_count,
    })
}

fn parse_weights(rest: &str, header: Header, number: usize) -> Result<Vec<i32>, DimacsParseError> {
    let mut values = rest
        .split_whitespace()
        .map(|word| parse_number(word, number))
        .collect::<Result<Vec<i32>, _>>()?;

    if values.pop() != Some(0) {
        return Err(DimacsParseError::UnterminatedWeights { line: number });
    }
    if values.len() != header.variable_count {
        return Err(DimacsParseError::WeightCount {
            line: number,
            expected: header.variable_count,
            parsed: values.len(),
        });
    }
    Ok(values)
}

fn parse_number(word: &str, number: usize) -> Result<i32, DimacsParseError> {
    word.parse().map_err(|_| DimacsParseError::InvalidNumber {
        line: number,
        text: word.to_string(),
    })
}
