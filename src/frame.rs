//! Column-labelled display table and the column reorder utility.
//!
//! The typed pipeline results live in `types`; `Frame` is the flat,
//! presentation-facing view that gets reordered, printed, and written out.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::error::PermutationError;

/// Single table value.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) if v.is_nan() => write!(f, "NaN"),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

/// Row-major table with a named integer index column.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index_name: String,
    pub index: Vec<usize>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(index_name: &str, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.to_string(),
            index: Vec::new(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Panics in debug builds if the width is wrong.
    pub fn push_row(&mut self, index: usize, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.index.push(index);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

// ─── Permutations ───

/// Column permutation: the column at position `i` moves to position `perm[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Parse a comma-separated list such as `"0,4,1,2,3"`.
    ///
    /// Only integrality is checked here; the structural checks need the
    /// table's column count and run in [`validate_permutation`]. A blank
    /// input is `Empty`; a blank element such as the middle of `"0,,1"` is
    /// `NonInteger`.
    pub fn parse(s: &str) -> Result<Self, PermutationError> {
        if s.trim().is_empty() {
            return Err(PermutationError::Empty);
        }
        let mut out = Vec::new();
        for raw in s.split(',') {
            let tok = raw.trim();
            match tok.parse::<usize>() {
                Ok(v) => out.push(v),
                Err(_) => {
                    return Err(PermutationError::NonInteger {
                        value: tok.to_string(),
                    })
                }
            }
        }
        Ok(Self(out))
    }

    /// Build from numeric values, rejecting anything with a fractional part.
    pub fn from_f64s(values: &[f64]) -> Result<Self, PermutationError> {
        if values.is_empty() {
            return Err(PermutationError::Empty);
        }
        let mut out = Vec::with_capacity(values.len());
        for &v in values {
            if !v.is_finite() || v.fract() != 0.0 || v < 0.0 {
                return Err(PermutationError::NonInteger {
                    value: v.to_string(),
                });
            }
            out.push(v as usize);
        }
        Ok(Self(out))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Permutation that undoes this one. Assumes `self` is valid.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &p) in self.0.iter().enumerate() {
            inv[p] = i;
        }
        Self(inv)
    }
}

impl From<Vec<usize>> for Permutation {
    fn from(v: Vec<usize>) -> Self {
        Self(v)
    }
}

/// Check `perm` against a table of `columns` columns.
pub fn validate_permutation(perm: &[usize], columns: usize) -> Result<(), PermutationError> {
    let min = *perm.iter().min().ok_or(PermutationError::Empty)?;
    if min != 0 {
        return Err(PermutationError::MinNotZero { min });
    }
    if perm.len() != columns {
        return Err(PermutationError::LengthMismatch {
            len: perm.len(),
            columns,
        });
    }
    let max = perm.iter().copied().max().unwrap_or(0);
    if max != columns - 1 {
        return Err(PermutationError::MaxMismatch {
            max,
            expected: columns - 1,
        });
    }
    let mut seen = HashSet::with_capacity(perm.len());
    for &p in perm {
        if !seen.insert(p) {
            return Err(PermutationError::Duplicate { value: p });
        }
    }
    Ok(())
}

/// Rearrange column order: the column at position `i` lands at `perm[i]`.
/// The index column is untouched.
pub fn reorder_columns(frame: &Frame, perm: &[usize]) -> Result<Frame, PermutationError> {
    validate_permutation(perm, frame.num_columns())?;

    let mut columns = vec![String::new(); perm.len()];
    for (i, &dst) in perm.iter().enumerate() {
        columns[dst] = frame.columns[i].clone();
    }

    let rows = frame
        .rows
        .iter()
        .map(|row| {
            let mut out = vec![Cell::Missing; perm.len()];
            for (i, &dst) in perm.iter().enumerate() {
                out[dst] = row[i].clone();
            }
            out
        })
        .collect();

    Ok(Frame {
        index_name: frame.index_name.clone(),
        index: frame.index.clone(),
        columns,
        rows,
    })
}
