//! Index keys accepted by [`Alias::get`](crate::Alias::get) and [`Alias::set`](crate::Alias::set).

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use serde::{Deserialize, Serialize};

use crate::errors::{AliasError, ErrorInfo};
use crate::value::Value;

/// Position or range used to index into an alias target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Single position; negative values count from the end.
    At(i64),
    /// Range of positions.
    Slice(Slice),
}

/// Optional bounds and stride selecting positions of a sequence.
///
/// Resolution follows the usual wrap-from-end rules: negative bounds are
/// offset by the sequence length and then clamped, and a negative step walks
/// the sequence backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Slice {
    /// First position (inclusive).
    pub start: Option<i64>,
    /// End position (exclusive).
    pub stop: Option<i64>,
    /// Stride between selected positions; defaults to 1.
    pub step: Option<i64>,
}

impl Slice {
    /// Creates a unit-stride slice.
    pub fn new(start: Option<i64>, stop: Option<i64>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    /// Returns the slice with the provided stride.
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolves the slice against a sequence of length `len`, returning the
    /// selected positions in visiting order.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, AliasError> {
        let (start, stop, step) = self.resolve(len)?;
        let mut positions = Vec::new();
        let mut cursor = start;
        while (step > 0 && cursor < stop) || (step < 0 && cursor > stop) {
            // Clamping keeps the cursor inside [0, len) on both walks.
            positions.push(cursor as usize);
            match cursor.checked_add(step) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(positions)
    }

    /// Clamped `(start, stop, step)` for a sequence of length `len`.
    pub(crate) fn resolve(&self, len: usize) -> Result<(i64, i64, i64), AliasError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(AliasError::InvalidIndex(
                ErrorInfo::new("zero-step", "slice step cannot be zero")
                    .with_hint("use a positive or negative stride"),
            ));
        }
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: Option<i64>, default: i64| match bound {
            None => default,
            Some(value) if value < 0 => (value + len).max(lower),
            Some(value) => value.min(upper),
        };
        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });
        Ok((start, stop, step))
    }

    /// Returns whether the slice selects a contiguous, forward run.
    pub(crate) fn is_contiguous(&self) -> bool {
        self.step.unwrap_or(1) == 1
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::At(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::At(index.into())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::At(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<Slice> for Key {
    fn from(slice: Slice) -> Self {
        Key::Slice(slice)
    }
}

impl From<Range<i64>> for Key {
    fn from(range: Range<i64>) -> Self {
        Key::Slice(Slice::new(Some(range.start), Some(range.end)))
    }
}

impl From<RangeInclusive<i64>> for Key {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (start, end) = range.into_inner();
        // `..=-1` means "through the last element", which has no exclusive bound.
        let stop = if end == -1 { None } else { end.checked_add(1) };
        Key::Slice(Slice::new(Some(start), stop))
    }
}

impl From<RangeFrom<i64>> for Key {
    fn from(range: RangeFrom<i64>) -> Self {
        Key::Slice(Slice::new(Some(range.start), None))
    }
}

impl From<RangeTo<i64>> for Key {
    fn from(range: RangeTo<i64>) -> Self {
        Key::Slice(Slice::new(None, Some(range.end)))
    }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::Slice(Slice::default())
    }
}

impl TryFrom<&Value> for Key {
    type Error = AliasError;

    /// Converts a dynamic key. Integers select a position; a list of two or
    /// three integer-or-none entries describes `[start, stop, step]`.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(index) => Ok(Key::At(*index)),
            Value::Bool(flag) => Ok(Key::At(i64::from(*flag))),
            Value::List(parts) if (2..=3).contains(&parts.len()) => {
                let mut bounds = [None; 3];
                for (slot, part) in bounds.iter_mut().zip(parts) {
                    *slot = match part {
                        Value::None => None,
                        Value::Int(bound) => Some(*bound),
                        other => return Err(invalid_key_type(other)),
                    };
                }
                Ok(Key::Slice(Slice {
                    start: bounds[0],
                    stop: bounds[1],
                    step: bounds[2],
                }))
            }
            other => Err(invalid_key_type(other)),
        }
    }
}

fn invalid_key_type(value: &Value) -> AliasError {
    AliasError::InvalidIndexType(
        ErrorInfo::new("invalid-key-type", "key must be an integer or a slice")
            .with_context("type", value.type_name()),
    )
}
