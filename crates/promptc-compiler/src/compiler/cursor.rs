//! Type-directed reads over a node's value buffer.

use serde_json::{Number, Value};

use crate::TRACING_TARGET;
use crate::classify::ScalarKind;
use crate::workflow::ValueBuffer;

/// Read position over an immutable value buffer.
///
/// Sequence buffers are consumed front to back: every element is read at
/// most once, whether it matched or was skipped. Keyed buffers are read by
/// name and never consumed. The buffer itself is never modified.
#[derive(Debug, Clone)]
pub struct ValueCursor<'a> {
    buffer: &'a ValueBuffer,
    position: usize,
}

impl<'a> ValueCursor<'a> {
    /// Creates a cursor at the start of the buffer.
    pub fn new(buffer: &'a ValueBuffer) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Returns whether the buffer is read by name.
    #[inline]
    pub fn is_keyed(&self) -> bool {
        !self.buffer.is_sequence()
    }

    /// Pops the next sequence value that fits `expected`, skipping the rest.
    ///
    /// `None` accepts any value. Matching values are coerced to the expected
    /// kind. Always `None` for keyed buffers.
    pub fn pop_matching(&mut self, expected: Option<ScalarKind>) -> Option<Value> {
        let ValueBuffer::Sequence(values) = self.buffer else {
            return None;
        };

        while let Some(value) = values.get(self.position) {
            self.position += 1;
            if let Some(coerced) = coerce(value, expected) {
                return Some(coerced);
            }

            tracing::trace!(
                target: TRACING_TARGET,
                position = self.position - 1,
                expected = expected.map(ScalarKind::tag),
                value = %value,
                "Skipping mismatched buffer value"
            );
        }

        None
    }

    /// Looks up a keyed value by name. Always `None` for sequence buffers.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        match self.buffer {
            ValueBuffer::Keyed(values) => values.get(name),
            ValueBuffer::Sequence(_) => None,
        }
    }

    /// Reads the value for input `name`.
    ///
    /// Keyed buffers return the named value verbatim; sequence buffers pop
    /// the next value matching `expected`.
    pub fn take(&mut self, name: &str, expected: Option<ScalarKind>) -> Option<Value> {
        match self.buffer {
            ValueBuffer::Keyed(_) => self.get(name).cloned(),
            ValueBuffer::Sequence(_) => self.pop_matching(expected),
        }
    }

    /// Returns the number of sequence elements read so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// Returns the number of sequence elements not read yet.
    pub fn remaining(&self) -> usize {
        match self.buffer {
            ValueBuffer::Sequence(values) => values.len().saturating_sub(self.position),
            ValueBuffer::Keyed(_) => 0,
        }
    }
}

/// Converts `value` to the `expected` kind, or returns `None` if it does
/// not fit.
///
/// Numeric strings become numbers, numbers become strings where text is
/// expected, and `"true"` / `"false"` become booleans.
pub fn coerce(value: &Value, expected: Option<ScalarKind>) -> Option<Value> {
    let Some(kind) = expected else {
        return Some(value.clone());
    };

    match (kind, value) {
        (ScalarKind::Int | ScalarKind::Float, Value::Number(_)) => Some(value.clone()),
        (ScalarKind::Int | ScalarKind::Float, Value::String(text)) => parse_number(text),
        (
            ScalarKind::String | ScalarKind::Combo | ScalarKind::File | ScalarKind::Enum,
            Value::String(_),
        ) => Some(value.clone()),
        (
            ScalarKind::String | ScalarKind::Combo | ScalarKind::File | ScalarKind::Enum,
            Value::Number(number),
        ) => Some(Value::String(number.to_string())),
        (ScalarKind::Boolean, Value::Bool(_)) => Some(value.clone()),
        (ScalarKind::Boolean, Value::String(text)) => match text.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Returns whether `value` structurally fits the `expected` kind.
pub fn matches(value: &Value, expected: Option<ScalarKind>) -> bool {
    coerce(value, expected).is_some()
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Number(integer.into()));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
