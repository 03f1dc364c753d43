//! Path operations
//!
//! The read and write operations offered on a single document. Each one is
//! a [`walk`]/[`walk_mut`] with an operation-specific terminal step.

use serde_json::{Number, Value};

use super::token::{Path, Token};
use super::traverse::{
    expect_array_mut, expect_object_mut, resolve_index, walk, walk_mut, Intermediates,
};
use crate::error::{JsonKvError, Result};

/// Return a copy of the value at `path`.
///
/// Fails with `NoSuchField` when a field along the path is absent.
pub fn query(doc: &Value, path: &Path) -> Result<Value> {
    walk(doc, path)?
        .cloned()
        .ok_or_else(|| JsonKvError::NoSuchField(path.to_string()))
}

/// Store `value` at `path`, creating missing intermediate objects.
///
/// Array indexes must already exist; arrays are never grown. The
/// whole-document path replaces the document.
pub fn set(doc: &mut Value, path: &Path, value: Value) -> Result<()> {
    walk_mut(doc, path, Intermediates::Create, move |_| Ok(Some(value)))
}

/// Add `delta` to the number at `path` and store the integer result.
///
/// Both operands are truncated toward zero before the addition.
pub fn increment(doc: &mut Value, path: &Path, delta: &Number) -> Result<i64> {
    let delta = truncate(delta)?;
    let mut result = 0;
    walk_mut(doc, path, Intermediates::Require, |slot| {
        let Value::Number(current) = slot else {
            return Err(JsonKvError::ExpectedNumber);
        };
        result = truncate(current)?
            .checked_add(delta)
            .ok_or(JsonKvError::NumericOverflow)?;
        Ok(Some(Value::from(result)))
    })?;
    Ok(result)
}

/// Append `value` to the tail of the array at `path`
pub fn push(doc: &mut Value, path: &Path, value: Value) -> Result<()> {
    walk_mut(doc, path, Intermediates::Require, move |slot| {
        expect_array_mut(slot)?.push(value);
        Ok(None)
    })
}

/// Remove and return the head (index 0) of the array at `path`.
///
/// Push appends at the tail and pop takes from the head, so the pair
/// behaves as a FIFO queue.
pub fn pop(doc: &mut Value, path: &Path) -> Result<Value> {
    let mut head = None;
    walk_mut(doc, path, Intermediates::Require, |slot| {
        let items = expect_array_mut(slot)?;
        if items.is_empty() {
            return Err(JsonKvError::EmptyArray);
        }
        head = Some(items.remove(0));
        Ok(None)
    })?;
    head.ok_or(JsonKvError::EmptyArray)
}

/// Length of the array at `path`
pub fn array_len(doc: &Value, path: &Path) -> Result<usize> {
    match walk(doc, path)? {
        Some(Value::Array(items)) => Ok(items.len()),
        Some(_) => Err(JsonKvError::ExpectedArray),
        None => Err(JsonKvError::NoSuchField(path.to_string())),
    }
}

/// Delete the field or element addressed by `path` and return it
pub fn remove(doc: &mut Value, path: &Path) -> Result<Value> {
    let Some((last, parents)) = path.tokens().split_last() else {
        return Err(JsonKvError::InvalidPath(
            "cannot remove the document root, delete the key instead".to_string(),
        ));
    };

    // Walk to the container holding the target, then detach it there.
    let mut container = parents.to_vec();
    let target = match (&last.field, last.index) {
        (Some(field), Some(index)) => {
            container.push(Token::field(field.clone()));
            Target::Element(index)
        }
        (Some(field), None) => Target::Field(field.clone()),
        (None, Some(index)) => Target::Element(index),
        (None, None) => {
            return Err(JsonKvError::InvalidPath(format!("'{}' has an empty segment", path)))
        }
    };

    let mut removed = None;
    walk_mut(doc, &Path::from_tokens(container), Intermediates::Require, |slot| {
        removed = match target {
            Target::Field(field) => expect_object_mut(slot)?.remove(&field),
            Target::Element(index) => {
                let items = expect_array_mut(slot)?;
                let position = resolve_index(index, items.len())?;
                Some(items.remove(position))
            }
        };
        Ok(None)
    })?;
    removed.ok_or_else(|| JsonKvError::NoSuchField(path.to_string()))
}

enum Target {
    Field(String),
    Element(i64),
}

/// Integer value of a JSON number, truncated toward zero
fn truncate(number: &Number) -> Result<i64> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value) if !number.is_u64() && value.is_finite() && value.abs() < i64::MAX as f64 => {
            Ok(value.trunc() as i64)
        }
        _ => Err(JsonKvError::NumericOverflow),
    }
}
