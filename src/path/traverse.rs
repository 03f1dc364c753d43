//! Path traversal and mutation
//!
//! Every path operation is a walk from the document root, one token at a
//! time. A token's field is looked up first (the cursor must be an object),
//! then its index is resolved (the cursor must be an array). Read walks
//! return the value under the terminal token; write walks hand the terminal
//! slot to a replacer and store whatever it returns back into that slot.
//!
//! Both walks share the type checks and index resolution below, so reads
//! and writes agree on what a path addresses. The walks hold no state and
//! take no locks; callers must already own the document.

use serde_json::{Map, Value};

use super::token::{Path, Token};
use crate::error::{JsonKvError, Result};

/// What a write walk does with intermediate fields that cannot be walked into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intermediates {
    /// A missing intermediate is a type error
    Require,

    /// A missing or scalar intermediate field becomes an empty object.
    /// Objects and arrays already in place are never replaced.
    Create,
}

/// Walk `root` along `path` and return the value under the terminal token.
///
/// Returns `Ok(None)` as soon as a field lookup finds nothing.
pub fn walk<'v>(root: &'v Value, path: &Path) -> Result<Option<&'v Value>> {
    let mut current = root;

    for token in path.tokens() {
        if let Some(field) = &token.field {
            match expect_object(current)?.get(field) {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        if let Some(index) = token.index {
            let items = expect_array(current)?;
            current = &items[resolve_index(index, items.len())?];
        }
    }

    Ok(Some(current))
}

/// Walk `root` along `path` and run `replacer` on the terminal slot.
///
/// The replacer receives the value found under the terminal token (`Null`
/// when the terminal field is absent). Returning `Some(value)` writes
/// `value` into the slot; returning `None` keeps the slot as the replacer
/// left it. The whole-document path hands the root itself to the replacer.
///
/// With [`Intermediates::Create`] the walk rewrites intermediate fields
/// before it knows whether later tokens resolve, so a failing walk can leave
/// those new objects behind.
pub fn walk_mut<F>(
    root: &mut Value,
    path: &Path,
    intermediates: Intermediates,
    replacer: F,
) -> Result<()>
where
    F: FnOnce(&mut Value) -> Result<Option<Value>>,
{
    let tokens = path.tokens();
    let Some((last, parents)) = tokens.split_last() else {
        return apply(root, replacer);
    };

    let mut current = root;
    for (position, token) in parents.iter().enumerate() {
        current = step_mut(current, token, &tokens[position + 1], intermediates)?;
    }

    if let Some(field) = &last.field {
        let object = expect_object_mut(current)?;
        if last.index.is_none() {
            return match object.get_mut(field) {
                Some(slot) => apply(slot, replacer),
                None => {
                    let mut vacant = Value::Null;
                    if let Some(replacement) = replacer(&mut vacant)? {
                        object.insert(field.clone(), replacement);
                    }
                    Ok(())
                }
            };
        }
        current = object.get_mut(field).ok_or(JsonKvError::ExpectedArray)?;
    }

    if let Some(index) = last.index {
        let items = expect_array_mut(current)?;
        let position = resolve_index(index, items.len())?;
        return apply(&mut items[position], replacer);
    }

    apply(current, replacer)
}

/// Move the cursor across one non-terminal token
fn step_mut<'v>(
    mut current: &'v mut Value,
    token: &Token,
    next: &Token,
    intermediates: Intermediates,
) -> Result<&'v mut Value> {
    if let Some(field) = &token.field {
        let object = expect_object_mut(current)?;
        current = if token.index.is_none() && intermediates == Intermediates::Create {
            let slot = object.entry(field.clone()).or_insert(Value::Null);
            if !slot.is_object() && !slot.is_array() {
                *slot = Value::Object(Map::new());
            }
            slot
        } else {
            object
                .get_mut(field)
                .ok_or_else(|| missing_container(token, next))?
        };
    }

    if let Some(index) = token.index {
        let items = expect_array_mut(current)?;
        let position = resolve_index(index, items.len())?;
        current = &mut items[position];
    }

    Ok(current)
}

fn apply<F>(slot: &mut Value, replacer: F) -> Result<()>
where
    F: FnOnce(&mut Value) -> Result<Option<Value>>,
{
    if let Some(replacement) = replacer(slot)? {
        *slot = replacement;
    }
    Ok(())
}

/// The type error the walk would hit on stepping into an absent field
fn missing_container(token: &Token, next: &Token) -> JsonKvError {
    if token.index.is_some() || next.field.is_none() {
        JsonKvError::ExpectedArray
    } else {
        JsonKvError::ExpectedObject
    }
}

/// Resolve a possibly negative index against an array length
pub fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let resolved = if index >= 0 {
        usize::try_from(index).ok().filter(|&i| i < len)
    } else {
        usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    };
    resolved.ok_or(JsonKvError::IndexOutOfRange { index, len })
}

pub(crate) fn expect_object(value: &Value) -> Result<&Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(JsonKvError::ExpectedObject),
    }
}

pub(crate) fn expect_object_mut(value: &mut Value) -> Result<&mut Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(JsonKvError::ExpectedObject),
    }
}

pub(crate) fn expect_array(value: &Value) -> Result<&Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(JsonKvError::ExpectedArray),
    }
}

pub(crate) fn expect_array_mut(value: &mut Value) -> Result<&mut Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(JsonKvError::ExpectedArray),
    }
}
