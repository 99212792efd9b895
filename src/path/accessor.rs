//! Reads and writes values at literal segment paths.
//!
//! `Value::Null` counts as absent: reads return `None` for it, and writing
//! `null` into an empty slot does nothing. Missing intermediate containers
//! are never an error.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::segment::Segment;

/// Largest run of `null` padding a single write may append to an array.
const MAX_ARRAY_PADDING: usize = 1 << 16;

fn child<'a>(container: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (container, segment) {
        (Value::Object(map), segment) => map.get(&segment.object_key()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

fn child_mut<'a>(container: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (container, segment) {
        (Value::Object(map), segment) => map.get_mut(&segment.object_key()),
        (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
        _ => None,
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn is_absent(container: &Value, segment: &Segment) -> bool {
    child(container, segment).map_or(true, Value::is_null)
}

/// Grows `items` with `null` so `index` is addressable. Refuses indices
/// that would overflow or pad more than [`MAX_ARRAY_PADDING`] slots.
fn pad_to(items: &mut Vec<Value>, index: usize) -> bool {
    let Some(len) = index.checked_add(1) else {
        log::debug!("Dropping write at index {}: out of range", index);
        return false;
    };
    if len > items.len() {
        if len - items.len() > MAX_ARRAY_PADDING {
            log::debug!(
                "Dropping write at index {}: array has {} items",
                index,
                items.len()
            );
            return false;
        }
        items.resize(len, Value::Null);
    }
    true
}

/// Returns the value at `segments`, or `None` when any step is missing.
///
/// A destructuring segment hands the remaining work to its reader, so the
/// result is owned in that case and borrowed otherwise.
pub fn get_in<'a>(source: &'a Value, segments: &[Segment]) -> Option<Cow<'a, Value>> {
    let mut current = source;
    for segment in segments {
        if let Segment::Destructor(destructor) = segment {
            let container = Some(current).filter(|value| !value.is_null());
            return Some(Cow::Owned(destructor.read(container)));
        }
        current = child(current, segment)?;
    }

    if current.is_null() {
        None
    } else {
        Some(Cow::Borrowed(current))
    }
}

/// Writes `value` at `segments`, creating missing containers on the way.
///
/// An intermediate container is an array when the following segment is an
/// index and an object otherwise. Writes into a `null` root, or with a key
/// on an array, are dropped.
pub fn set_in(target: &mut Value, segments: &[Segment], value: Value) {
    if target.is_null() {
        log::debug!("Dropping write into a null root");
        return;
    }

    let mut current = target;
    for (index, segment) in segments.iter().enumerate() {
        if let Segment::Destructor(destructor) = segment {
            destructor.write(current, &value);
            return;
        }

        if value.is_null() && is_absent(current, segment) {
            return;
        }

        let Some(next) = segments.get(index + 1) else {
            assign(current, segment, value);
            return;
        };

        match vivify(current, segment, next) {
            Some(container) => current = container,
            None => return,
        }
    }
}

fn assign(container: &mut Value, segment: &Segment, value: Value) {
    match container {
        Value::Object(map) => {
            map.insert(segment.object_key(), value);
        }
        Value::Array(items) => match segment {
            Segment::Index(index) => {
                if pad_to(items, *index) {
                    items[*index] = value;
                }
            }
            _ => log::debug!("Dropping write of key '{}' on an array", segment),
        },
        _ => log::debug!("Dropping write of '{}' on a scalar", segment),
    }
}

/// Makes sure `container[segment]` holds a container and returns it.
fn vivify<'a>(container: &'a mut Value, segment: &Segment, next: &Segment) -> Option<&'a mut Value> {
    if !child(container, segment).is_some_and(is_container) {
        let fresh = if next.is_index() {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };

        match container {
            Value::Object(map) => {
                map.insert(segment.object_key(), fresh);
            }
            Value::Array(items) => {
                let Some(index) = segment.as_index() else {
                    log::debug!("Dropping write through key '{}' on an array", segment);
                    return None;
                };
                if !pad_to(items, index) {
                    return None;
                }
                items[index] = fresh;
            }
            _ => {
                log::debug!("Dropping write through '{}' on a scalar", segment);
                return None;
            }
        }
    }

    child_mut(container, segment)
}

/// Removes the value at `segments`. Array entries are removed positionally,
/// shifting later items down.
pub fn delete_in(target: &mut Value, segments: &[Segment]) {
    let mut current = target;
    for (index, segment) in segments.iter().enumerate() {
        if let Segment::Destructor(destructor) = segment {
            destructor.delete(current);
            return;
        }

        if index + 1 == segments.len() {
            match (current, segment) {
                (Value::Object(map), segment) => {
                    map.shift_remove(&segment.object_key());
                }
                (Value::Array(items), Segment::Index(position)) if *position < items.len() => {
                    items.remove(*position);
                }
                _ => {}
            }
            return;
        }

        match child_mut(current, segment) {
            Some(next) if is_container(next) => current = next,
            _ => return,
        }
    }
}

/// Whether the key at the end of `segments` is present, walking from
/// `segments[start]` with `source` standing for the value at that prefix.
pub fn exist_in(source: &Value, segments: &[Segment], start: usize) -> bool {
    let mut current = source;
    for (index, segment) in segments.iter().enumerate().skip(start) {
        if let Segment::Destructor(destructor) = segment {
            return destructor.exists(current);
        }

        if index + 1 == segments.len() {
            return match (current, segment) {
                (Value::Object(map), segment) => map.contains_key(&segment.object_key()),
                (Value::Array(items), Segment::Index(position)) => *position < items.len(),
                _ => false,
            };
        }

        match child(current, segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    false
}
