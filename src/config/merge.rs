//! Deep merge of JSON configuration layers.
//!
//! Objects merge key by key, arrays follow a [`ListStrategy`], and any other
//! pairing is settled by a [`ConflictPolicy`]. `null` on either side yields
//! the other side unchanged.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value};

use crate::foundation::error::{AspectFitError, AspectFitResult};

/// How two arrays are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListStrategy {
    /// Left items, then right items.
    #[default]
    Extend,
    /// Like `Extend`, dropping later structurally-equal items.
    Unique,
    /// Merge pairwise by position; the longer list contributes its tail.
    ByIndex,
    /// Merge objects that share the value of [`MergeOptions::list_key`].
    ByKey,
}

/// What to do when the two sides are not both objects or both arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Take the right-hand (later) value.
    #[default]
    Right,
    /// Keep the left-hand (earlier) value.
    Left,
    /// Keep both as a two-element array `[left, right]`.
    Both,
    /// Fail with [`AspectFitError::Config`].
    Raise,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub list_strategy: ListStrategy,
    /// Required for [`ListStrategy::ByKey`].
    pub list_key: Option<String>,
    pub conflict: ConflictPolicy,
}

impl MergeOptions {
    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            list_strategy: ListStrategy::ByKey,
            list_key: Some(key.into()),
            ..Self::default()
        }
    }
}

/// Merge `b` over `a`. Neither input is modified.
pub fn deep_merge(a: &Value, b: &Value, opts: &MergeOptions) -> AspectFitResult<Value> {
    let key = match (opts.list_strategy, opts.list_key.as_deref()) {
        (ListStrategy::ByKey, None | Some("")) => {
            return Err(AspectFitError::invalid_argument(
                "list strategy 'by_key' needs a list key",
            ));
        }
        (_, k) => k.unwrap_or_default(),
    };
    Merger { opts, key }.merge(a, b, 0)
}

/// Fold `layers` left to right with [`deep_merge`].
pub fn merge_layers<I>(layers: I, opts: &MergeOptions) -> AspectFitResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .try_fold(Value::Null, |acc, layer| deep_merge(&acc, &layer, opts))
}

/// Read one JSON layer from disk.
pub fn read_json(path: impl AsRef<Path>) -> AspectFitResult<Value> {
    let path = path.as_ref();
    let f = File::open(path)
        .map_err(|e| AspectFitError::config(format!("open '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| AspectFitError::config(format!("parse '{}': {e}", path.display())))
}

struct Merger<'a> {
    opts: &'a MergeOptions,
    key: &'a str,
}

impl Merger<'_> {
    fn merge(&self, a: &Value, b: &Value, level: usize) -> AspectFitResult<Value> {
        match (a, b) {
            (Value::Null, _) => Ok(b.clone()),
            (_, Value::Null) => Ok(a.clone()),
            (Value::Object(a), Value::Object(b)) => self.merge_objects(a, b, level),
            (Value::Array(a), Value::Array(b)) => self.merge_arrays(a, b, level),
            _ => self.resolve_conflict(a, b, level),
        }
    }

    fn merge_objects(
        &self,
        a: &Map<String, Value>,
        b: &Map<String, Value>,
        level: usize,
    ) -> AspectFitResult<Value> {
        let mut out = a.clone();
        for (k, bv) in b {
            let merged = match out.get(k) {
                Some(av) => self.merge(av, bv, level + 1)?,
                None => bv.clone(),
            };
            out.insert(k.clone(), merged);
        }
        Ok(Value::Object(out))
    }

    fn merge_arrays(&self, a: &[Value], b: &[Value], level: usize) -> AspectFitResult<Value> {
        let items = match self.opts.list_strategy {
            ListStrategy::Extend => a.iter().chain(b).cloned().collect(),
            ListStrategy::Unique => {
                let mut out: Vec<Value> = Vec::with_capacity(a.len() + b.len());
                for item in a.iter().chain(b) {
                    if !out.contains(item) {
                        out.push(item.clone());
                    }
                }
                out
            }
            ListStrategy::ByIndex => {
                let shared = a.len().min(b.len());
                let mut out = Vec::with_capacity(a.len().max(b.len()));
                for (av, bv) in a.iter().zip(b) {
                    out.push(self.merge(av, bv, level + 1)?);
                }
                let tail = if a.len() > b.len() { a } else { b };
                out.extend(tail[shared..].iter().cloned());
                out
            }
            ListStrategy::ByKey => self.merge_by_key(a, b, level)?,
        };
        Ok(Value::Array(items))
    }

    /// Items carrying the key merge into the first item with the same key
    /// value; items without it are kept in place.
    fn merge_by_key(&self, a: &[Value], b: &[Value], level: usize) -> AspectFitResult<Vec<Value>> {
        let mut slots: Vec<(Option<Value>, Value)> = Vec::with_capacity(a.len() + b.len());
        for item in a.iter().chain(b) {
            let Some(id) = item.get(self.key) else {
                slots.push((None, item.clone()));
                continue;
            };
            match slots.iter_mut().find(|(k, _)| k.as_ref() == Some(id)) {
                Some((_, existing)) => *existing = self.merge(existing, item, level + 1)?,
                None => slots.push((Some(id.clone()), item.clone())),
            }
        }
        Ok(slots.into_iter().map(|(_, v)| v).collect())
    }

    fn resolve_conflict(&self, a: &Value, b: &Value, level: usize) -> AspectFitResult<Value> {
        match self.opts.conflict {
            ConflictPolicy::Right => Ok(b.clone()),
            ConflictPolicy::Left => Ok(a.clone()),
            ConflictPolicy::Both => Ok(Value::Array(vec![a.clone(), b.clone()])),
            ConflictPolicy::Raise => Err(AspectFitError::config(format!(
                "type conflict at level {level}: {} vs {}",
                type_name(a),
                type_name(b)
            ))),
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
