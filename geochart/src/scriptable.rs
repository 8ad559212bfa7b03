use std::fmt;
use std::sync::Arc;

use geochart_elements::UpdateMode;
use serde::{Deserialize, Deserializer};

/// What a scriptable option is being resolved for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalContext {
    pub dataset_index: usize,
    /// None when resolving dataset level options, e.g. the outline
    pub data_index: Option<usize>,
    pub mode: UpdateMode,
    pub active: bool,
    /// Parsed value of the data point, if any
    pub value: Option<f64>,
}

impl EvalContext {
    pub fn dataset(dataset_index: usize, mode: UpdateMode) -> Self {
        Self {
            dataset_index,
            data_index: None,
            mode,
            active: false,
            value: None,
        }
    }

    pub fn data(dataset_index: usize, data_index: usize, mode: UpdateMode, value: Option<f64>) -> Self {
        Self {
            dataset_index,
            data_index: Some(data_index),
            mode,
            active: false,
            value,
        }
    }
}

pub type ScriptFn<T> = dyn Fn(&EvalContext) -> Option<T> + Send + Sync;

/// An option given as a literal, one value per data point, or a function of
/// the evaluation context
#[derive(Clone)]
pub enum Scriptable<T> {
    Value(T),
    /// Indexed by data point, wrapping around
    PerIndex(Vec<T>),
    Fn(Arc<ScriptFn<T>>),
}

impl<T: Clone> Scriptable<T> {
    pub fn func(f: impl Fn(&EvalContext) -> Option<T> + Send + Sync + 'static) -> Self {
        Scriptable::Fn(Arc::new(f))
    }

    /// Resolve for `ctx`. None defers to the next level of defaults.
    pub fn resolve(&self, ctx: &EvalContext) -> Option<T> {
        match self {
            Scriptable::Value(value) => Some(value.clone()),
            Scriptable::PerIndex(values) => {
                if values.is_empty() {
                    return None;
                }
                let index = ctx.data_index.unwrap_or(0);
                values.get(index % values.len()).cloned()
            }
            Scriptable::Fn(f) => f(ctx),
        }
    }
}

impl<T> From<T> for Scriptable<T> {
    fn from(value: T) -> Self {
        Scriptable::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Scriptable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scriptable::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Scriptable::PerIndex(values) => f.debug_tuple("PerIndex").field(values).finish(),
            Scriptable::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptableRepr<T> {
    PerIndex(Vec<T>),
    Value(T),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Scriptable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ScriptableRepr::deserialize(deserializer)? {
            ScriptableRepr::PerIndex(values) => Scriptable::PerIndex(values),
            ScriptableRepr::Value(value) => Scriptable::Value(value),
        })
    }
}

/// Resolve an optional scriptable, treating an absent option as unresolved
pub fn resolve_option<T: Clone>(option: &Option<Scriptable<T>>, ctx: &EvalContext) -> Option<T> {
    option.as_ref().and_then(|s| s.resolve(ctx))
}
