use std::collections::HashMap;

use ahash::RandomState as AHashRandomState;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::aggregate::concat::ConcatAggregator;
use crate::engine::aggregate::partial::{ConcatPartial, GroupKey};
use crate::engine::aggregate::plan::ConcatSpec;
use crate::engine::errors::ConcatError;
use crate::shared::config::Settings;

/// Consumer of input rows for one aggregate call.
pub trait RowSink {
    fn on_row(&mut self, row: &Value) -> Result<(), ConcatError>;
}

/// Drives one `ConcatAggregator` per group over a stream of JSON rows.
pub struct ConcatSink {
    spec: ConcatSpec,
    groups: HashMap<GroupKey, ConcatAggregator, AHashRandomState>,
    // Optional cap on the number of distinct groups produced
    group_limit: Option<usize>,
    dropped_rows: usize,
}

impl ConcatSink {
    pub fn new(spec: ConcatSpec) -> Self {
        Self {
            spec,
            groups: HashMap::with_hasher(AHashRandomState::new()),
            group_limit: None,
            dropped_rows: 0,
        }
    }

    pub fn from_config(spec: ConcatSpec, settings: &Settings) -> Self {
        Self::new(spec).with_group_limit(settings.aggregate.group_limit)
    }

    /// Limit the number of distinct groups produced by this sink. If set, new groups
    /// beyond the limit will be ignored (existing groups continue to be updated).
    pub fn with_group_limit(mut self, limit: Option<usize>) -> Self {
        self.group_limit = limit;
        self
    }

    pub fn spec(&self) -> &ConcatSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows that fell outside the group limit.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn into_partial(self) -> ConcatPartial {
        if self.dropped_rows > 0 {
            warn!(
                target: "group_concat::sink",
                dropped = self.dropped_rows,
                limit = ?self.group_limit,
                "Rows dropped by group limit"
            );
        }
        ConcatPartial {
            spec: self.spec,
            groups: self.groups,
        }
    }

    pub fn into_rows(self) -> Vec<Value> {
        self.into_partial().finalize_rows()
    }

    /// Group keys are compared as text: a missing or null field reads as `""`
    /// and other scalars use their JSON rendering, so `1` and `"1"` share a group.
    fn group_key(&self, row: &Value) -> GroupKey {
        let groups = self
            .spec
            .group_by_fields()
            .iter()
            .map(|field| match row.get(field) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        GroupKey::new(groups)
    }
}

fn string_field<'a>(row: &'a Value, field: &str) -> Result<Option<&'a str>, ConcatError> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ConcatError::NonString {
            field: field.to_string(),
            found: other.to_string(),
        }),
    }
}

impl RowSink for ConcatSink {
    fn on_row(&mut self, row: &Value) -> Result<(), ConcatError> {
        let value = string_field(row, &self.spec.value_field)?;
        let delimiter = match &self.spec.delimiter_field {
            Some(field) => string_field(row, field)?,
            None => None,
        };

        let key = self.group_key(row);

        // Enforce group limit: if key not present and limit reached, skip creating new group
        if !self.groups.contains_key(&key) {
            if let Some(max) = self.group_limit {
                if self.groups.len() >= max {
                    self.dropped_rows += 1;
                    return Ok(());
                }
            }
            if tracing::enabled!(tracing::Level::DEBUG) {
                debug!(target: "group_concat::sink", key = ?key.groups, "New group");
            }
        }

        self.groups
            .entry(key)
            .or_default()
            .accumulate(value, delimiter);
        Ok(())
    }
}
