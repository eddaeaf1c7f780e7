use std::collections::HashMap;

use ahash::RandomState as AHashRandomState;
use serde_json::{Map, Value};
use tracing::debug;

use crate::engine::aggregate::codec::{
    CodecOptions, FrameReader, decode_state, encode_state, write_bytes, write_str, write_u64,
};
use crate::engine::aggregate::concat::ConcatAggregator;
use crate::engine::aggregate::plan::ConcatSpec;
use crate::engine::errors::FormatError;
use crate::shared::frame_header::{BinaryHeader, FrameKind};

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub groups: Vec<String>,
}

impl GroupKey {
    pub fn new(groups: Vec<String>) -> Self {
        Self { groups }
    }
}

/// Per-group states produced by one partition, ready to be shipped and merged.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcatPartial {
    pub spec: ConcatSpec,
    pub groups: HashMap<GroupKey, ConcatAggregator, AHashRandomState>,
}

impl ConcatPartial {
    pub fn new(spec: ConcatSpec) -> Self {
        Self {
            spec,
            groups: HashMap::with_hasher(AHashRandomState::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&ConcatAggregator> {
        self.groups.get(key)
    }

    /// Folds `other` into `self`. Shared groups are merged with this side as
    /// the target; groups only present in `other` are copied over.
    pub fn merge(&mut self, other: &ConcatPartial) {
        for (k, v) in &other.groups {
            fold_group(&mut self.groups, k, v);
        }
    }

    fn sorted_groups(&self) -> Vec<(&GroupKey, &ConcatAggregator)> {
        let mut entries: Vec<_> = self.groups.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn to_bytes(&self, opts: &CodecOptions) -> Vec<u8> {
        let mut out = Vec::new();
        FrameKind::ConcatPartial.header(0).write_to(&mut out);
        write_u64(&mut out, self.groups.len() as u64);
        for (key, state) in self.sorted_groups() {
            write_u64(&mut out, key.groups.len() as u64);
            for part in &key.groups {
                write_str(&mut out, part);
            }
            write_bytes(&mut out, &encode_state(state, opts));
        }
        out
    }

    pub fn from_bytes(
        spec: ConcatSpec,
        data: &[u8],
        opts: &CodecOptions,
    ) -> Result<Self, FormatError> {
        FrameKind::ConcatPartial.read_and_validate_header(data)?;
        let mut reader = FrameReader::new(data, opts.max_field_len);
        reader.skip(BinaryHeader::TOTAL_LEN)?;

        let expected_arity = spec.group_by_fields().len();
        let mut partial = ConcatPartial::new(spec);
        let count = reader.read_count()?;
        for _ in 0..count {
            let arity = reader.read_count()?;
            if arity != expected_arity {
                return Err(FormatError::KeyArity {
                    expected: expected_arity,
                    found: arity,
                });
            }
            let mut parts = Vec::with_capacity(arity);
            for _ in 0..arity {
                parts.push(reader.read_string()?);
            }
            let state = decode_state(reader.read_bytes()?, opts)?;
            fold_group(&mut partial.groups, &GroupKey::new(parts), &state);
        }
        reader.finish()?;

        debug!(target: "group_concat::partial", groups = partial.len(), bytes = data.len(), "Decoded partial");
        Ok(partial)
    }

    /// One JSON object per group, sorted by key: the group-by fields followed
    /// by the concatenated result (null for groups that never saw a value).
    pub fn finalize_rows(&self) -> Vec<Value> {
        let output = self.spec.output_name();
        let fields = self.spec.group_by_fields();

        if self.groups.is_empty() && fields.is_empty() {
            let mut row = Map::new();
            row.insert(output, Value::Null);
            return vec![Value::Object(row)];
        }

        self.sorted_groups()
            .into_iter()
            .map(|(key, state)| {
                let mut row = Map::new();
                for (name, val) in fields.iter().zip(key.groups.iter()) {
                    row.insert(name.clone(), Value::String(val.clone()));
                }
                let result = match state.finalize() {
                    Some(s) => Value::String(s),
                    None => Value::Null,
                };
                row.insert(output.clone(), result);
                Value::Object(row)
            })
            .collect()
    }
}

/// Merges `state` into the group at `key`. A target that has never seen a
/// value carries no delimiter yet, so it is replaced instead of merged into.
fn fold_group(
    groups: &mut HashMap<GroupKey, ConcatAggregator, AHashRandomState>,
    key: &GroupKey,
    state: &ConcatAggregator,
) {
    match groups.get_mut(key) {
        Some(entry) if entry.is_empty() && entry.buffer().is_empty() => *entry = state.clone(),
        Some(entry) => entry.merge(state),
        None => {
            groups.insert(key.clone(), state.clone());
        }
    }
}
