use crate::engine::aggregate::concat::ConcatAggregator;
use crate::engine::aggregate::partial::{ConcatPartial, GroupKey};
use crate::engine::aggregate::plan::ConcatSpec;

pub struct ConcatPartialFactory {
    spec: ConcatSpec,
    groups: Vec<(GroupKey, ConcatAggregator)>,
}

impl ConcatPartialFactory {
    pub fn new() -> Self {
        Self {
            spec: ConcatSpec::new("value").with_delimiter_field("sep"),
            groups: Vec::new(),
        }
    }

    pub fn with_spec(mut self, spec: ConcatSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_group_by(mut self, fields: Vec<&str>) -> Self {
        self.spec = self.spec.with_group_by(fields);
        self
    }

    /// Adds a group whose state is built by accumulating `values` with `delimiter`.
    pub fn add_group(mut self, key: &[&str], values: &[&str], delimiter: Option<&str>) -> Self {
        let mut state = ConcatAggregator::new();
        for v in values {
            state.accumulate(Some(*v), delimiter);
        }
        let key = GroupKey::new(key.iter().map(|s| s.to_string()).collect());
        self.groups.push((key, state));
        self
    }

    pub fn create(self) -> ConcatPartial {
        let mut partial = ConcatPartial::new(self.spec);
        for (key, state) in self.groups {
            partial.groups.insert(key, state);
        }
        partial
    }
}
