/// Grouped string concatenation state for one group.
///
/// The host drives it as `new` → (`accumulate` | `merge`)* → `finalize`.
/// The delimiter is accumulated state: every row that supplies a non-empty
/// delimiter replaces it, so separators inside one buffer can differ when
/// the delimiter changes between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatAggregator {
    buffer: String,
    delimiter: String,
    is_empty: bool,
}

impl Default for ConcatAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcatAggregator {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            delimiter: String::new(),
            is_empty: true,
        }
    }

    /// Rebuilds a state from its transported parts.
    pub(crate) fn from_parts(delimiter: String, buffer: String, is_empty: bool) -> Self {
        Self {
            buffer,
            delimiter,
            is_empty,
        }
    }

    /// Clears the state for a new group, keeping the allocated buffer.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.delimiter.clear();
        self.is_empty = true;
    }

    /// Appends one row. A null value is skipped entirely. A separator is only
    /// written when this row supplies a non-empty delimiter and the buffer
    /// already holds content.
    pub fn accumulate(&mut self, value: Option<&str>, delimiter: Option<&str>) {
        let Some(value) = value else {
            return;
        };

        if let Some(d) = delimiter.filter(|d| !d.is_empty()) {
            self.delimiter.clear();
            self.delimiter.push_str(d);
            if !self.buffer.is_empty() {
                self.buffer.push_str(d);
            }
        }

        self.buffer.push_str(value);
        self.is_empty = false;
    }

    /// Appends another partial state. The separator is this state's current
    /// delimiter and is only written when both buffers hold content; the
    /// other side's delimiter is not adopted.
    pub fn merge(&mut self, other: &ConcatAggregator) {
        if !self.buffer.is_empty() && !other.buffer.is_empty() {
            self.buffer.push_str(&self.delimiter);
        }
        self.buffer.push_str(&other.buffer);
        if !other.buffer.is_empty() {
            self.is_empty = false;
        }
    }

    /// Combines two states into a new one without touching either input.
    pub fn merged(left: &ConcatAggregator, right: &ConcatAggregator) -> ConcatAggregator {
        let mut out = left.clone();
        out.merge(right);
        out
    }

    /// `None` when no non-null value was ever accumulated.
    pub fn finalize(&self) -> Option<String> {
        self.finalize_ref().map(str::to_string)
    }

    pub fn finalize_ref(&self) -> Option<&str> {
        if self.is_empty {
            None
        } else {
            Some(&self.buffer)
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}
