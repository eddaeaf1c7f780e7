/// Describes one GROUP_CONCAT call: which row fields feed it and how the
/// output is keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatSpec {
    /// Field whose string value is concatenated
    pub value_field: String,
    /// Field supplying the per-row separator, if any
    pub delimiter_field: Option<String>,
    /// Output column name override
    pub alias: Option<String>,
    pub group_by: Option<Vec<String>>,
}

impl ConcatSpec {
    pub fn new(value_field: impl Into<String>) -> Self {
        Self {
            value_field: value_field.into(),
            delimiter_field: None,
            alias: None,
            group_by: None,
        }
    }

    pub fn with_delimiter_field(mut self, field: impl Into<String>) -> Self {
        self.delimiter_field = Some(field.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_group_by(mut self, fields: Vec<&str>) -> Self {
        self.group_by = Some(fields.into_iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn output_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => format!("group_concat_{}", self.value_field),
        }
    }

    pub fn group_by_fields(&self) -> &[String] {
        self.group_by.as_deref().unwrap_or(&[])
    }
}
