use serde_json::{Map, Value, json};

/// Builds JSON input rows for the concat sink.
pub struct RowFactory {
    params: Map<String, Value>,
}

impl RowFactory {
    pub fn new() -> Self {
        let mut params = Map::new();
        params.insert("value".into(), json!("v"));
        params.insert("sep".into(), json!(","));
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    pub fn create(self) -> Value {
        Value::Object(self.params)
    }

    /// `count` rows with values `"{prefix}0".."{prefix}{count-1}"`.
    pub fn create_list(self, prefix: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                let mut params = self.params.clone();
                params.insert("value".into(), json!(format!("{prefix}{i}")));
                Value::Object(params)
            })
            .collect()
    }
}
