use serde_json::{Map, Value};

/// Field-name → default-value contract a normalized agent result must
/// satisfy. Downstream consumers rely on every declared field being present,
/// so they never need null-checks.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(String, Value)>,
}

impl Schema {
    pub fn new(fields: Vec<(&str, Value)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, default)| (name.to_string(), default))
                .collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, default)| (name.as_str(), default))
    }

    /// Insert the default for every declared field absent from `record`.
    pub fn fill_defaults(&self, record: &mut Map<String, Value>) {
        for (name, default) in &self.fields {
            if !record.contains_key(name) {
                record.insert(name.clone(), default.clone());
            }
        }
    }

    /// A record holding only defaults.
    pub fn default_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        self.fill_defaults(&mut record);
        record
    }
}

/// Extract the inner text of the first ```json fenced block, if any.
/// Models routinely wrap structured output in decorative fences.
pub fn extract_fenced_json(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let inner = &text[start + "```json".len()..];
        let inner = match inner.find("```") {
            Some(end) => &inner[..end],
            None => inner,
        };
        return inner.trim();
    }
    text
}

/// Normalize a raw generation response against `schema`.
///
/// On a successful object parse, missing schema fields are filled with their
/// defaults. Anything else (prose, arrays, broken JSON) produces a fallback
/// record carrying the parse error, the raw text, and all defaults. No
/// failure escapes this function.
pub fn normalize_response(raw: &str, schema: &Schema) -> Map<String, Value> {
    let trimmed = raw.trim();
    let candidate = extract_fenced_json(trimmed);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(mut record)) => {
            schema.fill_defaults(&mut record);
            record
        }
        Ok(other) => fallback_record(
            schema,
            trimmed,
            &format!("expected a JSON object, got {}", json_type_name(&other)),
        ),
        Err(e) => fallback_record(schema, trimmed, &e.to_string()),
    }
}

fn fallback_record(schema: &Schema, raw: &str, detail: &str) -> Map<String, Value> {
    let mut record = schema.default_record();
    record.insert(
        "error".to_string(),
        Value::String(format!("Failed to parse response as JSON: {detail}")),
    );
    record.insert("raw_response".to_string(), Value::String(raw.to_string()));
    record
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
