use serde_json::{Map, Number, Value as Json};

use super::{walk, NodeKind, Position, Value, Visitable, Visitor};
use crate::types::choice_element_name;

/// Renders a model graph as FHIR JSON.
///
/// Fields come out in declaration order, a resource starts with
/// `resourceType`, and choice elements carry their type suffix. A
/// primitive's value goes under `name` while its `id` and `extension` go
/// under `_name`; in repeated primitives both arrays stay index-aligned with
/// `null` fillers.
#[derive(Debug, Default)]
pub struct JsonWriter {
    stack: Vec<Frame>,
    output: Option<Json>,
}

#[derive(Debug)]
struct Frame {
    kind: NodeKind,
    object: Map<String, Json>,
    value: Option<Json>,
    list: Option<List>,
}

#[derive(Debug)]
struct List {
    name: String,
    values: Vec<Json>,
    metadata: Vec<Json>,
}

impl Frame {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            object: Map::new(),
            value: None,
            list: None,
        }
    }

    /// The node's JSON and, for a primitive, its `_name` object.
    fn finish(self) -> (Json, Option<Json>) {
        match self.kind {
            NodeKind::Primitive => {
                let metadata = (!self.object.is_empty()).then(|| Json::Object(self.object));
                (self.value.unwrap_or(Json::Null), metadata)
            }
            _ => (Json::Object(self.object), None),
        }
    }

    fn attach(&mut self, key: String, indexed: bool, value: Json, metadata: Option<Json>) {
        if let (Some(list), true) = (self.list.as_mut(), indexed) {
            list.values.push(value);
            list.metadata.push(metadata.unwrap_or(Json::Null));
            return;
        }
        if let Some(metadata) = metadata {
            if !value.is_null() {
                self.object.insert(key.clone(), value);
            }
            self.object.insert(format!("_{key}"), metadata);
        } else if !value.is_null() {
            self.object.insert(key, value);
        }
    }

    fn close_list(&mut self) {
        let Some(list) = self.list.take() else {
            return;
        };
        if list.values.iter().any(|v| !v.is_null()) {
            self.object.insert(list.name.clone(), Json::Array(list.values));
        }
        if list.metadata.iter().any(|v| !v.is_null()) {
            self.object
                .insert(format!("_{}", list.name), Json::Array(list.metadata));
        }
    }
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rendered root, or `null` if nothing was walked.
    pub fn into_value(self) -> Json {
        self.output.unwrap_or(Json::Null)
    }
}

impl Visitor for JsonWriter {
    fn visit_start(&mut self, _at: Position<'_>, node: &dyn Visitable) {
        let mut frame = Frame::new(node.kind());
        if node.kind() == NodeKind::Resource {
            frame
                .object
                .insert("resourceType".to_string(), Json::from(node.type_name()));
        }
        self.stack.push(frame);
    }

    fn visit_end(&mut self, at: Position<'_>, node: &dyn Visitable) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let (value, metadata) = frame.finish();
        match self.stack.last_mut() {
            Some(parent) => {
                let key = if at.choice {
                    choice_element_name(at.name, node.type_name())
                } else {
                    at.name.to_string()
                };
                parent.attach(key, at.index.is_some(), value, metadata);
            }
            None => self.output = Some(value),
        }
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        if let Some(frame) = self.stack.last_mut() {
            frame.list = Some(List {
                name: name.to_string(),
                values: Vec::with_capacity(len),
                metadata: Vec::with_capacity(len),
            });
        }
    }

    fn visit_list_end(&mut self, _name: &str, _len: usize) {
        if let Some(frame) = self.stack.last_mut() {
            frame.close_list();
        }
    }

    fn visit_value(&mut self, at: Position<'_>, value: Value<'_>) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let json = value_to_json(value);
        if frame.kind == NodeKind::Primitive && at.name == "value" {
            frame.value = Some(json);
        } else {
            frame.object.insert(at.name.to_string(), json);
        }
    }
}

fn value_to_json(value: Value<'_>) -> Json {
    match value {
        Value::Boolean(b) => Json::Bool(b),
        Value::Integer(i) => Json::from(i),
        // Display keeps the scale and never uses exponent form.
        Value::Decimal(d) => d.to_string().parse::<Number>().map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s.to_string()),
    }
}

/// Render `root` as FHIR JSON.
pub fn to_json(root: &dyn Visitable) -> Json {
    let mut writer = JsonWriter::new();
    walk(root, &mut writer);
    writer.into_value()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::prelude::*;
    use crate::types::{Code, Coding, Date, Extension, FhirString, Quantity};

    #[test]
    fn test_complex_and_primitive_metadata() {
        let absent = Extension::builder("http://example.org/absent")
            .value(Code::new("unknown").unwrap())
            .build()
            .unwrap();
        let coding = Coding::builder()
            .id("c1")
            .code(Code::new("x").unwrap())
            .display(FhirString::builder().extension([absent]).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            to_json(&coding),
            json!({
                "id": "c1",
                "code": "x",
                "_display": {
                    "extension": [{"url": "http://example.org/absent", "valueCode": "unknown"}]
                }
            })
        );
    }

    fn quantity(value: &str) -> Quantity {
        let value: rust_decimal::Decimal = value.parse().unwrap();
        Quantity::builder()
            .value(crate::types::Decimal::from(value))
            .build()
            .unwrap()
    }

    #[test]
    fn test_decimal_is_a_number() {
        assert_eq!(to_json(&quantity("2.5")), json!({"value": 2.5}));
        assert!(to_json(&quantity("2.5"))["value"].is_number());
    }

    #[test]
    fn test_decimal_keeps_precision() {
        assert_eq!(to_json(&quantity("1.50")).to_string(), r#"{"value":1.50}"#);
        assert_eq!(
            to_json(&quantity("12345678901234567.123456789")).to_string(),
            r#"{"value":12345678901234567.123456789}"#
        );
        assert_eq!(to_json(&quantity("100.000")).to_string(), r#"{"value":100.000}"#);
    }

    #[test]
    fn test_root_primitive() {
        let date = Date::new("2020-01-01").unwrap();
        assert_eq!(to_json(&date), json!("2020-01-01"));
    }
}
