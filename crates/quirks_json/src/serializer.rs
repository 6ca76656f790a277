//! `SerializeJSONProperty` and friends.

use quirks_coercion::{get_v, to_length};
use quirks_foundation::{
    Error, ErrorContext, Heap, ObjectId, PropertyKey, Result, Value, number_to_string,
};

use crate::options::Replacer;
use crate::quote::quote;

/// Serialization state for one `JSON.stringify` call.
pub(crate) struct Serializer<'h> {
    heap: &'h mut Heap,
    replacer: Replacer,
    gap: String,
    indent: String,
    /// Objects currently being serialized, outermost first.
    stack: Vec<ObjectId>,
    /// Property keys leading from the root to the current value.
    path: Vec<PropertyKey>,
}

impl<'h> Serializer<'h> {
    pub(crate) fn new(heap: &'h mut Heap, replacer: Replacer, gap: String) -> Self {
        Self {
            heap,
            replacer,
            gap,
            indent: String::new(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Serializes `holder[key]`; `None` means the property is skipped.
    pub(crate) fn property(&mut self, holder: ObjectId, key: &PropertyKey) -> Result<Option<String>> {
        let mut value = self.heap.get(holder, key)?;

        if value.is_object() {
            let to_json = get_v(self.heap, &value, "toJSON")?;
            if self.heap.is_callable(&to_json) {
                value = self.heap.call(&to_json, &value, &[key.to_value()])?;
            }
        }

        if let Replacer::Function(f) = &self.replacer {
            let f = f.clone();
            value = self
                .heap
                .call(&f, &Value::Object(holder), &[key.to_value(), value])?;
        }

        match &value {
            Value::Null => Ok(Some("null".to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::String(s) => Ok(Some(quote(s))),
            Value::Number(n) if n.is_finite() => Ok(Some(number_to_string(*n))),
            Value::Number(_) => Ok(Some("null".to_string())),
            Value::Object(id) if !self.heap.is_callable(&value) => {
                let id = *id;
                self.path.push(key.clone());
                let out = if self.heap.is_array(&value) {
                    self.array(id)
                } else {
                    self.object(id)
                };
                self.path.pop();
                out.map(Some)
            }
            Value::Undefined | Value::Symbol(_) | Value::Object(_) => Ok(None),
        }
    }

    fn enter(&mut self, id: ObjectId) -> Result<String> {
        if self.stack.contains(&id) {
            tracing::debug!(depth = self.stack.len(), "cycle detected during JSON serialization");
            let mut context = ErrorContext::new().with_operation("JSON.stringify");
            for key in self.path.iter().skip(1) {
                context = context.with_segment(format!("property '{key}'"));
            }
            return Err(
                Error::type_error("Converting circular structure to JSON").with_context(context),
            );
        }
        self.stack.push(id);
        let stepback = self.indent.clone();
        self.indent.push_str(&self.gap);
        Ok(stepback)
    }

    fn leave(&mut self, stepback: String) {
        self.stack.pop();
        self.indent = stepback;
    }

    fn wrap(&self, open: char, close: char, parts: &[String], stepback: &str) -> String {
        if parts.is_empty() {
            return format!("{open}{close}");
        }
        if self.gap.is_empty() {
            return format!("{open}{}{close}", parts.join(","));
        }
        let separator = format!(",\n{}", self.indent);
        format!(
            "{open}\n{}{}\n{stepback}{close}",
            self.indent,
            parts.join(&separator)
        )
    }

    /// `SerializeJSONObject`.
    fn object(&mut self, id: ObjectId) -> Result<String> {
        let stepback = self.enter(id)?;

        let keys = match &self.replacer {
            Replacer::AllowList(keys) => keys.clone(),
            _ => self
                .heap
                .own_enumerable_keys(id)?
                .into_iter()
                .filter(|key| !key.is_symbol())
                .collect(),
        };

        let colon = if self.gap.is_empty() { ":" } else { ": " };
        let mut parts = Vec::new();
        for key in &keys {
            if let Some(text) = self.property(id, key)? {
                let name = key.as_str().unwrap_or_default();
                parts.push(format!("{}{colon}{text}", quote(name)));
            }
        }

        let out = self.wrap('{', '}', &parts, &stepback);
        self.leave(stepback);
        Ok(out)
    }

    /// `SerializeJSONArray`.
    fn array(&mut self, id: ObjectId) -> Result<String> {
        let stepback = self.enter(id)?;

        let length = self.heap.get(id, "length")?;
        let length = to_length(self.heap, &length)?;
        let mut parts = Vec::new();
        for index in 0..length {
            let text = self.property(id, &PropertyKey::from(index))?;
            parts.push(text.unwrap_or_else(|| "null".to_string()));
        }

        let out = self.wrap('[', ']', &parts, &stepback);
        self.leave(stepback);
        Ok(out)
    }
}
