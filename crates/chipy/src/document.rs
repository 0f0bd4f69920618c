//! Conversion between JSON documents and arena values.
//!
//! | JSON | Value |
//! |---|---|
//! | object | Dictionary (key order kept) |
//! | array | List |
//! | string | String |
//! | bool | Bool |
//! | integer in `i32` range | Integer |
//! | any other number | Float |
//! | null | rejected |
//!
//! Export accepts the same variants plus Tuple, which becomes an array.

use serde_json::{Map, Number};

use crate::{
    arena::{Arena, HeapId},
    error::{ValueError, ValueResult},
    resource::{MAX_DATA_RECURSION_DEPTH, ResourceTracker},
    tracer::ArenaTracer,
    types::ValueData,
    value::Value,
};

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    /// Builds a value tree from a JSON document.
    ///
    /// ```
    /// use chipy::{Arena, IntVal, NoLimitTracker, Type};
    ///
    /// let mut arena = Arena::new(NoLimitTracker);
    /// let doc = serde_json::json!({"name": "probe", "retries": 3});
    /// let value = arena.create_from_document(&doc).unwrap();
    /// assert_eq!(arena.type_of(&value), Type::Dictionary);
    ///
    /// let retries = arena.dict_get(&value, "retries").unwrap().unwrap();
    /// assert_eq!(*arena.cast::<IntVal>(&retries).unwrap().get(), 3);
    /// ```
    ///
    /// Fails with [`ValueError::UnsupportedDocument`] on `null`, and with
    /// [`ValueError::RecursionLimit`] when nesting exceeds
    /// [`MAX_DATA_RECURSION_DEPTH`]. Whatever was built before the failure is
    /// released and left for collection.
    pub fn create_from_document(&mut self, doc: &serde_json::Value) -> ValueResult<Value> {
        self.import_node(doc, 0)
    }

    /// Renders a value tree as a JSON document.
    ///
    /// Fails with [`ValueError::UnsupportedDocument`] for variants that have no
    /// JSON form and for non-finite floats, and with
    /// [`ValueError::RecursionLimit`] for trees nested too deep, which is
    /// also how a reference cycle shows up.
    pub fn to_document(&self, value: &Value) -> ValueResult<serde_json::Value> {
        let id = self.resolve(value)?;
        self.export_node(id, 0)
    }

    fn import_node(&mut self, node: &serde_json::Value, depth: u16) -> ValueResult<Value> {
        if depth > MAX_DATA_RECURSION_DEPTH {
            return Err(ValueError::RecursionLimit);
        }
        match node {
            serde_json::Value::Null => Err(ValueError::UnsupportedDocument("null")),
            serde_json::Value::Bool(flag) => self.create_boolean(*flag),
            serde_json::Value::Number(number) => self.import_number(number),
            serde_json::Value::String(text) => self.create_string(text.as_str()),
            serde_json::Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match self.import_node(item, depth + 1) {
                        Ok(value) => values.push(value),
                        Err(err) => {
                            for value in values {
                                self.release(value);
                            }
                            return Err(err);
                        }
                    }
                }
                self.create_list(values)
            }
            serde_json::Value::Object(entries) => {
                let dict = self.create_dictionary()?;
                for (key, item) in entries {
                    let inserted = self
                        .import_node(item, depth + 1)
                        .and_then(|value| self.dict_insert(&dict, key.as_str(), value));
                    if let Err(err) = inserted {
                        self.release(dict);
                        return Err(err);
                    }
                }
                Ok(dict)
            }
        }
    }

    fn import_number(&mut self, number: &Number) -> ValueResult<Value> {
        if let Some(int) = number.as_i64().and_then(|int| i32::try_from(int).ok()) {
            return self.create_integer(int);
        }
        match number.as_f64() {
            Some(float) => self.create_float(float),
            None => Err(ValueError::UnsupportedDocument("number")),
        }
    }

    fn export_node(&self, id: HeapId, depth: u16) -> ValueResult<serde_json::Value> {
        if depth > MAX_DATA_RECURSION_DEPTH {
            return Err(ValueError::RecursionLimit);
        }
        let node = match self.get(id) {
            ValueData::Bool(flag) => serde_json::Value::Bool(*flag.get()),
            ValueData::Integer(int) => serde_json::Value::from(*int.get()),
            ValueData::Float(float) => Number::from_f64(*float.get())
                .map(serde_json::Value::Number)
                .ok_or(ValueError::UnsupportedDocument("non-finite float"))?,
            ValueData::String(text) => serde_json::Value::String(text.get().clone()),
            ValueData::List(list) => self.export_items(list.items(), depth)?,
            ValueData::Tuple(tuple) => self.export_items(tuple.items(), depth)?,
            ValueData::Dictionary(dict) => {
                let mut object = Map::with_capacity(dict.len());
                for (key, child) in dict.entries() {
                    object.insert(key.to_owned(), self.export_node(child, depth + 1)?);
                }
                serde_json::Value::Object(object)
            }
            other => return Err(ValueError::UnsupportedDocument(other.value_type().into())),
        };
        Ok(node)
    }

    fn export_items(&self, items: &[HeapId], depth: u16) -> ValueResult<serde_json::Value> {
        items
            .iter()
            .map(|&child| self.export_node(child, depth + 1))
            .collect::<ValueResult<Vec<_>>>()
            .map(serde_json::Value::Array)
    }
}
