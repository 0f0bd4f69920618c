//! Value construction and container updates.
//!
//! Every value is built inside an arena through one of the `create_*`
//! factories; the returned handle carries the first reference. Factories and
//! updates that take `Value` arguments by value take over those references.

use crate::{
    arena::{Arena, HeapId},
    error::{ValueError, ValueResult},
    resource::ResourceTracker,
    tracer::ArenaTracer,
    types::{
        Alias, Attribute, BoolVal, Builtin, CppObject, DictItems, Dictionary, FloatVal, Function, HostHandle, IntVal,
        List, Module, RangeIter, StrVal, Tuple, Type, ValueData,
    },
    value::Value,
};

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    pub fn create_integer(&mut self, value: i32) -> ValueResult<Value> {
        self.allocate(ValueData::Integer(IntVal::new(value)))
    }

    pub fn create_boolean(&mut self, value: bool) -> ValueResult<Value> {
        self.allocate(ValueData::Bool(BoolVal::new(value)))
    }

    pub fn create_float(&mut self, value: f64) -> ValueResult<Value> {
        self.allocate(ValueData::Float(FloatVal::new(value)))
    }

    pub fn create_string(&mut self, value: impl Into<String>) -> ValueResult<Value> {
        self.allocate(ValueData::String(StrVal::new(value.into())))
    }

    pub fn create_alias(&mut self, name: impl Into<String>, as_name: impl Into<String>) -> ValueResult<Value> {
        self.allocate(ValueData::Alias(Alias::new(name.into(), as_name.into())))
    }

    /// Builds a list that takes over the given handles.
    ///
    /// If any handle is foreign or stale, the handles that do belong here are
    /// released and the error is returned.
    pub fn create_list(&mut self, items: Vec<Value>) -> ValueResult<Value> {
        let ids = self.adopt(items)?;
        self.allocate_container(ValueData::List(List::new(ids)))
    }

    /// Builds a tuple that takes over the given handles.
    pub fn create_tuple(&mut self, items: Vec<Value>) -> ValueResult<Value> {
        let ids = self.adopt(items)?;
        self.allocate_container(ValueData::Tuple(Tuple::new(ids)))
    }

    pub fn create_dictionary(&mut self) -> ValueResult<Value> {
        self.allocate(ValueData::Dictionary(Dictionary::new()))
    }

    /// Builds an items view over `dict`, which must be a Dictionary.
    pub fn create_dict_items(&mut self, dict: &Value) -> ValueResult<Value> {
        self.cast::<Dictionary>(dict)?;
        let dict_id = self.resolve(dict)?;
        self.inc_ref(dict_id);
        self.allocate_container(ValueData::DictItems(DictItems::new(dict_id)))
    }

    /// Builds a range iterator over `start..end`.
    ///
    /// Fails with [`ValueError::InvalidRange`] unless `step` is positive.
    pub fn create_range(&mut self, start: i32, end: i32, step: i32) -> ValueResult<Value> {
        let range = RangeIter::new(start, end, step)?;
        self.allocate(ValueData::Iterator(range))
    }

    pub fn create_function(&mut self, name: impl Into<String>, params: Vec<String>, generator: bool) -> ValueResult<Value> {
        self.allocate(ValueData::Function(Function::new(name.into(), params, generator)))
    }

    pub fn create_builtin(&mut self, name: impl Into<String>) -> ValueResult<Value> {
        self.allocate(ValueData::Builtin(Builtin::new(name.into())))
    }

    pub fn create_module(&mut self, name: impl Into<String>) -> ValueResult<Value> {
        self.allocate(ValueData::Module(Module::new(name.into())))
    }

    /// Builds an attribute `name` bound to `owner`. The attribute takes its own
    /// reference on the owner.
    pub fn create_attribute(&mut self, owner: &Value, name: impl Into<String>) -> ValueResult<Value> {
        let owner_id = self.resolve(owner)?;
        self.inc_ref(owner_id);
        self.allocate_container(ValueData::Attribute(Attribute::new(owner_id, name.into())))
    }

    pub fn create_cpp_object(&mut self, type_name: impl Into<String>, handle: HostHandle) -> ValueResult<Value> {
        self.allocate(ValueData::CppObject(CppObject::new(type_name.into(), handle)))
    }

    /// Appends `item` to `list`, taking over the item's reference.
    pub fn list_append(&mut self, list: &Value, item: Value) -> ValueResult<()> {
        let checked = self
            .resolve(&item)
            .and_then(|item_id| self.cast::<List>(list).map(|_| item_id));
        let item_id = match checked {
            Ok(item_id) => item_id,
            Err(err) => {
                self.release(item);
                return Err(err);
            }
        };
        self.cast_mut::<List>(list)?.push(item_id);
        Ok(())
    }

    /// Returns a new handle to element `index` of a List or Tuple.
    pub fn get_item(&mut self, sequence: &Value, index: usize) -> ValueResult<Option<Value>> {
        let item = match self.data(sequence)? {
            ValueData::List(list) => list.get(index),
            ValueData::Tuple(tuple) => tuple.get(index),
            other => {
                return Err(ValueError::InvalidCast {
                    expected: Type::List,
                    found: other.value_type(),
                });
            }
        };
        Ok(item.map(|id| self.share(id)))
    }

    /// Inserts or replaces `key` in `dict`, taking over the value's reference.
    ///
    /// A replaced value loses the reference the dictionary held on it.
    pub fn dict_insert(&mut self, dict: &Value, key: impl Into<String>, value: Value) -> ValueResult<()> {
        let checked = self
            .resolve(&value)
            .and_then(|value_id| self.cast::<Dictionary>(dict).map(|_| value_id));
        let value_id = match checked {
            Ok(value_id) => value_id,
            Err(err) => {
                self.release(value);
                return Err(err);
            }
        };
        if let Some(previous) = self.cast_mut::<Dictionary>(dict)?.insert(key.into(), value_id) {
            self.dec_ref(previous);
        }
        Ok(())
    }

    /// Returns a new handle to the value stored under `key`.
    pub fn dict_get(&mut self, dict: &Value, key: &str) -> ValueResult<Option<Value>> {
        let found = self.cast::<Dictionary>(dict)?.get(key);
        Ok(found.map(|id| self.share(id)))
    }

    /// Snapshot of the `(key, value)` pairs behind an items view, in insertion order.
    pub fn items_of(&mut self, items: &Value) -> ValueResult<Vec<(String, Value)>> {
        let dict_id = self.cast::<DictItems>(items)?.dict();
        let ValueData::Dictionary(dict) = self.get(dict_id) else {
            unreachable!("DictItems always points at a Dictionary");
        };
        let pairs: Vec<(String, HeapId)> = dict.entries().map(|(key, id)| (key.to_owned(), id)).collect();
        Ok(pairs.into_iter().map(|(key, id)| (key, self.share(id))).collect())
    }

    /// Binds `name` in `module`, taking over the value's reference.
    pub fn module_set(&mut self, module: &Value, name: impl Into<String>, value: Value) -> ValueResult<()> {
        let checked = self
            .resolve(&value)
            .and_then(|value_id| self.cast::<Module>(module).map(|_| value_id));
        let value_id = match checked {
            Ok(value_id) => value_id,
            Err(err) => {
                self.release(value);
                return Err(err);
            }
        };
        if let Some(previous) = self.cast_mut::<Module>(module)?.insert(name.into(), value_id) {
            self.dec_ref(previous);
        }
        Ok(())
    }

    pub fn module_get(&mut self, module: &Value, name: &str) -> ValueResult<Option<Value>> {
        let found = self.cast::<Module>(module)?.get(name);
        Ok(found.map(|id| self.share(id)))
    }

    /// Returns a new handle to the value an attribute is bound to.
    pub fn attribute_owner(&mut self, attribute: &Value) -> ValueResult<Value> {
        let owner = self.cast::<Attribute>(attribute)?.owner();
        Ok(self.share(owner))
    }

    /// Advances a range iterator, returning the next Integer or `None` once exhausted.
    pub fn iter_next(&mut self, iterator: &Value) -> ValueResult<Option<Value>> {
        let next = self.cast_mut::<RangeIter>(iterator)?.advance();
        next.map(|value| self.create_integer(value)).transpose()
    }

    /// Takes a reference on a live slot and returns a handle for it.
    fn share(&mut self, id: HeapId) -> Value {
        self.inc_ref(id);
        self.handle_for(id)
    }

    /// Resolves handles being moved into a container.
    ///
    /// All or nothing: on failure every handle that does belong here is
    /// released, so the counts stay as if the call never happened.
    fn adopt(&mut self, values: Vec<Value>) -> ValueResult<Vec<HeapId>> {
        let mut ids = Vec::with_capacity(values.len());
        let mut failure = None;
        for value in &values {
            match self.resolve(value) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }
        if let Some(err) = failure {
            for value in values {
                self.release(value);
            }
            return Err(err);
        }
        Ok(ids)
    }

    /// Allocates a payload whose child references are already counted,
    /// giving them back if the allocation is refused.
    fn allocate_container(&mut self, data: ValueData) -> ValueResult<Value> {
        let mut children = Vec::new();
        data.collect_child_ids(&mut children);
        self.allocate(data).inspect_err(|_| {
            for child in &children {
                self.dec_ref(*child);
            }
        })
    }
}
