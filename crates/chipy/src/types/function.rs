use crate::arena::HeapId;

/// A user-defined function.
///
/// Generator functions report `is_generator`; calling them is the evaluator's
/// business, this type only carries what the value model needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    params: Vec<String>,
    generator: bool,
}

impl Function {
    pub(crate) fn new(name: String, params: Vec<String>, generator: bool) -> Self {
        Self {
            name,
            params,
            generator,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    #[must_use]
    pub fn is_generator(&self) -> bool {
        self.generator
    }
}

/// A function implemented by the interpreter itself, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builtin {
    name: String,
}

impl Builtin {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An attribute looked up on a value, bound to that value.
///
/// Holds a reference on the owner so `obj.method` keeps `obj` alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    owner: HeapId,
    name: String,
}

impl Attribute {
    pub(crate) fn new(owner: HeapId, name: String) -> Self {
        Self { owner, name }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn owner(&self) -> HeapId {
        self.owner
    }

    pub(crate) fn owner_mut(&mut self) -> &mut HeapId {
        &mut self.owner
    }
}
