/// A single-slot payload that can be read and overwritten.
///
/// `set` replaces the payload but never the discriminant: an `IntVal` stays an
/// `Integer` for its whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar<T> {
    value: T,
}

impl<T> Scalar<T> {
    pub(crate) fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the payload.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the payload.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }
}

pub type BoolVal = Scalar<bool>;
pub type StrVal = Scalar<String>;
pub type IntVal = Scalar<i32>;
pub type FloatVal = Scalar<f64>;

/// An import alias: `import name as as_name`.
///
/// Both names are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    name: String,
    as_name: String,
}

impl Alias {
    pub(crate) fn new(name: String, as_name: String) -> Self {
        Self { name, as_name }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn as_name(&self) -> &str {
        &self.as_name
    }
}
