/// Identifier the embedding host uses for one of its own objects.
///
/// The value model never dereferences it; hosts map it back to their objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct HostHandle(u64);

impl HostHandle {
    /// Creates a host handle from a raw integer.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer identifier.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A foreign object exposed to scripts by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppObject {
    type_name: String,
    handle: HostHandle,
}

impl CppObject {
    pub(crate) fn new(type_name: String, handle: HostHandle) -> Self {
        Self { type_name, handle }
    }

    /// Host-side type name, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn handle(&self) -> HostHandle {
        self.handle
    }
}
