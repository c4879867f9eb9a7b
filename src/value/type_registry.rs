use std::collections::HashSet;

/// Registry of custom object types allowed in persisted snapshots.
///
/// Replaces ambient global type registration: callers register every
/// [`PrefObject`](crate::PrefObject) type up front and hand the registry to
/// the [`Registry`](crate::Registry) at construction. Encoding or decoding a
/// snapshot that carries an unregistered type id fails with
/// [`CodecError::UnregisteredType`](crate::CodecError::UnregisteredType).
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    ids: HashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` for (de)serialization by its stable type id.
    ///
    /// Registering the same type twice has no additional effect.
    pub fn register<T: crate::PrefObject>(&mut self) -> &mut Self {
        self.ids.insert(T::TYPE_ID.to_string());
        self
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.ids.contains(type_id)
    }
}
