use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::CodecError;
use crate::Result;

/// A dynamically-typed preference value.
///
/// Every value kind that a preference set can hold is an explicit variant;
/// typed getters match exhaustively instead of inspecting runtime types.
/// Structural equality (`PartialEq`) is what the editor's change detection
/// uses to suppress no-op writes and notifications.
///
/// Custom object types are carried as [`Value::Object`] with a stable type
/// identifier and a self-describing JSON payload; the identifier must be
/// registered in a [`TypeRegistry`](crate::TypeRegistry) before such a value
/// can be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Object {
        type_id: String,
        payload: serde_json::Value,
    },
}

impl Value {
    /// Wraps a registered custom object type into an [`Value::Object`].
    pub fn object<T: PrefObject>(obj: &T) -> Result<Self> {
        let payload = serde_json::to_value(obj).map_err(CodecError::Serialize)?;
        Ok(Value::Object {
            type_id: T::TYPE_ID.to_string(),
            payload,
        })
    }

    /// Decodes an [`Value::Object`] back into its concrete type.
    ///
    /// Returns `None` when the value is not an object, carries a different
    /// type id, or its payload does not deserialize — mirroring the silent
    /// default-on-mismatch policy of the typed getters.
    pub fn decode_object<T: PrefObject>(&self) -> Option<T> {
        match self {
            Value::Object { type_id, payload } if type_id == T::TYPE_ID => {
                serde_json::from_value(payload.clone()).ok()
            }
            _ => None,
        }
    }

    /// Type id of an object value, `None` for scalar kinds.
    pub(crate) fn object_type_id(&self) -> Option<&str> {
        match self {
            Value::Object { type_id, .. } => Some(type_id),
            _ => None,
        }
    }
}

/// A custom type storable as a [`Value::Object`].
///
/// `TYPE_ID` must be stable across releases; it is written into the backing
/// file and resolved against the [`TypeRegistry`](crate::TypeRegistry) on
/// both encode and decode.
pub trait PrefObject: Serialize + DeserializeOwned {
    const TYPE_ID: &'static str;
}

/// Typed extraction from a [`Value`].
///
/// `from_value` returns `None` on kind mismatch. Mismatch is not an error
/// condition anywhere in this crate; readers resolve it to the caller-supplied
/// default, identically to an absent key.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_scalar_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_scalar_value!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
