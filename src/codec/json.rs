use std::collections::HashMap;

use crate::CodecError;
use crate::Result;
use crate::SnapshotCodec;
use crate::TypeRegistry;
use crate::Value;

/// Default snapshot codec: self-describing JSON.
///
/// Object values are validated against the injected [`TypeRegistry`] in both
/// directions so that an unregistered type surfaces as an explicit error
/// instead of silent corruption on a later read.
#[derive(Debug)]
pub struct JsonCodec {
    types: TypeRegistry,
}

impl JsonCodec {
    pub fn new(types: TypeRegistry) -> Self {
        Self { types }
    }

    fn check_registered(
        &self,
        entries: &HashMap<String, Value>,
    ) -> Result<()> {
        for value in entries.values() {
            if let Some(type_id) = value.object_type_id() {
                if !self.types.is_registered(type_id) {
                    return Err(CodecError::UnregisteredType(type_id.to_string()).into());
                }
            }
        }
        Ok(())
    }
}

impl SnapshotCodec for JsonCodec {
    fn encode(
        &self,
        entries: &HashMap<String, Value>,
    ) -> Result<Vec<u8>> {
        self.check_registered(entries)?;
        serde_json::to_vec(entries).map_err(|e| CodecError::Serialize(e).into())
    }

    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<HashMap<String, Value>> {
        let entries: HashMap<String, Value> =
            serde_json::from_slice(bytes).map_err(CodecError::Deserialize)?;
        self.check_registered(&entries)?;
        Ok(entries)
    }
}
