use std::collections::HashMap;

use crate::Result;
use crate::Value;

#[cfg(test)]
use mockall::automock;

/// Pluggable serialization of a full preference snapshot.
///
/// The persistence engine treats the on-disk format as opaque: any
/// implementation that round-trips every registered value kind satisfies the
/// contract. Failures must be reported, never absorbed silently.
#[cfg_attr(test, automock)]
pub trait SnapshotCodec: Send + Sync + 'static {
    fn encode(
        &self,
        entries: &HashMap<String, Value>,
    ) -> Result<Vec<u8>>;

    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<HashMap<String, Value>>;
}
