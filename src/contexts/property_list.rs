//! Binary property list codec and atomic file writes for `PropertyListCache`.
//!
//! Only a closed set of value kinds is storable: strings, integers, finite
//! reals, booleans, data, arrays and dictionaries of the same. `Date` and
//! `Uid` values are rejected so every stored tree round-trips to an equal one.

use crate::data::CacheError;
use plist::Value;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Encodes a value tree into a binary property list
pub fn encode(value: &Value) -> Result<Vec<u8>, CacheError> {
    validate(value)?;

    let mut bytes = Vec::new();
    value
        .to_writer_binary(&mut bytes)
        .map_err(|e| CacheError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Decodes a property list, binary or XML, into a value tree
pub fn decode(bytes: &[u8]) -> Result<Value, CacheError> {
    Value::from_reader(Cursor::new(bytes)).map_err(|e| CacheError::Decode(e.to_string()))
}

/// Replaces `path` with `bytes` or leaves it untouched.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over the target.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let write_error = |source: std::io::Error| CacheError::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(directory).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn validate(value: &Value) -> Result<(), CacheError> {
    match value {
        Value::String(_) | Value::Integer(_) | Value::Boolean(_) | Value::Data(_) => Ok(()),
        Value::Real(real) if real.is_finite() => Ok(()),
        Value::Real(real) => Err(CacheError::Encode(format!("non-finite real {}", real))),
        Value::Array(items) => items.iter().try_for_each(validate),
        Value::Dictionary(dict) => dict.iter().try_for_each(|(_, item)| validate(item)),
        other => Err(CacheError::Encode(format!("unsupported value {:?}", other))),
    }
}
