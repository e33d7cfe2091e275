// talog-core/src/infrastructure/adapters/validators.rs

// Built-in validators. They look at how a source was configured and never
// call `read`: a failed check must leave the data untouched.

use crate::domain::arguments::{Arguments, CallError, Verdict};
use crate::domain::value::Value;
use crate::infrastructure::adapters::file::FileSource;
use crate::infrastructure::adapters::memory::InMemorySource;
use crate::ports::DataSource;

fn in_memory_payload(source: &dyn DataSource, validator: &str) -> Result<Value, CallError> {
    source
        .as_any()
        .downcast_ref::<InMemorySource>()
        .ok_or_else(|| {
            CallError::failed(format!(
                "{validator} only applies to in-memory sources, not {}",
                source.describe()
            ))
        })?
        .payload()
}

fn payload_len(payload: &Value) -> Result<usize, Verdict> {
    payload.len().ok_or_else(|| {
        Verdict::fail(format!("a {} payload has no length", payload.kind()))
    })
}

/// Payload is neither null nor empty; for files, the file has content.
pub fn not_empty(source: &dyn DataSource, args: Arguments) -> Result<Verdict, CallError> {
    args.finish()?;
    if let Some(file) = source.as_any().downcast_ref::<FileSource>() {
        let size = std::fs::metadata(file.path()).map(|m| m.len()).unwrap_or(0);
        return Ok(Verdict::check(size > 0, || {
            format!("{} is missing or empty", file.path().display())
        }));
    }
    let payload = in_memory_payload(source, "not_empty")?;
    Ok(Verdict::check(!payload.is_empty(), || {
        format!("{} payload is empty", payload.kind())
    }))
}

/// `min`: smallest allowed element count.
pub fn min_length(source: &dyn DataSource, mut args: Arguments) -> Result<Verdict, CallError> {
    let min: usize = args.required("min")?;
    args.finish()?;
    let payload = in_memory_payload(source, "min_length")?;
    Ok(match payload_len(&payload) {
        Ok(len) => Verdict::check(len >= min, || format!("length {len} is below {min}")),
        Err(verdict) => verdict,
    })
}

/// `max`: largest allowed element count.
pub fn max_length(source: &dyn DataSource, mut args: Arguments) -> Result<Verdict, CallError> {
    let max: usize = args.required("max")?;
    args.finish()?;
    let payload = in_memory_payload(source, "max_length")?;
    Ok(match payload_len(&payload) {
        Ok(len) => Verdict::check(len <= max, || format!("length {len} is above {max}")),
        Err(verdict) => verdict,
    })
}

pub fn file_exists(source: &dyn DataSource, args: Arguments) -> Result<Verdict, CallError> {
    args.finish()?;
    let file = source
        .as_any()
        .downcast_ref::<FileSource>()
        .ok_or_else(|| {
            CallError::failed(format!(
                "file_exists only applies to file sources, not {}",
                source.describe()
            ))
        })?;
    Ok(Verdict::check(file.path().exists(), || {
        format!("{} does not exist", file.path().display())
    }))
}
