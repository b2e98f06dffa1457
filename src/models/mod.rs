//! Static detection models.
//!
//! The multi-byte state machines and escape dictionaries are plain `'static`
//! data built at compile time. The language models carry compressed matrices
//! and are inflated once, on first use, behind a [`OnceLock`].

use std::sync::OnceLock;

use crate::error::Result;
use crate::sequence::SequenceModel;

pub mod escape;
pub mod greek;
pub mod multi_byte;

/// `OnceLock::get_or_init` for a fallible initializer.
///
/// Concurrent first calls may both run `init`; only one result is kept.
pub(crate) fn get_or_try_init<T>(
    cell: &'static OnceLock<T>,
    init: impl FnOnce() -> Result<T>,
) -> Result<&'static T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

static SINGLE_BYTE_MODELS: OnceLock<Vec<SequenceModel>> = OnceLock::new();

/// Every single-byte model, in priority order.
pub fn single_byte_models() -> Result<&'static [SequenceModel]> {
    get_or_try_init(&SINGLE_BYTE_MODELS, || {
        let models: Vec<SequenceModel> = greek::greek_models()?.into_iter().collect();
        tracing::debug!(count = models.len(), "single-byte models ready");
        Ok(models)
    })
    .map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;

    #[test]
    fn test_single_byte_priority() {
        let charsets: Vec<Charset> = single_byte_models()
            .unwrap()
            .iter()
            .map(SequenceModel::charset)
            .collect();
        assert_eq!(charsets, vec![Charset::Iso8859_7, Charset::Windows1253]);
    }
}
