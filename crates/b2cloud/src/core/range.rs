use crate::data::ByteRange;
use crate::error::{Error, Result};

/// Format a `Range` header value for an inclusive byte range.
///
/// # Examples
///
/// ```
/// use b2cloud::ByteRange;
/// use b2cloud::core::range_header;
///
/// assert_eq!(range_header(ByteRange::new(0, 99)).unwrap(), "bytes=0-99");
/// assert!(range_header(ByteRange::new(10, 9)).is_err());
/// ```
pub fn range_header(range: ByteRange) -> Result<String> {
    if range.start > range.end {
        return Err(Error::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    Ok(format!("bytes={}-{}", range.start, range.end))
}
