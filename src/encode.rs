//! Encoding of dynamic path segments and query values.

use crate::error::{ErrorKind, FlaxError, Result};
use url::form_urlencoded;

/// Encode a string for use as a URL path segment or query value.
///
/// Applies form-urlencoding (space becomes `+`, reserved bytes become
/// uppercase `%XX`), then rewrites every literal `-` as `%2D`. Some routing
/// layers in front of the service mangle a bare hyphen inside a segment.
///
/// ```
/// use flax_client::encode::encode_segment;
///
/// assert_eq!(encode_segment("my-db"), "my%2Ddb");
/// assert_eq!(encode_segment("title:dark matter"), "title%3Adark+matter");
/// ```
pub fn encode_segment(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('-', "%2D")
}

/// Encode an identifier that forms a whole path segment.
///
/// An empty identifier would address the parent collection, and `.` or `..`
/// are removed by URL normalisation (also when written as `%2E`), so all
/// three are rejected with an error of `kind` before any request is made.
pub fn path_segment(id: &str, kind: ErrorKind) -> Result<String> {
    match id {
        "" => Err(FlaxError::new(kind, "identifier must not be empty")),
        "." | ".." => Err(FlaxError::new(
            kind,
            format!("identifier {:?} is not a valid path segment", id),
        )),
        _ => Ok(encode_segment(id)),
    }
}
