//! JSON mapping from route files to their closed-loop versions.

use std::io::read_to_string;

use camino::Utf8Path;
use log::debug;
use marathon_core::ConnectedRouteMap;
use marathon_fs::open_utf8_file;

use crate::MappingError;

/// Parse a JSON object of route file names to connected-route paths.
///
/// # Errors
/// Returns the JSON error when `text` is not such an object.
pub fn parse_connected_routes(text: &str) -> Result<ConnectedRouteMap, serde_json::Error> {
    serde_json::from_str(text)
}

/// Read the connected-route mapping stored at `path`.
///
/// # Errors
/// Returns [`MappingError::Read`] when the file cannot be read and
/// [`MappingError::Parse`] when it is not a JSON object of paths.
pub fn read_connected_routes(path: &Utf8Path) -> Result<ConnectedRouteMap, MappingError> {
    let text = open_utf8_file(path)
        .and_then(read_to_string)
        .map_err(|source| MappingError::Read {
            source,
            path: path.to_path_buf(),
        })?;
    let mapping = parse_connected_routes(&text).map_err(|source| MappingError::Parse {
        source,
        path: path.to_path_buf(),
    })?;
    debug!("loaded {} connected routes from {path}", mapping.len());
    Ok(mapping)
}
