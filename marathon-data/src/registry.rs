//! Route registry files listing candidate course geometries.
//!
//! The registry is plain text: a header line, then one `name,path` line per
//! route. Only lines whose path ends in `.shp` are registered, and paths are
//! resolved against the data directory.

use std::io::read_to_string;

use camino::Utf8Path;
use log::debug;
use marathon_core::RouteSource;
use marathon_fs::open_utf8_file;

use crate::RegistryError;

const SHAPEFILE_SUFFIX: &str = ".shp";

/// Parse registry `text`, resolving route paths against `data_dir`.
///
/// Backslash separators are normalised to `/`.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use marathon_data::parse_route_registry;
///
/// # fn main() -> Result<(), marathon_data::RegistryError> {
/// let text = "Name,Path\nLakeshore,Lakeshore\\Lakeshore.shp\nNotes,readme.txt\n";
/// let routes = parse_route_registry(text, Utf8Path::new("Data"))?;
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].path.as_str(), "Data/Lakeshore/Lakeshore.shp");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`RegistryError::Malformed`] for a shapefile line without a name
/// or without a `,` separator.
pub fn parse_route_registry(
    text: &str,
    data_dir: &Utf8Path,
) -> Result<Vec<RouteSource>, RegistryError> {
    let mut routes = Vec::new();
    for (index, line) in text.lines().enumerate().skip(1) {
        let entry = line.trim();
        if !entry.ends_with(SHAPEFILE_SUFFIX) {
            continue;
        }
        let line_number = index + 1;
        let (name, relative) = entry
            .split_once(',')
            .ok_or_else(|| RegistryError::Malformed {
                line: line_number,
                reason: "expected `name,path`".to_owned(),
            })?;
        let route_name = name.trim();
        if route_name.is_empty() {
            return Err(RegistryError::Malformed {
                line: line_number,
                reason: "route name is empty".to_owned(),
            });
        }
        let path = data_dir.join(relative.trim().replace('\\', "/"));
        debug!("registered route {route_name} at {path}");
        routes.push(RouteSource::new(route_name, path));
    }
    Ok(routes)
}

/// Read the registry at `path`, resolving routes against `data_dir`.
///
/// # Errors
/// Returns [`RegistryError::Read`] when the file cannot be read,
/// [`RegistryError::Malformed`] for a bad line and [`RegistryError::Empty`]
/// when no route is listed.
pub fn read_route_registry(
    path: &Utf8Path,
    data_dir: &Utf8Path,
) -> Result<Vec<RouteSource>, RegistryError> {
    let text = open_utf8_file(path)
        .and_then(read_to_string)
        .map_err(|source| RegistryError::Read {
            source,
            path: path.to_path_buf(),
        })?;
    let routes = parse_route_registry(&text, data_dir)?;
    if routes.is_empty() {
        return Err(RegistryError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(routes)
}
