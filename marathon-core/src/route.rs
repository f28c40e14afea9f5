//! Candidate routes and their closed-loop counterparts.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A registered candidate route: its display name and course geometry file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSource {
    /// Identifier used as the table row key.
    pub name: String,
    /// Path to the route's line geometry.
    pub path: Utf8PathBuf,
}

impl RouteSource {
    /// Pair a route name with its geometry path.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// File name component of the geometry path.
    ///
    /// Both `/` and `\` separate components so registries written on Windows
    /// resolve the same way everywhere.
    #[must_use]
    pub fn file_key(&self) -> &str {
        route_file_key(&self.path)
    }
}

/// Raised when a route has no closed-loop counterpart on record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no connected route is mapped for {route_file:?}")]
pub struct ConnectedRouteNotFound {
    /// Route file name that was looked up.
    pub route_file: String,
}

/// Mapping from a route file name to its closed-loop ("connected") version.
///
/// The closed version encloses the area a course circles, which is what
/// coverage metrics such as condominium density are measured against.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use marathon_core::ConnectedRouteMap;
///
/// let mut map = ConnectedRouteMap::new();
/// map.insert("loop.shp", "loops/loop_closed.shp");
///
/// let found = map.lookup(Utf8Path::new("data/routes/loop.shp"));
/// assert_eq!(found.map(Utf8Path::as_str), Ok("loops/loop_closed.shp"));
/// assert!(map.lookup(Utf8Path::new("other.shp")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConnectedRouteMap {
    entries: BTreeMap<String, Utf8PathBuf>,
}

impl ConnectedRouteMap {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Map `route_file` to `connected`.
    pub fn insert(&mut self, route_file: impl Into<String>, connected: impl Into<Utf8PathBuf>) {
        self.entries.insert(route_file.into(), connected.into());
    }

    /// Connected route for the route stored at `route_path`.
    ///
    /// # Errors
    /// Returns [`ConnectedRouteNotFound`] when no entry matches the path's
    /// file name.
    pub fn lookup(&self, route_path: &Utf8Path) -> Result<&Utf8Path, ConnectedRouteNotFound> {
        let key = route_file_key(route_path);
        self.entries
            .get(key)
            .map(Utf8PathBuf::as_path)
            .ok_or_else(|| ConnectedRouteNotFound {
                route_file: key.to_owned(),
            })
    }

    /// Number of mapped routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn route_file_key(path: &Utf8Path) -> &str {
    path.as_str()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Data/2023_Route/2023_Route.shp", "2023_Route.shp")]
    #[case("C:\\TWM\\Data\\Lakeshore.shp", "Lakeshore.shp")]
    #[case("Lakeshore.shp ", "Lakeshore.shp")]
    fn file_key_uses_last_component(#[case] path: &str, #[case] expected: &str) {
        let route = RouteSource::new("route", path);
        assert_eq!(route.file_key(), expected);
    }

    #[rstest]
    fn lookup_reports_missing_route() {
        let map = ConnectedRouteMap::new();
        let err = map
            .lookup(Utf8Path::new("routes/missing.shp"))
            .expect_err("lookup should fail");
        assert_eq!(err.route_file, "missing.shp");
    }
}
