//! Test helpers that lay out metric tables on disk.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Temporary directory holding the CSV inputs of one test.
pub(super) struct TableFiles {
    dir: TempDir,
}

impl TableFiles {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("utf8 tempdir")
    }

    /// Write `contents` to `name` beneath the root and return its path.
    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root().join(name);
        fs::write(&path, contents).expect("write table");
        path
    }

    pub(super) fn read(path: &Utf8Path) -> String {
        fs::read_to_string(path).expect("read output")
    }
}

impl std::fmt::Debug for TableFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableFiles")
            .field("root", &self.dir.path())
            .finish()
    }
}

/// Extraction output for three routes, in the route-per-row layout.
pub(super) const EXTRACTED: &str = "\
Route,Number of Subway Stations,Number of High Traffic Intersections
Lakeshore,4,2
Queen,6,9
Bloor,6,
";

/// Hand-measured elevation, in the metric-per-row layout, with a weight.
pub(super) const SURVEYED: &str = "\
Metric,Lakeshore,Queen,Bloor,weight
Elevation Gain,12,30,45,2
Number of Subway Stations,1,1,1,
";
