//! Scoped ownership of intermediate GIS artefacts.
//!
//! Buffers, selections and summary tables created during extraction are
//! registered with a [`ScratchArtifacts`] guard. The guard releases them in
//! reverse creation order when it goes out of scope, on success and failure
//! paths alike.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Deletes an intermediate artefact.
pub trait ArtifactCleaner {
    /// Error raised when an artefact cannot be released.
    type Error: std::error::Error;

    /// Delete the artefact at `artifact`.
    ///
    /// # Errors
    /// Returns the cleaner's error when deletion fails.
    fn release(&self, artifact: &Utf8Path) -> Result<(), Self::Error>;
}

/// Guard that releases registered artefacts on drop.
///
/// # Examples
/// ```
/// use std::cell::RefCell;
/// use std::convert::Infallible;
///
/// use camino::Utf8Path;
/// use marathon_core::{ArtifactCleaner, ScratchArtifacts};
///
/// #[derive(Default)]
/// struct Recorder(RefCell<Vec<String>>);
///
/// impl ArtifactCleaner for Recorder {
///     type Error = Infallible;
///
///     fn release(&self, artifact: &Utf8Path) -> Result<(), Infallible> {
///         self.0.borrow_mut().push(artifact.to_string());
///         Ok(())
///     }
/// }
///
/// let recorder = Recorder::default();
/// {
///     let mut scratch = ScratchArtifacts::new(&recorder);
///     scratch.register("RouteBuffer");
///     scratch.register("RouteBuffer_POI");
/// }
/// assert_eq!(*recorder.0.borrow(), ["RouteBuffer_POI", "RouteBuffer"]);
/// ```
pub struct ScratchArtifacts<'cleaner, C: ArtifactCleaner> {
    cleaner: &'cleaner C,
    artifacts: Vec<Utf8PathBuf>,
}

impl<'cleaner, C: ArtifactCleaner> ScratchArtifacts<'cleaner, C> {
    /// Create an empty guard backed by `cleaner`.
    #[must_use]
    pub const fn new(cleaner: &'cleaner C) -> Self {
        Self {
            cleaner,
            artifacts: Vec::new(),
        }
    }

    /// Track `artifact` for release and return its path.
    pub fn register(&mut self, artifact: impl Into<Utf8PathBuf>) -> &Utf8Path {
        self.artifacts.push(artifact.into());
        self.artifacts
            .last()
            .map_or_else(|| Utf8Path::new(""), Utf8PathBuf::as_path)
    }

    /// Number of artefacts still held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Report whether no artefact is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Release every held artefact now and report how many failed.
    pub fn release_all(&mut self) -> usize {
        let mut failed = 0_usize;
        while let Some(artifact) = self.artifacts.pop() {
            match self.cleaner.release(&artifact) {
                Ok(()) => debug!("released scratch artefact {artifact}"),
                Err(err) => {
                    warn!("failed to release scratch artefact {artifact}: {err}");
                    failed += 1;
                }
            }
        }
        failed
    }
}

impl<C: ArtifactCleaner> Drop for ScratchArtifacts<'_, C> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<C: ArtifactCleaner> std::fmt::Debug for ScratchArtifacts<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchArtifacts")
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("locked")]
    struct Locked;

    #[derive(Default)]
    struct FlakyCleaner {
        released: RefCell<Vec<String>>,
    }

    impl ArtifactCleaner for FlakyCleaner {
        type Error = Locked;

        fn release(&self, artifact: &Utf8Path) -> Result<(), Locked> {
            if artifact.as_str().ends_with(".lock") {
                return Err(Locked);
            }
            self.released.borrow_mut().push(artifact.to_string());
            Ok(())
        }
    }

    fn extract_then_fail(scratch: &mut ScratchArtifacts<'_, FlakyCleaner>) -> Result<(), Locked> {
        scratch.register("RouteBuffer");
        scratch.register("Selection");
        Err(Locked)
    }

    #[rstest]
    fn releases_on_failure_paths() {
        let cleaner = FlakyCleaner::default();
        {
            let mut scratch = ScratchArtifacts::new(&cleaner);
            assert!(extract_then_fail(&mut scratch).is_err());
            assert_eq!(scratch.len(), 2);
        }
        assert_eq!(*cleaner.released.borrow(), ["Selection", "RouteBuffer"]);
    }

    #[rstest]
    fn release_all_counts_failures_and_empties_guard() {
        let cleaner = FlakyCleaner::default();
        let mut scratch = ScratchArtifacts::new(&cleaner);
        scratch.register("summary.lock");
        scratch.register("RouteBuffer");

        assert_eq!(scratch.release_all(), 1);
        assert!(scratch.is_empty());
        assert_eq!(*cleaner.released.borrow(), ["RouteBuffer"]);
    }
}
