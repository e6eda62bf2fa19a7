use std::path::{Path, PathBuf};

/// Something that can answer "does this route file exist?"
///
/// Keys are root-relative and `/`-separated, e.g. `blog/[slug].html`.
/// Implemented for [`FsSource`] and for any `Fn(&str) -> bool`, which keeps
/// the resolver testable without touching the disk.
pub trait RouteSource {
    fn contains(&self, relative: &str) -> bool;
}

impl<F> RouteSource for F
where
    F: Fn(&str) -> bool,
{
    fn contains(&self, relative: &str) -> bool {
        self(relative)
    }
}

/// Route files under a directory on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (or root-joined) location of a route key
    pub fn path_of(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl RouteSource for FsSource {
    fn contains(&self, relative: &str) -> bool {
        self.path_of(relative).is_file()
    }
}
