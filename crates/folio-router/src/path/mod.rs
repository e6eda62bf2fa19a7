/// Path utilities for splitting request paths and building route keys
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
pub mod hierarchy;
pub use hierarchy::{FallbackStep, WildcardFallback};

/// Splits a request path into its non-empty segments
///
/// Both `/` and `\` separate segments, so `/blog//2024\post` and
/// `/blog/2024/post` split identically.
///
/// Returns `None` if any segment is `.` or `..`; such a path could name a
/// file outside the route root and never resolves.
///
/// # Examples
///
/// ```
/// use folio_router::path::split_segments;
///
/// assert_eq!(split_segments("/blog/2024/post-1"), Some(vec!["blog", "2024", "post-1"]));
/// assert_eq!(split_segments("/docs/"), Some(vec!["docs"]));
/// assert_eq!(split_segments("/"), Some(vec![]));
/// assert_eq!(split_segments("/a/../b"), None);
/// ```
pub fn split_segments(path: &str) -> Option<Vec<&str>> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .try_fold(Vec::new(), |mut segments, segment| {
            if segment == "." || segment == ".." {
                return None;
            }
            segments.push(segment);
            Some(segments)
        })
}

/// Whether the path asks for the index resource of a directory
///
/// ```
/// use folio_router::path::requests_index;
///
/// assert!(requests_index("/"));
/// assert!(requests_index("/docs/"));
/// assert!(!requests_index("/docs"));
/// ```
pub fn requests_index(path: &str) -> bool {
    path.is_empty() || path.ends_with('/') || path.ends_with('\\')
}

/// Joins directory segments and a file name into a root-relative route key
///
/// ```
/// use folio_router::path::join_route;
///
/// assert_eq!(join_route(&["blog"], "[slug].html"), "blog/[slug].html");
/// assert_eq!(join_route(&[], "[slug].html"), "[slug].html");
/// ```
pub fn join_route(dirs: &[&str], file: &str) -> String {
    if dirs.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dirs.join("/"), file)
    }
}
