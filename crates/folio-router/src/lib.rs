//! # Folio Router
//!
//! A zero-dependency file-system route resolver. One routine serves both
//! page lookup (`routes/about.html`, `routes/blog/[slug].html`) and JSON
//! handler lookup (`routes/api/users.json`, `routes/api/users/[slug].json`).
//!
//! ## Resolution order
//!
//! 1. **Literal**: the pathname mirrored under the root plus a suffix
//!    (`/about` → `about.html`, `/docs/` → `docs/index.html`).
//! 2. **Wildcard fallback**: pop trailing segments one at a time and look for
//!    the wildcard file in the remaining directory. The first directory that
//!    has one wins, so the match closest to the full path is always chosen.
//!
//! Popped segments become the wildcard value, kept in request order:
//! `/blog/2024/post-1` against `blog/[slug].html` yields `"2024/post-1"`.
//!
//! ## Example
//!
//! ```
//! use folio_router::{resolve, LookupRule};
//!
//! let files = ["blog/[slug].html"];
//! let source = |relative: &str| files.iter().any(|f| *f == relative);
//!
//! let found = resolve(&source, "/blog/2024/post-1", &LookupRule::PAGE).unwrap();
//! assert_eq!(found.file_path, "blog/[slug].html");
//! assert_eq!(found.wildcard_value.as_deref(), Some("2024/post-1"));
//! assert_eq!(found.matched_prefix.as_deref(), Some("blog"));
//! ```

pub mod path;
mod source;

pub use path::{join_route, requests_index, split_segments, FallbackStep, WildcardFallback};
pub use source::{FsSource, RouteSource};

// ============================================================================
// Core Types
// ============================================================================

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    /// Matched file, relative to the root and `/`-separated
    pub file_path: String,
    /// Trailing segments absorbed by a wildcard file, joined with `/`
    pub wildcard_value: Option<String>,
    /// Directory holding the matched wildcard file (empty at the root)
    pub matched_prefix: Option<String>,
}

impl ResolvedMatch {
    /// A match on the literal candidate
    pub fn literal(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            wildcard_value: None,
            matched_prefix: None,
        }
    }

    /// Whether this match came from the wildcard fallback
    pub fn is_wildcard(&self) -> bool {
        self.wildcard_value.is_some()
    }
}

/// Naming conventions that parameterise [`resolve`]
///
/// Pages and handlers differ only in these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRule {
    /// Appended to the pathname to form the literal candidate
    pub literal_suffix: &'static str,
    /// File stem used when the pathname ends in `/`; `None` disables index lookup
    pub index_name: Option<&'static str>,
    /// File name tested in each directory during wildcard fallback
    pub wildcard_file: &'static str,
}

impl LookupRule {
    /// HTML page definitions
    pub const PAGE: LookupRule = LookupRule {
        literal_suffix: ".html",
        index_name: Some("index"),
        wildcard_file: "[slug].html",
    };

    /// JSON handler definitions
    pub const HANDLER: LookupRule = LookupRule {
        literal_suffix: ".json",
        index_name: None,
        wildcard_file: "[slug].json",
    };

    /// Builds the literal candidate for already-split segments
    ///
    /// Returns `None` when the rule has no candidate for this shape of path,
    /// e.g. a trailing `/` under a rule without an index name.
    pub fn literal_candidate(&self, segments: &[&str], wants_index: bool) -> Option<String> {
        if wants_index {
            let index = self.index_name?;
            let file = format!("{}{}", index, self.literal_suffix);
            return Some(join_route(segments, &file));
        }

        let (last, dirs) = segments.split_last()?;
        let file = format!("{}{}", last, self.literal_suffix);
        Some(join_route(dirs, &file))
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves `pathname` against `source` using `rule`
///
/// Literal matches always win over wildcard matches. Among wildcard files the
/// one in the deepest directory (fewest popped segments) wins. A pathname
/// with no segments never reaches the wildcard search, and a pathname with a
/// `.` or `..` segment never resolves.
pub fn resolve<S>(source: &S, pathname: &str, rule: &LookupRule) -> Option<ResolvedMatch>
where
    S: RouteSource + ?Sized,
{
    let segments = split_segments(pathname)?;

    if let Some(candidate) = rule.literal_candidate(&segments, requests_index(pathname)) {
        if source.contains(&candidate) {
            return Some(ResolvedMatch::literal(candidate));
        }
    }

    WildcardFallback::new(&segments).find_map(|step| {
        let candidate = join_route(step.remaining, rule.wildcard_file);
        source.contains(&candidate).then(|| ResolvedMatch {
            file_path: candidate,
            wildcard_value: Some(step.consumed.join("/")),
            matched_prefix: Some(step.remaining.join("/")),
        })
    })
}
