/// One step of the wildcard fallback walk
///
/// `remaining` is the directory to check for a wildcard file; `consumed` is
/// what that file would absorb, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackStep<'s, 'a> {
    pub remaining: &'s [&'a str],
    pub consumed: &'s [&'a str],
}

/// Lazy iterator over wildcard fallback candidates, deepest directory first
///
/// For segments `["a", "b", "c"]`, yields:
/// `a/b` absorbing `c` → `a` absorbing `b/c` → root absorbing `a/b/c`.
///
/// Both halves borrow from the input slice, so the walk never allocates and
/// never reverses anything. Pair it with `find_map()` to stop at the first
/// directory that has a wildcard file.
///
/// # Examples
///
/// ```
/// use folio_router::path::WildcardFallback;
///
/// let segments = ["blog", "2024", "post-1"];
/// let first = WildcardFallback::new(&segments).next().unwrap();
/// assert_eq!(first.remaining, &["blog", "2024"]);
/// assert_eq!(first.consumed, &["post-1"]);
/// ```
#[derive(Debug, Clone)]
pub struct WildcardFallback<'s, 'a> {
    segments: &'s [&'a str],
    popped: usize,
}

impl<'s, 'a> WildcardFallback<'s, 'a> {
    /// Starts a walk over `segments`; nothing has been popped yet
    pub fn new(segments: &'s [&'a str]) -> Self {
        Self {
            segments,
            popped: 0,
        }
    }
}

impl<'s, 'a> Iterator for WildcardFallback<'s, 'a> {
    type Item = FallbackStep<'s, 'a>;

    /// Pops one more trailing segment and yields the resulting split
    ///
    /// Stops once every segment has been consumed; the root is checked
    /// exactly once, on the last step.
    fn next(&mut self) -> Option<Self::Item> {
        if self.popped >= self.segments.len() {
            return None;
        }

        self.popped += 1;
        let (remaining, consumed) = self.segments.split_at(self.segments.len() - self.popped);

        Some(FallbackStep {
            remaining,
            consumed,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.segments.len() - self.popped;
        (left, Some(left))
    }
}

impl ExactSizeIterator for WildcardFallback<'_, '_> {}
