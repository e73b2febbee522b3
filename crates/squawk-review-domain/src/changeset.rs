//! Pull request changesets and eligibility filtering.

use crate::error::{Result, ReviewError};
use globset::{GlobBuilder, GlobMatcher};

/// One file of a pull request diff listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub path: String,

    /// Number of added lines.
    pub additions: u64,

    /// Total number of changed lines (additions + deletions).
    pub total_changes: u64,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, additions: u64, total_changes: u64) -> Self {
        Self {
            path: path.into(),
            additions,
            total_changes,
        }
    }

    /// Whether the listing reports any textual delta for this file.
    ///
    /// Pure renames are listed with zero counts and are skipped.
    pub fn has_delta(&self) -> bool {
        !(self.additions == 0 && self.total_changes == 0)
    }

    /// Whether this file should be linted under `pattern`.
    pub fn is_eligible(&self, pattern: &FilePattern) -> bool {
        self.has_delta() && pattern.matches(&self.path)
    }
}

/// Compiled inclusion glob.
///
/// `*` stays within one path segment, `**` spans segments, and brace and
/// bracket classes are supported.
///
/// Wildcards never match a path segment that starts with `.`. Such a segment
/// only matches a pattern segment that starts with `.` itself, so
/// `migrations/*.sql` skips `migrations/.draft.sql` while `.github/*.sql`
/// still selects `.github/x.sql`.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    matcher: GlobMatcher,
    dot_segments: Vec<GlobMatcher>,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let matcher = compile(pattern, pattern)?;
        let dot_segments = pattern
            .split('/')
            .filter(|segment| segment.starts_with('.'))
            .map(|segment| compile(pattern, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
            dot_segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
            && path
                .split('/')
                .filter(|segment| segment.starts_with('.'))
                .all(|segment| self.dot_segments.iter().any(|m| m.is_match(segment)))
    }
}

fn compile(pattern: &str, glob: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ReviewError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Eligible files of `files`, lazily and in listing order.
///
/// The returned iterator is `Clone`, so callers can walk the selection more
/// than once without re-evaluating the listing.
pub fn filter<'a>(
    files: &'a [ChangedFile],
    pattern: &'a FilePattern,
) -> impl Iterator<Item = &'a ChangedFile> + Clone + 'a {
    files.iter().filter(move |file| file.is_eligible(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(p: &str) -> FilePattern {
        FilePattern::new(p).expect("valid pattern")
    }

    #[test]
    fn test_filter_examples() {
        let pattern = pattern("migrations/*.sql");
        let files = vec![
            ChangedFile::new("migrations/001.sql", 3, 3),
            ChangedFile::new("migrations/002.sql", 0, 0),
            ChangedFile::new("README.md", 5, 5),
        ];

        let selected: Vec<_> = filter(&files, &pattern).map(|f| f.path.as_str()).collect();
        assert_eq!(selected, vec!["migrations/001.sql"]);
    }

    #[test]
    fn test_deletions_only_still_eligible() {
        let pattern = pattern("migrations/*.sql");
        let file = ChangedFile::new("migrations/003.sql", 0, 4);
        assert!(file.is_eligible(&pattern));
    }

    #[test]
    fn test_filter_preserves_order_and_restarts() {
        let pattern = pattern("**/*.sql");
        let files = vec![
            ChangedFile::new("db/b.sql", 1, 1),
            ChangedFile::new("src/main.rs", 1, 1),
            ChangedFile::new("db/a.sql", 2, 2),
            ChangedFile::new("db/nested/c.sql", 1, 2),
        ];

        let selection = filter(&files, &pattern);
        let first: Vec<_> = selection.clone().map(|f| f.path.clone()).collect();
        let second: Vec<_> = selection.map(|f| f.path.clone()).collect();

        assert_eq!(first, vec!["db/b.sql", "db/a.sql", "db/nested/c.sql"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let pattern = pattern("migrations/*.sql");
        assert!(pattern.matches("migrations/001.sql"));
        assert!(!pattern.matches("migrations/old/001.sql"));
    }

    #[test]
    fn test_wildcards_skip_dot_segments() {
        let star = pattern("migrations/*.sql");
        assert!(!star.matches("migrations/.draft.sql"));

        let globstar = pattern("**/*.sql");
        assert!(globstar.matches("db/001.sql"));
        assert!(!globstar.matches(".github/x.sql"));
        assert!(!globstar.matches("db/.hidden/001.sql"));

        let explicit = pattern(".github/*.sql");
        assert!(explicit.matches(".github/x.sql"));
        assert!(!explicit.matches(".github/.x.sql"));

        let dotted_name = pattern("migrations/.*.sql");
        assert!(dotted_name.matches("migrations/.draft.sql"));
    }

    #[test]
    fn test_braces_and_classes() {
        let braces = pattern("{migrations,schema}/*.sql");
        assert!(braces.matches("migrations/1.sql"));
        assert!(braces.matches("schema/1.sql"));
        assert!(!braces.matches("seeds/1.sql"));

        let class = pattern("migrations/[0-9]*.sql");
        assert!(class.matches("migrations/42_add_users.sql"));
        assert!(!class.matches("migrations/add_users.sql"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FilePattern::new("migrations/[.sql").unwrap_err();
        assert!(matches!(err, ReviewError::InvalidPattern { .. }));
    }
}
