//! squawk-review domain model
//!
//! Pure building blocks of a review run:
//! - Platform: host OS/arch → release asset tokens
//! - ChangedFile / FilePattern: which pull request files get linted
//! - RawViolation: squawk's JSON report
//! - Diagnostic / DiagnosticSet: rdjson documents for reviewdog
//! - translate: RawViolation → Diagnostic
//!
//! Nothing in this crate performs I/O.

pub mod changeset;
pub mod error;
pub mod platform;
pub mod rdjson;
pub mod translate;
pub mod violation;

pub use changeset::{filter, ChangedFile, FilePattern};
pub use error::{Result, ReviewError};
pub use platform::{resolve, Platform};
pub use rdjson::{Code, Diagnostic, DiagnosticSet, Location, Source};
pub use translate::{squawk_source, translate, RULE_DOCS_BASE_URL};
pub use violation::{parse_report, RawViolation, ViolationMessage};
