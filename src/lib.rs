//! suppress-filter - Email suppression list filtering
//!
//! This library partitions a target email list into "clean" and "suppressed"
//! subsets by matching case-insensitive MD5 fingerprints against a suppression
//! set. Suppression lists distributed as pre-hashed identifiers are recognized
//! and used verbatim rather than double-hashed.
//!
//! # Key Features
//!
//! - **Fingerprint matching**: entries are trimmed, lowercased, and MD5-hashed
//!   before comparison, so `" S@X.com "` and `s@x.com` match
//! - **Pre-hash passthrough**: suppression entries that already look like a
//!   32-hex-digit fingerprint are inserted as-is (lowercased)
//! - **Two input formats**: line-oriented plain text, or CSV with an `email`
//!   column, selected by filename extension
//! - **Order preservation**: both output partitions keep exact input order
//! - **Fast matching**: `FxHashSet` for O(1) fingerprint lookups
//!
//! # Examples
//!
//! ```
//! use suppress_filter::{build_suppression_set, partition, InputFormat};
//!
//! let targets = InputFormat::LineOriented
//!     .parse("a@x.com\nb@x.com\nc@x.com\n".as_bytes(), "emails.txt")
//!     .unwrap();
//! let suppression = InputFormat::LineOriented
//!     .parse("b@x.com\n".as_bytes(), "suppression.txt")
//!     .unwrap();
//!
//! let set = build_suppression_set(&suppression);
//! let result = partition(targets, &set);
//!
//! assert_eq!(result.clean, vec!["a@x.com", "c@x.com"]);
//! assert_eq!(result.suppressed, vec!["b@x.com"]);
//! ```

pub mod filter;
pub mod fingerprint;
pub mod parser;

pub use filter::{
    build_suppression_set, partition, partition_streams, write_entries, PartitionResult,
    SuppressionSet,
};
pub use fingerprint::{fingerprint, is_fingerprint};
pub use parser::{InputFormat, ParseError};
