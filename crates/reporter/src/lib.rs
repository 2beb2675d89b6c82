//! RunStats Reporter
//!
//! Run-completion reporter for end-to-end browser test suites. When the
//! run ends it:
//! - Resolves the JSON results file written by the test framework
//! - Reads it as an opaque JSON document
//! - POSTs it to a stats collector with bearer authentication
//! - Classifies failures (connection refused vs. everything else)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ReporterRegistry::dispatch_end              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StatsReporter (Reporter)                                   │
//! │    ├── new(ReporterConfig)        -> no I/O                 │
//! │    └── on_end(FullResult)                                   │
//! │          ├── Endpoint::parse      -> Configuration          │
//! │          ├── ResultsPayload::load -> ArtifactRead           │
//! │          └── POST (http | https)  -> ConnectionRefused      │
//! │                                     | HttpStatus            │
//! │                                     | Transport             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod reporter;
pub mod transport;
pub mod uploader;

pub use config::ReporterConfig;
pub use error::{ErrorKind, ReporterError, ReporterResult};
pub use reporter::{FullResult, Reporter, ReporterRegistry, RunStatus};
pub use uploader::{StatsReporter, UploadOutcome};
