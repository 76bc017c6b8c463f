//! Cotejar: visual regression reporting for screenshot-producing test runs.
//!
//! Cotejar (Spanish: "to collate, to compare side by side") accepts rendered
//! screenshots one at a time, compares each against a previously accepted
//! gold reference on disk, and accumulates a single pass/fail verdict that
//! the enclosing test queries at the end of the run.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     COTEJAR Report Session                       │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  submit(id, png) ──► Registry ──► current/<id>.png               │
//! │                         │                                        │
//! │                    gold exists? ──no──► new baseline (warn)      │
//! │                         │yes                                     │
//! │              ┌──── decode join ────┐                             │
//! │              │ gold      current   │   (both must complete)      │
//! │              └─────────┬───────────┘                             │
//! │                   DiffEngine ──► diff/<id>.png                   │
//! │                         │                                        │
//! │                  n > 0? ──yes──► Failure Set (error)             │
//! │                                                                  │
//! │  assert_no_failures() ──► one verdict for the whole run          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gold directory is populated out-of-band by promoting an accepted
//! current image; cotejar itself never writes it.

#![warn(missing_docs)]

mod codec;
mod diff;
mod layout;
mod report;
mod result;

pub use codec::{ImageCodec, PixelImage, PngCodec};
pub use diff::{ChannelDiff, DiffEngine, DiffOptions, DiffOutcome, IgnorePixel};
pub use layout::ReportLayout;
pub use report::{Report, ReportConfig, ReportSummary};
pub use result::{CotejarError, CotejarResult};
