//! Capture registry, diff orchestration, and the end-of-run verdict.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::codec::{ImageCodec, PixelImage, PngCodec};
use crate::diff::{ChannelDiff, DiffEngine, DiffOptions, IgnorePixel};
use crate::layout::ReportLayout;
use crate::result::{CotejarError, CotejarResult};

/// Configuration for a report session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Per-pixel tolerance forwarded to the diff engine (0 = exact match)
    pub tolerance: u32,
}

impl ReportConfig {
    /// Set the per-pixel tolerance
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Serializable summary of a report session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total captures submitted this session
    pub captures: usize,
    /// Captures that had a gold reference and were compared
    pub compared: usize,
    /// Ids captured for the first time (no gold reference yet)
    pub new_baselines: Vec<String>,
    /// Ids whose comparison deviated from gold
    pub failures: Vec<String>,
}

/// A visual regression report session.
///
/// Owns the artifact folder layout, the registry of used capture ids, and
/// the accumulated failure set. Captures are submitted one at a time; the
/// verdict is queried once every submission has settled.
///
/// ```no_run
/// # async fn run() -> cotejar::CotejarResult<()> {
/// let mut report = cotejar::Report::new("target/visual-report")?;
/// let matched = report.submit_bytes("login-button", &screenshot_png(), None).await?;
/// assert!(matched);
/// report.assert_no_failures();
/// # Ok(())
/// # }
/// # fn screenshot_png() -> Vec<u8> { Vec::new() }
/// ```
pub struct Report {
    layout: ReportLayout,
    config: ReportConfig,
    codec: Box<dyn ImageCodec>,
    engine: Box<dyn DiffEngine>,
    registry: HashSet<String>,
    failures: Vec<String>,
    new_baselines: Vec<String>,
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("layout", &self.layout)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("failures", &self.failures)
            .field("new_baselines", &self.new_baselines)
            .finish_non_exhaustive()
    }
}

impl Report {
    /// Open a session at the given root with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Layout`] when the artifact directories cannot
    /// be created.
    pub fn new(root: impl Into<PathBuf>) -> CotejarResult<Self> {
        Self::with_config(root, ReportConfig::default())
    }

    /// Open a session with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Layout`] when the artifact directories cannot
    /// be created.
    pub fn with_config(root: impl Into<PathBuf>, config: ReportConfig) -> CotejarResult<Self> {
        let layout = ReportLayout::new(root);
        layout.ensure()?;
        Ok(Self {
            layout,
            config,
            codec: Box::new(PngCodec),
            engine: Box::new(ChannelDiff),
            registry: HashSet::new(),
            failures: Vec::new(),
            new_baselines: Vec::new(),
        })
    }

    /// Substitute the image codec (tests, alternative formats)
    #[must_use]
    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Substitute the diff engine
    #[must_use]
    pub fn with_engine(mut self, engine: impl DiffEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Folder layout of this session
    #[must_use]
    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Submit a base64-encoded PNG capture.
    ///
    /// Decodes the payload and delegates to [`Report::submit_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Base64`] on a malformed payload, plus every
    /// error [`Report::submit_bytes`] can return.
    pub async fn submit(
        &mut self,
        id: &str,
        png_base64: &str,
        ignore: Option<IgnorePixel<'_>>,
    ) -> CotejarResult<bool> {
        let bytes = STANDARD.decode(png_base64)?;
        self.submit_bytes(id, &bytes, ignore).await
    }

    /// Submit a capture and compare it against its gold reference.
    ///
    /// Resolves `Ok(true)` when the capture matches gold or establishes a
    /// new baseline, `Ok(false)` when it deviates. A deviation is recorded
    /// in the failure set and surfaced again by [`Report::assert_no_failures`];
    /// it is never an error, so one run reports every deviation.
    ///
    /// # Errors
    ///
    /// - [`CotejarError::EmptyCaptureId`] when `id` is empty.
    /// - [`CotejarError::DuplicateCapture`] when `id` was already submitted
    ///   this session; rejected before any file is written.
    /// - [`CotejarError::Decode`] when gold or current bytes are malformed.
    /// - [`CotejarError::Io`] on filesystem failures.
    pub async fn submit_bytes(
        &mut self,
        id: &str,
        bytes: &[u8],
        ignore: Option<IgnorePixel<'_>>,
    ) -> CotejarResult<bool> {
        if id.is_empty() {
            return Err(CotejarError::EmptyCaptureId);
        }
        // Check-and-insert in one synchronous step, before any I/O.
        if !self.registry.insert(id.to_owned()) {
            return Err(CotejarError::DuplicateCapture { id: id.to_owned() });
        }

        let current_path = self.layout.current_path(id);
        tokio::fs::write(&current_path, bytes).await?;

        let gold_path = self.layout.gold_path(id);
        if !gold_path.exists() {
            self.new_baselines.push(id.to_owned());
            warn!(
                id,
                path = %current_path.display(),
                "new baseline recorded; no gold reference yet"
            );
            return Ok(true);
        }

        // Join barrier: both reads decode independently, comparison starts
        // only once both buffers are in hand.
        let codec = self.codec.as_ref();
        let (gold, current) = tokio::try_join!(
            read_image(codec, &gold_path),
            read_image(codec, &current_path),
        )?;

        if gold.dimensions() != current.dimensions() {
            self.failures.push(id.to_owned());
            error!(
                id,
                gold = ?gold.dimensions(),
                current = ?current.dimensions(),
                "deviation from gold: image dimensions differ"
            );
            return Ok(false);
        }

        let options = DiffOptions::default().with_tolerance(self.config.tolerance);
        let outcome = self.engine.diff(&gold, &current, options, ignore);

        let diff_path = self.layout.diff_path(id);
        let encoded = self.codec.encode(&outcome.image)?;
        tokio::fs::write(&diff_path, encoded).await?;

        if outcome.differing > 0 {
            self.failures.push(id.to_owned());
            error!(
                id,
                differing = outcome.differing,
                path = %diff_path.display(),
                "deviation from gold"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Ids whose comparison deviated from gold, in submission order
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Ids captured for the first time this session, in submission order
    #[must_use]
    pub fn new_baselines(&self) -> &[String] {
        &self.new_baselines
    }

    /// Number of captures submitted this session
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether no capture has deviated from gold
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail the enclosing test when any capture deviated from gold.
    ///
    /// Call after every submission has settled. Idempotent: repeated calls
    /// report the same outcome.
    ///
    /// # Panics
    ///
    /// Panics with the failure count and ids when the failure set is
    /// non-empty.
    pub fn assert_no_failures(&self) {
        assert!(
            self.failures.is_empty(),
            "{} capture(s) deviated from gold: {}",
            self.failures.len(),
            self.failures.join(", ")
        );
    }

    /// Summarize the session
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            captures: self.registry.len(),
            compared: self.registry.len() - self.new_baselines.len(),
            new_baselines: self.new_baselines.clone(),
            failures: self.failures.clone(),
        }
    }

    /// Persist the session summary as `<root>/report.json`.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Json`] or [`CotejarError::Io`] when the
    /// summary cannot be serialized or written.
    pub async fn write_summary(&self) -> CotejarResult<PathBuf> {
        let path = self.layout.root().join("report.json");
        let json = serde_json::to_vec_pretty(&self.summary())?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }
}

/// Read and decode one artifact; decode errors name the offending file.
async fn read_image(codec: &dyn ImageCodec, path: &Path) -> CotejarResult<PixelImage> {
    let bytes = tokio::fs::read(path).await?;
    match codec.decode(&bytes) {
        Ok(image) => Ok(image),
        Err(CotejarError::Decode { message }) => Err(CotejarError::Decode {
            message: format!("{}: {message}", path.display()),
        }),
        Err(other) => Err(other),
    }
}
