//! Vision-classification collaborator.
//!
//! The external vision-AI service receives an image payload and returns a
//! structured [`Classification`]. The [`BoardClassifier`] trait is the
//! seam between the scan service and the wire client so tests can supply
//! a deterministic classifier.

// Consumed only through generic service types; auto traits resolve at the
// concrete call sites.
#![allow(async_fn_in_trait)]

pub mod http;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use http::HttpClassifier;

/// Structured result returned by the vision collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Canonical board type (e.g. `"smartphone mainboard"`).
    pub board_type: String,
    /// Board category.
    pub category: String,
    /// Device type the board likely came from.
    pub device_type: String,
    /// Manufacturer, when identifiable.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Model, when identifiable.
    #[serde(default)]
    pub model: Option<String>,
    /// Model confidence; clamped to `[0, 1]` by [`clamp_confidence`].
    pub confidence: f64,
    /// Notable components spotted on the board.
    #[serde(default)]
    pub components: Vec<String>,
    /// Narrative description of the board.
    #[serde(default)]
    pub description: String,
}

/// Classifies a board image into a [`Classification`].
pub trait BoardClassifier {
    /// Runs the classification call.
    ///
    /// The image travels as a base64 payload; any transport or upstream
    /// failure surfaces as [`AppError::Upstream`] and aborts the whole
    /// scan-create operation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] when the collaborator errors or
    /// times out.
    async fn classify(&self, image_b64: &str) -> Result<Classification, AppError>;
}

/// Clamps an upstream confidence score to `[0, 1]`.
///
/// Non-finite values collapse to 0.
#[must_use]
pub fn clamp_confidence(raw: f64) -> f64 {
    if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 }
}
