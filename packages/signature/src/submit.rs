use async_trait::async_trait;

use crate::raster::SignatureImage;

/// What a confirmed signature pad hands to its submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureArtifact {
    /// A freshly rasterized drawing.
    Image(SignatureImage),
    /// The previously stored signature, passed through unchanged.
    Baseline(String),
}

impl SignatureArtifact {
    /// The image reference: a `data:` URI for new drawings, the stored URI otherwise.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Image(image) => &image.data_uri,
            Self::Baseline(uri) => uri,
        }
    }

    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        matches!(self, Self::Baseline(_))
    }
}

/// Persists a confirmed signature, typically by uploading it and attaching the
/// resulting URL to an appointment or profile.
#[async_trait]
pub trait SignatureSubmitter: Send + Sync {
    /// Whatever the submitter produces on success, e.g. the stored URL.
    type Output: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// * If the signature could not be stored
    async fn submit(&self, artifact: SignatureArtifact) -> Result<Self::Output, Self::Error>;
}
