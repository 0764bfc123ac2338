use async_trait::async_trait;
use bytes::Bytes;
use pmu_config::file::SignatureConfig;
use pmu_image::{Color, Encoding, data_uri, image::RasterizeError};
use thiserror::Error;

use crate::models::{CanvasSize, Stroke, StrokeStyle};

/// Rasterizing the drawing failed. The user may retry by confirming again.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to capture signature: {0}")]
    Rasterize(#[from] RasterizeError),
}

/// An encoded image of a drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    pub encoding: Encoding,
    pub bytes: Bytes,
    /// The bytes as a base64 `data:` URI.
    pub data_uri: String,
}

impl SignatureImage {
    #[must_use]
    pub fn new(encoding: Encoding, bytes: Bytes) -> Self {
        let data_uri = data_uri(encoding, &bytes);
        Self {
            encoding,
            bytes,
            data_uri,
        }
    }
}

/// Turns stroke data into an image.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// # Errors
    ///
    /// * If the drawing could not be rendered or encoded
    async fn rasterize(
        &self,
        strokes: Vec<Stroke>,
        size: CanvasSize,
        style: StrokeStyle,
    ) -> Result<SignatureImage, CaptureError>;
}

/// Renders the stored polylines in software on the blocking thread pool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SoftwareRasterizer {
    pub encoding: Encoding,
    pub background: Color,
    pub jpeg_quality: u8,
}

impl Default for SoftwareRasterizer {
    fn default() -> Self {
        Self {
            encoding: Encoding::Png,
            background: Color::TRANSPARENT,
            jpeg_quality: pmu_config::file::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl From<&SignatureConfig> for SoftwareRasterizer {
    fn from(value: &SignatureConfig) -> Self {
        Self {
            encoding: value.encoding(),
            background: value.background(),
            jpeg_quality: value.jpeg_quality(),
        }
    }
}

#[async_trait]
impl Rasterizer for SoftwareRasterizer {
    async fn rasterize(
        &self,
        strokes: Vec<Stroke>,
        size: CanvasSize,
        style: StrokeStyle,
    ) -> Result<SignatureImage, CaptureError> {
        let polylines = strokes
            .iter()
            .filter(|x| x.is_renderable())
            .map(Stroke::to_polyline)
            .collect::<Vec<_>>();

        log::debug!(
            "Rasterizing {} of {} strokes onto {}x{} canvas",
            polylines.len(),
            strokes.len(),
            size.width,
            size.height
        );

        let bytes = pmu_image::image::try_rasterize_async(
            size.width,
            size.height,
            polylines,
            style.into(),
            self.background,
            self.encoding,
            self.jpeg_quality,
        )
        .await?;

        Ok(SignatureImage::new(self.encoding, bytes))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Point;

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        Stroke::from(points.iter().copied().map(Point::from).collect::<Vec<_>>())
    }

    #[test_log::test(tokio::test)]
    async fn software_rasterizer_produces_png_data_uri() {
        let image = SoftwareRasterizer::default()
            .rasterize(
                vec![stroke(&[(1.0, 1.0), (20.0, 10.0)])],
                CanvasSize::new(32, 16),
                StrokeStyle::default(),
            )
            .await
            .unwrap();

        assert_eq!(image.encoding, Encoding::Png);
        assert!(image.data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(&image.bytes[..4], b"\x89PNG");
    }

    #[test_log::test(tokio::test)]
    async fn zero_sized_canvas_is_a_capture_error() {
        let result = SoftwareRasterizer::default()
            .rasterize(
                vec![stroke(&[(1.0, 1.0), (2.0, 2.0)])],
                CanvasSize::new(0, 0),
                StrokeStyle::default(),
            )
            .await;

        assert!(matches!(
            result,
            Err(CaptureError::Rasterize(RasterizeError::EmptyCanvas { .. }))
        ));
    }

    #[test_log::test]
    fn config_selects_encoding_and_background() {
        let config = SignatureConfig {
            encoding: Some(Encoding::Jpeg),
            background: Some(Color::WHITE),
            jpeg_quality: Some(70),
            ..SignatureConfig::default()
        };

        let rasterizer = SoftwareRasterizer::from(&config);

        assert_eq!(rasterizer.encoding, Encoding::Jpeg);
        assert_eq!(rasterizer.background, Color::WHITE);
        assert_eq!(rasterizer.jpeg_quality, 70);
    }
}
