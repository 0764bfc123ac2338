//! Freehand signature capture.
//!
//! A [`SignaturePad`] collects pointer drags as strokes, supports undo and clear, and
//! on confirm either rasterizes the strokes or passes a previously stored signature
//! (the *baseline*) through unchanged to a caller-supplied [`SignatureSubmitter`].
//!
//! # Core Types
//!
//! * [`SignaturePad`] - The capture component and its confirm flow
//! * [`drawing::Drawing`] - Finalized strokes plus the stroke being drawn
//! * [`gesture::GestureState`] - Idle/Drawing state machine for pointer events
//! * [`Rasterizer`] - Capability that turns strokes into an encoded image
//!
//! # Examples
//!
//! ```rust,no_run
//! use pmu_signature::{
//!     CanvasSize, Point, PointerEvent, SignatureArtifact, SignaturePad, SignatureSubmitter,
//!     SoftwareRasterizer, async_trait,
//! };
//!
//! struct Upload;
//!
//! #[async_trait]
//! impl SignatureSubmitter for Upload {
//!     type Output = String;
//!     type Error = std::io::Error;
//!
//!     async fn submit(&self, artifact: SignatureArtifact) -> Result<String, std::io::Error> {
//!         Ok(artifact.uri().to_string())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pad = SignaturePad::new(CanvasSize::new(300, 150))?;
//!
//! pad.handle_event(PointerEvent::Down(Point::new(10.0, 10.0)));
//! pad.handle_event(PointerEvent::Move(Point::new(80.0, 40.0)));
//! pad.handle_event(PointerEvent::Up);
//!
//! let uri = pad.confirm(&SoftwareRasterizer::default(), &Upload).await?;
//! assert!(uri.starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod drawing;
pub mod gesture;
pub mod models;
pub mod pad;
pub mod raster;
pub mod submit;

pub use async_trait::async_trait;
pub use gesture::PointerEvent;
pub use models::{CanvasSize, InvalidCanvasSize, Point, Stroke, StrokeStyle};
pub use pad::{ConfirmError, ConfirmRequest, SignaturePad, ValidationError};
pub use raster::{CaptureError, Rasterizer, SignatureImage, SoftwareRasterizer};
pub use submit::{SignatureArtifact, SignatureSubmitter};
