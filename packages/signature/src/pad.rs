use pmu_config::file::SignatureConfig;
use thiserror::Error;

use crate::{
    drawing::Drawing,
    gesture::{GestureAction, GestureState, PointerEvent},
    models::{CanvasSize, InvalidCanvasSize, Point, Stroke, StrokeStyle},
    raster::{CaptureError, Rasterizer},
    submit::{SignatureArtifact, SignatureSubmitter},
};

/// A confirm attempt was rejected locally, before anything was rasterized or submitted.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a signature")]
    Empty,
    #[error("A signature is already being confirmed")]
    Busy,
}

#[derive(Debug, Error)]
pub enum ConfirmError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("Failed to submit signature: {0}")]
    Submit(#[source] E),
}

/// The work a confirm attempt has to do, decided by [`SignaturePad::begin_confirm`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmRequest {
    /// Rasterize this snapshot of the finalized strokes.
    Rasterize(Vec<Stroke>),
    /// Nothing new was drawn; reuse the stored signature.
    Baseline(String),
}

/// Freehand signature capture.
///
/// Owns the [`Drawing`] and an optional baseline (a previously stored signature URI).
/// While a confirm is in flight the pad is busy and ignores all input and edits.
#[derive(Debug, Clone)]
pub struct SignaturePad {
    size: CanvasSize,
    style: StrokeStyle,
    drawing: Drawing,
    gesture: GestureState,
    baseline: Option<String>,
    busy: bool,
}

impl SignaturePad {
    /// # Errors
    ///
    /// * If `size` has a zero width or height
    pub fn new(size: CanvasSize) -> Result<Self, InvalidCanvasSize> {
        let size = size.validate()?;

        Ok(Self {
            size,
            style: StrokeStyle::default(),
            drawing: Drawing::new(),
            gesture: GestureState::Idle,
            baseline: None,
            busy: false,
        })
    }

    /// # Errors
    ///
    /// * If the configured canvas has a zero width or height
    pub fn from_config(config: &SignatureConfig) -> Result<Self, InvalidCanvasSize> {
        Ok(
            Self::new(CanvasSize::new(config.canvas_width(), config.canvas_height()))?.with_style(
                StrokeStyle {
                    width: config.stroke_width(),
                    color: config.stroke_color(),
                },
            ),
        )
    }

    /// Shows `uri` as the existing signature. Empty URIs are treated as no baseline.
    #[must_use]
    pub fn with_baseline(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.baseline = (!uri.is_empty()).then_some(uri);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn size(&self) -> CanvasSize {
        self.size
    }

    #[must_use]
    pub const fn style(&self) -> StrokeStyle {
        self.style
    }

    #[must_use]
    pub const fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    #[must_use]
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    #[must_use]
    pub const fn gesture_state(&self) -> GestureState {
        self.gesture
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether confirming would submit anything: new strokes or a baseline.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.drawing.is_empty() || self.baseline.is_some()
    }

    /// Applies a pointer event. Returns `true` if the drawing changed.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        if self.busy {
            log::debug!("handle_event: ignoring {event:?} while confirming");
            return false;
        }

        let (next, action) = self.gesture.transition(event, self.size);

        pmu_logging::debug_or_trace!(
            ("handle_event: {:?} -> {next:?}", self.gesture),
            ("handle_event: {:?} -> {next:?} event={event:?} action={action:?}", self.gesture)
        );

        self.gesture = next;

        match action {
            GestureAction::Begin(point) => self.start_at(point),
            GestureAction::Extend(point) => self.drawing.extend_stroke(point),
            GestureAction::End => self.drawing.end_stroke(),
            GestureAction::EndAndBegin(point) => {
                self.drawing.end_stroke();
                self.start_at(point)
            }
            GestureAction::EndOnly => self.drawing.end_stroke(),
            GestureAction::Ignore => false,
        }
    }

    fn start_at(&mut self, point: Point) -> bool {
        self.drawing.begin_stroke();
        self.drawing.extend_stroke(point)
    }

    /// Starts a new, empty in-progress stroke. Returns `false` while busy.
    pub fn begin_stroke(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.drawing.begin_stroke();
        self.gesture = GestureState::Drawing;
        true
    }

    /// Appends `point` to the in-progress stroke, without any bounds check.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        !self.busy && self.drawing.extend_stroke(point)
    }

    /// Finalizes the in-progress stroke if it has at least one point.
    pub fn end_stroke(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.gesture = GestureState::Idle;
        self.drawing.end_stroke()
    }

    /// Removes the last finalized stroke. The baseline is never affected.
    pub fn undo(&mut self) -> Option<Stroke> {
        if self.busy {
            return None;
        }
        let removed = self.drawing.undo();
        log::debug!(
            "undo: removed={} remaining={}",
            removed.is_some(),
            self.drawing.stroke_count()
        );
        removed
    }

    /// Drops all strokes, finalized and in progress. The baseline is kept, so
    /// [`Self::has_content`] afterwards reports only whether one is present.
    pub fn clear(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.drawing.clear();
        self.gesture = GestureState::Idle;
        log::debug!("clear: baseline_present={}", self.baseline.is_some());
        true
    }

    /// Removes the existing signature so that only new strokes can be confirmed.
    pub fn discard_baseline(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        self.baseline.take()
    }

    /// Validates that there is something to submit and marks the pad busy.
    ///
    /// A stroke still being drawn is discarded and the gesture reset to idle, since
    /// the pointer-up that would end it is ignored while busy.
    ///
    /// Every successful call must be paired with [`Self::finish_confirm`].
    ///
    /// # Errors
    ///
    /// * [`ValidationError::Busy`] if a confirm is already in flight
    /// * [`ValidationError::Empty`] if there are no strokes and no baseline
    pub fn begin_confirm(&mut self) -> Result<ConfirmRequest, ValidationError> {
        if self.busy {
            return Err(ValidationError::Busy);
        }

        let request = match (self.drawing.is_empty(), &self.baseline) {
            (false, _) => ConfirmRequest::Rasterize(self.drawing.strokes().to_vec()),
            (true, Some(baseline)) => ConfirmRequest::Baseline(baseline.clone()),
            (true, None) => {
                log::debug!("begin_confirm: nothing to confirm");
                return Err(ValidationError::Empty);
            }
        };

        if self.drawing.discard_in_progress() {
            log::debug!("begin_confirm: discarded unfinished stroke");
        }
        self.gesture = GestureState::Idle;
        self.busy = true;

        Ok(request)
    }

    /// Makes the pad accept input again after [`Self::begin_confirm`].
    pub const fn finish_confirm(&mut self) {
        self.busy = false;
    }

    /// Rasterizes the drawing (or reuses the baseline) and hands the result to
    /// `submitter`.
    ///
    /// The pad is busy for the whole call and is released on every exit path,
    /// including when the returned future is dropped.
    ///
    /// # Errors
    ///
    /// * If there is nothing to confirm, or a confirm is already in flight
    /// * If rasterization fails
    /// * If the submitter fails
    pub async fn confirm<R, S>(
        &mut self,
        rasterizer: &R,
        submitter: &S,
    ) -> Result<S::Output, ConfirmError<S::Error>>
    where
        R: Rasterizer + ?Sized,
        S: SignatureSubmitter + ?Sized,
    {
        let request = self.begin_confirm()?;
        let size = self.size;
        let style = self.style;
        let _busy = BusyGuard(&mut self.busy);

        let artifact = match request {
            ConfirmRequest::Rasterize(strokes) => {
                log::debug!("confirm: rasterizing {} strokes", strokes.len());
                let image = rasterizer
                    .rasterize(strokes, size, style)
                    .await
                    .inspect_err(|e| log::error!("confirm: capture failed: {e}"))?;
                SignatureArtifact::Image(image)
            }
            ConfirmRequest::Baseline(uri) => {
                log::debug!("confirm: reusing baseline signature");
                SignatureArtifact::Baseline(uri)
            }
        };

        submitter.submit(artifact).await.map_err(|e| {
            log::warn!("confirm: submit failed: {e}");
            ConfirmError::Submit(e)
        })
    }
}

struct BusyGuard<'a>(&'a mut bool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
