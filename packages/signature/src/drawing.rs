use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{Point, Stroke};

/// Finalized strokes plus at most one stroke still being drawn.
///
/// Only finalized strokes are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    current: Option<Vec<Point>>,
}

impl Drawing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new in-progress stroke, finalizing any stroke left open.
    pub fn begin_stroke(&mut self) {
        if self.current.is_some() {
            log::debug!("begin_stroke: previous stroke was never ended, finalizing it");
            self.end_stroke();
        }
        self.current = Some(Vec::new());
    }

    /// Appends a point to the in-progress stroke.
    ///
    /// Points are recorded as-is, even outside the canvas. Returns `false` when no
    /// stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        self.current.as_mut().is_some_and(|current| {
            current.push(point);
            true
        })
    }

    /// Finalizes the in-progress stroke if it recorded at least one point.
    ///
    /// Returns `true` when a stroke was added to the finalized list.
    pub fn end_stroke(&mut self) -> bool {
        match self.current.take() {
            Some(points) if !points.is_empty() => {
                log::trace!("end_stroke: finalized stroke with {} points", points.len());
                self.strokes.push(Stroke::from(points));
                true
            }
            _ => false,
        }
    }

    /// Drops the in-progress stroke without finalizing it.
    ///
    /// Returns `true` if a stroke was in progress.
    pub fn discard_in_progress(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Removes and returns the most recently finalized stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Drops every finalized and in-progress stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[must_use]
    pub fn in_progress(&self) -> Option<&[Point]> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// `true` when there are no finalized strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn renderable_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().filter(|x| x.is_renderable())
    }

    /// SVG path data (`d` attribute) for every visible stroke, the in-progress one last.
    #[must_use]
    pub fn svg_path_data(&self) -> Vec<String> {
        self.strokes
            .iter()
            .map(Stroke::points)
            .chain(self.current.as_deref())
            .filter(|points| points.len() >= 2)
            .map(path_data)
            .collect()
    }
}

fn path_data(points: &[Point]) -> String {
    let mut data = String::new();

    for (index, point) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        if index > 0 {
            data.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(data, "{command}{} {}", point.x, point.y);
    }

    data
}
