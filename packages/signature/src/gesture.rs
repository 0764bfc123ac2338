//! Pointer gesture handling as an explicit two-state machine.
//!
//! Hosts translate their toolkit's touch or mouse callbacks into [`PointerEvent`]s and
//! feed them, in order, to [`GestureState::transition`]. The returned
//! [`GestureAction`] says what to do to the [`crate::drawing::Drawing`].

use crate::models::{CanvasSize, Point};

/// Discrete pointer input from the host toolkit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// The host lost track of the pointer (e.g. the gesture was stolen by a scroll view).
    Cancel,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
}

/// Effect of a single event on the drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GestureAction {
    /// Start a stroke whose first point is the pointer-down position.
    Begin(Point),
    Extend(Point),
    End,
    /// A pointer-down arrived without the preceding pointer-up.
    EndAndBegin(Point),
    /// A pointer-down that starts off the canvas ends the open stroke without a new one.
    EndOnly,
    Ignore,
}

impl GestureState {
    /// Computes the next state and the drawing action for `event`.
    #[must_use]
    pub fn transition(self, event: PointerEvent, size: CanvasSize) -> (Self, GestureAction) {
        match (self, event) {
            (Self::Idle, PointerEvent::Down(point)) if size.contains(point) => {
                (Self::Drawing, GestureAction::Begin(point))
            }
            (Self::Idle, _) => (Self::Idle, GestureAction::Ignore),
            (Self::Drawing, PointerEvent::Move(point)) => {
                (Self::Drawing, GestureAction::Extend(point))
            }
            (Self::Drawing, PointerEvent::Up | PointerEvent::Cancel) => {
                (Self::Idle, GestureAction::End)
            }
            (Self::Drawing, PointerEvent::Down(point)) if size.contains(point) => {
                (Self::Drawing, GestureAction::EndAndBegin(point))
            }
            (Self::Drawing, PointerEvent::Down(_)) => (Self::Idle, GestureAction::EndOnly),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SIZE: CanvasSize = CanvasSize::new(100, 100);

    #[test_log::test]
    fn down_inside_canvas_starts_drawing() {
        let point = Point::new(10.0, 10.0);

        assert_eq!(
            GestureState::Idle.transition(PointerEvent::Down(point), SIZE),
            (GestureState::Drawing, GestureAction::Begin(point))
        );
    }

    #[test_log::test]
    fn down_outside_canvas_is_ignored() {
        assert_eq!(
            GestureState::Idle.transition(PointerEvent::Down(Point::new(150.0, 10.0)), SIZE),
            (GestureState::Idle, GestureAction::Ignore)
        );
    }

    #[test_log::test]
    fn idle_ignores_move_up_and_cancel() {
        for event in [
            PointerEvent::Move(Point::new(1.0, 1.0)),
            PointerEvent::Up,
            PointerEvent::Cancel,
        ] {
            assert_eq!(
                GestureState::Idle.transition(event, SIZE),
                (GestureState::Idle, GestureAction::Ignore)
            );
        }
    }

    #[test_log::test]
    fn moves_outside_canvas_are_still_recorded() {
        let point = Point::new(-20.0, 500.0);

        assert_eq!(
            GestureState::Drawing.transition(PointerEvent::Move(point), SIZE),
            (GestureState::Drawing, GestureAction::Extend(point))
        );
    }

    #[test_log::test]
    fn up_and_cancel_end_the_stroke() {
        for event in [PointerEvent::Up, PointerEvent::Cancel] {
            assert_eq!(
                GestureState::Drawing.transition(event, SIZE),
                (GestureState::Idle, GestureAction::End)
            );
        }
    }

    #[test_log::test]
    fn repeated_down_restarts_the_stroke() {
        let inside = Point::new(5.0, 5.0);

        assert_eq!(
            GestureState::Drawing.transition(PointerEvent::Down(inside), SIZE),
            (GestureState::Drawing, GestureAction::EndAndBegin(inside))
        );
        assert_eq!(
            GestureState::Drawing.transition(PointerEvent::Down(Point::new(-1.0, 5.0)), SIZE),
            (GestureState::Idle, GestureAction::EndOnly)
        );
    }
}
