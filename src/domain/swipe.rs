//! Swipe-to-dismiss gesture arithmetic
//!
//! A [`DragGesture`] lives for exactly one touch sequence. It is pure: it
//! turns horizontal finger positions into visual feedback and, on release,
//! into a dismiss-or-revert decision. Only rightward movement counts.

/// Tuning for the swipe gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTuning {
    /// Displacement that must be exceeded on release to dismiss
    pub threshold_px: f64,
    /// Displacement at which opacity would reach zero before flooring
    pub fade_distance_px: f64,
    /// Lowest opacity applied while dragging
    pub min_opacity: f64,
}

impl Default for SwipeTuning {
    fn default() -> Self {
        Self {
            threshold_px: 100.0,
            fade_distance_px: 200.0,
            min_opacity: 0.3,
        }
    }
}

/// Visual feedback for an in-flight drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFeedback {
    pub offset_px: f64,
    pub opacity: f64,
}

/// Decision taken when the finger lifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeRelease {
    /// Past the threshold: hide the widget
    Dismiss,
    /// Not far enough: restore the rest position
    Revert,
}

/// One touch sequence on a notification widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    start_x: f64,
    current_x: f64,
}

impl DragGesture {
    /// Starts a gesture at the first touch point
    pub fn begin(x: f64) -> Self {
        Self {
            start_x: x,
            current_x: x,
        }
    }

    /// Records the latest finger position
    pub fn move_to(&mut self, x: f64) {
        self.current_x = x;
    }

    /// Horizontal displacement since the gesture began (positive = right)
    pub fn displacement(&self) -> f64 {
        self.current_x - self.start_x
    }

    /// Feedback to render for the current position
    ///
    /// # Returns
    /// None when displacement is zero or leftward, which leaves the widget untouched
    pub fn feedback(&self, tuning: &SwipeTuning) -> Option<SwipeFeedback> {
        let dx = self.displacement();
        if dx <= 0.0 {
            return None;
        }

        let opacity = (1.0 - dx / tuning.fade_distance_px).max(tuning.min_opacity);
        Some(SwipeFeedback {
            offset_px: dx,
            opacity,
        })
    }

    /// Decides the outcome when the finger lifts
    pub fn release(&self, tuning: &SwipeTuning) -> SwipeRelease {
        if self.displacement() > tuning.threshold_px {
            SwipeRelease::Dismiss
        } else {
            SwipeRelease::Revert
        }
    }
}
