//! Turns a horizontal drag on a cat card into an accept/reject decision.
//!
//! Every visual parameter of the card is a pure function of its current
//! displacement, so the card can be re-rendered from a single stored offset.

/// Raw pointer travel, in pixels, a release must exceed to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 100.0;

/// How far the card follows the pointer while it is pulled off its origin.
pub const DRAG_ELASTIC: f64 = 0.6;

const ROTATION_DOMAIN: [f64; 2] = [-200.0, 200.0];
const ROTATION_RANGE: [f64; 2] = [-25.0, 25.0];
const OPACITY_DOMAIN: [f64; 3] = [-150.0, 0.0, 150.0];
const OPACITY_RANGE: [f64; 3] = [0.5, 1.0, 0.5];
const ACCEPT_DOMAIN: [f64; 2] = [20.0, 150.0];
const REJECT_DOMAIN: [f64; 2] = [-20.0, -150.0];
const STRENGTH_RANGE: [f64; 2] = [0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Decision {
    pub fn direction(self) -> Direction {
        match self {
            Decision::Accept => Direction::Right,
            Decision::Reject => Direction::Left,
        }
    }
}

/// Piecewise-linear map from `domain` onto `range`, clamped at both ends.
///
/// `domain` must be monotonic (ascending or descending) and the same length
/// as `range`.
pub fn interpolate(value: f64, domain: &[f64], range: &[f64]) -> f64 {
    debug_assert!(domain.len() >= 2 && domain.len() == range.len());
    let last = domain.len() - 1;
    let ascending = domain[last] >= domain[0];

    let before_start = if ascending { value <= domain[0] } else { value >= domain[0] };
    if before_start {
        return range[0];
    }
    let past_end = if ascending { value >= domain[last] } else { value <= domain[last] };
    if past_end {
        return range[last];
    }

    for i in 0..last {
        let (lo, hi) = (domain[i], domain[i + 1]);
        let inside = if ascending {
            value >= lo && value <= hi
        } else {
            value <= lo && value >= hi
        };
        if inside {
            let span = hi - lo;
            if span == 0.0 {
                return range[i + 1];
            }
            let progress = (value - lo) / span;
            return range[i] + progress * (range[i + 1] - range[i]);
        }
    }

    range[last]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeVisuals {
    pub rotation_deg: f64,
    pub opacity: f64,
    pub accept_strength: f64,
    pub reject_strength: f64,
}

impl SwipeVisuals {
    pub fn from_displacement(displacement: f64) -> Self {
        Self {
            rotation_deg: interpolate(displacement, &ROTATION_DOMAIN, &ROTATION_RANGE),
            opacity: interpolate(displacement, &OPACITY_DOMAIN, &OPACITY_RANGE),
            accept_strength: interpolate(displacement, &ACCEPT_DOMAIN, &STRENGTH_RANGE),
            reject_strength: interpolate(displacement, &REJECT_DOMAIN, &STRENGTH_RANGE),
        }
    }

    pub fn resting() -> Self {
        Self::from_displacement(0.0)
    }
}

/// The decision a drag released at `offset` produces, if any.
pub fn release_decision(offset: f64) -> Option<Decision> {
    if offset > SWIPE_THRESHOLD {
        Some(Decision::Accept)
    } else if offset < -SWIPE_THRESHOLD {
        Some(Decision::Reject)
    } else {
        None
    }
}

/// Keyboard shortcuts for the deck. Only the arrows are bound so Enter and
/// Space keep activating whichever deck button has focus. Auto-repeat from a
/// held key is ignored.
pub fn decision_for_key(key: &str, repeat: bool) -> Option<Decision> {
    if repeat {
        return None;
    }
    match key {
        "ArrowRight" => Some(Decision::Accept),
        "ArrowLeft" => Some(Decision::Reject),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    pointer_id: i32,
    start_x: f64,
    current_x: f64,
}

/// Tracks the single pointer currently dragging a card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragTracker {
    active: Option<ActiveDrag>,
}

impl DragTracker {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a drag. Returns `false` if another pointer already owns the card.
    pub fn begin(&mut self, pointer_id: i32, x: f64) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveDrag {
            pointer_id,
            start_x: x,
            current_x: x,
        });
        true
    }

    pub fn move_to(&mut self, pointer_id: i32, x: f64) -> bool {
        match self.active.as_mut() {
            Some(drag) if drag.pointer_id == pointer_id => {
                drag.current_x = x;
                true
            }
            _ => false,
        }
    }

    /// Raw pointer travel since the drag began.
    pub fn offset(&self) -> f64 {
        self.active
            .as_ref()
            .map(|drag| drag.current_x - drag.start_x)
            .unwrap_or(0.0)
    }

    /// Where the card is drawn; zero when no drag is in progress.
    pub fn displacement(&self) -> f64 {
        self.offset() * DRAG_ELASTIC
    }

    pub fn visuals(&self) -> SwipeVisuals {
        SwipeVisuals::from_displacement(self.displacement())
    }

    /// Ends the drag owned by `pointer_id`. The outer `None` means the pointer
    /// didn't own the card; the inner value is the decision, if any.
    pub fn release(&mut self, pointer_id: i32, x: f64) -> Option<Option<Decision>> {
        if !self.move_to(pointer_id, x) {
            return None;
        }
        let decision = release_decision(self.offset());
        self.active = None;
        Some(decision)
    }

    pub fn cancel(&mut self, pointer_id: i32) -> bool {
        match &self.active {
            Some(drag) if drag.pointer_id == pointer_id => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rotation_is_clamped_and_monotonic() {
        assert!(close(SwipeVisuals::from_displacement(-500.0).rotation_deg, -25.0));
        assert!(close(SwipeVisuals::from_displacement(500.0).rotation_deg, 25.0));
        assert!(close(SwipeVisuals::from_displacement(100.0).rotation_deg, 12.5));

        let mut previous = f64::NEG_INFINITY;
        for step in -250..=250 {
            let rotation = SwipeVisuals::from_displacement(step as f64 * 1.7).rotation_deg;
            assert!(rotation >= previous);
            assert!((-25.0..=25.0).contains(&rotation));
            previous = rotation;
        }
    }

    #[test]
    fn opacity_dips_symmetrically() {
        assert!(close(SwipeVisuals::from_displacement(0.0).opacity, 1.0));
        assert!(close(SwipeVisuals::from_displacement(75.0).opacity, 0.75));
        assert!(close(SwipeVisuals::from_displacement(-75.0).opacity, 0.75));
        assert!(close(SwipeVisuals::from_displacement(400.0).opacity, 0.5));
    }

    #[test]
    fn indicators_only_light_up_on_their_side() {
        let right = SwipeVisuals::from_displacement(150.0);
        assert!(close(right.accept_strength, 1.0));
        assert!(close(right.reject_strength, 0.0));

        let left = SwipeVisuals::from_displacement(-85.0);
        assert!(close(left.reject_strength, 0.5));
        assert!(close(left.accept_strength, 0.0));

        let resting = SwipeVisuals::resting();
        assert!(close(resting.accept_strength, 0.0));
        assert!(close(resting.reject_strength, 0.0));
    }

    #[test]
    fn release_threshold_is_exclusive() {
        assert_eq!(release_decision(100.5), Some(Decision::Accept));
        assert_eq!(release_decision(-100.5), Some(Decision::Reject));
        assert_eq!(release_decision(100.0), None);
        assert_eq!(release_decision(-100.0), None);
        assert_eq!(release_decision(0.0), None);
    }

    #[test]
    fn tracker_emits_one_decision_per_release() {
        let mut tracker = DragTracker::default();
        assert!(tracker.begin(1, 10.0));
        assert!(tracker.move_to(1, 90.0));
        assert!(close(tracker.displacement(), 48.0));
        assert_eq!(tracker.release(1, 130.0), Some(Some(Decision::Accept)));
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.release(1, 130.0), None);
    }

    #[test]
    fn leftward_release_rejects() {
        let mut tracker = DragTracker::default();
        assert!(tracker.begin(3, 400.0));
        assert!(tracker.move_to(3, 350.0));
        assert!(tracker.visuals().reject_strength > 0.0);
        assert!(close(tracker.visuals().accept_strength, 0.0));
        assert_eq!(tracker.release(3, 280.0), Some(Some(Decision::Reject)));
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn short_drag_springs_back() {
        let mut tracker = DragTracker::default();
        tracker.begin(4, 300.0);
        assert_eq!(tracker.release(4, 220.0), Some(None));
        assert_eq!(tracker.displacement(), 0.0);
        assert_eq!(tracker.visuals(), SwipeVisuals::resting());
    }

    #[test]
    fn tracker_ignores_foreign_pointers() {
        let mut tracker = DragTracker::default();
        tracker.begin(1, 0.0);
        assert!(!tracker.begin(2, 50.0));
        assert!(!tracker.move_to(2, -400.0));
        assert_eq!(tracker.release(2, -400.0), None);
        assert!(!tracker.cancel(2));
        assert!(tracker.cancel(1));
        assert_eq!(tracker.offset(), 0.0);
    }

    #[test]
    fn keys_mirror_swipes() {
        assert_eq!(decision_for_key("ArrowRight", false), Some(Decision::Accept));
        assert_eq!(decision_for_key("ArrowLeft", false), Some(Decision::Reject));
        assert_eq!(decision_for_key("a", false), None);
        assert_eq!(Decision::Reject.direction(), Direction::Left);
    }

    #[test]
    fn button_activation_keys_are_left_alone() {
        assert_eq!(decision_for_key("Enter", false), None);
        assert_eq!(decision_for_key(" ", false), None);
        assert_eq!(decision_for_key("Backspace", false), None);
    }

    #[test]
    fn held_arrow_does_not_repeat() {
        assert_eq!(decision_for_key("ArrowRight", true), None);
        assert_eq!(decision_for_key("ArrowLeft", true), None);
    }
}
