use super::Vec2;

const DEGENERATE_SPAN_EPSILON: f32 = 1.0e-6;

/// Values a [`Transition`] can move between.
pub trait Interpolate: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;

    /// Fraction of the `from -> to` span already covered by `value`, unclamped.
    /// `None` when the span is degenerate.
    fn progress(from: Self, to: Self, value: Self) -> Option<f32>;
}

impl Interpolate for f32 {
    fn lerp(from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * t
    }

    fn progress(from: f32, to: f32, value: f32) -> Option<f32> {
        let span = to - from;
        if span.abs() <= DEGENERATE_SPAN_EPSILON {
            return None;
        }
        Some((value - from) / span)
    }
}

impl Interpolate for Vec2 {
    fn lerp(from: Vec2, to: Vec2, t: f32) -> Vec2 {
        from + (to - from) * t
    }

    fn progress(from: Vec2, to: Vec2, value: Vec2) -> Option<f32> {
        let span = to - from;
        let span_len_sq = span.length_squared();
        if span_len_sq <= DEGENERATE_SPAN_EPSILON * DEGENERATE_SPAN_EPSILON {
            return None;
        }
        Some((value - from).dot(span) / span_len_sq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
        }
    }

    pub fn invert(self, eased: f32) -> f32 {
        let eased = eased.clamp(0.0, 1.0);
        match self {
            Easing::Linear => eased,
            Easing::EaseInQuad => eased.sqrt(),
            Easing::EaseOutQuad => 1.0 - (1.0 - eased).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionCurve {
    pub easing: Easing,
    pub duration_ms: f32,
}

impl TransitionCurve {
    pub const fn linear(duration_ms: f32) -> Self {
        Self {
            easing: Easing::Linear,
            duration_ms,
        }
    }

    pub const fn ease_in_quad(duration_ms: f32) -> Self {
        Self {
            easing: Easing::EaseInQuad,
            duration_ms,
        }
    }

    pub const fn ease_out_quad(duration_ms: f32) -> Self {
        Self {
            easing: Easing::EaseOutQuad,
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    pub initial: T,
    pub target: T,
    pub state: T,
    pub curve: TransitionCurve,
}

/// Advances `transition.state` toward `transition.target` by `delta_ms` and returns the
/// new value. The eased fraction is recovered from the current `state` on every call, so
/// callers may retarget between calls and only need to store the returned value.
pub fn apply_transition<T: Interpolate>(transition: &Transition<T>, delta_ms: f32) -> T {
    if !(delta_ms > 0.0) {
        return transition.state;
    }
    let Some(reached) = T::progress(transition.initial, transition.target, transition.state)
    else {
        return transition.target;
    };
    if !(transition.curve.duration_ms > 0.0) {
        return transition.target;
    }

    let easing = transition.curve.easing;
    let elapsed_fraction = easing.invert(reached.clamp(0.0, 1.0));
    let next_fraction = (elapsed_fraction + delta_ms / transition.curve.duration_ms).clamp(0.0, 1.0);
    if next_fraction >= 1.0 {
        return transition.target;
    }

    T::lerp(
        transition.initial,
        transition.target,
        easing.apply(next_fraction),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_vec(initial: Vec2, target: Vec2, state: Vec2) -> Transition<Vec2> {
        Transition {
            initial,
            target,
            state,
            curve: TransitionCurve::linear(250.0),
        }
    }

    #[test]
    fn zero_delta_leaves_state_unchanged() {
        let transition = linear_vec(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(3.3, 0.0));
        assert_eq!(apply_transition(&transition, 0.0), Vec2::new(3.3, 0.0));
    }

    #[test]
    fn cumulative_delta_past_duration_lands_exactly_on_target() {
        let target = Vec2::new(-4.0, 2.0);
        let mut transition = linear_vec(Vec2::new(4.0, 0.0), target, Vec2::new(4.0, 0.0));
        for _ in 0..20 {
            transition.state = apply_transition(&transition, 16.0);
        }
        assert_eq!(transition.state, target);
    }

    #[test]
    fn linear_progress_is_proportional_to_delta() {
        let transition = Transition {
            initial: 0.0f32,
            target: 1.0,
            state: 0.0,
            curve: TransitionCurve::linear(250.0),
        };
        let value = apply_transition(&transition, 125.0);
        assert!((value - 0.5).abs() < 0.0001);
    }

    #[test]
    fn convergence_is_monotonic_and_never_overshoots() {
        for curve in [
            TransitionCurve::linear(250.0),
            TransitionCurve::ease_in_quad(250.0),
            TransitionCurve::ease_out_quad(250.0),
        ] {
            let mut transition = Transition {
                initial: 2.0f32,
                target: -2.0,
                state: 2.0,
                curve,
            };
            let mut previous = transition.state;
            for _ in 0..40 {
                transition.state = apply_transition(&transition, 9.0);
                assert!(transition.state <= previous, "{curve:?}");
                assert!(transition.state >= -2.0, "{curve:?}");
                previous = transition.state;
            }
            assert_eq!(transition.state, -2.0);
        }
    }

    #[test]
    fn retargeting_mid_flight_continues_from_current_state() {
        let mut transition = linear_vec(Vec2::new(5.0, 0.0), Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        transition.state = apply_transition(&transition, 100.0);
        let midway = transition.state;
        assert!((midway.x - 1.0).abs() < 0.0001);

        transition.initial = Vec2::new(-5.0, 0.0);
        transition.target = Vec2::new(5.0, 0.0);
        let reversed = apply_transition(&transition, 25.0);
        assert!(reversed.x > midway.x);
        assert!((reversed.x - 2.0).abs() < 0.0001);
    }

    #[test]
    fn degenerate_span_snaps_to_target() {
        let transition = linear_vec(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(3.0, 0.0));
        assert_eq!(apply_transition(&transition, 16.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn easing_inverse_round_trips() {
        for easing in [Easing::Linear, Easing::EaseInQuad, Easing::EaseOutQuad] {
            for step in 0..=10 {
                let t = step as f32 / 10.0;
                let back = easing.invert(easing.apply(t));
                assert!((back - t).abs() < 0.0001, "{easing:?} t={t}");
            }
        }
    }
}
