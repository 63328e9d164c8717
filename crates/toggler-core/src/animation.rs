//! Animatable property values with easing and spring physics.
//!
//! A widget only ever sets targets on an [`AnimatableValue`]. Time is advanced
//! by whoever owns the frame loop through [`AnimatableValue::tick`].

use crate::color::Color;
use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

// =============================================================================
// Easing Functions
// =============================================================================

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Cubic ease out
    CubicOut,
    /// Material-style standard curve, cubic-bezier(0.4, 0.0, 0.2, 1.0)
    FastOutSlowIn,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
        }
    }
}

/// Evaluate a CSS-style cubic bezier timing curve at `x`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let sample = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let slope = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    // Newton iterations on the x curve, bisection fallback on flat slopes.
    let mut s = x;
    for _ in 0..8 {
        let err = sample(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return sample(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..32 {
        let v = sample(x1, x2, s);
        if (v - x).abs() < 1e-6 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    sample(y1, y2, s)
}

// =============================================================================
// SpringConfig - Spring Physics Parameters
// =============================================================================

/// Spring physics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Mass of the object (affects inertia)
    pub mass: f64,
    /// Stiffness of the spring (affects speed)
    pub stiffness: f64,
    /// Damping coefficient (affects bounciness)
    pub damping: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::GENTLE
    }
}

impl SpringConfig {
    /// Gentle spring (slow, smooth)
    pub const GENTLE: Self = Self {
        mass: 1.0,
        stiffness: 100.0,
        damping: 15.0,
    };

    /// Stiff spring (fast, snappy)
    pub const STIFF: Self = Self {
        mass: 1.0,
        stiffness: 400.0,
        damping: 30.0,
    };

    /// Thumb travel spring used by switches.
    pub const THUMB: Self = Self {
        mass: 1.0,
        stiffness: 228.0,
        damping: 30.0,
    };

    /// Create custom spring config.
    #[must_use]
    pub const fn custom(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
        }
    }

    /// Calculate damping ratio.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.mass * self.stiffness).sqrt())
    }

    /// Whether spring is underdamped (will oscillate).
    #[must_use]
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0
    }
}

// =============================================================================
// Spring - Animated Spring Value
// =============================================================================

/// A spring-animated scalar.
#[derive(Debug, Clone)]
pub struct Spring {
    /// Current value
    pub value: f64,
    /// Target value
    pub target: f64,
    /// Current velocity
    pub velocity: f64,
    /// Spring configuration
    pub config: SpringConfig,
    /// Whether animation is complete
    pub at_rest: bool,
    /// Precision threshold for settling
    pub precision: f64,
}

impl Spring {
    /// Create a new spring at an initial value.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            target: initial,
            velocity: 0.0,
            config: SpringConfig::default(),
            at_rest: true,
            precision: 0.001,
        }
    }

    /// Set spring configuration.
    #[must_use]
    pub fn with_config(mut self, config: SpringConfig) -> Self {
        self.config = config;
        self
    }

    /// Set target value.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > f64::EPSILON {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Update spring physics for a time step (dt in seconds).
    pub fn update(&mut self, dt: f64) {
        if self.at_rest {
            return;
        }

        let displacement = self.value - self.target;
        let spring_force = -self.config.stiffness * displacement;
        let damping_force = -self.config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.config.mass;

        // Semi-implicit Euler
        self.velocity += acceleration * dt;
        self.value += self.velocity * dt;

        let displacement = self.value - self.target;
        if displacement.abs() < self.precision && self.velocity.abs() < self.precision {
            self.value = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    /// Immediately set value without animation.
    pub fn set_immediate(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}

// =============================================================================
// Interpolate Trait
// =============================================================================

/// Trait for types that can be interpolated.
pub trait Interpolate: Clone + PartialEq {
    /// Interpolate between two values.
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (*to - *from).mul_add(t as Self, *from)
    }
}

impl Interpolate for Point {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            x: f32::interpolate(&from.x, &to.x, t),
            y: f32::interpolate(&from.y, &to.y, t),
        }
    }
}

impl Interpolate for Size {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            width: f32::interpolate(&from.width, &to.width, t),
            height: f32::interpolate(&from.height, &to.height, t),
        }
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        let t = t as f32;
        // Spring overshoot may push channels out of range; Color::new clamps.
        Self::new(
            (to.r - from.r).mul_add(t, from.r),
            (to.g - from.g).mul_add(t, from.g),
            (to.b - from.b).mul_add(t, from.b),
            (to.a - from.a).mul_add(t, from.a),
        )
    }
}

impl Interpolate for bool {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            *to
        } else {
            *from
        }
    }
}

// =============================================================================
// AnimatableValue
// =============================================================================

/// How an [`AnimatableValue`] moves toward a new target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Transition {
    /// Jump straight to the target
    #[default]
    Immediate,
    /// Interpolate over a fixed duration
    Timed {
        /// Duration in seconds
        duration: f64,
        /// Easing curve
        easing: Easing,
    },
    /// Interpolate with spring physics
    Spring(SpringConfig),
}

impl Transition {
    /// Timed transition from milliseconds.
    #[must_use]
    pub fn timed_ms(millis: u32, easing: Easing) -> Self {
        Self::Timed {
            duration: f64::from(millis) / 1000.0,
            easing,
        }
    }
}

#[derive(Debug, Clone)]
enum Progress {
    Done,
    Timed { elapsed: f64 },
    Spring(Spring),
}

/// A property holding its current value, a pending target and a transition.
///
/// Setting a new target starts an interpolation from the current value.
/// [`tick`](Self::tick) advances it; nothing advances it implicitly.
#[derive(Debug, Clone)]
pub struct AnimatableValue<T: Interpolate> {
    from: T,
    current: T,
    target: T,
    transition: Transition,
    progress: Progress,
}

impl<T: Interpolate> AnimatableValue<T> {
    /// Create a value at rest.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            from: value.clone(),
            current: value.clone(),
            target: value,
            transition: Transition::Immediate,
            progress: Progress::Done,
        }
    }

    /// Set the transition used by subsequent target changes.
    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Replace the transition used by subsequent target changes.
    pub fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    /// Current transition.
    #[must_use]
    pub const fn transition(&self) -> Transition {
        self.transition
    }

    /// Current (interpolated) value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.current
    }

    /// Pending target value.
    #[must_use]
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Whether an interpolation is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !matches!(self.progress, Progress::Done)
    }

    /// Retarget, animating from the current value. Same target is a no-op.
    pub fn set(&mut self, target: T) {
        if target == self.target {
            return;
        }
        self.from = self.current.clone();
        self.target = target;
        self.progress = match self.transition {
            Transition::Immediate => {
                self.current = self.target.clone();
                Progress::Done
            }
            Transition::Timed { duration, .. } if duration <= 0.0 => {
                self.current = self.target.clone();
                Progress::Done
            }
            Transition::Timed { .. } => Progress::Timed { elapsed: 0.0 },
            Transition::Spring(config) => {
                let mut spring = Spring::new(0.0).with_config(config);
                spring.set_target(1.0);
                Progress::Spring(spring)
            }
        };
    }

    /// Jump to a value without animating.
    pub fn set_immediate(&mut self, value: T) {
        self.from = value.clone();
        self.current = value.clone();
        self.target = value;
        self.progress = Progress::Done;
    }

    /// Advance by `dt` seconds. Returns whether the value is still animating.
    pub fn tick(&mut self, dt: f64) -> bool {
        let t = match (&mut self.progress, self.transition) {
            (Progress::Done, _) => return false,
            (Progress::Timed { elapsed }, Transition::Timed { duration, easing }) => {
                *elapsed = (*elapsed + dt).min(duration);
                if *elapsed >= duration {
                    None
                } else {
                    Some(easing.apply(*elapsed / duration))
                }
            }
            (Progress::Spring(spring), _) => {
                spring.update(dt);
                if spring.at_rest {
                    None
                } else {
                    Some(spring.value)
                }
            }
            // Transition was swapped mid-flight; settle.
            (Progress::Timed { .. }, _) => None,
        };

        match t {
            Some(t) => {
                self.current = T::interpolate(&self.from, &self.target, t);
                true
            }
            None => {
                self.current = self.target.clone();
                self.progress = Progress::Done;
                false
            }
        }
    }
}

impl<T: Interpolate + Default> Default for AnimatableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Easing Tests
    // =========================================================================

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicOut,
            Easing::FastOutSlowIn,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_fast_out_slow_in_is_ahead_of_linear() {
        let mid = Easing::FastOutSlowIn.apply(0.5);
        assert!(mid > 0.5);
        assert!(mid < 1.0);
    }

    // =========================================================================
    // Spring Tests
    // =========================================================================

    #[test]
    fn test_spring_settles_at_target() {
        let mut spring = Spring::new(0.0).with_config(SpringConfig::STIFF);
        spring.set_target(10.0);
        for _ in 0..600 {
            spring.update(1.0 / 60.0);
        }
        assert!(spring.at_rest);
        assert_eq!(spring.value, 10.0);
    }

    #[test]
    fn test_spring_set_immediate() {
        let mut spring = Spring::new(0.0);
        spring.set_target(5.0);
        spring.set_immediate(3.0);
        assert!(spring.at_rest);
        assert_eq!(spring.target, 3.0);
    }

    #[test]
    fn test_spring_config_damping_ratio() {
        assert!(SpringConfig::GENTLE.is_underdamped());
        assert!(SpringConfig::custom(1.0, 100.0, 20.0).damping_ratio() >= 1.0);
    }

    // =========================================================================
    // AnimatableValue Tests
    // =========================================================================

    #[test]
    fn test_animatable_immediate_transition() {
        let mut v = AnimatableValue::new(0.0f32);
        v.set(4.0);
        assert_eq!(*v.get(), 4.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_animatable_timed_transition() {
        let mut v =
            AnimatableValue::new(0.0f32).with_transition(Transition::timed_ms(100, Easing::Linear));
        v.set(10.0);
        assert_eq!(*v.get(), 0.0);
        assert_eq!(*v.target(), 10.0);
        assert!(v.is_animating());

        assert!(v.tick(0.05));
        assert!((*v.get() - 5.0).abs() < 1e-4);

        assert!(!v.tick(0.05));
        assert_eq!(*v.get(), 10.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_animatable_retarget_starts_from_current() {
        let mut v =
            AnimatableValue::new(0.0f32).with_transition(Transition::timed_ms(100, Easing::Linear));
        v.set(10.0);
        v.tick(0.05);
        v.set(0.0);
        assert!((*v.get() - 5.0).abs() < 1e-4);
        v.tick(0.05);
        assert!((*v.get() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_animatable_same_target_is_noop() {
        let mut v =
            AnimatableValue::new(1.0f32).with_transition(Transition::timed_ms(100, Easing::Linear));
        v.set(1.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_animatable_spring_reaches_target() {
        let mut v = AnimatableValue::new(Point::ORIGIN)
            .with_transition(Transition::Spring(SpringConfig::THUMB));
        v.set(Point::new(20.0, 0.0));
        let mut frames = 0;
        while v.tick(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(*v.get(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_animatable_set_immediate_cancels() {
        let mut v = AnimatableValue::new(Color::BLACK)
            .with_transition(Transition::timed_ms(200, Easing::EaseInOut));
        v.set(Color::WHITE);
        v.set_immediate(Color::RED);
        assert!(!v.is_animating());
        assert_eq!(*v.get(), Color::RED);
        assert!(!v.tick(0.1));
    }

    #[test]
    fn test_animatable_bool_switches_at_end() {
        let mut v =
            AnimatableValue::new(false).with_transition(Transition::timed_ms(100, Easing::Linear));
        v.set(true);
        v.tick(0.05);
        assert!(!*v.get());
        v.tick(0.05);
        assert!(*v.get());
    }

    #[test]
    fn test_animatable_zero_duration_snaps() {
        let mut v = AnimatableValue::new(Size::ZERO).with_transition(Transition::Timed {
            duration: 0.0,
            easing: Easing::Linear,
        });
        v.set(Size::new(2.0, 2.0));
        assert_eq!(*v.get(), Size::new(2.0, 2.0));
    }
}
