//! Keyframe curve component.
//!
//! A [`Curve`] drives a single scalar over time from a sparse set of
//! [`Keyframe`]s. It supports step ([`CurveType::Discrete`]) and linear
//! interpolation, reverse playback, ping-pong and bounded or infinite
//! repetition, plus optional update/done callbacks.
//!
//! The [`curve_system`](crate::systems::curve::curve_system) advances every
//! curve with the frame delta and writes the value into the entity's
//! [`CurveTarget`].
//!
//! # Example
//!
//! ```
//! use isoengine::components::curve::{Curve, CurveType, Keyframe};
//!
//! let mut curve = Curve::new()
//!     .with_points(vec![Keyframe::new(0.0, 0.0), Keyframe::new(10.0, 1.0)])
//!     .with_curve_type(CurveType::Linear);
//! curve.start(true);
//! curve.update(0.5);
//! assert_eq!(curve.value(), 5.0);
//! ```

use std::fmt;

use bevy_ecs::prelude::Component;
use log::warn;
use serde::{Deserialize, Serialize};

/// Callback invoked with the new value every time the curve moves.
pub type OnUpdate = Box<dyn FnMut(f32) + Send + Sync>;
/// Callback invoked once when a run completes.
pub type OnDone = Box<dyn FnMut() + Send + Sync>;

/// Infinite repetition.
pub const REPEAT_FOREVER: i32 = -1;

/// A `(position, time)` pair defining the curve's shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub position: f32,
    pub time: f32,
}

impl Keyframe {
    pub fn new(position: f32, time: f32) -> Self {
        Self { position, time }
    }
}

/// Interpolation between two bounding keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveType {
    /// Hold the earlier keyframe's value until the next one is reached.
    Discrete,
    /// Blend proportionally between the two keyframes.
    #[default]
    Linear,
}

/// Which scalar of the entity a curve writes into.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveTarget {
    /// `i` coordinate of the entity's [`TileActor`](super::tileactor::TileActor).
    TileI,
    /// `j` coordinate of the entity's tile position.
    TileJ,
    /// Height (`k`) of the entity's tile position.
    TileHeight,
    /// [`Rotation`](super::rotation::Rotation) in degrees.
    Rotation,
}

/// Scalar animation driven by keyframes.
#[derive(Component)]
pub struct Curve {
    points: Vec<Keyframe>,
    curve_type: CurveType,
    reverse: bool,
    ping_pong: bool,
    repeat: i32,
    repeats_left: i32,
    time: f32,
    value: f32,
    running: bool,
    done: bool,
    on_update: Option<OnUpdate>,
    on_done: Option<OnDone>,
}

impl Default for Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve")
            .field("points", &self.points)
            .field("curve_type", &self.curve_type)
            .field("reverse", &self.reverse)
            .field("ping_pong", &self.ping_pong)
            .field("repeat", &self.repeat)
            .field("repeats_left", &self.repeats_left)
            .field("time", &self.time)
            .field("value", &self.value)
            .field("running", &self.running)
            .field("done", &self.done)
            .field("on_update", &self.on_update.is_some())
            .field("on_done", &self.on_done.is_some())
            .finish()
    }
}

impl Curve {
    /// Create an empty, stopped linear curve.
    pub fn new() -> Self {
        Curve {
            points: Vec::new(),
            curve_type: CurveType::Linear,
            reverse: false,
            ping_pong: false,
            repeat: 0,
            repeats_left: 0,
            time: 0.0,
            value: 0.0,
            running: false,
            done: false,
            on_update: None,
            on_done: None,
        }
    }

    pub fn with_points(mut self, points: impl Into<Vec<Keyframe>>) -> Self {
        self.set_points(points);
        self
    }
    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }
    /// `-1` repeats forever, `0` plays one pass, `n` plays `n` more passes.
    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.set_repeat(repeat);
        self
    }
    pub fn with_on_update(mut self, on_update: impl FnMut(f32) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }
    pub fn with_on_done(mut self, on_done: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_done = Some(Box::new(on_done));
        self
    }

    /// Replace the keyframes with a time-sorted copy.
    ///
    /// Playback state is left as is; call [`Curve::start`] to reseed it.
    pub fn set_points(&mut self, points: impl Into<Vec<Keyframe>>) {
        let mut points = points.into();
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.points = points;
    }
    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        self.curve_type = curve_type;
    }
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }
    pub fn set_ping_pong(&mut self, ping_pong: bool) {
        self.ping_pong = ping_pong;
    }
    pub fn set_repeat(&mut self, repeat: i32) {
        let repeat = if repeat < REPEAT_FOREVER {
            warn!("Curve repeat {} clamped to infinite", repeat);
            REPEAT_FOREVER
        } else {
            repeat
        };
        self.repeat = repeat;
        self.repeats_left = repeat;
    }

    /// Arm the curve.
    ///
    /// With `restart` the time and value are reseeded from the first keyframe
    /// (the last one when reversed), the done flag clears and the repeat count
    /// is refilled. Without it playback simply resumes where it was paused.
    pub fn start(&mut self, restart: bool) -> &mut Self {
        if restart {
            let seed = if self.reverse {
                self.points.last()
            } else {
                self.points.first()
            };
            if let Some(kf) = seed.copied() {
                self.time = kf.time;
                self.value = kf.position;
            }
            self.done = false;
            self.repeats_left = self.repeat;
        }
        self.running = true;
        self
    }

    /// [`Curve::start`] that also replaces the callbacks given as `Some`.
    pub fn start_with(
        &mut self,
        restart: bool,
        on_done: Option<OnDone>,
        on_update: Option<OnUpdate>,
    ) -> &mut Self {
        if on_done.is_some() {
            self.on_done = on_done;
        }
        if on_update.is_some() {
            self.on_update = on_update;
        }
        self.start(restart)
    }

    /// Stop advancing, optionally forcing the current value.
    pub fn pause(&mut self, position: Option<f32>) -> &mut Self {
        self.running = false;
        if let Some(position) = position {
            self.value = position;
        }
        self
    }

    /// Advance the curve by `dt` seconds.
    ///
    /// Returns `true` when the run completed during this call. A negative or
    /// non-finite `dt` leaves the curve untouched.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running || self.done || self.points.is_empty() {
            return false;
        }
        if !dt.is_finite() || dt < 0.0 {
            return false;
        }
        let first = self.points[0].time;
        let last = self.points[self.points.len() - 1].time;
        let span = last - first;

        self.time += if self.reverse { -dt } else { dt };

        loop {
            let overshoot = if self.reverse {
                first - self.time
            } else {
                self.time - last
            };
            if overshoot < 0.0 {
                self.value = self.sample(self.time);
                self.emit_update();
                return false;
            }

            let terminal = if self.reverse {
                self.points[0]
            } else {
                self.points[self.points.len() - 1]
            };
            self.time = terminal.time;
            self.value = terminal.position;
            self.emit_update();

            if self.repeats_left == 0 {
                self.finish();
                return true;
            }
            if self.repeats_left > 0 {
                self.repeats_left -= 1;
            }

            if self.ping_pong {
                self.reverse = !self.reverse;
            } else {
                self.time = if self.reverse { last } else { first };
            }

            if overshoot <= 0.0 || span <= 0.0 || !overshoot.is_finite() {
                return false;
            }
            let carry = if self.repeats_left == REPEAT_FOREVER {
                // Whole periods leave the state unchanged when looping forever.
                let period = if self.ping_pong { 2.0 * span } else { span };
                let rest = overshoot % period;
                if self.ping_pong && rest > span {
                    // Still inside the next leg; consume it here.
                    self.reverse = !self.reverse;
                    self.time = if self.reverse { last } else { first };
                    rest - span
                } else {
                    rest
                }
            } else {
                overshoot
            };
            self.time += if self.reverse { -carry } else { carry };
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.running = false;
        if let Some(on_done) = self.on_done.as_mut() {
            on_done();
        }
    }

    fn emit_update(&mut self) {
        let value = self.value;
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(value);
        }
    }

    /// Interpolated value at `time`, which must lie inside the keyframe range.
    ///
    /// The value does not depend on the playback direction, so the pair is
    /// always looked up forwards.
    fn sample(&self, time: f32) -> f32 {
        let (lo, hi) = closest_time_indices(&self.points, time, false);
        let a = self.points[lo];
        let b = self.points[hi];
        match self.curve_type {
            CurveType::Discrete => a.position,
            CurveType::Linear => {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return a.position;
                }
                let t = ((time - a.time) / span).clamp(0.0, 1.0);
                a.position + (b.position - a.position) * t
            }
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }
    pub fn time(&self) -> f32 {
        self.time
    }
    pub fn is_done(&self) -> bool {
        self.done
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }
    pub fn points(&self) -> &[Keyframe] {
        &self.points
    }
}

/// Indices of the two keyframes bounding `time`, in playback order.
///
/// Forward playback yields `(earlier, later)`, reverse yields
/// `(later, earlier)`. Times before the first or after the last keyframe
/// clamp to the first or last pair. A single keyframe yields `(0, 0)`.
///
/// `points` must be sorted by time and non-empty.
pub fn closest_time_indices(points: &[Keyframe], time: f32, reverse: bool) -> (usize, usize) {
    if points.len() < 2 {
        return (0, 0);
    }
    let upper = points.partition_point(|kf| kf.time <= time);
    let left = upper.saturating_sub(1).min(points.len() - 2);
    let right = left + 1;
    if reverse {
        // Exactly on a keyframe while going backwards: the pair ahead is the
        // one ending at it.
        if left > 0 && points[left].time == time {
            (left, left - 1)
        } else {
            (right, left)
        }
    } else {
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn kf(position: f32, time: f32) -> Keyframe {
        Keyframe::new(position, time)
    }

    fn ramp() -> Vec<Keyframe> {
        vec![kf(0.0, 0.0), kf(1.0, 1.0), kf(2.0, 2.0)]
    }

    #[test]
    fn test_points_are_sorted_by_time() {
        let c = Curve::new().with_points(vec![
            kf(0.0, 0.0),
            kf(10.0, 1.0),
            kf(30.0, 3.0),
            kf(20.0, 2.0),
        ]);
        let times: Vec<f32> = c.points().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(c.points()[2].position, 20.0);
    }

    #[test]
    fn test_linear_sequence_and_done_on_last_step() {
        let mut c = Curve::new()
            .with_points(vec![
                kf(0.0, 0.0),
                kf(10.0, 1.0),
                kf(30.0, 3.0),
                kf(20.0, 2.0),
            ])
            .with_curve_type(CurveType::Linear);
        c.start(true);

        let expected = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0];
        for (n, want) in expected.iter().enumerate() {
            assert!(!c.is_done(), "done too early at step {n}");
            let finished = c.update(0.5);
            assert!(approx_eq(c.value(), *want), "step {n}: {}", c.value());
            assert_eq!(finished, n == expected.len() - 1);
        }
        assert!(c.is_done());
        assert!(!c.is_running());
    }

    #[test]
    fn test_reverse_start_seeds_last_keyframe() {
        let mut c = Curve::new().with_points(ramp()).with_reverse(true);
        c.start(true);
        assert_eq!(c.value(), 2.0);
        assert_eq!(c.time(), 2.0);
    }

    #[test]
    fn test_reverse_plays_backwards() {
        let mut c = Curve::new().with_points(ramp()).with_reverse(true);
        c.start(true);
        c.update(0.5);
        assert!(approx_eq(c.value(), 1.5));
        c.update(1.5);
        assert!(approx_eq(c.value(), 0.0));
        assert!(c.is_done());
    }

    #[test]
    fn test_pause_freezes_value_until_resumed() {
        let mut c = Curve::new().with_points(ramp());
        c.start(true);
        c.update(0.5);
        c.pause(Some(10.0));
        assert_eq!(c.value(), 10.0);
        c.update(0.5);
        c.update(0.5);
        assert_eq!(c.value(), 10.0);
        assert!(!c.is_running());

        c.start(false);
        c.update(0.25);
        // resumes from the paused time, not from the forced value
        assert!(approx_eq(c.value(), 0.75));
    }

    #[test]
    fn test_ping_pong_round_trip_with_one_repeat() {
        let mut c = Curve::new()
            .with_points(ramp())
            .with_curve_type(CurveType::Discrete)
            .with_ping_pong(true)
            .with_repeat(1);
        c.start(true);
        assert_eq!(c.value(), 0.0);

        let expected = [1.0, 2.0, 1.0, 0.0];
        for (n, want) in expected.iter().enumerate() {
            assert!(!c.is_done(), "done too early at step {n}");
            c.update(1.0);
            assert_eq!(c.value(), *want, "step {n}");
        }
        assert!(c.is_done());
    }

    #[test]
    fn test_ping_pong_without_repeat_finishes_at_end() {
        let mut c = Curve::new().with_points(ramp()).with_ping_pong(true);
        c.start(true);
        c.update(2.0);
        assert!(c.is_done());
        assert_eq!(c.value(), 2.0);
    }

    #[test]
    fn test_discrete_holds_earlier_keyframe() {
        let mut c = Curve::new()
            .with_points(vec![kf(5.0, 0.0), kf(7.0, 1.0), kf(9.0, 2.0)])
            .with_curve_type(CurveType::Discrete);
        c.start(true);
        c.update(0.99);
        assert_eq!(c.value(), 5.0);
        c.update(0.02);
        assert_eq!(c.value(), 7.0);
    }

    #[test]
    fn test_discrete_reverse_holds_earlier_keyframe() {
        let mut c = Curve::new()
            .with_points(vec![kf(5.0, 0.0), kf(7.0, 1.0), kf(9.0, 2.0)])
            .with_curve_type(CurveType::Discrete)
            .with_reverse(true);
        c.start(true);
        c.update(0.5);
        assert_eq!(c.value(), 7.0);
    }

    #[test]
    fn test_loop_repeat_wraps_to_start() {
        let mut c = Curve::new().with_points(ramp()).with_repeat(1);
        c.start(true);
        c.update(2.0);
        assert_eq!(c.value(), 2.0);
        assert!(!c.is_done());
        assert_eq!(c.time(), 0.0);
        c.update(1.0);
        assert!(approx_eq(c.value(), 1.0));
        c.update(1.0);
        assert!(c.is_done());
    }

    #[test]
    fn test_large_dt_catches_up_across_loops() {
        let mut c = Curve::new().with_points(ramp()).with_repeat(2);
        c.start(true);
        // two full passes plus half a unit into the third
        c.update(4.5);
        assert!(!c.is_done());
        assert!(approx_eq(c.time(), 0.5));
        assert!(approx_eq(c.value(), 0.5));
        c.update(10.0);
        assert!(c.is_done());
        assert_eq!(c.value(), 2.0);
    }

    #[test]
    fn test_infinite_repeat_never_finishes() {
        let mut c = Curve::new().with_points(ramp()).with_repeat(REPEAT_FOREVER);
        c.start(true);
        for _ in 0..100 {
            c.update(0.7);
        }
        assert!(!c.is_done());
        assert!(c.is_running());
        c.update(1_000_000.25);
        assert!(!c.is_done());
        assert!(c.time() >= 0.0 && c.time() <= 2.0);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let mut looping = Curve::new()
            .with_points(vec![kf(0.0, 0.0), kf(2.0, 2.0)])
            .with_repeat(REPEAT_FOREVER);
        looping.start(true);
        looping.update(0.5);
        assert!(!looping.update(f32::INFINITY));
        assert!(!looping.update(f32::NAN));
        assert!(!looping.update(f32::NEG_INFINITY));
        assert!(approx_eq(looping.time(), 0.5));
        assert!(approx_eq(looping.value(), 0.5));
        assert!(looping.is_running());

        let mut bouncing = Curve::new()
            .with_points(vec![kf(0.0, 0.0), kf(2.0, 2.0)])
            .with_ping_pong(true)
            .with_repeat(REPEAT_FOREVER);
        bouncing.start(true);
        assert!(!bouncing.update(f32::NAN));
        assert!(!bouncing.update(f32::INFINITY));
        assert!(!bouncing.is_done());
        bouncing.update(1.0);
        assert!(approx_eq(bouncing.value(), 1.0));
    }

    #[test]
    fn test_huge_finite_dt_settles_inside_range() {
        let mut c = Curve::new()
            .with_points(ramp())
            .with_ping_pong(true)
            .with_repeat(REPEAT_FOREVER);
        c.start(true);
        c.update(f32::MAX);
        assert!(!c.is_done());
        assert!(c.time() >= 0.0 && c.time() <= 2.0);
        assert!(c.value().is_finite());
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut c = Curve::new().with_points(ramp());
        c.start(true);
        c.update(1.0);
        assert!(!c.update(-0.5));
        assert!(approx_eq(c.time(), 1.0));
    }

    #[test]
    fn test_infinite_ping_pong_large_dt_keeps_direction_parity() {
        let mut c = Curve::new()
            .with_points(ramp())
            .with_ping_pong(true)
            .with_repeat(REPEAT_FOREVER);
        c.start(true);
        // 0 -> 2 -> 0 -> 0.5
        c.update(4.5);
        assert!(!c.is_reversed());
        assert!(approx_eq(c.value(), 0.5));
        // 0.5 -> 2 -> 1.0 (going back)
        c.update(2.5);
        assert!(c.is_reversed());
        assert!(approx_eq(c.value(), 1.0));
    }

    #[test]
    fn test_on_done_fires_once() {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let mut c = Curve::new()
            .with_points(ramp())
            .with_on_done(move || *count_clone.lock().unwrap() += 1);
        c.start(true);
        c.update(5.0);
        c.update(5.0);
        c.update(5.0);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_on_update_reports_each_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let mut c = Curve::new().with_points(ramp());
        c.start_with(
            true,
            None,
            Some(Box::new(move |v: f32| seen_clone.lock().unwrap().push(v)) as OnUpdate),
        );
        c.update(1.0);
        c.update(1.0);
        c.update(1.0);
        assert_eq!(*seen.lock().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_restart_after_done_refills_repeats() {
        let mut c = Curve::new().with_points(ramp()).with_repeat(1);
        c.start(true);
        c.update(2.0);
        c.update(2.0);
        assert!(c.is_done());
        c.start(true);
        assert!(!c.is_done());
        assert_eq!(c.value(), 0.0);
        c.update(2.0);
        assert!(!c.is_done());
    }

    #[test]
    fn test_update_without_points_is_noop() {
        let mut c = Curve::new();
        c.start(true);
        assert!(!c.update(1.0));
        assert_eq!(c.value(), 0.0);
        assert_eq!(c.time(), 0.0);
    }

    #[test]
    fn test_update_before_start_is_noop() {
        let mut c = Curve::new().with_points(ramp());
        c.update(1.0);
        assert_eq!(c.time(), 0.0);
        assert!(!c.is_running());
    }

    #[test]
    fn test_single_keyframe_finishes_immediately() {
        let mut c = Curve::new().with_points(vec![kf(4.0, 0.0)]).with_repeat(REPEAT_FOREVER);
        c.start(true);
        assert!(!c.update(0.1));
        assert_eq!(c.value(), 4.0);
        assert!(!c.is_done());
    }

    #[test]
    fn test_linear_fraction_is_clamped() {
        let c = Curve::new().with_points(vec![kf(0.0, 0.0), kf(10.0, 1.0)]);
        assert_eq!(c.sample(1.0 + f32::EPSILON), 10.0);
        assert_eq!(c.sample(-f32::EPSILON), 0.0);
    }

    #[test]
    fn test_closest_time_indices_forward() {
        let pts = ramp();
        assert_eq!(closest_time_indices(&pts, -1.0, false), (0, 1));
        assert_eq!(closest_time_indices(&pts, 0.5, false), (0, 1));
        assert_eq!(closest_time_indices(&pts, 1.0, false), (1, 2));
        assert_eq!(closest_time_indices(&pts, 1.5, false), (1, 2));
        assert_eq!(closest_time_indices(&pts, 5.0, false), (1, 2));
    }

    #[test]
    fn test_closest_time_indices_reverse() {
        let pts = ramp();
        assert_eq!(closest_time_indices(&pts, 1.5, true), (2, 1));
        assert_eq!(closest_time_indices(&pts, 1.0, true), (1, 0));
        assert_eq!(closest_time_indices(&pts, 0.5, true), (1, 0));
        assert_eq!(closest_time_indices(&pts, 5.0, true), (2, 1));
    }

    #[test]
    fn test_closest_time_indices_single_point() {
        assert_eq!(closest_time_indices(&[kf(1.0, 1.0)], 3.0, false), (0, 0));
    }

    #[test]
    fn test_keyframes_deserialize_from_json() {
        let json = r#"[{"position": 1.0, "time": 0.5}, {"position": 0.0, "time": 0.0}]"#;
        let points: Vec<Keyframe> = serde_json::from_str(json).unwrap();
        let c = Curve::new().with_points(points);
        assert_eq!(c.points()[0], kf(0.0, 0.0));
    }
}
