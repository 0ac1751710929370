//! Frame/event animation clips and their playback controller.
//!
//! An [`AnimationData`] clip is a list of [`AnimationFrame`]s, each carrying
//! the [`AnimationEvent`]s that fire when playback reaches that frame. The
//! [`AnimationController`] component plays a clip against a
//! [`SpriteController`], which receives sprite swaps, flips and rotations.
//! Callback events are handed back to the caller in an [`AnimationTick`].
//!
//! See [`crate::systems::animation`] for the system that drives controllers
//! attached to entities.

use bevy_ecs::prelude::Component;
use log::warn;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Frame rate used when a clip does not provide a usable one.
pub const DEFAULT_FRAME_RATE: f32 = 12.0;

/// Something an animation frame does when it is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnimationEvent {
    /// Show another sprite.
    SpriteChange { sprite: String },
    /// Set the horizontal/vertical flip state.
    Flip { horizontal: bool, vertical: bool },
    /// Set the rotation in degrees.
    Rotate { degrees: f32 },
    /// Notify game logic by name.
    Callback { name: String },
}

/// Events attached to one frame number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub frame: u32,
    #[serde(default)]
    pub events: Vec<AnimationEvent>,
}

impl AnimationFrame {
    pub fn new(frame: u32, events: impl Into<Vec<AnimationEvent>>) -> Self {
        Self {
            frame,
            events: events.into(),
        }
    }
}

/// A playable clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub frames: Vec<AnimationFrame>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// First frame to play; defaults to the clip's first frame.
    #[serde(default)]
    pub start_frame: Option<u32>,
    /// Last frame to play; defaults to the clip's last frame.
    #[serde(default)]
    pub end_frame: Option<u32>,
    /// Restart from the start frame instead of finishing.
    #[serde(default)]
    pub looped: bool,
}

fn default_frame_rate() -> f32 {
    DEFAULT_FRAME_RATE
}

impl AnimationData {
    pub fn new(frames: impl Into<Vec<AnimationFrame>>, frame_rate: f32) -> Self {
        Self {
            frames: frames.into(),
            frame_rate,
            start_frame: None,
            end_frame: None,
            looped: false,
        }
    }
    pub fn with_start_frame(mut self, frame: u32) -> Self {
        self.start_frame = Some(frame);
        self
    }
    pub fn with_end_frame(mut self, frame: u32) -> Self {
        self.end_frame = Some(frame);
        self
    }
    pub fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }
}

/// Receiver of the visual events of an animation.
pub trait SpriteController {
    fn set_sprite(&mut self, sprite: &str);
    fn flip(&mut self, horizontal: bool, vertical: bool);
    fn rotate(&mut self, degrees: f32);
}

/// What happened during one `start`/`update` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTick {
    /// Names of the callback events fired, in order.
    pub callbacks: SmallVec<[String; 2]>,
    /// The clip finished during this call.
    pub finished: bool,
}

/// Plays an [`AnimationData`] clip.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationController {
    frames: Vec<AnimationFrame>,
    frame_rate: f32,
    looped: bool,
    first_frame: u32,
    last_frame: u32,
    start_index: usize,
    end_index: usize,
    frame_index: usize,
    animation_time: f32,
    is_done: bool,
    /// Clip waiting to be started by the animation system.
    pending: Option<AnimationData>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose clip is started on the next animation system run.
    pub fn with_clip(data: AnimationData) -> Self {
        Self {
            pending: Some(data),
            ..Self::default()
        }
    }

    /// Queue a clip for the animation system to start.
    pub fn play(&mut self, data: AnimationData) {
        self.pending = Some(data);
    }

    pub(crate) fn take_pending(&mut self) -> Option<AnimationData> {
        self.pending.take()
    }

    /// Start playing `data`, firing the start frame's events immediately.
    pub fn start(&mut self, data: &AnimationData, sprite: &mut dyn SpriteController) -> AnimationTick {
        let mut tick = AnimationTick::default();

        let mut frames = data.frames.clone();
        frames.sort_by_key(|f| f.frame);
        self.frames = frames;
        self.looped = data.looped;
        self.frame_rate = if data.frame_rate > 0.0 && data.frame_rate.is_finite() {
            data.frame_rate
        } else {
            warn!(
                "Animation frame rate {} is not usable, using {}",
                data.frame_rate, DEFAULT_FRAME_RATE
            );
            DEFAULT_FRAME_RATE
        };

        let (Some(clip_first), Some(clip_last)) = (self.frames.first(), self.frames.last()) else {
            warn!("Animation started with an empty clip");
            self.first_frame = 0;
            self.last_frame = 0;
            self.start_index = 0;
            self.end_index = 0;
            self.frame_index = 0;
            self.animation_time = 0.0;
            self.is_done = true;
            tick.finished = true;
            return tick;
        };
        let (clip_first, clip_last) = (clip_first.frame, clip_last.frame);

        let mut first = data.start_frame.unwrap_or(clip_first);
        let mut last = data.end_frame.unwrap_or(clip_last);
        if first < clip_first || first > clip_last || last < clip_first || last > clip_last {
            warn!(
                "Animation bounds {}..={} clamped to clip {}..={}",
                first, last, clip_first, clip_last
            );
            first = first.clamp(clip_first, clip_last);
            last = last.clamp(clip_first, clip_last);
        }
        if last < first {
            warn!("Animation end frame {} before start {}, swapping", last, first);
            std::mem::swap(&mut first, &mut last);
        }

        self.first_frame = first;
        self.last_frame = last;
        self.start_index = closest_frame_index(&self.frames, first);
        self.end_index = closest_frame_index(&self.frames, last);
        self.frame_index = self.start_index;
        self.animation_time = first as f32 / self.frame_rate;
        self.is_done = false;

        self.fire_frame(self.frame_index, sprite, &mut tick);
        tick
    }

    /// Advance playback by `dt` seconds, firing every frame crossed.
    ///
    /// A negative or non-finite `dt` fires nothing.
    pub fn update(&mut self, dt: f32, sprite: &mut dyn SpriteController) -> AnimationTick {
        let mut tick = AnimationTick::default();
        if self.is_done || self.frames.is_empty() || !dt.is_finite() {
            return tick;
        }
        self.animation_time += dt.max(0.0);

        loop {
            while self.frame_index < self.end_index {
                let next = self.frame_index + 1;
                if self.animation_time < self.frame_time(self.frames[next].frame) {
                    break;
                }
                self.frame_index = next;
                self.fire_frame(next, sprite, &mut tick);
            }

            let end_time = self.end_time();
            if self.animation_time < end_time {
                return tick;
            }
            let start_time = self.frame_time(self.first_frame);
            let period = end_time - start_time;
            if !self.looped || period <= 0.0 || !self.animation_time.is_finite() {
                self.is_done = true;
                tick.finished = true;
                return tick;
            }

            // Whole periods past the end fire nothing new.
            let excess = self.animation_time - end_time;
            self.animation_time = start_time + excess.rem_euclid(period);
            if self.animation_time >= end_time {
                self.animation_time = start_time;
            }
            self.frame_index = self.start_index;
            self.fire_frame(self.frame_index, sprite, &mut tick);
        }
    }

    fn frame_time(&self, frame: u32) -> f32 {
        frame as f32 / self.frame_rate
    }

    /// Time at which the last frame's slot ends.
    fn end_time(&self) -> f32 {
        (self.last_frame as f32 + 1.0) / self.frame_rate
    }

    fn fire_frame(&self, index: usize, sprite: &mut dyn SpriteController, tick: &mut AnimationTick) {
        for event in &self.frames[index].events {
            match event {
                AnimationEvent::SpriteChange { sprite: key } => sprite.set_sprite(key),
                AnimationEvent::Flip {
                    horizontal,
                    vertical,
                } => sprite.flip(*horizontal, *vertical),
                AnimationEvent::Rotate { degrees } => sprite.rotate(*degrees),
                AnimationEvent::Callback { name } => tick.callbacks.push(name.clone()),
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }
    /// Frame number of the current clip entry.
    pub fn current_frame(&self) -> Option<u32> {
        self.frames.get(self.frame_index).map(|f| f.frame)
    }
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }
    pub fn first_frame(&self) -> u32 {
        self.first_frame
    }
    pub fn last_frame(&self) -> u32 {
        self.last_frame
    }
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

/// Index of the clip entry closest to `frame`.
///
/// At or before the first entry returns 0, at or after the last returns the
/// last index, an exact match returns its index and anything in between
/// returns the entry to its left. An empty slice returns 0.
pub fn closest_frame_index(frames: &[AnimationFrame], frame: u32) -> usize {
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return 0;
    };
    if frame <= first.frame {
        return 0;
    }
    if frame >= last.frame {
        return frames.len() - 1;
    }
    match frames.binary_search_by(|f| f.frame.cmp(&frame)) {
        Ok(i) => i,
        Err(i) => i - 1,
    }
}
