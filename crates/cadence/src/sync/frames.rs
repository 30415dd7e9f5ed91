//! Frame-sequence adapter for video export.
//!
//! Times are quantized to frames at `fps` frames per second. An element
//! occupies `[floor(start * fps), ceil(end * fps))`, so a frame that is only
//! partly covered by an element still shows it. A small epsilon absorbs
//! floating-point noise so that a time landing exactly on a frame boundary
//! is not pushed into the neighbouring frame.

use serde::Serialize;

use cadence_core::{identifier::Id, semantic::ElementCategory};

use crate::{
    error::{CadenceError, ensure_positive},
    sync::{SyncAdapter, SyncView},
    timeline::Timeline,
};

/// Tolerance, in frames, applied before rounding.
const FRAME_EPSILON: f64 = 1e-9;

/// Largest frame count whose indices are all exact in an `f64`.
pub const MAX_FRAMES: f64 = (1u64 << 53) as f64;

fn frame_floor(seconds: f64, fps: f64) -> u64 {
    (seconds * fps + FRAME_EPSILON).floor().max(0.0) as u64
}

fn frame_ceil(seconds: f64, fps: f64) -> u64 {
    (seconds * fps - FRAME_EPSILON).ceil().max(0.0) as u64
}

/// Half-open frame range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameRange {
    start: u64,
    end: u64,
}

impl FrameRange {
    /// Creates a range, clamping `end` to be at least `start`.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, frame: u64) -> bool {
        self.start <= frame && frame < self.end
    }
}

/// Frames during which one element animates in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementFrames {
    element_id: Id,
    category: ElementCategory,
    frames: FrameRange,
    start_time: f64,
    end_time: f64,
}

impl ElementFrames {
    pub fn element_id(&self) -> Id {
        self.element_id
    }

    pub fn category(&self) -> ElementCategory {
        self.category
    }

    pub fn frames(&self) -> FrameRange {
        self.frames
    }

    /// Start of the reveal window in seconds.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the reveal window in seconds.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// How far the reveal has run by the end of `frame`, from `0.0` (not
    /// started) to `1.0` (fully revealed).
    pub fn progress_at(&self, frame: u64, fps: f64) -> f64 {
        let time = frame.saturating_add(1) as f64 / fps;
        let span = self.end_time - self.start_time;
        if span <= 0.0 {
            return if time >= self.end_time { 1.0 } else { 0.0 };
        }
        ((time - self.start_time) / span).clamp(0.0, 1.0)
    }
}

/// One drawable layer of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum FrameLayer {
    Background,
    Element(Id),
}

/// Frame-quantized view of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameManifest {
    fps: f64,
    total_duration: f64,
    total_frames: u64,
    background: FrameRange,
    elements: Vec<ElementFrames>,
}

impl FrameManifest {
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Number of frames, `ceil(total_duration * fps)`.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// The background layer, which spans every frame.
    pub fn background(&self) -> FrameRange {
        self.background
    }

    /// Element ranges in reveal order.
    pub fn elements(&self) -> &[ElementFrames] {
        &self.elements
    }

    /// Elements animating during `frame`.
    pub fn elements_active_at(&self, frame: u64) -> impl Iterator<Item = &ElementFrames> {
        self.elements
            .iter()
            .filter(move |element| element.frames.contains(frame))
    }

    /// Elements that have started animating by `frame`, including those
    /// already fully revealed.
    pub fn elements_visible_at(&self, frame: u64) -> impl Iterator<Item = &ElementFrames> {
        self.elements
            .iter()
            .filter(move |element| element.frames.start <= frame && frame < self.total_frames)
    }

    /// Reveal progress of `element_id` at `frame`, or `None` if the element
    /// is not part of the manifest.
    ///
    /// A frame is rendered as of its end, so the last frame of an element's
    /// range reaches `1.0`.
    pub fn progress_at(&self, element_id: Id, frame: u64) -> Option<f64> {
        self.elements
            .iter()
            .find(|element| element.element_id == element_id)
            .map(|element| element.progress_at(frame, self.fps))
    }

    /// Layers to draw for `frame`, background first. Empty past the last
    /// frame.
    pub fn layers_at(&self, frame: u64) -> Vec<FrameLayer> {
        if !self.background.contains(frame) {
            return Vec::new();
        }
        std::iter::once(FrameLayer::Background)
            .chain(
                self.elements_visible_at(frame)
                    .map(|element| FrameLayer::Element(element.element_id)),
            )
            .collect()
    }
}

impl SyncView for FrameManifest {
    fn total_duration(&self) -> f64 {
        self.total_duration
    }
}

/// Adapter producing a [`FrameManifest`] at a fixed frame rate.
#[derive(Debug, Clone, Copy)]
pub struct FrameSequence {
    fps: f64,
}

impl FrameSequence {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }
}

impl SyncAdapter for FrameSequence {
    type View = FrameManifest;

    fn project(&self, timeline: &Timeline) -> Result<Self::View, CadenceError> {
        to_frame_sequence(timeline, self.fps)
    }
}

/// Quantizes `timeline` to frames at `fps`.
///
/// Every element range is clamped to `[0, total_frames)` and covers at least
/// one frame when there is room for it.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidConfig`] when `fps` is not a positive
/// finite number, or when the timeline would span more than [`MAX_FRAMES`]
/// frames at that rate.
pub fn to_frame_sequence(timeline: &Timeline, fps: f64) -> Result<FrameManifest, CadenceError> {
    ensure_positive("fps", fps)?;

    let total_duration = timeline.total_duration();
    let frame_span = total_duration * fps;
    if !frame_span.is_finite() || frame_span > MAX_FRAMES {
        return Err(CadenceError::invalid_config(format!(
            "{total_duration}s at {fps} fps exceeds the frame limit of {MAX_FRAMES}"
        )));
    }
    let total_frames = frame_ceil(total_duration, fps);
    let elements = timeline
        .entries()
        .iter()
        .map(|entry| {
            let start = frame_floor(entry.start(), fps).min(total_frames);
            let end = frame_ceil(entry.end(), fps)
                .max(start.saturating_add(1))
                .min(total_frames);
            ElementFrames {
                element_id: entry.element_id(),
                category: entry.category(),
                frames: FrameRange::new(start, end),
                start_time: entry.start(),
                end_time: entry.end(),
            }
        })
        .collect();

    Ok(FrameManifest {
        fps,
        total_duration,
        total_frames,
        background: FrameRange::new(0, total_frames),
        elements,
    })
}
