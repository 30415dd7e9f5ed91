//! Sync adapters.
//!
//! Each adapter projects a [`Timeline`] into the representation one output
//! modality needs, without changing the underlying timing:
//!
//! - [`Continuous`] - per-element CSS-style delay and duration
//! - [`FrameSequence`] - integer frame ranges at a fixed frame rate
//! - [`Narration`] - narration cues grouped into beats
//!
//! Every view reports the same total duration as the timeline it came from.

mod continuous;
mod frames;
mod narration;

pub use continuous::{Continuous, ContinuousAnimation, CssTiming, to_continuous_animation};
pub use frames::{
    ElementFrames, FrameLayer, FrameManifest, FrameRange, FrameSequence, MAX_FRAMES,
    to_frame_sequence,
};
pub use narration::{
    Grouping, Narration, NarrationCue, NarrationScript, SrtTimestamp, to_narration_cues,
};

use crate::{error::CadenceError, timeline::Timeline};

/// A read-only projection of a [`Timeline`].
pub trait SyncAdapter {
    type View: SyncView;

    /// Projects `timeline` into this adapter's view.
    fn project(&self, timeline: &Timeline) -> Result<Self::View, CadenceError>;
}

/// Common surface of every adapter view.
pub trait SyncView {
    /// Total duration in seconds, copied from the source timeline.
    fn total_duration(&self) -> f64;
}
