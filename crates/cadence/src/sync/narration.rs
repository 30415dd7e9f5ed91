//! Narration adapter.
//!
//! Elements are grouped into beats according to a [`Grouping`] policy. Each
//! beat becomes one cue spanning from the earliest start to the latest end
//! of its elements. Cues are sorted by start time and any cue that begins
//! before the previous one ends is folded into it, so the resulting script
//! never has overlapping cues.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use cadence_core::{identifier::Id, semantic::ElementCategory};

use crate::{
    error::CadenceError,
    sync::{SyncAdapter, SyncView},
    timeline::Timeline,
};

/// How timeline entries are grouped into narration beats.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One beat per element.
    #[default]
    PerElement,
    /// One beat per element category.
    ByCategory,
    /// Explicit beats, each listing the ids it covers. Elements not named in
    /// any beat get a beat of their own.
    Beats(Vec<Vec<Id>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BeatKey {
    Element(usize),
    Category(ElementCategory),
    Beat(usize),
}

impl Grouping {
    fn key_for(&self, position: usize, element_id: Id, category: ElementCategory) -> BeatKey {
        match self {
            Self::PerElement => BeatKey::Element(position),
            Self::ByCategory => BeatKey::Category(category),
            Self::Beats(beats) => beats
                .iter()
                .position(|beat| beat.contains(&element_id))
                .map_or(BeatKey::Element(position), BeatKey::Beat),
        }
    }
}

/// A time window in which the narration covers one or more elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationCue {
    start: f64,
    end: f64,
    element_ids: Vec<Id>,
}

impl NarrationCue {
    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Elements covered by the cue, in timeline order.
    pub fn element_ids(&self) -> &[Id] {
        &self.element_ids
    }

    /// The earliest element covered by the cue.
    pub fn element_id(&self) -> Option<Id> {
        self.element_ids.first().copied()
    }

    /// Renders the cue window as an SRT time range.
    pub fn srt_range(&self) -> String {
        format!(
            "{} --> {}",
            SrtTimestamp(self.start),
            SrtTimestamp(self.end)
        )
    }
}

/// Formats seconds as `HH:MM:SS,mmm`.
#[derive(Debug, Clone, Copy)]
pub struct SrtTimestamp(pub f64);

impl fmt::Display for SrtTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.0.max(0.0) * 1000.0).round() as u64;
        let (hours, rest) = (total_ms / 3_600_000, total_ms % 3_600_000);
        let (minutes, rest) = (rest / 60_000, rest % 60_000);
        let (seconds, millis) = (rest / 1000, rest % 1000);
        write!(f, "{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
    }
}

/// Narration view of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationScript {
    total_duration: f64,
    cues: Vec<NarrationCue>,
}

impl NarrationScript {
    /// Cues sorted by start time, without overlaps.
    pub fn cues(&self) -> &[NarrationCue] {
        &self.cues
    }

    /// Renders the cues as an SRT document. `text` supplies the caption for
    /// each cue.
    pub fn to_srt(&self, mut text: impl FnMut(&NarrationCue) -> String) -> String {
        self.cues
            .iter()
            .enumerate()
            .map(|(i, cue)| format!("{}\n{}\n{}\n", i + 1, cue.srt_range(), text(cue)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl SyncView for NarrationScript {
    fn total_duration(&self) -> f64 {
        self.total_duration
    }
}

/// Adapter producing a [`NarrationScript`].
#[derive(Debug, Clone, Default)]
pub struct Narration {
    grouping: Grouping,
}

impl Narration {
    pub fn new(grouping: Grouping) -> Self {
        Self { grouping }
    }
}

impl SyncAdapter for Narration {
    type View = NarrationScript;

    fn project(&self, timeline: &Timeline) -> Result<Self::View, CadenceError> {
        Ok(to_narration_cues(timeline, &self.grouping))
    }
}

/// A beat window whose members still carry their timeline positions.
struct Window {
    start: f64,
    end: f64,
    members: Vec<(usize, Id)>,
}

impl Window {
    fn into_cue(mut self) -> NarrationCue {
        self.members.sort_unstable_by_key(|(position, _)| *position);
        NarrationCue {
            start: self.start,
            end: self.end,
            element_ids: self.members.into_iter().map(|(_, id)| id).collect(),
        }
    }
}

/// Groups timeline entries into non-overlapping narration cues.
///
/// The elements of each cue are listed in timeline order, even when an
/// explicit beat names them in another order or a coalesced cue absorbs an
/// earlier element.
pub fn to_narration_cues(timeline: &Timeline, grouping: &Grouping) -> NarrationScript {
    let mut beats: IndexMap<BeatKey, Window> = IndexMap::new();
    for (position, entry) in timeline.entries().iter().enumerate() {
        let key = grouping.key_for(position, entry.element_id(), entry.category());
        let member = (position, entry.element_id());
        beats
            .entry(key)
            .and_modify(|window| {
                window.start = window.start.min(entry.start());
                window.end = window.end.max(entry.end());
                window.members.push(member);
            })
            .or_insert_with(|| Window {
                start: entry.start(),
                end: entry.end(),
                members: vec![member],
            });
    }

    let mut windows: Vec<Window> = beats.into_values().collect();
    windows.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Window> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(current) if window.start < current.end => {
                current.end = current.end.max(window.end);
                current.members.extend(window.members);
            }
            _ => merged.push(window),
        }
    }

    NarrationScript {
        total_duration: timeline.total_duration(),
        cues: merged.into_iter().map(Window::into_cue).collect(),
    }
}
