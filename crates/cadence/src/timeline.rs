//! The canonical animation timeline.
//!
//! A [`Timeline`] is the single source of timing truth. Every sync adapter is
//! a read-only projection of it. Timelines are immutable once built and
//! cheap to clone, so they can be shared across threads.

use std::sync::Arc;

use log::info;
use serde::Serialize;

use cadence_core::{
    identifier::Id,
    semantic::{AnimationKind, ElementCategory, Easing},
};

use crate::{config::TimelineConfig, error::CadenceError, order::AnimatedElement};

/// The reveal window of one element, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineEntry {
    element_id: Id,
    category: ElementCategory,
    index: usize,
    start: f64,
    end: f64,
    animation: AnimationKind,
    easing: Easing,
    looped: bool,
}

impl TimelineEntry {
    pub fn element_id(&self) -> Id {
        self.element_id
    }

    pub fn category(&self) -> ElementCategory {
        self.category
    }

    /// Position of the element in reveal order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn animation(&self) -> AnimationKind {
        self.animation
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Returns true if the reveal repeats after `end`.
    pub fn looped(&self) -> bool {
        self.looped
    }

    /// Returns true if `time` falls within `[start, end)`.
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Immutable, ordered list of reveal windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    entries: Arc<[TimelineEntry]>,
    total_duration: f64,
}

impl Timeline {
    /// Returns the entries in reveal order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest end time over all entries, or zero for an empty timeline.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Finds the entry of an element.
    pub fn entry(&self, element_id: Id) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| entry.element_id == element_id)
    }

    /// Iterates the entries active at `time`.
    pub fn active_at(&self, time: f64) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().filter(move |entry| entry.is_active_at(time))
    }
}

/// Builds a timeline for `elements`.
///
/// Elements are taken in ascending `index` order. With staggering, element
/// `i` starts at `initial_delay + i * inter_element_delay`; without it every
/// element starts at `initial_delay`. Each element runs for the duration
/// and with the effect configured for its category.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidConfig`] if `config` is invalid.
///
/// # Examples
///
/// ```
/// # use cadence::{config::TimelineConfig, order::AnimatedElement, timeline::build_timeline};
/// # use cadence::{identifier::Id, semantic::ElementCategory};
/// let elements = [
///     AnimatedElement::new(Id::new("a"), ElementCategory::Node, 0),
///     AnimatedElement::new(Id::new("b"), ElementCategory::Node, 1),
/// ];
/// let timeline = build_timeline(&elements, &TimelineConfig::default()).unwrap();
/// assert_eq!(timeline.entries()[1].start(), 0.3);
/// assert_eq!(timeline.total_duration(), 0.8);
/// ```
pub fn build_timeline(
    elements: &[AnimatedElement],
    config: &TimelineConfig,
) -> Result<Timeline, CadenceError> {
    config.validate()?;

    let mut ordered = elements.to_vec();
    ordered.sort_by_key(AnimatedElement::index);

    let entries: Arc<[TimelineEntry]> = ordered
        .iter()
        .enumerate()
        .map(|(position, element)| {
            let start = if config.stagger() {
                config.initial_delay() + position as f64 * config.inter_element_delay()
            } else {
                config.initial_delay()
            };
            TimelineEntry {
                element_id: element.id(),
                category: element.category(),
                index: position,
                start,
                end: start + config.duration_for(element.category()),
                animation: config.animation_for(element.category()),
                easing: config.easing(),
                looped: config.looped(),
            }
        })
        .collect();

    let total_duration = entries.iter().map(|entry| entry.end).fold(0.0, f64::max);
    info!(entries = entries.len(), total_duration; "Timeline built");

    Ok(Timeline {
        entries,
        total_duration,
    })
}
