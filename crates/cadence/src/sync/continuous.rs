//! Continuous-time adapter for CSS-style animation.

use std::fmt::Write;

use serde::Serialize;

use cadence_core::{
    identifier::Id,
    semantic::{AnimationKind, ElementCategory, Easing},
};

use crate::{
    error::CadenceError,
    sync::{SyncAdapter, SyncView},
    timeline::Timeline,
};

/// CSS animation settings of one element. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CssTiming {
    element_id: Id,
    category: ElementCategory,
    delay: f64,
    duration: f64,
    animation: AnimationKind,
    easing: Easing,
    looped: bool,
}

impl CssTiming {
    pub fn element_id(&self) -> Id {
        self.element_id
    }

    pub fn category(&self) -> ElementCategory {
        self.category
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn animation(&self) -> AnimationKind {
        self.animation
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn looped(&self) -> bool {
        self.looped
    }

    /// `infinite` for looping reveals, `1` otherwise.
    pub fn iteration_count(&self) -> &'static str {
        if self.looped { "infinite" } else { "1" }
    }

    /// Renders the animation as CSS declarations. Times are rounded to
    /// milliseconds and the final keyframe is held.
    ///
    /// ```
    /// # use cadence::{config::TimelineConfig, order::AnimatedElement, timeline::build_timeline};
    /// # use cadence::{identifier::Id, semantic::ElementCategory, sync::to_continuous_animation};
    /// let elements = [AnimatedElement::new(Id::new("a"), ElementCategory::Node, 0)];
    /// let timeline = build_timeline(&elements, &TimelineConfig::default()).unwrap();
    /// let css = to_continuous_animation(&timeline);
    /// assert_eq!(
    ///     css.entries()[0].css_declarations(),
    ///     "animation-name: fadeIn; animation-delay: 0.000s; animation-duration: 0.500s; \
    ///      animation-timing-function: ease-out; animation-iteration-count: 1; \
    ///      animation-fill-mode: forwards;"
    /// );
    /// ```
    pub fn css_declarations(&self) -> String {
        format!(
            "animation-name: {}; animation-delay: {:.3}s; animation-duration: {:.3}s; \
             animation-timing-function: {}; animation-iteration-count: {}; \
             animation-fill-mode: forwards;",
            self.animation.keyframes(),
            self.delay,
            self.duration,
            self.easing.css_name(),
            self.iteration_count()
        )
    }
}

/// Continuous-time view of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousAnimation {
    total_duration: f64,
    entries: Vec<CssTiming>,
}

impl ContinuousAnimation {
    pub fn entries(&self) -> &[CssTiming] {
        &self.entries
    }

    pub fn timing(&self, element_id: Id) -> Option<&CssTiming> {
        self.entries.iter().find(|t| t.element_id == element_id)
    }

    /// Renders one CSS rule per element, keyed by a `data-id` attribute
    /// selector. Ids are escaped as CSS strings.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for timing in &self.entries {
            // Writing to a String cannot fail.
            let _ = writeln!(
                css,
                "[data-id=\"{}\"] {{ {} }}",
                escape_css_string(&timing.element_id.to_owned_string()),
                timing.css_declarations()
            );
        }
        css
    }
}

/// Escapes `value` for use inside a double-quoted CSS string.
fn escape_css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            // Control characters become hex escapes; the trailing space ends
            // the escape.
            c if c.is_control() => {
                let _ = write!(escaped, "\\{:x} ", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

impl SyncView for ContinuousAnimation {
    fn total_duration(&self) -> f64 {
        self.total_duration
    }
}

/// Adapter producing a [`ContinuousAnimation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Continuous;

impl SyncAdapter for Continuous {
    type View = ContinuousAnimation;

    fn project(&self, timeline: &Timeline) -> Result<Self::View, CadenceError> {
        Ok(to_continuous_animation(timeline))
    }
}

/// Maps every timeline entry to its CSS animation settings.
pub fn to_continuous_animation(timeline: &Timeline) -> ContinuousAnimation {
    let entries = timeline
        .entries()
        .iter()
        .map(|entry| CssTiming {
            element_id: entry.element_id(),
            category: entry.category(),
            delay: entry.start(),
            duration: entry.duration(),
            animation: entry.animation(),
            easing: entry.easing(),
            looped: entry.looped(),
        })
        .collect();
    ContinuousAnimation {
        total_duration: timeline.total_duration(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TimelineConfig, order::AnimatedElement, timeline::build_timeline};

    fn timeline(n: usize) -> Timeline {
        let elements: Vec<_> = (0..n)
            .map(|i| AnimatedElement::new(Id::new(&format!("css{i}")), ElementCategory::Node, i))
            .collect();
        build_timeline(&elements, &TimelineConfig::default()).unwrap()
    }

    #[test]
    fn test_delays_match_starts() {
        let timeline = timeline(4);
        let view = to_continuous_animation(&timeline);

        assert_eq!(view.entries().len(), 4);
        for (timing, entry) in view.entries().iter().zip(timeline.entries()) {
            assert_eq!(timing.delay(), entry.start());
            assert_eq!(timing.duration(), entry.duration());
            assert_eq!(timing.element_id(), entry.element_id());
        }
        assert_eq!(view.total_duration(), timeline.total_duration());
    }

    #[test]
    fn test_css_declarations() {
        let view = to_continuous_animation(&timeline(3));
        assert_eq!(
            view.entries()[2].css_declarations(),
            "animation-name: fadeIn; animation-delay: 0.600s; animation-duration: 0.500s; \
             animation-timing-function: ease-out; animation-iteration-count: 1; \
             animation-fill-mode: forwards;"
        );
    }

    #[test]
    fn test_css_declarations_follow_config() {
        let config = TimelineConfig::default()
            .with_easing(Easing::Linear)
            .with_loop(true);
        let elements = [
            AnimatedElement::new(Id::new("m"), ElementCategory::Node, 0),
            AnimatedElement::new(Id::new("m->m"), ElementCategory::Edge, 1),
        ];
        let view = to_continuous_animation(&build_timeline(&elements, &config).unwrap());

        let edge = view.timing(Id::new("m->m")).unwrap();
        assert_eq!(edge.animation(), AnimationKind::Draw);
        assert_eq!(edge.iteration_count(), "infinite");
        let css = edge.css_declarations();
        assert!(css.starts_with("animation-name: drawPath;"));
        assert!(css.contains("animation-timing-function: linear;"));
        assert!(css.contains("animation-iteration-count: infinite;"));
    }

    #[test]
    fn test_stylesheet_has_rule_per_element() {
        let view = to_continuous_animation(&timeline(2));
        let css = view.stylesheet();
        assert_eq!(css.lines().count(), 2);
        assert!(css.starts_with("[data-id=\"css0\"] { animation-name: fadeIn;"));
    }

    #[test]
    fn test_stylesheet_escapes_ids() {
        let elements = [AnimatedElement::new(
            Id::new("evil\"] * { color: red } [x=\"\\"),
            ElementCategory::Node,
            0,
        )];
        let timeline = build_timeline(&elements, &TimelineConfig::default()).unwrap();
        let css = to_continuous_animation(&timeline).stylesheet();
        assert_eq!(css.lines().count(), 1);
        assert!(css.starts_with(
            "[data-id=\"evil\\\"] * { color: red } [x=\\\"\\\\\"] { animation-name: fadeIn;"
        ));
    }

    #[test]
    fn test_escape_css_string() {
        assert_eq!(escape_css_string("plain"), "plain");
        assert_eq!(escape_css_string("a\"b"), "a\\\"b");
        assert_eq!(escape_css_string("a\\b"), "a\\\\b");
        assert_eq!(escape_css_string("line\nbreak"), "line\\a break");
    }

    #[test]
    fn test_adapter_trait() {
        let timeline = timeline(1);
        let view = Continuous.project(&timeline).unwrap();
        assert_eq!(view, to_continuous_animation(&timeline));
        assert!(view.timing(Id::new("css0")).is_some());
    }

    #[test]
    fn test_empty_timeline() {
        let view = to_continuous_animation(&timeline(0));
        assert!(view.entries().is_empty());
        assert_eq!(view.total_duration(), 0.0);
    }
}
