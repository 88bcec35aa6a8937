use crate::{
    animation::{
        ease::Ease,
        timeline::{Action, Prop, Timeline, Value},
    },
    foundation::core::Seconds,
    render::scene::{ElementId, Scene},
};

/// Mutable scene plus the timeline being built for it.
pub struct Stage<'a> {
    /// Scene that immediate mutations go to.
    pub scene: &'a mut Scene,
    /// Timeline that animated operations are scheduled on.
    pub timeline: &'a mut Timeline,
}

impl<'a> Stage<'a> {
    /// Borrow a scene and timeline together.
    pub fn new(scene: &'a mut Scene, timeline: &'a mut Timeline) -> Self {
        Self { scene, timeline }
    }

    /// Apply attribute values immediately, without a tween.
    pub fn set(&mut self, target: ElementId, props: &[(Prop, Value)]) {
        self.scene.write_all(target, props);
    }
}

/// How scheduled changes reach the scene: tweened over time or applied at once.
///
/// Phase builders only talk to this trait, so the same scheduling code serves both the full
/// choreography and the reduced-motion rendition.
pub trait Motion: std::fmt::Debug + Send + Sync {
    /// Whether ripple and typewriter decorations are produced.
    fn decorations_enabled(&self) -> bool;

    /// Move `target` toward `props`.
    fn to(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    );

    /// Enter `target` from `start` toward its current (final) attribute values.
    fn from(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        start: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    );

    /// Move `target` toward `props`, then remove it.
    fn exit(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    );

    /// Reveal `text` in `target`, one character every `char_delay` seconds from `at`.
    fn type_text(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        text: &str,
        at: Seconds,
        char_delay: Seconds,
    );
}

/// Full choreography: every change becomes a timeline entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct Animated;

impl Motion for Animated {
    fn decorations_enabled(&self) -> bool {
        true
    }

    fn to(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    ) {
        stage.timeline.to(target, props, at, duration, ease);
    }

    fn from(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        start: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    ) {
        let finals: Vec<(Prop, Value)> = start
            .iter()
            .filter_map(|(prop, _)| stage.scene.read(target, *prop).map(|v| (*prop, v)))
            .collect();
        stage.set(target, &start);
        stage.timeline.to(target, finals, at, duration, ease);
    }

    fn exit(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    ) {
        stage.timeline.to(target, props, at, duration, ease);
        stage.timeline.call(Action::Detach(target), at + duration);
    }

    fn type_text(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        text: &str,
        at: Seconds,
        char_delay: Seconds,
    ) {
        if let Some(attrs) = stage.scene.attrs_mut(target) {
            attrs.text.clear();
        }
        for (i, ch) in text.chars().enumerate() {
            stage
                .timeline
                .call(Action::AppendText { target, ch }, at + i as f64 * char_delay);
        }
    }
}

/// Reduced motion: every change lands on the scene immediately and nothing is scheduled.
#[derive(Clone, Copy, Debug, Default)]
pub struct Instant;

impl Motion for Instant {
    fn decorations_enabled(&self) -> bool {
        false
    }

    fn to(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        _at: Seconds,
        _duration: Seconds,
        _ease: Ease,
    ) {
        stage.set(target, &props);
    }

    fn from(
        &self,
        _stage: &mut Stage<'_>,
        _target: ElementId,
        _start: Vec<(Prop, Value)>,
        _at: Seconds,
        _duration: Seconds,
        _ease: Ease,
    ) {
    }

    fn exit(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        _props: Vec<(Prop, Value)>,
        _at: Seconds,
        _duration: Seconds,
        _ease: Ease,
    ) {
        stage.scene.detach(target);
    }

    fn type_text(
        &self,
        stage: &mut Stage<'_>,
        target: ElementId,
        text: &str,
        _at: Seconds,
        _char_delay: Seconds,
    ) {
        if let Some(attrs) = stage.scene.attrs_mut(target) {
            attrs.text = text.to_owned();
        }
    }
}

/// Host motion preference, read once when the engine is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreference {
    /// Full choreography.
    #[default]
    Full,
    /// Reduced motion requested.
    Reduced,
}

/// Motion strategy for a preference.
pub fn create_motion(preference: MotionPreference) -> Box<dyn Motion> {
    match preference {
        MotionPreference::Full => Box::new(Animated),
        MotionPreference::Reduced => Box::new(Instant),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
