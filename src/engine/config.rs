use crate::{
    foundation::core::{Canvas, Seconds},
    foundation::error::{ConstellationError, ConstellationResult},
    geometry::placement::{CaptionLayout, CardLayout},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Engine configuration. Every field has a default; JSON documents may be partial.
pub struct EngineConfig {
    /// Fixed pixel dimensions of the projection target.
    pub view_box: Canvas,
    /// Offsets and durations of the choreography.
    pub timing: TimingConfig,
    /// Element boxes and stroke constants.
    pub layout: LayoutConfig,
    /// Handling of new connections whose growth order cannot be resolved.
    pub cycle_policy: CyclePolicy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What to do with new connections caught in a dependency cycle.
pub enum CyclePolicy {
    /// Render them at final state with no growth tween.
    #[default]
    Instant,
    /// Leave them unrendered for this transition.
    Skip,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Choreography constants, in seconds unless noted.
pub struct TimingConfig {
    /// Fade/shrink duration of removed elements (all start at offset 0).
    pub removal_duration: Seconds,
    /// Offset of reposition and reshape tweens.
    pub reposition_at: Seconds,
    /// Duration of reposition and reshape tweens.
    pub reposition_duration: Seconds,
    /// Appearance time of the first root point of an addition batch.
    pub root_base_delay: Seconds,
    /// Extra delay per further root point.
    pub root_stagger: Seconds,
    /// Gap between a source point's appearance and its outgoing connection's growth.
    pub connection_gap: Seconds,
    /// Duration of a new point's grow-and-fade-in tween.
    pub point_appear_duration: Seconds,
    /// Minimum growth duration of a connection.
    pub line_base_duration: Seconds,
    /// Path length (canvas units) that adds `line_length_factor` seconds.
    pub line_length_unit: f64,
    /// Seconds added per `line_length_unit` of path length.
    pub line_length_factor: Seconds,
    /// Upper bound of a connection's growth duration.
    pub line_max_duration: Seconds,
    /// Delay between revealed caption characters.
    pub char_delay: Seconds,
    /// Offset of annotation fade-ins.
    pub annotation_at: Seconds,
    /// Duration of annotation fade-ins.
    pub annotation_duration: Seconds,
    /// Duration of the mirrored group's slide-in.
    pub remote_enter_duration: Seconds,
    /// Gap between the last local addition and the mirrored group's slide-in.
    pub remote_enter_gap: Seconds,
    /// Earliest end of local additions assumed when placing the slide-in.
    pub remote_enter_floor: Seconds,
    /// Duration of the mirrored group's slide-out.
    pub remote_exit_duration: Seconds,
    /// Horizontal slide-out distance in canvas units.
    pub remote_exit_distance: f64,
    /// Offset of member fade-ins when the mirrored group is already displayed.
    pub remote_member_at: Seconds,
    /// Duration of member fade-ins when the mirrored group is already displayed.
    pub remote_member_duration: Seconds,
    /// Fade duration of retracted ripple effects.
    pub ripple_retract_duration: Seconds,
    /// Number of ripple rings spawned for an origin point.
    pub ripple_count: u32,
    /// Animation delay between consecutive ripple rings.
    pub ripple_stagger: Seconds,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            removal_duration: 0.2,
            reposition_at: 0.2,
            reposition_duration: 0.5,
            root_base_delay: 0.3,
            root_stagger: 0.1,
            connection_gap: 0.3,
            point_appear_duration: 0.3,
            line_base_duration: 0.3,
            line_length_unit: 500.0,
            line_length_factor: 0.4,
            line_max_duration: 0.7,
            char_delay: 0.04,
            annotation_at: 0.5,
            annotation_duration: 0.4,
            remote_enter_duration: 0.6,
            remote_enter_gap: 0.2,
            remote_enter_floor: 0.5,
            remote_exit_duration: 0.5,
            remote_exit_distance: 300.0,
            remote_member_at: 0.3,
            remote_member_duration: 0.3,
            ripple_retract_duration: 0.3,
            ripple_count: 2,
            ripple_stagger: 1.0,
        }
    }
}

impl TimingConfig {
    /// Growth duration of a connection whose rendered path is `length` units long.
    pub fn line_duration(&self, length: f64) -> Seconds {
        let scaled = self.line_base_duration
            + (length.max(0.0) / self.line_length_unit) * self.line_length_factor;
        scaled.clamp(self.line_base_duration, self.line_max_duration)
    }

    fn validate(&self) -> ConstellationResult<()> {
        for (name, value) in [
            ("removal_duration", self.removal_duration),
            ("reposition_at", self.reposition_at),
            ("reposition_duration", self.reposition_duration),
            ("root_base_delay", self.root_base_delay),
            ("root_stagger", self.root_stagger),
            ("connection_gap", self.connection_gap),
            ("point_appear_duration", self.point_appear_duration),
            ("line_base_duration", self.line_base_duration),
            ("line_length_factor", self.line_length_factor),
            ("line_max_duration", self.line_max_duration),
            ("char_delay", self.char_delay),
            ("annotation_at", self.annotation_at),
            ("annotation_duration", self.annotation_duration),
            ("remote_enter_duration", self.remote_enter_duration),
            ("remote_enter_gap", self.remote_enter_gap),
            ("remote_enter_floor", self.remote_enter_floor),
            ("remote_exit_duration", self.remote_exit_duration),
            ("remote_exit_distance", self.remote_exit_distance),
            ("remote_member_at", self.remote_member_at),
            ("remote_member_duration", self.remote_member_duration),
            ("ripple_retract_duration", self.ripple_retract_duration),
            ("ripple_stagger", self.ripple_stagger),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConstellationError::config(format!(
                    "timing.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.line_length_unit.is_finite() || self.line_length_unit <= 0.0 {
            return Err(ConstellationError::config(
                "timing.line_length_unit must be finite and > 0",
            ));
        }
        if self.line_max_duration < self.line_base_duration {
            return Err(ConstellationError::config(
                "timing.line_max_duration must be >= timing.line_base_duration",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Element geometry constants.
pub struct LayoutConfig {
    /// Caption box beside each point.
    pub caption: CaptionLayout,
    /// Annotation card box.
    pub card: CardLayout,
    /// Connection stroke width.
    pub stroke_width: f64,
    /// Opacity of connections touching a hovered point.
    pub hover_opacity: f64,
    /// Horizontal distance below which a connector is drawn straight.
    pub straight_epsilon: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            caption: CaptionLayout::default(),
            card: CardLayout::default(),
            stroke_width: 2.5,
            hover_opacity: 0.8,
            straight_epsilon: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> ConstellationResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constant for sanity.
    pub fn validate(&self) -> ConstellationResult<()> {
        if self.view_box.width == 0 || self.view_box.height == 0 {
            return Err(ConstellationError::config("view_box width/height must be > 0"));
        }
        self.timing.validate()?;
        let layout = &self.layout;
        if !(0.0..=1.0).contains(&layout.hover_opacity) {
            return Err(ConstellationError::config(
                "layout.hover_opacity must be within [0, 1]",
            ));
        }
        if !layout.straight_epsilon.is_finite() || layout.straight_epsilon < 0.0 {
            return Err(ConstellationError::config(
                "layout.straight_epsilon must be finite and >= 0",
            ));
        }
        if layout.card.width <= 0.0 || layout.card.height <= 0.0 {
            return Err(ConstellationError::config(
                "layout.card width/height must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
