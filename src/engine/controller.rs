use crate::{
    animation::{
        motion::{Motion, MotionPreference, create_motion},
        player::TimelinePlayer,
        timeline::Timeline,
    },
    engine::config::EngineConfig,
    foundation::core::{Canvas, Seconds},
    foundation::error::ConstellationResult,
    geometry::projection::Projection,
    model::{chapters::ChapterSet, snapshot::Snapshot},
    render::{
        elements::ElementFactory,
        registry::{LINES_LAYER, LiveRender, STARS_LAYER, Surfaces},
        scene::Scene,
        svg,
    },
    schedule::plan::{TransitionPlanner, TransitionReport},
};

/// Whether a transition timeline is playing.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineState {
    /// Nothing in flight; the scene shows the held snapshot.
    #[default]
    Idle,
    /// A timeline toward `chapter` is playing.
    Transitioning {
        /// Target chapter id.
        chapter: String,
    },
}

/// Result of [`Constellation::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// Container surfaces are bound.
    Ready,
    /// A required container surface is absent; the engine stays inert.
    MissingSurface(&'static str),
}

/// Result of [`Constellation::transition_to`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionOutcome {
    /// A transition was planned and started.
    Started(TransitionReport),
    /// The chapter id is not in the dataset; nothing changed.
    UnknownChapter,
    /// [`Constellation::init`] has not bound the container surfaces; nothing changed.
    NotInitialized,
}

impl TransitionOutcome {
    /// Report of a started transition.
    pub fn report(&self) -> Option<&TransitionReport> {
        match self {
            Self::Started(report) => Some(report),
            Self::UnknownChapter | Self::NotInitialized => None,
        }
    }
}

/// Scroll-driven constellation engine.
///
/// Owns the scene, the live element registry and the held snapshot. A chapter change plans
/// one timeline for the whole diff; [`Constellation::tick`] plays it. A new chapter change
/// while a timeline is in flight first jumps that timeline to its end, so planning always
/// starts from a settled scene.
pub struct Constellation {
    config: EngineConfig,
    chapters: ChapterSet,
    scene: Scene,
    motion: Box<dyn Motion>,
    preference: MotionPreference,
    factory: ElementFactory,
    surfaces: Option<Surfaces>,
    live: LiveRender,
    player: Option<TimelinePlayer>,
    state: EngineState,
}

impl std::fmt::Debug for Constellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constellation")
            .field("chapters", &self.chapters.len())
            .field("preference", &self.preference)
            .field("state", &self.state)
            .field("initialized", &self.surfaces.is_some())
            .finish_non_exhaustive()
    }
}

impl Constellation {
    /// Create an engine over `scene`. The motion preference is fixed for the engine's lifetime.
    pub fn new(
        config: EngineConfig,
        chapters: ChapterSet,
        scene: Scene,
        preference: MotionPreference,
    ) -> ConstellationResult<Self> {
        config.validate()?;
        let factory = ElementFactory::new(Projection::new(config.view_box), config.layout.clone());
        Ok(Self {
            config,
            chapters,
            scene,
            motion: create_motion(preference),
            preference,
            factory,
            surfaces: None,
            live: LiveRender::default(),
            player: None,
            state: EngineState::Idle,
        })
    }

    /// Bind to the point and connection containers, creating the annotation and caption
    /// containers when absent.
    pub fn init(&mut self) -> InitOutcome {
        if self.surfaces.is_some() {
            return InitOutcome::Ready;
        }
        for required in [STARS_LAYER, LINES_LAYER] {
            if self.scene.layer(required).is_none() {
                tracing::warn!(layer = required, "constellation container not found");
                return InitOutcome::MissingSurface(required);
            }
        }
        self.surfaces = Surfaces::bind(&mut self.scene);
        tracing::debug!(preference = ?self.preference, "constellation initialized");
        InitOutcome::Ready
    }

    /// Plan and start the transition to `chapter`.
    #[tracing::instrument(skip(self))]
    pub fn transition_to(&mut self, chapter: &str) -> TransitionOutcome {
        let Some(surfaces) = self.surfaces else {
            tracing::warn!("transition requested before init");
            return TransitionOutcome::NotInitialized;
        };
        let Some(target) = self.chapters.get(chapter).cloned() else {
            tracing::warn!("no constellation snapshot for chapter");
            return TransitionOutcome::UnknownChapter;
        };

        self.finish();

        let planner = TransitionPlanner {
            motion: self.motion.as_ref(),
            factory: &self.factory,
            config: &self.config,
            surfaces,
        };
        let (timeline, report) = planner.plan(chapter, &target, &mut self.live, &mut self.scene);

        if timeline.is_empty() {
            self.player = None;
            self.state = EngineState::Idle;
        } else {
            self.player = Some(TimelinePlayer::new(timeline));
            self.state = EngineState::Transitioning {
                chapter: chapter.to_owned(),
            };
        }
        TransitionOutcome::Started(report)
    }

    /// Advance the running timeline by `dt` seconds.
    pub fn tick(&mut self, dt: Seconds) -> &EngineState {
        if let Some(player) = self.player.as_mut() {
            player.advance(dt, &mut self.scene);
            if player.is_finished() {
                self.player = None;
                self.state = EngineState::Idle;
            }
        }
        &self.state
    }

    /// Jump the running timeline, if any, to its end.
    pub fn finish(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.finish(&mut self.scene);
        }
        self.state = EngineState::Idle;
    }

    /// Detach every rendered element and reset to the empty snapshot.
    pub fn clear(&mut self) {
        self.finish();
        for handle in self.live.handles() {
            self.scene.detach(handle);
        }
        self.live.reset();
    }

    /// Re-project the rendered snapshot onto a canvas of the given size.
    ///
    /// The held snapshot is untouched; only pixel positions change.
    pub fn resize(&mut self, width: u32, height: u32) -> ConstellationResult<()> {
        let canvas = Canvas::new(width, height)?;
        self.finish();
        self.factory.set_projection(Projection::new(canvas));

        let factory = &self.factory;
        let scene = &mut self.scene;
        let live = &self.live;
        let snapshot = &live.snapshot;
        for p in &snapshot.points {
            let center = factory.center(p);
            let circles = live
                .points
                .get(&p.id)
                .into_iter()
                .chain(live.ripples.get(&p.id).into_iter().flatten());
            for el in circles {
                if let Some(a) = scene.attrs_mut(*el) {
                    a.cx = center.x;
                    a.cy = center.y;
                }
            }
            if let Some(caption) = live.captions.get(&p.id) {
                factory.place_caption(scene, *caption, p);
            }
        }
        for c in &snapshot.connections {
            let (Some(el), Some(path)) = (
                live.connections.get(&c.id),
                factory.connector_for(snapshot, c),
            ) else {
                continue;
            };
            if let Some(a) = scene.attrs_mut(*el) {
                a.path = Some(path);
                a.dash_array = None;
                a.dash_offset = 0.0;
            }
        }
        for n in &snapshot.annotations {
            if let (Some(el), Some(anchor)) =
                (live.annotations.get(&n.id), snapshot.point(&n.anchor_point))
            {
                factory.place_card(scene, *el, anchor, n);
            }
        }
        tracing::debug!(width, height, "constellation resized");
        Ok(())
    }

    /// Highlight every connection touching `point_id`. Returns how many were highlighted.
    pub fn hover_point(&mut self, point_id: &str) -> usize {
        let opacity = self.config.layout.hover_opacity;
        self.set_hover(point_id, Some(opacity))
    }

    /// Restore the connections touching `point_id`. Returns how many were restored.
    pub fn unhover_point(&mut self, point_id: &str) -> usize {
        self.set_hover(point_id, None)
    }

    fn set_hover(&mut self, point_id: &str, opacity: Option<f64>) -> usize {
        let mut touched = 0;
        for c in self
            .live
            .snapshot
            .connections
            .iter()
            .filter(|c| c.touches(point_id))
        {
            let Some(el) = self.live.connections.get(&c.id) else {
                continue;
            };
            if let Some(a) = self.scene.attrs_mut(*el) {
                a.hover_opacity = opacity;
                touched += 1;
            }
        }
        touched
    }

    /// Current state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Scene being driven.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Snapshot the scene shows (or converges to while transitioning).
    pub fn snapshot(&self) -> &Snapshot {
        &self.live.snapshot
    }

    /// Timeline currently playing.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.player.as_ref().map(TimelinePlayer::timeline)
    }

    /// Chapter dataset.
    pub fn chapters(&self) -> &ChapterSet {
        &self.chapters
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Motion preference chosen at construction.
    pub fn motion_preference(&self) -> MotionPreference {
        self.preference
    }

    /// Canvas the model is currently projected onto.
    pub fn canvas(&self) -> Canvas {
        self.factory.projection().canvas()
    }

    /// `true` once [`Constellation::init`] has bound the containers.
    pub fn is_initialized(&self) -> bool {
        self.surfaces.is_some()
    }

    /// Serialize the current scene as SVG.
    pub fn to_svg(&self) -> String {
        svg::to_svg(&self.scene, self.canvas())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/controller.rs"]
mod tests;
