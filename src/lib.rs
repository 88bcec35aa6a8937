//! Constellation is a scroll-driven diagram engine for commit-graph style illustrations.
//!
//! A narrative is a set of chapters, each a declarative [`Snapshot`] of points, connections
//! and annotations in a normalized `0..=100` space. Moving between chapters diffs the held
//! snapshot against the target and turns the difference into one choreographed [`Timeline`]:
//!
//! 1. **Diff**: `Snapshot × Snapshot -> SnapshotDiff` (keyed by id; rewired connections are
//!    replaced rather than kept)
//! 2. **Resolve**: new connections are ordered so each grows out of an already visible source
//!    ([`resolve_appearance`])
//! 3. **Schedule**: removal, reposition, reshape, addition, mirrored-copy and annotation phases
//!    are laid onto a single timeline through a [`Motion`] strategy
//! 4. **Play**: [`TimelinePlayer`] applies the timeline to a retained [`Scene`], which can be
//!    exported as SVG
//!
//! Reduced motion is a construction-time choice ([`MotionPreference`]): the same phases run,
//! but every change lands on the scene immediately and nothing is scheduled.
//!
//! # Getting started
//!
//! ```no_run
//! use constellation::{ChapterSet, Constellation, EngineConfig, MotionPreference, Scene};
//!
//! let scene = Scene::with_layers(&["constellation-lines", "constellation-stars"]);
//! let chapters = ChapterSet::bundled()?;
//! let mut engine =
//!     Constellation::new(EngineConfig::default(), chapters, scene, MotionPreference::Full)?;
//! engine.init();
//! engine.transition_to("ch2-trunk");
//! engine.tick(1.0 / 60.0);
//! # Ok::<(), constellation::ConstellationError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod diff;
mod engine;
mod foundation;
mod geometry;
mod model;
mod render;
mod schedule;

pub use animation::ease::Ease;
pub use animation::motion::{Animated, Instant, Motion, MotionPreference, Stage, create_motion};
pub use animation::player::TimelinePlayer;
pub use animation::timeline::{Action, Entry, Op, Prop, Timeline, Tween, Value};
pub use diff::items::{
    ConnectionDiff, Diff, KeptAnnotation, KeptConnection, KeptPoint, Keyed, SnapshotDiff,
    diff_connections, diff_items,
};
pub use engine::config::{CyclePolicy, EngineConfig, LayoutConfig, TimingConfig};
pub use engine::controller::{Constellation, EngineState, InitOutcome, TransitionOutcome};
pub use foundation::core::{BezPath, Canvas, Rect, Seconds, Vec2};
pub use foundation::core::Point as CanvasPoint;
pub use foundation::error::{ConstellationError, ConstellationResult};
pub use geometry::connector::ConnectorPath;
pub use geometry::placement::{CaptionLayout, CardLayout};
pub use geometry::projection::Projection;
pub use model::chapters::ChapterSet;
pub use model::snapshot::{
    Annotation, AnnotationCategory, Connection, ConnectionKind, DanglingReference,
    MIRROR_ID_PREFIX, Placement, Point, PointKind, Snapshot,
};
pub use model::style::{
    ConnectionStyle, PointStyle, annotation_icon, connection_style, point_style, resolved_radius,
};
pub use render::elements::ElementFactory;
pub use render::registry::{
    LABELS_LAYER, LINES_LAYER, LiveRender, MESSAGES_LAYER, PointHandles, STARS_LAYER, Surfaces,
};
pub use render::scene::{Attrs, Card, Element, ElementId, ElementKind, Scene};
pub use render::svg::to_svg;
pub use schedule::appearance::{
    AppearancePlan, ConnectionTiming, DependencyCycle, Resolution, resolve_appearance,
};
pub use schedule::plan::{RemoteChange, TransitionReport};
