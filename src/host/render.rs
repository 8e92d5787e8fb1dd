//! Render Boundary
//!
//! The renderer never touches `GameState`. Once per frame it receives a
//! `RenderSnapshot`, a plain copy of what is visible. `SceneLayout` turns a
//! snapshot into the shapes the stick-figure view draws, so any backend
//! (canvas, terminal, wgpu) draws the same picture.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::game::state::{Facing, GameState, Scene};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A fighter as the renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    /// Drawn x (enemy includes idle sway)
    pub x: f64,
    /// Drawn y
    pub y: f64,
    /// Health points
    pub health: u32,
    /// Attack pose
    pub attacking: bool,
}

/// A slash trail as the renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlashView {
    /// Anchor x
    pub x: f64,
    /// Anchor y
    pub y: f64,
    /// Stroke direction
    pub facing: Facing,
    /// Remaining life, used as alpha
    pub life: f64,
}

/// Read-only copy of everything drawn in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Round the frame belongs to
    pub round: u32,
    /// Scene at capture time
    pub scene: Scene,
    /// Seconds left
    pub timer: u32,
    /// The player
    pub player: FighterView,
    /// The enemy
    pub enemy: FighterView,
    /// Live slashes
    pub slashes: Vec<SlashView>,
}

impl RenderSnapshot {
    /// Copy the visible parts of `state`.
    pub fn capture(state: &GameState) -> Self {
        let p = &state.player;
        let e = &state.enemy;
        Self {
            round: state.round,
            scene: state.scene,
            timer: state.timer,
            player: FighterView {
                x: p.x,
                y: p.y,
                health: p.health.get(),
                attacking: p.attacking,
            },
            enemy: FighterView {
                x: e.drawn_x(),
                y: e.y,
                health: e.health.get(),
                attacking: false,
            },
            slashes: state
                .slashes
                .iter()
                .map(|s| SlashView { x: s.x, y: s.y, facing: s.facing, life: s.life })
                .collect(),
        }
    }
}

/// Consumer of per-frame snapshots.
pub trait RenderSink {
    /// Draw one frame.
    fn render(&mut self, frame: &RenderSnapshot);
}

/// Renderer that draws nothing; counts frames and keeps the last one.
#[derive(Clone, Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    last: Option<RenderSnapshot>,
}

impl HeadlessRenderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&RenderSnapshot> {
        self.last.as_ref()
    }
}

impl RenderSink for HeadlessRenderer {
    fn render(&mut self, frame: &RenderSnapshot) {
        self.frames += 1;
        trace!(frame = self.frames, timer = frame.timer, slashes = frame.slashes.len(), "render");
        self.last = Some(frame.clone());
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// A 2D point in screen units.
pub type Point = (f64, f64);

/// Line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start point
    pub from: Point,
    /// End point
    pub to: Point,
}

/// Filled health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Filled width, proportional to remaining health
    pub width: f64,
    /// Bar height
    pub height: f64,
}

/// Stick figure limbs. Only the lead arm depends on the attack pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickFigure {
    /// Center of the head circle
    pub head_center: Point,
    /// Head circle radius
    pub head_radius: f64,
    /// Neck to hip
    pub torso: Segment,
    /// Hip to left foot
    pub left_leg: Segment,
    /// Hip to right foot
    pub right_leg: Segment,
    /// Sword arm; extends further while attacking
    pub lead_arm: Segment,
    /// Trailing arm
    pub rear_arm: Segment,
}

impl StickFigure {
    /// Pose a figure standing at `(x, y)`.
    pub fn pose(x: f64, y: f64, attacking: bool) -> Self {
        let shoulder = (x, y);
        let hip = (x, y + 20.0);
        let reach = if attacking { 25.0 } else { 15.0 };
        Self {
            head_center: (x, y - 25.0),
            head_radius: 10.0,
            torso: Segment { from: (x, y - 15.0), to: hip },
            left_leg: Segment { from: hip, to: (x - 10.0, y + 40.0) },
            right_leg: Segment { from: hip, to: (x + 10.0, y + 40.0) },
            lead_arm: Segment { from: shoulder, to: (x + reach, y - 10.0) },
            rear_arm: Segment { from: shoulder, to: (x - 15.0, y - 10.0) },
        }
    }
}

/// Fading slash stroke; opacity equals remaining life.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlashStroke {
    /// Stroke path, drawn in the slash's facing direction
    pub line: Segment,
    /// Line width
    pub width: f64,
    /// Opacity in `[0, 1]`
    pub alpha: f64,
}

impl SlashStroke {
    /// Stroke for one slash trail.
    pub fn from_view(slash: &SlashView) -> Self {
        let dir = slash.facing.sign();
        Self {
            line: Segment {
                from: (slash.x - 10.0 * dir, slash.y),
                to: (slash.x + 20.0 * dir, slash.y),
            },
            width: 6.0,
            alpha: slash.life.clamp(0.0, 1.0),
        }
    }
}

/// Every shape in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    /// Player health bar
    pub player_bar: HealthBar,
    /// Enemy health bar
    pub enemy_bar: HealthBar,
    /// Countdown text and its anchor
    pub timer_label: (String, Point),
    /// Live slash trails
    pub slashes: Vec<SlashStroke>,
    /// Player figure
    pub player: StickFigure,
    /// Enemy figure
    pub enemy: StickFigure,
}

impl SceneLayout {
    /// Lay out a snapshot.
    pub fn from_snapshot(frame: &RenderSnapshot) -> Self {
        let bar = |x: f64, health: u32| HealthBar {
            x,
            y: 20.0,
            width: f64::from(health) * 2.0,
            height: 10.0,
        };
        Self {
            player_bar: bar(20.0, frame.player.health),
            enemy_bar: bar(240.0, frame.enemy.health),
            timer_label: (format!("{}s", frame.timer), (225.0, 40.0)),
            slashes: frame.slashes.iter().map(SlashStroke::from_view).collect(),
            player: StickFigure::pose(frame.player.x, frame.player.y, frame.player.attacking),
            enemy: StickFigure::pose(frame.enemy.x, frame.enemy.y, false),
        }
    }
}
