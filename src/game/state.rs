//! Game State Definitions
//!
//! The single owned aggregate every component mutates: both fighters,
//! live slash trails, the round clock and the scene flag.
//! Combatants are only ever constructed here, through `reset()`.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::clock::SimTime;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::config::ArenaConfig;
use crate::game::events::{GameEvent, GameEventData};

/// Maximum (and starting) health of both fighters.
pub const MAX_HEALTH: u32 = 100;

// =============================================================================
// FACING
// =============================================================================

/// Horizontal direction a fighter faces or drifts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative x
    Left,
    /// Toward positive x
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for Left, +1.0 for Right.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// =============================================================================
// HEALTH
// =============================================================================

/// Fighter health, always within `0..=MAX_HEALTH`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Create, clamping to `MAX_HEALTH`.
    pub fn new(value: u32) -> Self {
        Self(value.min(MAX_HEALTH))
    }

    /// Full health.
    pub const fn full() -> Self {
        Self(MAX_HEALTH)
    }

    /// Current value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Remove `amount`, stopping at zero. Returns the remaining health.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.0 = self.0.saturating_sub(amount);
        self.0
    }

    /// Whether health has reached zero.
    #[inline]
    pub const fn is_depleted(self) -> bool {
        self.0 == 0
    }

    /// Width of the on-screen health bar (two units per point).
    #[inline]
    pub fn bar_width(self) -> f64 {
        f64::from(self.0) * 2.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

// =============================================================================
// SCENE / OUTCOME
// =============================================================================

/// Coarse lifecycle phase of the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    /// Title screen, no round running
    #[default]
    Menu,
    /// Round in progress
    Playing,
    /// Round finished, result showing
    GameOver,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scene::Menu => "menu",
            Scene::Playing => "playing",
            Scene::GameOver => "game-over",
        };
        f.write_str(name)
    }
}

/// Result of a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Knockout, or time ran out with the player at least as healthy
    PlayerWins,
    /// Time ran out with the enemy healthier
    EnemyWins,
}

impl Outcome {
    /// Banner text shown on the results screen.
    pub fn text(self) -> &'static str {
        match self {
            Outcome::PlayerWins => "PLAYER 1 WINS!",
            Outcome::EnemyWins => "ENEMY WINS!",
        }
    }

    /// Decide a round that ran out of time. Ties go to the player.
    pub fn on_time_up(player: Health, enemy: Health) -> Self {
        if enemy > player {
            Outcome::EnemyWins
        } else {
            Outcome::PlayerWins
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// What ended a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCause {
    /// Enemy health reached zero
    Knockout,
    /// Round clock reached zero
    TimeUp,
}

// =============================================================================
// FIGHTERS
// =============================================================================

/// An attack in progress: where to snap back to and when.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lunge {
    /// Player x before the lunge
    pub origin_x: f64,
    /// When the lunge ends and a new attack may begin
    pub release_at: SimTime,
}

/// The human-controlled fighter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Remaining health
    pub health: Health,
    /// True only while a lunge is active
    pub attacking: bool,
    /// Direction of the last move
    pub facing: Facing,
    /// A move key is held
    pub moving: bool,
    /// Active lunge, present exactly when `attacking`
    pub lunge: Option<Lunge>,
}

impl Player {
    fn spawn(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            health: Health::full(),
            attacking: false,
            facing: Facing::Right,
            moving: false,
            lunge: None,
        }
    }

    /// Enter the attack window.
    pub fn begin_lunge(&mut self, release_at: SimTime) {
        self.lunge = Some(Lunge { origin_x: self.x, release_at });
        self.attacking = true;
    }

    /// Leave the attack window, restoring the pre-lunge position.
    /// Returns false if no lunge was active.
    pub fn end_lunge(&mut self) -> bool {
        match self.lunge.take() {
            Some(lunge) => {
                self.x = lunge.origin_x;
                self.attacking = false;
                true
            }
            None => false,
        }
    }
}

/// The passively animated opponent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Horizontal position (without sway)
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Remaining health
    pub health: Health,
    /// Cosmetic horizontal sway
    pub idle_offset: f64,
    /// Current sway direction
    pub idle_dir: Facing,
}

impl Enemy {
    fn spawn(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            health: Health::full(),
            idle_offset: 0.0,
            idle_dir: Facing::Right,
        }
    }

    /// Where the enemy is drawn (position plus sway).
    #[inline]
    pub fn drawn_x(&self) -> f64 {
        self.x + self.idle_offset
    }
}

/// A fading slash trail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlashEffect {
    /// Anchor x
    pub x: f64,
    /// Anchor y
    pub y: f64,
    /// Sweep direction
    pub facing: Facing,
    /// Remaining life in (0, 1]
    pub life: f64,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of the duel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Spawn layout used by `reset()`
    pub layout: ArenaConfig,

    /// The player
    pub player: Player,

    /// The opponent
    pub enemy: Enemy,

    /// Live slash trails (unordered)
    pub slashes: Vec<SlashEffect>,

    /// Seconds left in the round
    pub timer: u32,

    /// Current scene
    pub scene: Scene,

    /// Result of the last finished round
    pub outcome: Option<Outcome>,

    /// Round counter, bumped by every `reset()`
    pub round: u32,

    /// Events generated since the last drain
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting at the menu.
    pub fn new(layout: ArenaConfig) -> Self {
        let (px, py) = layout.player_start;
        let (ex, ey) = layout.enemy_start;
        Self {
            player: Player::spawn(px, py),
            enemy: Enemy::spawn(ex, ey),
            slashes: Vec::new(),
            timer: layout.round_seconds,
            scene: Scene::Menu,
            outcome: None,
            round: 0,
            pending_events: Vec::new(),
            layout,
        }
    }

    /// Start a fresh round: both fighters at full health on their spawn
    /// points, no slashes, full clock, scene Playing.
    pub fn reset(&mut self) {
        let (px, py) = self.layout.player_start;
        let (ex, ey) = self.layout.enemy_start;
        self.player = Player::spawn(px, py);
        self.enemy = Enemy::spawn(ex, ey);
        self.slashes.clear();
        self.timer = self.layout.round_seconds;
        self.scene = Scene::Playing;
        self.outcome = None;
        self.round += 1;
    }

    /// Whether the round is live.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.scene == Scene::Playing
    }

    /// Finish the round. Only the first call per round has any effect.
    pub fn end_round(&mut self, outcome: Outcome, cause: EndCause, now: SimTime) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.scene = Scene::GameOver;
        self.outcome = Some(outcome);
        self.push_event(now, GameEventData::RoundEnded { outcome, cause });
        self.push_event(now, GameEventData::SceneChanged {
            from: Scene::Playing,
            to: Scene::GameOver,
        });
        true
    }

    /// Leave the results screen. Slashes are discarded; fighters stay as
    /// they were until the next `reset()`.
    pub fn return_to_menu(&mut self, now: SimTime) -> bool {
        if self.scene != Scene::GameOver {
            return false;
        }
        self.scene = Scene::Menu;
        self.slashes.clear();
        self.push_event(now, GameEventData::SceneChanged {
            from: Scene::GameOver,
            to: Scene::Menu,
        });
        true
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.round, self.timer, |h| {
            let p = &self.player;
            h.write(p.x).write(p.y).write(p.health.get());
            h.write(p.attacking).write(p.facing as u8).write(p.moving);

            let e = &self.enemy;
            h.write(e.x).write(e.y).write(e.health.get());
            h.write(e.idle_offset).write(e.idle_dir as u8);

            h.write(self.slashes.len() as u32);
            for slash in &self.slashes {
                h.write(slash.x).write(slash.y).write(slash.facing as u8).write(slash.life);
            }

            h.write(self.scene as u8);
            h.write(self.outcome.map_or(0u8, |o| o as u8 + 1));
        })
    }

    /// Push a game event.
    pub fn push_event(&mut self, at: SimTime, data: GameEventData) {
        self.pending_events.push(GameEvent::new(at, self.round, data));
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Events queued since the last `take_events`.
    pub fn pending_events(&self) -> usize {
        self.pending_events.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
