//! Input Capture and Dispatch
//!
//! Raw key codes become intents; intents move the player or start an
//! attack. Move keys are level-triggered: every key-down (including OS
//! key repeat) steps the player. Releasing either move key stops the
//! walk animation.

use serde::{Serialize, Deserialize};

use crate::core::clock::SimTime;
use crate::game::combat::{AttackOutcome, CombatResolver, IgnoreReason};
use crate::game::events::GameEventData;
use crate::game::play_cue_exclusive;
use crate::game::state::{Facing, GameState};
use crate::host::sound::{SoundCue, SoundSink};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Walk left
    MoveLeft,
    /// Walk right
    MoveRight,
    /// Swing
    Attack,
}

impl Key {
    /// Map a browser-style key code to a key. Unbound codes map to `None`.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" | "Left" | "a" | "A" => Some(Key::MoveLeft),
            "ArrowRight" | "Right" | "d" | "D" => Some(Key::MoveRight),
            " " | "Space" | "Spacebar" => Some(Key::Attack),
            _ => None,
        }
    }

    /// Direction for a move key.
    pub fn facing(self) -> Option<Facing> {
        match self {
            Key::MoveLeft => Some(Facing::Left),
            Key::MoveRight => Some(Facing::Right),
            Key::Attack => None,
        }
    }
}

/// A key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key pressed (or auto-repeated)
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
}

/// What an input event did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputResponse {
    /// Dropped: no round in progress, or key has no binding for this edge
    Ignored,
    /// Player stepped to `x`
    Moved {
        /// New position
        x: f64,
    },
    /// Walk animation stopped
    Stopped,
    /// Attack key pressed
    Attack(AttackOutcome),
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Applies input intents to the game state.
#[derive(Clone, Copy, Debug)]
pub struct InputController {
    move_step: f64,
}

impl InputController {
    /// Create with the per-press movement distance.
    pub fn new(move_step: f64) -> Self {
        Self { move_step }
    }

    /// Dispatch one event.
    pub fn handle(
        &self,
        state: &mut GameState,
        combat: &CombatResolver,
        sound: &mut dyn SoundSink,
        event: InputEvent,
        now: SimTime,
    ) -> InputResponse {
        match event {
            InputEvent::KeyDown(key) => self.on_key_down(state, combat, sound, key, now),
            InputEvent::KeyUp(key) => self.on_key_up(state, key),
        }
    }

    /// Key pressed.
    pub fn on_key_down(
        &self,
        state: &mut GameState,
        combat: &CombatResolver,
        sound: &mut dyn SoundSink,
        key: Key,
        now: SimTime,
    ) -> InputResponse {
        if !state.is_playing() {
            return InputResponse::Ignored;
        }

        match key.facing() {
            Some(facing) => {
                let player = &mut state.player;
                player.x += self.move_step * facing.sign();
                player.moving = true;
                player.facing = facing;
                let x = player.x;
                state.push_event(now, GameEventData::PlayerMoved { x, facing });
                play_cue_exclusive(state, sound, SoundCue::Step, now);
                InputResponse::Moved { x }
            }
            None if state.player.attacking => {
                InputResponse::Attack(AttackOutcome::Ignored(IgnoreReason::Cooldown))
            }
            None => InputResponse::Attack(combat.attempt_attack(state, sound, now)),
        }
    }

    /// Key released.
    pub fn on_key_up(&self, state: &mut GameState, key: Key) -> InputResponse {
        if !state.is_playing() || key.facing().is_none() {
            return InputResponse::Ignored;
        }
        state.player.moving = false;
        InputResponse::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{ArenaConfig, AudioConfig, CombatConfig, EffectsConfig};
    use crate::game::effects::EffectsManager;
    use crate::host::sound::SoundBoard;

    struct Rig {
        input: InputController,
        combat: CombatResolver,
        state: GameState,
        sound: SoundBoard,
    }

    impl Rig {
        fn new() -> Self {
            let mut state = GameState::new(ArenaConfig::default());
            state.reset();
            Self {
                input: InputController::new(5.0),
                combat: CombatResolver::new(
                    CombatConfig::default(),
                    EffectsManager::new(&EffectsConfig::default()),
                ),
                state,
                sound: SoundBoard::new(&AudioConfig::default()),
            }
        }

        fn send(&mut self, event: InputEvent, ms: u64) -> InputResponse {
            self.input.handle(
                &mut self.state,
                &self.combat,
                &mut self.sound,
                event,
                SimTime::from_millis(ms),
            )
        }
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::MoveLeft));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::MoveRight));
        assert_eq!(Key::from_code(" "), Some(Key::Attack));
        assert_eq!(Key::from_code("Escape"), None);
    }

    #[test]
    fn test_move_right_then_left() {
        let mut rig = Rig::new();
        assert_eq!(rig.send(InputEvent::KeyDown(Key::MoveRight), 0), InputResponse::Moved { x: 105.0 });
        assert!(rig.state.player.moving);
        assert_eq!(rig.state.player.facing, Facing::Right);

        assert_eq!(rig.send(InputEvent::KeyDown(Key::MoveLeft), 10), InputResponse::Moved { x: 100.0 });
        assert_eq!(rig.state.player.facing, Facing::Left);

        assert_eq!(rig.send(InputEvent::KeyUp(Key::MoveLeft), 20), InputResponse::Stopped);
        assert!(!rig.state.player.moving);
    }

    #[test]
    fn test_step_cue_does_not_overlap() {
        let mut rig = Rig::new();
        for ms in [0, 50, 100, 150, 200, 250] {
            rig.send(InputEvent::KeyDown(Key::MoveRight), ms);
        }
        assert_eq!(rig.sound.count(SoundCue::Step), 1);
        assert_eq!(rig.state.player.x, 130.0);

        rig.send(InputEvent::KeyDown(Key::MoveRight), 300);
        assert_eq!(rig.sound.count(SoundCue::Step), 2);
    }

    #[test]
    fn test_attack_dispatch_and_repeat() {
        let mut rig = Rig::new();
        let first = rig.send(InputEvent::KeyDown(Key::Attack), 0);
        assert!(matches!(first, InputResponse::Attack(AttackOutcome::Resolved(_))));

        let second = rig.send(InputEvent::KeyDown(Key::Attack), 50);
        assert_eq!(second, InputResponse::Attack(AttackOutcome::Ignored(IgnoreReason::Cooldown)));
        assert_eq!(rig.state.slashes.len(), 1);
    }

    #[test]
    fn test_attack_key_up_is_ignored() {
        let mut rig = Rig::new();
        rig.send(InputEvent::KeyDown(Key::MoveRight), 0);
        assert_eq!(rig.send(InputEvent::KeyUp(Key::Attack), 5), InputResponse::Ignored);
        assert!(rig.state.player.moving);
    }

    #[test]
    fn test_ignored_outside_round() {
        let mut rig = Rig::new();
        rig.state = GameState::new(ArenaConfig::default());
        assert_eq!(rig.send(InputEvent::KeyDown(Key::MoveRight), 0), InputResponse::Ignored);
        assert_eq!(rig.send(InputEvent::KeyDown(Key::Attack), 0), InputResponse::Ignored);
        assert_eq!(rig.state.player.x, 100.0);
        assert_eq!(rig.sound.total(), 0);
    }
}
