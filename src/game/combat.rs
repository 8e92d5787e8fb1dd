//! Melee Attack Resolution
//!
//! An attack is a short lunge toward the facing direction. Damage is
//! decided at the moment the attack begins; the lunge is undone when the
//! cooldown elapses, which the lifecycle controller schedules from the
//! returned `AttackReport::release_at`.

use tracing::debug;

use crate::core::clock::SimTime;
use crate::game::config::CombatConfig;
use crate::game::effects::EffectsManager;
use crate::game::events::GameEventData;
use crate::game::play_cue;
use crate::game::state::{EndCause, GameState, Outcome};
use crate::host::sound::{SoundCue, SoundSink};

/// Why an attack attempt did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No round in progress
    NotPlaying,
    /// Previous lunge still active
    Cooldown,
}

/// What a resolved attack did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackReport {
    /// Whether the enemy was in range
    pub hit: bool,
    /// Enemy health after the hit
    pub enemy_health: u32,
    /// Set if this hit ended the round
    pub knockout: Option<Outcome>,
    /// When the lunge must be released
    pub release_at: SimTime,
}

/// Result of `CombatResolver::attempt_attack`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackOutcome {
    /// Attempt was a no-op
    Ignored(IgnoreReason),
    /// Attack went through
    Resolved(AttackReport),
}

impl AttackOutcome {
    /// The report, if the attack went through.
    pub fn report(&self) -> Option<&AttackReport> {
        match self {
            AttackOutcome::Resolved(report) => Some(report),
            AttackOutcome::Ignored(_) => None,
        }
    }
}

/// Applies the attack rules to the game state.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    config: CombatConfig,
    effects: EffectsManager,
}

impl CombatResolver {
    /// Create a resolver. Slashes are spawned through `effects`.
    pub fn new(config: CombatConfig, effects: EffectsManager) -> Self {
        Self { config, effects }
    }

    /// Cooldown between attacks in milliseconds.
    pub fn cooldown_ms(&self) -> u64 {
        self.config.cooldown_ms
    }

    /// Try to attack at `now`.
    ///
    /// Order of effects: lunge forward, hit cue, slash, range check,
    /// damage, knockout. A knockout ends the round immediately and plays
    /// the win cue.
    pub fn attempt_attack(
        &self,
        state: &mut GameState,
        sound: &mut dyn SoundSink,
        now: SimTime,
    ) -> AttackOutcome {
        if !state.is_playing() {
            return AttackOutcome::Ignored(IgnoreReason::NotPlaying);
        }
        if state.player.attacking {
            return AttackOutcome::Ignored(IgnoreReason::Cooldown);
        }

        let release_at = now.after(self.config.cooldown_ms);
        let origin_x = state.player.x;
        state.player.begin_lunge(release_at);
        play_cue(state, sound, SoundCue::Hit, now);

        let dir = state.player.facing.sign();
        state.player.x += self.config.lunge_distance * dir;

        let (offset_x, offset_y) = self.config.slash_offset;
        let slash_x = state.player.x + offset_x * dir;
        let slash_y = state.player.y - offset_y;
        let facing = state.player.facing;
        self.effects.spawn(state, slash_x, slash_y, facing, now);

        let hit = (state.player.x - state.enemy.x).abs() < self.config.melee_range;
        let damage = if hit { self.config.damage } else { 0 };
        let enemy_health = state.enemy.health.apply_damage(damage);

        state.push_event(now, GameEventData::AttackResolved {
            origin_x,
            lunge_x: state.player.x,
            hit,
            damage,
            enemy_health,
        });
        debug!(at = %now, hit, enemy_health, "attack resolved");

        let knockout = if hit && state.enemy.health.is_depleted() {
            state.end_round(Outcome::PlayerWins, EndCause::Knockout, now);
            play_cue(state, sound, SoundCue::Win, now);
            Some(Outcome::PlayerWins)
        } else {
            None
        };

        AttackOutcome::Resolved(AttackReport {
            hit,
            enemy_health,
            knockout,
            release_at,
        })
    }

    /// End the lunge started in `round` once its cooldown has elapsed.
    ///
    /// No-op if the round is over or was replaced, or if the lunge is not
    /// yet due. Returns whether the player was released.
    pub fn release_lunge(&self, state: &mut GameState, round: u32, now: SimTime) -> bool {
        if state.round != round || !state.is_playing() {
            return false;
        }
        let due = state.player.lunge.is_some_and(|l| l.release_at <= now);
        if !due || !state.player.end_lunge() {
            return false;
        }
        state.push_event(now, GameEventData::AttackReleased { x: state.player.x });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{ArenaConfig, AudioConfig, EffectsConfig};
    use crate::game::state::{Facing, Health, Scene};
    use crate::host::sound::SoundBoard;

    fn setup() -> (CombatResolver, GameState, SoundBoard) {
        let effects = EffectsManager::new(&EffectsConfig::default());
        let resolver = CombatResolver::new(CombatConfig::default(), effects);
        let mut state = GameState::new(ArenaConfig::default());
        state.reset();
        (resolver, state, SoundBoard::new(&AudioConfig::default()))
    }

    #[test]
    fn test_out_of_range_swing() {
        let (resolver, mut state, mut sound) = setup();
        let outcome = resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);

        let report = outcome.report().copied().unwrap();
        assert!(!report.hit);
        assert_eq!(report.release_at, SimTime::from_millis(200));
        assert_eq!(state.enemy.health, Health::full());
        assert_eq!(state.player.x, 110.0);
        assert!(state.player.attacking);
        assert_eq!(state.slashes.len(), 1);
        assert_eq!(state.slashes[0].x, 130.0);
        assert_eq!(state.slashes[0].y, 190.0);
        assert_eq!(sound.count(SoundCue::Hit), 1);
    }

    #[test]
    fn test_in_range_hit_deals_damage() {
        let (resolver, mut state, mut sound) = setup();
        state.player.x = 320.0;
        let outcome = resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);

        assert!(outcome.report().is_some_and(|r| r.hit));
        assert_eq!(state.enemy.health.get(), 90);
    }

    #[test]
    fn test_lunge_follows_facing() {
        let (resolver, mut state, mut sound) = setup();
        state.player.facing = Facing::Left;
        resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);
        assert_eq!(state.player.x, 90.0);
        assert_eq!(state.slashes[0].x, 70.0);
        assert_eq!(state.slashes[0].facing, Facing::Left);
    }

    #[test]
    fn test_cooldown_blocks_second_attack() {
        let (resolver, mut state, mut sound) = setup();
        resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);
        let second = resolver.attempt_attack(&mut state, &mut sound, SimTime::from_millis(100));

        assert_eq!(second, AttackOutcome::Ignored(IgnoreReason::Cooldown));
        assert_eq!(state.slashes.len(), 1);
        assert_eq!(sound.count(SoundCue::Hit), 1);
    }

    #[test]
    fn test_release_restores_position() {
        let (resolver, mut state, mut sound) = setup();
        resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);
        let round = state.round;

        assert!(!resolver.release_lunge(&mut state, round, SimTime::from_millis(199)));
        assert!(resolver.release_lunge(&mut state, round, SimTime::from_millis(200)));
        assert_eq!(state.player.x, 100.0);
        assert!(!state.player.attacking);
        assert!(!resolver.release_lunge(&mut state, round, SimTime::from_millis(200)));
    }

    #[test]
    fn test_knockout_ends_round() {
        let (resolver, mut state, mut sound) = setup();
        state.player.x = 320.0;
        state.enemy.health = Health::new(10);

        let outcome = resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);

        assert_eq!(outcome.report().and_then(|r| r.knockout), Some(Outcome::PlayerWins));
        assert_eq!(state.enemy.health.get(), 0);
        assert_eq!(state.scene, Scene::GameOver);
        assert_eq!(state.outcome, Some(Outcome::PlayerWins));
        assert_eq!(sound.count(SoundCue::Win), 1);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let (resolver, mut state, mut sound) = setup();
        state.player.x = 320.0;
        state.enemy.health = Health::new(4);
        resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);
        assert_eq!(state.enemy.health.get(), 0);
    }

    #[test]
    fn test_release_is_noop_after_round_end() {
        let (resolver, mut state, mut sound) = setup();
        state.player.x = 320.0;
        state.enemy.health = Health::new(10);
        resolver.attempt_attack(&mut state, &mut sound, SimTime::ZERO);
        let round = state.round;

        assert!(!resolver.release_lunge(&mut state, round, SimTime::from_millis(200)));
        assert!(state.player.attacking);
    }

    #[test]
    fn test_ignored_outside_round() {
        let (resolver, _, mut sound) = setup();
        let mut menu = GameState::new(ArenaConfig::default());
        let outcome = resolver.attempt_attack(&mut menu, &mut sound, SimTime::ZERO);
        assert_eq!(outcome, AttackOutcome::Ignored(IgnoreReason::NotPlaying));
        assert!(menu.slashes.is_empty());
    }
}
