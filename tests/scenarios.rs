//! End-to-end duel scenarios.
//!
//! The first group drives the components directly on a `GameState`; the
//! second goes through the `LifecycleController` with timed key presses.

#![allow(clippy::unwrap_used)]

use slash_duel::game::config::GameConfig;
use slash_duel::game::effects::EffectsManager;
use slash_duel::game::events::GameEventData;
use slash_duel::game::state::{EndCause, GameState, Health, Outcome, Scene};
use slash_duel::game::timer::{TimerService, TimerTick};
use slash_duel::game::{AttackOutcome, CombatResolver, IgnoreReason};
use slash_duel::host::sound::{SoundBoard, SoundCue};
use slash_duel::{HeadlessController, Key, LifecycleError, SimTime};

fn ms(v: u64) -> SimTime {
    SimTime::from_millis(v)
}

struct Duel {
    state: GameState,
    combat: CombatResolver,
    timer: TimerService,
    sound: SoundBoard,
}

impl Duel {
    fn new() -> Self {
        let config = GameConfig::default();
        let mut state = GameState::new(config.arena.clone());
        state.reset();
        Self {
            state,
            combat: CombatResolver::new(config.combat.clone(), EffectsManager::new(&config.effects)),
            timer: TimerService::new(config.round_timer_ms),
            sound: SoundBoard::new(&config.audio),
        }
    }

    fn in_range(mut self) -> Self {
        self.state.player.x = self.state.enemy.x - 30.0;
        self
    }

    fn attack(&mut self, at: u64) -> AttackOutcome {
        self.combat.attempt_attack(&mut self.state, &mut self.sound, ms(at))
    }
}

// =============================================================================
// COMPONENT SCENARIOS
// =============================================================================

#[test]
fn in_range_attack_hits_and_spawns_slash() {
    let mut duel = Duel::new().in_range();
    let outcome = duel.attack(0);

    assert!(outcome.report().unwrap().hit);
    assert_eq!(duel.state.enemy.health.get(), 90);
    assert_eq!(duel.state.slashes.len(), 1);
    assert_eq!(duel.state.slashes[0].life, 1.0);
    assert_eq!(duel.state.scene, Scene::Playing);
}

#[test]
fn knockout_ends_round_with_player_win() {
    let mut duel = Duel::new().in_range();
    duel.state.enemy.health = Health::new(10);
    duel.attack(0);

    assert_eq!(duel.state.enemy.health.get(), 0);
    assert_eq!(duel.state.scene, Scene::GameOver);
    assert_eq!(duel.state.outcome, Some(Outcome::PlayerWins));
    assert_eq!(duel.state.outcome.unwrap().text(), "PLAYER 1 WINS!");
    assert_eq!(duel.sound.count(SoundCue::Win), 1);
}

#[test]
fn time_up_healthier_side_wins() {
    let mut duel = Duel::new();
    duel.state.timer = 1;
    duel.state.enemy.health = Health::new(50);
    duel.state.player.health = Health::new(70);

    // Player is healthier, so the enemy does not win.
    assert_eq!(duel.timer.tick(&mut duel.state, ms(0)), TimerTick::Expired(Outcome::PlayerWins));

    let mut duel = Duel::new();
    duel.state.timer = 1;
    duel.state.enemy.health = Health::new(70);
    duel.state.player.health = Health::new(50);
    assert_eq!(duel.timer.tick(&mut duel.state, ms(0)), TimerTick::Expired(Outcome::EnemyWins));
    assert_eq!(duel.state.outcome.unwrap().text(), "ENEMY WINS!");
}

#[test]
fn time_up_tie_goes_to_player() {
    let mut duel = Duel::new();
    duel.state.timer = 1;
    assert_eq!(duel.timer.tick(&mut duel.state, ms(0)), TimerTick::Expired(Outcome::PlayerWins));
    assert_eq!(duel.state.timer, 0);
}

#[test]
fn second_attack_within_cooldown_ignored() {
    let mut duel = Duel::new().in_range();
    duel.attack(0);
    let second = duel.attack(100);

    assert_eq!(second, AttackOutcome::Ignored(IgnoreReason::Cooldown));
    assert_eq!(duel.state.slashes.len(), 1);
    assert_eq!(duel.state.enemy.health.get(), 90);
}

// =============================================================================
// LIFECYCLE SCENARIOS
// =============================================================================

fn controller() -> HeadlessController {
    HeadlessController::headless(GameConfig::default())
}

/// Start, wait out the fade and walk into range (player ends at x = 320).
fn engaged() -> HeadlessController {
    let mut c = controller();
    c.start(ms(0)).unwrap();
    c.advance_to(ms(1000));
    for i in 0..44 {
        c.key_down(Key::MoveRight, ms(1010 + i * 10));
    }
    c.key_up(Key::MoveRight, ms(1500));
    c
}

#[test]
fn scene_cycle_menu_playing_game_over_menu() {
    let mut c = controller();
    let mut scenes = vec![c.scene()];

    c.start(ms(0)).unwrap();
    c.advance_to(ms(1000));
    scenes.push(c.scene());

    c.advance_to(ms(62_000));
    scenes.push(c.scene());

    c.restart(ms(62_000)).unwrap();
    c.advance_to(ms(63_000));
    scenes.push(c.scene());

    assert_eq!(scenes, vec![Scene::Menu, Scene::Playing, Scene::GameOver, Scene::Menu]);
    assert_eq!(c.outcome(), Some(Outcome::PlayerWins));
    assert!(c.state().slashes.is_empty());
}

#[test]
fn knockout_round_through_controller() {
    let mut c = engaged();
    assert_eq!(c.state().player.x, 320.0);

    for i in 0..10 {
        c.key_down(Key::Attack, ms(2000 + i * 300));
    }
    assert_eq!(c.scene(), Scene::GameOver);
    assert_eq!(c.state().enemy.health.get(), 0);

    // Win cue on the knockout, again when the results appear.
    c.advance_to(ms(6000));
    assert_eq!(c.sound().count(SoundCue::Win), 2);
    assert_eq!(c.sound().count(SoundCue::Lose), 0);
    assert_eq!(c.sound().count(SoundCue::Hit), 10);
}

#[test]
fn enemy_never_wins_by_time_without_damage() {
    // The enemy has no attack, so a time-up round always goes to the player.
    let mut c = controller();
    c.start(ms(0)).unwrap();
    c.advance_to(ms(62_000));
    assert_eq!(c.outcome(), Some(Outcome::PlayerWins));
    assert_eq!(c.sound().count(SoundCue::Win), 1);
}

#[test]
fn knockout_takes_priority_over_same_instant_time_up() {
    let mut c = engaged();
    for i in 0..9 {
        c.key_down(Key::Attack, ms(2000 + i * 300));
    }
    c.advance_to(ms(60_999));
    assert_eq!(c.state().timer, 1);

    // The final clock tick is due at 61 000; so is this attack.
    c.key_down(Key::Attack, ms(61_000));

    let causes: Vec<_> = c
        .take_events()
        .into_iter()
        .filter_map(|e| match e.data {
            GameEventData::RoundEnded { cause, .. } => Some(cause),
            _ => None,
        })
        .collect();
    assert_eq!(causes, vec![EndCause::Knockout]);
    assert_eq!(c.state().timer, 1);
}

#[test]
fn input_ignored_outside_round() {
    let mut c = controller();
    c.key_down(Key::MoveRight, ms(0));
    c.key_down(Key::Attack, ms(10));
    assert_eq!(c.state().player.x, 100.0);
    assert!(c.state().slashes.is_empty());
    assert_eq!(c.sound().total(), 0);
}

#[test]
fn render_loop_stops_at_game_over() {
    let mut c = controller();
    c.start(ms(0)).unwrap();
    c.advance_to(ms(62_000));
    let frames = c.renderer().frames();
    assert!(!c.render_loop().is_running());

    c.advance_to(ms(90_000));
    assert_eq!(c.renderer().frames(), frames);
    assert_eq!(c.renderer().last().unwrap().scene, Scene::GameOver);
}

#[test]
fn lunge_release_discarded_after_round_end() {
    let mut c = engaged();
    for i in 0..10 {
        c.key_down(Key::Attack, ms(2000 + i * 300));
    }
    // Knockout lunge is never released: the round is over.
    c.advance_to(ms(10_000));
    assert!(c.state().player.attacking);
    assert_eq!(c.state().player.x, 330.0);
}

#[test]
fn second_round_starts_fresh() {
    let mut c = engaged();
    for i in 0..10 {
        c.key_down(Key::Attack, ms(2000 + i * 300));
    }
    c.advance_to(ms(6000));
    c.restart(ms(6000)).unwrap();
    c.advance_to(ms(7000));
    c.start(ms(7000)).unwrap();
    c.advance_to(ms(8000));

    let state = c.state();
    assert_eq!(state.scene, Scene::Playing);
    assert_eq!(state.round, 2);
    assert_eq!(state.player.x, 100.0);
    assert!(!state.player.attacking);
    assert_eq!(state.enemy.health.get(), 100);
    assert_eq!(state.timer, 60);
    assert_eq!(state.outcome, None);
}

#[test]
fn commands_rejected_in_wrong_scene() {
    let mut c = controller();
    assert!(matches!(c.restart(ms(0)), Err(LifecycleError::InvalidScene { .. })));
    c.start(ms(0)).unwrap();
    assert_eq!(c.start(ms(500)), Err(LifecycleError::TransitionInProgress));
}
