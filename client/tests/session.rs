use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use scorebook_client::{
    Base, GameError, GameSession, GameView, Matchup, MemoryStore, OutcomeKey, RetryPolicy,
    RunnerChoice, SessionConfig, SessionError, SessionEvent, SessionHandle, Side, Store,
    StorePath, Subscription, TeamId,
};
use serde_json::{Value, json};
use tokio::sync::broadcast;

fn config() -> SessionConfig {
    SessionConfig {
        settle_delay: Duration::ZERO,
        retry: RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
        },
        event_capacity: 256,
    }
}

fn league() -> Value {
    json!({
        "Teams": {
            "owls": {
                "name": "Owls",
                "lineup": {"1": "ruth", "2": "gehrig", "9": "dimaggio"}
            },
            "bats": {
                "name": "Bats",
                "lineup": {"1": "cobb"}
            }
        },
        "Players": {
            "ruth": {"name": "Ruth", "position": "RF", "number": 3, "teamId": "owls"},
            "gehrig": {"name": "Gehrig", "position": "1B", "number": 4, "teamId": "owls"},
            "dimaggio": {"name": "DiMaggio", "position": "CF", "number": "5", "teamId": "owls"},
            "cobb": {"name": "Cobb", "position": "CF", "number": 12, "teamId": "bats"}
        }
    })
}

/// Owls bat first
async fn start(store: Arc<MemoryStore>) -> SessionHandle {
    GameSession::start(store, Matchup::new("bats", "owls"), config())
        .await
        .unwrap()
}

async fn stats(store: &MemoryStore, player: &str) -> Option<Value> {
    store
        .read_once(&StorePath::PlayerStats(scorebook_client::PlayerId::new(player)))
        .await
        .unwrap()
}

async fn bat_slot(store: &MemoryStore, team: &str) -> Option<Value> {
    store
        .read_once(&StorePath::CurrentBatSlot(TeamId::new(team)))
        .await
        .unwrap()
}

async fn wait_for<F>(session: &SessionHandle, mut done: F) -> GameView
where
    F: FnMut(&GameView) -> bool,
{
    for _ in 0..200 {
        let view = session.view().await.unwrap();
        if done(&view) {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("Session never reached the expected view");
}

fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test]
async fn test_single_records_stats_and_advances_slot() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    let view = session.outcome(OutcomeKey::Single).await.unwrap();
    assert!(view.state.runners.first);
    assert_eq!(view.away_slot.get(), 2);

    session.flush().await.unwrap();
    assert_eq!(
        stats(&store, "ruth").await,
        Some(json!({"plateAppearances": 1, "atBats": 1, "hits": 1}))
    );
    assert_eq!(bat_slot(&store, "owls").await, Some(json!(2)));
    assert_eq!(bat_slot(&store, "bats").await, None);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_walk_by_pitches_credits_batter() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    for _ in 0..3 {
        session.ball().await.unwrap();
    }
    let view = session.ball().await.unwrap();
    assert_eq!(view.state.count.balls, 0);
    assert!(view.state.runners.first);

    session.flush().await.unwrap();
    assert_eq!(
        stats(&store, "ruth").await,
        Some(json!({"plateAppearances": 1, "walks": 1}))
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_prompt_blocks_until_answered_then_credits_rbis() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;
    let mut events = session.events();

    session.outcome(OutcomeKey::Walk).await.unwrap();
    let view = session.outcome(OutcomeKey::Single).await.unwrap();

    let prompt = view.prompt.expect("single with a runner on first prompts");
    assert_eq!(prompt.base, Base::First);
    assert!(
        drain(&mut events)
            .iter()
            .any(|e| matches!(e, SessionEvent::PromptOpened(p) if p.base == Base::First))
    );

    assert_eq!(
        session.ball().await,
        Err(SessionError::Game(GameError::ResolutionPending(Base::First)))
    );
    assert_eq!(
        session.undo().await,
        Err(SessionError::Game(GameError::ResolutionPending(Base::First)))
    );

    let view = session.answer(RunnerChoice::Score).await.unwrap();
    assert!(view.prompt.is_none());
    assert_eq!(view.state.away_runs, 1);
    assert_eq!(view.away_slot.get(), 3);

    session.flush().await.unwrap();
    assert_eq!(
        stats(&store, "gehrig").await,
        Some(json!({"plateAppearances": 1, "atBats": 1, "hits": 1, "rbis": 1}))
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_undo_restores_state_but_keeps_stats() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    session.outcome(OutcomeKey::HomeRun).await.unwrap();
    let view = session.undo().await.unwrap();
    assert_eq!(view.state.away_runs, 0);
    assert_eq!(view.state.runners.occupied_count(), 0);

    session.flush().await.unwrap();
    assert_eq!(
        stats(&store, "ruth").await,
        Some(json!({
            "plateAppearances": 1, "atBats": 1, "hits": 1, "homeRuns": 1, "rbis": 1
        }))
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_third_out_switches_sides() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;
    let mut events = session.events();

    session.outcome(OutcomeKey::Strikeout).await.unwrap();
    session.outcome(OutcomeKey::Groundout).await.unwrap();
    let view = session.outcome(OutcomeKey::Flyout).await.unwrap();

    assert!(!view.state.is_top);
    assert_eq!(view.state.inning, 1);
    assert_eq!(view.state.outs, 0);
    assert_eq!(view.away_slot.get(), 4);
    assert_eq!(view.home_slot.get(), 1);

    let retired: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::SideRetired(retired) => Some(retired),
            _ => None,
        })
        .collect();
    assert_eq!(retired.len(), 1);
    assert_eq!(retired[0].side, Side::Away);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lineup_wraps_from_nine() {
    let mut data = league();
    data["Teams"]["owls"]["currentBatSlot"] = json!(9);
    let store = Arc::new(MemoryStore::from_value(data));
    let session = start(store.clone()).await;

    assert_eq!(session.view().await.unwrap().away_slot.get(), 9);

    let view = session.outcome(OutcomeKey::Strikeout).await.unwrap();
    assert_eq!(view.away_slot.get(), 1);

    session.flush().await.unwrap();
    assert_eq!(bat_slot(&store, "owls").await, Some(json!(1)));
    assert_eq!(
        stats(&store, "dimaggio").await,
        Some(json!({"plateAppearances": 1, "atBats": 1, "strikeouts": 1}))
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restart_resets_game_and_slots() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    session.outcome(OutcomeKey::Double).await.unwrap();
    session.outcome(OutcomeKey::Single).await.unwrap();
    let view = session.restart().await.unwrap();

    assert_eq!(view.state, scorebook_client::GameState::new());
    assert_eq!(view.away_slot.get(), 1);
    assert!(session.undo().await.unwrap().state == view.state);

    session.flush().await.unwrap();
    assert_eq!(bat_slot(&store, "owls").await, Some(json!(1)));
    assert_eq!(bat_slot(&store, "bats").await, Some(json!(1)));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_external_slot_change_is_followed() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    store
        .write_atomic(&StorePath::CurrentBatSlot(TeamId::new("owls")), json!(2))
        .await
        .unwrap();

    let view = wait_for(&session, |v| v.away_slot.get() == 2).await;
    assert_eq!(view.state.count.balls, 0);

    wait_for(&session, |v| v.batter == "2. Gehrig, 1B #4").await;

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_team_names_and_batter_label() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;

    wait_for(&session, |v| {
        v.batter == "1. Ruth, RF #3" && v.home_name == "Bats" && v.away_name == "Owls"
    })
    .await;

    session.outcome(OutcomeKey::Single).await.unwrap();
    wait_for(&session, |v| v.batter == "2. Gehrig, 1B #4").await;

    session.outcome(OutcomeKey::Walk).await.unwrap();
    wait_for(&session, |v| v.batter == "3. (empty)").await;

    store
        .write_atomic(&StorePath::Team(TeamId::new("bats")), Value::Null)
        .await
        .unwrap();
    let view = wait_for(&session, |v| v.home_name == "Home").await;
    assert_eq!(view.away_name, "Owls");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_menu_requests_are_broadcast() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store).await;
    let mut events = session.events();

    let command = scorebook_client::parse_command("menu stats").unwrap();
    session.execute(command).await.unwrap();

    assert!(drain(&mut events).contains(&SessionEvent::OpenMenu(
        scorebook_client::MenuTarget::Stats
    )));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_closed_session_rejects_calls() {
    let store = Arc::new(MemoryStore::new());
    let session = start(store.clone()).await;

    session.shutdown().await.unwrap();

    assert_eq!(session.ball().await, Err(SessionError::Closed));
    assert_eq!(session.flush().await, Err(SessionError::Closed));
}

/// Memory store whose stat increments always fail
struct BrokenStats {
    inner: MemoryStore,
    increments: AtomicUsize,
}

#[async_trait]
impl Store for BrokenStats {
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>> {
        self.inner.read_once(path).await
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        self.inner.subscribe(path).await
    }

    async fn write_atomic(&self, path: &StorePath, value: Value) -> Result<()> {
        self.inner.write_atomic(path, value).await
    }

    async fn increment_fields(&self, _: &StorePath, _: &[(String, i64)]) -> Result<()> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("permission denied"))
    }
}

#[tokio::test]
async fn test_store_failures_do_not_block_scoring() {
    let store = Arc::new(BrokenStats {
        inner: MemoryStore::from_value(league()),
        increments: AtomicUsize::new(0),
    });
    let session = GameSession::start(store.clone(), Matchup::new("bats", "owls"), config())
        .await
        .unwrap();
    let mut events = session.events();

    let view = session.outcome(OutcomeKey::Double).await.unwrap();
    assert!(view.state.runners.second);

    session.flush().await.unwrap();
    assert_eq!(store.increments.load(Ordering::SeqCst), 2);

    let failures: Vec<_> = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::PersistenceFailed { .. }))
        .collect();
    assert_eq!(failures.len(), 1);

    // The slot write still went through
    assert_eq!(
        store
            .read_once(&StorePath::CurrentBatSlot(TeamId::new("owls")))
            .await
            .unwrap(),
        Some(json!(2))
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_slot_stays_advanced_after_first_play() {
    for _ in 0..20 {
        let store = Arc::new(MemoryStore::from_value(league()));
        let session = start(store.clone()).await;

        session.outcome(OutcomeKey::Single).await.unwrap();
        session.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let view = session.view().await.unwrap();
        assert_eq!(view.away_slot.get(), 2);
        assert_eq!(bat_slot(&store, "owls").await, Some(json!(2)));

        session.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn test_unrelated_team_writes_do_not_rewind_slot() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store.clone()).await;
    let owls = StorePath::Team(TeamId::new("owls"));

    for _ in 0..6 {
        session.outcome(OutcomeKey::Walk).await.unwrap();
        store
            .increment_fields(&owls, &[("edits".to_string(), 1)])
            .await
            .unwrap();
    }
    session.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let view = session.view().await.unwrap();
    assert_eq!(view.away_slot.get(), 7);
    assert_eq!(bat_slot(&store, "owls").await, Some(json!(7)));

    session.shutdown().await.unwrap();
}

/// Memory store that refuses bat slot writes from the session
struct BrokenSlots {
    inner: MemoryStore,
}

#[async_trait]
impl Store for BrokenSlots {
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>> {
        self.inner.read_once(path).await
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        self.inner.subscribe(path).await
    }

    async fn write_atomic(&self, path: &StorePath, value: Value) -> Result<()> {
        if matches!(path, StorePath::CurrentBatSlot(_)) {
            return Err(anyhow!("write rejected"));
        }
        self.inner.write_atomic(path, value).await
    }

    async fn increment_fields(&self, path: &StorePath, increments: &[(String, i64)]) -> Result<()> {
        self.inner.increment_fields(path, increments).await
    }
}

#[tokio::test]
async fn test_failed_slot_write_does_not_hide_later_changes() {
    let store = Arc::new(BrokenSlots {
        inner: MemoryStore::from_value(league()),
    });
    let session = GameSession::start(store.clone(), Matchup::new("bats", "owls"), config())
        .await
        .unwrap();

    let view = session.outcome(OutcomeKey::Single).await.unwrap();
    assert_eq!(view.away_slot.get(), 2);
    session.flush().await.unwrap();

    // Someone else moves the lineup, first away from 2 and then back to it
    let path = StorePath::CurrentBatSlot(TeamId::new("owls"));
    store.inner.write_atomic(&path, json!(5)).await.unwrap();
    wait_for(&session, |v| v.away_slot.get() == 5).await;

    store.inner.write_atomic(&path, json!(2)).await.unwrap();
    wait_for(&session, |v| {
        v.away_slot.get() == 2 && v.batter == "2. Gehrig, 1B #4"
    })
    .await;

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_random_games_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(1927);
    let outcomes = OutcomeKey::ALL;

    for _ in 0..5 {
        let store = Arc::new(MemoryStore::from_value(league()));
        let session = start(store).await;

        for _ in 0..150 {
            let view = session.view().await.unwrap();
            let result = if let Some(prompt) = &view.prompt {
                let choice = *prompt.choices.choose(&mut rng).unwrap();
                session.answer(choice).await
            } else {
                match rng.gen_range(0..10) {
                    0..=2 => session.ball().await,
                    3..=5 => session.strike().await,
                    6 => session.undo().await,
                    _ => session.outcome(*outcomes.choose(&mut rng).unwrap()).await,
                }
            };

            let view = result.unwrap();
            let state = view.state;
            assert!(state.count.balls <= 3);
            assert!(state.count.strikes <= 2);
            assert!(state.outs <= 2);
            assert!(state.inning >= 1);
        }

        session.shutdown().await.unwrap();
    }
}

#[derive(Default)]
struct Recorder {
    states: usize,
    retired: Vec<scorebook_client::RetiredSide>,
    menus: Vec<scorebook_client::MenuTarget>,
}

#[async_trait]
impl scorebook_client::SessionHandler for Recorder {
    async fn on_state(&mut self, _view: &GameView) {
        self.states += 1;
    }

    async fn on_side_retired(&mut self, retired: scorebook_client::RetiredSide) {
        self.retired.push(retired);
    }

    async fn on_menu(&mut self, target: scorebook_client::MenuTarget) {
        self.menus.push(target);
    }
}

#[tokio::test]
async fn test_handler_sees_events_until_shutdown() {
    let store = Arc::new(MemoryStore::from_value(league()));
    let session = start(store).await;
    let events = session.events();

    let recorder = tokio::spawn(async move {
        let mut recorder = Recorder::default();
        scorebook_client::run_handler(events, &mut recorder)
            .await
            .unwrap();
        recorder
    });

    for _ in 0..3 {
        session.outcome(OutcomeKey::Strikeout).await.unwrap();
    }
    session
        .open_menu(scorebook_client::MenuTarget::Outcomes)
        .unwrap();
    session.shutdown().await.unwrap();
    drop(session);

    let recorder = recorder.await.unwrap();
    assert!(recorder.states >= 3);
    assert_eq!(recorder.retired.len(), 1);
    assert_eq!(recorder.menus, vec![scorebook_client::MenuTarget::Outcomes]);
}
