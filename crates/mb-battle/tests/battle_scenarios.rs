//! Integration tests for battle scenarios.
use std::time::Duration;

use mb_battle::{
    BattleConfig, BattleEngine, BattleEventKind, BestLevelStore, FileStore, IgnoreReason,
    MemoryStore, Presenter, RecordingPresenter, StoreError, StoreResult, Submission, TurnResult,
};
use mb_core::{Difficulty, Phase};
use mb_quiz::CommentaryTable;
use mb_quiz::commentary::{OPPONENT_NEAR_DEFEAT_LINES, PLAYER_NEAR_DEFEAT_LINES};
use proptest::prelude::*;

type Engine = BattleEngine<MemoryStore, RecordingPresenter>;

fn engine_with(store: MemoryStore) -> Engine {
    BattleEngine::new(BattleConfig::default(), store, RecordingPresenter::new()).unwrap()
}

fn correct<S: BestLevelStore, P: Presenter>(e: &mut BattleEngine<S, P>) -> Submission {
    let answer = e.run().problem().expect("problem on screen").answer();
    e.submit_answer(answer)
}

fn wrong<S: BestLevelStore, P: Presenter>(e: &mut BattleEngine<S, P>) -> Submission {
    let answer = e.run().problem().expect("problem on screen").answer();
    e.submit_answer(answer + 1)
}

fn describe(kind: &BattleEventKind) -> String {
    match kind {
        BattleEventKind::RunStarted { difficulty } => format!("run started ({difficulty})"),
        BattleEventKind::LevelStarted {
            level,
            opponent_max_hp,
        } => format!("level {level} vs {opponent_max_hp} hp"),
        BattleEventKind::ProblemPosed { .. } => "problem".to_string(),
        BattleEventKind::ProblemCorrect {
            critical,
            damage,
            combo,
        } => format!(
            "correct combo={combo} damage={damage}{}",
            if *critical { " critical" } else { "" }
        ),
        BattleEventKind::ProblemWrong { penalty, .. } => format!("wrong penalty={penalty}"),
        BattleEventKind::LevelWon { level, heal } => format!("level {level} won, heal {heal}"),
        BattleEventKind::RunLost { level, new_best } => {
            format!("lost at level {level}, new best: {new_best}")
        }
        BattleEventKind::Commentary { event, .. } => format!("commentary ({event})"),
        BattleEventKind::ReturnedToMenu => "menu".to_string(),
    }
}

fn timeline(e: &Engine) -> String {
    e.presenter()
        .log()
        .events()
        .iter()
        .map(|ev| format!("{} {}", ev.at_ms, describe(&ev.kind)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_events(e: &Engine, pred: impl Fn(&BattleEventKind) -> bool) -> usize {
    e.presenter()
        .log()
        .events()
        .iter()
        .filter(|ev| pred(&ev.kind))
        .count()
}

fn problems_posed(e: &Engine) -> usize {
    count_events(e, |k| matches!(k, BattleEventKind::ProblemPosed { .. }))
}

#[test]
fn knockout_on_third_correct_answer_then_next_level() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    assert_eq!(e.run().opponent().max_hp(), 5);

    let first = *correct(&mut e).outcome().unwrap();
    assert_eq!((first.damage, first.opponent_hp), (1, 4));
    e.run_until_idle();
    let second = *correct(&mut e).outcome().unwrap();
    assert_eq!((second.damage, second.opponent_hp), (1, 3));
    e.run_until_idle();
    let third = *correct(&mut e).outcome().unwrap();
    assert!(third.critical);
    assert_eq!((third.damage, third.opponent_hp), (3, 0));
    assert_eq!(third.result, TurnResult::LevelComplete);
    assert_eq!(e.phase(), Phase::LevelTransition);
    assert_eq!(e.run().player().hp(), 20);

    e.advance(Duration::from_millis(1999));
    assert_eq!(e.phase(), Phase::LevelTransition);
    e.advance(Duration::from_millis(1));
    assert_eq!(e.phase(), Phase::Playing);
    assert_eq!(e.run().level(), 2);
    assert_eq!(e.run().opponent().max_hp(), 9);
    assert_eq!(e.run().opponent().hp(), 9);
    assert_eq!(e.run().combo(), 3);
    assert!(e.snapshot().accepts_answers());

    insta::assert_snapshot!(timeline(&e), @r"
    0 run started (easy)
    0 level 1 vs 5 hp
    0 commentary (start)
    0 problem
    0 correct combo=1 damage=1
    0 commentary (correct)
    800 problem
    800 correct combo=2 damage=1
    800 commentary (correct)
    1600 problem
    1600 correct combo=3 damage=3 critical
    1600 level 1 won, heal 5
    1600 commentary (win)
    3600 level 2 vs 9 hp
    3600 commentary (start)
    3600 problem
    ");
}

#[test]
fn ten_wrong_answers_end_the_run_and_save_best_level() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);

    for turn in 1..=10 {
        let outcome = *wrong(&mut e).outcome().unwrap();
        assert_eq!(outcome.player_hp, 20 - 2 * turn);
        if turn < 10 {
            assert_eq!(outcome.result, TurnResult::Continue);
            e.run_until_idle();
        } else {
            assert_eq!(outcome.result, TurnResult::GameOver);
        }
    }

    assert_eq!(e.phase(), Phase::GameOver);
    assert_eq!(e.best_level(), 1);
    assert_eq!(e.pending_tasks(), 0);
    assert!(e.run().problem().is_none());
    assert_eq!(e.run().stats().total_wrong, 10);
    let (store, _) = e.into_parts();
    assert_eq!(store.load().unwrap(), 1);
    assert_eq!(store.saves(), 1);
}

#[test]
fn game_over_below_best_does_not_save() {
    let mut e = engine_with(MemoryStore::with_value(4));
    assert_eq!(e.best_level(), 4);
    e.start_run(Difficulty::Hard);
    while e.phase() == Phase::Playing {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.best_level(), 4);
    let lost = count_events(&e, |k| {
        matches!(k, BattleEventKind::RunLost { new_best: false, .. })
    });
    assert_eq!(lost, 1);
    assert_eq!(e.store().saves(), 0);
}

#[test]
fn rapid_second_submission_is_ignored() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    let first = correct(&mut e);
    assert!(!first.is_ignored());
    let snapshot = e.snapshot();

    assert_eq!(
        wrong(&mut e),
        Submission::Ignored(IgnoreReason::InFlight)
    );
    assert_eq!(e.snapshot(), snapshot);
    assert_eq!(e.run().combo(), 1);
    assert_eq!(e.run().player().hp(), 20);

    e.advance(Duration::from_millis(800));
    assert!(!correct(&mut e).is_ignored());
    assert_eq!(e.run().combo(), 2);
}

#[test]
fn answers_during_level_transition_are_ignored() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    for _ in 0..3 {
        correct(&mut e);
        e.advance(Duration::from_millis(800));
    }
    assert_eq!(e.phase(), Phase::LevelTransition);
    assert_eq!(e.submit_option(0), Submission::Ignored(IgnoreReason::NotPlaying));
}

#[test]
fn no_problem_appears_after_game_over() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    for _ in 0..10 {
        wrong(&mut e);
        e.advance(Duration::from_millis(800));
    }
    assert_eq!(e.phase(), Phase::GameOver);
    let posed = problems_posed(&e);

    assert_eq!(e.advance(Duration::from_secs(60)), 0);
    assert_eq!(problems_posed(&e), posed);
    assert_eq!(e.phase(), Phase::GameOver);
}

#[test]
fn returning_to_menu_cancels_pending_problem() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    correct(&mut e);
    assert_eq!(e.pending_tasks(), 1);

    assert!(e.return_to_menu());
    assert_eq!(e.pending_tasks(), 0);
    let posed = problems_posed(&e);
    e.advance(Duration::from_secs(5));
    assert_eq!(problems_posed(&e), posed);
    assert_eq!(e.phase(), Phase::Menu);
    assert!(e.run().problem().is_none());
}

#[test]
fn abandoning_a_run_never_persists() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    for _ in 0..3 {
        correct(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.run().level(), 2);
    assert!(e.return_to_menu());
    assert_eq!(e.best_level(), 0);
    assert_eq!(e.store().saves(), 0);
}

#[test]
fn return_to_menu_twice_equals_once() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    while e.phase() == Phase::Playing {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert!(e.return_to_menu());
    let snapshot = e.snapshot();
    let events = e.presenter().log().len();

    assert!(!e.return_to_menu());
    assert_eq!(e.snapshot(), snapshot);
    assert_eq!(e.presenter().log().len(), events);
    assert_eq!(e.store().saves(), 1);
    assert_eq!(snapshot.best_level, 1);
}

#[test]
fn new_run_after_menu_resets_state() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    wrong(&mut e);
    e.run_until_idle();
    correct(&mut e);
    e.return_to_menu();

    assert!(e.start_run(Difficulty::Hard));
    let run = e.run();
    assert_eq!(run.level(), 1);
    assert_eq!(run.combo(), 0);
    assert_eq!(run.player().hp(), 20);
    assert_eq!(run.stats().total_correct, 0);
    assert_eq!(run.difficulty(), Difficulty::Hard);
}

#[test]
fn heal_is_clamped_at_max_hp() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    wrong(&mut e);
    e.run_until_idle();
    assert_eq!(e.run().player().hp(), 18);
    for _ in 0..3 {
        correct(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.run().level(), 2);
    assert_eq!(e.run().player().hp(), 20);
}

struct BrokenStore;

impl BestLevelStore for BrokenStore {
    fn load(&self) -> StoreResult<u32> {
        Err(StoreError::NoDataDir)
    }

    fn save(&mut self, _level: u32) -> StoreResult<()> {
        Err(StoreError::NoDataDir)
    }
}

#[test]
fn failing_store_keeps_best_level_in_memory() {
    let mut e =
        BattleEngine::new(BattleConfig::default(), BrokenStore, RecordingPresenter::new()).unwrap();
    assert_eq!(e.best_level(), 0);
    e.start_run(Difficulty::Easy);
    while e.phase() == Phase::Playing {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.phase(), Phase::GameOver);
    assert_eq!(e.best_level(), 1);
    assert!(e.return_to_menu());
    assert_eq!(e.best_level(), 1);
}

#[test]
fn file_store_survives_engine_restarts() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut e = BattleEngine::new(
        BattleConfig::default(),
        FileStore::in_dir(dir.path()),
        RecordingPresenter::new(),
    )
    .unwrap();
    e.start_run(Difficulty::Easy);
    for _ in 0..3 {
        correct(&mut e);
        e.run_until_idle();
    }
    while e.phase() == Phase::Playing {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.best_level(), 2);
    drop(e);

    let e = BattleEngine::new(
        BattleConfig::default(),
        FileStore::in_dir(dir.path()),
        RecordingPresenter::new(),
    )
    .unwrap();
    assert_eq!(e.best_level(), 2);
}

#[test]
fn commentary_reads_health_after_the_hit() {
    let lines = |line: &str| vec![line.to_string()];
    let table = CommentaryTable {
        correct: lines("clean hit"),
        opponent_near_defeat: lines("robot wobbles"),
        wrong: lines("clean miss"),
        player_near_defeat: lines("champion wobbles"),
        ..CommentaryTable::default()
    };
    let config = BattleConfig::default().with_commentary(table);
    let mut e = BattleEngine::new(config, MemoryStore::new(), RecordingPresenter::new()).unwrap();
    e.start_run(Difficulty::Easy);

    // 5 -> 4 hp crosses the threshold on this very hit.
    correct(&mut e);
    assert_eq!(e.run().opponent().hp(), 4);
    assert_eq!(e.run().commentary(), Some("robot wobbles"));
    e.run_until_idle();

    for _ in 0..7 {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.run().player().hp(), 6);
    assert_eq!(e.run().commentary(), Some("clean miss"));

    wrong(&mut e);
    assert_eq!(e.run().player().hp(), 4);
    assert_eq!(e.run().commentary(), Some("champion wobbles"));
}

#[test]
fn default_commentary_switches_to_near_defeat_lines() {
    let mut e = engine_with(MemoryStore::new());
    e.start_run(Difficulty::Easy);
    correct(&mut e);
    let line = e.run().commentary().expect("line after a hit");
    assert!(OPPONENT_NEAR_DEFEAT_LINES.contains(&line), "{line}");
    e.run_until_idle();

    for _ in 0..8 {
        wrong(&mut e);
        e.run_until_idle();
    }
    assert_eq!(e.run().player().hp(), 4);
    let line = e.run().commentary().expect("line after a miss");
    assert!(PLAYER_NEAR_DEFEAT_LINES.contains(&line), "{line}");
}

proptest! {
    #[test]
    fn combo_and_hp_invariants_hold(
        seed in any::<u64>(),
        hard in any::<bool>(),
        answers in prop::collection::vec(any::<bool>(), 1..120),
    ) {
        let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
        let mut e = BattleEngine::headless(BattleConfig::default().with_seed(seed)).unwrap();
        e.start_run(difficulty);

        for right in answers {
            if e.phase() != Phase::Playing {
                break;
            }
            let before = e.run().combo();
            let submission = if right { correct(&mut e) } else { wrong(&mut e) };
            let outcome = submission.outcome().copied();
            prop_assert!(outcome.is_some());
            let outcome = outcome.unwrap();

            if right {
                prop_assert_eq!(outcome.combo, before + 1);
                prop_assert_eq!(outcome.critical, outcome.combo % 3 == 0);
                prop_assert_eq!(outcome.damage, if outcome.critical { 3 } else { 1 });
            } else {
                prop_assert_eq!(outcome.combo, 0);
                prop_assert_eq!(e.run().combo(), 0);
            }

            let snap = e.snapshot();
            prop_assert!(snap.player.hp <= snap.player.max_hp);
            prop_assert!(snap.opponent.hp <= snap.opponent.max_hp);
            prop_assert!(snap.level >= 1);

            e.run_until_idle();
            prop_assert_eq!(e.pending_tasks(), 0);
        }
    }
}
