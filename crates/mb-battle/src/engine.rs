//! The battle state machine.
//!
//! [`BattleEngine`] owns the run, both combatants, the RNG, and a
//! [`Scheduler`] of follow-up transitions driven by a [`VirtualClock`].
//! Commands that arrive out of order are ignored, never errors: they come
//! back as [`Submission::Ignored`] and leave every piece of state untouched.
//!
//! A turn is applied in a fixed order. Health changes first, then the
//! terminal check reads the hp returned by that change, then the follow-up
//! is scheduled. The `in_flight` flag stays set until the follow-up fires,
//! so a second answer to the same problem is always rejected.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use mb_core::{AnimationFlags, Combatant, Difficulty, Phase, Problem, Side};
use mb_quiz::{CommentaryEvent, generate_problem};

use crate::clock::VirtualClock;
use crate::config::BattleConfig;
use crate::error::BattleResult;
use crate::event::{BattleEvent, BattleEventKind};
use crate::presenter::{NullPresenter, Presenter};
use crate::run::{Feedback, Run};
use crate::scheduler::Scheduler;
use crate::snapshot::Snapshot;
use crate::store::{BestLevelStore, MemoryStore};

/// Transitions the engine schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Pose the next problem of the current level.
    NextProblem,
    /// Move from the level transition to the next level.
    AdvanceLevel,
}

/// Why a submission was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The engine is not in [`Phase::Playing`].
    NotPlaying,
    /// No problem is on screen.
    NoActiveProblem,
    /// An earlier answer is still waiting for its follow-up.
    InFlight,
    /// The option index is out of range.
    NoSuchOption(usize),
}

/// How an accepted answer ended the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The fight goes on; the next problem is scheduled.
    Continue,
    /// The opponent was knocked out; the next level is scheduled.
    LevelComplete,
    /// The player was knocked out.
    GameOver,
}

/// The effect of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Whether the answer was right.
    pub correct: bool,
    /// Whether the punch was a critical hit.
    pub critical: bool,
    /// Damage dealt to the opponent, or taken by the player on a wrong answer.
    pub damage: u32,
    /// Combo after the answer.
    pub combo: u32,
    /// Player hp after the answer.
    pub player_hp: u32,
    /// Opponent hp after the answer.
    pub opponent_hp: u32,
    /// How the turn ended.
    pub result: TurnResult,
}

/// Result of [`BattleEngine::submit_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The answer was accepted and applied.
    Resolved(TurnOutcome),
    /// The answer was dropped with no state change.
    Ignored(IgnoreReason),
}

impl Submission {
    /// The outcome, if the answer was accepted.
    pub fn outcome(&self) -> Option<&TurnOutcome> {
        match self {
            Self::Resolved(outcome) => Some(outcome),
            Self::Ignored(_) => None,
        }
    }

    /// Returns `true` if the answer was dropped.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// The math boxing battle engine.
///
/// Owns the run, RNG, clock, pending follow-ups, best-level store, and the
/// presenter it reports to.
pub struct BattleEngine<S = MemoryStore, P = NullPresenter> {
    config: BattleConfig,
    rng: StdRng,
    clock: VirtualClock,
    scheduler: Scheduler<FollowUp>,
    store: S,
    presenter: P,
    phase: Phase,
    run: Run,
    best_level: u32,
}

impl<S, P> std::fmt::Debug for BattleEngine<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEngine")
            .field("phase", &self.phase)
            .field("level", &self.run.level)
            .field("best_level", &self.best_level)
            .field("now", &self.clock.now())
            .field("pending", &self.scheduler.len())
            .finish()
    }
}

impl BattleEngine {
    /// A headless engine with an in-memory store.
    pub fn headless(config: BattleConfig) -> BattleResult<Self> {
        Self::new(config, MemoryStore::new(), NullPresenter)
    }
}

impl<S: BestLevelStore, P: Presenter> BattleEngine<S, P> {
    /// Create an engine in [`Phase::Menu`] and render the first frame.
    ///
    /// Fails only if the balance table is invalid. An unreadable store is
    /// logged and treated as empty.
    pub fn new(config: BattleConfig, store: S, presenter: P) -> BattleResult<Self> {
        config.balance.validate()?;
        let best_level = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "cannot load best level, starting from 0");
            0
        });
        let rng = StdRng::seed_from_u64(config.seed);
        let run = Run::new(Difficulty::default(), &config.balance);
        let mut engine = Self {
            config,
            rng,
            clock: VirtualClock::new(),
            scheduler: Scheduler::new(),
            store,
            presenter,
            phase: Phase::Menu,
            run,
            best_level,
        };
        engine.render();
        Ok(engine)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current (or last finished) run.
    pub fn run(&self) -> &Run {
        &self.run
    }

    /// Best level across runs.
    pub fn best_level(&self) -> u32 {
        self.best_level
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Number of scheduled follow-ups.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// The best-level store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The frame a renderer would draw right now.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.phase, &self.run, self.best_level)
    }

    /// Tear the engine down, handing back its store and presenter.
    pub fn into_parts(self) -> (S, P) {
        (self.store, self.presenter)
    }

    /// Leave the menu and start a run at level 1. Ignored outside the menu.
    pub fn start_run(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != Phase::Menu {
            debug!(phase = %self.phase, "start ignored outside the menu");
            return false;
        }
        self.cancel_pending();
        self.run = Run::new(difficulty, &self.config.balance);
        self.enter(Phase::Playing);
        info!(%difficulty, best_level = self.best_level, "run started");
        self.emit(BattleEventKind::RunStarted { difficulty });
        self.begin_level();
        true
    }

    /// Answer the current problem with `selected`.
    pub fn submit_answer(&mut self, selected: u32) -> Submission {
        let (correct, answer) = match self.active_problem() {
            Ok(problem) => (problem.is_correct(selected), problem.answer()),
            Err(reason) => return self.ignore(reason),
        };
        self.run.in_flight = true;
        let outcome = if correct {
            self.resolve_correct()
        } else {
            self.resolve_wrong(answer)
        };
        self.render();
        Submission::Resolved(outcome)
    }

    /// Answer with the option at `index` (0-based), as an answer button would.
    pub fn submit_option(&mut self, index: usize) -> Submission {
        let selected = match self.active_problem() {
            Ok(problem) => problem.option(index),
            Err(reason) => return self.ignore(reason),
        };
        match selected {
            Some(value) => self.submit_answer(value),
            None => self.ignore(IgnoreReason::NoSuchOption(index)),
        }
    }

    /// Go back to the menu.
    ///
    /// From [`Phase::GameOver`] this closes the finished run; from a run in
    /// progress it abandons the run without touching the best level. Calling
    /// it in the menu does nothing and returns `false`.
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase == Phase::Menu {
            debug!("already in the menu");
            return false;
        }
        if self.phase.in_run() {
            info!(level = self.run.level, "run abandoned");
        }
        self.cancel_pending();
        self.run = Run::new(self.run.difficulty, &self.config.balance);
        self.enter(Phase::Menu);
        self.reload_best_level();
        self.emit(BattleEventKind::ReturnedToMenu);
        self.render();
        true
    }

    /// Store presentation-only animation flags for one side.
    pub fn set_animation(&mut self, side: Side, flags: AnimationFlags) {
        match side {
            Side::Player => self.run.player.animation = flags,
            Side::Opponent => self.run.opponent.animation = flags,
        }
    }

    /// Move virtual time forward by `by`, firing every follow-up that falls
    /// due on the way in due-time order. Returns how many fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.clock.now().saturating_add(by);
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            if due > target {
                break;
            }
            self.clock.advance_to(due);
            fired += self.fire_due();
        }
        self.clock.advance_to(target);
        fired
    }

    /// Jump straight through every pending follow-up. Returns how many fired.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            self.clock.advance_to(due);
            fired += self.fire_due();
        }
        fired
    }

    /// Time left until the next follow-up fires, if any is pending.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    fn active_problem(&self) -> Result<&Problem, IgnoreReason> {
        if self.phase != Phase::Playing {
            return Err(IgnoreReason::NotPlaying);
        }
        if self.run.in_flight {
            return Err(IgnoreReason::InFlight);
        }
        self.run.problem.as_ref().ok_or(IgnoreReason::NoActiveProblem)
    }

    fn ignore(&self, reason: IgnoreReason) -> Submission {
        debug!(?reason, phase = %self.phase, "submission ignored");
        Submission::Ignored(reason)
    }

    fn resolve_correct(&mut self) -> TurnOutcome {
        let next_combo = self.run.combo + 1;
        let critical = self.config.balance.is_critical(next_combo);
        let damage = self.config.balance.damage_for_combo(next_combo);
        let combo = self.run.record_correct(critical);
        let opponent_hp = self.run.opponent.damage(damage);
        self.run.feedback = Some(if critical {
            Feedback::Critical
        } else {
            Feedback::Nice
        });
        self.emit(BattleEventKind::ProblemCorrect {
            critical,
            damage,
            combo,
        });

        let result = if opponent_hp == 0 {
            self.complete_level();
            TurnResult::LevelComplete
        } else {
            self.commentate(CommentaryEvent::Correct);
            let delay = self.config.balance.next_problem_delay();
            self.schedule(FollowUp::NextProblem, delay);
            TurnResult::Continue
        };

        TurnOutcome {
            correct: true,
            critical,
            damage,
            combo,
            player_hp: self.run.player.hp(),
            opponent_hp,
            result,
        }
    }

    fn resolve_wrong(&mut self, answer: u32) -> TurnOutcome {
        let penalty = self.config.balance.wrong_penalty;
        self.run.record_wrong();
        let player_hp = self.run.player.damage(penalty);
        self.run.feedback = Some(Feedback::Ouch);
        self.run.revealed_answer = Some(answer);
        self.emit(BattleEventKind::ProblemWrong { penalty, answer });

        let result = if player_hp == 0 {
            self.finish_run();
            TurnResult::GameOver
        } else {
            self.commentate(CommentaryEvent::Wrong);
            let delay = self.config.balance.next_problem_delay();
            self.schedule(FollowUp::NextProblem, delay);
            TurnResult::Continue
        };

        TurnOutcome {
            correct: false,
            critical: false,
            damage: penalty,
            combo: 0,
            player_hp,
            opponent_hp: self.run.opponent.hp(),
            result,
        }
    }

    fn complete_level(&mut self) {
        let level = self.run.level;
        let heal = self.config.balance.level_heal;
        let player_hp = self.run.player.heal(heal);
        self.run.stats.levels_cleared += 1;
        self.enter(Phase::LevelTransition);
        info!(level, player_hp, "level won");
        self.emit(BattleEventKind::LevelWon { level, heal });
        self.commentate(CommentaryEvent::Win);
        let delay = self.config.balance.level_transition_delay();
        self.schedule(FollowUp::AdvanceLevel, delay);
    }

    fn finish_run(&mut self) {
        self.cancel_pending();
        self.enter(Phase::GameOver);
        self.run.problem = None;
        self.run.in_flight = false;

        let level = self.run.level;
        let new_best = level > self.best_level;
        if new_best {
            self.best_level = level;
            if let Err(e) = self.store.save(level) {
                warn!(error = %e, level, "cannot save best level, keeping it in memory");
            }
        }
        info!(level, new_best, "game over");
        self.emit(BattleEventKind::RunLost { level, new_best });
        self.commentate(CommentaryEvent::Lose);
    }

    fn begin_level(&mut self) {
        let level = self.run.level;
        let opponent_max_hp = self.config.balance.opponent_max_hp(level);
        self.run.opponent = Combatant::new(opponent_max_hp);
        self.emit(BattleEventKind::LevelStarted {
            level,
            opponent_max_hp,
        });
        self.commentate(CommentaryEvent::Start);
        self.pose_problem();
    }

    fn pose_problem(&mut self) {
        let problem = generate_problem(self.run.difficulty, &mut self.rng);
        self.run.clear_turn();
        self.emit(BattleEventKind::ProblemPosed {
            problem: problem.id(),
            question: problem.question().to_string(),
        });
        self.run.problem = Some(problem);
        self.render();
    }

    fn commentate(&mut self, event: CommentaryEvent) {
        let text = self
            .config
            .commentary
            .pick(
                self.run.player.hp(),
                self.run.opponent.hp(),
                event,
                &mut self.rng,
            )
            .to_string();
        if text.is_empty() {
            return;
        }
        self.run.commentary = Some(text.clone());
        self.emit(BattleEventKind::Commentary { event, text });
    }

    fn reload_best_level(&mut self) {
        match self.store.load() {
            // A failed save earlier may have left the store behind memory.
            Ok(stored) => self.best_level = self.best_level.max(stored),
            Err(e) => warn!(error = %e, "cannot load best level"),
        }
    }

    fn fire_due(&mut self) -> usize {
        let mut fired = 0;
        while let Some((id, action)) = self.scheduler.pop_due(self.clock.now()) {
            debug!(%id, ?action, "follow-up fired");
            self.fire(action);
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, action: FollowUp) {
        match action {
            FollowUp::NextProblem if self.phase == Phase::Playing => self.pose_problem(),
            FollowUp::AdvanceLevel if self.phase == Phase::LevelTransition => {
                self.run.level += 1;
                self.enter(Phase::Playing);
                info!(level = self.run.level, "next level");
                self.begin_level();
            }
            stale => debug!(action = ?stale, phase = %self.phase, "stale follow-up dropped"),
        }
    }

    fn schedule(&mut self, action: FollowUp, delay: Duration) {
        let id = self.scheduler.post(self.clock.now(), delay, action);
        debug!(%id, ?action, ?delay, "follow-up scheduled");
    }

    fn cancel_pending(&mut self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "pending follow-ups cancelled");
        }
        cancelled
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }

    fn emit(&mut self, kind: BattleEventKind) {
        let event = BattleEvent::new(self.clock.now_ms(), kind);
        self.presenter.notify(&event);
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.presenter.render(&snapshot);
    }
}
