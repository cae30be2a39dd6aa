use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mb_battle::{
    BattleEngine, BattleEventKind, MemoryStore, RecordingPresenter, RunStats, TurnResult,
};
use mb_core::Phase;

pub struct Options<'a> {
    pub difficulty: &'a str,
    pub seed: Option<u64>,
    pub accuracy: f64,
    pub max_turns: u32,
    pub runs: u32,
    pub events: bool,
    pub config: Option<&'a Path>,
}

struct RunSummary {
    level: u32,
    turns: u32,
    stats: RunStats,
    knocked_out: bool,
}

type Engine = BattleEngine<MemoryStore, RecordingPresenter>;

pub fn run(opts: &Options<'_>) -> Result<(), String> {
    if !(0.0..=1.0).contains(&opts.accuracy) {
        return Err(format!(
            "accuracy must be between 0 and 1, got {}",
            opts.accuracy
        ));
    }
    if opts.runs == 0 {
        return Err("runs must be at least 1".into());
    }
    let difficulty = super::parse_difficulty(opts.difficulty)?;
    let mut config = super::load_config(opts.config)?;
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let mut engine = BattleEngine::new(config, MemoryStore::new(), RecordingPresenter::new())
        .map_err(|e| format!("cannot start engine: {e}"))?;
    // Separate stream for the bot, seeded next to the engine.
    let mut bot = StdRng::seed_from_u64(seed.wrapping_add(1));

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} runs, {difficulty}, seed={seed}, accuracy={})",
            opts.runs, opts.accuracy
        )
        .dimmed()
    );
    println!();

    let mut summaries = Vec::new();
    for index in 1..=opts.runs {
        engine.presenter_mut().clear();
        let summary = fight(&mut engine, &mut bot, difficulty, opts);
        tracing::debug!(run = index, level = summary.level, turns = summary.turns, "run finished");
        if opts.events {
            print_timeline(index, &engine);
        }
        summaries.push(summary);
        engine.return_to_menu();
    }

    println!("{}", summary_table(&summaries));
    println!();

    let total_levels: u32 = summaries.iter().map(|s| s.level).sum();
    let average = f64::from(total_levels) / summaries.len() as f64;
    println!("  Average level: {average:.1}");
    println!("  Best level: {}", engine.best_level().to_string().bold());
    Ok(())
}

fn fight(
    engine: &mut Engine,
    bot: &mut StdRng,
    difficulty: mb_core::Difficulty,
    opts: &Options<'_>,
) -> RunSummary {
    engine.start_run(difficulty);
    let mut turns = 0;
    let mut knocked_out = false;

    while turns < opts.max_turns && engine.phase() == Phase::Playing {
        let Some(problem) = engine.run().problem() else {
            break;
        };
        let answer = problem.answer();
        let choice = if bot.random_bool(opts.accuracy) {
            problem.options().iter().position(|&o| o == answer)
        } else {
            let wrong: Vec<usize> = problem
                .options()
                .iter()
                .enumerate()
                .filter(|&(_, &o)| o != answer)
                .map(|(i, _)| i)
                .collect();
            Some(wrong[bot.random_range(0..wrong.len())])
        };
        let Some(index) = choice else {
            break;
        };

        turns += 1;
        if let Some(outcome) = engine.submit_option(index).outcome() {
            knocked_out = outcome.result == TurnResult::GameOver;
        }
        engine.run_until_idle();
    }

    let run = engine.run();
    RunSummary {
        level: run.level(),
        turns,
        stats: *run.stats(),
        knocked_out,
    }
}

fn summary_table(summaries: &[RunSummary]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Run",
        "Level",
        "Turns",
        "Correct",
        "Wrong",
        "Max combo",
        "Crits",
        "Result",
    ]);
    for (i, s) in summaries.iter().enumerate() {
        let result = if s.knocked_out {
            "knocked out"
        } else {
            "turn limit"
        };
        table.add_row(vec![
            (i + 1).to_string(),
            s.level.to_string(),
            s.turns.to_string(),
            s.stats.total_correct.to_string(),
            s.stats.total_wrong.to_string(),
            s.stats.max_combo.to_string(),
            s.stats.critical_hits.to_string(),
            result.to_string(),
        ]);
    }
    table
}

fn print_timeline(index: u32, engine: &Engine) {
    println!("  {}", format!("Run {index}").bold().underline());
    for event in engine.presenter().log().events() {
        let at = format!("[{:>6} ms]", event.at_ms).dimmed();
        let line = match &event.kind {
            BattleEventKind::RunStarted { difficulty } => format!("run started ({difficulty})"),
            BattleEventKind::LevelStarted {
                level,
                opponent_max_hp,
            } => format!("round {level}: robot with {opponent_max_hp} hp")
                .bold()
                .to_string(),
            BattleEventKind::ProblemPosed { question, .. } => question.clone(),
            BattleEventKind::ProblemCorrect {
                critical,
                damage,
                combo,
            } => {
                let label = if *critical { "critical" } else { "hit" };
                format!("{label} for {damage} (combo {combo})")
                    .green()
                    .to_string()
            }
            BattleEventKind::ProblemWrong { penalty, answer } => {
                format!("missed, took {penalty} (answer {answer})")
                    .red()
                    .to_string()
            }
            BattleEventKind::LevelWon { level, heal } => format!("round {level} won, +{heal} hp")
                .yellow()
                .to_string(),
            BattleEventKind::RunLost { level, new_best } => {
                let best = if *new_best { ", new best" } else { "" };
                format!("knocked out in round {level}{best}")
                    .red()
                    .bold()
                    .to_string()
            }
            BattleEventKind::Commentary { text, .. } => format!("\"{text}\"").dimmed().to_string(),
            BattleEventKind::ReturnedToMenu => "back to menu".to_string(),
        };
        println!("  {at} {line}");
    }
    println!();
}
