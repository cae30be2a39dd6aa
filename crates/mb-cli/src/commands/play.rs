//! Line-oriented interactive play.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use mb_battle::{BattleEngine, BattleEvent, BattleEventKind, FileStore, Presenter, Submission};
use mb_core::{OPTION_COUNT, Phase};

type Engine = BattleEngine<FileStore, TerminalPresenter>;

/// Prints discrete events as they happen.
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn notify(&mut self, event: &BattleEvent) {
        match &event.kind {
            BattleEventKind::RunStarted { difficulty } => {
                println!();
                println!(
                    "  {} {}",
                    "MATH BOXING".bold(),
                    format!("({difficulty})").dimmed()
                );
            }
            BattleEventKind::LevelStarted {
                level,
                opponent_max_hp,
            } => {
                println!();
                println!(
                    "  {} {}",
                    format!("Round {level}").bold().underline(),
                    format!("robot with {opponent_max_hp} hp").dimmed()
                );
            }
            BattleEventKind::ProblemCorrect {
                critical: true,
                damage,
                ..
            } => println!(
                "  {} {}",
                "CRITICAL!!".magenta().bold(),
                format!("-{damage}").red()
            ),
            BattleEventKind::ProblemCorrect { damage, .. } => {
                println!("  {} {}", "Nice!".green().bold(), format!("-{damage}").red());
            }
            BattleEventKind::ProblemWrong { penalty, answer } => println!(
                "  {} {} {}",
                "Ouch!".red().bold(),
                format!("-{penalty}").red(),
                format!("(the answer was {answer})").dimmed()
            ),
            BattleEventKind::LevelWon { level, heal } => println!(
                "  {} {}",
                format!("Round {level} won!").yellow().bold(),
                format!("+{heal} hp").green()
            ),
            BattleEventKind::RunLost { level, new_best } => {
                println!(
                    "  {}",
                    format!("Knocked out in round {level}.").red().bold()
                );
                if *new_best {
                    println!("  {}", "New best level!".yellow().bold());
                }
            }
            BattleEventKind::Commentary { text, .. } => {
                println!("  {}", format!("\"{text}\"").italic().dimmed());
            }
            BattleEventKind::ProblemPosed { .. } | BattleEventKind::ReturnedToMenu => {}
        }
    }
}

enum Input {
    Quit,
    Option(usize),
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=OPTION_COUNT).contains(&n) => Input::Option(n - 1),
        _ => Input::Unknown,
    }
}

pub fn run(
    difficulty: &str,
    seed: Option<u64>,
    fast: bool,
    config: Option<&Path>,
    store_dir: Option<&Path>,
) -> Result<(), String> {
    let difficulty = super::parse_difficulty(difficulty)?;
    let mut cfg = super::load_config(config)?;
    cfg.seed = match (seed, config) {
        (Some(seed), _) => seed,
        (None, Some(_)) => cfg.seed,
        (None, None) => rand::random(),
    };
    tracing::debug!(seed = cfg.seed, "play seeded");

    let store = super::open_store(store_dir)?;
    let mut engine = BattleEngine::new(cfg, store, TerminalPresenter).map_err(|e| e.to_string())?;
    let mut lines = io::stdin().lock().lines();

    println!("  Best level so far: {}", engine.best_level());
    engine.start_run(difficulty);

    loop {
        match engine.phase() {
            Phase::Playing | Phase::LevelTransition => {
                if let Some(wait) = engine.next_due_in() {
                    if !fast {
                        std::thread::sleep(wait);
                    }
                    engine.advance(wait);
                    continue;
                }
                prompt(&engine)?;
                let Some(line) = lines.next() else {
                    println!();
                    engine.return_to_menu();
                    break;
                };
                match parse_input(&line.map_err(|e| e.to_string())?) {
                    Input::Quit => {
                        engine.return_to_menu();
                        println!("  Run abandoned.");
                        break;
                    }
                    Input::Option(index) => {
                        if let Submission::Ignored(reason) = engine.submit_option(index) {
                            println!("  {}", format!("(ignored: {reason:?})").dimmed());
                        }
                    }
                    Input::Unknown => println!(
                        "  {}",
                        "Type 1-4 to pick an answer, or q to quit.".dimmed()
                    ),
                }
            }
            Phase::GameOver => {
                let run = engine.run();
                println!();
                println!(
                    "{}",
                    super::stats_table(run.level(), engine.best_level(), run.stats())
                );
                print!("  Fight again? [y/N] ");
                io::stdout().flush().map_err(|e| e.to_string())?;
                let again = matches!(lines.next(), Some(Ok(l)) if l.trim().eq_ignore_ascii_case("y"));
                engine.return_to_menu();
                if again {
                    engine.start_run(difficulty);
                } else {
                    println!();
                    break;
                }
            }
            Phase::Menu => break,
        }
    }

    println!("  Best level: {}", engine.best_level());
    Ok(())
}

fn prompt(engine: &Engine) -> Result<(), String> {
    let snap = engine.snapshot();
    let Some(problem) = &snap.current_problem else {
        return Ok(());
    };
    println!();
    println!(
        "  You   {}  {}",
        super::health_bar(snap.player.hp, snap.player.max_hp),
        format!("combo {}", snap.combo).dimmed()
    );
    println!(
        "  Robot {}",
        super::health_bar(snap.opponent.hp, snap.opponent.max_hp)
    );
    println!("  {}", problem.question().bold());
    let options: Vec<String> = problem
        .options()
        .iter()
        .enumerate()
        .map(|(i, o)| format!("[{}] {o}", i + 1))
        .collect();
    print!("  {}  > ", options.join("  "));
    io::stdout().flush().map_err(|e| e.to_string())
}
