pub mod best;
pub mod play;
pub mod simulate;

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mb_battle::{BattleConfig, FileStore, RunStats};
use mb_core::Difficulty;

/// Parse a difficulty name given on the command line.
fn parse_difficulty(name: &str) -> Result<Difficulty, String> {
    name.parse().map_err(|e: mb_core::CoreError| e.to_string())
}

/// Load the config file if one was given, otherwise the defaults.
fn load_config(path: Option<&Path>) -> Result<BattleConfig, String> {
    match path {
        Some(path) => BattleConfig::from_json_file(path)
            .map_err(|e| format!("cannot load {}: {e}", path.display())),
        None => Ok(BattleConfig::default()),
    }
}

/// The best-level slot in `dir`, or in the platform data directory.
fn open_store(dir: Option<&Path>) -> Result<FileStore, String> {
    match dir {
        Some(dir) => Ok(FileStore::in_dir(dir)),
        None => FileStore::default_location().map_err(|e| e.to_string()),
    }
}

/// Render a health bar like `[#######---] 14/20`.
fn health_bar(hp: u32, max_hp: u32) -> String {
    const WIDTH: u64 = 10;
    let (hp64, max64) = (u64::from(hp), u64::from(max_hp));
    let filled = if max64 == 0 {
        0
    } else {
        (hp64 * WIDTH).div_ceil(max64).min(WIDTH)
    };
    let bar = format!(
        "{}{}",
        "#".repeat(filled as usize),
        "-".repeat((WIDTH - filled) as usize)
    );
    let colored = if hp64 * 4 <= max64 {
        bar.red()
    } else if hp64 * 2 <= max64 {
        bar.yellow()
    } else {
        bar.green()
    };
    format!("[{colored}] {hp:>2}/{max_hp}")
}

/// Table of end-of-run counters.
fn stats_table(level: u32, best_level: u32, stats: &RunStats) -> Table {
    let accuracy = stats
        .accuracy()
        .map(|a| format!("{:.0}%", a * 100.0))
        .unwrap_or_else(|| "--".to_string());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec!["Level reached".to_string(), level.to_string()]);
    table.add_row(vec!["Best level".to_string(), best_level.to_string()]);
    table.add_row(vec!["Correct".to_string(), stats.total_correct.to_string()]);
    table.add_row(vec!["Wrong".to_string(), stats.total_wrong.to_string()]);
    table.add_row(vec!["Accuracy".to_string(), accuracy]);
    table.add_row(vec!["Max combo".to_string(), stats.max_combo.to_string()]);
    table.add_row(vec![
        "Critical hits".to_string(),
        stats.critical_hits.to_string(),
    ]);
    table
}
