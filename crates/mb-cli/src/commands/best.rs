use std::path::Path;

use colored::Colorize;

use mb_battle::BestLevelStore;

pub fn run(reset: bool, store_dir: Option<&Path>) -> Result<(), String> {
    let store = super::open_store(store_dir)?;

    if reset {
        store.clear().map_err(|e| e.to_string())?;
        println!("  Best level reset ({})", store.path().display());
        return Ok(());
    }

    match store.load().map_err(|e| e.to_string())? {
        0 => println!("  No best level yet. Run `mathbox play` to set one."),
        level => println!("  Best level: {}", level.to_string().bold()),
    }
    Ok(())
}
