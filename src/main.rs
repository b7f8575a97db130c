use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use unmask::game::case404::case_404;
use unmask::game::script::ScriptStore;
use unmask::{game, EngineConfig, Interrogation};

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run              # navigation, strikes, transitions
    //   RUST_LOG=debug  cargo run              # + weak actions, clamping, timers
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let store = match args.get(1).map(String::as_str) {
        None | Some("-") => {
            let store = case_404();
            store.validate().context("built-in case is invalid")?;
            store
        }
        Some(path) => ScriptStore::from_json_file(Path::new(path)).context(
            "Usage: unmask [case.json|-] [auto_return_ms]\n\
             \n\
             Example:\n  unmask ./cases/norresken.json 4000\n\
             \n\
             Logging: set RUST_LOG=debug for verbose output",
        )?,
    };

    let defaults = EngineConfig::default();
    let config = EngineConfig {
        auto_return_delay: args
            .get(2)
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.auto_return_delay),
        ..defaults
    };

    println!("Case: {}", store.case.title);
    println!("  Suspects    : {}", store.suspects.len());
    println!("  Auto-return : {:?}", config.auto_return_delay);

    let mut engine = Interrogation::new(store, config);
    game::run(&mut engine)
}
