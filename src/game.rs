pub mod case404;
pub mod engine;
pub mod node;
pub mod resolver;
pub mod script;
pub mod session;
pub mod snapshot;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::command::{parse_command, Command, HELP};
use engine::Interrogation;
use resolver::ActionReport;
use snapshot::{HubView, InterrogationView, Snapshot};

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn meter(value: i32) -> String {
    let filled = (value.clamp(0, 100) / 10) as usize;
    format!("[{}{}] {:>3}", "#".repeat(filled), ".".repeat(10 - filled), value)
}

fn render_hub(hub: &HubView) {
    println!("\n========================================");
    println!("   {}", hub.case.title);
    println!("========================================");
    println!("{}", hub.case.synopsis);
    println!("STRIKES: {}", "X ".repeat(hub.strikes as usize));
    println!("\nSUSPECTS:");
    for s in &hub.suspects {
        println!("  {:<10} {} ({})", s.id, s.name, s.role);
    }
    println!("\nEVIDENCE:");
    for e in &hub.evidence {
        println!("  {:<18} {}: {}", e.id, e.name, e.description);
    }
    println!("\nPROBE for information. PRY into secrets. PROVOKE a reaction.");
}

fn render_interrogation(view: &InterrogationView) {
    println!("\n----------------------------------------");
    println!(
        "{} ({})  STRIKES: {}",
        view.suspect.name,
        view.suspect.role,
        "X ".repeat(view.strikes as usize)
    );
    println!("  Mask   {}  {:?}", meter(view.mask_integrity), view.stage);
    println!("  Stress {}", meter(view.suspect_stress));
    if let Some(query) = &view.last_query {
        println!("\n[You]: \"{query}\"");
    }
    println!("[{}]: {}", view.suspect.name, view.text);
    if let Some(reward) = &view.reward_text {
        println!("\n  *** {reward} ***");
    }
}

fn render(snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Hub(hub) => render_hub(hub),
        Snapshot::Interrogation(view) => render_interrogation(view),
    }
}

fn show_game_over(result: &str) {
    println!("\n========================================");
    println!("   {result}");
    println!("========================================\n");
    println!("  [r] Restart    [q] Quit\n");
}

// ---------------------------------------------------------------------------
// Console input
// ---------------------------------------------------------------------------

/// What came back from waiting on the player.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    /// The deadline passed with no input.
    TimedOut,
    /// Stdin was closed.
    Closed,
}

/// Read stdin on a background thread so the loop can wait with a deadline.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("failed to read player input: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Wait for the next line, giving up at `deadline` if there is one.
fn next_input(lines: &Receiver<String>, deadline: Option<Instant>) -> Input {
    let Some(deadline) = deadline else {
        return lines.recv().map_or(Input::Closed, Input::Line);
    };
    let wait = deadline.saturating_duration_since(Instant::now());
    match lines.recv_timeout(wait) {
        Ok(line) => Input::Line(line),
        Err(RecvTimeoutError::Timeout) => Input::TimedOut,
        Err(RecvTimeoutError::Disconnected) => Input::Closed,
    }
}

/// Read the player's post-game choice. Returns `true` to restart, `false` to quit.
fn prompt_restart(lines: &Receiver<String>) -> Result<bool> {
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Input::Line(line) = next_input(lines, None) else {
            return Ok(false);
        };
        match line.trim().to_lowercase().as_str() {
            "r" => return Ok(true),
            "q" => return Ok(false),
            _ => println!("  Press [r] to restart or [q] to quit."),
        }
    }
}

fn describe(report: &ActionReport) {
    match report {
        ActionReport::Ignored => println!("(Nobody is listening.)"),
        ActionReport::Weak { .. } => println!("(The question lands on deaf ears.)"),
        ActionReport::Strong(res) => {
            for id in &res.evidence_added {
                println!("(New evidence: {id})");
            }
            if res.strike && !res.game_over {
                println!("(STRIKE. The suspect shuts down.)");
            }
        }
    }
}

/// Apply one command to the engine. Returns `false` when the player quits.
fn handle(engine: &mut Interrogation, command: Command) -> Result<bool> {
    match command {
        Command::Select(id) => engine.select_suspect(&id),
        Command::Act(kind, id) => describe(&engine.perform_action(kind, &id)),
        Command::Hub => engine.return_to_hub(),
        Command::State => {
            let json = serde_json::to_string_pretty(&engine.get_state())
                .context("failed to serialise snapshot")?;
            println!("{json}");
        }
        Command::Restart => engine.start_session(),
        Command::Help => println!("{HELP}"),
        Command::Quit => {
            println!("You walk away from the case.");
            return Ok(false);
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Console loop
// ---------------------------------------------------------------------------

/// Run the interrogation at the terminal until the player quits.
///
/// While reward text is up the loop still takes commands; if none arrives
/// before the engine's deadline the automatic return fires.
pub fn run(engine: &mut Interrogation) -> Result<()> {
    let lines = spawn_stdin_reader();

    engine.start_session();
    info!("Game started with {} suspects", engine.store().suspects.len());
    println!("Type 'help' for commands.");

    loop {
        let snapshot = engine.get_state();
        render(&snapshot);

        if let Some(result) = snapshot.game_result() {
            show_game_over(result);
            if !prompt_restart(&lines)? {
                println!("Thanks for playing!");
                return Ok(());
            }
            info!("Player chose to restart");
            engine.start_session();
            continue;
        }

        print!("\n> ");
        io::stdout().flush()?;
        let line = match next_input(&lines, engine.pending_return_deadline()) {
            Input::Line(line) => line,
            Input::TimedOut => {
                engine.poll(Instant::now());
                println!();
                continue;
            }
            Input::Closed => return Ok(()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                warn!("{e:#}");
                println!("({e}. Type 'help' for commands.)");
                continue;
            }
        };
        debug!("Command: {command:?}");

        if !handle(engine, command)? {
            return Ok(());
        }
    }
}
