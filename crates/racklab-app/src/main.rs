//! racklab trainer entry point.
//!
//! Wires the engine crates into a stdin-driven session: catalog and
//! question bank load at startup, typed lines route through the registry
//! and step validator, and `exam` runs a timed practice selection.

mod config;
mod demo;
mod exam_run;
mod session;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;

use racklab_catalog::{CommandRegistry, builtin_catalog, load_catalog};
use session::{Session, SessionEvent};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::AppConfig::load(Path::new("racklab.toml"))?;

    let catalog = match &config.catalog {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog(),
    };
    let registry = CommandRegistry::from_catalog(catalog)?;
    log::info!("Registry ready: {} commands", registry.len());

    let questions = match &config.questions {
        Some(path) => racklab_exam::load_question_bank(path)?,
        None => demo::demo_question_bank()?,
    };

    let scenario = match &config.scenario {
        Some(path) => racklab_validate::load_scenario(path)?,
        None => demo::demo_scenario()?,
    };

    let mut session = Session::new(registry, scenario);
    session.banner();
    println!("\nType commands to work the scenario. 'help', 'hint', 'progress', 'exam', 'quit'.");

    let stdin = std::io::stdin();
    loop {
        print!("racklab> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(session.registry()),
            "hint" => session.print_hints(),
            "progress" => session.print_progress(),
            "exam" => exam_run::run_exam(&questions, &config),
            _ => {
                if session.handle_command(line) == SessionEvent::ScenarioComplete {
                    break;
                }
            },
        }
    }

    Ok(())
}

fn print_help(registry: &CommandRegistry) {
    println!("Available commands:");
    for cmd in registry.iter() {
        println!("  {:<12} [{}] {}", cmd.name, cmd.category, cmd.description);
    }
}
