mod catalog;
mod games;
mod narration;
mod random;
mod tui;

use games::Level;
use std::env;
use tracing_subscriber::EnvFilter;

fn main()
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => interactive_menu(),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("devices") => {
            list_devices();
            Ok(())
        }
        Some(name @ ("connect" | "memory" | "puzzle" | "wordsearch" | "quiz")) => {
            run_game(name, &rest)
        }
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

fn run_game(name: &str, args: &[String]) -> Result<(), String>
{
    let level = Level::from_args(args)?;
    tracing::debug!(game = name, level = level.label(), "starting game");
    match name {
        "connect" => games::connect::run(level),
        "memory" => games::memory::run(level),
        "puzzle" => games::puzzle::run(level),
        "wordsearch" => games::wordsearch::run(level),
        "quiz" => games::quiz::run(level),
        _ => Err(format!("Unknown game '{name}'. Run with --help.")),
    }
}

fn interactive_menu() -> Result<(), String>
{
    let registry = games::registry();
    println!("WIT Arcade");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::Write::flush(&mut std::io::stdout())
        .map_err(|err| format!("Failed to flush stdout: {err}"))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|err| format!("Failed to read input: {err}"))?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_game(registry[0].name, &[]);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_game(registry[index - 1].name, &[]);
        }
    }

    for game in registry {
        if game.name.eq_ignore_ascii_case(choice) {
            return run_game(game.name, &[]);
        }
    }

    Err("Invalid selection.".to_string())
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<12} - {}", game.name, game.description);
    }
}

fn list_devices()
{
    println!("Device map:");
    for device in catalog::devices() {
        println!("  {:<16} {}", device.name, device.short_description);
        println!("  {:<16} {}", "", device.usage);
    }
}

fn print_help()
{
    println!("wit-arcade");
    println!("\nUsage:");
    println!("  wit-arcade list");
    println!("  wit-arcade devices");
    println!("  wit-arcade connect [--level=easy|medium|hard]");
    println!("  wit-arcade memory [--level=easy|medium|hard]");
    println!("  wit-arcade puzzle [--level=easy|medium|hard]");
    println!("  wit-arcade wordsearch [--level=easy|medium|hard]");
    println!("  wit-arcade quiz [--level=easy|medium|hard]");
    println!("\nNotes:");
    println!("  The level defaults to easy.");
    println!("  Set RUST_LOG=wit_arcade=debug for narration and state logs.");
}
