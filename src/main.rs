mod debug_report;

use colloquy::{Brain, Engine, outline};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_BRAIN: &str = include_str!("../demos/basic.json");
const LOG_ENV: &str = "COLLOQUY_LOG";

fn main() {
    init_tracing();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let engine = match load_engine(config.brain.as_ref()) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&engine, &config) {
        eprintln!("error: failed to read stdin: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Default)]
struct CliConfig {
    input: Option<String>,
    brain: Option<PathBuf>,
    user: Option<String>,
    color: bool,
    verbose: bool,
    dump_graph: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_engine(brain: Option<&PathBuf>) -> colloquy::Result<Engine> {
    let brain = match brain {
        Some(path) => Brain::load(path)?,
        None => Brain::from_json(DEFAULT_BRAIN)?,
    };
    brain.into_engine()
}

fn run(engine: &Engine, config: &CliConfig) -> io::Result<()> {
    if config.dump_graph {
        print!("{}", outline(engine.graph(), usize::MAX));
        return Ok(());
    }

    match config.input.as_deref() {
        Some(input) => respond(engine, config, input),
        None => {
            for line in io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                respond(engine, config, &line);
            }
        }
    }
    Ok(())
}

fn respond(engine: &Engine, config: &CliConfig, input: &str) {
    let out = match &config.user {
        Some(user) => engine.handle_user_statement_as(user, input),
        None => engine.handle_user_statement(input),
    };
    if config.verbose {
        debug_report::print_run(engine, &out, config.color);
    } else {
        println!("{}", out.text);
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut brain: Option<PathBuf> = None;
    let mut user: Option<String> = None;
    let mut color = io::stdout().is_terminal();
    let mut verbose = false;
    let mut dump_graph = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("colloquy {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-v" | "--verbose" => verbose = true,
            "--dump-graph" => dump_graph = true,
            "--brain" | "-b" => {
                let value = args.next().ok_or_else(|| "error: --brain expects a value".to_string())?;
                brain = Some(PathBuf::from(value));
            }
            "--user" | "-u" => {
                let value = args.next().ok_or_else(|| "error: --user expects a value".to_string())?;
                user = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--brain=") => {
                brain = Some(PathBuf::from(arg.trim_start_matches("--brain=")));
            }
            _ if arg.starts_with("--user=") => {
                user = Some(arg.trim_start_matches("--user=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    Ok(CliConfig { input, brain, user, color, verbose, dump_graph })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "colloquy {version}

Conversational pattern engine CLI.

Usage:
  colloquy [OPTIONS] [--] <statement...>
  colloquy [OPTIONS] --input <text>
  colloquy [OPTIONS] < statements.txt

Options:
  -i, --input <text>     Statement to answer. If omitted, reads remaining args,
                         or one statement per stdin line when no args are given.
  -b, --brain <file>     JSON brain file (options, substitutions, categories).
                         Default: built-in demo brain.
  -u, --user <name>      User recorded in the chat history.
  -v, --verbose          Print the per-sentence resolution report.
  --dump-graph           Print the knowledge graph outline and exit.
  --color                Force ANSI color output.
  --no-color             Disable ANSI color output.
  -h, --help             Show this help message.
  -V, --version          Print version information.

Environment:
  {log_env}           tracing filter, e.g. colloquy=debug (default: warn).

Exit codes:
  0  Success.
  1  Brain could not be loaded or stdin failed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn demo_engine() -> Engine {
        load_engine(None).unwrap()
    }

    #[test]
    fn positional_words_form_one_statement() {
        let config = parse_args(args(&["--no-color", "-u", "ada", "hello", "there"])).unwrap();
        assert_eq!(config.input.as_deref(), Some("hello there"));
        assert_eq!(config.user.as_deref(), Some("ada"));
        assert!(!config.color);
    }

    #[test]
    fn double_dash_keeps_option_like_words() {
        let config = parse_args(args(&["--", "-v", "means", "verbose"])).unwrap();
        assert_eq!(config.input.as_deref(), Some("-v means verbose"));
        assert!(!config.verbose);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        assert!(parse_args(args(&["--brain"])).is_err());
        assert!(parse_args(args(&["-i", "hi", "again"])).is_err());
    }

    #[test]
    fn run_answers_the_configured_input() {
        let engine = demo_engine();
        let config = CliConfig { input: Some("hi".to_string()), user: Some("cli".to_string()), ..CliConfig::default() };

        run(&engine, &config).unwrap();
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history().last().unwrap().user(), "cli");
        // The config is only borrowed, so it can answer again.
        run(&engine, &config).unwrap();
        assert_eq!(engine.history().len(), 4);
    }
}
