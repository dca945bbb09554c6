mod config;
mod input;
mod logging;
mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::model::{Catalog, QuizConfiguration, Region, RegionFilter};
use services::{QuizError, QuizLoopService, QuizRunner};
use storage::{
    BundledCatalog, CatalogSource, InMemoryPreferenceStore, JsonCatalog, PREF_CHOICES,
    PREF_REGIONS, PreferenceStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use config::AppConfig;
use input::{HELP, Input};
use terminal::TerminalPresenter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAdvance { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAdvance { raw } => write!(f, "invalid --advance-ms value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  flag-quiz [play]  [options]");
    eprintln!("  flag-quiz catalog [--catalog <path>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalog <path>     JSON country catalog (default: bundled)");
    eprintln!("  --assets <dir>       directory flag images are resolved against");
    eprintln!("  --region <region>    All, Africa, Asia, Europe, North_America, Oceania, South_America");
    eprintln!("  --choices <n>        answer buttons per question, 2-8 (default: 4)");
    eprintln!("  --advance-ms <ms>    pause after a correct answer (default: 2000)");
    eprintln!("  --seed <n>           deterministic question order");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLAG_QUIZ_CATALOG, FLAG_QUIZ_ASSETS, FLAG_QUIZ_REGION, FLAG_QUIZ_CHOICES,");
    eprintln!("  FLAG_QUIZ_ADVANCE_MS, FLAG_QUIZ_SEED, FLAG_QUIZ_LOG (or RUST_LOG)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Catalog,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "catalog" => Some(Self::Catalog),
            _ => None,
        }
    }
}

/// Apply command-line flags on top of the environment-derived config.
fn parse_args(
    args: &mut impl Iterator<Item = String>,
    mut config: AppConfig,
) -> Result<AppConfig, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => config.catalog = Some(PathBuf::from(require_value(args, "--catalog")?)),
            "--assets" => config.assets_dir = Some(PathBuf::from(require_value(args, "--assets")?)),
            "--region" => config.region = Some(require_value(args, "--region")?),
            "--choices" => config.choices = Some(require_value(args, "--choices")?),
            "--advance-ms" => {
                let value = require_value(args, "--advance-ms")?;
                let millis: u64 = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidAdvance { raw: value.clone() })?;
                config.advance_delay = Duration::from_millis(millis);
            }
            "--seed" => {
                let value = require_value(args, "--seed")?;
                let seed: u64 = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                config.seed = Some(seed);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(config)
}

async fn load_catalog(config: &AppConfig) -> Result<Catalog, Box<dyn std::error::Error>> {
    let source: Box<dyn CatalogSource> = match &config.catalog {
        Some(path) => Box::new(JsonCatalog::new(path)),
        None => Box::new(BundledCatalog),
    };
    Ok(source.load_catalog().await?)
}

fn print_catalog(catalog: &Catalog) {
    println!("{} countries", catalog.len());
    for region in Region::ALL {
        let count = catalog.eligible(&RegionFilter::Only(region)).len();
        println!("  {:<14} {count}", region.as_str());
    }
}

async fn play(config: AppConfig, catalog: Catalog) -> Result<(), Box<dyn std::error::Error>> {
    let mut quiz = QuizLoopService::new(catalog, QuizConfiguration::default());
    if let Some(seed) = config.seed {
        quiz = quiz.with_seed(seed);
    }
    let mut runner = QuizRunner::new(quiz, config.advance_delay);
    let mut presenter = TerminalPresenter::new(std::io::stdout(), config.assets_dir.clone());

    let prefs = InMemoryPreferenceStore::new();
    if let Some(region) = config.region {
        prefs.set(PREF_REGIONS, region);
    }
    if let Some(choices) = config.choices {
        prefs.set(PREF_CHOICES, choices);
    }
    // First application starts the first round; invalid startup settings are fatal.
    runner.apply_preferences(&prefs, &mut presenter)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if !handle_input(&line, &mut runner, &prefs, &mut presenter) {
                    return Ok(());
                }
            }
            Some(ticket) = runner.next_advance() => {
                runner.advance(ticket, &mut presenter)?;
            }
        }
    }
}

/// Returns false when the player asked to quit.
fn handle_input(
    line: &str,
    runner: &mut QuizRunner,
    prefs: &InMemoryPreferenceStore,
    presenter: &mut TerminalPresenter<std::io::Stdout>,
) -> bool {
    let result = match Input::parse(line) {
        Input::Quit => return false,
        Input::Help => {
            presenter.line(HELP);
            Ok(())
        }
        Input::Empty if runner.quiz().session().is_complete() => {
            runner.restart(presenter).map(|_| ())
        }
        Input::Empty => Ok(()),
        Input::Reset => runner.restart(presenter).map(|_| ()),
        Input::Region(region) => change_preference(runner, prefs, presenter, PREF_REGIONS, region),
        Input::Choices(choices) => {
            change_preference(runner, prefs, presenter, PREF_CHOICES, choices)
        }
        Input::Slot(slot) => match runner.quiz().slots().get(slot.wrapping_sub(1)) {
            Some(choice) if choice.enabled => {
                let name = choice.name.clone();
                runner.guess(&name, presenter).map(|_| ())
            }
            Some(_) => {
                presenter.line("That choice is already ruled out.");
                Ok(())
            }
            None => {
                presenter.line("No such choice.");
                Ok(())
            }
        },
        Input::Name(name) => runner.guess(&name, presenter).map(|_| ()),
        Input::Unknown(raw) => {
            presenter.line(&format!("Unknown command: {raw} (try :help)"));
            Ok(())
        }
    };

    match result {
        Ok(()) => {}
        Err(QuizError::NoQuestionLoaded) => presenter.line("Hang on, the next flag is coming."),
        Err(QuizError::Completed) => presenter.line("Round over. Press Enter to play again."),
        Err(QuizError::NotAChoice { name }) => {
            presenter.line(&format!("{name} is not one of the remaining choices."));
        }
        Err(err) => presenter.line(&format!("{err}")),
    }
    true
}

/// Store a raw preference and apply it; a rejected value is rolled back.
fn change_preference(
    runner: &mut QuizRunner,
    prefs: &InMemoryPreferenceStore,
    presenter: &mut TerminalPresenter<std::io::Stdout>,
    key: &str,
    value: String,
) -> Result<(), QuizError> {
    let previous = prefs.get(key);
    prefs.set(key, value);
    match runner.apply_preferences(prefs, presenter) {
        Ok(_) => Ok(()),
        Err(err) => {
            match previous {
                Some(previous) => prefs.set(key, previous),
                None => prefs.set(key, String::new()),
            }
            Err(err)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let config = parse_args(&mut argv.into_iter(), AppConfig::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    logging::init(&config.log_filter);

    let catalog = load_catalog(&config).await?;
    tracing::info!(countries = catalog.len(), ?cmd, "catalog loaded");
    match cmd {
        Command::Catalog => {
            print_catalog(&catalog);
            Ok(())
        }
        Command::Play => play(config, catalog).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
