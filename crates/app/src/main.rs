use std::fmt;
use std::sync::Arc;

use lingo_core::model::{ProficiencyLevel, WordEntry};
use lingo_core::{CourseSettings, MarkOutcome};
use services::{CourseController, CourseServices, GeneratorConfig, RequestOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid level (--level / LINGO_LEVEL): {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

struct Args {
    db_url: String,
    level: ProficiencyLevel,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--level <B1|B2>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:lingo.sqlite3");
    eprintln!("  --level B2");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_DB_URL, LINGO_LEVEL");
    eprintln!("  LINGO_AI_API_KEY, LINGO_AI_BASE_URL, LINGO_AI_MODEL");
    eprintln!("  RUST_LOG (e.g. services=debug,storage=debug)");
}

fn print_commands() {
    println!("Commands:");
    println!("  fetch            get a new batch of words");
    println!("  learn <word>     mark a word from the batch as learned");
    println!("  batch            show the current batch");
    println!("  list             show learned words, newest first");
    println!("  status           show progress towards the goal");
    println!("  level <B1|B2>    switch proficiency level");
    println!("  help             show this help");
    println!("  quit             exit");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LINGO_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:lingo.sqlite3".into()), normalize_sqlite_url);
        let mut level = level_from_env(std::env::var("LINGO_LEVEL").ok())?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--level" => {
                    let value = require_value(args, "--level")?;
                    level = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, level })
    }
}

fn level_from_env(raw: Option<String>) -> Result<ProficiencyLevel, ArgsError> {
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .parse()
            .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() }),
        _ => Ok(ProficiencyLevel::default()),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Fetch,
    Learn(String),
    Batch,
    List,
    Status,
    Level(String),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim().to_string();
        Some(match head {
            "fetch" | "f" => Self::Fetch,
            "learn" | "l" => Self::Learn(rest),
            "batch" | "b" => Self::Batch,
            "list" => Self::List,
            "status" | "s" => Self::Status,
            "level" => Self::Level(rest),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

fn print_entry(index: usize, entry: &WordEntry) {
    println!("{:>2}. {}  {}", index + 1, entry.word(), entry.pronunciation());
    println!("    {}", entry.definition());
    for example in entry.examples() {
        println!("    \"{example}\"");
    }
}

fn print_batch(course: &CourseController) {
    let batch = course.batch();
    if batch.is_empty() {
        println!("Ready for more? Type `fetch` to get a new set of words.");
        return;
    }
    println!("New words to learn:");
    for (index, entry) in batch.iter().enumerate() {
        print_entry(index, entry);
    }
}

fn print_status(course: &CourseController, level: ProficiencyLevel) {
    let view = course.view();
    println!(
        "Progress: {} / {} words ({:.1}%) | level {} | {} in batch",
        view.learned_count,
        view.goal,
        view.percent_complete,
        level.label(),
        view.batch.len()
    );
    if let Some(error) = view.error {
        println!("Last error: {error}");
    }
}

async fn run_loop(
    course: Arc<CourseController>,
    mut level: ProficiencyLevel,
) -> Result<(), Box<dyn std::error::Error>> {
    print_status(&course, level);
    print_commands();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        match command {
            Command::Fetch => match course.request_batch(level).await {
                Ok(RequestOutcome::Applied { .. }) => print_batch(&course),
                Ok(RequestOutcome::AlreadyLoading) => println!("Already fetching words..."),
                Ok(RequestOutcome::Discarded) => {}
                Err(err) => println!("{err}. Type `fetch` to try again."),
            },
            Command::Learn(word) if word.is_empty() => println!("Usage: learn <word>"),
            Command::Learn(word) => {
                match course.mark_learned(&word).await {
                    MarkOutcome::Learned => println!("Learned \"{word}\"."),
                    MarkOutcome::AlreadyLearned => {
                        println!("\"{word}\" is already learned.");
                    }
                    MarkOutcome::NotInBatch => {
                        println!("\"{word}\" is not in the current batch.");
                    }
                }
                print_status(&course, level);
            }
            Command::Batch => print_batch(&course),
            Command::List => {
                let learned = course.learned_newest_first();
                println!("My learned vocabulary ({}):", learned.len());
                for entry in &learned {
                    println!("  {}: {}", entry.word(), entry.definition());
                }
            }
            Command::Status => print_status(&course, level),
            Command::Level(raw) => match raw.parse::<ProficiencyLevel>() {
                Ok(parsed) => {
                    level = parsed;
                    println!("Level set to {}.", level.label());
                }
                Err(err) => println!("{err}"),
            },
            Command::Help => print_commands(),
            Command::Quit => break,
            Command::Unknown(other) => println!("unknown command: {other} (type `help`)"),
        }
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let generator = GeneratorConfig::from_env();
    let services =
        CourseServices::new_sqlite(&parsed.db_url, CourseSettings::default(), generator).await?;
    if !services.generator_enabled() {
        tracing::warn!("LINGO_AI_API_KEY is not set; fetching new words will fail");
    }

    run_loop(services.course(), parsed.level).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_learn_with_multi_word_term() {
        assert_eq!(
            Command::parse("learn  ice cream "),
            Some(Command::Learn("ice cream".into()))
        );
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(Command::parse("dance"), Some(Command::Unknown("dance".into())));
    }

    #[test]
    fn args_parse_level_and_db() {
        let mut args = ["--db", "sqlite::memory:", "--level", "b1"]
            .into_iter()
            .map(String::from);
        let parsed = Args::parse(&mut args).unwrap();
        assert_eq!(parsed.db_url, "sqlite::memory:");
        assert_eq!(parsed.level, ProficiencyLevel::B1);
    }

    #[test]
    fn args_reject_unknown_level() {
        let mut args = ["--level", "C2"].into_iter().map(String::from);
        assert!(matches!(
            Args::parse(&mut args),
            Err(ArgsError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn env_level_is_validated_like_the_flag() {
        assert_eq!(level_from_env(None).unwrap(), ProficiencyLevel::B2);
        assert_eq!(level_from_env(Some("  ".into())).unwrap(), ProficiencyLevel::B2);
        assert_eq!(level_from_env(Some("b1".into())).unwrap(), ProficiencyLevel::B1);
        assert!(matches!(
            level_from_env(Some("C2".into())),
            Err(ArgsError::InvalidLevel { raw }) if raw == "C2"
        ));
    }

    #[test]
    fn relative_sqlite_path_becomes_absolute() {
        let url = normalize_sqlite_url("sqlite:data/lingo.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/lingo.sqlite3"));
    }
}
