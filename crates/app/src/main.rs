use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use course_core::Layout;
use course_core::model::CourseId;
use services::{
    AppServices, Clock, CourseProvider, CoursePlayer, HttpCourseProvider, HttpProviderConfig,
    PlayerSnapshot, PlayerView,
};
use storage::sqlite::{normalize_sqlite_url, prepare_sqlite_file};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};

#[derive(Debug)]
enum ArgsError {
    MissingProviderUrl,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingProviderUrl => {
                write!(f, "--remote requires --provider-url or COURSE_PROVIDER_URL")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// Browse and walk courses stored locally or served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "course-player", version)]
struct Cli {
    /// SQLite URL or file path; relative paths resolve against the working directory
    #[arg(long = "db", env = "COURSE_DB_URL", default_value = "dev.sqlite3")]
    db_url: String,

    /// Base URL of the remote course document service
    #[arg(long, env = "COURSE_PROVIDER_URL")]
    provider_url: Option<String>,

    /// Request timeout for the remote provider, in seconds
    #[arg(long, env = "COURSE_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, env = "COURSE_LAYOUT", value_enum, default_value_t = LayoutArg::Wide)]
    layout: LayoutArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Compact,
    Wide,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Compact => Layout::Compact,
            LayoutArg::Wide => Layout::Wide,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored courses with their progress
    Catalog {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Print the chapter and lesson outline of one course
    Outline {
        course_id: CourseId,
        /// Fetch from the remote provider instead of the local database
        #[arg(long)]
        remote: bool,
    },
    /// Step through every lesson in order
    Walk {
        course_id: CourseId,
        #[arg(long)]
        remote: bool,
    },
    /// Mark a lesson completed, or record partial progress
    Complete {
        course_id: CourseId,
        chapter: usize,
        lesson: usize,
        /// Record this percentage instead of completing the lesson
        #[arg(long)]
        progress: Option<i64>,
    },
}

fn pick_provider(
    cli: &Cli,
    services: &AppServices,
    remote: bool,
) -> Result<Arc<dyn CourseProvider>, Box<dyn std::error::Error>> {
    if !remote {
        return Ok(services.provider());
    }
    let base = cli
        .provider_url
        .clone()
        .ok_or(ArgsError::MissingProviderUrl)?;
    let config =
        HttpProviderConfig::new(base).with_timeout(Duration::from_secs(cli.timeout_secs));
    Ok(Arc::new(HttpCourseProvider::new(config)?))
}

async fn open_course(
    player: &mut CoursePlayer,
    provider: &dyn CourseProvider,
    id: CourseId,
) -> Result<PlayerView, Box<dyn std::error::Error>> {
    player.open(provider, id).await;
    match player.snapshot() {
        PlayerSnapshot::Ready(view) => Ok(*view),
        PlayerSnapshot::Failed { message, detail, .. } => {
            Err(format!("{message} ({detail})").into())
        }
        PlayerSnapshot::Idle | PlayerSnapshot::Loading { .. } => {
            Err("course load did not complete".into())
        }
    }
}

fn print_outline(view: &PlayerView) {
    println!("{} ({})", view.title, view.course_id);
    if !view.instructor.is_empty() {
        println!("by {}", view.instructor);
    }
    println!(
        "progress: {}/{} lessons, {}%",
        view.progress.completed, view.progress.total, view.progress.percent
    );
    for chapter in &view.chapters {
        let status = if chapter.progress.is_complete() {
            "done".to_string()
        } else {
            format!("{}%", chapter.progress.percent)
        };
        println!(
            "{} {}. {} [{status}]",
            if chapter.expanded { "v" } else { ">" },
            chapter.index + 1,
            chapter.title,
        );
        if !chapter.expanded {
            continue;
        }
        for lesson in &chapter.lessons {
            println!(
                "    {} {}.{} {} ({}, {})",
                if lesson.completed { "x" } else { " " },
                chapter.index + 1,
                lesson.index + 1,
                lesson.title,
                lesson.kind,
                lesson.duration
            );
        }
    }
}

fn print_step(view: &PlayerView) {
    let cursor = view.navigation.cursor;
    match &view.current {
        Some(lesson) => println!(
            "[{},{}] {} ({}){}",
            cursor.chapter,
            cursor.lesson,
            lesson.title,
            lesson.kind,
            if lesson.completed { " done" } else { "" }
        ),
        None => println!("[{},{}] (empty chapter)", cursor.chapter, cursor.lesson),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let db_url = normalize_sqlite_url(&cli.db_url);
    debug!(%db_url, "opening course database");

    // Open + migrate SQLite at startup.
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::default_clock()).await?;
    let mut player = CoursePlayer::new(cli.layout.into());

    match &cli.command {
        Command::Catalog { limit } => {
            let items = services.catalog().list(*limit).await?;
            if items.is_empty() {
                println!("no courses");
            }
            for item in items {
                println!(
                    "{:<20} {:>3}%  {} chapters, {} lessons  {} ({})",
                    item.id.as_str(),
                    item.progress.percent,
                    item.chapter_count,
                    item.lesson_count,
                    item.title,
                    item.instructor
                );
            }
        }
        Command::Outline { course_id, remote } => {
            let provider = pick_provider(&cli, &services, *remote)?;
            let view = open_course(&mut player, provider.as_ref(), course_id.clone()).await?;
            print_outline(&view);
        }
        Command::Walk { course_id, remote } => {
            let provider = pick_provider(&cli, &services, *remote)?;
            let mut view = open_course(&mut player, provider.as_ref(), course_id.clone()).await?;
            let Some(session) = player.session_mut() else {
                return Err("course load did not complete".into());
            };
            print_step(&view);
            while view.navigation.availability.has_next_lesson {
                view = session.next_lesson();
                print_step(&view);
            }
        }
        Command::Complete {
            course_id,
            chapter,
            lesson,
            progress,
        } => {
            let completion = services.completion();
            match progress {
                Some(percent) => {
                    completion
                        .record_progress(course_id, *chapter, *lesson, *percent)
                        .await?;
                }
                None => {
                    completion
                        .mark_completed(course_id, *chapter, *lesson)
                        .await?;
                }
            }
            let provider = services.provider();
            let view = open_course(&mut player, provider.as_ref(), course_id.clone()).await?;
            println!(
                "{}: {}/{} lessons, {}%",
                view.course_id, view.progress.completed, view.progress.total, view.progress.percent
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    log_fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
