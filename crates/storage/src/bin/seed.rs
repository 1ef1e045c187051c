use chrono::{DateTime, Utc};
use clap::Parser;
use course_core::model::{Chapter, Course, CourseId, Lesson, LessonContent, LessonKind};
use storage::repository::Storage;
use storage::sqlite::{normalize_sqlite_url, prepare_sqlite_file};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Upsert a sample course into a SQLite database.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// SQLite URL or file path; relative paths resolve against the working directory
    #[arg(long = "db", env = "COURSE_DB_URL", default_value = "dev.sqlite3")]
    db_url: String,

    /// Course id to upsert
    #[arg(long, env = "COURSE_ID", default_value = "rust-101")]
    course_id: CourseId,

    #[arg(long, env = "COURSE_TITLE", default_value = "Rust from Zero")]
    title: String,

    #[arg(long, env = "COURSE_INSTRUCTOR", default_value = "Ferris")]
    instructor: String,

    /// Number of chapters
    #[arg(long, default_value_t = 3)]
    chapters: usize,

    /// Lessons per chapter
    #[arg(long, default_value_t = 3)]
    lessons: usize,

    /// How many lessons, in course order, are already completed
    #[arg(long, default_value_t = 2)]
    completed: usize,

    /// Fixed current time (RFC 3339) for deterministic seeding
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

const KINDS: [LessonKind; 3] = [LessonKind::Video, LessonKind::Reading, LessonKind::Assignment];

fn build_course(args: &Args, now: DateTime<Utc>) -> Result<Course, Box<dyn std::error::Error>> {
    let mut position = 0_usize;
    let mut chapters = Vec::with_capacity(args.chapters);
    for c in 0..args.chapters {
        let mut lessons = Vec::with_capacity(args.lessons);
        for l in 0..args.lessons {
            let kind = KINDS[position % KINDS.len()];
            let content = match kind {
                LessonKind::Video => {
                    format!("https://videos.example.com/{}/{c}-{l}.mp4", args.course_id)
                }
                _ => format!("Work through section {}.{} of the notes.", c + 1, l + 1),
            };
            let lesson = Lesson::new(format!("Lesson {}.{}", c + 1, l + 1), kind, "10 min")?
                .with_completed(position < args.completed)
                .with_content(LessonContent::parse(&content))
                .with_resources(Some(u32::try_from(l % 3)?));
            lessons.push(lesson);
            position += 1;
        }
        let minutes = args.lessons * 10;
        chapters.push(Chapter::new(
            format!("Chapter {}", c + 1),
            format!("{minutes} min"),
            lessons,
        )?);
    }

    Ok(Course::new(
        args.course_id.clone(),
        args.title.clone(),
        args.instructor.clone(),
        chapters,
        now,
    )?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let now = args.now.unwrap_or_else(Utc::now);

    let db_url = normalize_sqlite_url(&args.db_url);
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    let course = build_course(&args, now)?;
    storage.courses.upsert_course(&course).await?;

    info!(
        course_id = %course.id(),
        chapters = course.chapter_count(),
        lessons = course.total_lessons(),
        "seeded course"
    );
    println!(
        "Seeded course {} ({} chapters, {} lessons, {} completed) into {}",
        course.id(),
        course.chapter_count(),
        course.total_lessons(),
        course.completed_lessons(),
        db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
