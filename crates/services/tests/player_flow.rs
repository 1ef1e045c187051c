use chrono::Duration;
use course_core::model::{Chapter, Course, CourseId, Lesson, LessonKind};
use course_core::time::fixed_now;
use course_core::{Cursor, Layout};
use services::{AppServices, Clock, CoursePlayer, LoadOutcome, PlayerSnapshot};
use storage::repository::Storage;

fn course(id: &str) -> Course {
    let chapter = |title: &str, done: &[bool]| {
        let lessons = done
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Lesson::new(format!("{title} {i}"), LessonKind::Video, "5 min")
                    .unwrap()
                    .with_completed(*d)
            })
            .collect();
        Chapter::new(title, "15 min", lessons).unwrap()
    };
    Course::new(
        CourseId::new(id).unwrap(),
        "Rust from Zero",
        "Ferris",
        vec![
            chapter("Basics", &[true, false, false]),
            chapter("Ownership", &[false, false]),
            chapter("Traits", &[false]),
        ],
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test]
async fn walk_course_then_complete_and_reopen() {
    let storage = Storage::sqlite("sqlite:file:memdb_player_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    storage.courses.upsert_course(&course("rust-101")).await.unwrap();

    let clock = Clock::fixed(fixed_now() + Duration::hours(2));
    let services = AppServices::from_storage(&storage, clock);
    let provider = services.provider();
    let id = CourseId::new("rust-101").unwrap();

    let mut player = CoursePlayer::new(Layout::Wide);
    assert_eq!(player.open(provider.as_ref(), id.clone()).await, LoadOutcome::Ready);

    let session = player.session_mut().unwrap();
    assert_eq!(session.progress().percent, 17);
    session.next_lesson();
    session.next_lesson();
    let view = session.next_lesson();
    assert_eq!(view.navigation.cursor, Cursor::new(1, 0));
    assert_eq!(view.current.as_ref().map(|l| l.title.as_str()), Some("Ownership 0"));
    assert!(view.navigation.expanded.contains(0));
    assert!(view.navigation.expanded.contains(1));

    let completed = services.completion().mark_completed(&id, 1, 0).await.unwrap();
    assert_eq!(completed.updated_at(), fixed_now() + Duration::hours(2));
    // The live session is untouched until the course is opened again.
    assert_eq!(player.session().unwrap().progress().completed, 1);

    assert_eq!(player.open(provider.as_ref(), id.clone()).await, LoadOutcome::Ready);
    let session = player.session().unwrap();
    assert_eq!(session.progress().completed, 2);
    assert_eq!(session.progress().percent, 33);
    assert_eq!(session.cursor(), Cursor::default());

    let items = services.catalog().list(10).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].progress.percent, 33);
}

#[tokio::test]
async fn missing_course_fails_until_retried() {
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    let provider = services.provider();
    let mut player = CoursePlayer::new(Layout::Compact);

    let outcome = player
        .open(provider.as_ref(), CourseId::new("X").unwrap())
        .await;
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(player.cursor(), Cursor::new(0, 0));
    assert!(matches!(player.snapshot(), PlayerSnapshot::Failed { .. }));

    storage.courses.upsert_course(&course("X")).await.unwrap();
    assert_eq!(
        player.retry(provider.as_ref()).await,
        Some(LoadOutcome::Ready)
    );
    match player.snapshot() {
        PlayerSnapshot::Ready(view) => {
            assert_eq!(view.title, "Rust from Zero");
            assert_eq!(view.chapters.len(), 3);
            assert!(!view.navigation.sidebar_open);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}
