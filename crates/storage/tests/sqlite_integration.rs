use quiz_core::model::{PlaybackSettings, Quiz, QuizDraft};
use quiz_core::parser::parse_quiz_text;
use quiz_core::time::fixed_now;
use storage::repository::QuizStore;
use storage::sqlite::{QUIZ_COLLECTION_KEY, SqliteRepository};

fn build_quiz(title: &str, text: &str) -> Quiz {
    let mut draft = QuizDraft::new(title, parse_quiz_text(text).questions);
    draft.description = Some("integration".into());
    draft.settings = Some(
        PlaybackSettings::default()
            .with_timer_seconds(15)
            .with_shuffle_options(true),
    );
    draft.build(fixed_now()).unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_persists_quiz_and_settings() {
    let repo = connect("memdb_quiz_roundtrip").await;
    assert!(repo.load_all().await.unwrap().is_empty());

    let quiz = build_quiz(
        "Animals",
        "Cat||Meow||Bark||Moo||Oink||1\nDog||Meow||Bark||Moo||Oink||2",
    );
    repo.upsert(&quiz).await.unwrap();

    let loaded = repo.load_all().await.expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], quiz);
    assert_eq!(loaded[0].settings().timer_seconds(), 15);
    assert!(loaded[0].settings().shuffle_options());
}

#[tokio::test]
async fn sqlite_upsert_replaces_and_remove_deletes() {
    let repo = connect("memdb_quiz_upsert").await;

    let first = build_quiz("First quiz", "Q1||a||b||c||d||1");
    let second = build_quiz("Second quiz", "Q2||a||b||c||d||2");
    repo.upsert(&first).await.unwrap();
    repo.upsert(&second).await.unwrap();

    let mut draft = first.to_draft();
    draft.questions = parse_quiz_text("Q1||a||b||c||d||4").questions;
    let edited = draft.build(fixed_now()).unwrap();
    repo.upsert(&edited).await.unwrap();

    let all = repo.load_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id(), second.id());
    assert_eq!(all[1].id(), first.id());
    assert_eq!(all[1].questions()[0].correct_index(), 3);

    let remaining = repo.remove(second.id()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(repo.get(second.id()).await.unwrap(), None);
    assert!(repo.get(first.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = connect("memdb_quiz_migrate").await;
    repo.migrate().await.expect("second migrate");

    let quiz = build_quiz("Stays put", "Q||a||b||c||d||1");
    repo.save_all(std::slice::from_ref(&quiz)).await.unwrap();
    repo.migrate().await.expect("third migrate");
    assert_eq!(repo.load_all().await.unwrap(), vec![quiz]);
}

#[tokio::test]
async fn sqlite_skips_corrupted_entries_in_stored_collection() {
    let repo = connect("memdb_quiz_corrupt").await;
    let payload = r#"[
        {"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "title": "Kept",
         "questions": [{"text": "Q", "options": ["a","b","c","d"], "correctIndex": 0}],
         "createdAt": "2023-11-14T22:13:20Z"},
        {"id": "67e55044-10b1-426f-9247-bb680e5fe0c9", "title": "x",
         "questions": [], "createdAt": "2023-11-14T22:13:20Z"}
    ]"#;
    sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)")
        .bind(QUIZ_COLLECTION_KEY)
        .bind(payload)
        .bind(fixed_now())
        .execute(repo.pool())
        .await
        .unwrap();

    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title(), "Kept");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sqlite_concurrent_upserts_all_land() {
    let path = std::env::temp_dir().join(format!(
        "quiz-maker-concurrent-{}.sqlite3",
        std::process::id()
    ));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    let repo = std::sync::Arc::new(repo);

    let mut tasks = Vec::new();
    for n in 0..8 {
        let repo = std::sync::Arc::clone(&repo);
        tasks.push(tokio::spawn(async move {
            let quiz = build_quiz(&format!("Quiz {n}"), "Cat||Meow||Bark||Moo||Oink||1");
            repo.upsert(&quiz).await
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("upsert");
    }

    let stored = repo.load_all().await.expect("load");
    assert_eq!(stored.len(), 8);

    repo.pool().close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
