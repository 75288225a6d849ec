use quiz_core::model::QuizId;

use super::test_harness::{ViewHarness, ViewKind, in_memory_services, seed_quiz};

const PLANETS: &str = "Largest planet?||Mars||Jupiter||Venus||Earth||2\n\
                       Red planet?||Mars||Jupiter||Venus||Earth||1";

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_empty_state() {
    let services = in_memory_services();
    let mut harness = ViewHarness::new(ViewKind::Home, &services);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No quizzes yet"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_saved_quiz() {
    let services = in_memory_services();
    seed_quiz(&services, "Planets", PLANETS).await;

    let mut harness = ViewHarness::new(ViewKind::Home, &services);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Planets"), "missing title in {html}");
    assert!(html.contains("2 questions"), "missing meta in {html}");
    assert!(html.contains("Play"), "missing play link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn new_editor_smoke_shows_empty_status() {
    let services = in_memory_services();
    let mut harness = ViewHarness::new(ViewKind::EditorNew, &services);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("New quiz"), "missing heading in {html}");
    assert!(html.contains("No questions entered yet."), "missing status in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn edit_view_smoke_prefills_form() {
    let services = in_memory_services();
    let id = seed_quiz(&services, "Planets", PLANETS).await;

    let mut harness = ViewHarness::new(ViewKind::EditorEdit(id), &services);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Edit quiz"), "missing heading in {html}");
    assert!(html.contains("Largest planet?"), "missing question text in {html}");
    assert!(html.contains("Parsed 2 of 2 lines"), "missing parse status in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn edit_view_smoke_previews_without_saving() {
    let services = in_memory_services();
    let id = seed_quiz(&services, "Planets", PLANETS).await;

    let mut harness = ViewHarness::new(ViewKind::EditorEdit(id), &services);
    harness.settle().await;
    harness.preview().await;
    let html = harness.render();
    assert!(html.contains("Preview (not saved)"), "missing banner in {html}");
    assert!(html.contains("Start Quiz"), "missing player menu in {html}");
    assert!(html.contains("2 questions"), "missing question count in {html}");

    let saved = harness.quizzes.list().await.expect("list");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id(), id);
}

#[tokio::test(flavor = "current_thread")]
async fn new_editor_smoke_preview_reports_validation() {
    let services = in_memory_services();
    let mut harness = ViewHarness::new(ViewKind::EditorNew, &services);
    harness.settle().await;
    harness.preview().await;
    let html = harness.render();
    assert!(!html.contains("Start Quiz"), "unexpected player in {html}");
    assert!(
        html.contains("title must be at least 3 characters"),
        "missing validation in {html}"
    );
    assert!(harness.quizzes.list().await.expect("list").is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn player_view_smoke_shows_menu() {
    let services = in_memory_services();
    let id = seed_quiz(&services, "Planets", PLANETS).await;

    let mut harness = ViewHarness::new(ViewKind::Play(id), &services);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Planets"), "missing title in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_view_smoke_reports_missing_quiz() {
    let services = in_memory_services();
    let mut harness = ViewHarness::new(ViewKind::Play(QuizId::generate()), &services);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("That quiz no longer exists."),
        "missing error in {html}"
    );
}
