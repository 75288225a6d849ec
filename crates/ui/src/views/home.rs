use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, map_quiz_cards};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let quizzes = ctx.quiz_service();
    let mut status = use_signal(|| None::<String>);

    let mut resource = use_resource({
        let quizzes = quizzes.clone();
        move || {
            let quizzes = quizzes.clone();
            async move {
                let items = quizzes.list().await.map_err(ViewError::from)?;
                Ok::<_, ViewError>(map_quiz_cards(&items))
            }
        }
    });

    let state = view_state_from_resource(resource);

    let on_delete = use_callback(move |card: QuizCardVm| {
        let quizzes = quizzes.clone();
        spawn(async move {
            match quizzes.delete(card.id).await {
                Ok(_) => status.set(Some(format!("Deleted \"{}\".", card.title))),
                Err(err) => {
                    log::warn!("delete failed: {err}");
                    status.set(Some("Could not delete the quiz.".to_string()));
                }
            }
            resource.restart();
        });
    });

    rsx! {
        div { class: "page",
            div { class: "page-header",
                h2 { "My quizzes" }
                Link { class: "button primary", to: Route::EditorNew {}, "New quiz" }
            }

            if let Some(message) = status() {
                p { class: "status", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "empty", "No quizzes yet. Create your first quiz!" }
                    } else {
                        ul { class: "quiz-list",
                            for card in cards {
                                QuizCard { key: "{card.id}", card, on_delete }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn QuizCard(card: QuizCardVm, on_delete: Callback<QuizCardVm>) -> Element {
    let mut confirming = use_signal(|| false);
    let id = card.id;
    let to_delete = card.clone();

    rsx! {
        li { class: "quiz-card",
            div { class: "quiz-card-header",
                h3 { "{card.title}" }
                p { class: "quiz-meta", "{card.meta}" }
                if let Some(description) = card.description.clone() {
                    p { class: "quiz-description", "{description}" }
                }
            }
            div { class: "quiz-card-actions",
                Link { class: "button", to: Route::EditorEdit { id }, "Edit" }
                Link { class: "button primary", to: Route::Play { id }, "Play" }
                if confirming() {
                    span { class: "confirm", "Delete permanently?" }
                    button {
                        class: "danger",
                        onclick: move |_| {
                            confirming.set(false);
                            on_delete.call(to_delete.clone());
                        },
                        "Delete"
                    }
                    button { onclick: move |_| confirming.set(false), "Cancel" }
                } else {
                    button { onclick: move |_| confirming.set(true), "Delete" }
                }
            }
        }
    }
}
