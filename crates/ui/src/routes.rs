use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};
use quiz_core::model::QuizId;

use crate::views::{EditQuizView, HomeView, NewQuizView, PlayerView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/editor", NewQuizView)] EditorNew {},
        #[route("/editor/:id", EditQuizView)] EditorEdit { id: QuizId },
        #[route("/play/:id", PlayerView)] Play { id: QuizId },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            TopBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    rsx! {
        nav { class: "topbar",
            h1 { "Quiz Maker" }
            ul {
                li { Link { to: Route::Home {}, "My quizzes" } }
                li { Link { to: Route::EditorNew {}, "New quiz" } }
            }
        }
    }
}
