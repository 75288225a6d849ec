use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{QuizDraft, QuizId};
use quiz_core::parser::parse_quiz_text;
use quiz_core::time::fixed_clock;
use services::{AppServices, ExportService, QuizService};

use crate::context::{UiApp, build_app_context};
use crate::views::editor::EditorTestHandles;
use crate::views::{EditQuizView, HomeView, NewQuizView, PlayerView};

#[derive(Clone)]
struct TestApp {
    quizzes: Arc<QuizService>,
    export: Arc<ExportService>,
}

impl UiApp for TestApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    fn export_service(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    EditorNew,
    EditorEdit(QuizId),
    Play(QuizId),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    editor_handles: Option<EditorTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.editor_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::EditorNew => rsx! { NewQuizView {} },
        ViewKind::EditorEdit(id) => rsx! { EditQuizView { id } },
        ViewKind::Play(id) => rsx! { PlayerView { id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub quizzes: Arc<QuizService>,
    pub editor_handles: Option<EditorTestHandles>,
}

impl ViewHarness {
    pub fn new(view: ViewKind, services: &AppServices) -> Self {
        let app = Arc::new(TestApp {
            quizzes: services.quizzes(),
            export: services.export(),
        });
        let editor_handles = match view {
            ViewKind::EditorNew | ViewKind::EditorEdit(_) => Some(EditorTestHandles::default()),
            _ => None,
        };
        let dom = VirtualDom::new_with_props(
            ViewRouterHarness,
            ViewHarnessProps {
                app,
                view,
                editor_handles: editor_handles.clone(),
            },
        );
        Self {
            dom,
            quizzes: services.quizzes(),
            editor_handles,
        }
    }

    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    /// Press the editor's Preview button.
    pub async fn preview(&mut self) {
        let handles = self.editor_handles.clone().expect("editor view");
        self.dom.in_runtime(|| handles.preview().call(()));
        drive_dom(&mut self.dom);
        self.drive_async().await;
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn in_memory_services() -> AppServices {
    AppServices::in_memory(fixed_clock())
}

pub async fn seed_quiz(services: &AppServices, title: &str, text: &str) -> QuizId {
    let draft = QuizDraft::new(title, parse_quiz_text(text).questions);
    services
        .quizzes()
        .save(draft)
        .await
        .expect("save quiz")
        .id()
}
