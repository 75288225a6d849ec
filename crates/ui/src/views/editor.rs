#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{Quiz, QuizId};
use services::quiz_service::build_draft;
use services::{EditorForm, ExportOptions};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::player::PlayerScreen;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{editor_feedback, export_file_name, parse_timer_input};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Saved,
    Failed(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AfterSave {
    Stay,
    Play,
}

#[component]
pub fn NewQuizView() -> Element {
    rsx! {
        QuizEditor { initial: EditorForm::default() }
    }
}

#[component]
pub fn EditQuizView(id: QuizId) -> Element {
    let ctx = use_context::<AppContext>();
    let quizzes = ctx.quiz_service();

    let resource = use_resource(use_reactive((&id,), move |(id,)| {
        let quizzes = quizzes.clone();
        async move {
            let quiz = quizzes.get(id).await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(EditorForm::from_quiz(&quiz))
        }
    }));

    match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "page", p { "Loading..." } }
        },
        ViewState::Ready(form) => rsx! {
            QuizEditor { key: "{id}", initial: form }
        },
        ViewState::Error(err) => rsx! {
            div { class: "page", p { "{err.message()}" } }
        },
    }
}

#[component]
fn QuizEditor(initial: EditorForm) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quizzes = ctx.quiz_service();
    let previewer = ctx.quiz_service();
    let export = ctx.export_service();

    let editing_id = use_signal(|| initial.id);
    let mut title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut questions_text = use_signal(|| initial.questions_text.clone());
    let mut timer_raw = use_signal(|| initial.settings.timer_seconds().to_string());
    let mut settings = use_signal(|| initial.settings);
    let mut save_state = use_signal(|| SaveState::Idle);
    let mut export_status = use_signal(|| None::<String>);
    let mut preview = use_signal(|| None::<Quiz>);

    let current_form = move || EditorForm {
        id: editing_id(),
        title: title(),
        description: description(),
        questions_text: questions_text(),
        settings: settings().with_timer_seconds(parse_timer_input(&timer_raw.read())),
    };

    let form = current_form();
    let feedback = editor_feedback(&form);
    let is_saving = save_state() == SaveState::Saving;

    let save = use_callback(move |after: AfterSave| {
        let quizzes = quizzes.clone();
        let form = current_form();
        let mut editing_id = editing_id;
        save_state.set(SaveState::Saving);
        spawn(async move {
            let result = match quizzes.draft_from_editor(&form).await {
                Ok((draft, _report)) => quizzes.save(draft).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(quiz) => {
                    let id = quiz.id();
                    let was_new = editing_id().is_none();
                    editing_id.set(Some(id));
                    save_state.set(SaveState::Saved);
                    match after {
                        AfterSave::Play => {
                            navigator.push(Route::Play { id });
                        }
                        AfterSave::Stay if was_new => {
                            navigator.replace(Route::EditorEdit { id });
                        }
                        AfterSave::Stay => {}
                    }
                }
                Err(err) => save_state.set(SaveState::Failed(err.messages())),
            }
        });
    });

    let on_preview = use_callback(move |()| match previewer.preview(&current_form()) {
        Ok(quiz) => preview.set(Some(quiz)),
        Err(err) => save_state.set(SaveState::Failed(err.messages())),
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<EditorTestHandles>() {
                handles.register(on_preview);
            }
        }
    }

    let on_export = use_callback(move |()| {
        let export = export.clone();
        let form = current_form();
        spawn(async move {
            let (draft, _) = build_draft(&form, None);
            let path = std::path::PathBuf::from(export_file_name(&form.title));
            let message = match export.export_draft_html(draft, &ExportOptions::default()) {
                Ok(html) => match tokio::fs::write(&path, html).await {
                    Ok(()) => format!("Exported to {}", path.display()),
                    Err(err) => {
                        log::warn!("export write failed: {err}");
                        format!("Could not write {}", path.display())
                    }
                },
                Err(err) => format!("Cannot export: {err}"),
            };
            export_status.set(Some(message));
        });
    });

    let heading = if editing_id().is_some() {
        "Edit quiz"
    } else {
        "New quiz"
    };
    let current = settings();

    if let Some(quiz) = preview() {
        let key = quiz.id().to_string();
        return rsx! {
            div { class: "preview",
                div { class: "preview-banner",
                    span { "Preview (not saved)" }
                    button { onclick: move |_| preview.set(None), "Back to editor" }
                }
                PlayerScreen { key: "{key}", quiz }
            }
        };
    }

    rsx! {
        div { class: "page editor",
            h2 { "{heading}" }

            label { r#for: "quiz-title", "Title" }
            input {
                id: "quiz-title",
                r#type: "text",
                placeholder: "At least 3 characters",
                value: "{title}",
                oninput: move |evt| {
                    title.set(evt.value());
                    save_state.set(SaveState::Idle);
                },
            }

            label { r#for: "quiz-description", "Description" }
            input {
                id: "quiz-description",
                r#type: "text",
                placeholder: "Optional",
                value: "{description}",
                oninput: move |evt| {
                    description.set(evt.value());
                    save_state.set(SaveState::Idle);
                },
            }

            label { r#for: "quiz-questions", "Questions" }
            p { class: "hint", "One per line: QUESTION || A || B || C || D || correct option (1-4)" }
            textarea {
                id: "quiz-questions",
                rows: "12",
                spellcheck: "false",
                value: "{questions_text}",
                oninput: move |evt| {
                    questions_text.set(evt.value());
                    save_state.set(SaveState::Idle);
                },
            }

            p { class: "parse-status", "{feedback.status}" }
            if !feedback.line_errors.is_empty() {
                ul { class: "line-errors",
                    for line_error in feedback.line_errors.iter() {
                        li { "{line_error}" }
                    }
                }
            }

            fieldset { class: "settings",
                legend { "Playback" }
                label {
                    "Seconds per question (0 = no timer) "
                    input {
                        r#type: "number",
                        min: "0",
                        value: "{timer_raw}",
                        oninput: move |evt| timer_raw.set(evt.value()),
                    }
                }
                SettingToggle {
                    label: "Auto-advance after answering",
                    checked: current.auto_advance(),
                    on_change: move |on| settings.set(settings().with_auto_advance(on)),
                }
                SettingToggle {
                    label: "Read questions aloud",
                    checked: current.voice_enabled(),
                    on_change: move |on| settings.set(settings().with_voice(on)),
                }
                SettingToggle {
                    label: "Sound effects",
                    checked: current.sound_enabled(),
                    on_change: move |on| settings.set(settings().with_sound(on)),
                }
                SettingToggle {
                    label: "Shuffle questions",
                    checked: current.shuffle_questions(),
                    on_change: move |on| settings.set(settings().with_shuffle_questions(on)),
                }
                SettingToggle {
                    label: "Shuffle options",
                    checked: current.shuffle_options(),
                    on_change: move |on| settings.set(settings().with_shuffle_options(on)),
                }
            }

            match save_state() {
                SaveState::Failed(messages) => rsx! {
                    div { class: "validation",
                        p { "Please fix:" }
                        ul {
                            for message in messages {
                                li { "{message}" }
                            }
                        }
                    }
                },
                SaveState::Saved => rsx! {
                    p { class: "status", "Quiz saved." }
                },
                SaveState::Idle | SaveState::Saving => rsx! {},
            }

            if let Some(message) = export_status() {
                p { class: "status", "{message}" }
            }

            div { class: "editor-actions",
                button {
                    class: "primary",
                    disabled: is_saving,
                    onclick: move |_| save.call(AfterSave::Stay),
                    "Save"
                }
                button {
                    disabled: is_saving || !feedback.can_save(),
                    onclick: move |_| save.call(AfterSave::Play),
                    "Save & play"
                }
                button {
                    disabled: !feedback.can_save(),
                    onclick: move |_| on_preview.call(()),
                    "Preview"
                }
                button {
                    disabled: !feedback.can_save(),
                    onclick: move |_| on_export.call(()),
                    "Export HTML"
                }
                button {
                    onclick: move |_| {
                        navigator.push(Route::Home {});
                    },
                    "Back"
                }
            }
        }
    }
}

#[component]
fn SettingToggle(label: &'static str, checked: bool, on_change: EventHandler<bool>) -> Element {
    rsx! {
        label { class: "toggle",
            input {
                r#type: "checkbox",
                checked,
                onchange: move |evt| on_change.call(evt.checked()),
            }
            " {label}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct EditorTestHandles {
    preview: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl EditorTestHandles {
    pub(crate) fn register(&self, preview: Callback<()>) {
        *self.preview.borrow_mut() = Some(preview);
    }

    pub(crate) fn preview(&self) -> Callback<()> {
        (*self.preview.borrow()).expect("preview registered")
    }
}
