use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tokio::sync::mpsc::UnboundedReceiver;

use quiz_core::model::{Quiz, QuizId};
use quiz_core::playback::Cue;
use services::{ChannelCueSink, CueEvent, PlaybackCommand, PlaybackHandle, spawn_playback};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PlayerVm, QuestionVm, ResultVm};

#[component]
pub fn PlayerView(id: QuizId) -> Element {
    let ctx = use_context::<AppContext>();
    let quizzes = ctx.quiz_service();

    let resource = use_resource(use_reactive((&id,), move |(id,)| {
        let quizzes = quizzes.clone();
        async move { quizzes.get(id).await.map_err(ViewError::from) }
    }));

    match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "page", p { "Loading..." } }
        },
        ViewState::Ready(quiz) => rsx! {
            PlayerScreen { key: "{id}", quiz }
        },
        ViewState::Error(err) => rsx! {
            div { class: "page",
                p { "{err.message()}" }
                Link { to: Route::Home {}, "Back to my quizzes" }
            }
        },
    }
}

#[derive(Clone)]
struct PlayerRuntime {
    handle: Rc<PlaybackHandle>,
    cues: Rc<RefCell<Option<UnboundedReceiver<CueEvent>>>>,
}

#[component]
pub(crate) fn PlayerScreen(quiz: Quiz) -> Element {
    let runtime = use_hook(move || {
        let (sink, cues) = ChannelCueSink::channel();
        PlayerRuntime {
            handle: Rc::new(spawn_playback(quiz, Arc::new(sink))),
            cues: Rc::new(RefCell::new(Some(cues))),
        }
    });

    let mut snapshot = use_signal({
        let handle = Rc::clone(&runtime.handle);
        move || handle.snapshot()
    });

    use_future({
        let handle = Rc::clone(&runtime.handle);
        move || {
            let mut rx = handle.subscribe();
            async move {
                while rx.changed().await.is_ok() {
                    let latest = rx.borrow_and_update().clone();
                    snapshot.set(latest);
                }
            }
        }
    });

    use_future({
        let cues = Rc::clone(&runtime.cues);
        move || {
            let receiver = cues.borrow_mut().take();
            async move {
                let Some(mut receiver) = receiver else {
                    return;
                };
                while let Some(event) = receiver.recv().await {
                    let _ = eval(&cue_script(&event));
                }
            }
        }
    });

    let send = use_callback({
        let handle = Rc::clone(&runtime.handle);
        move |command: PlaybackCommand| {
            if let Err(err) = handle.send(command) {
                log::warn!("{err}");
            }
        }
    });

    let vm = PlayerVm::from_snapshot(&snapshot.read());
    let title = snapshot.read().title.clone();

    rsx! {
        div { class: "page player",
            header { class: "player-header",
                h2 { "{title}" }
            }
            match vm {
                PlayerVm::Menu { description, question_count, timer_label, .. } => rsx! {
                    section { class: "screen menu",
                        h3 { "Welcome!" }
                        if let Some(description) = description {
                            p { class: "quiz-description", "{description}" }
                        }
                        p { "{question_count} questions" }
                        if let Some(timer_label) = timer_label {
                            p { class: "quiz-meta", "{timer_label}" }
                        }
                        button {
                            class: "primary",
                            onclick: move |_| send.call(PlaybackCommand::Start),
                            "Start Quiz"
                        }
                    }
                },
                PlayerVm::Question(question) => rsx! {
                    QuestionScreen { question, send }
                },
                PlayerVm::Result(result) => rsx! {
                    ResultScreen { result, send }
                },
            }
        }
    }
}

#[component]
fn QuestionScreen(question: QuestionVm, send: Callback<PlaybackCommand>) -> Element {
    let progress = format!("width: {}%", question.progress_percent);

    rsx! {
        section { class: "screen question",
            div { class: "score-bar",
                span { "Score: {question.score}" }
                span { "Question {question.number} / {question.total}" }
                if let Some(timer) = question.timer_label.clone() {
                    span { class: "timer", "{timer}" }
                }
            }
            div { class: "progress",
                div { class: "progress-fill", style: "{progress}" }
            }
            p { class: "question-text", "{question.text}" }
            div { class: "options",
                for option in question.options.clone() {
                    button {
                        key: "{option.index}",
                        class: option.state.class(),
                        disabled: question.locked,
                        onclick: move |_| send.call(PlaybackCommand::Select(option.index)),
                        "{option.text}"
                    }
                }
            }
            if question.timed_out {
                p { class: "timeout", "Time's up!" }
            }
            if question.show_next {
                button {
                    class: "primary",
                    onclick: move |_| send.call(PlaybackCommand::Advance),
                    "{question.next_label}"
                }
            }
        }
    }
}

#[component]
fn ResultScreen(result: ResultVm, send: Callback<PlaybackCommand>) -> Element {
    let navigator = use_navigator();

    rsx! {
        section { class: "screen result {result.tier_class}",
            h3 { "Quiz Complete!" }
            p { class: "final-score", "{result.score} / {result.total} ({result.percentage}%)" }
            p { class: "feedback", "{result.message}" }
            div { class: "result-actions",
                button {
                    class: "primary",
                    onclick: move |_| send.call(PlaybackCommand::Restart),
                    "Play Again"
                }
                button {
                    onclick: move |_| send.call(PlaybackCommand::Home),
                    "Back to Menu"
                }
                button {
                    onclick: move |_| {
                        navigator.push(Route::Home {});
                    },
                    "My quizzes"
                }
            }
        }
    }
}

/// Script run in the web view for one cue.
fn cue_script(event: &CueEvent) -> String {
    match event {
        CueEvent::Speak(text) => format!(
            r#"(function() {{
                if (!window.speechSynthesis) {{ return; }}
                window.speechSynthesis.cancel();
                window.speechSynthesis.speak(new SpeechSynthesisUtterance({text:?}));
            }})();"#
        ),
        CueEvent::Cue(cue) => {
            let frequency = match cue {
                Cue::Correct => 880,
                Cue::Incorrect => 220,
                Cue::Timeout => 440,
            };
            format!(
                r#"(function() {{
                    const Ctx = window.AudioContext || window.webkitAudioContext;
                    if (!Ctx) {{ return; }}
                    const ctx = new Ctx();
                    const osc = ctx.createOscillator();
                    const gain = ctx.createGain();
                    osc.frequency.value = {frequency};
                    gain.gain.value = 0.1;
                    osc.connect(gain);
                    gain.connect(ctx.destination);
                    osc.start();
                    osc.stop(ctx.currentTime + 0.15);
                }})();"#
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_script_quotes_text() {
        let script = cue_script(&CueEvent::Speak("Who said \"hi\"?".into()));
        assert!(script.contains(r#"SpeechSynthesisUtterance("Who said \"hi\"?")"#), "{script}");
    }

    #[test]
    fn cue_frequencies_differ() {
        let correct = cue_script(&CueEvent::Cue(Cue::Correct));
        let incorrect = cue_script(&CueEvent::Cue(Cue::Incorrect));
        assert!(correct.contains("= 880;"));
        assert!(incorrect.contains("= 220;"));
    }
}
