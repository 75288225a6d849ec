use std::sync::Arc;

use crate::model::{PlaybackSettings, Question, Quiz};
use super::result::{AnswerRecord, QuizResult};

//
// ─── EFFECTS ───────────────────────────────────────────────────────────────────
//

/// Audible cue requested after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
    Timeout,
}

/// Side effect requested by a transition. The dispatcher carries these out;
/// the machine itself never touches clocks, audio or storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a one-second tick source tagged with `generation`.
    ArmTimer { generation: u64, seconds: u32 },
    /// Stop the running tick source, if any.
    CancelTimer,
    /// Call `advance_from(index)` after the auto-advance delay.
    ScheduleAdvance { index: usize },
    /// Wait for the player to press "next".
    AwaitAdvance,
    Speak(String),
    Cue(Cue),
    Finished(QuizResult),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Runtime state of the question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current_index: usize,
    score: u32,
    locked: bool,
    remaining_seconds: u32,
    answers: Vec<AnswerRecord>,
}

impl Session {
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The answer given to the current question, once locked.
    #[must_use]
    pub fn last_answer(&self) -> Option<&AnswerRecord> {
        if self.locked { self.answers.last() } else { None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Menu,
    Playing(Session),
    Finished(QuizResult),
}

//
// ─── PLAYER ────────────────────────────────────────────────────────────────────
//

/// Playback state machine for one quiz: `Menu → Playing → Finished`.
///
/// Every transition returns the effects to perform. Calls that are not valid
/// in the current state (answering a locked question, advancing an unanswered
/// one, ticking a stale timer) return no effects and change nothing.
#[derive(Debug, Clone)]
pub struct Player {
    quiz: Arc<Quiz>,
    settings: PlaybackSettings,
    state: PlayerState,
    timer_generation: u64,
}

impl Player {
    #[must_use]
    pub fn new(quiz: Arc<Quiz>) -> Self {
        let settings = *quiz.settings();
        Self {
            quiz,
            settings,
            state: PlayerState::Menu,
            timer_generation: 0,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            PlayerState::Playing(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            PlayerState::Finished(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session()
            .and_then(|session| self.quiz.questions().get(session.current_index))
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.question_count()
    }

    /// Generation of the most recently armed timer.
    #[must_use]
    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    /// Menu → first question. Score starts at zero.
    pub fn start(&mut self) -> Vec<Effect> {
        if !matches!(self.state, PlayerState::Menu) {
            return Vec::new();
        }
        self.state = PlayerState::Playing(Session {
            current_index: 0,
            score: 0,
            locked: false,
            remaining_seconds: 0,
            answers: Vec::with_capacity(self.quiz.question_count()),
        });
        self.enter_question(0)
    }

    /// Answer the current question with option `selected` (0-based).
    ///
    /// An index outside the options counts as a wrong answer.
    pub fn select_answer(&mut self, selected: usize) -> Vec<Effect> {
        if !self.is_awaiting_answer() {
            return Vec::new();
        }
        self.resolve(Some(selected))
    }

    /// One second elapsed on the timer armed with `generation`.
    pub fn tick(&mut self, generation: u64) -> Vec<Effect> {
        if !self.settings.timer_enabled()
            || generation != self.timer_generation
            || !self.is_awaiting_answer()
        {
            return Vec::new();
        }
        let PlayerState::Playing(session) = &mut self.state else {
            return Vec::new();
        };
        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds == 0 {
            return self.resolve(None);
        }
        Vec::new()
    }

    /// The countdown reached zero before an answer was given.
    pub fn timeout(&mut self) -> Vec<Effect> {
        if !self.settings.timer_enabled() || !self.is_awaiting_answer() {
            return Vec::new();
        }
        if let PlayerState::Playing(session) = &mut self.state {
            session.remaining_seconds = 0;
        }
        self.resolve(None)
    }

    /// Move past an answered question: next question, or the result.
    pub fn advance(&mut self) -> Vec<Effect> {
        let PlayerState::Playing(session) = &self.state else {
            return Vec::new();
        };
        if !session.locked {
            return Vec::new();
        }

        let next = session.current_index + 1;
        if next < self.quiz.question_count() {
            if let PlayerState::Playing(session) = &mut self.state {
                session.current_index = next;
                session.locked = false;
            }
            return self.enter_question(next);
        }

        let result = QuizResult::new(
            session.score,
            u32::try_from(self.quiz.question_count()).unwrap_or(u32::MAX),
            session.answers.clone(),
        );
        self.state = PlayerState::Finished(result.clone());
        vec![Effect::Finished(result)]
    }

    /// `advance` only if question `index` is still on screen.
    ///
    /// Used for scheduled auto-advances, which may arrive after the player
    /// already moved on manually.
    pub fn advance_from(&mut self, index: usize) -> Vec<Effect> {
        match self.session() {
            Some(session) if session.current_index == index => self.advance(),
            _ => Vec::new(),
        }
    }

    /// Back to the menu from any state, discarding the session.
    pub fn reset(&mut self) -> Vec<Effect> {
        let was_playing = matches!(self.state, PlayerState::Playing(_));
        self.state = PlayerState::Menu;
        // Invalidate any tick still in flight.
        self.timer_generation += 1;
        if was_playing {
            vec![Effect::CancelTimer]
        } else {
            Vec::new()
        }
    }

    /// `reset` followed by `start`.
    pub fn restart(&mut self) -> Vec<Effect> {
        let mut effects = self.reset();
        effects.extend(self.start());
        effects
    }

    fn is_awaiting_answer(&self) -> bool {
        matches!(&self.state, PlayerState::Playing(session) if !session.locked)
    }

    fn enter_question(&mut self, index: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        let seconds = self.settings.timer_seconds();
        self.timer_generation += 1;

        if let PlayerState::Playing(session) = &mut self.state {
            session.remaining_seconds = seconds;
        }

        if self.settings.voice_enabled() {
            if let Some(question) = self.quiz.questions().get(index) {
                effects.push(Effect::Speak(question.text().to_string()));
            }
        }

        if self.settings.timer_enabled() {
            effects.push(Effect::ArmTimer {
                generation: self.timer_generation,
                seconds,
            });
        }
        effects
    }

    fn resolve(&mut self, selected: Option<usize>) -> Vec<Effect> {
        let PlayerState::Playing(session) = &mut self.state else {
            return Vec::new();
        };
        let index = session.current_index;
        let correct = match (selected, self.quiz.questions().get(index)) {
            (Some(choice), Some(question)) => question.is_correct(choice),
            _ => false,
        };

        session.locked = true;
        if correct {
            session.score += 1;
        }
        session.answers.push(AnswerRecord {
            question_index: index,
            selected,
            correct,
        });

        let mut effects = Vec::new();
        if self.settings.timer_enabled() {
            effects.push(Effect::CancelTimer);
        }
        if self.settings.sound_enabled() {
            let cue = match (selected, correct) {
                (None, _) => Cue::Timeout,
                (Some(_), true) => Cue::Correct,
                (Some(_), false) => Cue::Incorrect,
            };
            effects.push(Effect::Cue(cue));
        }
        if self.settings.auto_advance() {
            effects.push(Effect::ScheduleAdvance { index });
        } else {
            effects.push(Effect::AwaitAdvance);
        }
        effects
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizDraft;
    use crate::parser::parse_quiz_text;
    use crate::playback::FeedbackTier;
    use crate::time::fixed_now;

    const TWO_ANIMALS: &str = "Cat||Meow||Bark||Moo||Oink||1\nDog||Meow||Bark||Moo||Oink||2";

    fn quiz_with(text: &str, settings: PlaybackSettings) -> Arc<Quiz> {
        let mut draft = QuizDraft::new("Animals", parse_quiz_text(text).questions);
        draft.settings = Some(settings);
        Arc::new(draft.build(fixed_now()).unwrap())
    }

    fn manual() -> PlaybackSettings {
        PlaybackSettings::default()
            .with_auto_advance(false)
            .with_sound(false)
    }

    fn score(player: &Player) -> u32 {
        player.session().map(Session::score).unwrap_or_default()
    }

    #[test]
    fn starts_in_menu_and_ignores_answers() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        assert_eq!(player.state(), &PlayerState::Menu);
        assert!(player.select_answer(0).is_empty());
        assert!(player.advance().is_empty());
        assert_eq!(player.state(), &PlayerState::Menu);
    }

    #[test]
    fn start_enters_first_question_unlocked() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        let effects = player.start();
        assert!(effects.is_empty(), "no timer, voice or sound configured");
        let session = player.session().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(!session.locked());
        assert_eq!(player.current_question().unwrap().text(), "Cat");
    }

    #[test]
    fn correct_answer_scores_exactly_one() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        let effects = player.select_answer(0);
        assert_eq!(effects, vec![Effect::AwaitAdvance]);
        assert_eq!(score(&player), 1);
        assert!(player.session().unwrap().locked());
    }

    #[test]
    fn wrong_answer_does_not_score() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        player.select_answer(3);
        assert_eq!(score(&player), 0);
        let last = player.session().unwrap().last_answer().copied().unwrap();
        assert_eq!(last.selected, Some(3));
        assert!(!last.correct);
    }

    #[test]
    fn out_of_range_selection_is_wrong_not_a_panic() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        player.select_answer(42);
        assert_eq!(score(&player), 0);
        assert!(player.session().unwrap().locked());
    }

    #[test]
    fn second_selection_after_lock_is_a_no_op() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        player.select_answer(1);
        let before = player.state().clone();
        assert!(player.select_answer(0).is_empty());
        assert_eq!(player.state(), &before);
        assert_eq!(score(&player), 0);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        assert!(player.advance().is_empty());
        assert_eq!(player.session().unwrap().current_index(), 0);
    }

    #[test]
    fn answering_both_correctly_yields_perfect_result() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        player.select_answer(0);
        player.advance();
        assert_eq!(player.current_question().unwrap().text(), "Dog");
        player.select_answer(1);
        let effects = player.advance();

        let result = player.result().unwrap().clone();
        assert_eq!(effects, vec![Effect::Finished(result.clone())]);
        assert_eq!(result.score(), 2);
        assert_eq!(result.total(), 2);
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.tier(), FeedbackTier::Perfect);
    }

    #[test]
    fn single_question_goes_straight_to_result() {
        let mut player = Player::new(quiz_with("Cat||Meow||Bark||Moo||Oink||1", manual()));
        player.start();
        player.select_answer(2);
        player.advance();
        let result = player.result().unwrap();
        assert_eq!(result.score(), 0);
        assert_eq!(result.percentage(), 0);
        assert_eq!(result.tier(), FeedbackTier::KeepPracticing);
    }

    #[test]
    fn auto_advance_schedules_and_drops_stale_requests() {
        let settings = PlaybackSettings::default().with_sound(false);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        player.start();
        let effects = player.select_answer(0);
        assert_eq!(effects, vec![Effect::ScheduleAdvance { index: 0 }]);

        // Player skipped ahead manually before the scheduled advance fired.
        player.advance();
        assert_eq!(player.session().unwrap().current_index(), 1);
        player.select_answer(1);
        assert!(player.advance_from(0).is_empty());
        assert_eq!(player.session().unwrap().current_index(), 1);

        player.advance_from(1);
        assert_eq!(player.result().unwrap().score(), 2);
    }

    #[test]
    fn timer_arms_per_question_with_fresh_generation() {
        let settings = manual().with_timer_seconds(3);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        let effects = player.start();
        let first = player.timer_generation();
        assert_eq!(
            effects,
            vec![Effect::ArmTimer {
                generation: first,
                seconds: 3
            }]
        );
        assert_eq!(player.session().unwrap().remaining_seconds(), 3);

        let effects = player.select_answer(0);
        assert_eq!(effects, vec![Effect::CancelTimer, Effect::AwaitAdvance]);

        let effects = player.advance();
        let second = player.timer_generation();
        assert_ne!(first, second);
        assert_eq!(
            effects,
            vec![Effect::ArmTimer {
                generation: second,
                seconds: 3
            }]
        );
    }

    #[test]
    fn countdown_to_zero_times_out_without_scoring() {
        let settings = PlaybackSettings::default()
            .with_timer_seconds(2)
            .with_auto_advance(false);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        player.start();
        let generation = player.timer_generation();

        assert!(player.tick(generation).is_empty());
        assert_eq!(player.session().unwrap().remaining_seconds(), 1);

        let effects = player.tick(generation);
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer,
                Effect::Cue(Cue::Timeout),
                Effect::AwaitAdvance
            ]
        );
        let session = player.session().unwrap();
        assert!(session.locked());
        assert_eq!(session.score(), 0);
        assert_eq!(session.last_answer().unwrap().selected, None);

        // Late ticks and a late click change nothing.
        assert!(player.tick(generation).is_empty());
        assert!(player.select_answer(0).is_empty());
        assert_eq!(score(&player), 0);
    }

    #[test]
    fn stale_generation_ticks_are_ignored() {
        let settings = manual().with_timer_seconds(1);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        player.start();
        let stale = player.timer_generation();
        player.select_answer(0);
        player.advance();

        assert!(player.tick(stale).is_empty());
        assert!(!player.session().unwrap().locked());
        assert_eq!(player.session().unwrap().remaining_seconds(), 1);
    }

    #[test]
    fn disabled_timer_never_times_out() {
        let mut player = Player::new(quiz_with(TWO_ANIMALS, manual()));
        player.start();
        let generation = player.timer_generation();
        assert!(player.tick(generation).is_empty());
        assert!(player.timeout().is_empty());
        assert!(!player.session().unwrap().locked());
    }

    #[test]
    fn explicit_timeout_locks_question() {
        let settings = manual().with_timer_seconds(30);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        player.start();
        let effects = player.timeout();
        assert_eq!(effects, vec![Effect::CancelTimer, Effect::AwaitAdvance]);
        assert_eq!(player.session().unwrap().remaining_seconds(), 0);
        assert!(player.timeout().is_empty());
    }

    #[test]
    fn voice_and_sound_emit_cues() {
        let settings = PlaybackSettings::default()
            .with_voice(true)
            .with_sound(true)
            .with_auto_advance(false);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        assert_eq!(player.start(), vec![Effect::Speak("Cat".into())]);
        assert_eq!(
            player.select_answer(0),
            vec![Effect::Cue(Cue::Correct), Effect::AwaitAdvance]
        );
        assert_eq!(player.advance(), vec![Effect::Speak("Dog".into())]);
        assert_eq!(
            player.select_answer(0),
            vec![Effect::Cue(Cue::Incorrect), Effect::AwaitAdvance]
        );
    }

    #[test]
    fn reset_returns_to_menu_and_invalidates_timer() {
        let settings = manual().with_timer_seconds(5);
        let mut player = Player::new(quiz_with(TWO_ANIMALS, settings));
        player.start();
        let generation = player.timer_generation();
        assert_eq!(player.reset(), vec![Effect::CancelTimer]);
        assert_eq!(player.state(), &PlayerState::Menu);
        assert!(player.tick(generation).is_empty());
        assert!(player.reset().is_empty());
    }

    #[test]
    fn restart_from_result_begins_fresh_session() {
        let mut player = Player::new(quiz_with("Cat||Meow||Bark||Moo||Oink||1", manual()));
        player.start();
        player.select_answer(0);
        player.advance();
        assert!(player.result().is_some());

        player.restart();
        let session = player.session().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.answers().is_empty());
    }
}
