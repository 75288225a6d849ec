use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{OPTION_COUNT, Question, Quiz};

/// Copy of `quiz` ready for one play-through.
///
/// Question order and option order are shuffled when the quiz settings ask
/// for it. Option shuffles remap the correct index, so the correct answer
/// text never changes.
#[must_use]
pub fn prepare_quiz<R: Rng + ?Sized>(quiz: &Quiz, rng: &mut R) -> Quiz {
    let settings = quiz.settings();
    if !settings.shuffle_questions() && !settings.shuffle_options() {
        return quiz.clone();
    }

    let mut questions: Vec<Question> = quiz.questions().to_vec();
    if settings.shuffle_questions() {
        questions.shuffle(rng);
    }
    if settings.shuffle_options() {
        questions = questions
            .iter()
            .map(|question| shuffle_options(question, &mut *rng))
            .collect();
    }

    quiz.with_questions(questions).unwrap_or_else(|| quiz.clone())
}

fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
    let mut order: [usize; OPTION_COUNT] = std::array::from_fn(|i| i);
    order.shuffle(rng);
    question
        .with_option_order(order)
        .unwrap_or_else(|_| question.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::{PlaybackSettings, QuizDraft};
    use quiz_core::parser::parse_quiz_text;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiz(settings: PlaybackSettings) -> Quiz {
        let text = (1..=8)
            .map(|n| format!("Q{n}||a{n}||b{n}||c{n}||d{n}||{}", (n % 4) + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let mut draft = QuizDraft::new("Shuffles", parse_quiz_text(&text).questions);
        draft.settings = Some(settings);
        draft.build(fixed_now()).unwrap()
    }

    #[test]
    fn no_shuffle_keeps_quiz_unchanged() {
        let quiz = quiz(PlaybackSettings::default());
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(prepare_quiz(&quiz, &mut rng), quiz);
    }

    #[test]
    fn question_shuffle_is_a_permutation() {
        let quiz = quiz(PlaybackSettings::default().with_shuffle_questions(true));
        let mut rng = StdRng::seed_from_u64(7);
        let prepared = prepare_quiz(&quiz, &mut rng);

        let mut before: Vec<_> = quiz.questions().iter().map(|q| q.text().to_owned()).collect();
        let mut after: Vec<_> = prepared
            .questions()
            .iter()
            .map(|q| q.text().to_owned())
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(prepared.id(), quiz.id());
    }

    #[test]
    fn option_shuffle_keeps_correct_answer_text() {
        let quiz = quiz(PlaybackSettings::default().with_shuffle_options(true));
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let prepared = prepare_quiz(&quiz, &mut rng);
            for (original, shuffled) in quiz.questions().iter().zip(prepared.questions()) {
                assert_eq!(original.text(), shuffled.text());
                assert_eq!(original.correct_option(), shuffled.correct_option());
                let mut a = original.options().to_vec();
                let mut b = shuffled.options().to_vec();
                a.sort();
                b.sort();
                assert_eq!(a, b);
            }
        }
    }
}
