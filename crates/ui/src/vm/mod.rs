mod editor_vm;
mod player_vm;
mod quiz_list_vm;

pub use editor_vm::{EditorFeedbackVm, editor_feedback, export_file_name, parse_timer_input};
pub use player_vm::{OptionState, OptionVm, PlayerVm, QuestionVm, ResultVm, format_timer};
pub use quiz_list_vm::{QuizCardVm, format_date, map_quiz_cards};
