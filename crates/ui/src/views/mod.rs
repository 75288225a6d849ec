mod editor;
mod home;
mod player;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use editor::{EditQuizView, NewQuizView};
pub use home::HomeView;
pub use player::PlayerView;
pub use state::{ViewError, ViewState, view_state_from_resource};
