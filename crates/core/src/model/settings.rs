/// Playback configuration stored alongside a quiz.
///
/// Defaults apply when a quiz carries no explicit settings:
/// - no countdown timer
/// - auto-advance after each answer
/// - voice off, sound cues on
/// - questions and options kept in authored order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlaybackSettings {
    timer_seconds: u32,
    auto_advance: bool,
    voice_enabled: bool,
    sound_enabled: bool,
    shuffle_questions: bool,
    shuffle_options: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            timer_seconds: 0,
            auto_advance: true,
            voice_enabled: false,
            sound_enabled: true,
            shuffle_questions: false,
            shuffle_options: false,
        }
    }
}

impl PlaybackSettings {
    #[must_use]
    #[allow(clippy::fn_params_excessive_bools)]
    pub fn new(
        timer_seconds: u32,
        auto_advance: bool,
        voice_enabled: bool,
        sound_enabled: bool,
        shuffle_questions: bool,
        shuffle_options: bool,
    ) -> Self {
        Self {
            timer_seconds,
            auto_advance,
            voice_enabled,
            sound_enabled,
            shuffle_questions,
            shuffle_options,
        }
    }

    #[must_use]
    pub fn with_timer_seconds(mut self, seconds: u32) -> Self {
        self.timer_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    #[must_use]
    pub fn with_voice(mut self, enabled: bool) -> Self {
        self.voice_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, enabled: bool) -> Self {
        self.shuffle_questions = enabled;
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, enabled: bool) -> Self {
        self.shuffle_options = enabled;
        self
    }

    // Accessors
    #[must_use]
    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    /// A zero timer disables the countdown entirely.
    #[must_use]
    pub fn timer_enabled(&self) -> bool {
        self.timer_seconds > 0
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    #[must_use]
    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }
}
