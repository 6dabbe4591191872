#![forbid(unsafe_code)]

pub mod ids {
    /// Caller-chosen workspace identity. Opaque beyond the checks below:
    /// non-empty, bounded, no control characters.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct UserKey(String);

    impl UserKey {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, UserKeyError> {
            let value = value.into();
            validate_user_key(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum UserKeyError {
        Empty,
        TooLong,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_user_key(value: &str) -> Result<(), UserKeyError> {
        if value.is_empty() {
            return Err(UserKeyError::Empty);
        }
        if value.len() > 128 {
            return Err(UserKeyError::TooLong);
        }
        for (index, ch) in value.chars().enumerate() {
            if ch.is_control() {
                return Err(UserKeyError::InvalidChar { ch, index });
            }
        }
        Ok(())
    }
}

pub mod model {
    /// Fixed story lifecycle. Transitions are unordered: any phase may be
    /// set at any time via a progress update.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum StoryPhase {
        Defining,
        Developing,
        Validating,
        Complete,
    }

    impl StoryPhase {
        pub const ALL: [StoryPhase; 4] = [
            StoryPhase::Defining,
            StoryPhase::Developing,
            StoryPhase::Validating,
            StoryPhase::Complete,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                StoryPhase::Defining => "defining",
                StoryPhase::Developing => "developing",
                StoryPhase::Validating => "validating",
                StoryPhase::Complete => "complete",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value.trim() {
                "defining" => Some(StoryPhase::Defining),
                "developing" => Some(StoryPhase::Developing),
                "validating" => Some(StoryPhase::Validating),
                "complete" => Some(StoryPhase::Complete),
                _ => None,
            }
        }
    }

    /// Reference from a story to a goal. Stored verbatim: existence against
    /// the goals table is not checked at write time, so a dangling reference
    /// is representable and tolerated.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct GoalRef(String);

    impl GoalRef {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn into_string(self) -> String {
            self.0
        }
    }

    /// One append-only progress entry on a story.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ProgressNote {
        pub timestamp: String,
        pub phase: StoryPhase,
        pub notes: String,
    }
}
