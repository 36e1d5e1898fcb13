use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed palette a lesson can be drawn with on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonColor {
    #[default]
    Default,
    Blue,
    Green,
    Pink,
    Purple,
}

impl LessonColor {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Blue,
        Self::Green,
        Self::Pink,
        Self::Purple,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
        }
    }
}

impl std::fmt::Display for LessonColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LessonColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::ValidationError(format!("unknown lesson color: {s}")))
    }
}
