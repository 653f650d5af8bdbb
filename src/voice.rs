use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Filter value that lists every voice.
pub const ALL_VOICES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender {0:?}, expected \"male\" or \"female\"")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    /// Case-insensitive: "male", "MALE" and "Male" all parse to `Male`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("male") {
            Ok(Gender::Male)
        } else if s.eq_ignore_ascii_case("female") {
            Ok(Gender::Female)
        } else {
            Err(UnknownGender(s.to_owned()))
        }
    }
}

/// Constraints used both to filter a voice listing and to pick the voice
/// for synthesis. `None` leaves the field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl VoiceSelector {
    /// Parse a `-list-voices` filter.
    ///
    /// `"all"` yields an unconstrained selector. Anything else is split on
    /// commas; `male`/`female` tokens (any case) set the gender and every
    /// other token is taken as a language code. A later token of the same
    /// kind replaces an earlier one.
    #[instrument]
    pub fn from_filter(filter: &str) -> Self {
        let mut selector = VoiceSelector::default();
        if filter == ALL_VOICES {
            return selector;
        }

        for token in filter.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<Gender>() {
                Ok(gender) => {
                    if let Some(previous) = selector.gender.replace(gender) {
                        warn!("gender {} replaced by {} in voice filter", previous, gender);
                    }
                }
                Err(_) => {
                    if let Some(previous) = selector.language.replace(token.to_owned()) {
                        warn!("language {} replaced by {} in voice filter", previous, token);
                    }
                }
            }
        }

        selector
    }
}

/// A voice as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub gender: String,
}

impl fmt::Display for VoiceDescriptor {
    /// One listing line, ending with flags that select this voice.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}\t(-name={} -gender={} -language={})",
            self.name, self.gender, self.language, self.name, self.gender, self.language
        )
    }
}
