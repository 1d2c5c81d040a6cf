use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MoodError;

/// Gender options offered by the registration form.
///
/// The workflow itself only ever sees the label string; this enum exists so
/// registration input is closed to the four supported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    NonBinary,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::NonBinary,
        Gender::PreferNotToSay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "Non-binary",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = MoodError;

    /// Accepts the display labels case-insensitively, with spaces, dashes or
    /// underscores as separators (`non-binary`, `prefer_not_to_say`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "non-binary" | "nonbinary" => Ok(Self::NonBinary),
            "prefer-not-to-say" => Ok(Self::PreferNotToSay),
            "" => Err(MoodError::validation("gender is required")),
            _ => Err(MoodError::validation(format!(
                "unsupported gender '{}', expected one of: {}",
                s.trim(),
                Gender::ALL.map(|g| g.as_str()).join(", ")
            ))),
        }
    }
}

/// Demographic attributes sent at registration and with every entry.
///
/// This is also the `/register` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: String,
}

impl UserProfile {
    pub fn new(age: u32, gender: Gender) -> Self {
        Self {
            age,
            gender: gender.as_str().to_string(),
        }
    }

    /// Build a profile from raw form input.
    pub fn parse(age: &str, gender: &str) -> Result<Self, MoodError> {
        let age = age.trim();
        if age.is_empty() {
            return Err(MoodError::validation("age is required"));
        }
        let age: u32 = age
            .parse()
            .map_err(|_| MoodError::validation(format!("age must be a whole number, got '{}'", age)))?;
        let gender: Gender = gender.parse()?;

        let profile = Self::new(age, gender);
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), MoodError> {
        if self.age == 0 {
            return Err(MoodError::validation("age must be a positive number"));
        }
        if self.gender.trim().is_empty() {
            return Err(MoodError::validation("gender is required"));
        }
        Ok(())
    }
}

/// A complete local identity: the server-issued session id plus the profile
/// it was registered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub profile: UserProfile,
}
