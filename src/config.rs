//! Per-invocation configuration
//!
//! Callers pass a free-form `configurable` map alongside the conversation
//! state. Only the `experience` key is read here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-declared skill tier controlling prompt tone and depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Pro,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Pro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Pro => "pro",
        }
    }

    /// Resolve a raw tag. Matching is exact; unknown tags resolve to `Pro`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "beginner" => ExperienceLevel::Beginner,
            "intermediate" => ExperienceLevel::Intermediate,
            _ => ExperienceLevel::Pro,
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation configuration, shaped like `{"configurable": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub configurable: Map<String, Value>,
}

impl Configuration {
    pub const EXPERIENCE_KEY: &'static str = "experience";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_experience(self, tag: impl Into<String>) -> Self {
        self.with_value(Self::EXPERIENCE_KEY, Value::String(tag.into()))
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.configurable.insert(key.into(), value.into());
        self
    }

    /// Experience level for this invocation
    ///
    /// An absent key means `Intermediate`. A present value that is not one of
    /// the known tags (including `null` and non-string JSON) means `Pro`.
    pub fn experience(&self) -> ExperienceLevel {
        match self.configurable.get(Self::EXPERIENCE_KEY) {
            None => ExperienceLevel::default(),
            Some(Value::String(tag)) => ExperienceLevel::from_tag(tag),
            Some(_) => ExperienceLevel::Pro,
        }
    }
}

impl From<ExperienceLevel> for Configuration {
    fn from(level: ExperienceLevel) -> Self {
        Configuration::new().with_experience(level.as_str())
    }
}
