//! Event type enum as the single source of truth for event type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of time commitment a calendar event can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Class,
    Work,
    Exam,
    Project,
    Personal,
}

impl EventType {
    /// All variants, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Class,
        Self::Work,
        Self::Exam,
        Self::Project,
        Self::Personal,
    ];

    /// String representation used on the wire and in buffer reasons.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Work => "work",
            Self::Exam => "exam",
            Self::Project => "project",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "work" => Ok(Self::Work),
            "exam" => Ok(Self::Exam),
            "project" => Ok(Self::Project),
            "personal" => Ok(Self::Personal),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event type strings.
#[derive(Debug, Clone)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}
