//! Tagged entries that make up a control file in its original order.
use crate::error::{ControlError, ErrorSeverity};
use crate::part::PartHandle;

/// Category of a line in a control file.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntryTag {
    /// Comment or blank line, kept verbatim.
    Comment,
    /// Reference to another control file (tgc, tbc, ecf...).
    Model,
    /// GIS layer reference.
    Gis,
    /// Data file reference (csv, tmf...).
    Data,
    /// Variable assignment.
    Variable,
    /// Output location (results, check files, logs).
    Result,
    /// File reference of an unrecognized kind.
    UnknownFile,
    /// Opening of a scenario branch.
    Scenario,
    /// End of a scenario group.
    ScenarioEnd,
    /// Line not understood by the loader, kept verbatim.
    Unknown,
}

impl EntryTag {
    /// Returns true for scenario open/close markers.
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::Scenario | Self::ScenarioEnd)
    }

    /// Returns true for tags whose payload is verbatim text.
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Comment | Self::Unknown)
    }

    /// Returns true for tags whose payload is a file part.
    pub const fn bears_part(self) -> bool {
        !self.is_marker() && !self.is_text()
    }
}

/// Payload handed to `add_content` alongside a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    None,
    Text(String),
    Part(PartHandle),
}

/// One line of a control file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entry {
    Comment(String),
    Unknown(String),
    /// Opens the `n`th scenario block in ordinal order.
    ScenarioOpen(usize),
    ScenarioClose,
    Part { tag: EntryTag, handle: PartHandle },
}

impl Entry {
    pub fn tag(&self) -> EntryTag {
        match self {
            Self::Comment(_) => EntryTag::Comment,
            Self::Unknown(_) => EntryTag::Unknown,
            Self::ScenarioOpen(_) => EntryTag::Scenario,
            Self::ScenarioClose => EntryTag::ScenarioEnd,
            Self::Part { tag, .. } => *tag,
        }
    }

    pub fn part(&self) -> Option<PartHandle> {
        match self {
            Self::Part { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Comment(text) | Self::Unknown(text) => Some(text),
            _ => None,
        }
    }

    /// Builds an entry from a tag and payload. `next_slot` is the number of
    /// scenario openings already recorded.
    pub(crate) fn from_tag(
        tag: EntryTag,
        payload: Payload,
        next_slot: usize,
    ) -> Result<Self, EntryError> {
        match (tag, payload) {
            (EntryTag::Comment, Payload::Text(text)) => Ok(Self::Comment(text)),
            (EntryTag::Unknown, Payload::Text(text)) => Ok(Self::Unknown(text)),
            (EntryTag::Scenario, Payload::None) => Ok(Self::ScenarioOpen(next_slot)),
            (EntryTag::ScenarioEnd, Payload::None) => Ok(Self::ScenarioClose),
            (tag, Payload::Part(handle)) if tag.bears_part() => Ok(Self::Part { tag, handle }),
            (tag, payload) => Err(EntryError::PayloadMismatch {
                tag,
                found: payload.kind(),
            }),
        }
    }
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text(_) => "text",
            Self::Part(_) => "part",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("{tag} entries cannot carry a {found} payload")]
    PayloadMismatch { tag: EntryTag, found: &'static str },
}

impl ControlError for EntryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PayloadMismatch { .. } => "ENTRY_PAYLOAD_MISMATCH",
        }
    }
}
