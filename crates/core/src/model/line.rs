use std::fmt;

use serde::{Deserialize, Serialize};

use super::diff::DiffIndex;

/// Targets the logger emits for the structural markers around a hunk:
/// file boundaries and the expand-context controls.
const EXPANDABLE_TARGETS: [&str; 4] = [
    "Expandable line details",
    "File start marker",
    "File end marker",
    "Expandable line button",
];

/// Target emitted for the inline review comment anchored to a line.
pub const COMMENT_TARGET: &str = "Inline comment";

/// Classification of one rendered diff row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineType {
    Addition,
    Deletion,
    Unchanged,
    Expandable,
    Comment,
    /// A `change` value this version does not know about. Kept verbatim so
    /// it still joins gazes to lines and shows up in the figure.
    Unknown(String),
}

impl LineType {
    /// Classify a line from its `target` discriminator, falling back to the
    /// explicit `change` field. Returns `None` when neither says anything.
    pub fn classify(target: Option<&str>, change: Option<&str>) -> Option<Self> {
        match target {
            Some(t) if EXPANDABLE_TARGETS.contains(&t) => return Some(Self::Expandable),
            Some(COMMENT_TARGET) => return Some(Self::Comment),
            _ => {}
        }
        change.map(Self::from)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Addition => "addition",
            Self::Deletion => "deletion",
            Self::Unchanged => "unchanged",
            Self::Expandable => "expandable",
            Self::Comment => "comment",
            Self::Unknown(s) => s,
        }
    }

    /// Additions and deletions only.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Addition | Self::Deletion)
    }
}

impl From<&str> for LineType {
    fn from(s: &str) -> Self {
        match s {
            "addition" => Self::Addition,
            "deletion" => Self::Deletion,
            "unchanged" => Self::Unchanged,
            "expandable" => Self::Expandable,
            "comment" => Self::Comment,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for LineType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<LineType> for String {
    fn from(t: LineType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join key between gazes and diff lines: `"{index}-{type}"`.
///
/// Only unique within one diff; pair it with the diff id for anything wider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(String);

impl LineId {
    pub fn new(index: u32, line_type: &LineType) -> Self {
        Self(format!("{index}-{line_type}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity fields shared by diff lines and the gazes that land on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRef {
    /// Sequential position within the diff, as rendered.
    pub index: u32,
    pub line_type: LineType,
    pub diff_index: DiffIndex,
    pub file: Option<String>,
}

impl LineRef {
    pub fn id(&self) -> LineId {
        LineId::new(self.index, &self.line_type)
    }
}

/// Type-specific payload of a diff line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDetail {
    /// An addition, deletion or unchanged context line.
    Change {
        old_line_num: Option<u32>,
        new_line_num: Option<u32>,
        length: Option<u32>,
        indent_value: Option<u32>,
        indent_type: Option<String>,
    },
    /// File boundary or expand-context control.
    Marker {
        old_start: Option<u32>,
        old_end: Option<u32>,
        new_start: Option<u32>,
        new_end: Option<u32>,
    },
    Comment,
}

/// A single line of a diff as logged by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub key: LineRef,
    pub text: Option<String>,
    pub detail: LineDetail,
}

impl Line {
    pub fn index(&self) -> u32 {
        self.key.index
    }

    pub fn line_type(&self) -> &LineType {
        &self.key.line_type
    }

    pub fn id(&self) -> LineId {
        self.key.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_override_change_field() {
        assert_eq!(
            LineType::classify(Some("File start marker"), Some("unchanged")),
            Some(LineType::Expandable)
        );
        assert_eq!(
            LineType::classify(Some("Expandable line button"), None),
            Some(LineType::Expandable)
        );
        assert_eq!(
            LineType::classify(Some(COMMENT_TARGET), Some("addition")),
            Some(LineType::Comment)
        );
    }

    #[test]
    fn change_field_used_verbatim() {
        assert_eq!(
            LineType::classify(Some("Code line"), Some("deletion")),
            Some(LineType::Deletion)
        );
        assert_eq!(
            LineType::classify(None, Some("renamed")),
            Some(LineType::Unknown("renamed".into()))
        );
        assert_eq!(LineType::classify(Some("Code line"), None), None);
    }

    #[test]
    fn only_additions_and_deletions_are_changes() {
        assert!(LineType::Addition.is_change());
        assert!(LineType::Deletion.is_change());
        assert!(!LineType::Unchanged.is_change());
        assert!(!LineType::Expandable.is_change());
        assert!(!LineType::Comment.is_change());
    }

    #[test]
    fn line_id_joins_index_and_type() {
        assert_eq!(LineId::new(7, &LineType::Addition).as_str(), "7-addition");
        assert_eq!(
            LineId::new(0, &LineType::Unknown("moved".into())).as_str(),
            "0-moved"
        );
    }

    #[test]
    fn line_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&LineType::Expandable).unwrap();
        assert_eq!(json, r#""expandable""#);
        let back: LineType = serde_json::from_str(r#""weird""#).unwrap();
        assert_eq!(back, LineType::Unknown("weird".into()));
    }
}
