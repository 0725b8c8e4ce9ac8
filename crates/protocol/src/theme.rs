use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Row bars, one per diff line type
    LineAddition,
    LineDeletion,
    LineUnchanged,
    LineExpandable,
    DiffSeparator,
    /// Any row whose line type has no dedicated color.
    LineUnknown,

    GazePoint,

    Background,
    PlotBorder,
    AxisLine,
    GridLine,

    TextPrimary,
    TextMuted,

    LegendBackground,
    LegendBorder,
}

impl ThemeToken {
    /// Tokens shown in the figure legend, with their labels, in display order.
    pub const LEGEND: [(ThemeToken, &'static str); 5] = [
        (ThemeToken::LineAddition, "Addition"),
        (ThemeToken::LineDeletion, "Deletion"),
        (ThemeToken::LineUnchanged, "Unchanged"),
        (ThemeToken::LineExpandable, "Expandable"),
        (ThemeToken::DiffSeparator, "Diff separator"),
    ];
}
