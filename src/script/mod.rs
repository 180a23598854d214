//! Script data model and the generator's highlight-table format.

/// `Script`, `HighlightSegment` and `VoiceClip`.
pub mod model;
/// Parsing of generated highlight tables.
pub mod table;
