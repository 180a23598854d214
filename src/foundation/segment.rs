use std::fmt;

/// Identity of one narrated segment: the intro or a single highlight.
///
/// Every per-segment artifact (voice file, frame, clip) is named from this id, and
/// [`SegmentId::slot`] is its position in playback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentId {
    /// Opening segment without a highlight.
    Intro,
    /// Highlight at this index of `Script::highlights`.
    Highlight(usize),
}

impl SegmentId {
    /// Position in playback order (`Intro` is 0, `Highlight(i)` is `i + 1`).
    pub fn slot(self) -> usize {
        match self {
            SegmentId::Intro => 0,
            SegmentId::Highlight(i) => i + 1,
        }
    }

    /// Inverse of [`SegmentId::slot`].
    pub fn from_slot(slot: usize) -> Self {
        match slot {
            0 => SegmentId::Intro,
            n => SegmentId::Highlight(n - 1),
        }
    }

    /// Stem used in artifact file names: `intro`, `0`, `1`, ...
    pub fn file_stem(self) -> String {
        match self {
            SegmentId::Intro => "intro".to_string(),
            SegmentId::Highlight(i) => i.to_string(),
        }
    }

    /// All segment ids of a script with `highlights` highlights, in playback order.
    pub fn playback_order(highlights: usize) -> impl Iterator<Item = SegmentId> {
        (0..=highlights).map(SegmentId::from_slot)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentId::Intro => f.write_str("intro"),
            SegmentId::Highlight(i) => write!(f, "highlight {i}"),
        }
    }
}
