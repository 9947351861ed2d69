/// Assist modes read by the editor. Owned by the host; the editor only reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Replace a mistyped word with the target word at the word boundary.
    pub autocorrect: bool,
    /// Insert skipped punctuation instead of making the user type it.
    pub ignore_punctuation: bool,
}
