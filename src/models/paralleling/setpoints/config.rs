/// Behaviour of [`ParallelingModel`](super::ParallelingModel) around the
/// settings store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelingConfig {
    /// Reject any lookup that fell back to `"0"`.
    ///
    /// Off by default, which keeps the setup contract where a missing
    /// setting silently reads as zero. When on, the model fails with
    /// [`SetpointError::DefaultedSetting`](super::SetpointError::DefaultedSetting)
    /// naming the first missing entry.
    pub strict_settings: bool,
}

impl ParallelingConfig {
    /// A configuration that rejects defaulted lookups.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_settings: true,
        }
    }
}
