/// Outcome of a heuristic that always produces a value.
///
/// Detectors never fail for lack of signal; they fall back to a default and
/// record why in `warnings` so the caller can decide whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<T> {
    /// The detected (or fallback) value.
    pub value: T,
    /// Non-fatal diagnostics raised while detecting.
    pub warnings: Vec<String>,
}

impl<T> Detection<T> {
    /// A detection without warnings.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A fallback detection carrying one warning.
    pub fn with_warning(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warnings: vec![warning.into()],
        }
    }
}
