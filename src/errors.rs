use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Bag linkage disagreement: name collisions with differing specs,
    /// links between mismatched specs, sinks neither exposed nor linked,
    /// unknown source names.
    #[error("wiring error: {0}")]
    Wiring(String),

    /// Degenerate axis bounds, unknown discrete ordinates, and other
    /// call-site programming bugs.
    #[error("domain error: {0}")]
    Domain(String),

    /// Scene-graph misuse, e.g. configuring a painter that was never
    /// attached and is not the render root.
    #[error("layout error: {0}")]
    Layout(String),

    /// Allocated size is below a painter's minimum. Caught at the render
    /// root, which blanks the frame instead of aborting the host.
    #[error("context too small: need {need_w:.1}x{need_h:.1}, have {have_w:.1}x{have_h:.1}")]
    ContextTooSmall {
        need_w: f64,
        need_h: f64,
        have_w: f64,
        have_h: f64,
    },

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl PlotError {
    pub fn wiring(msg: impl Into<String>) -> Self {
        Self::Wiring(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn is_too_small(&self) -> bool {
        matches!(self, Self::ContextTooSmall { .. })
    }
}
