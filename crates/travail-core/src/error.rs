use thiserror::Error;

/// Failures surfaced by the view layer.
///
/// None of these are expected on the screen's happy path: layout errors mean
/// the taffy tree got out of sync with the view tree, and resource errors are
/// reported by the renderer, which falls back to a placeholder.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("resource '{id}' unavailable: {reason}")]
    Resource { id: String, reason: String },
}

pub type UiResult<T> = Result<T, UiError>;
