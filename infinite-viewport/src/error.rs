use thiserror::Error;

/// Errors returned by [`crate::Registry`] operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScrollerError {
    /// The scroll-ancestor selector did not resolve to an element.
    #[error("scroll ancestor selector `{selector}` did not match any element")]
    Configuration { selector: String },
    #[error("scroller instance {0} is already registered")]
    DuplicateInstance(String),
    #[error("scroller instance {0} is not registered")]
    UnknownInstance(String),
    /// The platform cannot observe intersections. Not retried.
    #[error("intersection observation is unavailable: {0}")]
    Observation(String),
}

impl ScrollerError {
    pub(crate) fn duplicate(id: &impl core::fmt::Debug) -> Self {
        Self::DuplicateInstance(format!("{id:?}"))
    }

    pub(crate) fn unknown(id: &impl core::fmt::Debug) -> Self {
        Self::UnknownInstance(format!("{id:?}"))
    }
}

/// A host sink failed to accept a visibility notification.
///
/// Delivery is best-effort: the registry logs these and keeps observing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("viewport notification failed: {message}")]
pub struct DeliveryError {
    message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
