/// Convenience result type used across routecam.
pub type RouteCamResult<T> = Result<T, RouteCamError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum RouteCamError {
    /// Route or settings rejected before any phase starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Zero-length route or segment. Recovered locally as a hold at the start pose.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Playback was stopped or torn down while a phase was suspended.
    #[error("animation cancelled")]
    Cancelled,

    /// A surface transition never reported completion. Recovered by resolving anyway.
    #[error("render timeout: no completion after {waited_ms} ms")]
    RenderTimeout {
        /// How long the engine waited before giving up.
        waited_ms: u64,
    },

    /// A geometry query produced non-finite output for a single frame.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// The rendering surface or frame capture collaborator reported a failure.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteCamError {
    /// Build a [`RouteCamError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`RouteCamError::DegenerateGeometry`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Build a [`RouteCamError::Calculation`] value.
    pub fn calculation(msg: impl Into<String>) -> Self {
        Self::Calculation(msg.into())
    }

    /// Build a [`RouteCamError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`RouteCamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for [`RouteCamError::Cancelled`]; cancellation is not a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<serde_json::Error> for RouteCamError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
