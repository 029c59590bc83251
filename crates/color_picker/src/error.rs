use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The render backend could not provide a surface for the plane.
    #[error("no plane surface available for {width}x{height}")]
    PlaneSurfaceUnavailable { width: u32, height: u32 },

    #[error("invalid picker config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Encode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
