//! Error types for building and loading device grids.

/// Errors that can occur while building or loading a [`Device`](crate::Device).
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// An I/O error occurred while reading a device database file.
    #[error("failed to read device database: {0}")]
    Io(#[from] std::io::Error),

    /// The tilegrid JSON could not be parsed.
    #[error("tilegrid JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two tiles share the same name.
    #[error("duplicate tile '{0}'")]
    DuplicateTile(String),

    /// Two sites share the same name.
    #[error("duplicate site '{0}'")]
    DuplicateSite(String),

    /// A site was added to a tile ID the device does not contain.
    #[error("unknown tile id {0}")]
    UnknownTile(crate::TileId),
}
