//! Errors raised while reading `relo.toml`.

use std::path::PathBuf;

/// Why a `relo.toml` could not be turned into a [`ReloConfig`](crate::ReloConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected tables.
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// `device.name` is present but empty.
    #[error("device.name must not be empty")]
    EmptyDeviceName,

    /// A `relocation.tile_fallbacks` rule has an empty side.
    #[error("tile fallback '{from}' -> '{to}' has an empty prefix")]
    EmptyFallbackPrefix {
        /// Prefix matched against the template tile name.
        from: String,
        /// Replacement prefix.
        to: String,
    },
}
