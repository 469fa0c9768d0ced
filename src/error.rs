//! Errors reported by the loader, the configuration layer and the viewer.

/// Result type used across clipview.
pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

/// Everything that can go wrong outside of GPU setup.
///
/// GPU setup failures (no adapter, no device) are not recoverable and panic
/// with a message instead.
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset is not valid glTF, or one of its buffers could not be resolved.
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The asset parsed fine but holds no triangle primitive to draw.
    #[error("asset contains no renderable triangle primitive")]
    EmptyAsset,

    /// The window surface could not provide a frame.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
