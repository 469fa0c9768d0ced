//! glTF 2.0 import.
//!
//! Both the binary (`.glb`) and the JSON (`.gltf`) containers are accepted,
//! with embedded or external buffers and images.

use std::path::Path;

use crate::error::{Result, ViewerError};
use crate::scene::Model;

mod glb;

/// Loads the asset at `path`.
///
/// # Errors
/// Fails if the file cannot be read, is not valid glTF, references buffers
/// that cannot be resolved, or contains no triangle to draw.
pub fn load(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    log::info!("Loading {}.", path.display());

    let (doc, buffers, images) = gltf::import(path).map_err(split_io_error)?;
    glb::import_document(&doc, &buffers, images)
}

/// Loads an asset from memory. External resources are resolved relative to
/// the working directory.
pub fn load_from_slice(bytes: &[u8]) -> Result<Model> {
    let (doc, buffers, images) = gltf::import_slice(bytes).map_err(split_io_error)?;
    glb::import_document(&doc, &buffers, images)
}

fn split_io_error(err: gltf::Error) -> ViewerError {
    match err {
        gltf::Error::Io(e) => ViewerError::Io(e),
        e => ViewerError::Gltf(e),
    }
}
