//! Error types for asset loading and renderer setup.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading the scene's external assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model `{}`", path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model `{}` contains no meshes", path.display())]
    EmptyModel { path: PathBuf },

    #[error("failed to decode texture `{}`", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("loader for `{}` stopped before reporting a result", path.display())]
    Abandoned { path: PathBuf },
}

/// Failures raised while bringing up the GPU context.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not create a drawing surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("could not open the graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("the surface reports no supported texture formats")]
    UnsupportedSurface,

    #[error("shader `{0}` has not been loaded")]
    MissingShader(String),

    #[error("pipeline `{0}` has not been registered")]
    MissingPipeline(String),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_alternate_format_includes_source_chain() {
        let error = AssetError::Model {
            path: PathBuf::from("models/house.obj"),
            source: tobj::LoadError::OpenFileFailed,
        };

        let message = format!("{:#}", anyhow::Error::from(error));
        assert!(message.starts_with("failed to load model `models/house.obj`: "));
        assert!(message.len() > "failed to load model `models/house.obj`: ".len());
    }
}
