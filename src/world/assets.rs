//! Model and texture loading.
//!
//! The house model is read on a worker thread; its result travels back over a
//! oneshot channel and is applied on the render thread, either by polling
//! [`PendingModel::try_recv`] once per frame or by awaiting the [`PendingModel`].

use std::{
    fmt,
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    task::{Context, Poll},
};

use futures::channel::oneshot;
use image::RgbaImage;

use crate::{
    config::HouseConfig,
    error::AssetError,
    gfx::{
        resources::{
            material::{Material, MaterialId, DEFAULT_MATERIAL},
            texture_resource::TextureKind,
        },
        scene::{Mesh, NodeId, Scene, Transform},
    },
};

/// One mesh of a loaded model and the material it names.
pub struct ModelPart {
    pub name: String,
    pub mesh: Mesh,
    pub material: Option<MaterialId>,
}

/// Everything read from an OBJ file and its material library.
pub struct ModelAsset {
    pub path: PathBuf,
    pub parts: Vec<ModelPart>,
    pub materials: Vec<Material>,
}

impl fmt::Debug for ModelAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAsset")
            .field("path", &self.path)
            .field("parts", &self.parts.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}

/// Result of an asynchronous model load.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(ModelAsset),
    Failed(AssetError),
}

impl From<Result<ModelAsset, AssetError>> for LoadOutcome {
    fn from(result: Result<ModelAsset, AssetError>) -> Self {
        match result {
            Ok(asset) => LoadOutcome::Loaded(asset),
            Err(error) => LoadOutcome::Failed(error),
        }
    }
}

/// A model load in flight. Resolves exactly once.
pub struct PendingModel {
    path: PathBuf,
    receiver: oneshot::Receiver<LoadOutcome>,
}

impl PendingModel {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for the outcome; `None` while still loading.
    pub fn try_recv(&mut self) -> Option<LoadOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(self.abandoned()),
        }
    }

    fn abandoned(&self) -> LoadOutcome {
        LoadOutcome::Failed(AssetError::Abandoned {
            path: self.path.clone(),
        })
    }
}

impl Future for PendingModel {
    type Output = LoadOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(this.abandoned()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Starts loading an OBJ model on a worker thread.
pub fn request_model(path: impl Into<PathBuf>) -> PendingModel {
    let path = path.into();
    let (sender, receiver) = oneshot::channel();

    let worker_path = path.clone();
    // a failed spawn drops the sender, which surfaces as `Abandoned`
    let _ = std::thread::Builder::new()
        .name("model-loader".to_string())
        .spawn(move || {
            let outcome = LoadOutcome::from(load_model_sync(&worker_path));
            // the scene may have been dropped while we were loading
            let _ = sender.send(outcome);
        });

    PendingModel { path, receiver }
}

/// Reads an OBJ file, its MTL library and any diffuse or normal maps it names.
pub fn load_model_sync(path: &Path) -> Result<ModelAsset, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    if models.is_empty() {
        return Err(AssetError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("no material library for `{}`: {e}", path.display());
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let prefix = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let material_name = |index: usize| match materials.get(index) {
        Some(mtl) if !mtl.name.is_empty() => format!("{prefix}/{}", mtl.name),
        _ => format!("{prefix}/material_{index}"),
    };

    let converted_materials = materials
        .iter()
        .enumerate()
        .map(|(index, mtl)| convert_material(material_name(index), mtl, base_dir))
        .collect();

    let parts = models
        .iter()
        .enumerate()
        .map(|(index, model)| {
            let name = if model.name.is_empty() {
                format!("{prefix}_{index}")
            } else {
                model.name.clone()
            };
            ModelPart {
                mesh: Mesh::from_obj(name.clone(), &model.mesh),
                material: model
                    .mesh
                    .material_id
                    .filter(|id| *id < materials.len())
                    .map(material_name),
                name,
            }
        })
        .collect();

    Ok(ModelAsset {
        path: path.to_path_buf(),
        parts,
        materials: converted_materials,
    })
}

fn convert_material(name: String, mtl: &tobj::Material, base_dir: &Path) -> Material {
    let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
    // MTL has no roughness; derive it from the specular exponent
    let roughness = 1.0 - (mtl.shininess.unwrap_or(0.0) / 128.0).clamp(0.0, 1.0);
    let mut material = Material::new(name).with_color(diffuse).with_roughness(roughness);

    let maps = [
        (TextureKind::Color, mtl.diffuse_texture.as_deref()),
        (TextureKind::Normal, mtl.normal_texture.as_deref()),
    ];
    for (kind, texture) in maps {
        if let Some(texture) = texture {
            let image = load_texture_or_neutral(&base_dir.join(texture), kind);
            material = material.with_map(kind, image);
        }
    }

    material
}

/// Decodes an image file into 8-bit RGBA.
pub fn load_texture(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|source| AssetError::Texture {
            path: path.to_path_buf(),
            source,
        })
}

/// Like [`load_texture`], but logs a warning and returns the neutral texel for
/// `kind` when the file cannot be decoded.
pub fn load_texture_or_neutral(path: &Path, kind: TextureKind) -> RgbaImage {
    load_texture(path).unwrap_or_else(|error| {
        log::warn!("using a flat {} map: {:#}", kind.label(), anyhow::Error::from(error));
        kind.neutral_image()
    })
}

/// Attaches a loaded model under `parent` inside a group carrying the house transform.
///
/// Returns the new group, which is the only direct child added to `parent`.
pub fn attach_model(scene: &mut Scene, parent: NodeId, asset: ModelAsset, house: &HouseConfig) -> NodeId {
    let transform = Transform::from_translation(house.translation)
        .with_rotation([0.0, house.rotation_y, 0.0])
        .with_scale(house.scale);
    let group = scene.add_group(parent, "model", transform);

    for material in asset.materials {
        scene.add_material(material);
    }
    for part in asset.parts {
        let mesh = scene.add_mesh(part.mesh);
        let material = part.material.unwrap_or_else(|| DEFAULT_MATERIAL.to_string());
        scene.add_mesh_node(group, part.name, Transform::default(), mesh, material);
    }

    group
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes `contents` to a uniquely named file in the system temp directory.
    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("haunted-house-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    const TRIANGLE_OBJ: &str = "o slab\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";

    #[test]
    fn test_missing_model_fails_through_the_future() {
        let pending = request_model("does/not/exist.obj");
        assert_eq!(pending.path(), Path::new("does/not/exist.obj"));

        match futures::executor::block_on(pending) {
            LoadOutcome::Failed(AssetError::Model { path, .. }) => {
                assert_eq!(path, PathBuf::from("does/not/exist.obj"));
            }
            other => panic!("expected a model error, got {other:?}"),
        }
    }

    #[test]
    fn test_loads_obj_without_material_library() {
        let path = temp_file("triangle.obj", TRIANGLE_OBJ);

        let asset = load_model_sync(&path).expect("triangle loads");
        assert_eq!(asset.parts.len(), 1);
        assert_eq!(asset.parts[0].name, "slab");
        assert_eq!(asset.parts[0].mesh.index_count(), 3);
        assert!(asset.parts[0].material.is_none());
        assert!(asset.materials.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_mtl_materials_are_namespaced_by_model() {
        let mtl = temp_file("walls.mtl", "newmtl wall\nKd 0.5 0.25 0.125\nNs 64\n");
        let obj_source = format!(
            "mtllib {}\no walls\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl wall\nf 1 2 3\n",
            mtl.file_name().and_then(|name| name.to_str()).expect("utf-8 name")
        );
        let obj = temp_file("walls.obj", &obj_source);

        let asset = load_model_sync(&obj).expect("model loads");
        let stem = obj.file_stem().and_then(|stem| stem.to_str()).expect("stem");
        let expected = format!("{stem}/wall");

        assert_eq!(asset.materials.len(), 1);
        assert_eq!(asset.materials[0].name, expected);
        assert_eq!(asset.materials[0].base_color, [0.5, 0.25, 0.125, 1.0]);
        assert_eq!(asset.materials[0].roughness, 0.5);
        assert_eq!(asset.parts[0].material.as_deref(), Some(expected.as_str()));

        let _ = std::fs::remove_file(obj);
        let _ = std::fs::remove_file(mtl);
    }

    #[test]
    fn test_unreadable_texture_falls_back_to_neutral() {
        let image = load_texture_or_neutral(Path::new("does/not/exist.jpg"), TextureKind::Normal);
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(image.get_pixel(0, 0).0, [128, 128, 255, 255]);

        assert!(matches!(
            load_texture(Path::new("does/not/exist.jpg")),
            Err(AssetError::Texture { .. })
        ));
    }
}
