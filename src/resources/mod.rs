//! Loading of external assets: binary glTF models, textures, and the fixed
//! primitive shape meshes.

use std::path::Path;

use anyhow::{Context as _, Result, anyhow, bail, ensure};

use crate::data_structures::model::{Model, ModelVertex};

pub mod mesh;
pub mod shapes;
pub mod texture;

/// CPU-side result of importing one mesh primitive: the interleaved vertex
/// sequence and its 16-bit index list, ready for GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u16>,
}

/// Load a binary glTF model from `path` and materialize its primitives as
/// GPU meshes.
///
/// Any parse failure discards the whole load; a `Model` is never partially
/// populated. Primitives without a POSITION attribute are silently excluded.
pub fn load_model_gltf(path: &Path, device: &wgpu::Device) -> Result<Model> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("could not read model file {}", path.display()))?;
    // Skip the document-level validation pass: it rejects primitives without
    // POSITION outright, and those are excluded here rather than treated as
    // errors. Structurally broken JSON or GLB still fails the parse, and
    // read_primitives checks the attributes it consumes.
    let gltf = gltf::Gltf::from_slice_without_validation(&bytes)
        .with_context(|| format!("malformed glTF container {}", path.display()))?;
    let buffers = read_buffers(&gltf, path.parent())?;
    let primitives = read_primitives(&gltf.document, &buffers)?;

    let meshes = primitives
        .iter()
        .map(|p| mesh::upload_mesh(device, &p.name, &p.vertices, &p.indices))
        .collect();
    Ok(Model { meshes })
}

/// Resolve every buffer in the document to its raw bytes: either the GLB
/// binary blob or an external file next to the container.
fn read_buffers(gltf: &gltf::Gltf, base: Option<&Path>) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow!("buffer references the GLB blob, but there is none"))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let path = base.unwrap_or_else(|| Path::new(".")).join(uri);
                let bin = std::fs::read(&path)
                    .with_context(|| format!("could not read buffer file {}", path.display()))?;
                buffer_data.push(bin);
            }
        }
    }
    Ok(buffer_data)
}

/// Flatten every mesh primitive in the document into interleaved vertex and
/// index arrays.
///
/// For each vertex the importer emits position.xyz, normal.xyz and the
/// texture coordinate with its V flipped as `1.0 - v` (texture origin
/// convention correction). Primitives lacking POSITION are skipped;
/// primitives that have POSITION but lack NORMAL or TEXCOORD_0 fail the
/// whole load with a descriptive error.
pub fn read_primitives(
    document: &gltf::Document,
    buffers: &[Vec<u8>],
) -> Result<Vec<PrimitiveData>> {
    let mut primitives = Vec::new();

    for gltf_mesh in document.meshes() {
        let name = gltf_mesh.name().unwrap_or("unnamed").to_string();

        for primitive in gltf_mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

            let Some(position_reader) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = position_reader.collect();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .ok_or_else(|| anyhow!("mesh {name:?}: primitive has POSITION but no NORMAL"))?
                .collect();
            let tex_coords: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .ok_or_else(|| anyhow!("mesh {name:?}: primitive has POSITION but no TEXCOORD_0"))?
                .into_f32()
                .collect();

            ensure!(
                normals.len() == positions.len() && tex_coords.len() == positions.len(),
                "mesh {name:?}: attribute accessors disagree on element count \
                 ({} positions, {} normals, {} tex coords)",
                positions.len(),
                normals.len(),
                tex_coords.len(),
            );

            let vertices = positions
                .iter()
                .zip(&normals)
                .zip(&tex_coords)
                .map(|((&position, &normal), &[u, v])| ModelVertex {
                    position,
                    normal,
                    tex_coords: [u, 1.0 - v],
                })
                .collect();

            let index_accessor = primitive
                .indices()
                .ok_or_else(|| anyhow!("mesh {name:?}: primitive has no index accessor"))?;
            let declared_count = index_accessor.count();

            let indices: Vec<u16> = match reader.read_indices() {
                Some(gltf::mesh::util::ReadIndices::U16(iter)) => iter.collect(),
                Some(_) => bail!("mesh {name:?}: index accessor is not unsigned 16-bit"),
                None => bail!("mesh {name:?}: index accessor data is unreadable"),
            };
            ensure!(
                indices.len() == declared_count,
                "mesh {name:?}: index accessor declares {declared_count} elements \
                 but {} were decoded",
                indices.len(),
            );

            primitives.push(PrimitiveData {
                name: name.clone(),
                vertices,
                indices,
            });
        }
    }

    Ok(primitives)
}
