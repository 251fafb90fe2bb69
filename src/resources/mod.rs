/**
 * This module contains all logic for reconstructing meshes/scenes/textures from container records.
 */
pub mod decode;
pub mod locate;
pub mod mesh;
pub mod scene;
pub mod texture;

use crate::data_structures::scene_graph::Scene;
use crate::fields::RecordSource;
use locate::ResourceLocator;
pub use scene::SceneBuilder;
use texture::TextureDecoder;

/// Build a scene out of one loaded container, without texture resolution.
pub fn load_scene(source: &dyn RecordSource, locator: &dyn ResourceLocator) -> Scene {
    SceneBuilder::new(source, locator).build()
}

/// Build a scene and resolve preview textures through `decoder`.
pub fn load_scene_textured(
    source: &dyn RecordSource,
    locator: &dyn ResourceLocator,
    decoder: &dyn TextureDecoder,
) -> Scene {
    SceneBuilder::new(source, locator)
        .with_textures(decoder)
        .build()
}
