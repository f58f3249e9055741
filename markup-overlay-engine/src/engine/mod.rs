pub mod atlas;
pub mod camera;
pub mod mesh;
pub mod shaders;
