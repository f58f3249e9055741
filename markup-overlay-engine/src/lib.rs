//! 3D markup overlay engine.
//!
//! Renders point-like markers over a hosted 3D scene, picks them with a
//! pointer ray under both camera projection models, and keeps a 2D info
//! card anchored to the selected marker as the camera moves. The hosting
//! viewer (render loop, camera, windowing) is a Bevy application; the
//! feature itself lives behind [`markup::MarkupOverlayPlugin`] and a set
//! of plain, dependency-injected core types that need no running app.

pub mod engine;
pub mod markup;
