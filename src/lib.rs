//! arscene - scene object model and transform synchronization core for a
//! drag-and-drop AR scene editor.
//!
//! The crate is organized the way the editor is used:
//! - `assets`: declared and uploaded media that can be dragged into the scene
//! - `scene`: the authoritative object store, selection, placement, export
//! - `render`: visual proxies, manipulation handle, camera and picking
//! - `ui`: properties binding and egui panels
//! - `app`: the `Editor` controller, transform sampling and key mapping

pub mod app;
pub mod assets;
pub mod config;
pub mod render;
pub mod scene;
pub mod ui;

pub use app::Editor;
pub use config::EditorConfig;
