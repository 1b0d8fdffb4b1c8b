//! Camera and snippet editing for `<model-viewer>` scenes.
//!
//! The state lives in a small redux-style [`store::Store`]; the camera panel
//! reads the live viewer through the [`viewer::ModelViewer`] trait and writes
//! back into the config slice. [`editor`] hosts all of it in a bevy window.

pub mod best_practices;
pub mod camera_settings;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod settings;
pub mod snippet;
pub mod store;
pub mod utils;
pub mod viewer;
