//! Core library for the gantt-tj command line application.
//!
//! The library turns project-management exports (a spreadsheet of tasks
//! and assignments plus an XML dependency file) into a TaskJuggler project
//! description. The modules are structured to keep responsibilities narrow
//! and composable: IO adapters live under [`io`], data representations in
//! [`model`], source reconciliation in [`merge`], the block intermediate
//! representation and its rendering in [`block`] and [`render`], and the
//! end-to-end orchestration under [`sync`].

pub mod block;
pub mod error;
pub mod ident;
pub mod io;
pub mod merge;
pub mod model;
pub mod render;
pub mod sync;

pub use error::{Result, ToolError};
