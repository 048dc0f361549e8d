//! CLI command implementations.

mod document;
pub(crate) mod preprocess;
pub(crate) mod render;
pub(crate) mod toc;

pub(crate) use preprocess::PreprocessArgs;
pub(crate) use render::RenderArgs;
pub(crate) use toc::TocArgs;
