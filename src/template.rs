//! Contract for the external template engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A template could not be rendered. Carried through unchanged from the
/// engine that produced it; the envelope adds nothing.
#[derive(Debug, Error)]
#[error("template {} failed to render: {message}", .path.display())]
pub struct RenderError {
    pub path: PathBuf,
    pub message: String,
}

/// The rendering engine the envelope delegates to. `path` is already
/// resolved against the configured template root; `bindings` are the
/// name -> value substitutions the handler collected.
pub trait TemplateRenderer {
    fn render(
        &self,
        path: &Path,
        bindings: &HashMap<String, String>,
    ) -> Result<String, RenderError>;
}
