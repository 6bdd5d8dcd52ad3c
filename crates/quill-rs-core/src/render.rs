//! Markdown rendering seam.

use crate::error::CoreError;

/// Turns markdown into display text for the host surface.
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, CoreError>;
}

/// Renderer that returns the markdown unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, markdown: &str) -> Result<String, CoreError> {
        Ok(markdown.to_string())
    }
}
