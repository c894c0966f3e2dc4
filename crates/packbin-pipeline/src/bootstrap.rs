//! Bootstrap prologue generation using Handlebars.
//!
//! The prologue is the first thing in the combined artifact: a single
//! statement that installs the encoded snapshot under the well-known slot
//! identifier, so the registry inside the packaged executable finds its
//! embedded files before the program's own top-level code runs.
//!
//! # Examples
//!
//! ```
//! use packbin_pipeline::bootstrap;
//! use packbin_vfs::Snapshot;
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.insert("assets/a.txt", b"hi".to_vec());
//!
//! let prologue = bootstrap::render_prologue(&snapshot).unwrap();
//! assert!(prologue.contains(r#"globalThis["PACKBIN_SNAPSHOT"]"#));
//! assert!(prologue.contains("[104,105]"));
//! ```

use crate::error::{PipelineError, Result};
use handlebars::Handlebars;
use packbin_vfs::Snapshot;
use packbin_vfs::mode::SNAPSHOT_SLOT_ID;
use serde_json::json;

const PROLOGUE_TEMPLATE: &str = "bootstrap/prologue";

/// Template engine for generated bootstrap code.
///
/// Wraps Handlebars in strict mode with the built-in prologue template
/// pre-registered.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a template engine with registered templates.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Template` if registration fails (should not
    /// happen with the valid built-in template).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string(
                PROLOGUE_TEMPLATE,
                include_str!("../templates/bootstrap/prologue.js.hbs"),
            )
            .map_err(|error| PipelineError::Template {
                message: format!("failed to register bootstrap prologue template: {error}"),
            })?;

        Ok(Self { handlebars })
    }

    /// Renders the bootstrap prologue for a snapshot.
    ///
    /// The snapshot literal is embedded unescaped; it is already valid
    /// object-literal source text.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Template` on render failure and propagates
    /// snapshot encoding errors.
    pub fn render_prologue(&self, snapshot: &Snapshot) -> Result<String> {
        let encoded = snapshot.encode()?;
        self.handlebars
            .render(
                PROLOGUE_TEMPLATE,
                &json!({ "slot": SNAPSHOT_SLOT_ID, "snapshot": encoded }),
            )
            .map_err(|error| PipelineError::Template {
                message: error.to_string(),
            })
    }
}

/// Renders the bootstrap prologue with a fresh engine.
///
/// # Errors
///
/// Same failure modes as [`TemplateEngine::render_prologue`].
pub fn render_prologue(snapshot: &Snapshot) -> Result<String> {
    TemplateEngine::new()?.render_prologue(snapshot)
}
