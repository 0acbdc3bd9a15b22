//! JSON renderer.

use super::{ArtifactRenderer, RenderConfig};
use crate::error::RenderError;
use crate::ir::GeneratedArtifact;

/// Renders the artifact model itself as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for JsonRenderer {
    fn id(&self) -> &'static str {
        "json"
    }

    fn name(&self) -> &'static str {
        "JSON Artifact Model"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn render(
        &self,
        artifact: &GeneratedArtifact,
        _config: &RenderConfig,
    ) -> Result<String, RenderError> {
        let mut text = serde_json::to_string_pretty(artifact)
            .map_err(|e| RenderError::new(artifact.qualified_name(), e))?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::ArtifactComposer;
    use crate::ir::{AnnotatedDeclaration, DirectiveKind, GenerationDirective};
    use std::sync::Arc;

    #[test]
    fn test_json_round_trips_artifact() {
        let order = Arc::new(AnnotatedDeclaration::class("shop", "Order"));
        let directive = GenerationDirective::new(DirectiveKind::Controller, order);
        let artifact = ArtifactComposer::new().compose(&directive).unwrap();

        let text = JsonRenderer::new()
            .render(&artifact, &RenderConfig::default())
            .unwrap();
        let parsed: GeneratedArtifact = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, artifact);
    }
}
