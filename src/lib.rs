//! frame2html - compile exported design trees into utility-class HTML
//!
//! The pipeline has three stages:
//!
//! 1. [`inference`] walks the design tree once and emits markup with
//!    utility classes plus `data-w-intent`/`data-h-intent` attributes.
//! 2. [`contracts`] runs ordered rewrite passes that enforce width, height,
//!    structural, and responsive invariants on that markup.
//! 3. [`responsive`] reconciles per-viewport renders into one DOM or a set
//!    of bucket-selected fragments.
//!
//! # Example
//!
//! ```rust
//! use frame2html::{compile, parse_export};
//!
//! let export = parse_export(r#"{
//!     "root": {
//!         "id": "1:1", "name": "Hero", "type": "FRAME",
//!         "w": 1440, "h": 900,
//!         "auto": {"layout": "VERTICAL"},
//!         "children": [
//!             {"id": "1:2", "name": "Title", "type": "TEXT",
//!              "text": {"characters": "Welcome", "size": 48}}
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let html = compile(&export).unwrap();
//! assert!(html.contains("Welcome"));
//! assert!(html.contains(r#"data-key="root""#));
//! ```

pub mod config;
pub mod contracts;
pub mod design;
pub mod error;
pub mod inference;
pub mod markup;
pub mod responsive;

pub use config::{ConfigError, PipelineConfig};
pub use contracts::{ContractPipeline, PipelineError, PipelineReport};
pub use design::{DesignExport, DesignNode, FontMap, SemanticsMap, Viewport};
pub use error::MarkupError;
pub use inference::{InferenceConfig, InferenceError};
pub use responsive::{
    reconcile, ReconcileConfig, ReconcileError, Reconciled, ResponsiveFragments, Strategy,
    StrategyDecision,
};

use thiserror::Error;

/// Errors that can occur anywhere in the compile pipeline
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid design export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    Contracts(#[from] PipelineError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A responsive export does not say which viewport it targets
    #[error("export #{index} has no viewport")]
    MissingViewport { index: usize },

    #[error("more than one export targets the {0} viewport")]
    DuplicateViewport(Viewport),
}

/// Deserialize a JSON design export
pub fn parse_export(json: &str) -> Result<DesignExport, CompileError> {
    Ok(serde_json::from_str(json)?)
}

/// Render an export without running the contract pipeline
pub fn render_raw(export: &DesignExport, config: &PipelineConfig) -> Result<String, CompileError> {
    Ok(inference::render_with_config(
        export.root.as_ref(),
        &export.semantics,
        &config.fonts,
        config.inference.clone(),
    )?)
}

/// Compile an export with the default configuration
pub fn compile(export: &DesignExport) -> Result<String, CompileError> {
    compile_with_config(export, &PipelineConfig::default())
}

/// Render an export and run the default contracts over it
pub fn compile_with_config(
    export: &DesignExport,
    config: &PipelineConfig,
) -> Result<String, CompileError> {
    let html = render_raw(export, config)?;
    let pipeline = ContractPipeline::default().with_config(config.contracts.clone());
    Ok(pipeline.apply(&html)?)
}

/// Compile one export per viewport and reconcile the results
///
/// Every export must carry a distinct `viewport`.
pub fn compile_responsive(
    exports: &[DesignExport],
    config: &PipelineConfig,
) -> Result<(Reconciled, StrategyDecision), CompileError> {
    let mut fragments = ResponsiveFragments::new();
    for (index, export) in exports.iter().enumerate() {
        let viewport = export
            .viewport
            .ok_or(CompileError::MissingViewport { index })?;
        if fragments.get(viewport).is_some() {
            return Err(CompileError::DuplicateViewport(viewport));
        }
        let html = compile_with_config(export, config)?;
        fragments = match viewport {
            Viewport::Mobile => fragments.with_mobile(html),
            Viewport::Tablet => fragments.with_tablet(html),
            Viewport::Desktop => fragments.with_desktop(html),
        };
    }
    Ok(reconcile(&fragments, &config.responsive)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export(viewport: Option<&str>, direction: &str) -> DesignExport {
        serde_json::from_value(json!({
            "viewport": viewport,
            "root": {
                "id": "1:1", "name": "Hero", "type": "FRAME",
                "w": 1200, "h": 600,
                "auto": {"layout": direction, "itemSpacing": 24},
                "children": [
                    {"id": "1:2", "name": "Title", "type": "TEXT", "w": 400, "h": 40,
                     "text": {"characters": "Welcome", "size": 32}},
                    {"id": "1:3", "name": "Body", "type": "TEXT", "w": 400, "h": 40,
                     "text": {"characters": "Stay with us", "size": 16}}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = compile(&DesignExport::default()).unwrap_err();
        assert!(matches!(err, CompileError::Inference(InferenceError::MissingTree)));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(parse_export("{"), Err(CompileError::Json(_))));
    }

    #[test]
    fn test_compile_is_idempotent_under_contracts() {
        let html = compile(&export(None, "VERTICAL")).unwrap();
        assert_eq!(ContractPipeline::default().apply(&html).unwrap(), html);
    }

    #[test]
    fn test_compile_responsive_merges_matching_frames() {
        let exports = vec![
            export(Some("desktop"), "HORIZONTAL"),
            export(Some("mobile"), "VERTICAL"),
        ];
        let (reconciled, decision) =
            compile_responsive(&exports, &PipelineConfig::default()).unwrap();
        assert_eq!(decision.strategy, Strategy::Merge);
        assert!(matches!(reconciled, Reconciled::Merged(_)));
        let html = reconciled.to_html();
        assert!(html.contains("flex-row"));
        assert!(html.contains("[[data-bucket=&quot;mobile&quot;]_&amp;]:flex-col"));
    }

    #[test]
    fn test_compile_responsive_requires_viewports() {
        let err = compile_responsive(&[export(None, "VERTICAL")], &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingViewport { index: 0 }));
        let twice = vec![
            export(Some("tablet"), "VERTICAL"),
            export(Some("tablet"), "VERTICAL"),
        ];
        let err = compile_responsive(&twice, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateViewport(Viewport::Tablet)));
    }
}
