//! Contract trait, default registry, and the sequential reducer

use std::fmt;

use tracing::{debug, trace};

use crate::markup::{Document, Rewriter};

use super::config::ContractConfig;
use super::error::{ContractError, PipelineError};
use super::heights::Heights;
use super::hygiene::{BgPositionCleanup, ResponsiveDuplicateCleanup, SectionPadding};
use super::structure::{Cta, SemanticRestoreWidthCleanup, TextSanity, UnderlineBar};
use super::width::{
    FlexWidths, GridColumnWidthCleanup, GridWidths, MaxWFullDedupe, WidthIntent, WidthIntentSanity,
    WidthNoise,
};

/// Facts about an element that contracts consume or establish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `data-w-intent`
    WidthIntent,
    /// `data-h-intent`
    HeightIntent,
    /// `data-decorative`
    Decorative,
    /// The element's tag name
    Tag,
}

/// Shared, read-only state handed to every contract
#[derive(Debug, Clone, Copy)]
pub struct ContractContext<'c> {
    pub config: &'c ContractConfig,
}

/// Result of one contract application
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractOutput {
    pub html: String,
    /// Labels of the elements whose markup changed
    pub changed_nodes: Vec<String>,
    pub notes: Vec<String>,
}

/// One narrowly scoped rewrite pass
pub trait Contract {
    fn name(&self) -> &'static str;

    /// Position in the pipeline; ties are broken by name
    fn order(&self) -> u32;

    fn reads(&self) -> &'static [Artifact] {
        &[]
    }

    fn writes(&self) -> &'static [Artifact] {
        &[]
    }

    fn apply(&self, html: &str, ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError>;
}

/// Parse `html`, let `edit` queue element edits, and flush them as patches
pub fn rewrite(
    html: &str,
    edit: impl FnOnce(&mut Rewriter<'_, '_>, &mut Vec<String>),
) -> Result<ContractOutput, ContractError> {
    let doc = Document::parse(html)?;
    let mut rewriter = Rewriter::new(&doc);
    let mut notes = Vec::new();
    edit(&mut rewriter, &mut notes);
    let out = rewriter.finish()?;
    Ok(ContractOutput {
        changed_nodes: out.changed.iter().map(|&i| doc.label(i)).collect(),
        html: out.html,
        notes,
    })
}

/// Every built-in contract in default order
pub fn default_contracts() -> Vec<Box<dyn Contract>> {
    vec![
        Box::new(UnderlineBar),
        Box::new(TextSanity),
        Box::new(Cta),
        Box::new(SemanticRestoreWidthCleanup),
        Box::new(WidthIntent),
        Box::new(GridWidths),
        Box::new(GridColumnWidthCleanup),
        Box::new(FlexWidths),
        Box::new(WidthNoise),
        Box::new(MaxWFullDedupe),
        Box::new(Heights),
        Box::new(SectionPadding),
        Box::new(BgPositionCleanup),
        Box::new(WidthIntentSanity),
        Box::new(ResponsiveDuplicateCleanup),
    ]
}

/// Per-contract record of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ContractReport {
    pub name: &'static str,
    pub changed_nodes: Vec<String>,
    pub notes: Vec<String>,
}

/// Output of a full run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub html: String,
    pub contracts: Vec<ContractReport>,
}

impl PipelineReport {
    /// Total changed elements across all contracts
    pub fn changed_count(&self) -> usize {
        self.contracts.iter().map(|c| c.changed_nodes.len()).sum()
    }
}

/// An ordered, validated list of contracts
pub struct ContractPipeline {
    contracts: Vec<Box<dyn Contract>>,
    config: ContractConfig,
}

impl fmt::Debug for ContractPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractPipeline")
            .field("contracts", &self.names())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for ContractPipeline {
    fn default() -> Self {
        let mut contracts = default_contracts();
        sort_contracts(&mut contracts);
        Self {
            contracts,
            config: ContractConfig::default(),
        }
    }
}

fn sort_contracts(contracts: &mut [Box<dyn Contract>]) {
    contracts.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.name().cmp(b.name())));
}

impl ContractPipeline {
    /// Sort `contracts` by order and name, then reject any order where a
    /// contract reads an artifact that a later contract writes
    pub fn new(mut contracts: Vec<Box<dyn Contract>>) -> Result<Self, PipelineError> {
        sort_contracts(&mut contracts);
        validate(&contracts)?;
        Ok(Self {
            contracts,
            config: ContractConfig::default(),
        })
    }

    /// The named subset of the default contracts, in default order
    pub fn only(names: &[&str]) -> Result<Self, PipelineError> {
        let mut registry = default_contracts();
        if let Some(unknown) = names
            .iter()
            .find(|n| !registry.iter().any(|c| c.name() == **n))
        {
            return Err(PipelineError::UnknownContract(unknown.to_string()));
        }
        registry.retain(|c| names.contains(&c.name()));
        Self::new(registry)
    }

    pub fn with_config(mut self, config: ContractConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.contracts.iter().map(|c| c.name()).collect()
    }

    /// Thread `html` through every contract, recording what each changed.
    /// The first failing contract aborts the run.
    pub fn run(&self, html: &str) -> Result<PipelineReport, PipelineError> {
        let ctx = ContractContext {
            config: &self.config,
        };
        let mut current = html.to_string();
        let mut reports = Vec::with_capacity(self.contracts.len());

        for contract in &self.contracts {
            let output = contract
                .apply(&current, &ctx)
                .map_err(|source| PipelineError::ContractFailure {
                    contract: contract.name(),
                    source,
                })?;
            debug!(
                contract = contract.name(),
                changed = output.changed_nodes.len(),
                "applied contract"
            );
            for node in &output.changed_nodes {
                trace!(contract = contract.name(), node = %node, "changed");
            }
            current = output.html;
            reports.push(ContractReport {
                name: contract.name(),
                changed_nodes: output.changed_nodes,
                notes: output.notes,
            });
        }

        Ok(PipelineReport {
            html: current,
            contracts: reports,
        })
    }

    /// Run the pipeline and keep only the markup
    pub fn apply(&self, html: &str) -> Result<String, PipelineError> {
        self.run(html).map(|report| report.html)
    }
}

fn validate(contracts: &[Box<dyn Contract>]) -> Result<(), PipelineError> {
    for (i, consumer) in contracts.iter().enumerate() {
        for producer in &contracts[i + 1..] {
            if let Some(artifact) = consumer
                .reads()
                .iter()
                .find(|a| producer.writes().contains(*a))
            {
                return Err(PipelineError::OrderViolation {
                    consumer: consumer.name(),
                    producer: producer.name(),
                    artifact: *artifact,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        name: &'static str,
        order: u32,
        reads: &'static [Artifact],
        fails: bool,
    }

    impl Contract for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn order(&self) -> u32 {
            self.order
        }

        fn reads(&self) -> &'static [Artifact] {
            self.reads
        }

        fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
            if self.fails {
                return Err(ContractError::invariant("probe failure"));
            }
            Ok(ContractOutput {
                html: html.to_string(),
                ..ContractOutput::default()
            })
        }
    }

    #[test]
    fn test_default_order() {
        insta::assert_debug_snapshot!(ContractPipeline::default().names(), @r###"
        [
            "underlineBar",
            "textSanity",
            "cta",
            "semanticRestoreWidthCleanup",
            "widthIntent",
            "gridWidths",
            "gridColumnWidthCleanup",
            "flexWidths",
            "widthNoise",
            "maxWFullDedupe",
            "heights",
            "sectionPadding",
            "bgPositionCleanup",
            "widthIntentSanity",
            "responsiveDuplicateCleanup",
        ]
        "###);
    }

    #[test]
    fn test_default_registry_validates() {
        assert!(ContractPipeline::new(default_contracts()).is_ok());
    }

    #[test]
    fn test_only_keeps_default_order() {
        let pipeline = ContractPipeline::only(&["heights", "cta"]).unwrap();
        assert_eq!(pipeline.names(), vec!["cta", "heights"]);
    }

    #[test]
    fn test_only_rejects_unknown() {
        let err = ContractPipeline::only(&["nope"]).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownContract(name) if name == "nope"));
    }

    #[test]
    fn test_consumer_before_producer_is_rejected() {
        let contracts: Vec<Box<dyn Contract>> = vec![
            Box::new(Cta),
            Box::new(Probe {
                name: "early",
                order: 1,
                reads: &[Artifact::Tag],
                fails: false,
            }),
        ];
        let err = ContractPipeline::new(contracts).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::OrderViolation {
                consumer: "early",
                producer: "cta",
                artifact: Artifact::Tag
            }
        ));
    }

    #[test]
    fn test_failing_contract_aborts() {
        let contracts: Vec<Box<dyn Contract>> = vec![
            Box::new(Probe {
                name: "boom",
                order: 1,
                reads: &[],
                fails: true,
            }),
            Box::new(Heights),
        ];
        let pipeline = ContractPipeline::new(contracts).unwrap();
        let err = pipeline.run("<div></div>").unwrap_err();
        assert!(matches!(err, PipelineError::ContractFailure { contract: "boom", .. }));
    }

    #[test]
    fn test_malformed_markup_is_contract_failure() {
        let err = ContractPipeline::default().apply("<div><p></div>").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ContractFailure {
                contract: "underlineBar",
                source: ContractError::Markup(_)
            }
        ));
    }

    #[test]
    fn test_report_lists_every_contract() {
        let report = ContractPipeline::default()
            .run(r#"<section data-h-intent="hug" class="h-[40px]"></section>"#)
            .unwrap();
        assert_eq!(report.contracts.len(), 15);
        assert_eq!(report.html, "<section data-h-intent=\"hug\"></section>");
        assert!(report.changed_count() >= 1);
    }
}
