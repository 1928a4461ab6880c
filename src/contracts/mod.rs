//! Contract rewrite engine
//!
//! A contract is one narrow rewrite over emitted markup. The pipeline runs
//! the registered contracts strictly in sequence, each consuming the
//! previous one's output, and aborts on the first failure. Contracts
//! declare which element facts ([`Artifact`]) they read and write so that
//! [`ContractPipeline::new`] can reject an order where a consumer would run
//! before its producer.
//!
//! ```
//! use frame2html::contracts::ContractPipeline;
//!
//! let html = r#"<section data-h-intent="hug" class="flex h-[40px]"></section>"#;
//! let out = ContractPipeline::default().apply(html).unwrap();
//! assert_eq!(out, r#"<section data-h-intent="hug" class="flex"></section>"#);
//! ```

pub mod config;
pub mod error;
pub mod heights;
pub mod hygiene;
pub mod pipeline;
pub mod structure;
pub mod width;

pub use config::{ContractConfig, TypographyFingerprint};
pub use error::{ContractError, PipelineError};
pub use pipeline::{
    default_contracts, rewrite, Artifact, Contract, ContractContext, ContractOutput,
    ContractPipeline, ContractReport, PipelineReport,
};
