//! RERA Harvester - Collect registered project records from the Odisha RERA portal.
//!
//! This crate drives a browser through the portal's project list, snapshots
//! each project's detail tabs and extracts a fixed set of fields from the
//! rendered markup into flat JSON records.
//!
//! # Example
//!
//! ```
//! use rera_harvester::{assemble_snapshots, RecordAssembler, ExtractorConfig};
//!
//! let overview = r#"<app-project-overview>
//!     <div class="details-project">
//!       <label class="label-control">RERA Regd. No.</label>
//!       <strong>RP/01/2024/00123</strong>
//!     </div>
//!   </app-project-overview>"#;
//!
//! let assembler = RecordAssembler::new(ExtractorConfig::default()).unwrap();
//! let record = assemble_snapshots(&assembler, overview, None).unwrap();
//!
//! assert_eq!(record.registration_number.to_string(), "RP/01/2024/00123");
//! assert_eq!(record.gst_number.to_string(), "Not Found");
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Portal constants, extractor and run settings, validation
//! - [`types`]: Core data types (FieldResult, ProjectRecord, etc.)
//! - [`error`]: Error types and Result alias
//! - [`html`]: Parsed page snapshots and DOM helpers
//! - [`extract`]: Label-driven field extraction
//! - [`assemble`]: Record assembly from the two detail snapshots
//! - [`http`]: WebDriver endpoint preflight
//! - [`browser`]: Browser orchestration over WebDriver
//! - [`output`]: JSON output
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Batch run over the project list

pub mod assemble;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod html;
pub mod http;
pub mod output;
pub mod types;

// Re-export main functions
pub use harvester::{assemble_snapshots, scrape_projects, HarvestReport};

// Re-export commonly used items
pub use assemble::RecordAssembler;
pub use config::{ExtractorConfig, ScrapeConfig};
pub use error::{HarvesterError, Result};
pub use extract::{FieldExtractor, SearchContext};
pub use html::DocumentFragment;
pub use types::{FieldName, FieldResult, ProjectListing, ProjectRecord};
