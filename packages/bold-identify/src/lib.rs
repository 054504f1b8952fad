//! bold-identify - Identify COI barcode sequences with BOLD Systems.
//!
//! This crate submits nucleotide sequences to the BOLD Systems identification
//! engine and turns the returned XML into tables of matches, one table per
//! sequence.
//!
//! # Example
//!
//! ```
//! use bold_identify::{parse::parse_response, Table};
//!
//! let xml = r#"<matches><match><ID>GBMIN1</ID><similarity>0.99</similarity></match></matches>"#;
//! let table = Table::from_records(&parse_response(xml).unwrap());
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.get(0, "ID"), Some("GBMIN1"));
//! assert_eq!(table.get(0, "citation"), None);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Endpoint constants, database selector, client options
//! - [`types`]: Queries, match records, raw responses
//! - [`error`]: Error types and Result alias
//! - [`http`]: Request dispatch and response validation
//! - [`xml`]: XML utilities
//! - [`parse`]: Match extraction from response XML
//! - [`table`]: Column-union table assembly
//! - [`identify`]: Per-sequence orchestration
//! - [`fasta`]: FASTA input for the CLI
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod fasta;
pub mod http;
pub mod identify;
pub mod parse;
pub mod table;
pub mod types;
pub mod xml;

// Re-export main functions
pub use identify::{identify, identify_one, identify_with};

// Re-export commonly used items
pub use config::{ClientOptions, Database};
pub use error::{IdentifyError, Result};
pub use table::{Table, TableBuilder};
pub use types::{Identification, MatchRecord, Query, RawResponse, Specimen};
