#![forbid(unsafe_code)]
//! Strings database toolkit for Rust.
//!
//! All translations of a project live in one plain-text strings file.
//! From it twine generates Apple `.strings`, Android `strings.xml`, gettext
//! and Django `.po`, jQuery localize JSON, Flash `.properties` and Tizen
//! string tables. It can also read those files back into the database.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use twine::{FormatType, Options, StringsFile};
//!
//! let strings = StringsFile::read_from("strings.txt")?;
//! let formatter = FormatType::Android.formatter();
//! if let Some(xml) = formatter.format_file(&strings, "fr", &Options::new())? {
//!     std::fs::write("values-fr/strings.xml", xml)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Strings file
//!
//! ```text
//! [[General]]
//! 	[yes]
//! 		en = Yes
//! 		tags = app,web
//! 		fr = Oui
//! ```
//!
//! Rows belong to sections, carry one value per language plus optional
//! comment and tags, and may reference another row to inherit what they do
//! not set themselves. The first language listed is the developer language.

pub mod consumer;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod formats;
pub mod options;
pub mod placeholder;
pub mod processor;
mod strings_file;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    consumer::{Consumer, UNCATEGORIZED_SECTION},
    diagnostics::{CollectingSink, DiagnosticSink, TracingSink},
    error::Error,
    formats::{FormatType, Formatter, Registry},
    options::{IncludeMode, Options},
    processor::OutputProcessor,
    types::{Row, RowId, Section, StringsFile},
    validation::validate_strings_file,
};
