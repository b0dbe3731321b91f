//! # warnscan-core
//!
//! Core engine for extracting and aggregating static-analysis warnings from
//! build output.
//!
//! This crate provides the foundational traits and types for building warning
//! scanners. It includes:
//!
//! - [`Annotation`] — the uniform model one detected warning is normalized to
//! - [`WarningParser`] trait for format-specific parsers
//! - [`ParserRegistry`] resolving group names to parser sets
//! - [`Scanner`] driving pattern expansion, parsing, and aggregation
//! - [`ModuleResolver`] inferring module names from build descriptors
//! - [`ParserResult`] — the merged annotation set, counts, and scan log
//!
//! ## Example
//!
//! ```ignore
//! use warnscan_core::{CancelToken, Scanner};
//!
//! let scanner = Scanner::builder()
//!     .workspace("./build")
//!     .file_pattern("**/*.log", "Java Compiler")
//!     .detect_modules(true)
//!     .build()?;
//!
//! let result = scanner.scan(&registry)?;
//! println!("{} warning(s)", result.number_of_warnings());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod annotation;
mod modules;
mod parser;
mod registry;
mod result;
mod scan;

pub use annotation::{Annotation, AnnotationError, Priority, LINE_BREAK};
pub use modules::{ModuleResolver, NullResolver, WorkspaceModules};
pub use parser::{ParserBox, ParserFactory, WarningParser};
pub use registry::ParserRegistry;
pub use result::ParserResult;
pub use scan::{CancelToken, FileScanConfig, ScanError, Scanner, ScannerBuilder};
