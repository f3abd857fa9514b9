#![warn(missing_docs)]
//! YAML Editor Core - incremental, error-tolerant YAML structure for headless editors
//!
//! # Overview
//!
//! `yaml-editor-core` answers the questions an editor asks about a YAML buffer while the user
//! types: which tokens cover the visible range, and which spans can be folded. It never fails on
//! malformed input; scan errors become `Invalid` tokens and the rest of the document is still
//! tokenized.
//!
//! # Core Features
//!
//! - **Lazy tokenization**: a per-version token cache scans only as far as a query needs
//! - **Error tolerance**: scan errors are recovered in place, bounded by an error budget
//! - **Region extraction**: nested blocks and multi-line scalars become foldable regions
//! - **Version tracking**: caches are keyed on the document version and rebuilt on change
//! - **Derived state**: token classes, fold line ranges, and syntax diagnostics as
//!   [`ProcessingEdit`]s
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Processing (classes, folds, diagnostics)   │  ← Host-facing edits
//! ├─────────────────────────────────────────────┤
//! │  DocumentParser (version + notifications)   │  ← Query surface
//! ├─────────────────────────────────────────────┤
//! │  Region Extractor                           │  ← Fold structure
//! ├─────────────────────────────────────────────┤
//! │  TokenBuffer (lazy, per version)            │  ← Token cache
//! ├─────────────────────────────────────────────┤
//! │  Scanner (yaml-editor-core-scanner)         │  ← Tokenizer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use yaml_editor_core::{DocumentParser, TextDocument};
//!
//! let mut doc = TextDocument::new("server:\n  ports:\n    - 80\n    - 443\n");
//! let mut parser = DocumentParser::new();
//!
//! parser.subscribe(|change| {
//!     println!("re-query {:?}", change.affected);
//! });
//!
//! let visible = parser.tokens_overlapping(&doc, 0, 7).count();
//! assert!(visible > 0);
//!
//! let regions = parser.regions(&doc);
//! assert_eq!(regions.len(), 2);
//! assert_eq!(regions[0].start.line, 2);
//!
//! doc.insert(0, "# config\n").unwrap();
//! let change = parser.document_changed(&doc).unwrap();
//! assert_eq!(change.new_version, 1);
//! ```
//!
//! # Module Description
//!
//! - [`source`] - scanner adapter contract
//! - [`token_buffer`] - lazily filled, version-keyed token cache
//! - [`regions`] - foldable region extraction
//! - [`document`] - versioned rope-backed text
//! - [`parser`] - per-document parse state and change notifications
//! - [`classification`] / [`folds`] / [`diagnostics`] - derived editor state
//! - [`processing`] - derived state as [`ProcessingEdit`]s

pub mod classification;
pub mod delta;
pub mod diagnostics;
pub mod document;
pub mod folds;
pub mod intervals;
pub mod line_index;
pub mod parser;
pub mod processing;
pub mod regions;
pub mod source;
pub mod token_buffer;

pub use classification::{TokenClass, classify, classify_tokens};
pub use delta::{TextDelta, TextDeltaEdit};
pub use diagnostics::{
    DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticRange, DiagnosticSeverity, syntax_diagnostics,
};
pub use document::{DocumentError, TextDocument};
pub use folds::fold_regions;
pub use intervals::{FoldRegion, Interval, StyleId, StyleLayerId};
pub use line_index::LineIndex;
pub use parser::{DocumentParser, ParseTreeChanged, ParseTreeChangedCallback, ParserConfig};
pub use processing::{DocumentProcessor, ProcessingEdit, YamlProcessor, YamlProcessorConfig};
pub use regions::{COLLAPSED_TEXT, Region, extract_regions, regions_overlapping, sort_regions};
pub use source::TokenSource;
pub use token_buffer::{AllTokens, DEFAULT_ERROR_BUDGET, TokenBuffer, TokenBufferConfig};

pub use yaml_editor_core_scanner as scanner;
pub use yaml_editor_core_scanner::{Mark, ScanError, Scanner, ScannerConfig, Token, TokenKind};
