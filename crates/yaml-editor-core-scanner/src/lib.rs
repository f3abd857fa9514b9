#![warn(missing_docs)]
//! `yaml-editor-core-scanner` - a YAML tokenizer that keeps going after errors.
//!
//! The scanner turns YAML text into a flat stream of [`Token`]s. Block structure is made
//! explicit with `BlockSequenceStart` / `BlockMappingStart` / `BlockEnd` tokens, so consumers
//! can recover nesting without a full parser.
//!
//! Malformed input does not end the stream: [`Scanner::next_token`] returns a [`ScanError`]
//! describing the bad span and the next call carries on after it. Every [`Mark`] carries an
//! absolute character offset plus 1-based line and column.
//!
//! ```rust
//! use yaml_editor_core_scanner::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("items:\n  - a\n  - b\n");
//! let mut block_starts = 0;
//! while let Ok(Some(token)) = scanner.next_token() {
//!     if matches!(token.kind, TokenKind::BlockMappingStart | TokenKind::BlockSequenceStart) {
//!         block_starts += 1;
//!     }
//! }
//! assert_eq!(block_starts, 2);
//! ```

pub mod error;
pub mod mark;
pub mod scanner;
pub mod token;

pub use error::ScanError;
pub use mark::Mark;
pub use scanner::{Scanner, ScannerConfig};
pub use token::{ScalarStyle, Token, TokenKind};
