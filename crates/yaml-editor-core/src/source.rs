//! The scanner-adapter contract consumed by [`TokenBuffer`](crate::TokenBuffer).

use yaml_editor_core_scanner::{ScanError, Scanner, Token};

/// A pull-based producer of tokens that can resume after a scan error.
///
/// Implementations return `Ok(None)` once the stream is finished and keep returning it on every
/// later call. After an `Err`, the next call continues with the input that follows the reported
/// span.
pub trait TokenSource {
    /// Pull the next token.
    fn next_token(&mut self) -> Result<Option<Token>, ScanError>;
}

impl TokenSource for Scanner {
    fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        Scanner::next_token(self)
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        (**self).next_token()
    }
}
