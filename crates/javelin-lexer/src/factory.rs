//! Scanner construction.
//!
//! A [`ScannerFactory`] owns the keyword table and hands out scanners that
//! share it, so scanning many units never rebuilds the table.

use std::sync::Arc;

use crate::error::LexicalError;
use crate::lexer::{KeywordTable, NameTable, Scanner, Token};
use crate::source::SourceUnit;

/// Options that change how source text is scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Emit comments as [`TokenKind::Comment`](crate::TokenKind::Comment) tokens
    pub keep_comments: bool,
    /// Lex `_` as an identifier, as Java 8 and earlier did
    pub allow_underscore_identifier: bool,
}

impl ScannerOptions {
    /// Sets `keep_comments`.
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Sets `allow_underscore_identifier`.
    pub fn allow_underscore_identifier(mut self, allow: bool) -> Self {
        self.allow_underscore_identifier = allow;
        self
    }
}

/// The result of scanning a whole unit.
#[derive(Debug, Clone)]
pub struct ScannedUnit {
    /// The unit that was scanned
    pub source: SourceUnit,
    /// Every token, ending with the EOF sentinel
    pub tokens: Vec<Token>,
    /// Every lexical error, in source order
    pub errors: Vec<LexicalError>,
    /// Names of the unit's identifiers; resolves [`Token::name`]
    pub names: NameTable,
}

impl ScannedUnit {
    /// Returns true if scanning reported any error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Builds scanners that share one keyword table.
#[derive(Debug, Clone)]
pub struct ScannerFactory {
    keywords: Arc<KeywordTable>,
    options: ScannerOptions,
}

impl ScannerFactory {
    /// Creates a factory with default options.
    pub fn new() -> Self {
        Self::with_options(ScannerOptions::default())
    }

    /// Creates a factory with the given options.
    pub fn with_options(options: ScannerOptions) -> Self {
        let keywords = Arc::new(KeywordTable::for_options(&options));
        tracing::debug!(keywords = keywords.len(), ?options, "built keyword table");
        Self { keywords, options }
    }

    /// The shared keyword table.
    pub fn keywords(&self) -> &Arc<KeywordTable> {
        &self.keywords
    }

    /// The options given to every scanner.
    pub fn options(&self) -> ScannerOptions {
        self.options
    }

    /// Creates a scanner over in-memory text.
    ///
    /// `keep_comments` overrides the factory setting for this scanner only.
    pub fn new_scanner(&self, text: &str, keep_comments: bool) -> Scanner {
        let options = self.options.keep_comments(keep_comments);
        Scanner::with_parts(
            SourceUnit::new("<input>", text),
            Arc::clone(&self.keywords),
            options,
        )
    }

    /// Creates a scanner bound to `unit`.
    pub fn scanner_for(&self, unit: SourceUnit) -> Scanner {
        Scanner::with_parts(unit, Arc::clone(&self.keywords), self.options)
    }

    /// Scans every unit in parallel, one scanner per unit, preserving order.
    #[cfg(feature = "parallel")]
    pub fn tokenize_units(&self, units: Vec<SourceUnit>) -> Vec<ScannedUnit> {
        use rayon::prelude::*;

        tracing::debug!(units = units.len(), "tokenizing in parallel");
        units
            .into_par_iter()
            .map(|unit| self.scanner_for(unit).scan_all())
            .collect()
    }

    /// Scans every unit in order on the current thread.
    #[cfg(not(feature = "parallel"))]
    pub fn tokenize_units(&self, units: Vec<SourceUnit>) -> Vec<ScannedUnit> {
        units
            .into_iter()
            .map(|unit| self.scanner_for(unit).scan_all())
            .collect()
    }
}

impl Default for ScannerFactory {
    fn default() -> Self {
        Self::new()
    }
}
