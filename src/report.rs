// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token listings and diagnostics for the terminal.

use javelin_lexer::{LexicalError, ScannedUnit, SourceUnit, Token, TokenCategory};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes one line per token: `line:column  Kind  text`.
pub fn write_tokens(out: &mut impl Write, tokens: &[Token], color: bool) -> io::Result<()> {
    for token in tokens.iter().filter(|t| !t.is_eof()) {
        let position = format!("{}:{}", token.line, token.column);
        let kind = format!("{:?}", token.kind);
        let text = token.text.escape_debug().to_string();

        if color {
            writeln!(
                out,
                "{:>8}  {:24} {}",
                position.dimmed(),
                kind,
                paint(token.kind.category(), &text)
            )?;
        } else {
            writeln!(out, "{:>8}  {:24} {}", position, kind, text)?;
        }
    }
    Ok(())
}

/// Writes the closing line for a unit.
pub fn write_summary(out: &mut impl Write, unit: &ScannedUnit) -> io::Result<()> {
    let count = unit.tokens.iter().filter(|t| !t.is_eof()).count();
    let status = if unit.has_errors() {
        format!("{} error(s)", unit.errors.len()).red().to_string()
    } else {
        "ok".green().to_string()
    };
    writeln!(
        out,
        "{} {}: {} tokens, {}",
        "==>".bright_cyan(),
        unit.source.name().white().bold(),
        count,
        status
    )
}

/// Prints every error of `unit` to stderr with the offending source line.
pub fn print_diagnostics(unit: &ScannedUnit) {
    for error in &unit.errors {
        print_diagnostic(&unit.source, error);
    }
}

/// Prints one error to stderr, `name:line:column: error: message`.
pub fn print_diagnostic(source: &SourceUnit, error: &LexicalError) {
    let position = error.position;
    eprintln!(
        "{}:{}:{}: {}: {}",
        source.name(),
        position.line,
        position.column,
        "error".red().bold(),
        error.kind
    );
    if let Some(line) = source.line_text(position.line) {
        let indent: String = line
            .chars()
            .take(position.column.saturating_sub(1) as usize)
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        eprintln!("    {}", line);
        eprintln!("    {}{}", indent, "^".red().bold());
    }
}

/// Colors `text` by token category.
pub fn paint(category: TokenCategory, text: &str) -> String {
    match category {
        TokenCategory::Keyword => text.magenta().bold().to_string(),
        TokenCategory::IntegerLiteral | TokenCategory::FloatLiteral => text.yellow().to_string(),
        TokenCategory::StringLiteral | TokenCategory::CharLiteral => text.green().to_string(),
        TokenCategory::BooleanLiteral | TokenCategory::NullLiteral => text.blue().to_string(),
        TokenCategory::Operator => text.cyan().to_string(),
        TokenCategory::Punctuation => text.yellow().dimmed().to_string(),
        TokenCategory::Comment => text.dimmed().to_string(),
        TokenCategory::Error => text.red().underline().to_string(),
        TokenCategory::Identifier | TokenCategory::Eof => text.to_string(),
    }
}
