// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL that tokenizes each entered snippet.

use crate::report;
use javelin_lexer::{LexicalErrorKind, ScannedUnit, Scanner, ScannerFactory, SourceUnit, TokenKind};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// REPL configuration constants
const HISTORY_FILE: &str = ".javelin_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Comments,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let rest = input.trim().strip_prefix('.')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "load" | "l" => Some((ReplCommand::Load, arg)),
            "comments" | "c" => Some((ReplCommand::Comments, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Tokenize a Java source file"),
            (".comments", "Toggle emitting comments as tokens"),
        ]
    }
}

/// Helper struct for rustyline: completion from the keyword table,
/// highlighting and validation from the scanner itself
struct JavelinHelper {
    factory: ScannerFactory,
    words: Vec<String>,
}

impl JavelinHelper {
    fn new(factory: ScannerFactory) -> Self {
        let mut words: Vec<String> = factory.keywords().words().map(String::from).collect();
        words.extend(
            ["String", "Object", "System", "System.out.println", "Integer", "List", "Map"]
                .into_iter()
                .map(String::from),
        );
        words.extend(
            ReplCommand::all_commands()
                .iter()
                .filter_map(|(cmd, _)| cmd.split_whitespace().next())
                .map(String::from),
        );
        words.sort();
        words.dedup();

        Self { factory, words }
    }

    fn word_start(line: &str, pos: usize) -> usize {
        line[..pos]
            .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '$' && c != '.')
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl Completer for JavelinHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = Self::word_start(line, pos);
        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .words
            .iter()
            .filter(|w| w.starts_with(word))
            .map(|w| Pair {
                display: w.clone(),
                replacement: w[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for JavelinHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = &line[Self::word_start(line, pos)..];
        if word.len() < 2 {
            return None;
        }

        self.words
            .iter()
            .find(|w| w.starts_with(word) && w.len() > word.len())
            .map(|w| (&w[word.len()..]).dimmed().to_string())
    }
}

impl Highlighter for JavelinHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if ReplCommand::parse(line).is_some() {
            return Cow::Owned(line.magenta().to_string());
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut offset = 0;
        for token in self.factory.new_scanner(line, true) {
            result.push_str(&line[offset..token.span.start]);
            let raw = &line[token.span.start..token.span.end];
            result.push_str(&report::paint(token.kind.category(), raw));
            offset = token.span.end;
        }
        result.push_str(&line[offset..]);

        Cow::Owned(result)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for JavelinHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_incomplete(&self.factory, ctx.input()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Helper for JavelinHelper {}

/// True while a block comment is open or more braces, brackets or
/// parentheses were opened than closed.
fn is_incomplete(factory: &ScannerFactory, input: &str) -> bool {
    if ReplCommand::parse(input).is_some() {
        return false;
    }

    let mut scanner = factory.new_scanner(input, false);
    let mut depth = 0i32;
    for token in scanner.by_ref() {
        match token.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket | TokenKind::LeftParen => depth += 1,
            TokenKind::RightBrace | TokenKind::RightBracket | TokenKind::RightParen => depth -= 1,
            _ => {}
        }
    }

    let open_comment = scanner
        .errors()
        .iter()
        .any(|e| e.kind == LexicalErrorKind::UnterminatedComment);
    open_comment || depth > 0
}

/// A scanner over `unit` sharing the factory's keyword table, with the
/// REPL's current comment setting.
fn scanner_for(factory: &ScannerFactory, unit: SourceUnit, keep_comments: bool) -> Scanner {
    let options = factory.options().keep_comments(keep_comments);
    Scanner::with_parts(unit, Arc::clone(factory.keywords()), options)
}

/// The interactive token REPL
pub struct Repl {
    factory: ScannerFactory,
    keep_comments: bool,
    editor: Editor<JavelinHelper, DefaultHistory>,
    history_path: PathBuf,
    counter: usize,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(factory: ScannerFactory) -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(JavelinHelper::new(factory.clone())));

        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("javelin")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "cannot create history directory");
            }
        }

        if editor.load_history(&history_path).is_err() {
            tracing::debug!(path = %history_path.display(), "no history loaded");
        }

        Ok(Self {
            keep_comments: factory.options().keep_comments,
            factory,
            editor,
            history_path,
            counter: 0,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "javelin>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.tokenize_and_print(&line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::warn!(error = %e, "cannot save history");
        }

        println!();
        Ok(())
    }

    fn print_banner(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!(
            "  {} {} {}",
            "Javelin Java Lexer".white().bold(),
            "v".dimmed(),
            version.bright_yellow()
        );
        println!(
            "  {}",
            "Type Java code to see its tokens".dimmed()
        );
        println!();
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => {
                self.print_help();
                CommandResult::Continue
            }
            ReplCommand::Exit => CommandResult::Exit,
            ReplCommand::Clear => {
                print!("\x1B[2J\x1B[H");
                CommandResult::Continue
            }
            ReplCommand::Version => {
                self.print_version();
                CommandResult::Continue
            }
            ReplCommand::Load => {
                if let Some(path) = arg {
                    self.load_file(path);
                } else {
                    eprintln!(
                        "{}: {} {}",
                        "Error".red().bold(),
                        ".load".cyan(),
                        "requires a file path".dimmed()
                    );
                }
                CommandResult::Continue
            }
            ReplCommand::Comments => {
                self.keep_comments = !self.keep_comments;
                let state = if self.keep_comments { "on" } else { "off" };
                println!("{} {}", "comments:".dimmed(), state.yellow());
                CommandResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:16} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!(
            "  {:16} {}",
            "Ctrl+C".yellow(),
            "Cancel current input".dimmed()
        );
        println!("  {:16} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:16} {}", "Tab".yellow(), "Autocomplete".dimmed());
        println!();
    }

    fn print_version(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!("{}: {}", "Javelin".bright_cyan().bold(), version.yellow());
        println!();
    }

    fn load_file(&mut self, path: &str) {
        match SourceUnit::from_file(path) {
            Ok(unit) => {
                let scanned = self.scan(unit);
                self.print_unit(&scanned);
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
            }
        }
    }

    fn tokenize_and_print(&mut self, input: &str) {
        self.counter += 1;
        let unit = SourceUnit::new(format!("<repl:{}>", self.counter), input);
        let scanned = self.scan(unit);
        self.print_unit(&scanned);
    }

    fn scan(&self, unit: SourceUnit) -> ScannedUnit {
        scanner_for(&self.factory, unit, self.keep_comments).scan_all()
    }

    fn print_unit(&self, scanned: &ScannedUnit) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = report::write_tokens(&mut out, &scanned.tokens, true) {
            tracing::warn!(error = %e, "cannot write tokens");
        }
        drop(out);
        report::print_diagnostics(scanned);
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".load Test.java"),
            Some((ReplCommand::Load, Some("Test.java")))
        ));
        assert!(matches!(
            ReplCommand::parse(".comments"),
            Some((ReplCommand::Comments, None))
        ));
        assert!(ReplCommand::parse("not a command").is_none());
        assert!(ReplCommand::parse(".5f").is_none());
    }

    #[test]
    fn test_is_incomplete() {
        let factory = ScannerFactory::new();
        assert!(!is_incomplete(&factory, "int x = (1 + 2);"));
        assert!(is_incomplete(&factory, "class A {"));
        assert!(is_incomplete(&factory, "foo(bar[1]"));
        assert!(is_incomplete(&factory, "/* still open"));
        assert!(!is_incomplete(&factory, "String s = \"(\";"));
        assert!(!is_incomplete(&factory, ".load A.java"));
    }

    #[test]
    fn test_scans_share_the_keyword_table() {
        let factory = ScannerFactory::new();
        let scanner = scanner_for(&factory, SourceUnit::new("<repl:1>", "/* c */ int x;"), true);
        assert!(Arc::ptr_eq(scanner.keywords(), factory.keywords()));
        assert!(scanner.options().keep_comments);

        let scanned = scanner.scan_all();
        assert!(matches!(scanned.tokens[0].kind, TokenKind::Comment(_)));
        assert_eq!(scanned.tokens[1].kind, TokenKind::Int);
    }

    #[test]
    fn test_completion_words_come_from_keywords() {
        let helper = JavelinHelper::new(ScannerFactory::new());
        assert!(helper.words.iter().any(|w| w == "synchronized"));
        assert!(helper.words.iter().any(|w| w == ".comments"));
        assert!(helper.words.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_highlight_keeps_text() {
        let helper = JavelinHelper::new(ScannerFactory::new());
        let line = "int x = 42; // note";
        let highlighted = helper.highlight(line, 0);
        for piece in ["int", "x", "42", "// note"] {
            assert!(highlighted.contains(piece));
        }
    }
}
