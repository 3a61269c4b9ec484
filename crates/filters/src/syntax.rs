//! Tokenizer for the build-file language.
//!
//! Only enough of the language is understood to find call statements, list
//! literals, string values and comments: identifiers, numbers and keywords are
//! all [`TokenKind::Word`]. Newlines are significant only outside brackets,
//! where they end a statement. Bracket balance and string termination are
//! checked, everything else is left to the consumer.

use crate::SyntaxError;

/// Kind and payload of a token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// Identifier, keyword or number.
    Word(String),
    /// String literal with escapes decoded.
    Str(String),
    /// Single punctuation or operator character.
    Punct(char),
    /// Comment text including the leading `#`.
    Comment(String),
    /// End of a logical line outside any bracket.
    Newline,
}

/// Token with its one-based source position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// Token kind and payload.
    pub kind: TokenKind,
    /// Line the token starts on.
    pub line: usize,
    /// Column the token starts at.
    pub column: usize,
}

impl Token {
    /// Returns true if this is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    /// Returns the word text if this is a [`TokenKind::Word`].
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(word) => Some(word),
            _ => None,
        }
    }

    /// Returns the decoded value if this is a [`TokenKind::Str`].
    pub fn string(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            TokenKind::Word(_) => "identifier",
            TokenKind::Str(_) => "string",
            TokenKind::Punct('(') => "parenthesized expression",
            TokenKind::Punct('{') => "dict",
            TokenKind::Punct(_) => "operator",
            TokenKind::Comment(_) => "comment",
            TokenKind::Newline => "newline",
        }
    }
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    brackets: Vec<(char, usize, usize)>,
    tokens: Vec<Token>,
}

/// Splits `source` into tokens.
///
/// # Errors
///
/// Returns [`SyntaxError`] for an unterminated string, a closing bracket that
/// does not match the innermost open one, or an open bracket left at end of
/// input.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
        brackets: Vec::new(),
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' => {
                    self.bump();
                    let pending = self
                        .tokens
                        .last()
                        .is_some_and(|token| token.kind != TokenKind::Newline);
                    if self.brackets.is_empty() && pending {
                        self.push(TokenKind::Newline, line, column);
                    }
                }
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\\' => {
                    self.bump();
                    if self.chars.peek() == Some(&'\n') {
                        self.bump();
                    } else {
                        self.push(TokenKind::Punct('\\'), line, column);
                    }
                }
                '#' => {
                    let mut text = String::new();
                    while let Some(&next) = self.chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        text.push(next);
                        self.bump();
                    }
                    self.push(TokenKind::Comment(text), line, column);
                }
                '"' | '\'' => {
                    let value = self.string(false, line, column)?;
                    self.push(TokenKind::Str(value), line, column);
                }
                '(' | '[' | '{' => {
                    self.bump();
                    self.brackets.push((c, line, column));
                    self.push(TokenKind::Punct(c), line, column);
                }
                ')' | ']' | '}' => {
                    self.bump();
                    let open = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match self.brackets.pop() {
                        Some((found, _, _)) if found == open => {}
                        Some((found, open_line, open_column)) => {
                            return Err(SyntaxError::new(
                                line,
                                column,
                                format!(
                                    "unexpected '{c}', '{found}' opened at {open_line}:{open_column} is still open"
                                ),
                            ));
                        }
                        None => {
                            return Err(SyntaxError::new(line, column, format!("unexpected '{c}'")));
                        }
                    }
                    self.push(TokenKind::Punct(c), line, column);
                }
                c if c.is_alphanumeric() || c == '_' => {
                    let mut word = String::new();
                    while let Some(&next) = self.chars.peek() {
                        if !(next.is_alphanumeric() || next == '_' || next == '.') {
                            break;
                        }
                        word.push(next);
                        self.bump();
                    }
                    let prefix = matches!(word.to_ascii_lowercase().as_str(), "r" | "b" | "rb" | "br");
                    if prefix && matches!(self.chars.peek(), Some('"' | '\'')) {
                        let raw = word.to_ascii_lowercase().contains('r');
                        let value = self.string(raw, line, column)?;
                        self.push(TokenKind::Str(value), line, column);
                    } else {
                        self.push(TokenKind::Word(word), line, column);
                    }
                }
                other => {
                    self.bump();
                    self.push(TokenKind::Punct(other), line, column);
                }
            }
        }
        if let Some((open, line, column)) = self.brackets.pop() {
            return Err(SyntaxError::new(line, column, format!("'{open}' is never closed")));
        }
        Ok(())
    }

    fn string(&mut self, raw: bool, line: usize, column: usize) -> Result<String, SyntaxError> {
        let unterminated = || SyntaxError::new(line, column, "unterminated string literal");
        let quote = self.bump().ok_or_else(unterminated)?;
        let mut triple = false;
        if self.chars.peek() == Some(&quote) {
            self.bump();
            if self.chars.peek() == Some(&quote) {
                self.bump();
                triple = true;
            } else {
                return Ok(String::new());
            }
        }

        let mut value = String::new();
        let mut closing = 0;
        loop {
            let c = self.bump().ok_or_else(unterminated)?;
            if c == quote {
                if !triple {
                    return Ok(value);
                }
                closing += 1;
                if closing == 3 {
                    return Ok(value);
                }
                continue;
            }
            for _ in 0..closing {
                value.push(quote);
            }
            closing = 0;
            match c {
                '\n' if !triple => return Err(unterminated()),
                '\\' => {
                    let escaped = self.bump().ok_or_else(unterminated)?;
                    if raw {
                        value.push('\\');
                        value.push(escaped);
                        continue;
                    }
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\n' => {}
                        '\\' | '"' | '\'' => value.push(escaped),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                other => value.push(other),
            }
        }
    }
}
