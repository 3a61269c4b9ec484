//! Default build-file loader.
//!
//! Reads just enough of a build file for the walker: `# <prefix>:key value`
//! directive comments and the `out` / `outs` attributes of top-level calls.
//! Bracket balance and string termination are checked so a broken file is
//! reported instead of half-read.

use std::fs;

use filters::syntax::{Token, TokenKind, tokenize};
use logging::trace_cache;

use crate::{BuildFile, BuildFileError, BuildFileLoader, BuildFileRequest, DeclaredOutput, Directive};

/// [`BuildFileLoader`] that scans directives and declared outputs.
#[derive(Clone, Debug)]
pub struct DirectiveScanner {
    prefix: String,
}

impl DirectiveScanner {
    /// Creates a scanner recognising `# <prefix>:key value` directives.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Builds a descriptor from build-file source text.
    pub fn scan(&self, path: &std::path::Path, pkg: &str, source: &str) -> Result<BuildFile, BuildFileError> {
        let tokens = tokenize(source).map_err(|source| BuildFileError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file = BuildFile::new(path, pkg);
        file.directives = tokens
            .iter()
            .filter_map(|token| match &token.kind {
                TokenKind::Comment(text) => self.directive(text),
                _ => None,
            })
            .collect();
        file.outputs = declared_outputs(&tokens);
        Ok(file)
    }

    /// Parses `#<ws><prefix>:<key><ws><value>`; the key is word characters.
    fn directive(&self, comment: &str) -> Option<Directive> {
        let body = comment.strip_prefix('#')?.trim_start();
        let rest = body.strip_prefix(self.prefix.as_str())?.strip_prefix(':')?;
        let key_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if key_len == 0 {
            return None;
        }
        let (key, value) = rest.split_at(key_len);
        Some(Directive::new(key, value.trim()))
    }
}

impl Default for DirectiveScanner {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DIRECTIVE_PREFIX)
    }
}

impl BuildFileLoader for DirectiveScanner {
    fn load(&self, request: &BuildFileRequest<'_>) -> Result<Option<BuildFile>, BuildFileError> {
        let Some(name) = request.matching_name() else {
            return Ok(None);
        };
        let path = request.dir.join(name);
        let source = fs::read_to_string(&path).map_err(|source| BuildFileError::Read {
            path: path.clone(),
            source,
        })?;
        let file = self.scan(&path, request.rel, &source)?;
        trace_cache!(
            "scanned {}: {} directives, {} outputs",
            path.display(),
            file.directives.len(),
            file.outputs.len()
        );
        Ok(Some(file))
    }
}

/// Collects `out = "x"` and `outs = [...]` keyword arguments written directly
/// inside a top-level call.
fn declared_outputs(tokens: &[Token]) -> Vec<DeclaredOutput> {
    let code: Vec<&Token> = tokens
        .iter()
        .filter(|token| !matches!(token.kind, TokenKind::Comment(_)))
        .collect();
    let mut outputs = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut index = 0;
    while index < code.len() {
        let token = code[index];
        match &token.kind {
            TokenKind::Punct(c @ ('(' | '[' | '{')) => stack.push(*c),
            TokenKind::Punct(')' | ']' | '}') => {
                stack.pop();
            }
            TokenKind::Word(word)
                if stack == ['(']
                    && (word == "out" || word == "outs")
                    && code.get(index + 1).is_some_and(|t| t.is_punct('='))
                    && code.get(index.saturating_sub(1)).is_some_and(|t| t.is_punct('(') || t.is_punct(',')) =>
            {
                let value = &code[index + 2..];
                match value.first().map(|t| &t.kind) {
                    Some(TokenKind::Str(name)) if word == "out" => {
                        outputs.push(DeclaredOutput::Single(name.clone()));
                        index += 3;
                        continue;
                    }
                    Some(TokenKind::Punct('[')) if word == "outs" => {
                        let mut names = Vec::new();
                        let mut end = 1;
                        while let Some(item) = value.get(end) {
                            match &item.kind {
                                TokenKind::Punct(']') => break,
                                TokenKind::Str(name) => names.push(name.clone()),
                                _ => {}
                            }
                            end += 1;
                        }
                        if !names.is_empty() {
                            outputs.push(DeclaredOutput::Multiple(names));
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        index += 1;
    }
    outputs
}
