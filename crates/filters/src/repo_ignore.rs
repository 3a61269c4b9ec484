//! `ignore_directories([...])` declarations in the repo-metadata file.

use std::path::Path;

use logging::{trace_ignore, warn_directive};

use crate::syntax::{Token, TokenKind, tokenize};
use crate::{IgnoreError, PatternSet};

const IGNORE_DIRECTORIES: &str = "ignore_directories";

/// Extracts the `ignore_directories` patterns from repo-metadata source.
///
/// Only the first top-level `ignore_directories(...)` call is honoured. Its
/// single argument must be a list literal; string elements are validated
/// as globs (invalid ones are reported and dropped) and any other element is
/// skipped. `path` is only used to label errors.
pub(crate) fn parse(path: &Path, source: &str) -> Result<PatternSet, IgnoreError> {
    let tokens = tokenize(source).map_err(|source| IgnoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(start) = find_call(&tokens) else {
        return Ok(PatternSet::new());
    };
    let arguments = split_arguments(&tokens[start + 2..]);
    if arguments.len() != 1 {
        return Err(IgnoreError::ArgumentCount {
            path: path.to_path_buf(),
            found: arguments.len(),
        });
    }

    let argument = arguments[0];
    let is_list = argument.first().is_some_and(|t| t.is_punct('['))
        && argument.last().is_some_and(|t| t.is_punct(']'))
        && closes_at_end(argument);
    if !is_list {
        let found = match argument {
            [single] => single.describe(),
            [first, ..] if first.is_punct('[') => "list comprehension or expression",
            [first, ..] => first.describe(),
            [] => "empty expression",
        };
        return Err(IgnoreError::ArgumentType {
            path: path.to_path_buf(),
            found,
        });
    }

    let mut patterns = PatternSet::new();
    for element in split_arguments(&argument[1..]) {
        let [token] = element else {
            continue;
        };
        let Some(pattern) = token.string() else {
            continue;
        };
        if let Err(error) = patterns.push(pattern) {
            warn_directive!("the ignore_directories() pattern {pattern:?} is not valid: {error}");
        }
    }
    trace_ignore!("loaded {} ignore_directories patterns", patterns.len());
    Ok(patterns)
}

/// Index of the first statement-level `ignore_directories (` pair.
fn find_call(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    let mut statement_start = true;
    for (index, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Comment(_) => continue,
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0
            && statement_start
            && token.word() == Some(IGNORE_DIRECTORIES)
            && tokens.get(index + 1).is_some_and(|next| next.is_punct('('))
        {
            return Some(index);
        }
        statement_start = depth == 0
            && matches!(token.kind, TokenKind::Newline | TokenKind::Punct(';'));
    }
    None
}

/// Splits the tokens following an opening bracket into its comma-separated
/// elements, stopping at the matching close. A trailing comma adds nothing.
fn split_arguments(tokens: &[Token]) -> Vec<&[Token]> {
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') if depth == 0 => {
                push_element(&mut elements, &tokens[start..index]);
                return elements;
            }
            TokenKind::Punct(')' | ']' | '}') => depth -= 1,
            TokenKind::Punct(',') if depth == 0 => {
                push_element(&mut elements, &tokens[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    push_element(&mut elements, &tokens[start..]);
    elements
}

fn push_element<'a>(elements: &mut Vec<&'a [Token]>, element: &'a [Token]) {
    let trimmed = strip_comments(element);
    if !trimmed.is_empty() {
        elements.push(trimmed);
    }
}

fn strip_comments(tokens: &[Token]) -> &[Token] {
    let is_comment = |t: &Token| matches!(t.kind, TokenKind::Comment(_));
    let start = tokens.iter().position(|t| !is_comment(t)).unwrap_or(tokens.len());
    let end = tokens.iter().rposition(|t| !is_comment(t)).map_or(start, |i| i + 1);
    &tokens[start..end]
}

/// True when the bracket opened by the first token closes at the last one.
fn closes_at_end(tokens: &[Token]) -> bool {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => {
                depth -= 1;
                if depth == 0 {
                    return index + 1 == tokens.len();
                }
            }
            _ => {}
        }
    }
    false
}
