//! Directive file parsing.
//!
//! A directive file is the plain-text alternative to TOML:
//!
//! ```text
//! # comment
//! gopkg /chrisify https://github.com/zikes/chrisify
//! gopkg /myrepo hg https://bitbucket.org/zikes/myrepo
//! gopkg "/github/$1/$2" https://github.com/$1/$2
//! ```
//!
//! Each line yields the raw argument list after the directive name. Argument
//! counts are not checked here; validation reports them with the entry index.

use thiserror::Error;

/// The only directive understood.
pub const DIRECTIVE: &str = "gopkg";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("line {line}: unknown directive `{name}`")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: unterminated quote")]
    UnterminatedQuote { line: usize },
}

/// Parse a directive file into raw argument lists, in file order.
pub fn parse_directives(input: &str) -> Result<Vec<Vec<String>>, DirectiveError> {
    let mut entries = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let mut tokens = tokenize(line, number)?.into_iter();

        let Some(name) = tokens.next() else {
            continue;
        };
        if name != DIRECTIVE {
            return Err(DirectiveError::UnknownDirective { line: number, name });
        }

        entries.push(tokens.collect());
    }

    Ok(entries)
}

/// Split a line on whitespace. Double quotes group a token; `#` at the start
/// of an unquoted token comments out the rest of the line.
fn tokenize(line: &str, number: usize) -> Result<Vec<String>, DirectiveError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        match chars.peek() {
            None | Some('#') => break,
            Some('"') => {
                chars.next();
                let mut token = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    token.push(c);
                }
                if !closed {
                    return Err(DirectiveError::UnterminatedQuote { line: number });
                }
                tokens.push(token);
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    token.push(c);
                }
                tokens.push(token);
            }
        }
    }

    Ok(tokens)
}
