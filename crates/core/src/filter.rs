//! Stack name filtering with shell-style globs.
//!
//! Supported syntax: `*` (any run of characters), `?` (one character),
//! `[...]` character classes with ranges and `^`/`!` negation, and `\` to
//! escape the next character.

use regex::Regex;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct NameFilter {
    glob: String,
    regex: Regex,
}

fn push_escaped(regex: &mut String, c: char) {
    regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
}

fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::from("^");
    let mut chars = glob.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escaped(&mut regex, escaped);
                }
            }
            '[' => {
                regex.push('[');
                let mut first = true;
                // An unterminated class is left open so compilation reports it.
                while let Some(c) = chars.next() {
                    match c {
                        ']' => {
                            regex.push(']');
                            break;
                        }
                        '^' | '!' if first => regex.push('^'),
                        '-' => regex.push('-'),
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                push_escaped(&mut regex, escaped);
                            }
                        }
                        _ => push_escaped(&mut regex, c),
                    }
                    first = false;
                }
            }
            _ => push_escaped(&mut regex, c),
        }
    }

    regex.push('$');
    regex
}

impl NameFilter {
    /// Compiles a glob. An empty glob matches everything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Glob`] for malformed globs such as an unterminated
    /// character class.
    pub fn new(glob: &str) -> Result<Self> {
        let glob = if glob.is_empty() { "*" } else { glob };
        let regex =
            Regex::new(&glob_to_regex(glob)).map_err(|e| Error::Glob(glob.to_string(), e))?;

        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    #[must_use]
    pub fn glob(&self) -> &str {
        &self.glob
    }
}
