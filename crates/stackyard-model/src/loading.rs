// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Instance loader for the block relocation problem.
//!
//! Reads the plain-text bay layout used by the Caserta benchmark family and
//! turns it into a validated `Instance`. The first two tokens are the number
//! of stacks `W` and the number of items `n`; every stack then follows as its
//! height and that many item ids listed from bottom to top.
//!
//! The height capacity is not part of the file and is selected on the loader
//! through a `HeightLimit`. Lines may contain comments introduced by `#`, which
//! are ignored during tokenization. The parser accepts any `BufRead`, file
//! path, raw reader, or string slice.

use crate::instance::{HeightLimit, Instance, InstanceError};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum InstanceLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended unexpectedly (e.g., missing tokens).
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The bay must have at least one stack.
    InvalidDimensions,
    /// The declared item count does not match the listed items.
    ItemCountMismatch { declared: usize, found: usize },
    /// The listed items do not form a valid layout.
    InvalidLayout(InstanceError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "usize").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for InstanceLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => write!(f, "The number of stacks W must be positive"),
            Self::ItemCountMismatch { declared, found } => write!(
                f,
                "Instance declares {} items but lists {}",
                declared, found
            ),
            Self::InvalidLayout(e) => write!(f, "Invalid layout: {}", e),
        }
    }
}

impl std::error::Error for InstanceLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::InvalidLayout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for InstanceLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<InstanceError> for InstanceLoaderError {
    fn from(e: InstanceError) -> Self {
        Self::InvalidLayout(e)
    }
}

/// A configurable loader for bay layouts.
///
/// The format this parser expects is as follows (whitespace-separated tokens):
///
/// ```raw
/// W n
/// h_1 c_1_1 ... c_1_h_1   (height of stack 1, then its items bottom to top)
/// ...
/// h_W c_W_1 ... c_W_h_W
/// ```
///
/// # Configuration
/// * `height_limit`: How the stack capacity `H` is derived from the layout.
///   Defaults to `HeightLimit::Highest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceLoader {
    height_limit: HeightLimit,
}

impl InstanceLoader {
    /// Creates a new `InstanceLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule used to derive the height capacity.
    #[inline]
    pub fn height_limit(mut self, height_limit: HeightLimit) -> Self {
        self.height_limit = height_limit;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Instance, InstanceLoaderError> {
        let mut sc = Scanner::new(rdr);

        let num_stacks: usize = sc.next()?;
        let num_items: usize = sc.next()?;

        if num_stacks == 0 {
            return Err(InstanceLoaderError::InvalidDimensions);
        }

        // Sizes come from the input and are checked before anything is reserved.
        let mut stacks = Vec::new();
        let mut found = 0usize;
        for _ in 0..num_stacks {
            let height: usize = sc.next()?;
            if height > num_items - found {
                return Err(InstanceLoaderError::ItemCountMismatch {
                    declared: num_items,
                    found: found.saturating_add(height),
                });
            }
            let mut stack = Vec::new();
            for _ in 0..height {
                stack.push(sc.next::<usize>()?);
            }
            found += height;
            stacks.push(stack);
        }

        if found != num_items {
            return Err(InstanceLoaderError::ItemCountMismatch {
                declared: num_items,
                found,
            });
        }

        Ok(Instance::new(stacks, self.height_limit)?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Instance, InstanceLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Instance, InstanceLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Instance, InstanceLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, InstanceLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    fn next<T>(&mut self) -> Result<T, InstanceLoaderError>
    where
        T: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(InstanceLoaderError::UnexpectedEof);
            }

            let rest = &self.buf[self.pos..];
            let line = match rest.find('#') {
                Some(idx) => &rest[..idx],
                None => rest,
            };

            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                self.pos = self.buf.len();
                continue;
            }

            let start = self.pos + (line.len() - trimmed.len());
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let token = &self.buf[start..start + len];
            self.pos = start + len;

            return token.parse::<T>().map_err(|_| {
                InstanceLoaderError::Parse(ParseTokenError {
                    token: token.to_owned(),
                    type_name: std::any::type_name::<T>(),
                })
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_INSTANCE: &str = r#"
        3 6         # W=3 stacks, n=6 items
        2 5 1       # stack 0, bottom to top
        3 2 6 3
        1 4
    "#;

    #[test]
    fn test_loads_layout() {
        let inst = InstanceLoader::new()
            .height_limit(HeightLimit::PlusTwo)
            .from_str(SMALL_INSTANCE)
            .expect("Failed to load");

        assert_eq!(inst.num_stacks(), 3);
        assert_eq!(inst.num_items(), 6);
        assert_eq!(inst.max_height(), 5);
        assert_eq!(inst.stacks()[0], vec![5, 1]);
        assert_eq!(inst.stacks()[1], vec![2, 6, 3]);
        assert_eq!(inst.stacks()[2], vec![4]);
    }

    #[test]
    fn test_default_height_is_highest_stack() {
        let inst = InstanceLoader::new().from_str(SMALL_INSTANCE).unwrap();
        assert_eq!(inst.max_height(), 3);
    }

    #[test]
    fn test_empty_stacks_are_allowed() {
        let inst = InstanceLoader::new().from_str("2 1\n0\n1 1").unwrap();
        assert_eq!(inst.initial_height(0), 0);
        assert_eq!(inst.initial_height(1), 1);
    }

    #[test]
    fn test_parse_error_structure() {
        let res = InstanceLoader::new().from_str("2 x");
        match res {
            Err(InstanceLoaderError::Parse(e)) => {
                assert_eq!(e.token, "x");
                assert!(e.type_name.contains("usize"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_truncated_input() {
        let res = InstanceLoader::new().from_str("2 3\n2 1 2\n1");
        assert!(matches!(res, Err(InstanceLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_zero_stacks_are_rejected() {
        let res = InstanceLoader::new().from_str("0 0");
        assert!(matches!(res, Err(InstanceLoaderError::InvalidDimensions)));
    }

    #[test]
    fn test_item_count_mismatch() {
        let res = InstanceLoader::new().from_str("1 3\n2 1 2");
        assert!(matches!(
            res,
            Err(InstanceLoaderError::ItemCountMismatch {
                declared: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_oversized_stack_height_is_rejected_before_reading_items() {
        let res = InstanceLoader::new().from_str("1 1\n1152921504606846975 1");
        assert!(matches!(
            res,
            Err(InstanceLoaderError::ItemCountMismatch {
                declared: 1,
                found: 1152921504606846975
            })
        ));

        let res = InstanceLoader::new().from_str("2 2\n1 1\n18446744073709551615 2");
        assert!(matches!(
            res,
            Err(InstanceLoaderError::ItemCountMismatch {
                declared: 2,
                found: usize::MAX
            })
        ));
    }

    #[test]
    fn test_huge_declared_counts_fail_on_missing_input() {
        let res = InstanceLoader::new().from_str("1152921504606846975 1152921504606846975\n1 1");
        assert!(matches!(res, Err(InstanceLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_invalid_layout() {
        let res = InstanceLoader::new().from_str("2 2\n1 1\n1 1");
        assert!(matches!(
            res,
            Err(InstanceLoaderError::InvalidLayout(InstanceError::DuplicateItem {
                item: 1
            }))
        ));

        let res = InstanceLoader::new()
            .height_limit(HeightLimit::Fixed(1))
            .from_str("1 2\n2 1 2");
        assert!(matches!(
            res,
            Err(InstanceLoaderError::InvalidLayout(
                InstanceError::StackTooHigh { .. }
            ))
        ));
    }
}
