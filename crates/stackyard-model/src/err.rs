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

//! Error types shared by the bay model, the condenser and the search crates.
//!
//! None of these errors are recoverable inside the library: they signal a
//! caller bug, a broken bookkeeping invariant or an unknown configuration
//! name, and are returned to the driver for reporting.

/// Why a relocation request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelocationFault {
    /// The destination stack is already at the height limit.
    DestinationFull,
    /// The source stack holds no item.
    SourceEmpty,
    /// Source and destination are the same stack.
    SameStack,
    /// One of the stack indices is out of bounds.
    OutOfBounds,
    /// No other stack has room for the item.
    NoDestination,
}

impl std::fmt::Display for RelocationFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelocationFault::DestinationFull => write!(f, "destination stack is full"),
            RelocationFault::SourceEmpty => write!(f, "source stack is empty"),
            RelocationFault::SameStack => write!(f, "source and destination are the same stack"),
            RelocationFault::OutOfBounds => write!(f, "stack index out of bounds"),
            RelocationFault::NoDestination => write!(f, "no other stack has room"),
        }
    }
}

/// An unrecognized configuration name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigurationError {
    /// Unknown lower bound selector.
    BoundVersion(String),
    /// Unknown worklist exploration strategy.
    ExplorationStrategy(String),
    /// Unknown heuristic policy name.
    Policy(String),
    /// Unknown maximum height rule.
    HeightLimit(String),
    /// Unknown condensation procedure.
    Condensation(String),
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::BoundVersion(name) => {
                write!(f, "unknown lower bound version '{}'", name)
            }
            ConfigurationError::ExplorationStrategy(name) => {
                write!(f, "unknown branch-and-bound strategy '{}'", name)
            }
            ConfigurationError::Policy(name) => write!(f, "invalid policy '{}'", name),
            ConfigurationError::HeightLimit(name) => {
                write!(f, "unknown maximum height rule '{}'", name)
            }
            ConfigurationError::Condensation(name) => {
                write!(f, "unknown condensation procedure '{}'", name)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// The error type for operations on a bay state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BayError {
    /// A relocation was requested that the state cannot perform.
    InvalidRelocation {
        from: usize,
        to: usize,
        fault: RelocationFault,
    },
    /// The top of the stack a retrieval was requested from is not the next
    /// item due (`found` is `None` for an empty stack).
    InvalidRetrieval {
        stack: usize,
        expected: usize,
        found: Option<usize>,
    },
    /// A configuration name could not be resolved.
    Configuration(ConfigurationError),
    /// Bookkeeping reached a state that cannot occur for a valid log.
    InternalInconsistency(String),
}

impl std::fmt::Display for BayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BayError::InvalidRelocation { from, to, fault } => {
                write!(f, "invalid relocation from {} to {}: {}", from, to, fault)
            }
            BayError::InvalidRetrieval {
                stack,
                expected,
                found: Some(item),
            } => write!(
                f,
                "retrieving item {} from stack {} but the next to be retrieved is {}",
                item, stack, expected
            ),
            BayError::InvalidRetrieval {
                stack,
                expected,
                found: None,
            } => write!(
                f,
                "retrieving from empty stack {} but the next to be retrieved is {}",
                stack, expected
            ),
            BayError::Configuration(e) => write!(f, "configuration error: {}", e),
            BayError::InternalInconsistency(msg) => write!(f, "internal inconsistency: {}", msg),
        }
    }
}

impl std::error::Error for BayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BayError::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for BayError {
    fn from(e: ConfigurationError) -> Self {
        BayError::Configuration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_both_stacks_and_fault() {
        let err = BayError::InvalidRelocation {
            from: 2,
            to: 0,
            fault: RelocationFault::DestinationFull,
        };
        assert_eq!(
            err.to_string(),
            "invalid relocation from 2 to 0: destination stack is full"
        );
    }

    #[test]
    fn test_configuration_error_converts_and_keeps_source() {
        let err: BayError = ConfigurationError::Policy("LA-x".to_string()).into();
        assert!(matches!(err, BayError::Configuration(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "configuration error: invalid policy 'LA-x'");
    }
}
