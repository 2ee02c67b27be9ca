/*!
# Error Type

This module provides the error enum returned by the fallible entry points of
`idp_pathfind`. Unreachability between `start` and `end` is not an error (it
is the empty path/edge set); only a handful of checkable caller-contract
violations surface here.
*/

use std::error::Error as StdError;
use std::fmt;

/// Error type for `idp_pathfind` operations.
#[derive(Debug)]
pub enum Error {
    /// The monoid vector was configured with zero coordinates (`k == 0`).
    EmptyCostVector,

    /// A caller-supplied `unique_id()` collided between two distinct domain
    /// states. Only detected in debug builds.
    DuplicateNodeId(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyCostVector => {
                write!(f, "monoid vector must have at least one coordinate")
            }
            Error::DuplicateNodeId(id) => {
                write!(f, "two distinct domain states share unique_id {}", id)
            }
        }
    }
}

impl StdError for Error {}
