//! Run status and the severity floor.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Ordinal run status; doubles as the process exit code.
///
/// Higher values override lower ones when aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RunStatus {
    #[default]
    Ok = 0,
    UnexpectedError = 1,
    ArgumentError = 2,
    NoInputMatch = 3,
    ReadError = 4,
    WriteError = 5,
    TransformError = 6,
}

impl RunStatus {
    /// All statuses, in severity order.
    pub const ALL: [RunStatus; 7] = [
        Self::Ok,
        Self::UnexpectedError,
        Self::ArgumentError,
        Self::NoInputMatch,
        Self::ReadError,
        Self::WriteError,
        Self::TransformError,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// One-line meaning, used for `--help`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "There were no errors.",
            Self::UnexpectedError => "An unknown error occurred.",
            Self::ArgumentError => "There was a problem parsing the command line arguments.",
            Self::NoInputMatch => "An input file does not exist or is a directory.",
            Self::ReadError => "An I/O error occurred while reading an input file.",
            Self::WriteError => "An I/O error occurred while writing an output file.",
            Self::TransformError => "A BLT lexer or parser error occurred.",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::UnexpectedError => "unexpected error",
            Self::ArgumentError => "argument error",
            Self::NoInputMatch => "no input match",
            Self::ReadError => "read error",
            Self::WriteError => "write error",
            Self::TransformError => "transform error",
        };
        write!(f, "{name}")
    }
}

/// Process-wide worst-severity accumulator.
///
/// `raise` is an atomic max, so the floor never goes down no matter who
/// raises it or in which order.
#[derive(Debug, Default)]
pub struct StatusAggregator {
    floor: AtomicU8,
}

impl StatusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `status := max(status, code)`.
    pub fn raise(&self, code: RunStatus) {
        self.floor.fetch_max(code.code(), Ordering::AcqRel);
    }

    pub fn current(&self) -> RunStatus {
        // Only `raise` writes, and it only stores valid codes.
        RunStatus::from_code(self.floor.load(Ordering::Acquire)).unwrap_or(RunStatus::UnexpectedError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_ordinals() {
        for (i, status) in RunStatus::ALL.iter().enumerate() {
            assert_eq!(usize::from(status.code()), i);
            assert_eq!(RunStatus::from_code(status.code()), Some(*status));
        }
        assert_eq!(RunStatus::from_code(7), None);
    }

    #[test]
    fn starts_ok() {
        assert_eq!(StatusAggregator::new().current(), RunStatus::Ok);
    }

    #[test]
    fn raise_never_lowers() {
        let status = StatusAggregator::new();
        status.raise(RunStatus::ReadError);
        status.raise(RunStatus::NoInputMatch);
        status.raise(RunStatus::Ok);
        assert_eq!(status.current(), RunStatus::ReadError);

        status.raise(RunStatus::TransformError);
        status.raise(RunStatus::UnexpectedError);
        assert_eq!(status.current(), RunStatus::TransformError);
    }

    #[test]
    fn final_status_is_max_of_all_raises() {
        let sequences: &[&[RunStatus]] = &[
            &[RunStatus::NoInputMatch, RunStatus::ArgumentError],
            &[RunStatus::WriteError, RunStatus::ReadError, RunStatus::NoInputMatch],
            &[RunStatus::Ok],
            &[],
        ];
        for seq in sequences {
            let status = StatusAggregator::new();
            let mut previous = status.current();
            for code in seq.iter() {
                status.raise(*code);
                assert!(status.current() >= previous);
                previous = status.current();
            }
            let expected = seq.iter().copied().max().unwrap_or_default();
            assert_eq!(status.current(), expected);
        }
    }
}
