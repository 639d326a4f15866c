//! This module provides the validated drive name type.
//!
//! A `DriveName` is only ever built from a syntactically valid drive letter,
//! so every value carries a canonical root such as `C:\`. Whether a drive
//! actually exists behind the letter is a question for the host, asked at
//! query time.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::DriveError;

/// Characters accepted as a path separator after the colon.
const SEPARATORS: [char; 2] = ['\\', '/'];

/// At most this many separators may follow the colon (`C:\\`, `C://`).
const MAX_SEPARATORS: usize = 2;

/// A validated drive letter with its canonical root path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DriveName {
    /// Uppercase ASCII drive letter
    letter: char,
    /// Canonical root path, always `<LETTER>:\`
    root: String,
}

impl DriveName {
    /// Parses a drive name.
    ///
    /// Accepts a single ASCII letter, optionally followed by a colon, which
    /// may in turn be followed by one or two `\` or `/` separators. Case and
    /// separator style are normalized away.
    ///
    /// # Examples
    ///
    /// ```
    /// use win_drive_info::DriveName;
    ///
    /// let drive = DriveName::parse("c://").unwrap();
    /// assert_eq!(drive.letter(), 'C');
    /// assert_eq!(drive.root(), "C:\\");
    ///
    /// assert!(DriveName::parse("Az").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<DriveName, DriveError> {
        let invalid = || DriveError::InvalidFormat {
            input: input.to_string(),
        };

        let mut chars = input.chars();
        let letter = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let separators = match rest.strip_prefix(':') {
            Some(separators) => separators,
            None if rest.is_empty() => rest,
            None => return Err(invalid()),
        };

        let well_formed = separators.chars().count() <= MAX_SEPARATORS
            && separators.chars().all(|c| SEPARATORS.contains(&c));
        if !well_formed {
            return Err(invalid());
        }

        tracing::trace!(input, %letter, "parsed drive name");
        Ok(DriveName::from_valid_letter(letter))
    }

    /// Parses a drive name that may be absent.
    ///
    /// `None` fails with [`DriveError::NullArgument`]; anything else behaves
    /// like [`DriveName::parse`].
    pub fn parse_optional(input: Option<&str>) -> Result<DriveName, DriveError> {
        match input {
            Some(input) => DriveName::parse(input),
            None => Err(DriveError::NullArgument),
        }
    }

    /// Builds a drive name from a bare letter.
    pub fn from_letter(letter: char) -> Result<DriveName, DriveError> {
        if letter.is_ascii_alphabetic() {
            Ok(DriveName::from_valid_letter(letter))
        } else {
            Err(DriveError::InvalidFormat {
                input: letter.to_string(),
            })
        }
    }

    pub(crate) fn from_valid_letter(letter: char) -> DriveName {
        let letter = letter.to_ascii_uppercase();
        DriveName {
            letter,
            root: format!("{letter}:\\"),
        }
    }

    /// Returns the uppercase drive letter.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Returns the canonical root path, e.g. `C:\`.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the root as a path.
    pub fn root_directory(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }
}

impl fmt::Display for DriveName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.root)
    }
}

impl FromStr for DriveName {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DriveName::parse(s)
    }
}
