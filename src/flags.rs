//! Pattern flags and the normalized flag set.
//!
//! The recognized flags mirror the native engine's single-letter codes.
//! Normalization dedupes, lower-cases and always force-includes the
//! global-match flag.

use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// A single pattern flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Global,          // g — repeated matching
    CaseInsensitive, // i
    Multiline,       // m
    DotAll,          // s
    Unicode,         // u
    Sticky,          // y — each match must start where the previous ended
}

impl Flag {
    /// All flags in canonical display order.
    pub const ALL: [Flag; 6] = [
        Flag::Global,
        Flag::CaseInsensitive,
        Flag::Multiline,
        Flag::DotAll,
        Flag::Unicode,
        Flag::Sticky,
    ];

    /// The single-letter code for this flag.
    pub fn code(self) -> char {
        match self {
            Flag::Global => 'g',
            Flag::CaseInsensitive => 'i',
            Flag::Multiline => 'm',
            Flag::DotAll => 's',
            Flag::Unicode => 'u',
            Flag::Sticky => 'y',
        }
    }

    /// Parse a flag code, case-insensitively.
    pub fn from_code(c: char) -> Option<Flag> {
        match c.to_ascii_lowercase() {
            'g' => Some(Flag::Global),
            'i' => Some(Flag::CaseInsensitive),
            'm' => Some(Flag::Multiline),
            's' => Some(Flag::DotAll),
            'u' => Some(Flag::Unicode),
            'y' => Some(Flag::Sticky),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Flag::Global => 1 << 0,
            Flag::CaseInsensitive => 1 << 1,
            Flag::Multiline => 1 << 2,
            Flag::DotAll => 1 << 3,
            Flag::Unicode => 1 << 4,
            Flag::Sticky => 1 << 5,
        }
    }
}

/// A deduplicated set of [`Flag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet(u8);

impl FlagSet {
    pub fn empty() -> Self {
        FlagSet(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn union(self, other: FlagSet) -> FlagSet {
        FlagSet(self.0 | other.0)
    }

    /// The set with the global-match flag force-included.
    pub fn normalized(self) -> FlagSet {
        FlagSet(self.0 | Flag::Global.bit())
    }

    /// Flags present in this set, in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromStr for FlagSet {
    type Err = BuildError;

    /// Parse a flag string such as `"gim"`.  Duplicate characters collapse;
    /// upper-case codes are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = FlagSet::empty();
        for c in s.chars() {
            match Flag::from_code(c) {
                Some(flag) => set.insert(flag),
                None => return Err(BuildError::UnknownFlag(c)),
            }
        }
        Ok(set)
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.iter() {
            write!(f, "{}", flag.code())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_codes_collapse() {
        let set: FlagSet = "gg".parse().unwrap();
        assert_eq!(set.to_string(), "g");
    }

    #[test]
    fn upper_case_accepted() {
        let set: FlagSet = "GI".parse().unwrap();
        assert!(set.contains(Flag::Global));
        assert!(set.contains(Flag::CaseInsensitive));
    }

    #[test]
    fn normalized_forces_global() {
        let set: FlagSet = "im".parse().unwrap();
        assert!(!set.contains(Flag::Global));
        assert!(set.normalized().contains(Flag::Global));
        assert_eq!(set.normalized().to_string(), "gim");
    }

    #[test]
    fn unknown_flag_rejected() {
        assert_eq!("gx".parse::<FlagSet>(), Err(BuildError::UnknownFlag('x')));
    }

    #[test]
    fn canonical_display_order() {
        let set: FlagSet = "ysmig".parse().unwrap();
        assert_eq!(set.to_string(), "gimsy");
    }
}
