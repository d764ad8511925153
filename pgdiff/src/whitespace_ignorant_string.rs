use std::fmt::{Debug, Display};
use std::ops::Deref;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A string that treats every run of whitespace as a single space when comparing
/// equality, while still storing the original string.
///
/// Used for function bodies, where a dump tool may re-indent the source between versions.
#[repr(transparent)]
#[derive(Default, Eq, Clone, Serialize, Deserialize)]
pub struct WhitespaceIgnorantString(String);

impl WhitespaceIgnorantString {
    fn normalized(&self) -> String {
        self.0.split_whitespace().join(" ")
    }
}

impl Deref for WhitespaceIgnorantString {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WhitespaceIgnorantString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WhitespaceIgnorantString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Debug for WhitespaceIgnorantString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for WhitespaceIgnorantString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl PartialEq<Self> for WhitespaceIgnorantString {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}
