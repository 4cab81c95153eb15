//! Operation scope: include/exclude membership over operation identifiers.
//!
//! A scope is built once at configuration time and only read afterwards, so
//! matching needs no synchronization.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which side of the member set a scope selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Match only the listed operations.
    Include,
    /// Match every operation except the listed ones.
    Exclude,
}

impl Polarity {
    pub fn opposite(self) -> Self {
        match self {
            Polarity::Include => Polarity::Exclude,
            Polarity::Exclude => Polarity::Include,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Include => "include",
            Polarity::Exclude => "exclude",
        }
    }
}

/// Set of operations a behavior applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationScope {
    polarity: Polarity,
    members: HashSet<String>,
}

impl OperationScope {
    pub fn new<I, S>(polarity: Polarity, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            polarity,
            members: operations.into_iter().map(Into::into).collect(),
        }
    }

    /// Scope matching only `operations`.
    pub fn include<I, S>(operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Polarity::Include, operations)
    }

    /// Scope matching everything but `operations`.
    pub fn exclude<I, S>(operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Polarity::Exclude, operations)
    }

    /// Membership test. Empty include matches nothing, empty exclude matches all.
    pub fn matches(&self, operation: &str) -> bool {
        let listed = self.members.contains(operation);
        match self.polarity {
            Polarity::Include => listed,
            Polarity::Exclude => !listed,
        }
    }

    /// Same members, flipped polarity. The member set is copied.
    pub fn opposite(&self) -> Self {
        Self {
            polarity: self.polarity.opposite(),
            members: self.members.clone(),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}
