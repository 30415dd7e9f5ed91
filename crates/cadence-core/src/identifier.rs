//! Interned identifiers for nodes, edges and clusters.
//!
//! Every element of a diagram is addressed by an [`Id`]. Ids are interned in a
//! process-wide table so they are `Copy`, hash in constant time and compare by
//! symbol instead of by string contents.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all identifiers.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`, so ids may be created and resolved from any
/// thread. Diagrams built on different threads share the same table.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Stable identifier of a diagram element.
///
/// # Examples
///
/// ```
/// use cadence_core::identifier::Id;
///
/// let api = Id::new("api");
/// let auth = Id::new("auth");
///
/// let edge = Id::edge(api, auth);
/// assert_eq!(edge, "api->auth");
///
/// // Parallel edges are disambiguated with a numeric suffix
/// assert_eq!(edge.with_suffix(1), "api->auth#1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from its string form, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates the default identifier of an edge between two nodes.
    pub fn edge(source: Id, target: Id) -> Self {
        Self::new(&format!("{source}->{target}"))
    }

    /// Returns a new id formed by appending `#suffix` to this one.
    pub fn with_suffix(self, suffix: usize) -> Self {
        Self::new(&format!("{self}#{suffix}"))
    }

    /// Resolves the identifier back to an owned string.
    pub fn to_owned_string(self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_owned()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_owned_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
