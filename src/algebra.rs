//! Set algebra over attribute predicates, used to classify elements and links.
//!
//! A type is kept in disjunctive normal form: a set of disjuncts, each of
//! which is a set of required `(key, value)` predicates. A single-predicate
//! type such as `Kind = "app.repository"` is one disjunct with one predicate;
//! `a | b` is the union of the disjunct sets. Both levels are ordered sets, so
//! two types built from the same predicates compare equal regardless of the
//! order they were assembled in.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

/// A single required attribute assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Predicate {
    pub key: String,
    pub value: String,
}

impl Predicate {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

type Conjunct = BTreeSet<Predicate>;

/// A predicate set, or a disjunction of predicate sets.
///
/// Every attribute key is single-valued: a conjunct that requires two
/// different values for the same key can never be satisfied and is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawTypeSet")]
pub struct TypeSet {
    disjuncts: BTreeSet<Conjunct>,
}

/// Wire form of a [`TypeSet`], normalised on the way in.
#[derive(Deserialize)]
struct RawTypeSet {
    #[serde(default)]
    disjuncts: BTreeSet<Conjunct>,
}

impl From<RawTypeSet> for TypeSet {
    fn from(raw: RawTypeSet) -> Self {
        let satisfiable = raw
            .disjuncts
            .into_iter()
            .filter(is_satisfiable)
            .collect();
        TypeSet::normalized(satisfiable)
    }
}

impl TypeSet {
    /// The empty type. It matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A type made of one conjunction of predicates.
    pub fn from_predicates<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let conjunct: Conjunct = predicates.into_iter().collect();
        let mut disjuncts = BTreeSet::new();
        if is_satisfiable(&conjunct) {
            disjuncts.insert(conjunct);
        }
        Self { disjuncts }
    }

    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }

    /// Number of disjuncts after normalisation.
    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }

    pub fn union(&self, other: &TypeSet) -> TypeSet {
        let disjuncts = self
            .disjuncts
            .iter()
            .chain(other.disjuncts.iter())
            .cloned()
            .collect();
        Self::normalized(disjuncts)
    }

    pub fn intersect(&self, other: &TypeSet) -> TypeSet {
        let mut disjuncts = BTreeSet::new();
        for left in &self.disjuncts {
            for right in &other.disjuncts {
                let merged: Conjunct = left.union(right).cloned().collect();
                if is_satisfiable(&merged) {
                    disjuncts.insert(merged);
                }
            }
        }
        Self::normalized(disjuncts)
    }

    /// `true` iff every disjunct of `self` satisfies at least one disjunct of
    /// `other`, i.e. everything `self` describes is also described by `other`.
    pub fn is_subset_or_equal(&self, other: &TypeSet) -> bool {
        self.disjuncts
            .iter()
            .all(|candidate| covered_by(candidate, other))
    }

    /// `true` iff at least one disjunct of `self` satisfies `other`.
    ///
    /// For a type with a single disjunct this is the same as
    /// [`TypeSet::is_subset_or_equal`]; for an element classified by several
    /// independent providers it asks whether any of those classifications fits.
    pub fn any_subset_of(&self, other: &TypeSet) -> bool {
        self.disjuncts
            .iter()
            .any(|candidate| covered_by(candidate, other))
    }

    /// The value required for `key`, if every disjunct requires the same one.
    pub fn required_value(&self, key: &str) -> Option<&str> {
        let mut found: Option<&str> = None;
        for conjunct in &self.disjuncts {
            let value = conjunct
                .iter()
                .find(|p| p.key == key)
                .map(|p| p.value.as_str())?;
            match found {
                Some(existing) if existing != value => return None,
                _ => found = Some(value),
            }
        }
        found
    }

    pub fn disjuncts(&self) -> impl Iterator<Item = &BTreeSet<Predicate>> {
        self.disjuncts.iter()
    }

    /// Drops disjuncts that are strictly more specific than another disjunct,
    /// since the more general one already matches everything they do.
    fn normalized(disjuncts: BTreeSet<Conjunct>) -> TypeSet {
        let kept = disjuncts
            .iter()
            .filter(|candidate| {
                !disjuncts
                    .iter()
                    .any(|other| other != *candidate && other.is_subset(candidate))
            })
            .cloned()
            .collect();
        TypeSet { disjuncts: kept }
    }
}

fn covered_by(candidate: &Conjunct, query: &TypeSet) -> bool {
    query
        .disjuncts
        .iter()
        .any(|required| required.is_subset(candidate))
}

fn is_satisfiable(conjunct: &Conjunct) -> bool {
    // Ordered by (key, value), so conflicting values for a key are adjacent.
    let mut previous: Option<&Predicate> = None;
    for predicate in conjunct {
        if let Some(prev) = previous {
            if prev.key == predicate.key {
                return false;
            }
        }
        previous = Some(predicate);
    }
    true
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.disjuncts.is_empty() {
            return write!(f, "<empty>");
        }
        let rendered: Vec<String> = self
            .disjuncts
            .iter()
            .map(|conjunct| {
                let parts: Vec<String> = conjunct
                    .iter()
                    .map(|p| format!("{}={}", p.key, p.value))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            })
            .collect();
        write!(f, "{}", rendered.join(" | "))
    }
}

macro_rules! classification_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(TypeSet);

        impl $name {
            pub fn empty() -> Self {
                Self(TypeSet::empty())
            }

            /// A singleton type requiring one attribute value.
            pub fn from_predicate(key: impl Into<String>, value: impl Into<String>) -> Self {
                Self(TypeSet::from_predicates([Predicate::new(key, value)]))
            }

            pub fn from_predicates<I>(predicates: I) -> Self
            where
                I: IntoIterator<Item = (String, String)>,
            {
                Self(TypeSet::from_predicates(
                    predicates.into_iter().map(|(k, v)| Predicate::new(k, v)),
                ))
            }

            pub fn value(&self) -> &TypeSet {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn union(&self, other: &Self) -> Self {
                Self(self.0.union(&other.0))
            }

            pub fn intersect(&self, other: &Self) -> Self {
                Self(self.0.intersect(&other.0))
            }

            pub fn is_subset_or_equal(&self, other: &Self) -> bool {
                self.0.is_subset_or_equal(&other.0)
            }

            pub fn any_subset_of(&self, other: &Self) -> bool {
                self.0.any_subset_of(&other.0)
            }

            pub fn required_value(&self, key: &str) -> Option<&str> {
                self.0.required_value(key)
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                self.union(&rhs)
            }
        }

        impl<'a> BitOr for &'a $name {
            type Output = $name;

            fn bitor(self, rhs: &'a $name) -> $name {
                self.union(rhs)
            }
        }

        impl<'a> BitAnd for &'a $name {
            type Output = $name;

            fn bitand(self, rhs: &'a $name) -> $name {
                self.intersect(rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

classification_type!(
    /// Classification of graph elements.
    ElementType
);

classification_type!(
    /// Classification of links between elements.
    LinkType
);
