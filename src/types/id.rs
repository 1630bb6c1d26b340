// ABOUTME: Opaque provider identifiers tagged with a phantom resource kind.
// ABOUTME: A distribution id cannot be passed where a stack or invalidation id is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub enum DistributionKind {}
pub enum InvalidationKind {}
pub enum StackKind {}

/// Identifier assigned by a provider, such as `E2EXAMPLE` or a stack ARN.
///
/// The contents are never parsed. Only the kind parameter differs between
/// id types, so trait impls are written by hand to avoid bounds on `K`.
#[must_use = "ids reference provider resources"]
pub struct Id<K> {
    raw: String,
    kind: PhantomData<fn() -> K>,
}

impl<K> Id<K> {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl<K> AsRef<str> for Id<K> {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl<K> Clone for Id<K> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<K> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Id<K> {}

impl<K> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?})", self.raw)
    }
}

impl<K> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub type DistributionId = Id<DistributionKind>;
pub type InvalidationId = Id<InvalidationKind>;
pub type StackId = Id<StackKind>;
