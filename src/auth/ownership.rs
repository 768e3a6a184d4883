//! Authenticated identity and the per-resource ownership rule.
//!
//! A caller may read identity-scoped data or mutate a resource only when
//! their authenticated identity equals the resource's owner field. Resources
//! with several identity fields (an order has a customer and a provider)
//! name the field to compare through [`Owned::Field`]; the route decides
//! which one applies.

use crate::error::AuthError;
use std::fmt;

/// Identity extracted from a verified session credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a caller-supplied identity parameter (e.g. `?email=`).
    ///
    /// A missing parameter is a mismatch.
    pub fn ensure_matches(&self, claimed: Option<&str>) -> Result<(), AuthError> {
        match claimed {
            Some(claimed) if claimed == self.0 => Ok(()),
            _ => Err(AuthError::OwnershipMismatch),
        }
    }

    /// Check that this identity owns `resource` through `field`.
    ///
    /// A resource with no value in `field` is owned by nobody.
    pub fn ensure_owns<R: Owned>(&self, resource: &R, field: R::Field) -> Result<(), AuthError> {
        self.ensure_matches(resource.owner_identity(field))
    }

    /// Like [`ensure_owns`](Self::ensure_owns) for a lookup that may have
    /// found nothing. A missing resource is refused the same way as someone
    /// else's, so the answer does not reveal which ids exist.
    pub fn ensure_owns_found<'r, R: Owned>(
        &self,
        resource: Option<&'r R>,
        field: R::Field,
    ) -> Result<&'r R, AuthError> {
        let resource = resource.ok_or(AuthError::OwnershipMismatch)?;
        self.ensure_owns(resource, field)?;
        Ok(resource)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A stored resource carrying one or more owner-identity fields.
pub trait Owned {
    /// Which identity field to compare against.
    type Field: Copy + fmt::Debug;

    fn owner_identity(&self, field: Self::Field) -> Option<&str>;
}
