//! Method identity and interception eligibility.

use std::borrow::Cow;
use std::fmt;

/// Method names that are never intercepted.
///
/// Formatting, hashing, equality and copying helpers are called implicitly
/// (often by logging itself), so intercepting them would recurse or flood
/// the log.
pub const OBJECT_PROTOCOL: &[&str] = &[
    "fmt",
    "to_string",
    "hash",
    "eq",
    "ne",
    "clone",
    "clone_from",
    "can_equal",
];

/// Visibility of the intercepted method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// `pub` API; eligible for interception.
    #[default]
    Public,
    /// Crate-private or narrower; never intercepted.
    Restricted,
}

/// Identifies an intercepted method: its owning type and its name.
///
/// The owner is also the log target of every message about the method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    owner: Cow<'static, str>,
    name: Cow<'static, str>,
    visibility: Visibility,
}

impl MethodSignature {
    /// A public method `name` on the type named `owner`.
    #[must_use]
    pub fn new(owner: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            visibility: Visibility::Public,
        }
    }

    /// A public method `name` on `T`, named by [`std::any::type_name`].
    #[must_use]
    pub fn of<T: ?Sized>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(std::any::type_name::<T>(), name)
    }

    /// Marks the method as non-public.
    #[must_use]
    pub fn restricted(mut self) -> Self {
        self.visibility = Visibility::Restricted;
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Name of the owning type.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visibility of the method.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether this is an object-protocol method.
    #[must_use]
    pub fn is_object_protocol(&self) -> bool {
        OBJECT_PROTOCOL.contains(&self.name())
    }

    /// Whether the interceptor may wrap this method at all.
    ///
    /// Only public, non-object-protocol methods are eligible, whatever
    /// directives exist.
    #[must_use]
    pub fn is_interceptable(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_object_protocol()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ledger;

    #[test]
    fn of_uses_type_name() {
        let sig = MethodSignature::of::<Ledger>("withdraw");
        assert!(sig.owner().ends_with("Ledger"));
        assert_eq!(sig.name(), "withdraw");
        assert_eq!(sig.visibility(), Visibility::Public);
    }

    #[test]
    fn public_methods_are_interceptable() {
        assert!(MethodSignature::new("app::Ledger", "withdraw").is_interceptable());
    }

    #[test]
    fn restricted_methods_are_not() {
        let sig = MethodSignature::new("app::Ledger", "withdraw").restricted();
        assert!(!sig.is_interceptable());
    }

    #[test]
    fn object_protocol_is_excluded() {
        for name in OBJECT_PROTOCOL {
            let sig = MethodSignature::new("app::Ledger", *name);
            assert!(sig.is_object_protocol());
            assert!(!sig.is_interceptable(), "{name} should not be interceptable");
        }
    }

    #[test]
    fn display_joins_owner_and_name() {
        let sig = MethodSignature::new("app::Ledger", "balance");
        assert_eq!(sig.to_string(), "app::Ledger#balance");
    }

    #[test]
    fn signatures_key_hash_sets_by_visibility() {
        use std::collections::HashSet;

        let public = MethodSignature::new("app::Ledger", "withdraw");
        let restricted = public.clone().restricted();
        let set: HashSet<_> = [public.clone(), restricted, public].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
