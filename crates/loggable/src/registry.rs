//! Directive table.
//!
//! Maps owning types and individual methods to their [`Loggable`]
//! directives. The table is built at startup (explicit registration calls or
//! configuration) and read-only afterwards; the interceptor shares it behind
//! an `Arc`.

use std::collections::HashMap;

use loggable_core::Loggable;
use loggable_core::logging::{debug, targets, warn};

use crate::signature::MethodSignature;

/// Where a resolved directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveSource {
    /// Declared on the method itself.
    Method,
    /// Declared on the owning type.
    Type,
}

/// The directive that applies to one call.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    /// The effective directive.
    pub directive: &'a Loggable,
    /// Whether it was declared on the method or the type.
    pub source: DirectiveSource,
}

/// Directives keyed by owning type and method name.
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    types: HashMap<String, Loggable>,
    methods: HashMap<String, HashMap<String, Loggable>>,
}

impl DirectiveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `directive` for every method of the type named `owner`.
    pub fn annotate_type(&mut self, owner: impl Into<String>, directive: Loggable) {
        let owner = owner.into();
        debug!(target: targets::REGISTRY, "type directive for {}: {:?}", owner, directive);
        self.types.insert(owner, directive);
    }

    /// Declares `directive` for every method of `T`.
    pub fn annotate_type_of<T: ?Sized>(&mut self, directive: Loggable) {
        self.annotate_type(std::any::type_name::<T>(), directive);
    }

    /// Declares `directive` for method `name` of the type named `owner`.
    pub fn annotate_method(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        directive: Loggable,
    ) {
        let owner = owner.into();
        let name = name.into();
        if crate::signature::OBJECT_PROTOCOL.contains(&name.as_str()) {
            warn!(
                target: targets::REGISTRY,
                "directive on {}#{} has no effect: object-protocol methods are never intercepted",
                owner,
                name
            );
        }
        debug!(target: targets::REGISTRY, "method directive for {}#{}: {:?}", owner, name, directive);
        self.methods.entry(owner).or_default().insert(name, directive);
    }

    /// Declares `directive` for method `name` of `T`.
    pub fn annotate_method_of<T: ?Sized>(&mut self, name: impl Into<String>, directive: Loggable) {
        self.annotate_method(std::any::type_name::<T>(), name, directive);
    }

    /// Builder-style [`annotate_type`](Self::annotate_type).
    #[must_use]
    pub fn with_type(mut self, owner: impl Into<String>, directive: Loggable) -> Self {
        self.annotate_type(owner, directive);
        self
    }

    /// Builder-style [`annotate_method`](Self::annotate_method).
    #[must_use]
    pub fn with_method(
        mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        directive: Loggable,
    ) -> Self {
        self.annotate_method(owner, name, directive);
        self
    }

    /// The directive declared on the method itself, if any.
    #[must_use]
    pub fn method_directive(&self, owner: &str, name: &str) -> Option<&Loggable> {
        self.methods.get(owner)?.get(name)
    }

    /// The directive declared on the type, if any.
    #[must_use]
    pub fn type_directive(&self, owner: &str) -> Option<&Loggable> {
        self.types.get(owner)
    }

    /// Resolves the directive for a call to `signature`.
    ///
    /// A method directive wins over the type directive outright. Returns
    /// `None` when neither exists.
    #[must_use]
    pub fn resolve(&self, signature: &MethodSignature) -> Option<Resolution<'_>> {
        if let Some(directive) = self.method_directive(signature.owner(), signature.name()) {
            return Some(Resolution {
                directive,
                source: DirectiveSource::Method,
            });
        }
        self.type_directive(signature.owner())
            .map(|directive| Resolution {
                directive,
                source: DirectiveSource::Type,
            })
    }

    /// Number of declared directives (type and method).
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.methods.values().map(HashMap::len).sum::<usize>()
    }

    /// Returns true if no directive is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
