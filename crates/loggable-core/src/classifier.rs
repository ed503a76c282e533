//! Ignore-set matching for failures.
//!
//! A failure is *ignored* when its kind, any parent in its chain, or any
//! capability reachable from either (capabilities may list capabilities of
//! their own) carries a name from the directive's ignore set. The walk is a
//! plain depth-first search; listing the root kind matches everything.

use crate::failure::FailureKind;

/// Whether a failure of kind `thrown` matches any name in `ignored`.
///
/// An empty ignore set never matches.
#[must_use]
pub fn is_ignored<S: AsRef<str>>(ignored: &[S], thrown: &FailureKind) -> bool {
    ignored
        .iter()
        .any(|name| descends_from(thrown, name.as_ref()))
}

/// Whether `kind` is `name` or reaches it through parents or capabilities.
#[must_use]
pub fn descends_from(kind: &FailureKind, name: &str) -> bool {
    kind.name() == name
        || kind.parent().is_some_and(|parent| descends_from(parent, name))
        || kind
            .capabilities()
            .iter()
            .any(|capability| descends_from(capability, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::kinds;

    static AUDITED: FailureKind = FailureKind::root("test::Audited");
    static REPORTABLE_CAPS: [&FailureKind; 1] = [&AUDITED];
    static REPORTABLE: FailureKind =
        FailureKind::root("test::Reportable").with_capabilities(&REPORTABLE_CAPS);

    static LEDGER_CAPS: [&FailureKind; 1] = [&REPORTABLE];
    static LEDGER: FailureKind =
        FailureKind::extends("test::Ledger", &kinds::FAILURE).with_capabilities(&LEDGER_CAPS);
    static OVERDRAWN: FailureKind = FailureKind::extends("test::Overdrawn", &LEDGER);

    #[test]
    fn empty_set_never_matches() {
        let none: [&str; 0] = [];
        assert!(!is_ignored(&none, &kinds::NOT_FOUND));
        assert!(!is_ignored(&none, &kinds::FAILURE));
    }

    #[test]
    fn exact_kind_matches() {
        assert!(is_ignored(&["io::NotFound"], &kinds::NOT_FOUND));
    }

    #[test]
    fn parent_kind_matches_child() {
        assert!(is_ignored(&["io::Error"], &kinds::NOT_FOUND));
    }

    #[test]
    fn child_kind_does_not_match_parent() {
        assert!(!is_ignored(&["io::NotFound"], &kinds::IO));
    }

    #[test]
    fn unrelated_kind_does_not_match() {
        assert!(!is_ignored(&["Panic"], &kinds::NOT_FOUND));
        assert!(!is_ignored(&["io::PermissionDenied"], &kinds::NOT_FOUND));
    }

    #[test]
    fn root_matches_everything_below_it() {
        assert!(is_ignored(&["Failure"], &kinds::TIMED_OUT));
        assert!(is_ignored(&["Failure"], &OVERDRAWN));
        assert!(is_ignored(&["Failure"], &kinds::PANIC));
    }

    #[test]
    fn direct_capability_matches() {
        assert!(is_ignored(&["Transient"], &kinds::TIMED_OUT));
        assert!(!is_ignored(&["Transient"], &kinds::NOT_FOUND));
    }

    #[test]
    fn capability_of_ancestor_matches() {
        assert!(is_ignored(&["test::Reportable"], &OVERDRAWN));
    }

    #[test]
    fn capability_of_capability_matches() {
        assert!(is_ignored(&["test::Audited"], &OVERDRAWN));
    }

    #[test]
    fn any_member_of_the_set_suffices() {
        let ignored = vec!["Panic".to_string(), "io::Error".to_string()];
        assert!(is_ignored(&ignored, &kinds::NOT_FOUND));
    }

    #[test]
    fn is_a_delegates_to_walk() {
        assert!(OVERDRAWN.is_a("test::Ledger"));
        assert!(!LEDGER.is_a("test::Overdrawn"));
    }
}
