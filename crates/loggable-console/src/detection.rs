//! Agent/human context detection
//!
//! Determines whether log lines should carry ANSI styling.

/// Display context representing the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Agent context - plain output for machine parsing
    Agent,
    /// Human context - coloured level labels
    #[default]
    Human,
}

impl DisplayContext {
    /// Create an agent (plain output) context
    #[must_use]
    pub fn new_agent() -> Self {
        Self::Agent
    }

    /// Create a human (styled output) context
    #[must_use]
    pub fn new_human() -> Self {
        Self::Human
    }

    /// Auto-detect the display context from environment
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    /// Detect the display context, reading variables through `lookup`.
    ///
    /// A stderr that is not a terminal counts as agent context unless
    /// styling is forced.
    #[must_use]
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if should_enable_styling(&lookup) && (forced(&lookup) || stderr_is_term()) {
            Self::Human
        } else {
            Self::Agent
        }
    }

    /// Check if this is a human context (styled output enabled)
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this is an agent context (plain output)
    #[must_use]
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent)
    }
}

/// Determine if we're running in an agent context
#[must_use]
pub fn is_agent_context(lookup: impl Fn(&str) -> Option<String>) -> bool {
    // Generic agent indicators
    lookup("CI").is_some()
        || lookup("AGENT_MODE").is_some()
        // Explicit styling disable
        || lookup("LOGGABLE_PLAIN").is_some()
        || lookup("NO_COLOR").is_some()
}

/// Determine if styled output should be enabled
#[must_use]
pub fn should_enable_styling(lookup: impl Fn(&str) -> Option<String>) -> bool {
    // Explicit enable always wins
    if forced(&lookup) {
        return true;
    }
    !is_agent_context(lookup)
}

fn forced(lookup: &impl Fn(&str) -> Option<String>) -> bool {
    lookup("LOGGABLE_COLOR").is_some()
}

fn stderr_is_term() -> bool {
    console::Term::stderr().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(set: &'static [&'static str]) -> impl Fn(&str) -> Option<String> {
        move |key| set.iter().any(|s| *s == key).then(|| "1".to_string())
    }

    #[test]
    fn test_display_context_new_agent() {
        let ctx = DisplayContext::new_agent();
        assert!(ctx.is_agent());
        assert!(!ctx.is_human());
    }

    #[test]
    fn test_display_context_new_human() {
        let ctx = DisplayContext::new_human();
        assert!(ctx.is_human());
        assert!(!ctx.is_agent());
    }

    #[test]
    fn test_display_context_default_is_human() {
        assert!(DisplayContext::default().is_human());
    }

    #[test]
    fn test_agent_indicators() {
        assert!(is_agent_context(vars(&["CI"])));
        assert!(is_agent_context(vars(&["NO_COLOR"])));
        assert!(is_agent_context(vars(&["LOGGABLE_PLAIN"])));
        assert!(!is_agent_context(vars(&[])));
    }

    #[test]
    fn test_force_color_wins() {
        assert!(should_enable_styling(vars(&["CI", "LOGGABLE_COLOR"])));
        assert_eq!(
            DisplayContext::detect_with(vars(&["NO_COLOR", "LOGGABLE_COLOR"])),
            DisplayContext::Human
        );
    }

    #[test]
    fn test_agent_context_detected() {
        assert_eq!(DisplayContext::detect_with(vars(&["CI"])), DisplayContext::Agent);
    }
}
