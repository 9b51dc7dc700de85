//! Level filter
//!
//! The dispatcher never owns the accept rule: it asks each destination through
//! [`should_accept`]. [`LevelFilter`] is the rule set the bundled destinations
//! answer with.

use std::sync::atomic::{AtomicU8, Ordering};

use contracts::{Destination, FilterAction, FilterRule, FilterTarget, Level};

/// Whether `destination` takes a `level` message from this call site
#[inline]
pub fn should_accept(destination: &dyn Destination, level: Level, path: &str, function: &str) -> bool {
    destination.should_accept(level, path, function)
}

/// Minimum level plus path/function include and exclude rules.
///
/// A call is accepted iff its level passes, no exclude rule matches, and
/// either there are no include rules or one of them matches.
#[derive(Debug)]
pub struct LevelFilter {
    min_level: AtomicU8,
    includes: Vec<FilterRule>,
    excludes: Vec<FilterRule>,
}

impl LevelFilter {
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level: AtomicU8::new(min_level.as_u8()),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Add rules, split by action
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = FilterRule>) -> Self {
        for rule in rules {
            match rule.action {
                FilterAction::Include => self.includes.push(rule),
                FilterAction::Exclude => self.excludes.push(rule),
            }
        }
        self
    }

    pub fn min_level(&self) -> Level {
        Level::from_u8(self.min_level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Change the threshold; takes effect on the next dispatch
    pub fn set_min_level(&self, level: Level) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn rule_count(&self) -> usize {
        self.includes.len() + self.excludes.len()
    }

    pub fn accepts(&self, level: Level, path: &str, function: &str) -> bool {
        if level < self.min_level() {
            return false;
        }
        if self
            .excludes
            .iter()
            .any(|rule| rule_matches(rule, path, function))
        {
            return false;
        }
        self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|rule| rule_matches(rule, path, function))
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(Level::Verbose)
    }
}

fn rule_matches(rule: &FilterRule, path: &str, function: &str) -> bool {
    let value = match rule.target {
        FilterTarget::Path => path,
        FilterTarget::Function => function,
    };
    rule.matcher.matches(value, &rule.pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::MatchKind;

    #[test]
    fn test_threshold_only() {
        let filter = LevelFilter::new(Level::Warning);
        for level in [Level::Verbose, Level::Debug, Level::Info] {
            assert!(!filter.accepts(level, "src/main.rs", "main"));
        }
        assert!(filter.accepts(Level::Warning, "src/main.rs", "main"));
        assert!(filter.accepts(Level::Error, "src/main.rs", "main"));
    }

    #[test]
    fn test_set_min_level_at_runtime() {
        let filter = LevelFilter::new(Level::Error);
        assert!(!filter.accepts(Level::Info, "a.rs", "f"));

        filter.set_min_level(Level::Info);
        assert_eq!(filter.min_level(), Level::Info);
        assert!(filter.accepts(Level::Info, "a.rs", "f"));
    }

    #[test]
    fn test_exclude_path_vetoes() {
        let filter = LevelFilter::default().with_rules([FilterRule::exclude_path("vendor/")]);
        assert!(!filter.accepts(Level::Error, "src/vendor/lib.rs", "f"));
        assert!(filter.accepts(Level::Verbose, "src/app.rs", "f"));
    }

    #[test]
    fn test_include_rules_restrict() {
        let filter = LevelFilter::default().with_rules([
            FilterRule::include_path("net/"),
            FilterRule::include_function("handshake").with_matcher(MatchKind::StartsWith),
        ]);

        assert!(filter.accepts(Level::Info, "src/net/tcp.rs", "read"));
        assert!(filter.accepts(Level::Info, "src/tls.rs", "handshake_start"));
        assert!(!filter.accepts(Level::Info, "src/db.rs", "query"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = LevelFilter::default().with_rules([
            FilterRule::include_path("net/"),
            FilterRule::exclude_function("poll"),
        ]);

        assert!(!filter.accepts(Level::Info, "src/net/tcp.rs", "poll_read"));
        assert_eq!(filter.rule_count(), 2);
    }
}
