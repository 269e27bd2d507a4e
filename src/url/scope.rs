//! Scope matching for folder-restricted crawls
//!
//! A project's scope policy is an ordered list of path rules. Rules are
//! sorted in reverse lexicographic order and every matching rule overwrites
//! the running verdict, so the last matching rule in the sorted sequence
//! wins. This precedence is a heuristic carried over from observed behavior,
//! not a most-specific-rule-wins policy.

/// A single parsed scope rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRule {
    /// The path pattern, without the `!` and `*` markers
    pattern: String,

    /// `!`-prefixed rules exclude matching paths from the scope
    negated: bool,

    /// `*`-suffixed rules match any pathname starting with the pattern
    prefix: bool,
}

impl ScopeRule {
    /// Parses one rule from its raw configured form.
    ///
    /// The rule is trimmed; a leading `!` marks it exclusionary and the
    /// remainder is parsed as the pattern; a trailing `*` turns the text
    /// before it into a plain prefix match.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (negated, rest) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (prefix, pattern) = match rest.strip_suffix('*') {
            Some(before) => (true, before),
            None => (false, rest),
        };

        Self {
            pattern: pattern.to_string(),
            negated,
            prefix,
        }
    }

    /// Returns true if this rule excludes matching paths.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The rule's path pattern with markers removed.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Tests whether a pathname matches this rule.
    ///
    /// Prefix rules match any pathname starting with the pattern. Exact
    /// rules match the pathname itself or the pathname continuing past the
    /// pattern with a `/`, `?`, or `#` boundary, so `/blog` covers
    /// `/blog/post` but not `/blogroll`.
    pub fn matches(&self, pathname: &str) -> bool {
        if self.prefix {
            return pathname.starts_with(&self.pattern);
        }

        if pathname == self.pattern {
            return true;
        }

        match pathname.strip_prefix(&self.pattern) {
            Some(rest) => rest.starts_with(['/', '?', '#']),
            None => false,
        }
    }
}

/// Parses a project's raw rule list, sorted into evaluation order.
///
/// Rules are ordered by their trimmed raw text, reverse lexicographically,
/// which interleaves exclusionary rules after the inclusive rules they
/// carve out of.
pub fn parse_scope_rules(raw_rules: &[String]) -> Vec<ScopeRule> {
    let mut trimmed: Vec<&str> = raw_rules
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    trimmed.sort_by(|a, b| b.cmp(a));

    trimmed.into_iter().map(ScopeRule::parse).collect()
}

/// Decides whether a pathname is within the crawl boundary.
///
/// An empty rule list means the project is unrestricted. With rules
/// present, the verdict starts out-of-scope and every matching rule
/// overwrites it: inclusive rules set it in-scope, exclusionary rules set
/// it out. The rules must already be in evaluation order (see
/// [`parse_scope_rules`]).
pub fn path_in_scope(pathname: &str, rules: &[ScopeRule]) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut in_scope = false;
    for rule in rules {
        if rule.matches(pathname) {
            in_scope = !rule.is_negated();
        }
    }

    in_scope
}
