//! Ordered transition predicates.
//!
//! A [`Rules`] list is evaluated top to bottom and the first predicate that
//! holds decides the next state. This is the same short-circuit semantics as
//! a selector node: later rules are never evaluated once one matches.

use core::fmt;

/// A transition predicate.
///
/// Predicates take the context mutably because some checks record what
/// they observed (e.g. a proximity scan that registers the threats it found).
pub type Predicate<C> = fn(&mut C) -> bool;

/// One named predicate and the state it leads to.
pub struct Rule<S, C> {
    name: &'static str,
    target: S,
    when: Predicate<C>,
}

impl<S: Copy, C> Rule<S, C> {
    pub fn new(name: &'static str, target: S, when: Predicate<C>) -> Self {
        Self { name, target, when }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> S {
        self.target
    }
}

impl<S: Copy, C> Clone for Rule<S, C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            target: self.target,
            when: self.when,
        }
    }
}

impl<S: fmt::Debug, C> fmt::Debug for Rule<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish()
    }
}

/// Fixed-priority list of transition rules.
pub struct Rules<S, C> {
    rules: Vec<Rule<S, C>>,
}

impl<S: Copy + PartialEq, C> Rules<S, C> {
    /// Creates an empty rule list.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule with the lowest priority so far (builder pattern).
    #[must_use]
    pub fn rule(mut self, name: &'static str, target: S, when: Predicate<C>) -> Self {
        self.rules.push(Rule::new(name, target, when));
        self
    }

    /// Appends every rule of `other` after the existing ones.
    #[must_use]
    pub fn extend(mut self, other: &Rules<S, C>) -> Self {
        self.rules.extend(other.rules.iter().cloned());
        self
    }

    /// Evaluates the rules in order and returns the first match.
    ///
    /// Rules that lead back into `current` are skipped without evaluating
    /// their predicate, so a state never blocks lower-priority rules by
    /// matching itself.
    pub fn first_match(&self, ctx: &mut C, current: S) -> Option<&Rule<S, C>> {
        self.rules
            .iter()
            .filter(|rule| rule.target != current)
            .find(|rule| (rule.when)(ctx))
    }

    /// Returns the target of the first matching rule.
    pub fn evaluate(&self, ctx: &mut C, current: S) -> Option<S> {
        self.first_match(ctx, current).map(|rule| rule.target)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }
}

impl<S: Copy + PartialEq, C> Default for Rules<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy, C> Clone for Rules<S, C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}
