//! Capability gate for bridge actions
//!
//! Trusted startup code configures the set of permitted tokens once;
//! every invoke checks the gate before an id is allocated or the channel
//! is touched.
//!
//! The default gate is **permissive**: until `configure` is called it
//! answers yes to everything, matching the shell's fail-open posture.
//! Startup code that wants the closed posture begins from
//! [`AllowList::deny_all`] instead.

use std::collections::HashSet;

use crate::message::ActionId;

/// One permitted token: everything, one exact dotted action, or a whole
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AllowToken {
    /// Wildcard: every action is permitted.
    All,
    /// Exact dotted action name, e.g. `dialog.open`.
    Action(String),
    /// Namespace, e.g. `dialog` permits `dialog` itself and `dialog.open`.
    Namespace(String),
}

impl AllowToken {
    /// Parse a configuration string: `*` is the wildcard, a dotted name
    /// permits exactly that action, a bare segment permits its whole
    /// namespace.
    pub fn parse(token: &str) -> Self {
        if token == "*" {
            AllowToken::All
        } else if token.contains('.') {
            AllowToken::Action(token.to_string())
        } else {
            AllowToken::Namespace(token.to_string())
        }
    }
}

/// Process-wide set of permitted actions, read by every invoke and
/// written only by trusted initialization code.
#[derive(Debug, Clone)]
pub struct AllowList {
    wildcard: bool,
    actions: HashSet<String>,
    namespaces: HashSet<String>,
}

impl AllowList {
    /// Fail-open gate: permits everything until configured.
    pub fn permissive() -> Self {
        Self {
            wildcard: true,
            actions: HashSet::new(),
            namespaces: HashSet::new(),
        }
    }

    /// Closed gate: permits nothing until configured.
    pub fn deny_all() -> Self {
        Self {
            wildcard: false,
            actions: HashSet::new(),
            namespaces: HashSet::new(),
        }
    }

    /// Replace the permitted set wholesale. Last writer wins; an empty
    /// token set permits nothing.
    pub fn configure<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = AllowToken>,
    {
        *self = Self::deny_all();
        for token in tokens {
            match token {
                AllowToken::All => self.wildcard = true,
                AllowToken::Action(name) => {
                    self.actions.insert(name);
                }
                AllowToken::Namespace(ns) => {
                    self.namespaces.insert(ns);
                }
            }
        }
    }

    /// Permitted iff the wildcard is present, the exact name is present,
    /// or the action's namespace is present.
    pub fn is_permitted(&self, action: &ActionId) -> bool {
        self.wildcard
            || self.actions.contains(action.name())
            || self.namespaces.contains(action.namespace())
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::permissive()
    }
}
