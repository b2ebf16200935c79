//! Trigger evaluation: should a plugin activate for this invocation?

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{PluginError, PluginResult};

/// An activation pattern as written in configuration.
///
/// ```toml
/// trigger = "deploy"             # literal
/// trigger = { regex = "^dep" }   # regular expression
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerSpec {
    /// Strict string equality.
    Literal(String),
    /// Regular expression, matched anywhere in the value.
    Regex {
        /// Pattern source.
        regex: String,
    },
}

/// A compiled activation pattern.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Regular expression with `is_match` semantics.
    Pattern(Regex),
    /// Exact equality.
    Literal(String),
    /// Any of the plugin's names: canonical name or one of its aliases.
    Names(Regex),
}

impl Trigger {
    /// Compile a configured trigger.
    pub fn from_spec(spec: &TriggerSpec) -> PluginResult<Self> {
        match spec {
            TriggerSpec::Literal(value) => Ok(Self::Literal(value.clone())),
            TriggerSpec::Regex { regex } => Regex::new(regex)
                .map(Self::Pattern)
                .map_err(|e| {
                    PluginError::Config(format!("Invalid trigger pattern '{regex}': {e}"))
                }),
        }
    }

    /// Build a trigger matching the canonical name or any alias.
    pub fn from_names(canonical: &str, aliases: &[String]) -> PluginResult<Self> {
        let alternation = std::iter::once(canonical)
            .chain(aliases.iter().map(String::as_str))
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&format!("^(?:{alternation})$"))
            .map(Self::Names)
            .map_err(|e| PluginError::Config(format!("Invalid alias trigger: {e}")))
    }

    /// Test a value against this trigger.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match self {
            Self::Pattern(re) | Self::Names(re) => re.is_match(value),
            Self::Literal(literal) => literal == value,
        }
    }

    /// Short kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "regex",
            Self::Literal(_) => "string",
            Self::Names(_) => "names",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern(re) | Self::Names(re) => write!(f, "/{}/", re.as_str()),
            Self::Literal(literal) => write!(f, "'{literal}'"),
        }
    }
}

/// Evaluate an optional trigger. No trigger means no gating.
pub fn evaluate(trigger: Option<&Trigger>, value: Option<&str>) -> bool {
    let Some(trigger) = trigger else {
        return true;
    };

    let passed = trigger.matches(value);
    if passed {
        tracing::debug!(kind = trigger.kind(), %trigger, value = ?value, "Trigger passed");
    } else {
        tracing::debug!(kind = trigger.kind(), %trigger, value = ?value, "Trigger did not pass");
    }
    passed
}
