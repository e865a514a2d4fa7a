use crate::SchemaError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// A regular expression matched against the whole of an environment variable name.
///
/// The pattern is implicitly anchored at both ends, so `PY` removes only a
/// variable named exactly `PY` while `PY.*` removes every `PY`-prefixed name.
/// Equality, ordering and hashing use the pattern text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnvPattern {
    pattern: String,
    regex: Regex,
}

impl EnvPattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, SchemaError> {
        let pattern = pattern.into();
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => Ok(Self { pattern, regex }),
            Err(source) => Err(SchemaError::InvalidEnvPattern { pattern, source }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for EnvPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for EnvPattern {}

impl PartialOrd for EnvPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnvPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pattern.cmp(&other.pattern)
    }
}

impl Hash for EnvPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl TryFrom<String> for EnvPattern {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnvPattern> for String {
    fn from(value: EnvPattern) -> Self {
        value.pattern
    }
}

/// Layered transformation of a process environment.
///
/// Applied to a base environment in a fixed order: exact removals, pattern
/// removals, unconditional replacements, then defaults for names that are
/// still unset. A `replace` entry therefore always wins over a `default`
/// entry and may reintroduce a removed name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Env {
    #[serde(default)]
    default: BTreeMap<String, String>,
    #[serde(default)]
    replace: BTreeMap<String, String>,
    #[serde(default)]
    remove_exact: BTreeSet<String>,
    #[serde(default)]
    remove_re: BTreeSet<EnvPattern>,
}

impl Env {
    pub fn builder() -> EnvBuilder {
        EnvBuilder::default()
    }

    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.default
    }

    pub fn replacements(&self) -> &BTreeMap<String, String> {
        &self.replace
    }

    pub fn remove_exact(&self) -> &BTreeSet<String> {
        &self.remove_exact
    }

    pub fn remove_re(&self) -> &BTreeSet<EnvPattern> {
        &self.remove_re
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_empty()
            && self.replace.is_empty()
            && self.remove_exact.is_empty()
            && self.remove_re.is_empty()
    }

    /// Compute the effective environment from a base snapshot.
    pub fn apply<I>(&self, base: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env: BTreeMap<String, String> = base
            .into_iter()
            .filter(|(name, _)| !self.remove_exact.contains(name))
            .filter(|(name, _)| !self.remove_re.iter().any(|p| p.matches(name)))
            .collect();

        for (name, value) in &self.replace {
            env.insert(name.clone(), value.clone());
        }
        for (name, value) in &self.default {
            env.entry(name.clone()).or_insert_with(|| value.clone());
        }
        env
    }

    /// Rewrite every `default` and `replace` value, keeping names and removals.
    pub fn try_map_values<E, F>(&self, mut f: F) -> Result<Env, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        let mut map = |values: &BTreeMap<String, String>| {
            values
                .iter()
                .map(|(name, value)| f(value.as_str()).map(|v| (name.clone(), v)))
                .collect::<Result<BTreeMap<_, _>, E>>()
        };
        let default = map(&self.default)?;
        let replace = map(&self.replace)?;
        Ok(Env {
            default,
            replace,
            remove_exact: self.remove_exact.clone(),
            remove_re: self.remove_re.clone(),
        })
    }
}

/// Incremental constructor for [`Env`]; patterns are compiled by [`EnvBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct EnvBuilder {
    default: BTreeMap<String, String>,
    replace: BTreeMap<String, String>,
    remove_exact: BTreeSet<String>,
    remove_re: BTreeSet<String>,
}

impl EnvBuilder {
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn replace(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.replace.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.remove_exact.insert(name.into());
        self
    }

    #[must_use]
    pub fn remove_matching(mut self, pattern: impl Into<String>) -> Self {
        self.remove_re.insert(pattern.into());
        self
    }

    pub fn build(self) -> Result<Env, SchemaError> {
        let remove_re = self
            .remove_re
            .into_iter()
            .map(EnvPattern::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Env {
            default: self.default,
            replace: self.replace,
            remove_exact: self.remove_exact,
            remove_re,
        })
    }
}
