//! Label selectors narrowing list calls.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A single label requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Label equality: `key=value`
    Eq(String, String),
    /// Label inequality: `key!=value`
    NotEq(String, String),
    /// Label presence: `key`
    Exists(String),
    /// Label absence: `!key`
    NotExists(String),
}

impl Requirement {
    /// Returns `true` if the labels satisfy this requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Requirement::Eq(k, v) => labels.get(k).is_some_and(|l| l == v),
            Requirement::NotEq(k, v) => labels.get(k).is_none_or(|l| l != v),
            Requirement::Exists(k) => labels.contains_key(k),
            Requirement::NotExists(k) => !labels.contains_key(k),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Eq(k, v) => write!(f, "{k}={v}"),
            Requirement::NotEq(k, v) => write!(f, "{k}!={v}"),
            Requirement::Exists(k) => f.write_str(k),
            Requirement::NotExists(k) => write!(f, "!{k}"),
        }
    }
}

/// A conjunction of label requirements, e.g. `app=web,tier!=db`.
///
/// The table model attaches its selector to the call context; accessors
/// decide how to apply it.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use livetable_lib::LabelSelector;
///
/// let sel: LabelSelector = "app=web,!canary".parse().unwrap();
/// let labels = BTreeMap::from([("app".to_string(), "web".to_string())]);
/// assert!(sel.matches(&labels));
/// assert_eq!(sel.to_string(), "app=web,!canary");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Creates a selector matching everything.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Adds a requirement.
    pub fn and(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Returns the requirements in declaration order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns `true` if the selector has no requirements.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Returns `true` if the labels satisfy every requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for LabelSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sel = LabelSelector::everything();
        for term in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some((k, v)) = term.split_once("!=") {
                Requirement::NotEq(label_key(k, term)?, v.trim().to_string())
            } else if let Some((k, v)) = term.split_once("==") {
                Requirement::Eq(label_key(k, term)?, v.trim().to_string())
            } else if let Some((k, v)) = term.split_once('=') {
                Requirement::Eq(label_key(k, term)?, v.trim().to_string())
            } else if let Some(k) = term.strip_prefix('!') {
                Requirement::NotExists(label_key(k, term)?)
            } else {
                Requirement::Exists(label_key(term, term)?)
            };
            sel = sel.and(requirement);
        }
        Ok(sel)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

fn label_key(key: &str, term: &str) -> Result<String, Error> {
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(Error::configuration(format!("invalid label selector term {term:?}")));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_terms() {
        let sel: LabelSelector = "app==web, tier!=db,env,!canary".parse().unwrap();
        assert_eq!(
            sel.requirements(),
            &[
                Requirement::Eq("app".into(), "web".into()),
                Requirement::NotEq("tier".into(), "db".into()),
                Requirement::Exists("env".into()),
                Requirement::NotExists("canary".into()),
            ]
        );
        assert_eq!(sel.to_string(), "app=web,tier!=db,env,!canary");
    }

    #[test]
    fn test_matches() {
        let sel: LabelSelector = "app=web,tier!=db".parse().unwrap();
        assert!(sel.matches(&labels(&[("app", "web")])));
        assert!(sel.matches(&labels(&[("app", "web"), ("tier", "fe")])));
        assert!(!sel.matches(&labels(&[("app", "web"), ("tier", "db")])));
        assert!(!sel.matches(&labels(&[("tier", "fe")])));
    }

    #[test]
    fn test_empty_selector() {
        let sel: LabelSelector = "".parse().unwrap();
        assert!(sel.is_empty());
        assert!(sel.matches(&BTreeMap::new()));
    }

    #[test]
    fn test_invalid_term() {
        assert!("=web".parse::<LabelSelector>().is_err());
        assert!("!".parse::<LabelSelector>().is_err());
    }
}
