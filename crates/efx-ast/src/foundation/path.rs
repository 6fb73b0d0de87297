//! Structural XPath model and the path contextualization algorithm.
//!
//! Notice schemas locate fields and nodes with absolute XPaths such as
//! `/*/PathNode/CodeField`. The translator never manipulates these as flat
//! strings: it parses them once into an [`XPath`] (an ordered sequence of
//! [`PathStep`]s, each optionally carrying predicate text) and computes
//! relative references with [`contextualize`].
//!
//! # Design
//!
//! - Steps are compared structurally: step name plus predicate text.
//!   Predicates are opaque — a predicate containing a construct that cannot
//!   be decomposed (e.g. a nested quantifier) is equal only to a textually
//!   identical one.
//! - Paths are immutable; every operation returns a new value.
//! - [`contextualize`] is pure: no symbol lookup, no side effects.
//!
//! # Examples
//!
//! ```
//! # use efx_ast::foundation::path::{contextualize, XPath};
//! let context = XPath::parse("/a/b");
//! let target = XPath::parse("/a/b/c");
//! assert_eq!(contextualize(&context, &target).to_string(), "c");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of an XPath.
///
/// The step name is kept verbatim, including axis prefixes (`@listName`)
/// and function-call steps (`normalize-space(text())`). Predicate text is
/// stored without the surrounding brackets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    name: String,
    predicates: Vec<String>,
}

impl PathStep {
    /// Create a step without predicates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicates: Vec::new(),
        }
    }

    /// Create a step with predicate texts.
    pub fn with_predicates(name: impl Into<String>, predicates: Vec<String>) -> Self {
        Self {
            name: name.into(),
            predicates,
        }
    }

    /// The parent-step marker (`..`).
    pub fn parent() -> Self {
        Self::new("..")
    }

    /// Step name without predicates.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Predicate texts attached to this step.
    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    /// Whether this step addresses an attribute (`@name`).
    pub fn is_attribute(&self) -> bool {
        self.name.starts_with('@')
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for predicate in &self.predicates {
            write!(f, "[{}]", predicate)?;
        }
        Ok(())
    }
}

/// A parsed XPath: an optional root marker followed by steps.
///
/// Absolute paths (`/a/b`, `/*/a`) carry the root marker; relative results
/// of [`contextualize`] do not. The empty relative path displays as `.`
/// (the "self" path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XPath {
    rooted: bool,
    steps: Vec<PathStep>,
}

impl XPath {
    /// Create a path from parts.
    pub fn new(rooted: bool, steps: Vec<PathStep>) -> Self {
        Self { rooted, steps }
    }

    /// The "self" path (`.`).
    pub fn self_path() -> Self {
        Self {
            rooted: false,
            steps: Vec::new(),
        }
    }

    /// Parse a path from its textual form.
    ///
    /// Splits on `/` at bracket/parenthesis depth zero, so predicates and
    /// function-call steps survive intact. `.` parses to the self path.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "." {
            return Self::self_path();
        }
        let (rooted, body) = match trimmed.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let steps = split_steps(body).iter().map(|s| parse_step(s)).collect();
        Self { rooted, steps }
    }

    /// Whether this path starts at the document root.
    pub fn is_absolute(&self) -> bool {
        self.rooted
    }

    /// Whether this is the self path.
    pub fn is_self(&self) -> bool {
        !self.rooted && self.steps.is_empty()
    }

    /// The steps of this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last step, if any.
    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Whether the path ends in an attribute step.
    pub fn is_attribute(&self) -> bool {
        self.last_step().is_some_and(PathStep::is_attribute)
    }

    /// Name of the trailing attribute step, without the `@`.
    pub fn attribute_name(&self) -> Option<&str> {
        self.last_step()
            .filter(|s| s.is_attribute())
            .map(|s| &s.name()[1..])
    }

    /// This path with a trailing attribute step removed.
    ///
    /// Returns the path unchanged when it does not end in an attribute.
    pub fn without_attribute(&self) -> Self {
        if self.is_attribute() {
            Self {
                rooted: self.rooted,
                steps: self.steps[..self.steps.len() - 1].to_vec(),
            }
        } else {
            self.clone()
        }
    }

    /// Append a relative path to this one.
    ///
    /// Joining an absolute path returns it unchanged; joining the self path
    /// returns `self` unchanged.
    pub fn join(&self, relative: &XPath) -> Self {
        if relative.rooted {
            return relative.clone();
        }
        let mut steps = self.steps.clone();
        steps.extend(relative.steps.iter().cloned());
        Self {
            rooted: self.rooted,
            steps,
        }
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self() {
            return write!(f, ".");
        }
        if self.rooted {
            write!(f, "/")?;
        }
        let rendered: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("/"))
    }
}

impl From<&str> for XPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// Compute `target` relative to `context`.
///
/// Compares the two paths step by step from the root and lets `k` be the
/// length of the longest equal-step prefix:
///
/// - `k == len(context) == len(target)` — the self path `.`
/// - `k == 0` — `target` unchanged (it shares nothing with the context)
/// - otherwise — `len(context) - k` parent steps (`..`) followed by the
///   steps of `target` from index `k` on
///
/// Two steps are equal when their names and predicate texts are identical
/// ([`PathStep`] structural equality). A relative `target` is returned
/// unchanged: it is already expressed against some context.
pub fn contextualize(context: &XPath, target: &XPath) -> XPath {
    if !context.is_absolute() || !target.is_absolute() {
        return target.clone();
    }
    let k = context
        .steps()
        .iter()
        .zip(target.steps())
        .take_while(|(a, b)| a == b)
        .count();
    if k == 0 {
        return target.clone();
    }
    if k == context.len() && k == target.len() {
        return XPath::self_path();
    }
    let mut steps = vec![PathStep::parent(); context.len() - k];
    steps.extend(target.steps()[k..].iter().cloned());
    XPath::new(false, steps)
}

/// Split path text on `/` at bracket/parenthesis depth zero.
fn split_steps(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for c in body.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            '/' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Split one step's text into name and predicate texts.
fn parse_step(text: &str) -> PathStep {
    let mut depth = 0i32;
    let mut name_end = text.len();
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '[' if depth == 0 => {
                name_end = i;
                break;
            }
            _ => {}
        }
    }
    let name = text[..name_end].to_string();
    let mut predicates = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0i32;
    for c in text[name_end..].chars() {
        match c {
            '[' => {
                if bracket_depth > 0 {
                    current.push(c);
                }
                bracket_depth += 1;
            }
            ']' => {
                bracket_depth -= 1;
                if bracket_depth > 0 {
                    current.push(c);
                } else {
                    predicates.push(std::mem::take(&mut current));
                }
            }
            _ => {
                if bracket_depth > 0 {
                    current.push(c);
                }
            }
        }
    }
    PathStep::with_predicates(name, predicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative(context: &str, target: &str) -> String {
        contextualize(&XPath::parse(context), &XPath::parse(target)).to_string()
    }

    #[test]
    fn test_parse_absolute() {
        let path = XPath::parse("/a/b/c");
        assert!(path.is_absolute());
        assert_eq!(path.len(), 3);
        assert_eq!(path.steps()[0].name(), "a");
        assert_eq!(path.to_string(), "/a/b/c");
    }

    #[test]
    fn test_parse_predicates() {
        let path = XPath::parse("/*/a/b[c][d]/e");
        assert_eq!(path.len(), 4);
        assert_eq!(path.steps()[2].name(), "b");
        assert_eq!(path.steps()[2].predicates(), &["c", "d"]);
        assert_eq!(path.to_string(), "/*/a/b[c][d]/e");
    }

    #[test]
    fn test_parse_nested_predicate() {
        let path = XPath::parse("/a/b[c[d]]/e");
        assert_eq!(path.steps()[1].predicates(), &["c[d]"]);
        assert_eq!(path.to_string(), "/a/b[c[d]]/e");
    }

    #[test]
    fn test_parse_function_step() {
        let path = XPath::parse("/*/PathNode/CodeField/normalize-space(text())");
        assert_eq!(path.len(), 4);
        assert_eq!(path.steps()[0].name(), "*");
        assert_eq!(path.last_step().unwrap().name(), "normalize-space(text())");
    }

    #[test]
    fn test_parse_self() {
        assert!(XPath::parse(".").is_self());
        assert_eq!(XPath::self_path().to_string(), ".");
    }

    #[test]
    fn test_attribute_step() {
        let path = XPath::parse("/a/b/@listName");
        assert!(path.is_attribute());
        assert_eq!(path.attribute_name(), Some("listName"));
        assert_eq!(path.without_attribute().to_string(), "/a/b");
    }

    #[test]
    fn test_join() {
        let base = XPath::parse("/a/b");
        assert_eq!(base.join(&XPath::parse("c/d")).to_string(), "/a/b/c/d");
        assert_eq!(base.join(&XPath::self_path()).to_string(), "/a/b");
        assert_eq!(base.join(&XPath::parse("/x")).to_string(), "/x");
    }

    #[test]
    fn test_contextualize_child() {
        assert_eq!(relative("/a/b", "/a/b/c"), "c");
    }

    #[test]
    fn test_contextualize_sibling_predicate() {
        assert_eq!(relative("/a/b[a]", "/a/b[b]/c"), "../b[b]/c");
    }

    #[test]
    fn test_contextualize_two_up() {
        assert_eq!(relative("/*/a/b[c][d]/e", "/*/a/b[f]/g"), "../../b[f]/g");
    }

    #[test]
    fn test_contextualize_self() {
        for path in ["/a", "/a/b[c]/d", "/*/x"] {
            assert_eq!(relative(path, path), ".");
        }
    }

    #[test]
    fn test_contextualize_no_common_prefix() {
        assert_eq!(relative("/a/b", "/x/y"), "/x/y");
    }

    #[test]
    fn test_contextualize_ancestor() {
        assert_eq!(relative("/a/b/c", "/a"), "../..");
    }
}
