//! Variable-parameterized request templates.
//!
//! A template is the JSON wire form of a request description, stored as a
//! double-quoted, backslash-escaped string literal, with `${{name}}`
//! placeholders anywhere in the text. `set` binds values, un-escapes one
//! level and parses the result into a [`Param`].
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use reqwire_request::Param;
use serde_json::Value;

static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{([^}]+)\}\}").unwrap());

/// A request template with scanned placeholder names and fallback defaults.
///
/// Placeholder names are derived from the template text once at construction
/// and immutable afterward. [`ReqTemplate::set`] is a pure function over the
/// template; concurrent use on a shared template is safe.
#[derive(Clone, Debug, Default)]
pub struct ReqTemplate {
    params_template: String,
    variables: Vec<String>,
    defaults: HashMap<String, String>,
}

impl ReqTemplate {
    /// Creates a template and scans it for `${{name}}` placeholders.
    #[must_use]
    pub fn new(params_template: impl Into<String>, defaults: HashMap<String, String>) -> Self {
        let params_template = params_template.into();
        let variables = load_variables(&params_template);
        Self {
            params_template,
            variables,
            defaults,
        }
    }

    /// The raw template text.
    #[must_use]
    pub fn params_template(&self) -> &str {
        &self.params_template
    }

    /// Distinct placeholder names in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Binds values and produces the request description.
    ///
    /// Every scanned placeholder resolves to `values[name]`, else
    /// `defaults[name]`; resolution is checked for all names before any
    /// substitution, so a missing variable never yields a partial result.
    /// Substitution is a literal textual replacement; values land in the text
    /// as their natural string form, with no JSON-aware escaping. The
    /// substituted text must be an escaped string literal wrapping the JSON
    /// document; it is un-escaped exactly one level and parsed.
    ///
    /// # Errors
    ///
    /// [`Error::MissingVariable`] when a placeholder has no value and no
    /// default; [`Error::TemplateFormat`] when un-escaping or parsing fails.
    pub fn set(&self, values: &HashMap<String, Value>) -> Result<Param> {
        let mut resolved = Vec::with_capacity(self.variables.len());
        for name in &self.variables {
            let value = match values.get(name) {
                Some(value) => stringify(value),
                None => self
                    .defaults
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::MissingVariable(name.clone()))?,
            };
            resolved.push((name, value));
        }

        let mut data = self.params_template.clone();
        for (name, value) in resolved {
            let token = ["${{", name, "}}"].concat();
            data = data.replace(&token, &value);
        }

        let document: String = serde_json::from_str(&data)
            .map_err(|err| Error::TemplateFormat("un-escaping template", err))?;
        serde_json::from_str(&document)
            .map_err(|err| Error::TemplateFormat("parsing request description", err))
    }
}

fn load_variables(params_template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    for captures in VARIABLE_PATTERN.captures_iter(params_template) {
        let name = captures[1].to_string();
        if seen.insert(name.clone()) {
            variables.push(name);
        }
    }
    variables
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
