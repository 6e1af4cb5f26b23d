//! Translation catalogs.
//!
//! Each language maps text keys to display strings. Strings may carry
//! `{name}` placeholders, optionally with a fixed-precision spec such as
//! `{amount:.2f}`.

use std::collections::HashMap;
use std::fmt;

use crate::{I18nResult, Language};

const EN_JSON: &str = include_str!("locales/en.json");
const AR_JSON: &str = include_str!("locales/ar.json");

/// A value substituted into a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => f.write_str(s),
            Arg::Integer(i) => write!(f, "{}", i),
            Arg::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Integer(i)
    }
}

impl From<usize> for Arg {
    fn from(i: usize) -> Self {
        Arg::Integer(i as i64)
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Number(n)
    }
}

/// Display text for every supported language.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// Load the catalogs shipped with the crate.
    pub fn builtin() -> I18nResult<Self> {
        let mut entries = HashMap::new();
        entries.insert(Language::English, serde_json::from_str(EN_JSON)?);
        entries.insert(Language::Arabic, serde_json::from_str(AR_JSON)?);
        Ok(Self { entries })
    }

    /// Add or replace entries for one language from a JSON object.
    pub fn merge_json(&mut self, language: Language, json: &str) -> I18nResult<()> {
        let extra: HashMap<String, String> = serde_json::from_str(json)?;
        self.entries.entry(language).or_default().extend(extra);
        Ok(())
    }

    /// Look up a key. Missing keys fall back to the key itself.
    pub fn get<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        self.entries
            .get(&language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn contains(&self, language: Language, key: &str) -> bool {
        self.entries
            .get(&language)
            .is_some_and(|table| table.contains_key(key))
    }

    /// Keys defined for a language, sorted.
    pub fn keys(&self, language: Language) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .get(&language)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Look up a key and substitute placeholders.
    ///
    /// If a placeholder has no matching argument, or its format spec does not
    /// fit the argument, the unformatted text is returned.
    pub fn format(&self, language: Language, key: &str, args: &[(&str, Arg)]) -> String {
        let template = self.get(language, key);
        if args.is_empty() {
            return template.to_string();
        }
        render(template, args).unwrap_or_else(|| template.to_string())
    }
}

fn render(template: &str, args: &[(&str, Arg)]) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut token = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        ch => token.push(ch),
                    }
                }
                let (name, spec) = match token.split_once(':') {
                    Some((name, spec)) => (name, Some(spec)),
                    None => (token.as_str(), None),
                };
                let arg = args.iter().find(|(k, _)| *k == name).map(|(_, v)| v)?;
                out.push_str(&apply_spec(arg, spec)?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return None,
            ch => out.push(ch),
        }
    }

    Some(out)
}

/// Supports no spec, or `.Nf` on numeric arguments.
fn apply_spec(arg: &Arg, spec: Option<&str>) -> Option<String> {
    let Some(spec) = spec else {
        return Some(arg.to_string());
    };
    let precision: usize = spec.strip_prefix('.')?.strip_suffix('f')?.parse().ok()?;
    match arg {
        Arg::Number(n) => Some(format!("{:.*}", precision, n)),
        Arg::Integer(i) => Some(format!("{:.*}", precision, *i as f64)),
        Arg::Text(_) => None,
    }
}
