// Rule vocabulary and rule string parsing

use crate::errors::{Result, ValidatorError};
use std::fmt;
use std::str::FromStr;

/// The closed set of rules a declaration may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Required,
    Email,
    Integer,
    Array,
    Image,
    Confirmed,
    Mimes,
    Min,
    Max,
    String,
    Number,
    Nullable,
    RequiredWithAll,
    StrongPassword,
    Url,
}

impl Rule {
    /// Every rule, in catalog order.
    pub const ALL: [Rule; 15] = [
        Rule::Required,
        Rule::Email,
        Rule::Integer,
        Rule::Array,
        Rule::Image,
        Rule::Confirmed,
        Rule::Mimes,
        Rule::Min,
        Rule::Max,
        Rule::String,
        Rule::Number,
        Rule::Nullable,
        Rule::RequiredWithAll,
        Rule::StrongPassword,
        Rule::Url,
    ];

    /// Name used in rule strings.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Integer => "integer",
            Rule::Array => "array",
            Rule::Image => "image",
            Rule::Confirmed => "confirmed",
            Rule::Mimes => "mimes",
            Rule::Min => "min",
            Rule::Max => "max",
            Rule::String => "string",
            Rule::Number => "number",
            Rule::Nullable => "nullable",
            Rule::RequiredWithAll => "required_with_all",
            Rule::StrongPassword => "strong_password",
            Rule::Url => "url",
        }
    }
}

impl FromStr for Rule {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| ValidatorError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `name[:parameters]` entry of a rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub rule: Rule,
    pub parameters: Vec<String>,
}

impl RuleToken {
    /// Create a token without parameters.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            parameters: Vec::new(),
        }
    }

    /// Parse `min:3` or `mimes:jpg,"a,b"` style tokens.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let (name, raw) = match token.split_once(':') {
            Some((name, raw)) => (name, raw),
            None => (token, ""),
        };

        Ok(Self {
            rule: name.trim().parse()?,
            parameters: parse_parameters(raw),
        })
    }
}

/// Split a comma-delimited parameter list with CSV quoting.
///
/// A double-quoted parameter may contain commas; `""` inside quotes is a
/// literal quote. An empty list yields no parameters.
pub fn parse_parameters(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut parameters = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => parameters.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parameters.push(current);

    parameters
}

/// The parsed rules declared for one attribute.
///
/// When `nullable` appears without `required`, it is moved to the front and
/// the set is flagged so the engine can drop failures for empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    tokens: Vec<RuleToken>,
    nullable: bool,
}

impl RuleSet {
    /// Parse a pipe-delimited rule string such as `required|min:3|max:10`.
    pub fn parse(rules: &str) -> Result<Self> {
        let mut tokens = rules
            .split('|')
            .map(RuleToken::parse)
            .collect::<Result<Vec<_>>>()?;

        let nullable = tokens.iter().any(|t| t.rule == Rule::Nullable)
            && !tokens.iter().any(|t| t.rule == Rule::Required);

        if nullable {
            tokens.retain(|t| t.rule != Rule::Nullable);
            tokens.insert(0, RuleToken::new(Rule::Nullable));
        }

        Ok(Self { tokens, nullable })
    }

    /// Tokens in evaluation order.
    pub fn tokens(&self) -> &[RuleToken] {
        &self.tokens
    }

    /// Whether empty values should be exempt from the other rules.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl FromStr for RuleSet {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        RuleSet::parse(s)
    }
}
