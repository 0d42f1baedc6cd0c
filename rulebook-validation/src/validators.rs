// Built-in rule predicates

use crate::config::ValidatorConfig;
use crate::flatten::FlattenedData;
use crate::rules::Rule;
use crate::value::FlatValue;
use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static UPPERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());

static LOWERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

static SPECIAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

/// Signature shared by every rule predicate.
pub type Predicate = fn(&FlattenedData, &str, &[String], &ValidatorConfig) -> bool;

impl Rule {
    /// The predicate implementing this rule.
    pub fn predicate(self) -> Predicate {
        match self {
            Rule::Required => |data, attribute, _, _| required(data, attribute),
            Rule::Email => |data, attribute, _, _| email(data, attribute),
            Rule::Integer => |data, attribute, _, _| integer(data, attribute),
            Rule::Array => |data, attribute, _, _| array(data, attribute),
            Rule::Image => |data, attribute, _, config| image(data, attribute, config),
            Rule::Confirmed => |data, attribute, _, _| confirmed(data, attribute),
            Rule::Mimes => |data, attribute, parameters, _| mimes(data, attribute, parameters),
            Rule::Min => |data, attribute, parameters, _| min(data, attribute, parameters),
            Rule::Max => |data, attribute, parameters, _| max(data, attribute, parameters),
            Rule::String => |data, attribute, _, _| string(data, attribute),
            Rule::Number => |data, attribute, _, _| number(data, attribute),
            Rule::Nullable => |_, _, _, _| true,
            Rule::RequiredWithAll => |data, attribute, parameters, _| {
                required_with_all(data, attribute, parameters)
            },
            Rule::StrongPassword => |data, attribute, parameters, config| {
                strong_password(data, attribute, parameters, config.password_min_length)
            },
            Rule::Url => |data, attribute, _, _| url(data, attribute),
        }
    }

    /// Run this rule against `attribute`.
    pub fn check(
        self,
        data: &FlattenedData,
        attribute: &str,
        parameters: &[String],
        config: &ValidatorConfig,
    ) -> bool {
        (self.predicate())(data, attribute, parameters, config)
    }
}

/// Present and not empty.
///
/// For an array-shaped field, or one of its numbered elements, this passes
/// when at least one element of the field is not empty.
pub fn required(data: &FlattenedData, attribute: &str) -> bool {
    if let Some(group) = data.group_of(attribute) {
        return data.group_elements(group).any(|(_, value)| !value.is_empty());
    }
    data.get(attribute).is_some_and(|value| !value.is_empty())
}

/// Present and a syntactically valid email address.
pub fn email(data: &FlattenedData, attribute: &str) -> bool {
    text(data, attribute).is_some_and(EmailAddress::is_valid)
}

/// Present and a whole number.
pub fn integer(data: &FlattenedData, attribute: &str) -> bool {
    matches!(data.get(attribute), Some(FlatValue::Integer(_)))
}

/// Present and numeric, either a number or text that reads as one.
pub fn number(data: &FlattenedData, attribute: &str) -> bool {
    data.get(attribute).is_some_and(FlatValue::is_numeric)
}

/// Present and array-shaped.
pub fn array(data: &FlattenedData, attribute: &str) -> bool {
    data.is_group(attribute)
}

/// Present and textual.
pub fn string(data: &FlattenedData, attribute: &str) -> bool {
    text(data, attribute).is_some()
}

/// `<attribute>_confirmation` exists and holds the same value.
pub fn confirmed(data: &FlattenedData, attribute: &str) -> bool {
    let Some(confirmation) = data.get(&format!("{}_confirmation", attribute)) else {
        return false;
    };
    data.get(attribute) == Some(confirmation)
}

/// Text at least `parameters[0]` characters long, or a number at least
/// `parameters[0]`.
pub fn min(data: &FlattenedData, attribute: &str, parameters: &[String]) -> bool {
    compare(data, attribute, parameters, |size, bound| size >= bound)
}

/// Text at most `parameters[0]` characters long, or a number at most
/// `parameters[0]`.
pub fn max(data: &FlattenedData, attribute: &str, parameters: &[String]) -> bool {
    compare(data, attribute, parameters, |size, bound| size <= bound)
}

fn compare(
    data: &FlattenedData,
    attribute: &str,
    parameters: &[String],
    accept: fn(f64, f64) -> bool,
) -> bool {
    let Some(bound) = parameters.first().and_then(|p| p.trim().parse::<f64>().ok()) else {
        return false;
    };

    let size = match data.get(attribute) {
        Some(FlatValue::Text(s)) => s.chars().count() as f64,
        Some(value) => match value.as_number() {
            Some(n) => n,
            None => return false,
        },
        None => return false,
    };

    accept(size, bound)
}

/// An uploaded file whose extension is one of `parameters`.
///
/// An absent attribute passes: there is nothing to check.
pub fn mimes(data: &FlattenedData, attribute: &str, parameters: &[String]) -> bool {
    match data.get(attribute) {
        None => true,
        Some(FlatValue::File(file)) => file.has_extension_in(parameters),
        Some(_) => false,
    }
}

/// `mimes` with the configured image extensions.
pub fn image(data: &FlattenedData, attribute: &str, config: &ValidatorConfig) -> bool {
    mimes(data, attribute, &config.image_extensions)
}

/// Present, not empty and a valid absolute URL with a host.
pub fn url(data: &FlattenedData, attribute: &str) -> bool {
    text(data, attribute)
        .filter(|s| !s.is_empty())
        .and_then(|s| Url::parse(s).ok())
        .is_some_and(|u| u.has_host())
}

/// Required only once every attribute named in `parameters` is present.
pub fn required_with_all(data: &FlattenedData, attribute: &str, parameters: &[String]) -> bool {
    if parameters.iter().all(|p| data.contains(p)) {
        return required(data, attribute);
    }
    true
}

/// Has an uppercase letter, a lowercase letter, a digit and a non-word
/// character, and is at least `parameters[0]` (or `default_length`)
/// characters long.
pub fn strong_password(
    data: &FlattenedData,
    attribute: &str,
    parameters: &[String],
    default_length: usize,
) -> bool {
    let Some(password) = text(data, attribute) else {
        return false;
    };
    let length = parameters
        .first()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(default_length);

    UPPERCASE_REGEX.is_match(password)
        && LOWERCASE_REGEX.is_match(password)
        && DIGIT_REGEX.is_match(password)
        && SPECIAL_REGEX.is_match(password)
        && password.chars().count() >= length
}

fn text<'a>(data: &'a FlattenedData, attribute: &str) -> Option<&'a str> {
    data.get(attribute).and_then(FlatValue::as_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> FlattenedData {
        crate::flatten::flatten_fields(&value)
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_required() {
        let data = data(json!({"firstname": "", "lastname": "doe", "zero": 0}));
        assert!(!required(&data, "firstname"));
        assert!(required(&data, "lastname"));
        assert!(required(&data, "zero"));
        assert!(!required(&data, "missing"));
    }

    #[test]
    fn test_required_group_needs_one_element() {
        let data = data(json!({"name": ["dfd", ""], "blank": ["", ""]}));
        assert!(required(&data, "name"));
        assert!(required(&data, "name.1"));
        assert!(!required(&data, "blank"));
        assert!(!required(&data, "blank.0"));
    }

    #[test]
    fn test_email() {
        let data = data(json!({"good": "john.doe@example.com", "bad": "invalidemail", "n": 5}));
        assert!(email(&data, "good"));
        assert!(!email(&data, "bad"));
        assert!(!email(&data, "n"));
        assert!(!email(&data, "missing"));
    }

    #[test]
    fn test_integer_and_number() {
        let data = data(json!({"amount": 1000, "price": 9.5, "zip": "89483943", "name": "x"}));
        assert!(integer(&data, "amount"));
        assert!(!integer(&data, "price"));
        assert!(!integer(&data, "zip"));
        assert!(number(&data, "amount"));
        assert!(number(&data, "price"));
        assert!(number(&data, "zip"));
        assert!(!number(&data, "name"));
    }

    #[test]
    fn test_array_and_string() {
        let data = data(json!({"images": ["image1", "image2"], "year": "2001"}));
        assert!(array(&data, "images"));
        assert!(!array(&data, "year"));
        assert!(string(&data, "year"));
        assert!(!string(&data, "images"));
    }

    #[test]
    fn test_confirmed() {
        let same = data(json!({"password": "PASSWORD", "password_confirmation": "PASSWORD"}));
        let different = data(json!({"password": "PASSWORD", "password_confirmation": "password"}));
        let missing = data(json!({"password": "PASSWORD"}));
        assert!(confirmed(&same, "password"));
        assert!(!confirmed(&different, "password"));
        assert!(!confirmed(&missing, "password"));
    }

    #[test]
    fn test_min_max_boundaries() {
        let data = data(json!({"year": "2001", "word": "countme", "age": 3, "low": 2}));
        assert!(min(&data, "year", &params(&["4"])));
        assert!(!min(&data, "year", &params(&["5"])));
        assert!(max(&data, "word", &params(&["7"])));
        assert!(!max(&data, "word", &params(&["6"])));
        assert!(min(&data, "age", &params(&["3"])));
        assert!(!min(&data, "low", &params(&["3"])));
    }

    #[test]
    fn test_min_counts_characters() {
        let data = data(json!({"city": "Zürich"}));
        assert!(max(&data, "city", &params(&["6"])));
    }

    #[test]
    fn test_min_without_parameter_fails() {
        let data = data(json!({"age": 3}));
        assert!(!min(&data, "age", &[]));
        assert!(!max(&data, "age", &params(&["many"])));
    }

    #[test]
    fn test_mimes_absent_passes() {
        let data = data(json!({"other": "x"}));
        assert!(mimes(&data, "uploaded_file", &params(&["png", "jpg", "jpeg"])));
    }

    #[test]
    fn test_mimes_on_text_fails() {
        let data = data(json!({"uploaded_file": "car.jpg"}));
        assert!(!mimes(&data, "uploaded_file", &params(&["jpg"])));
    }

    #[test]
    fn test_url() {
        let data = data(json!({"site": "https://example.com/path", "bad": "not a url", "empty": "", "mail": "mailto:a@b.c"}));
        assert!(url(&data, "site"));
        assert!(!url(&data, "bad"));
        assert!(!url(&data, "empty"));
        assert!(!url(&data, "mail"));
    }

    #[test]
    fn test_required_with_all() {
        let both = data(json!({"field1": "", "checkbox1": "on", "checkbox2": "on"}));
        let one = data(json!({"field1": "", "checkbox1": "on"}));
        let filled = data(json!({"field1": "2018-10-09", "checkbox1": "on", "checkbox2": "on"}));
        let rule = params(&["checkbox1", "checkbox2"]);

        assert!(!required_with_all(&both, "field1", &rule));
        assert!(required_with_all(&one, "field1", &rule));
        assert!(required_with_all(&filled, "field1", &rule));
    }

    #[test]
    fn test_strong_password() {
        let data = data(json!({"good": "8l(F8394850", "weak": "password", "short": "aB3$"}));
        assert!(strong_password(&data, "good", &[], 8));
        assert!(!strong_password(&data, "weak", &[], 8));
        assert!(!strong_password(&data, "short", &[], 8));
        assert!(strong_password(&data, "short", &params(&["4"]), 8));
        assert!(!strong_password(&data, "good", &params(&["12"]), 8));
    }

    #[test]
    fn test_nullable_predicate_always_passes() {
        let data = FlattenedData::new();
        let config = ValidatorConfig::default();
        assert!(Rule::Nullable.check(&data, "anything", &[], &config));
    }

    #[test]
    fn test_dispatch_table() {
        let data = data(json!({"email": "a@b.co"}));
        let config = ValidatorConfig::default();
        assert!(Rule::Email.check(&data, "email", &[], &config));
        assert!(!Rule::Integer.check(&data, "email", &[], &config));
    }
}
