//! Built-in attribute validators
//!
//! Validators only see known values. Null and unknown values are skipped by
//! [`crate::schema::Schema::validate`] before a validator is invoked, so each
//! implementation can assume a concrete value of its attribute type.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{AttributePathStep, Diagnostic, Dynamic};
use regex::Regex;

fn invalid(request: &ValidatorRequest, summary: String, detail: String) -> ValidatorResponse {
    ValidatorResponse {
        diagnostics: vec![Diagnostic::error(summary, detail).with_attribute(request.path.clone())],
    }
}

fn valid() -> ValidatorResponse {
    ValidatorResponse {
        diagnostics: Vec::new(),
    }
}

fn describe_path(request: &ValidatorRequest) -> String {
    let mut out = String::new();
    for step in &request.path.steps {
        match step {
            AttributePathStep::AttributeName(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            AttributePathStep::ElementKeyString(key) => out.push_str(&format!("[{:?}]", key)),
            AttributePathStep::ElementKeyInt(idx) => out.push_str(&format!("[{}]", idx)),
        }
    }
    out
}

/// Bounds the character count of a string
pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl StringLengthValidator {
    pub fn at_most(max: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: None,
            max: Some(max),
        })
    }
}

impl Validator for StringLengthValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("string length must be between {} and {}", min, max),
            (Some(min), None) => format!("string length must be at least {}", min),
            (None, Some(max)) => format!("string length must be at most {}", max),
            (None, None) => "any string length".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(s) = request.config_value.value.as_str() else {
            return valid();
        };
        let len = s.chars().count();

        let too_short = self.min.is_some_and(|min| len < min);
        let too_long = self.max.is_some_and(|max| len > max);
        if too_short || too_long {
            return invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("{}, got {}", self.description(), len),
            );
        }
        valid()
    }
}

/// Restricts a string to a fixed set of values
pub struct StringOneOfValidator {
    pub values: Vec<String>,
}

impl StringOneOfValidator {
    pub fn create(values: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }
}

impl Validator for StringOneOfValidator {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.values.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        match request.config_value.value.as_str() {
            Some(s) if !self.values.iter().any(|v| v == s) => invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("{}, got {:?}", self.description(), s),
            ),
            _ => valid(),
        }
    }
}

/// Requires a string to match a regular expression
pub struct StringPatternValidator {
    pub pattern: Regex,
    pub description: String,
}

impl StringPatternValidator {
    /// Returns an error when `pattern` is not a valid regular expression
    pub fn create(pattern: &str, description: &str) -> crate::Result<Box<dyn Validator>> {
        let pattern = Regex::new(pattern)
            .map_err(|e| crate::TfplugError::InvalidConfiguration(e.to_string()))?;
        Ok(Box::new(Self {
            pattern,
            description: description.to_string(),
        }))
    }
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        format!("value must match {}", self.description)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        match request.config_value.value.as_str() {
            Some(s) if !self.pattern.is_match(s) => invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("Value {:?} does not match {}", s, self.description),
            ),
            _ => valid(),
        }
    }
}

/// Bounds a number, inclusive on both ends
pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRangeValidator {
    pub fn between(min: f64, max: f64) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("value must be between {} and {}", min, max),
            (Some(min), None) => format!("value must be at least {}", min),
            (None, Some(max)) => format!("value must be at most {}", max),
            (None, None) => "any number".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(n) = request.config_value.value.as_number() else {
            return valid();
        };
        if self.min.is_some_and(|min| n < min) || self.max.is_some_and(|max| n > max) {
            return invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("{}, got {}", self.description(), n),
            );
        }
        valid()
    }
}

/// Restricts a number to a fixed set of values
pub struct NumberOneOfValidator {
    pub values: Vec<f64>,
}

impl NumberOneOfValidator {
    pub fn create<I: IntoIterator<Item = i64>>(values: I) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.into_iter().map(|v| v as f64).collect(),
        })
    }
}

impl Validator for NumberOneOfValidator {
    fn description(&self) -> String {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        format!("value must be one of: {}", values.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        match request.config_value.value.as_number() {
            Some(n) if !self.values.contains(&n) => invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("{} is not a supported value", n),
            ),
            _ => valid(),
        }
    }
}

/// Bounds the element count of a list, set or map
pub struct SizeValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl SizeValidator {
    pub fn at_least(min: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: None,
        })
    }
}

impl Validator for SizeValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must contain between {} and {} elements", min, max),
            (Some(min), None) => format!("must contain at least {} elements", min),
            (None, Some(max)) => format!("must contain at most {} elements", max),
            (None, None) => "any number of elements".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let len = match &request.config_value.value {
            Dynamic::List(items) => items.len(),
            Dynamic::Map(entries) => entries.len(),
            _ => return valid(),
        };
        if self.min.is_some_and(|min| len < min) || self.max.is_some_and(|max| len > max) {
            return invalid(
                &request,
                format!("Invalid {}", describe_path(&request)),
                format!("{}, got {}", self.description(), len),
            );
        }
        valid()
    }
}

/// Requires every key of a map to match a regular expression
pub struct MapKeysValidator {
    pub pattern: Regex,
    pub description: String,
}

impl MapKeysValidator {
    pub fn create(pattern: &str, description: &str) -> crate::Result<Box<dyn Validator>> {
        let pattern = Regex::new(pattern)
            .map_err(|e| crate::TfplugError::InvalidConfiguration(e.to_string()))?;
        Ok(Box::new(Self {
            pattern,
            description: description.to_string(),
        }))
    }
}

impl Validator for MapKeysValidator {
    fn description(&self) -> String {
        format!("map keys must be {}", self.description)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(entries) = request.config_value.value.as_map() else {
            return valid();
        };

        let mut bad: Vec<&String> = entries
            .keys()
            .filter(|k| !self.pattern.is_match(k))
            .collect();
        if bad.is_empty() {
            return valid();
        }
        bad.sort();

        let diagnostics = bad
            .into_iter()
            .map(|key| {
                Diagnostic::error(
                    format!("Invalid {} key", describe_path(&request)),
                    format!("Key {:?}: {}", key, self.description()),
                )
                .with_attribute(request.path.clone().key(key))
            })
            .collect();
        ValidatorResponse { diagnostics }
    }
}
