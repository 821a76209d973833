//! Built-in checks for the validation pipeline.
//!
//! Every built-in except the required ones treats an absent value as
//! automatically valid. All failures are 400 validation errors carrying
//! the message supplied at the call site.

use super::{Check, ValidationContext};
use crate::errors::{ServiceError, ServiceResult};
use chrono::{DateTime, NaiveDate};
use futures::FutureExt;
use futures::future::{BoxFuture, ready};
use serde_json::Value;

/// Options softening the presence requirement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredOptions {
    pub allow_null: bool,
    pub allow_empty_string: bool,
}

fn check_presence(
    value: Option<&Value>,
    options: RequiredOptions,
    message: &str,
) -> ServiceResult<()> {
    match value {
        None => Err(ServiceError::validation(message)),
        Some(Value::Null) if !options.allow_null => Err(ServiceError::validation(message)),
        Some(Value::String(s)) if s.is_empty() && !options.allow_empty_string => {
            Err(ServiceError::validation(message))
        }
        Some(_) => Ok(()),
    }
}

struct Required {
    message: String,
    options: RequiredOptions,
}

impl Check for Required {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        _ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        ready(check_presence(value, self.options, &self.message)).boxed()
    }
}

/// Fails when the value is absent, null (unless allowed), or an empty
/// string (unless allowed).
pub fn is_required(message: impl Into<String>, options: RequiredOptions) -> Box<dyn Check> {
    Box::new(Required {
        message: message.into(),
        options,
    })
}

struct RequiredIf {
    predicate: Box<dyn Fn(&ValidationContext<'_>) -> bool + Send + Sync>,
    message: String,
    options: RequiredOptions,
}

impl Check for RequiredIf {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        let outcome = if (self.predicate)(ctx) {
            check_presence(value, self.options, &self.message)
        } else {
            Ok(())
        };
        ready(outcome).boxed()
    }
}

/// Same as [`is_required`], gated on a predicate over the request.
pub fn is_required_if(
    predicate: impl Fn(&ValidationContext<'_>) -> bool + Send + Sync + 'static,
    message: impl Into<String>,
    options: RequiredOptions,
) -> Box<dyn Check> {
    Box::new(RequiredIf {
        predicate: Box::new(predicate),
        message: message.into(),
        options,
    })
}

/// The JSON shapes the optional type checks accept.
enum Expected {
    String,
    Boolean,
    Array,
    Date,
    ObjectId,
}

struct TypeCheck {
    expected: Expected,
    message: String,
}

fn is_calendar_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_object_id_str(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

impl Check for TypeCheck {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        _ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        let valid = match value {
            // Absence is not a type error; required-ness is a separate check.
            None => true,
            Some(value) => match self.expected {
                Expected::String => value.is_string(),
                Expected::Boolean => value.is_boolean(),
                Expected::Array => value.is_array(),
                Expected::Date => value.as_str().is_some_and(is_calendar_date),
                Expected::ObjectId => value.as_str().is_some_and(is_object_id_str),
            },
        };

        let outcome = if valid {
            Ok(())
        } else {
            Err(ServiceError::validation(self.message.clone()))
        };
        ready(outcome).boxed()
    }
}

fn type_check(expected: Expected, message: impl Into<String>) -> Box<dyn Check> {
    Box::new(TypeCheck {
        expected,
        message: message.into(),
    })
}

/// Fails when the value is present but not a string.
pub fn is_string(message: impl Into<String>) -> Box<dyn Check> {
    type_check(Expected::String, message)
}

/// Fails when the value is present but not a boolean.
pub fn is_boolean(message: impl Into<String>) -> Box<dyn Check> {
    type_check(Expected::Boolean, message)
}

/// Fails when the value is present but not an array.
pub fn is_array(message: impl Into<String>) -> Box<dyn Check> {
    type_check(Expected::Array, message)
}

/// Fails when the value is present but not an RFC 3339 date-time or a
/// `YYYY-MM-DD` calendar date.
pub fn is_date(message: impl Into<String>) -> Box<dyn Check> {
    type_check(Expected::Date, message)
}

/// Fails when the value is present but not a 24-character lowercase-hex
/// object id.
pub fn is_object_id(message: impl Into<String>) -> Box<dyn Check> {
    type_check(Expected::ObjectId, message)
}

struct InSet {
    allowed: Vec<Value>,
    message: String,
}

impl Check for InSet {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        _ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        let outcome = match value {
            None => Ok(()),
            Some(value) if self.allowed.contains(value) => Ok(()),
            Some(_) => Err(ServiceError::validation(self.message.clone())),
        };
        ready(outcome).boxed()
    }
}

/// Fails when the value is present and not a member of the allowed set.
pub fn is_in(allowed: Vec<Value>, message: impl Into<String>) -> Box<dyn Check> {
    Box::new(InSet {
        allowed,
        message: message.into(),
    })
}
