//! Validation pipelines and payload normalization for the auth endpoints.
//!
//! Normalization (trimming, role defaulting) runs before validation so the
//! pipelines always see the canonical payload.

use crate::auth::DUPLICATE_USERNAME;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::validation::checks::{RequiredOptions, is_in, is_required, is_string};
use crate::validation::{Check, FieldRules, ValidationContext, ValidationPipeline, sanitize};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};

/// Async check hitting the store: the friendly 409 fast path for duplicate
/// usernames. The table's unique constraint remains the real guard.
struct UsernameIsFree;

impl Check for UsernameIsFree {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        async move {
            let Some(username) = value.and_then(Value::as_str) else {
                return Ok(());
            };
            let repo = UserRepository::new(ctx.pool);
            if repo.username_exists(username).await? {
                return Err(ServiceError::already_exists(DUPLICATE_USERNAME));
            }
            Ok(())
        }
        .boxed()
    }
}

pub fn register_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![
        FieldRules::new(
            |body| body.get("username"),
            vec![
                is_required("Please provide a username.", RequiredOptions::default()),
                is_string("Username must be a string."),
                Box::new(UsernameIsFree),
            ],
        ),
        FieldRules::new(
            |body| body.get("password"),
            vec![
                is_required("Please provide a password.", RequiredOptions::default()),
                is_string("Password must be a string."),
            ],
        ),
        FieldRules::new(
            |body| body.get("role"),
            vec![is_in(
                vec![json!("editor"), json!("admin")],
                "Please choose a valid role.",
            )],
        ),
    ])
}

pub fn login_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![
        FieldRules::new(
            |body| body.get("username"),
            vec![is_required(
                "Please provide a username.",
                RequiredOptions::default(),
            )],
        ),
        FieldRules::new(
            |body| body.get("password"),
            vec![is_required(
                "Please provide a password.",
                RequiredOptions::default(),
            )],
        ),
    ])
}

/// Trims the username and defaults the role to `editor`, ahead of
/// validation so the pipeline vets the defaulted value too.
pub fn normalize_register(body: &mut Value) {
    sanitize::trim(body, |b| b.get_mut("username"));
    // An empty-string role counts as absent, like a null or missing one.
    let missing = match body.get("role") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if missing {
        if let Some(map) = body.as_object_mut() {
            map.insert("role".to_string(), json!("editor"));
        }
    }
}

pub fn normalize_login(body: &mut Value) {
    sanitize::trim(body, |b| b.get_mut("username"));
}
