//! Declarative request-field validation.
//!
//! A pipeline is an ordered list of stages; each stage binds one field of
//! the request body to an ordered list of checks. Checks run strictly in
//! order and the first failure aborts the whole pipeline, so later checks
//! may assume earlier ones passed (type checks before format checks, for
//! example). Checks that need the store are async; everything runs
//! sequentially within one request.
//!
//! Fields are bound with accessor functions rather than dotted path
//! strings, so a stage that reaches into a nested object is an ordinary
//! `|body| body.get("profile").and_then(|p| p.get("name"))`. A missing
//! intermediate object simply resolves to `None`, which every check except
//! the required ones treats as valid: optionality is the default and
//! required-ness is opt-in.

use crate::errors::ServiceResult;
use futures::future::BoxFuture;
use serde_json::Value;
use sqlx::SqlitePool;

pub mod checks;
pub mod sanitize;

/// Read-only view of the incoming request shared with every check. Checks
/// can inspect sibling fields through `body` and hit the store through
/// `pool`.
pub struct ValidationContext<'a> {
    pub pool: &'a SqlitePool,
    pub body: &'a Value,
}

/// Resolves one field inside the request body.
pub type FieldAccessor = fn(&Value) -> Option<&Value>;

/// A single validation rule applied to one field's value.
pub trait Check: Send + Sync {
    fn run<'a>(
        &'a self,
        value: Option<&'a Value>,
        ctx: &'a ValidationContext<'a>,
    ) -> BoxFuture<'a, ServiceResult<()>>;
}

/// One field accessor plus its ordered checks.
pub struct FieldRules {
    accessor: FieldAccessor,
    checks: Vec<Box<dyn Check>>,
}

impl FieldRules {
    pub fn new(accessor: FieldAccessor, checks: Vec<Box<dyn Check>>) -> Self {
        Self { accessor, checks }
    }
}

/// Ordered stages executed left-to-right with short-circuit on the first
/// failure.
pub struct ValidationPipeline {
    stages: Vec<FieldRules>,
}

impl ValidationPipeline {
    pub fn new(stages: Vec<FieldRules>) -> Self {
        Self { stages }
    }

    /// Runs every stage in order; surfaces exactly the first error.
    pub async fn run(&self, ctx: &ValidationContext<'_>) -> ServiceResult<()> {
        for stage in &self.stages {
            let value = (stage.accessor)(ctx.body);
            for check in &stage.checks {
                check.run(value, ctx).await?;
            }
        }
        Ok(())
    }
}
