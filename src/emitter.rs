//! Output emission.
//!
//! Entry points that run a full lowering pass and hand back the target
//! expression of the query root.
//!
//! # Examples
//!
//! ```
//! use funcadl_lower::{Environment, Expr, LoweringConfig, emitter::lower_expr};
//!
//! let query = Expr::select(
//!     Expr::name("source"),
//!     Expr::lambda(&["row"], Expr::attr(Expr::name("row"), "pt")),
//! );
//! let env = Environment::default().with_global("source");
//!
//! let rep = lower_expr(&query, &env, &LoweringConfig::default()).unwrap();
//! assert_eq!(
//!     rep,
//!     "(lambda row: (row.pt if hasattr(row, 'pt') else row['pt']))(source)"
//! );
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::{Arena, Expr, Query},
    config::LoweringConfig,
    environment::Environment,
    error::Result,
    lowering::Lowerer,
};

/// Lowered query together with the identifiers its evaluator may bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweredQuery {
    /// Target expression of the whole query
    pub expression: String,

    /// Optional evaluation-time bindings read by the expression
    pub runtime_overrides: Vec<String>,
}

impl LoweredQuery {
    pub fn from_query(query: &Query, env: &Environment, config: &LoweringConfig) -> Result<Self> {
        Ok(LoweredQuery {
            expression: emit(query, env, config)?,
            runtime_overrides: config.runtime_overrides(),
        })
    }
}

/// Lowers the first statement of `query`; an empty query emits nothing.
pub fn emit(query: &Query, env: &Environment, config: &LoweringConfig) -> Result<String> {
    match query.root() {
        Some(expr) => lower_expr(expr, env, config),
        None => Ok(String::new()),
    }
}

/// Runs one lowering pass over `expr`.
pub fn lower_expr(expr: &Expr, env: &Environment, config: &LoweringConfig) -> Result<String> {
    let (mut arena, root) = Arena::from_expr(expr, config.max_depth)?;
    let nodes = arena.len();

    let mut lowerer = Lowerer::new(&mut arena, env, config);
    let result = lowerer.lower(root);
    debug_assert!(lowerer.scopes().is_empty());

    match &result {
        Ok(rep) => debug!(nodes, rewritten = arena.len() - nodes, len = rep.len(), "lowered query"),
        Err(e) => debug!(nodes, error = %e, "lowering failed"),
    }
    result
}
