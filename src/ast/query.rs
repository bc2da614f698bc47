use serde::{Deserialize, Serialize};

use crate::ast::Expr;

/// Complete query module.
///
/// A module holds expression statements in source order. Only the first one
/// describes the query; an empty module describes no query at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Expression statements
    pub body: Vec<Expr>,
}

impl Query {
    pub fn new(expr: Expr) -> Self {
        Query { body: vec![expr] }
    }

    /// The expression that describes the query, if any.
    pub fn root(&self) -> Option<&Expr> {
        self.body.first()
    }
}

impl From<Expr> for Query {
    fn from(expr: Expr) -> Self {
        Query::new(expr)
    }
}
