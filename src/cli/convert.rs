//! JSON -> query tree conversion

use serde::Deserialize;

use crate::{Expr, Query};

/// Accepted top-level JSON shapes: a full module or a bare expression.
#[derive(Deserialize)]
#[serde(untagged)]
enum QueryDocument {
    Module(Query),
    Expression(Expr),
}

/// Parse a query from its JSON encoding.
pub fn parse_query(json: &str) -> Result<Query, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        QueryDocument::Module(query) => query,
        QueryDocument::Expression(expr) => Query::new(expr),
    })
}
