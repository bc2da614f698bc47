//! # Query Abstract Syntax Tree
//!
//! This module defines the tree that the lowering engine consumes: a small
//! LINQ-style query language made of scalar/columnar expressions and three
//! composite query operators.
//!
//! ## Architecture Overview
//!
//! - **[expressions]** - The owned input tree ([`Expr`]), as produced by an
//!   upstream parser and (de)serialized as JSON
//! - **[operators]** - Unary, binary, boolean and comparison operators
//! - **[query]** - A complete query module ([`Query`])
//! - **[arena]** - The flattened node arena the lowering pass works on, with
//!   the per-node rep cache
//!
//! ## Quick Start
//!
//! ```text
//! Where(EventDataset('data/events.root', 'tree'), lambda row: row.pt > 25)
//!     .Select(lambda row: [row.pt, row.eta])
//! ```
//!
//! This query keeps the rows whose `pt` exceeds 25 and projects two columns.
//!
//! ## Core Concepts
//!
//! ### Composite Operators
//!
//! - **Select** `source.Select(lambda r: body)` - per-row projection
//! - **SelectMany** `source.SelectMany(lambda r: body)` - projection followed by
//!   one level of flattening
//! - **Where** `source.Where(lambda r: predicate)` - boolean-mask row filtering
//!
//! Each one is desugared into a plain lambda application before lowering.
//!
//! ### Columnar Semantics
//!
//! Operands are whole columns, not scalars. Logical `not`, `and` and `or`
//! therefore lower to element-wise function calls instead of short-circuiting
//! operators.
//!
//! ## JSON Encoding
//!
//! Every node is an object tagged by `"kind"`:
//!
//! ```json
//! {"kind": "attribute", "value": {"kind": "name", "id": "row"}, "attr": "pt"}
//! ```
pub mod arena;
pub mod expressions;
pub mod operators;
pub mod query;

pub use arena::{Arena, Node, NodeId};
pub use expressions::Expr;
pub use operators::{BinOp, BoolOp, CmpOp, UnaryOp};
pub use query::Query;
