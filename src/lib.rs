pub mod ast;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod desugar;
pub mod emitter;
pub mod environment;
pub mod error;
pub mod literal;
pub mod lowering;
pub mod scope;

pub use ast::{Arena, BinOp, BoolOp, CmpOp, Expr, Node, NodeId, Query, UnaryOp};
pub use config::LoweringConfig;
pub use dataset::{DatasetReference, Sources, TreeName};
pub use emitter::{LoweredQuery, emit, lower_expr};
pub use environment::Environment;
pub use error::{LowerError, Result};
pub use lowering::Lowerer;
pub use scope::ScopeTracker;
