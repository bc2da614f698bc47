//! Lower JSON-encoded queries

use super::{CliError, parse_query};
use crate::{Environment, LoweredQuery, LoweringConfig, emit};

/// Options for the lower command
#[derive(Debug, Clone, Default)]
pub struct LowerOptions {
    /// JSON-encoded query
    pub input: Option<String>,
    /// Lowering configuration
    pub config: LoweringConfig,
    /// Host globals in addition to the default ones
    pub globals: Vec<String>,
    /// Emit a JSON document instead of the bare expression
    pub json: bool,
}

/// Result of a lower operation
#[derive(Debug)]
pub enum LowerOutput {
    /// Bare target expression
    Expression(String),
    /// Expression with its runtime override identifiers
    Document(LoweredQuery),
}

/// Execute a lower operation
pub fn execute_lower(options: &LowerOptions) -> Result<LowerOutput, CliError> {
    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let query = parse_query(json)?;

    let env = options
        .globals
        .iter()
        .fold(Environment::default(), |env, name| env.with_global(name.clone()));

    if options.json {
        let lowered = LoweredQuery::from_query(&query, &env, &options.config)?;
        Ok(LowerOutput::Document(lowered))
    } else {
        Ok(LowerOutput::Expression(emit(&query, &env, &options.config)?))
    }
}
