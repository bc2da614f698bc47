//! Expression lowering engine.
//!
//! Converts arena nodes into target expressions, one node kind at a time.
//! Every node is lowered at most once: its rep is cached in the arena and
//! returned verbatim on later visits. Composite query operators are handed to
//! the [desugarer](crate::desugar) and dataset-construction calls to the
//! [dataset resolver](crate::dataset) before any generic lowering happens.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{
    ast::{Arena, Node, NodeId},
    config::LoweringConfig,
    environment::Environment,
    error::{LowerError, Result},
    literal,
    scope::ScopeTracker,
};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Words the target language reserves; none of them can name an attribute or
/// a parameter.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Rejects names that would not read back as a single identifier once
/// spliced into the output.
fn check_identifier(name: &str, role: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) && !KEYWORDS.contains(&name) {
        Ok(())
    } else {
        Err(LowerError::MalformedQuery(format!("invalid {role} name {name:?}")))
    }
}

/// State of a single lowering pass.
pub struct Lowerer<'a> {
    pub(crate) arena: &'a mut Arena,
    pub(crate) env: &'a Environment,
    pub(crate) config: &'a LoweringConfig,
    scopes: ScopeTracker,
    depth: usize,
}

impl<'a> Lowerer<'a> {
    pub fn new(arena: &'a mut Arena, env: &'a Environment, config: &'a LoweringConfig) -> Self {
        Lowerer {
            arena,
            env,
            config,
            scopes: ScopeTracker::new(),
            depth: 0,
        }
    }

    pub fn scopes(&self) -> &ScopeTracker {
        &self.scopes
    }

    /// Lowers `id`, returning its cached rep when it already has one.
    pub fn lower(&mut self, id: NodeId) -> Result<String> {
        if let Some(rep) = self.arena.rep(id) {
            return Ok(rep.to_string());
        }

        if self.depth >= self.config.max_depth {
            return Err(LowerError::depth_exceeded(self.config.max_depth));
        }

        self.depth += 1;
        let result = self.dispatch(id);
        self.depth -= 1;

        let rep = result?;
        Ok(self.arena.attach_rep(id, rep).to_string())
    }

    /// Lowers an optional child, rendering an absent one as empty.
    fn lower_opt(&mut self, id: Option<NodeId>) -> Result<String> {
        match id {
            Some(id) => self.lower(id),
            None => Ok(String::new()),
        }
    }

    fn lower_all(&mut self, ids: &[NodeId]) -> Result<Vec<String>> {
        ids.iter().map(|id| self.lower(*id)).collect()
    }

    /// Runs `f` with `names` bound, unbinding on every exit path.
    pub(crate) fn with_bindings<T>(
        &mut self,
        names: &[String],
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.scopes.bind(names);
        let result = f(self);
        self.scopes.unbind();
        result
    }

    fn dispatch(&mut self, id: NodeId) -> Result<String> {
        let node = self.arena.get(id).clone();
        match node {
            // Literals
            Node::Integer(n) => Ok(literal::render_int(n)),
            Node::Float(n) => Ok(literal::render_float(n)),
            Node::String(s) => Ok(literal::render_str(&s)),
            Node::Boolean(b) => Ok(literal::render_bool(b).to_string()),
            Node::Null => Ok(literal::NONE.to_string()),

            Node::List(elements) => Ok(format!("[{}]", self.lower_all(&elements)?.join(", "))),
            Node::Tuple(elements) => {
                let items = self.lower_all(&elements)?;
                if items.len() == 1 {
                    Ok(format!("({},)", items[0]))
                } else {
                    Ok(format!("({})", items.join(", ")))
                }
            }
            Node::Dict(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = self.lower(key)?;
                    let value = self.lower(value)?;
                    items.push(format!("{key}: {value}"));
                }
                Ok(format!("{{{}}}", items.join(", ")))
            }

            // References
            Node::Name(name) => self.resolve_name(&name),

            // Operations
            Node::UnaryOp { op, operand } => {
                let operand = self.lower(operand)?;
                match op.symbol() {
                    Some(symbol) => Ok(format!("({symbol}{operand})")),
                    None => Ok(format!("np.logical_not({operand})")),
                }
            }
            Node::BinOp { op, left, right } => {
                let left = self.lower(left)?;
                let symbol = op.symbol().ok_or_else(|| {
                    LowerError::UnsupportedOperator(format!("binary operation {op:?}"))
                })?;
                let right = self.lower(right)?;
                Ok(format!("({left} {symbol} {right})"))
            }
            Node::BoolOp { op, values } => {
                let values = self.lower_all(&values)?;
                Ok(format!("{}({})", op.function(), values.join(", ")))
            }
            Node::Compare {
                left,
                ops,
                comparators,
            } => {
                if ops.len() != comparators.len() {
                    return Err(LowerError::MalformedQuery(format!(
                        "comparison has {} operators but {} comparators",
                        ops.len(),
                        comparators.len()
                    )));
                }
                let mut rep = format!("({}", self.lower(left)?);
                for (op, comparator) in ops.iter().zip(comparators) {
                    let comparator = self.lower(comparator)?;
                    rep.push_str(&format!(" {} {comparator}", op.symbol()));
                }
                rep.push(')');
                Ok(rep)
            }
            Node::IfExp { test, body, orelse } => {
                let body = self.lower(body)?;
                let test = self.lower(test)?;
                let orelse = self.lower(orelse)?;
                Ok(format!("({body} if {test} else {orelse})"))
            }

            // Access
            Node::Subscript { value, slice } => {
                let value = self.lower(value)?;
                let slice = match self.arena.get(slice).clone() {
                    Node::Tuple(dims) => self.lower_all(&dims)?.join(", "),
                    _ => self.lower(slice)?,
                };
                Ok(format!("{value}[{slice}]"))
            }
            Node::Slice { lower, upper, step } => {
                let mut rep = format!("{}:{}", self.lower_opt(lower)?, self.lower_opt(upper)?);
                let step = self.lower_opt(step)?;
                if !step.is_empty() {
                    rep.push(':');
                    rep.push_str(&step);
                }
                Ok(rep)
            }
            Node::ExtSlice(dims) => Ok(self.lower_all(&dims)?.join(", ")),
            Node::Attribute { value, attr } => {
                // Rows may be structured records or plain mappings
                check_identifier(&attr, "attribute")?;
                let value = self.lower(value)?;
                Ok(format!(
                    "({value}.{attr} if hasattr({value}, '{attr}') else {value}['{attr}'])"
                ))
            }

            // Functions
            Node::Lambda { params, body } => {
                for param in &params {
                    check_identifier(param, "lambda parameter")?;
                }
                let body = self.with_bindings(&params, |this| this.lower(body))?;
                if params.is_empty() {
                    Ok(format!("(lambda: {body})"))
                } else {
                    Ok(format!("(lambda {}: {body})", params.join(", ")))
                }
            }
            Node::Call { func, args } => {
                if matches!(self.arena.get(func), Node::Name(name) if *name == self.config.dataset_call)
                {
                    return self.lower_dataset_call(&args);
                }
                let func = self.lower(func)?;
                let args = self.lower_all(&args)?;
                Ok(format!("{func}({})", args.join(", ")))
            }

            // Query operators
            Node::Select { source, selector } => {
                trace!(node = id.index(), "desugaring Select");
                self.lower_select(source, selector)
            }
            Node::SelectMany { source, selector } => {
                trace!(node = id.index(), "desugaring SelectMany");
                self.lower_select_many(source, selector)
            }
            Node::Where { source, predicate } => {
                trace!(node = id.index(), "desugaring Where");
                self.lower_where(source, predicate)
            }

            node @ (Node::Set(_) | Node::Starred(_)) => Err(LowerError::UnsupportedOperator(
                node.kind_name().to_string(),
            )),
        }
    }

    fn resolve_name(&self, name: &str) -> Result<String> {
        if self.scopes.contains(name) || self.env.is_builtin(name) || self.env.is_global(name) {
            Ok(name.to_string())
        } else {
            Err(LowerError::UnresolvedIdentifier(name.to_string()))
        }
    }
}
