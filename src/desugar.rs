//! Operator desugaring.
//!
//! The three composite query operators are rewritten into plain lambda
//! applications and then lowered like any other call:
//!
//! ```text
//! src.Select(lambda r: [r.a, r.b])  =>  (lambda r: awkward.Table(r.a, r.b))(src)
//! src.SelectMany(lambda r: r.v)     =>  (lambda r: r.v.flatten())(src)
//! src.Where(lambda r: r.a < 0)      =>  (lambda r: r[r.a < 0])(src)
//! ```
//!
//! Rewrites allocate fresh nodes. The operator's own children are shared with
//! the rewritten tree but never modified.

use tracing::trace;

use crate::{
    ast::{Node, NodeId},
    error::{LowerError, Result},
    lowering::Lowerer,
};

impl Lowerer<'_> {
    pub(crate) fn lower_select(&mut self, source: NodeId, selector: NodeId) -> Result<String> {
        let (params, body) = self.unary_lambda("Select", selector)?;
        self.lower_projection(params, body, source)
    }

    pub(crate) fn lower_select_many(&mut self, source: NodeId, selector: NodeId) -> Result<String> {
        let (params, body) = self.unary_lambda("SelectMany", selector)?;

        // Flatten the components first; record construction sees them as-is
        let flattened = match self.arena.get(body).clone() {
            Node::List(elements) => {
                let elements = elements.into_iter().map(|e| self.flatten(e)).collect();
                self.arena.alloc(Node::List(elements))
            }
            Node::Tuple(elements) => {
                let elements = elements.into_iter().map(|e| self.flatten(e)).collect();
                self.arena.alloc(Node::Tuple(elements))
            }
            Node::Dict(entries) => {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (key, self.flatten(value)))
                    .collect();
                self.arena.alloc(Node::Dict(entries))
            }
            _ => self.flatten(body),
        };

        self.lower_projection(params, flattened, source)
    }

    pub(crate) fn lower_where(&mut self, source: NodeId, predicate: NodeId) -> Result<String> {
        let (params, body) = self.unary_lambda("Where", predicate)?;

        let row = self.arena.alloc(Node::Name(params[0].clone()));
        let masked = self.arena.alloc(Node::Subscript {
            value: row,
            slice: body,
        });
        trace!(param = %params[0], "rewrote Where predicate into a boolean mask");

        let call = self.apply(params, masked, source);
        self.lower(call)
    }

    /// Shared tail of Select and SelectMany.
    fn lower_projection(&mut self, params: Vec<String>, body: NodeId, source: NodeId) -> Result<String> {
        let body = self.shape_record(body);
        let call = self.apply(params, body, source);
        self.lower(call)
    }

    /// Checks that `id` is a lambda taking exactly one parameter.
    fn unary_lambda(&self, operator: &str, id: NodeId) -> Result<(Vec<String>, NodeId)> {
        match self.arena.get(id) {
            Node::Lambda { params, body } if params.len() == 1 => Ok((params.clone(), *body)),
            Node::Lambda { params, .. } => Err(LowerError::OperatorArity {
                operator: format!("Lambda function in {operator}()"),
                expected: "exactly 1".to_string(),
                found: params.len(),
            }),
            other => Err(LowerError::MalformedQuery(format!(
                "Argument to {operator}() must be a lambda function, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Turns list/tuple/dict selector bodies into a structured-record
    /// construction. Any other body is returned unchanged.
    fn shape_record(&mut self, body: NodeId) -> NodeId {
        let args = match self.arena.get(body) {
            Node::List(elements) | Node::Tuple(elements) => elements.clone(),
            Node::Dict(_) => vec![body],
            _ => return body,
        };
        trace!(fields = args.len(), "building structured record");

        let module = self.arena.alloc(Node::Name(self.config.record_module.clone()));
        let constructor = self.arena.alloc(Node::Attribute {
            value: module,
            attr: self.config.record_constructor.clone(),
        });
        self.arena.alloc(Node::Call {
            func: constructor,
            args,
        })
    }

    /// `value.flatten()`
    fn flatten(&mut self, value: NodeId) -> NodeId {
        let method = self.arena.alloc(Node::Attribute {
            value,
            attr: self.config.flatten_method.clone(),
        });
        self.arena.alloc(Node::Call {
            func: method,
            args: Vec::new(),
        })
    }

    /// `(lambda params: body)(source)`
    fn apply(&mut self, params: Vec<String>, body: NodeId, source: NodeId) -> NodeId {
        let lambda = self.arena.alloc(Node::Lambda { params, body });
        self.arena.alloc(Node::Call {
            func: lambda,
            args: vec![source],
        })
    }
}
