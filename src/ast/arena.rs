use crate::{
    ast::{BinOp, BoolOp, CmpOp, Expr, UnaryOp},
    error::{LowerError, Result},
};

/// Index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A flattened query node. Children are referenced by [`NodeId`].
///
/// Nodes are never modified after allocation. Rewrites allocate new nodes
/// that may share children with the nodes they replace.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    List(Vec<NodeId>),
    Tuple(Vec<NodeId>),
    Set(Vec<NodeId>),
    Dict(Vec<(NodeId, NodeId)>),
    Name(String),
    UnaryOp {
        op: UnaryOp,
        operand: NodeId,
    },
    BinOp {
        op: BinOp,
        left: NodeId,
        right: NodeId,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<NodeId>,
    },
    Compare {
        left: NodeId,
        ops: Vec<CmpOp>,
        comparators: Vec<NodeId>,
    },
    IfExp {
        test: NodeId,
        body: NodeId,
        orelse: NodeId,
    },
    Subscript {
        value: NodeId,
        slice: NodeId,
    },
    Slice {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
        step: Option<NodeId>,
    },
    ExtSlice(Vec<NodeId>),
    Attribute {
        value: NodeId,
        attr: String,
    },
    Starred(NodeId),
    Lambda {
        params: Vec<String>,
        body: NodeId,
    },
    Call {
        func: NodeId,
        args: Vec<NodeId>,
    },
    Select {
        source: NodeId,
        selector: NodeId,
    },
    SelectMany {
        source: NodeId,
        selector: NodeId,
    },
    Where {
        source: NodeId,
        predicate: NodeId,
    },
}

impl Node {
    /// Human-readable name of the node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Integer(_) => "integer literal",
            Node::Float(_) => "float literal",
            Node::String(_) => "string literal",
            Node::Boolean(_) => "boolean literal",
            Node::Null => "null literal",
            Node::List(_) => "list literal",
            Node::Tuple(_) => "tuple literal",
            Node::Set(_) => "set literal",
            Node::Dict(_) => "dict literal",
            Node::Name(_) => "name",
            Node::UnaryOp { .. } => "unary operation",
            Node::BinOp { .. } => "binary operation",
            Node::BoolOp { .. } => "boolean operation",
            Node::Compare { .. } => "comparison",
            Node::IfExp { .. } => "conditional expression",
            Node::Subscript { .. } => "subscript",
            Node::Slice { .. } => "slice",
            Node::ExtSlice(_) => "extended slice",
            Node::Attribute { .. } => "attribute access",
            Node::Starred(_) => "starred expression",
            Node::Lambda { .. } => "lambda",
            Node::Call { .. } => "call",
            Node::Select { .. } => "Select",
            Node::SelectMany { .. } => "SelectMany",
            Node::Where { .. } => "Where",
        }
    }
}

/// Node storage for one lowering pass.
///
/// Each node owns one slot in a parallel rep cache. A slot is filled at most
/// once: after a node is lowered its rep never changes.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    reps: Vec<Option<String>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens an owned expression tree, returning the id of its root.
    ///
    /// Trees nested deeper than `max_depth` are rejected before any
    /// recursion past that depth happens.
    pub fn from_expr(expr: &Expr, max_depth: usize) -> Result<(Self, NodeId)> {
        let mut arena = Arena::new();
        let root = arena.insert(expr, max_depth)?;
        Ok((arena, root))
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.reps.push(None);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cached rep of a node, if it has been lowered.
    pub fn rep(&self, id: NodeId) -> Option<&str> {
        self.reps[id.0].as_deref()
    }

    /// Attaches a rep to a node. An already attached rep is kept.
    pub fn attach_rep(&mut self, id: NodeId, rep: String) -> &str {
        self.reps[id.0].get_or_insert(rep)
    }

    /// Recursively allocates `expr` and its children, at most `max_depth`
    /// levels deep.
    pub fn insert(&mut self, expr: &Expr, max_depth: usize) -> Result<NodeId> {
        self.insert_at(expr, max_depth, max_depth)
    }

    fn insert_at(&mut self, expr: &Expr, remaining: usize, max_depth: usize) -> Result<NodeId> {
        if remaining == 0 {
            return Err(LowerError::depth_exceeded(max_depth));
        }
        let next = remaining - 1;
        let child = |arena: &mut Self, e: &Expr| arena.insert_at(e, next, max_depth);

        let node = match expr {
            Expr::Integer { value } => Node::Integer(*value),
            Expr::Float { value } => Node::Float(*value),
            Expr::String { value } => Node::String(value.clone()),
            Expr::Boolean { value } => Node::Boolean(*value),
            Expr::Null => Node::Null,
            Expr::List { elements } => Node::List(self.insert_all(elements, next, max_depth)?),
            Expr::Tuple { elements } => Node::Tuple(self.insert_all(elements, next, max_depth)?),
            Expr::Set { elements } => Node::Set(self.insert_all(elements, next, max_depth)?),
            Expr::Dict { entries } => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    pairs.push((child(self, key)?, child(self, value)?));
                }
                Node::Dict(pairs)
            }
            Expr::Name { id } => Node::Name(id.clone()),
            Expr::UnaryOp { op, operand } => Node::UnaryOp {
                op: *op,
                operand: child(self, operand)?,
            },
            Expr::BinOp { op, left, right } => Node::BinOp {
                op: *op,
                left: child(self, left)?,
                right: child(self, right)?,
            },
            Expr::BoolOp { op, values } => Node::BoolOp {
                op: *op,
                values: self.insert_all(values, next, max_depth)?,
            },
            Expr::Compare {
                left,
                ops,
                comparators,
            } => Node::Compare {
                left: child(self, left)?,
                ops: ops.clone(),
                comparators: self.insert_all(comparators, next, max_depth)?,
            },
            Expr::IfExp { test, body, orelse } => Node::IfExp {
                test: child(self, test)?,
                body: child(self, body)?,
                orelse: child(self, orelse)?,
            },
            Expr::Subscript { value, slice } => Node::Subscript {
                value: child(self, value)?,
                slice: child(self, slice)?,
            },
            Expr::Slice { lower, upper, step } => Node::Slice {
                lower: lower.as_deref().map(|e| child(self, e)).transpose()?,
                upper: upper.as_deref().map(|e| child(self, e)).transpose()?,
                step: step.as_deref().map(|e| child(self, e)).transpose()?,
            },
            Expr::ExtSlice { dims } => Node::ExtSlice(self.insert_all(dims, next, max_depth)?),
            Expr::Attribute { value, attr } => Node::Attribute {
                value: child(self, value)?,
                attr: attr.clone(),
            },
            Expr::Starred { value } => Node::Starred(child(self, value)?),
            Expr::Lambda { params, body } => Node::Lambda {
                params: params.clone(),
                body: child(self, body)?,
            },
            Expr::Call { func, args } => Node::Call {
                func: child(self, func)?,
                args: self.insert_all(args, next, max_depth)?,
            },
            Expr::Select { source, selector } => Node::Select {
                source: child(self, source)?,
                selector: child(self, selector)?,
            },
            Expr::SelectMany { source, selector } => Node::SelectMany {
                source: child(self, source)?,
                selector: child(self, selector)?,
            },
            Expr::Where { source, predicate } => Node::Where {
                source: child(self, source)?,
                predicate: child(self, predicate)?,
            },
        };
        Ok(self.alloc(node))
    }

    fn insert_all(
        &mut self,
        exprs: &[Expr],
        remaining: usize,
        max_depth: usize,
    ) -> Result<Vec<NodeId>> {
        exprs
            .iter()
            .map(|e| self.insert_at(e, remaining, max_depth))
            .collect()
    }
}
