use serde::{Deserialize, Serialize};

use crate::ast::{BinOp, BoolOp, CmpOp, UnaryOp};

/// Abstract Syntax Tree node representing a query expression.
///
/// This is the owned form handed over by the upstream parser. The lowering
/// pass flattens it into an [`Arena`](crate::ast::Arena) before working on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    // Literals
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer { value: i64 },

    /// Literal floating point number
    ///
    /// # Example
    /// ```text
    /// 2.5
    /// ```
    Float { value: f64 },

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'tree'
    /// ```
    String { value: String },

    /// Boolean literal
    Boolean { value: bool },

    /// Null literal
    Null,

    /// Ordered sequence literal (`[a, b]`)
    List { elements: Vec<Expr> },

    /// Tuple literal (`(a, b)`)
    Tuple { elements: Vec<Expr> },

    /// Set literal (`{a, b}`). Parsed but never lowered.
    Set { elements: Vec<Expr> },

    /// Mapping literal (`{k: v}`)
    Dict { entries: Vec<(Expr, Expr)> },

    // References
    /// Identifier reference
    ///
    /// Resolved against lambda parameters, built-ins and host globals.
    Name { id: String },

    // Operations
    /// Unary operation
    UnaryOp { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// N-ary boolean combination
    ///
    /// # Example
    /// ```text
    /// a and b and c
    /// ```
    BoolOp { op: BoolOp, values: Vec<Expr> },

    /// Comparison chain
    ///
    /// # Example
    /// ```text
    /// 0 < row.pt <= 100
    /// ```
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },

    /// Conditional expression (`body if test else orelse`)
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },

    // Access
    /// Subscript (`value[slice]`)
    Subscript { value: Box<Expr>, slice: Box<Expr> },

    /// Slice (`lower:upper:step`), only meaningful inside a subscript
    Slice {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lower: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<Box<Expr>>,
    },

    /// Multi-dimensional slice (`a:b, c`)
    ExtSlice { dims: Vec<Expr> },

    /// Attribute access (`value.attr`)
    Attribute { value: Box<Expr>, attr: String },

    /// Starred expression (`*value`). Parsed but never lowered.
    Starred { value: Box<Expr> },

    // Functions
    /// Anonymous function
    ///
    /// # Example
    /// ```text
    /// lambda row: row.pt
    /// ```
    Lambda { params: Vec<String>, body: Box<Expr> },

    /// Call
    ///
    /// # Examples
    /// ```text
    /// abs(row.eta)
    /// EventDataset('data/events.root', 'tree')
    /// ```
    Call { func: Box<Expr>, args: Vec<Expr> },

    // Query operators
    /// Row selection (`source.Select(selector)`)
    Select {
        source: Box<Expr>,
        selector: Box<Expr>,
    },

    /// Row expansion (`source.SelectMany(selector)`)
    SelectMany {
        source: Box<Expr>,
        selector: Box<Expr>,
    },

    /// Row filtering (`source.Where(predicate)`)
    Where {
        source: Box<Expr>,
        predicate: Box<Expr>,
    },
}

// Builders, used by callers that assemble trees by hand.
impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Integer { value }
    }

    pub fn float(value: f64) -> Self {
        Expr::Float { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Boolean { value }
    }

    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name { id: id.into() }
    }

    pub fn list(elements: Vec<Expr>) -> Self {
        Expr::List { elements }
    }

    pub fn tuple(elements: Vec<Expr>) -> Self {
        Expr::Tuple { elements }
    }

    pub fn dict(entries: Vec<(Expr, Expr)>) -> Self {
        Expr::Dict { entries }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn boolean_op(op: BoolOp, values: Vec<Expr>) -> Self {
        Expr::BoolOp { op, values }
    }

    /// Single comparison `left op right`.
    pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    pub fn if_exp(test: Expr, body: Expr, orelse: Expr) -> Self {
        Expr::IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        }
    }

    pub fn subscript(value: Expr, slice: Expr) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
        }
    }

    pub fn slice(lower: Option<Expr>, upper: Option<Expr>, step: Option<Expr>) -> Self {
        Expr::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: step.map(Box::new),
        }
    }

    pub fn attr(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn lambda(params: &[&str], body: Expr) -> Self {
        Expr::Lambda {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
        }
    }

    pub fn select(source: Expr, selector: Expr) -> Self {
        Expr::Select {
            source: Box::new(source),
            selector: Box::new(selector),
        }
    }

    pub fn select_many(source: Expr, selector: Expr) -> Self {
        Expr::SelectMany {
            source: Box::new(source),
            selector: Box::new(selector),
        }
    }

    pub fn filter(source: Expr, predicate: Expr) -> Self {
        Expr::Where {
            source: Box::new(source),
            predicate: Box::new(predicate),
        }
    }
}
