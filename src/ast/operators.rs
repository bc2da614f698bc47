use serde::{Deserialize, Serialize};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Unary plus (`+x`)
    UAdd,
    /// Negation (`-x`)
    USub,
    /// Bitwise inversion (`~x`)
    Invert,
    /// Logical negation (`not x`), applied element-wise
    Not,
}

impl UnaryOp {
    /// Infix spelling in the target language, `None` for element-wise `not`.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            UnaryOp::UAdd => Some("+"),
            UnaryOp::USub => Some("-"),
            UnaryOp::Invert => Some("~"),
            UnaryOp::Not => None,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mult,
    /// True division (`/`)
    Div,
    /// Floor division (`//`)
    FloorDiv,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`**`)
    Pow,
    /// Matrix multiplication (`@`), which has no columnar lowering
    MatMult,

    // Bitwise
    /// Left shift (`<<`)
    LShift,
    /// Right shift (`>>`)
    RShift,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Bitwise and (`&`)
    BitAnd,
}

impl BinOp {
    /// Infix spelling in the target language, `None` when unsupported.
    pub fn symbol(self) -> Option<&'static str> {
        Some(match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mult => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::MatMult => return None,
        })
    }
}

/// N-ary boolean combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl BoolOp {
    /// Element-wise function that replaces the short-circuiting operator.
    pub fn function(self) -> &'static str {
        match self {
            BoolOp::And => "np.logical_and",
            BoolOp::Or => "np.logical_or",
        }
    }
}

/// Comparison operators, as found in a comparison chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`)
    NotEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    LtE,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    GtE,
    /// Identity (`is`)
    Is,
    /// Negated identity (`is not`)
    IsNot,
    /// Membership (`in`)
    In,
    /// Negated membership (`not in`)
    NotIn,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}
