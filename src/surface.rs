// The surface language: Winskel-style while-programs over single-letter
// variables. The tree is immutable once parsed; the rewriter only reads it.

use std::fmt::Display;
use std::rc::Rc;

use crate::util::Located;

pub type Prog = Located<ProgData>;
#[derive(Debug, Clone)]
pub struct ProgData {
    pub body: Stmt,
}

pub type Stmt = Located<StmtData>;
#[derive(Debug, Clone)]
pub enum StmtData {
    Assign {
        target: char,
        value: Exp,
    },
    Seq {
        first: Rc<Stmt>,
        second: Rc<Stmt>,
    },
    If {
        cond: Cond,
        then_branch: Rc<Stmt>,
        else_branch: Option<Rc<Stmt>>,
    },
    While {
        cond: Cond,
        body: Rc<Stmt>,
    },
    Block {
        inner: Rc<Stmt>,
    },
    Skip,
}

pub type Exp = Located<ExpData>;
#[derive(Debug, Clone)]
pub enum ExpData {
    Numeral(String),
    Var(char),
    BinOp {
        op: ArithOp,
        e1: Rc<Exp>,
        e2: Rc<Exp>,
    },
    Paren {
        inner: Rc<Exp>,
    },
}

pub type Cond = Located<CondData>;
#[derive(Debug, Clone)]
pub enum CondData {
    BoolLit(bool),
    Compare {
        op: CmpOp,
        e1: Rc<Exp>,
        e2: Rc<Exp>,
    },
    Or {
        c1: Rc<Cond>,
        c2: Rc<Cond>,
    },
    And {
        c1: Rc<Cond>,
        c2: Rc<Cond>,
    },
    Not {
        inner: Rc<Cond>,
    },
    Paren {
        inner: Rc<Cond>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Less,
    LessEq,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
}

impl ProgData {
    pub fn node_count(&self) -> usize {
        1 + self.body.data.node_count()
    }
}

impl StmtData {
    pub fn node_count(&self) -> usize {
        1 + match self {
            StmtData::Assign { value, .. } => value.data.node_count(),
            StmtData::Seq { first, second } => {
                first.data.node_count() + second.data.node_count()
            }
            StmtData::If {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.data.node_count()
                    + then_branch.data.node_count()
                    + else_branch
                        .as_ref()
                        .map(|s| s.data.node_count())
                        .unwrap_or(0)
            }
            StmtData::While { cond, body } => {
                cond.data.node_count() + body.data.node_count()
            }
            StmtData::Block { inner } => inner.data.node_count(),
            StmtData::Skip => 0,
        }
    }
}

impl ExpData {
    pub fn node_count(&self) -> usize {
        1 + match self {
            ExpData::Numeral(_) | ExpData::Var(_) => 0,
            ExpData::BinOp { e1, e2, .. } => e1.data.node_count() + e2.data.node_count(),
            ExpData::Paren { inner } => inner.data.node_count(),
        }
    }
}

impl CondData {
    pub fn node_count(&self) -> usize {
        1 + match self {
            CondData::BoolLit(_) => 0,
            CondData::Compare { e1, e2, .. } => e1.data.node_count() + e2.data.node_count(),
            CondData::Or { c1, c2 } | CondData::And { c1, c2 } => {
                c1.data.node_count() + c2.data.node_count()
            }
            CondData::Not { inner } | CondData::Paren { inner } => inner.data.node_count(),
        }
    }
}

// Display reconstructs the token stream of a subtree, space-separated. This
// is what the pending placeholders in the rewrite trace print between their
// parentheses.

impl Display for ProgData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        format!("begin {} end", self.body).fmt(f)
    }
}

impl Display for StmtData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StmtData::Assign { target, value } => format!("{} := {}", target, value).fmt(f),
            StmtData::Seq { first, second } => format!("{} ; {}", first, second).fmt(f),
            StmtData::If {
                cond,
                then_branch,
                else_branch: None,
            } => format!("if {} then {}", cond, then_branch).fmt(f),
            StmtData::If {
                cond,
                then_branch,
                else_branch: Some(else_branch),
            } => format!("if {} then {} else {}", cond, then_branch, else_branch).fmt(f),
            StmtData::While { cond, body } => format!("while {} do {}", cond, body).fmt(f),
            StmtData::Block { inner } => format!("begin {} end", inner).fmt(f),
            StmtData::Skip => "skip".fmt(f),
        }
    }
}

impl Display for ExpData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpData::Numeral(digits) => digits.fmt(f),
            ExpData::Var(name) => name.fmt(f),
            ExpData::BinOp { op, e1, e2 } => format!("{} {} {}", e1, op, e2).fmt(f),
            ExpData::Paren { inner } => format!("( {} )", inner).fmt(f),
        }
    }
}

impl Display for CondData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CondData::BoolLit(b) => b.fmt(f),
            CondData::Compare { op, e1, e2 } => format!("{} {} {}", e1, op, e2).fmt(f),
            CondData::Or { c1, c2 } => format!("{} or {}", c1, c2).fmt(f),
            CondData::And { c1, c2 } => format!("{} and {}", c1, c2).fmt(f),
            CondData::Not { inner } => format!("not {}", inner).fmt(f),
            CondData::Paren { inner } => format!("( {} )", inner).fmt(f),
        }
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
        .fmt(f)
    }
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpOp::Less => "<",
            CmpOp::LessEq => "<=",
            CmpOp::Eq => "=",
            CmpOp::NotEq => "!=",
            CmpOp::Greater => ">",
            CmpOp::GreaterEq => ">=",
        }
        .fmt(f)
    }
}
