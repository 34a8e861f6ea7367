// The term-rewriting engine. A program's denotational term is derived by
// rewriting a sequence of elements, each either finished text or a pending
// expansion tied to an AST subtree. One pending element is expanded per
// step, leftmost first, and the whole sequence is rendered into the trace
// before every step, so the trace records each intermediate state from the
// all-pending start down to the pure-text term.

use std::fmt::Display;

use itertools::Itertools;

use crate::notation::{overline, superscript};
use crate::surface::{Cond, CondData, Exp, ExpData, Prog, Stmt, StmtData};
use crate::util::Location;

/// Receives one trace line per rewrite step. The engine never owns I/O.
pub trait TraceSink {
    fn emit(&mut self, line: &str);
}

impl TraceSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RewriteError {
    /// The subtree under a pending element has no expansion rule.
    UnsupportedConstruct {
        location: Location,
        construct: String,
    },
    /// The step ceiling was exceeded without reaching a pending-free state.
    EngineStalled { steps: usize },
}

impl Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteError::UnsupportedConstruct { construct, .. } => {
                format!("no rewrite rule for {}", construct).fmt(f)
            }
            RewriteError::EngineStalled { steps } => {
                format!("rewriting stalled after {} steps", steps).fmt(f)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum NodeRef<'a> {
    Prog(&'a Prog),
    Stmt(&'a Stmt),
    Exp(&'a Exp),
    Cond(&'a Cond),
}

impl NodeRef<'_> {
    // semantic-function tag: S for statements, A for expressions, B for
    // conditions
    fn category(&self) -> char {
        match self {
            NodeRef::Prog(_) | NodeRef::Stmt(_) => 'S',
            NodeRef::Exp(_) => 'A',
            NodeRef::Cond(_) => 'B',
        }
    }
}

impl Display for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Prog(p) => p.fmt(f),
            NodeRef::Stmt(s) => s.fmt(f),
            NodeRef::Exp(e) => e.fmt(f),
            NodeRef::Cond(c) => c.fmt(f),
        }
    }
}

enum Elem<'a> {
    Text(String),
    Pending(NodeRef<'a>),
}

impl Display for Elem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Elem::Text(s) => s.fmt(f),
            Elem::Pending(node) => format!("Sem_{}({})", node.category(), node).fmt(f),
        }
    }
}

fn text<'a>(s: impl Into<String>) -> Elem<'a> {
    Elem::Text(s.into())
}

fn render(seq: &[Elem]) -> String {
    seq.iter().join("")
}

/// Rewrites a program into its denotational term, emitting every
/// intermediate state of the sequence to `sink`. The last emitted line is
/// the fully-expanded term.
pub fn rewrite(prog: &Prog, sink: &mut impl TraceSink) -> Result<(), RewriteError> {
    // each step consumes one pending element, and pending elements only
    // ever refer to strict descendants, so the node count bounds the run
    let fuel = prog.data.node_count();
    let mut seq: Vec<Elem> = vec![Elem::Pending(NodeRef::Prog(prog))];
    let mut steps = 0;

    loop {
        sink.emit(&render(&seq));

        let next = seq.iter().enumerate().find_map(|(n, elem)| match elem {
            Elem::Pending(node) => Some((n, *node)),
            Elem::Text(_) => None,
        });
        let Some((n, node)) = next else {
            return Ok(());
        };

        if steps >= fuel {
            return Err(RewriteError::EngineStalled { steps });
        }

        let replacement = expand(node)?;
        seq.splice(n..=n, replacement);
        steps += 1;
    }
}

fn expand(node: NodeRef) -> Result<Vec<Elem>, RewriteError> {
    match node {
        NodeRef::Prog(prog) => Ok(vec![Elem::Pending(NodeRef::Stmt(&prog.data.body))]),
        NodeRef::Stmt(stmt) => expand_stmt(stmt),
        NodeRef::Exp(exp) => expand_exp(exp),
        NodeRef::Cond(cond) => expand_cond(cond),
    }
}

fn expand_stmt(stmt: &Stmt) -> Result<Vec<Elem>, RewriteError> {
    Ok(match &stmt.data {
        StmtData::Assign { target, value } => vec![
            text(format!("AS{}(", superscript(*target))),
            Elem::Pending(NodeRef::Exp(value)),
            text(")"),
        ],
        StmtData::Seq { first, second } => vec![
            Elem::Pending(NodeRef::Stmt(first)),
            text(" • "),
            Elem::Pending(NodeRef::Stmt(second)),
        ],
        StmtData::If {
            cond,
            then_branch,
            else_branch,
        } => vec![
            text("IF("),
            Elem::Pending(NodeRef::Cond(cond)),
            text(", "),
            Elem::Pending(NodeRef::Stmt(then_branch)),
            text(", "),
            match else_branch {
                Some(else_branch) => Elem::Pending(NodeRef::Stmt(else_branch)),
                None => text("id"),
            },
            text(")"),
        ],
        StmtData::While { cond, body } => vec![
            text("WH("),
            Elem::Pending(NodeRef::Cond(cond)),
            text(", "),
            Elem::Pending(NodeRef::Stmt(body)),
            text(")"),
        ],
        StmtData::Block { inner } => vec![Elem::Pending(NodeRef::Stmt(inner))],
        StmtData::Skip => vec![text("id")],
    })
}

fn expand_exp(exp: &Exp) -> Result<Vec<Elem>, RewriteError> {
    match &exp.data {
        ExpData::Numeral(digits) => Ok(vec![text(overline(digits))]),
        ExpData::Var(name) => Ok(vec![text(format!("{}=>", name))]),
        ExpData::BinOp { op, e1, e2 } => Ok(binary(op, e1, e2)),
        ExpData::Paren { .. } => Err(RewriteError::UnsupportedConstruct {
            location: exp.location.clone(),
            construct: "parenthesized expression".to_string(),
        }),
    }
}

// comparison operands are arithmetic expressions, so they re-enter the
// sequence under category A
fn expand_cond(cond: &Cond) -> Result<Vec<Elem>, RewriteError> {
    let unsupported = |construct: &str| RewriteError::UnsupportedConstruct {
        location: cond.location.clone(),
        construct: construct.to_string(),
    };

    match &cond.data {
        CondData::Compare { op, e1, e2 } => Ok(binary(op, e1, e2)),
        CondData::BoolLit(b) => Err(unsupported(&format!("boolean literal {}", b))),
        CondData::Or { .. } => Err(unsupported("logical or")),
        CondData::And { .. } => Err(unsupported("logical and")),
        CondData::Not { .. } => Err(unsupported("logical not")),
        CondData::Paren { .. } => Err(unsupported("parenthesized condition")),
    }
}

fn binary<'a>(op: &impl Display, e1: &'a Exp, e2: &'a Exp) -> Vec<Elem<'a>> {
    vec![
        text(format!("S{}({}, ", superscript('2'), op)),
        Elem::Pending(NodeRef::Exp(e1)),
        text(", "),
        Elem::Pending(NodeRef::Exp(e2)),
        text(")"),
    ]
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::surface::{ArithOp, CmpOp, ProgData};
    use crate::util::Located;

    fn loc<T>(data: T) -> Located<T> {
        Located::new(Location::new(0, 0), data)
    }

    fn prog(body: StmtData) -> Prog {
        loc(ProgData { body: loc(body) })
    }

    fn run(prog: &Prog) -> Result<Vec<String>, RewriteError> {
        let mut lines: Vec<String> = Vec::new();
        rewrite(prog, &mut lines)?;
        Ok(lines)
    }

    // "begin M := M end": initial pending program, pending assignment,
    // the assignment expansion, and the final term
    #[test]
    fn assignment_trace() {
        let p = prog(StmtData::Assign {
            target: 'M',
            value: loc(ExpData::Var('M')),
        });

        let lines = run(&p).unwrap();
        assert_eq!(
            lines,
            vec![
                "Sem_S(begin M := M end)",
                "Sem_S(M := M)",
                "ASᴹ(Sem_A(M))",
                "ASᴹ(M=>)",
            ]
        );
    }

    #[test]
    fn skip_expands_to_id() {
        let lines = run(&prog(StmtData::Skip)).unwrap();
        assert_eq!(lines.last().unwrap(), "id");
    }

    #[test]
    fn numeral_is_overlined() {
        let p = prog(StmtData::Assign {
            target: 'X',
            value: loc(ExpData::Numeral("5".to_string())),
        });

        let lines = run(&p).unwrap();
        assert_eq!(lines.last().unwrap(), "AS^X(5\u{305})");
    }

    #[test]
    fn while_over_comparison() {
        let p = prog(StmtData::While {
            cond: loc(CondData::Compare {
                op: CmpOp::Greater,
                e1: Rc::new(loc(ExpData::Var('A'))),
                e2: Rc::new(loc(ExpData::Var('B'))),
            }),
            body: Rc::new(loc(StmtData::Skip)),
        });

        let lines = run(&p).unwrap();
        assert_eq!(lines.last().unwrap(), "WH(S²(>, A=>, B=>), id)");
    }

    #[test]
    fn if_without_else_gets_id() {
        let p = prog(StmtData::If {
            cond: loc(CondData::Compare {
                op: CmpOp::Less,
                e1: Rc::new(loc(ExpData::Var('N'))),
                e2: Rc::new(loc(ExpData::Numeral("0".to_string()))),
            }),
            then_branch: Rc::new(loc(StmtData::Skip)),
            else_branch: None,
        });

        let lines = run(&p).unwrap();
        assert_eq!(lines.last().unwrap(), "IF(S²(<, N=>, 0\u{305}), id, id)");
    }

    #[test]
    fn sequence_joins_with_bullet() {
        let p = prog(StmtData::Seq {
            first: Rc::new(loc(StmtData::Skip)),
            second: Rc::new(loc(StmtData::Skip)),
        });

        let lines = run(&p).unwrap();
        assert_eq!(lines.last().unwrap(), "id • id");
    }

    #[test]
    fn block_unwraps_silently() {
        let p = prog(StmtData::Block {
            inner: Rc::new(loc(StmtData::Skip)),
        });

        let lines = run(&p).unwrap();
        assert_eq!(
            lines,
            vec![
                "Sem_S(begin begin skip end end)",
                "Sem_S(begin skip end)",
                "Sem_S(skip)",
                "id",
            ]
        );
    }

    #[test]
    fn binary_arith_expansion() {
        let p = prog(StmtData::Assign {
            target: 'R',
            value: loc(ExpData::BinOp {
                op: ArithOp::Add,
                e1: Rc::new(loc(ExpData::Var('R'))),
                e2: Rc::new(loc(ExpData::Numeral("1".to_string()))),
            }),
        });

        let lines = run(&p).unwrap();
        assert_eq!(lines.last().unwrap(), "ASᴿ(S²(+, R=>, 1\u{305}))");
    }

    // step count is bounded by the node count, so the trace has at most
    // node_count + 1 lines
    #[test]
    fn termination_bound() {
        let p = prog(StmtData::Seq {
            first: Rc::new(loc(StmtData::Assign {
                target: 'A',
                value: loc(ExpData::BinOp {
                    op: ArithOp::Sub,
                    e1: Rc::new(loc(ExpData::Var('A'))),
                    e2: Rc::new(loc(ExpData::Numeral("1".to_string()))),
                }),
            })),
            second: Rc::new(loc(StmtData::Skip)),
        });

        let lines = run(&p).unwrap();
        assert!(lines.len() <= p.data.node_count() + 1);
    }

    // running the same AST twice renders identical traces
    #[test]
    fn rendering_is_pure() {
        let p = prog(StmtData::Assign {
            target: 'M',
            value: loc(ExpData::Var('M')),
        });

        assert_eq!(run(&p).unwrap(), run(&p).unwrap());
    }

    #[test]
    fn logical_not_is_unsupported() {
        let p = prog(StmtData::While {
            cond: loc(CondData::Not {
                inner: Rc::new(loc(CondData::BoolLit(true))),
            }),
            body: Rc::new(loc(StmtData::Skip)),
        });

        match run(&p) {
            Err(RewriteError::UnsupportedConstruct { construct, .. }) => {
                assert_eq!(construct, "logical not");
            }
            other => panic!("expected UnsupportedConstruct, got {:?}", other),
        }
    }

    #[test]
    fn logical_and_is_unsupported() {
        let p = prog(StmtData::If {
            cond: loc(CondData::And {
                c1: Rc::new(loc(CondData::BoolLit(true))),
                c2: Rc::new(loc(CondData::BoolLit(false))),
            }),
            then_branch: Rc::new(loc(StmtData::Skip)),
            else_branch: None,
        });

        match run(&p) {
            Err(RewriteError::UnsupportedConstruct { construct, .. }) => {
                assert_eq!(construct, "logical and");
            }
            other => panic!("expected UnsupportedConstruct, got {:?}", other),
        }
    }

    #[test]
    fn boolean_literal_is_unsupported() {
        let p = prog(StmtData::While {
            cond: loc(CondData::BoolLit(true)),
            body: Rc::new(loc(StmtData::Skip)),
        });

        match run(&p) {
            Err(RewriteError::UnsupportedConstruct { construct, .. }) => {
                assert_eq!(construct, "boolean literal true");
            }
            other => panic!("expected UnsupportedConstruct, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_expression_is_unsupported() {
        let p = prog(StmtData::Assign {
            target: 'A',
            value: loc(ExpData::Paren {
                inner: Rc::new(loc(ExpData::Var('A'))),
            }),
        });

        assert!(matches!(
            run(&p),
            Err(RewriteError::UnsupportedConstruct { .. })
        ));
    }

    // a failed rewrite still emits the lines it reached before failing
    #[test]
    fn partial_trace_before_failure() {
        let p = prog(StmtData::While {
            cond: loc(CondData::BoolLit(true)),
            body: Rc::new(loc(StmtData::Skip)),
        });

        let mut lines: Vec<String> = Vec::new();
        assert!(rewrite(&p, &mut lines).is_err());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "WH(Sem_B(true), Sem_S(skip))");
    }
}
