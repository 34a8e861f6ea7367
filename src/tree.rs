// A generic labeled view of the parse tree, plus a Graphviz DOT serializer.
// Branch nodes carry grammar-rule names, leaves carry the literal tokens;
// rendering the DOT text to an image is left to external tooling.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Write;
use std::hash::{Hash, Hasher};

use crate::surface::{Cond, CondData, Exp, ExpData, Prog, Stmt, StmtData};

pub struct Tree {
    pub label: String,
    pub children: Vec<Child>,
}

pub enum Child {
    Branch(Tree),
    Leaf(String),
}

impl Tree {
    fn branch(label: &str, children: Vec<Child>) -> Tree {
        Tree {
            label: label.to_string(),
            children,
        }
    }
}

fn leaf(token: impl ToString) -> Child {
    Child::Leaf(token.to_string())
}

pub fn prog_tree(prog: &Prog) -> Tree {
    Tree::branch(
        "program",
        vec![leaf("begin"), Child::Branch(stmt_tree(&prog.data.body)), leaf("end")],
    )
}

fn stmt_tree(stmt: &Stmt) -> Tree {
    let children = match &stmt.data {
        StmtData::Assign { target, value } => vec![
            Child::Branch(Tree::branch("variable", vec![leaf(target)])),
            leaf(":="),
            Child::Branch(exp_tree(value)),
        ],
        StmtData::Seq { first, second } => vec![
            Child::Branch(stmt_tree(first)),
            leaf(";"),
            Child::Branch(stmt_tree(second)),
        ],
        StmtData::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let mut children = vec![
                leaf("if"),
                Child::Branch(cond_tree(cond)),
                leaf("then"),
                Child::Branch(stmt_tree(then_branch)),
            ];
            if let Some(else_branch) = else_branch {
                children.push(leaf("else"));
                children.push(Child::Branch(stmt_tree(else_branch)));
            }
            children
        }
        StmtData::While { cond, body } => vec![
            leaf("while"),
            Child::Branch(cond_tree(cond)),
            leaf("do"),
            Child::Branch(stmt_tree(body)),
        ],
        StmtData::Block { inner } => {
            vec![leaf("begin"), Child::Branch(stmt_tree(inner)), leaf("end")]
        }
        StmtData::Skip => vec![leaf("skip")],
    };

    Tree::branch("statement", children)
}

fn exp_tree(exp: &Exp) -> Tree {
    match &exp.data {
        ExpData::Numeral(digits) => Tree::branch("numeral", vec![leaf(digits)]),
        ExpData::Var(name) => Tree::branch("variable", vec![leaf(name)]),
        ExpData::BinOp { op, e1, e2 } => Tree::branch(
            "expression",
            vec![Child::Branch(exp_tree(e1)), leaf(op), Child::Branch(exp_tree(e2))],
        ),
        ExpData::Paren { inner } => Tree::branch(
            "expression",
            vec![leaf("("), Child::Branch(exp_tree(inner)), leaf(")")],
        ),
    }
}

fn cond_tree(cond: &Cond) -> Tree {
    let children = match &cond.data {
        CondData::BoolLit(b) => vec![leaf(b)],
        CondData::Compare { op, e1, e2 } => vec![
            Child::Branch(exp_tree(e1)),
            leaf(op),
            Child::Branch(exp_tree(e2)),
        ],
        CondData::Or { c1, c2 } => vec![
            Child::Branch(cond_tree(c1)),
            leaf("or"),
            Child::Branch(cond_tree(c2)),
        ],
        CondData::And { c1, c2 } => vec![
            Child::Branch(cond_tree(c1)),
            leaf("and"),
            Child::Branch(cond_tree(c2)),
        ],
        CondData::Not { inner } => vec![leaf("not"), Child::Branch(cond_tree(inner))],
        CondData::Paren { inner } => {
            vec![leaf("("), Child::Branch(cond_tree(inner)), leaf(")")]
        }
    };

    Tree::branch("condition", children)
}

pub fn to_dot(tree: &Tree) -> String {
    let mut out = String::from("digraph {\n    rankdir=TB;\n");
    emit_branch(tree, &mut out, &mut 0);
    out.push_str("}\n");
    out
}

// children are numbered before their parent, as a reader of the DOT file
// then sees each subtree before the edge pointing at it
fn emit_branch(tree: &Tree, out: &mut String, next_id: &mut usize) -> usize {
    let child_ids: Vec<usize> = tree
        .children
        .iter()
        .map(|child| match child {
            Child::Branch(subtree) => emit_branch(subtree, out, next_id),
            Child::Leaf(token) => emit_leaf(token, out, next_id),
        })
        .collect();

    let id = *next_id;
    *next_id += 1;
    let _ = writeln!(
        out,
        "    {} [style=filled, fillcolor=\"#{:06x}\", label=\"<{}>\"];",
        id,
        label_color(&tree.label),
        tree.label
    );
    for child_id in child_ids {
        let _ = writeln!(out, "    {} -> {};", id, child_id);
    }

    id
}

fn emit_leaf(token: &str, out: &mut String, next_id: &mut usize) -> usize {
    let id = *next_id;
    *next_id += 1;
    let _ = writeln!(out, "    {} [label=\"{}\"];", id, token.replace('\"', "\\\""));
    id
}

fn label_color(label: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    label.hash(&mut hasher);
    hasher.finish() & 0xffffff | 0x808080
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn assign_tree_shape() {
        let prog = parse("begin M := 5 end").unwrap();
        let tree = prog_tree(&prog);

        assert_eq!(tree.label, "program");
        assert_eq!(tree.children.len(), 3);

        let Child::Branch(stmt) = &tree.children[1] else {
            panic!("expected a statement under the program");
        };
        assert_eq!(stmt.label, "statement");
        assert!(matches!(&stmt.children[1], Child::Leaf(t) if t == ":="));
    }

    #[test]
    fn operators_appear_as_glyphs() {
        let prog = parse("begin while A > B do R := R + 1 end").unwrap();
        let dot = to_dot(&prog_tree(&prog));

        assert!(dot.contains("label=\">\""));
        assert!(dot.contains("label=\"+\""));
        assert!(dot.contains("label=\"<condition>\""));
    }

    #[test]
    fn dot_has_one_edge_per_child() {
        let prog = parse("begin M := M end").unwrap();
        let dot = to_dot(&prog_tree(&prog));

        // program(3) + assign(3) + variable(1) + variable(1)
        let edges = dot.matches(" -> ").count();
        assert_eq!(edges, 8);
    }

    #[test]
    fn branch_labels_are_bracketed() {
        let prog = parse("begin skip end").unwrap();
        let dot = to_dot(&prog_tree(&prog));

        assert!(dot.contains("label=\"<program>\""));
        assert!(dot.contains("label=\"<statement>\""));
        assert!(dot.contains("label=\"skip\""));
    }
}
