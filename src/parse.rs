use std::rc::Rc;

use crate::surface::{
    ArithOp, CmpOp, Cond, CondData, Exp, ExpData, Prog, ProgData, Stmt, StmtData,
};
use crate::util::{Located, Location};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

pub fn parse(code: &str) -> Result<Prog, ParseError> {
    parser::prog(code).map_err(|e| ParseError {
        start: e.location.offset,
        end: e.location.offset + 1,
        message: format!("expected {}", e.expected),
    })
}

peg::parser! {
    grammar parser() for str {
        pub rule prog() -> Prog = _ p:spanned(<prog_data()>) _ { p }
        rule prog_data() -> ProgData =
            "begin" _ body:stmt() _ "end" { ProgData { body } }

        // a sequence nests to the right; the flattened term is unaffected
        rule stmt() -> Stmt = spanned(<stmt_data()>)
        rule stmt_data() -> StmtData =
            first:simple() _ ";" _ second:stmt() {
                StmtData::Seq { first: Rc::new(first), second: Rc::new(second) }
            } /
            s:simple() { s.data }

        // branch and loop bodies are simple statements; sequencing inside
        // them needs an explicit begin/end block
        rule simple() -> Stmt = spanned(<simple_data()>)
        rule simple_data() -> StmtData =
            target:var() _ ":=" _ value:exp() {
                StmtData::Assign { target, value }
            } /
            "if" _ cond:cond() _ "then" _ then_branch:simple()
                else_branch:(_ "else" _ s:simple() { s })? {
                StmtData::If {
                    cond,
                    then_branch: Rc::new(then_branch),
                    else_branch: else_branch.map(Rc::new),
                }
            } /
            "while" _ cond:cond() _ "do" _ body:simple() {
                StmtData::While { cond, body: Rc::new(body) }
            } /
            "begin" _ inner:stmt() _ "end" {
                StmtData::Block { inner: Rc::new(inner) }
            } /
            "skip" { StmtData::Skip }

        rule exp() -> Exp = spanned(<exp_data()>)
        #[cache_left_rec]
        rule exp_data() -> ExpData =
            e1:exp() _ op:arith_op() _ e2:exp() {
                ExpData::BinOp { op, e1: Rc::new(e1), e2: Rc::new(e2) }
            } /
            digits:$(['0'..='9']+) { ExpData::Numeral(digits.to_string()) } /
            v:var() { ExpData::Var(v) } /
            "(" _ inner:exp() _ ")" { ExpData::Paren { inner: Rc::new(inner) } }

        rule cond() -> Cond = spanned(<cond_data()>)
        #[cache_left_rec]
        rule cond_data() -> CondData =
            c1:cond() _ "or" _ c2:cond() {
                CondData::Or { c1: Rc::new(c1), c2: Rc::new(c2) }
            } /
            c1:cond() _ "and" _ c2:cond() {
                CondData::And { c1: Rc::new(c1), c2: Rc::new(c2) }
            } /
            "not" _ inner:cond() { CondData::Not { inner: Rc::new(inner) } } /
            e1:exp() _ op:cmp_op() _ e2:exp() {
                CondData::Compare { op, e1: Rc::new(e1), e2: Rc::new(e2) }
            } /
            "true" { CondData::BoolLit(true) } /
            "false" { CondData::BoolLit(false) } /
            "(" _ inner:cond() _ ")" { CondData::Paren { inner: Rc::new(inner) } }

        //

        rule arith_op() -> ArithOp =
            "+" { ArithOp::Add } /
            "-" { ArithOp::Sub } /
            "*" { ArithOp::Mul } /
            "/" { ArithOp::Div } /
            "%" { ArithOp::Mod }

        rule cmp_op() -> CmpOp =
            "<=" { CmpOp::LessEq } /
            "<" { CmpOp::Less } /
            ">=" { CmpOp::GreaterEq } /
            ">" { CmpOp::Greater } /
            "!=" { CmpOp::NotEq } /
            "=" { CmpOp::Eq }

        rule var() -> char = c:['A'..='Z'] { c }

        //

        rule spanned<T>(tr: rule<T>) -> Located<T> =
            start:position!() t:tr() end:position!() {
                Located::new(Location::new(start, end), t)
            }

        //

        rule whitespace() = quiet!{[' ' | '\n' | '\t']*}
        rule _ = whitespace()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::surface::{CondData, ExpData, StmtData};

    #[test]
    fn assign_in_program() {
        let prog = parse("begin M := M end").unwrap();

        match &prog.data.body.data {
            StmtData::Assign { target, value } => {
                assert_eq!(*target, 'M');
                assert!(matches!(value.data, ExpData::Var('M')));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn sequence_nests_right() {
        let prog = parse("begin A := 1; B := 2; C := 3 end").unwrap();

        let StmtData::Seq { first, second } = &prog.data.body.data else {
            panic!("expected a sequence");
        };
        assert!(matches!(first.data, StmtData::Assign { target: 'A', .. }));
        assert!(matches!(second.data, StmtData::Seq { .. }));
    }

    #[test]
    fn else_binds_to_nearest_if() {
        let prog = parse("begin if M > N then M := M - N else N := N - M end").unwrap();

        let StmtData::If { else_branch, .. } = &prog.data.body.data else {
            panic!("expected a conditional");
        };
        assert!(else_branch.is_some());
    }

    #[test]
    fn while_with_block_body() {
        let prog = parse("begin while I < B do begin R := R + 1; I := I + 1 end end").unwrap();

        let StmtData::While { cond, body } = &prog.data.body.data else {
            panic!("expected a loop");
        };
        assert!(matches!(cond.data, CondData::Compare { .. }));
        assert!(matches!(body.data, StmtData::Block { .. }));
    }

    #[test]
    fn connectives_and_literals_parse() {
        let prog = parse("begin while not ( A > B and true ) do skip end").unwrap();

        let StmtData::While { cond, .. } = &prog.data.body.data else {
            panic!("expected a loop");
        };
        assert!(matches!(cond.data, CondData::Not { .. }));
    }

    #[test]
    fn spans_cover_the_source() {
        let code = "begin M := M end";
        let prog = parse(code).unwrap();

        assert_eq!(prog.location.start, 0);
        assert_eq!(prog.location.end, code.len());
    }

    #[test]
    fn missing_end_is_a_parse_error() {
        let err = parse("begin M := M").unwrap_err();
        assert!(err.start <= "begin M := M".len());
    }

    #[test]
    fn anything_but_begin_is_a_parse_error() {
        assert!(parse("M := M").is_err());
    }
}
