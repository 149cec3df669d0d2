//! Recursive-descent parser for the XPath 1.0 grammar.
//!
//! Precedence, lowest binding first: `or`, `and`, equality, relational,
//! additive, multiplicative (`*`, `div`, `mod`), unary minus, union (`|`),
//! path, primary. The parser buffers one token of lookahead and performs no
//! error recovery: the first malformed construct aborts compilation with a
//! [`SyntaxError`].

pub mod ast;

use crate::error::SyntaxError;
use crate::lexer::{Lexer, Spanned, Token};
use ast::{
    Axis, BinaryOp, Expr, KindTest, Literal, NameTest, NodeTest, PathExpr, PathStart, Step,
};

/// Parses a complete expression; trailing input is an error.
pub fn parse(input: &str) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(input);
    let expr = parser.parse_expr()?;
    match parser.peek()? {
        None => Ok(expr),
        Some(spanned) => Err(SyntaxError::new(
            spanned.pos,
            format!("unexpected '{}' after expression", spanned.token),
        )),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Spanned>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Spanned>, SyntaxError> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn peek_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        Ok(self.peek()?.map(|s| s.token.clone()))
    }

    fn bump(&mut self) -> Result<Option<Spanned>, SyntaxError> {
        self.peek()?;
        Ok(self.lookahead.take())
    }

    fn eat(&mut self, token: &Token) -> Result<bool, SyntaxError> {
        if self.peek()?.map(|s| &s.token) == Some(token) {
            self.lookahead = None;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), SyntaxError> {
        if self.eat(token)? {
            Ok(())
        } else {
            Err(self.error_here(format!("expected {what}")))
        }
    }

    fn error_here(&mut self, reason: String) -> SyntaxError {
        let pos = match self.lookahead.as_ref() {
            Some(s) => s.pos,
            None => self.lexer.offset(),
        };
        SyntaxError::new(pos, reason)
    }

    // ----- precedence chain ------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_and_expr()?;
        while self.eat(&Token::Or)? {
            let rhs = self.parse_and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_equality_expr()?;
        while self.eat(&Token::And)? {
            let rhs = self.parse_equality_expr()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_relational_expr()?;
        loop {
            let op = match self.peek_token()? {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                _ => break,
            };
            self.lookahead = None;
            let rhs = self.parse_relational_expr()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_additive_expr()?;
        loop {
            let op = match self.peek_token()? {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.lookahead = None;
            let rhs = self.parse_additive_expr()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_multiplicative_expr()?;
        loop {
            let op = match self.peek_token()? {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.lookahead = None;
            let rhs = self.parse_multiplicative_expr()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let op = match self.peek_token()? {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Div) => BinaryOp::Div,
                Some(Token::Mod) => BinaryOp::Mod,
                _ => break,
            };
            self.lookahead = None;
            let rhs = self.parse_unary_expr()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&Token::Minus)? {
            let operand = self.parse_unary_expr()?;
            Ok(Expr::Neg(Box::new(operand)))
        } else {
            self.parse_union_expr()
        }
    }

    fn parse_union_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_path_expr()?;
        while self.eat(&Token::Pipe)? {
            let rhs = self.parse_path_expr()?;
            lhs = binary(BinaryOp::Union, lhs, rhs);
        }
        Ok(lhs)
    }

    // ----- paths -----------------------------------------------------------

    /// The disambiguation point of the grammar: a location path starts with
    /// `/`, `//`, `.`, `..`, `@`, an axis, a kind test, or a name test; a
    /// filter expression starts with a primary expression.
    fn parse_path_expr(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek_token()? {
            Some(Token::Slash) => {
                self.lookahead = None;
                let mut steps = Vec::new();
                if self.at_step_start()? {
                    self.parse_relative_path_into(&mut steps)?;
                }
                Ok(Expr::Path(PathExpr {
                    start: PathStart::Root,
                    steps,
                }))
            }
            Some(Token::DoubleSlash) => {
                self.lookahead = None;
                let mut steps = vec![Step::descendant_or_self()];
                self.parse_relative_path_into(&mut steps)?;
                Ok(Expr::Path(PathExpr {
                    start: PathStart::Root,
                    steps,
                }))
            }
            Some(Token::Dot) => {
                self.lookahead = None;
                if matches!(
                    self.peek_token()?,
                    Some(Token::Slash) | Some(Token::DoubleSlash)
                ) {
                    let mut steps = vec![Step::self_node()];
                    self.parse_path_tail_into(&mut steps)?;
                    Ok(Expr::Path(PathExpr {
                        start: PathStart::Relative,
                        steps,
                    }))
                } else {
                    Ok(Expr::ContextItem)
                }
            }
            Some(
                Token::DotDot
                | Token::At
                | Token::Name { .. }
                | Token::NodeType(_)
                | Token::Axis(_),
            ) => {
                let mut steps = Vec::new();
                self.parse_relative_path_into(&mut steps)?;
                Ok(Expr::Path(PathExpr {
                    start: PathStart::Relative,
                    steps,
                }))
            }
            Some(
                Token::Variable(_)
                | Token::Literal(_)
                | Token::Number(_)
                | Token::LParen
                | Token::Function(_),
            ) => self.parse_filter_expr(),
            _ => Err(self.error_here("expected an expression".to_string())),
        }
    }

    /// `PrimaryExpr Predicate*` with an optional `/`- or `//`-path tail.
    fn parse_filter_expr(&mut self) -> Result<Expr, SyntaxError> {
        let source = self.parse_primary_expr()?;
        let predicates = self.parse_predicates()?;
        let filtered = if predicates.is_empty() {
            source
        } else {
            Expr::Filter {
                source: Box::new(source),
                predicates,
            }
        };
        if matches!(
            self.peek_token()?,
            Some(Token::Slash) | Some(Token::DoubleSlash)
        ) {
            let mut steps = Vec::new();
            self.parse_path_tail_into(&mut steps)?;
            Ok(Expr::Path(PathExpr {
                start: PathStart::Filter(Box::new(filtered)),
                steps,
            }))
        } else {
            Ok(filtered)
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, SyntaxError> {
        let Some(spanned) = self.bump()? else {
            return Err(self.error_here("expected an expression".to_string()));
        };
        match spanned.token {
            Token::Variable(name) => Ok(Expr::VarRef(name)),
            Token::Literal(value) => Ok(Expr::Literal(Literal::Str(value))),
            Token::Number(value) => Ok(Expr::Literal(Literal::Number(value))),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Function(name) => {
                self.expect(&Token::LParen, "'('")?;
                let mut args = Vec::new();
                if !self.eat(&Token::RParen)? {
                    args.push(self.parse_expr()?);
                    while self.eat(&Token::Comma)? {
                        args.push(self.parse_expr()?);
                    }
                    self.expect(&Token::RParen, "')'")?;
                }
                Ok(Expr::FunctionCall { name, args })
            }
            other => Err(SyntaxError::new(
                spanned.pos,
                format!("expected a primary expression, found '{other}'"),
            )),
        }
    }

    /// Consumes a leading `/` or `//` and the relative path behind it.
    fn parse_path_tail_into(&mut self, steps: &mut Vec<Step>) -> Result<(), SyntaxError> {
        if self.eat(&Token::DoubleSlash)? {
            steps.push(Step::descendant_or_self());
        } else {
            self.expect(&Token::Slash, "'/'")?;
        }
        self.parse_relative_path_into(steps)
    }

    fn parse_relative_path_into(&mut self, steps: &mut Vec<Step>) -> Result<(), SyntaxError> {
        steps.push(self.parse_step()?);
        loop {
            if self.eat(&Token::DoubleSlash)? {
                steps.push(Step::descendant_or_self());
                steps.push(self.parse_step()?);
            } else if self.eat(&Token::Slash)? {
                steps.push(self.parse_step()?);
            } else {
                return Ok(());
            }
        }
    }

    fn at_step_start(&mut self) -> Result<bool, SyntaxError> {
        Ok(matches!(
            self.peek_token()?,
            Some(
                Token::Dot
                    | Token::DotDot
                    | Token::At
                    | Token::Name { .. }
                    | Token::NodeType(_)
                    | Token::Axis(_)
            )
        ))
    }

    fn parse_step(&mut self) -> Result<Step, SyntaxError> {
        // Abbreviated steps take no node test and no predicates.
        if self.eat(&Token::Dot)? {
            return Ok(Step::self_node());
        }
        if self.eat(&Token::DotDot)? {
            return Ok(Step::parent_node());
        }

        let axis = self.parse_axis_specifier()?;
        let test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_axis_specifier(&mut self) -> Result<Axis, SyntaxError> {
        if self.eat(&Token::At)? {
            return Ok(Axis::Attribute);
        }
        if let Some(Token::Axis(name)) = self.peek_token()? {
            let pos = self.peek()?.map(|s| s.pos).unwrap_or(0);
            self.lookahead = None;
            self.expect(&Token::ColonColon, "'::'")?;
            return Axis::from_name(&name)
                .ok_or_else(|| SyntaxError::new(pos, format!("unknown axis {name:?}")));
        }
        Ok(Axis::Child)
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, SyntaxError> {
        match self.peek_token()? {
            Some(Token::Name { prefix, local }) => {
                self.lookahead = None;
                let test = if local == "*" {
                    match prefix {
                        Some(p) => NameTest::AnyLocal(p),
                        None => NameTest::Any,
                    }
                } else {
                    NameTest::Named { prefix, local }
                };
                Ok(NodeTest::Name(test))
            }
            Some(Token::NodeType(name)) => {
                self.lookahead = None;
                self.expect(&Token::LParen, "'('")?;
                let test = match name.as_str() {
                    "node" => KindTest::AnyNode,
                    "text" => KindTest::Text,
                    "comment" => KindTest::Comment,
                    "processing-instruction" => {
                        if let Some(Token::Literal(target)) = self.peek_token()? {
                            self.lookahead = None;
                            KindTest::Pi(Some(target))
                        } else {
                            KindTest::Pi(None)
                        }
                    }
                    // The lexer only classifies the four known names.
                    _ => unreachable!("lexer emitted unknown node type"),
                };
                self.expect(&Token::RParen, "')'")?;
                Ok(NodeTest::Kind(test))
            }
            _ => Err(self.error_here("expected a node test".to_string())),
        }
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LBracket)? {
            predicates.push(self.parse_expr()?);
            self.expect(&Token::RBracket, "']'")?;
        }
        Ok(predicates)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::parse;

    fn p(input: &str) -> Expr {
        parse(input).unwrap()
    }

    fn steps_of(expr: &Expr) -> &[Step] {
        match expr {
            Expr::Path(path) => &path.steps,
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn bare_root() {
        assert_eq!(
            p("/"),
            Expr::Path(PathExpr {
                start: PathStart::Root,
                steps: vec![]
            })
        );
    }

    #[test]
    fn double_slash_expands_to_descendant_or_self() {
        let expr = p("//book");
        let steps = steps_of(&expr);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Step::descendant_or_self());
        assert_eq!(steps[1].axis, Axis::Child);
        assert_eq!(
            steps[1].test,
            NodeTest::Name(NameTest::Named {
                prefix: None,
                local: "book".into()
            })
        );
    }

    #[test]
    fn abbreviations_desugar() {
        let steps = match p("../@id") {
            Expr::Path(path) => path.steps,
            other => panic!("{other:?}"),
        };
        assert_eq!(steps[0], Step::parent_node());
        assert_eq!(steps[1].axis, Axis::Attribute);
    }

    #[test]
    fn lone_dot_is_the_context_item() {
        assert_eq!(p("."), Expr::ContextItem);
        // With a tail it becomes an ordinary relative path.
        let steps = steps_of(&p("./a")).to_vec();
        assert_eq!(steps[0], Step::self_node());
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn predicates_attach_left_associatively() {
        let steps = steps_of(&p("a[1][2]")).to_vec();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].predicates.len(), 2);
    }

    #[test]
    fn precedence_or_binds_loosest() {
        match p("a or b and c") {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op, BinaryOp::Or);
                assert!(matches!(
                    *rhs,
                    Expr::Binary {
                        op: BinaryOp::And,
                        ..
                    }
                ));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn union_binds_tighter_than_arithmetic() {
        match p("a | b = c") {
            Expr::Binary { op, lhs, .. } => {
                assert_eq!(op, BinaryOp::Eq);
                assert!(matches!(
                    *lhs,
                    Expr::Binary {
                        op: BinaryOp::Union,
                        ..
                    }
                ));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn unary_minus_nests() {
        assert!(matches!(p("--1"), Expr::Neg(_)));
    }

    #[test]
    fn filter_with_path_tail() {
        match p("$nodes[1]/a") {
            Expr::Path(path) => {
                assert!(matches!(path.start, PathStart::Filter(_)));
                assert_eq!(path.steps.len(), 1);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn function_calls_parse_arguments() {
        match p("concat('a', 'b', 'c')") {
            Expr::FunctionCall { name, args } => {
                assert_eq!(name, "concat");
                assert_eq!(args.len(), 3);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn processing_instruction_target() {
        let steps = steps_of(&p("processing-instruction('xml-stylesheet')")).to_vec();
        assert_eq!(
            steps[0].test,
            NodeTest::Kind(KindTest::Pi(Some("xml-stylesheet".into())))
        );
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        for bad in [
            "",
            "a/",
            "//",
            "a[",
            "a[]",
            "foo(",
            "a b",
            "..[1]",
            "child::",
            "bogus::a",
            "1 +",
            "(a",
            "@",
        ] {
            assert!(parse(bad).is_err(), "expected parse failure for {bad:?}");
        }
    }

    #[test]
    fn unknown_axis_position_points_at_the_axis() {
        let err = parse("a/bogus::b").unwrap_err();
        assert_eq!(err.position, 2);
    }
}
