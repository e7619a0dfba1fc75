// File: src/parser.rs
//
// Recursive descent parser for the Hiss scripting language.
// Transforms a token stream into an Abstract Syntax Tree (AST).
//
// Every grammar production is a method that consumes tokens from the
// stream and returns an owned AST node or a structured SyntaxError. The
// parser looks ahead by at most one token: a production that peeks to
// choose between alternatives reads one token and pushes it back before
// the next read, never more.
//
// Statement grammar:
//   program       -> { stmt }* EOF
//   stmt          -> simple_stmt | compound_stmt
//   simple_stmt   -> { print_stmt | assign_stmt | call_stmt | return_stmt NEWLINE }+
//   compound_stmt -> if_stmt | for_stmt | func_def
//   suite         -> NEWLINE INDENT stmt+ DEDENT
//
// Expression grammar (precedence climbing, all levels left-associative):
//   test -> or_test -> and_test -> not_test -> comparison
//        -> arith_expr -> term -> factor -> atom

use crate::ast::{ArithOp, Block, BoolOp, CmpOp, Expr, Stmt};
use crate::errors::{Expected, HissError, Result, SyntaxError};
use crate::lexer::{Token, TokenKind, TokenStream};

const STMT_STARTERS: &[Expected] = &[
    Expected::Keyword("print"),
    Expected::Name,
    Expected::Keyword("if"),
    Expected::Keyword("for"),
    Expected::Keyword("def"),
    Expected::Keyword("return"),
];

pub struct Parser {
    stream: TokenStream,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Parser { stream }
    }

    /// Convenience constructor over an already-tokenized buffer.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser::new(TokenStream::new(tokens))
    }

    fn next(&mut self) -> Token {
        self.stream.next()
    }

    fn push_back(&mut self) {
        self.stream.push_back()
    }

    /// Builds the structured diagnostic for a grammar mismatch,
    /// capturing the full token replay for postmortem inspection.
    fn unexpected(
        &self,
        production: &'static str,
        expected: &[Expected],
        found: Token,
    ) -> HissError {
        HissError::Syntax(Box::new(SyntaxError {
            production,
            expected: expected.to_vec(),
            found,
            history: self.stream.history().to_vec(),
        }))
    }

    fn expect(&mut self, production: &'static str, expected: Expected) -> Result<Token> {
        let tok = self.next();
        if expected.matches(&tok.kind) {
            Ok(tok)
        } else {
            Err(self.unexpected(production, &[expected], tok))
        }
    }

    fn expect_name(&mut self, production: &'static str) -> Result<String> {
        let tok = self.next();
        match tok.kind {
            TokenKind::Name(name) => Ok(name),
            _ => Err(self.unexpected(production, &[Expected::Name], tok)),
        }
    }

    /// program -> { stmt }* EOF
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>> {
        let mut program = Vec::new();
        loop {
            let tok = self.next();
            if tok.kind.starts_statement() {
                self.push_back();
                program.extend(self.stmt()?);
            } else if matches!(tok.kind, TokenKind::Eof) {
                return Ok(program);
            } else {
                let mut expected = STMT_STARTERS.to_vec();
                expected.push(Expected::Eof);
                return Err(self.unexpected("program", &expected, tok));
            }
        }
    }

    /// stmt -> simple_stmt | compound_stmt
    fn stmt(&mut self) -> Result<Vec<Stmt>> {
        let tok = self.next();
        match &tok.kind {
            TokenKind::Name(_) => {
                self.push_back();
                self.simple_stmt()
            }
            TokenKind::Keyword(k) if matches!(k.as_str(), "print" | "return") => {
                self.push_back();
                self.simple_stmt()
            }
            TokenKind::Keyword(k) if matches!(k.as_str(), "if" | "for" | "def") => {
                self.push_back();
                Ok(vec![self.compound_stmt()?])
            }
            _ => Err(self.unexpected("stmt", STMT_STARTERS, tok)),
        }
    }

    /// simple_stmt -> { print_stmt | assign_stmt | call_stmt | return_stmt NEWLINE }+
    ///
    /// Consecutive simple statements are gathered in one pass; the run
    /// ends at the first token that cannot begin another one. EOF is an
    /// acceptable terminator for the final statement.
    fn simple_stmt(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();

        let mut tok = self.next();
        if !is_simple_starter(&tok.kind) {
            return Err(self.unexpected(
                "simple_stmt",
                &[Expected::Keyword("print"), Expected::Name, Expected::Keyword("return")],
                tok,
            ));
        }

        while is_simple_starter(&tok.kind) {
            self.push_back();

            let stmt = match &tok.kind {
                TokenKind::Keyword(k) if k == "print" => self.print_stmt()?,
                TokenKind::Keyword(k) if k == "return" => self.return_stmt()?,
                _ => self.assign_or_call_stmt()?,
            };
            stmts.push(stmt);

            tok = self.next();
            if matches!(tok.kind, TokenKind::Eof) {
                self.push_back();
                return Ok(stmts);
            }
            if !matches!(tok.kind, TokenKind::Newline) {
                return Err(self.unexpected("simple_stmt", &[Expected::Newline], tok));
            }

            tok = self.next();
        }

        self.push_back();
        Ok(stmts)
    }

    /// print_stmt -> 'print' testlist
    fn print_stmt(&mut self) -> Result<Stmt> {
        self.expect("print_stmt", Expected::Keyword("print"))?;
        let exprs = self.testlist()?;
        Ok(Stmt::Print(exprs))
    }

    /// assign_stmt -> NAME '=' test
    /// call_stmt   -> NAME '(' [testlist] ')'
    ///
    /// Both begin with a NAME; the token after it decides which one we
    /// are looking at.
    fn assign_or_call_stmt(&mut self) -> Result<Stmt> {
        let name = self.expect_name("assign_stmt")?;

        let tok = self.next();
        if tok.kind.is_operator("=") {
            let value = self.test()?;
            Ok(Stmt::Assign { name, value })
        } else if tok.kind.is_punctuation('(') {
            self.push_back();
            let args = self.call_args()?;
            Ok(Stmt::Call { name, args })
        } else {
            Err(self.unexpected("assign_stmt", &[Expected::AssignOp, Expected::OpenParen], tok))
        }
    }

    /// return_stmt -> 'return' [test]
    fn return_stmt(&mut self) -> Result<Stmt> {
        self.expect("return_stmt", Expected::Keyword("return"))?;
        let tok = self.next();
        self.push_back();
        if matches!(tok.kind, TokenKind::Newline | TokenKind::Eof) {
            Ok(Stmt::Return(None))
        } else {
            Ok(Stmt::Return(Some(self.test()?)))
        }
    }

    /// compound_stmt -> if_stmt | for_stmt | func_def
    fn compound_stmt(&mut self) -> Result<Stmt> {
        let tok = self.next();
        self.push_back();
        match &tok.kind {
            TokenKind::Keyword(k) if k == "if" => self.if_stmt(),
            TokenKind::Keyword(k) if k == "for" => self.for_stmt(),
            TokenKind::Keyword(k) if k == "def" => self.func_def(),
            _ => Err(self.unexpected(
                "compound_stmt",
                &[Expected::Keyword("if"), Expected::Keyword("for"), Expected::Keyword("def")],
                tok,
            )),
        }
    }

    /// if_stmt -> 'if' test ':' suite { 'elif' test ':' suite }* ['else' ':' suite]
    ///
    /// After each suite exactly one token is read to see whether an
    /// elif/else clause follows; when no clause claims it, that single
    /// token is pushed back for the caller.
    fn if_stmt(&mut self) -> Result<Stmt> {
        self.expect("if_stmt", Expected::Keyword("if"))?;
        let cond = self.test()?;
        self.expect("if_stmt", Expected::Colon)?;
        let body = self.suite()?;

        let mut elifs = Vec::new();
        let mut tok = self.next();
        while tok.kind.is_keyword("elif") {
            let elif_cond = self.test()?;
            self.expect("if_stmt", Expected::Colon)?;
            let elif_body = self.suite()?;
            elifs.push((elif_cond, elif_body));
            tok = self.next();
        }

        let else_body = if tok.kind.is_keyword("else") {
            self.expect("if_stmt", Expected::Colon)?;
            Some(self.suite()?)
        } else {
            self.push_back();
            None
        };

        Ok(Stmt::If { cond, body, elifs, else_body })
    }

    /// for_stmt -> 'for' NAME 'in' 'range' '(' testlist ')' ':' suite
    fn for_stmt(&mut self) -> Result<Stmt> {
        self.expect("for_stmt", Expected::Keyword("for"))?;
        let var = self.expect_name("for_stmt")?;
        self.expect("for_stmt", Expected::Keyword("in"))?;
        self.expect("for_stmt", Expected::Keyword("range"))?;
        self.expect("for_stmt", Expected::OpenParen)?;
        let args = self.testlist()?;
        self.expect("for_stmt", Expected::CloseParen)?;
        self.expect("for_stmt", Expected::Colon)?;
        let body = self.suite()?;
        Ok(Stmt::ForRange { var, args, body })
    }

    /// func_def -> 'def' NAME '(' [NAME {',' NAME}*] ')' ':' suite
    fn func_def(&mut self) -> Result<Stmt> {
        self.expect("func_def", Expected::Keyword("def"))?;
        let name = self.expect_name("func_def")?;
        self.expect("func_def", Expected::OpenParen)?;

        let mut params = Vec::new();
        let tok = self.next();
        if !tok.kind.is_punctuation(')') {
            self.push_back();
            loop {
                params.push(self.expect_name("func_def")?);
                let sep = self.next();
                if sep.kind.is_punctuation(',') {
                    continue;
                }
                self.push_back();
                break;
            }
            self.expect("func_def", Expected::CloseParen)?;
        }

        self.expect("func_def", Expected::Colon)?;
        let body = self.suite()?;
        Ok(Stmt::FuncDef { name, params, body })
    }

    /// suite -> NEWLINE INDENT stmt+ DEDENT
    fn suite(&mut self) -> Result<Block> {
        self.expect("suite", Expected::Newline)?;
        self.expect("suite", Expected::Indent)?;

        let mut block = self.stmt()?;

        let mut tok = self.next();
        while tok.kind.starts_statement() {
            self.push_back();
            block.extend(self.stmt()?);
            tok = self.next();
        }

        if !matches!(tok.kind, TokenKind::Dedent) {
            return Err(self.unexpected("suite", &[Expected::Dedent], tok));
        }
        Ok(block)
    }

    /// testlist -> test { ',' test }*
    fn testlist(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = vec![self.test()?];
        let mut tok = self.next();
        while tok.kind.is_punctuation(',') {
            exprs.push(self.test()?);
            tok = self.next();
        }
        self.push_back();
        Ok(exprs)
    }

    /// test -> or_test
    fn test(&mut self) -> Result<Expr> {
        self.or_test()
    }

    /// or_test -> and_test { 'or' and_test }*
    fn or_test(&mut self) -> Result<Expr> {
        let mut left = self.and_test()?;
        let mut tok = self.next();
        while tok.kind.is_keyword("or") {
            let right = self.and_test()?;
            left = Expr::Boolean {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Some(Box::new(right)),
            };
            tok = self.next();
        }
        self.push_back();
        Ok(left)
    }

    /// and_test -> not_test { 'and' not_test }*
    fn and_test(&mut self) -> Result<Expr> {
        let mut left = self.not_test()?;
        let mut tok = self.next();
        while tok.kind.is_keyword("and") {
            let right = self.not_test()?;
            left = Expr::Boolean {
                op: BoolOp::And,
                left: Box::new(left),
                right: Some(Box::new(right)),
            };
            tok = self.next();
        }
        self.push_back();
        Ok(left)
    }

    /// not_test -> 'not' not_test | comparison
    fn not_test(&mut self) -> Result<Expr> {
        let tok = self.next();
        if tok.kind.is_keyword("not") {
            let operand = self.not_test()?;
            Ok(Expr::Boolean { op: BoolOp::Not, left: Box::new(operand), right: None })
        } else {
            self.push_back();
            self.comparison()
        }
    }

    /// comparison -> arith_expr { comp_op arith_expr }*
    ///
    /// Chains are pairwise and left-associative: `1 < 2 < 0` parses as
    /// `(1 < 2) < 0`, not as a mathematical chain.
    fn comparison(&mut self) -> Result<Expr> {
        let mut left = self.arith_expr()?;
        let mut tok = self.next();
        while tok.kind.is_comparison_operator() {
            let op = match &tok.kind {
                TokenKind::Operator(sym) => {
                    CmpOp::from_symbol(sym).expect("comparison operator set is closed")
                }
                _ => unreachable!(),
            };
            let right = self.arith_expr()?;
            left = Expr::Comparison { op, left: Box::new(left), right: Box::new(right) };
            tok = self.next();
        }
        self.push_back();
        Ok(left)
    }

    /// arith_expr -> term { ('+'|'-') term }*
    fn arith_expr(&mut self) -> Result<Expr> {
        let mut left = self.term()?;
        let mut tok = self.next();
        while tok.kind.is_operator("+") || tok.kind.is_operator("-") {
            let op = if tok.kind.is_operator("+") { ArithOp::Add } else { ArithOp::Sub };
            let right = self.term()?;
            left = Expr::Arith { op, left: Box::new(left), right: Some(Box::new(right)) };
            tok = self.next();
        }
        self.push_back();
        Ok(left)
    }

    /// term -> factor { ('*'|'/'|'%') factor }*
    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;
        let mut tok = self.next();
        loop {
            let op = match &tok.kind {
                TokenKind::Operator(sym) if matches!(sym.as_str(), "*" | "/" | "%") => {
                    ArithOp::from_symbol(sym).expect("multiplicative operator set is closed")
                }
                _ => break,
            };
            let right = self.factor()?;
            left = Expr::Arith { op, left: Box::new(left), right: Some(Box::new(right)) };
            tok = self.next();
        }
        self.push_back();
        Ok(left)
    }

    /// factor -> '-' factor | atom_or_call
    fn factor(&mut self) -> Result<Expr> {
        let tok = self.next();
        if tok.kind.is_operator("-") {
            let operand = self.factor()?;
            Ok(Expr::Arith { op: ArithOp::Sub, left: Box::new(operand), right: None })
        } else {
            self.push_back();
            self.atom_or_call()
        }
    }

    /// A bare name immediately followed by '(' is a call; any other atom
    /// is returned as-is.
    fn atom_or_call(&mut self) -> Result<Expr> {
        let atom = self.atom()?;
        if let Expr::Variable(name) = &atom {
            let tok = self.next();
            if tok.kind.is_punctuation('(') {
                self.push_back();
                return self.call(name.clone());
            }
            self.push_back();
        }
        Ok(atom)
    }

    /// call -> NAME '(' [testlist] ')'   (NAME already consumed)
    fn call(&mut self, name: String) -> Result<Expr> {
        let args = self.call_args()?;
        Ok(Expr::Call { name, args })
    }

    /// The argument-list half of a call: '(' [testlist] ')'.
    fn call_args(&mut self) -> Result<Vec<Expr>> {
        self.expect("call", Expected::OpenParen)?;
        let tok = self.next();
        let args = if tok.kind.is_punctuation(')') {
            self.push_back();
            Vec::new()
        } else {
            self.push_back();
            self.testlist()?
        };
        self.expect("call", Expected::CloseParen)?;
        Ok(args)
    }

    /// atom -> NAME | INT | FLOAT | STRING | '(' test ')'
    ///
    /// A parenthesized expression is not a distinct node; the inner
    /// expression is returned directly, so parentheses affect only
    /// parsing, never the tree shape.
    fn atom(&mut self) -> Result<Expr> {
        let tok = self.next();
        match tok.kind {
            TokenKind::Name(name) => Ok(Expr::Variable(name)),
            TokenKind::Int(v) => Ok(Expr::Int(v)),
            TokenKind::Float(v) => Ok(Expr::Float(v)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Punctuation('(') => {
                let inner = self.test()?;
                self.expect("atom", Expected::CloseParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected(
                "atom",
                &[
                    Expected::Name,
                    Expected::IntLiteral,
                    Expected::FloatLiteral,
                    Expected::StrLiteral,
                    Expected::OpenParen,
                ],
                tok,
            )),
        }
    }
}

fn is_simple_starter(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Name(_) => true,
        TokenKind::Keyword(k) => matches!(k.as_str(), "print" | "return"),
        _ => false,
    }
}

/// Tokenizes and parses a complete source text in one step.
pub fn parse_source(source: &str) -> Result<Vec<Stmt>> {
    let tokens = crate::lexer::tokenize(source)?;
    Parser::from_tokens(tokens).parse_program()
}
