// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Hiss scripting language.
// Defines the structure of parsed Hiss programs.
//
// Expressions (Expr) represent values and computations, while Statements
// (Stmt) represent actions and control flow. Every node owns its children
// exclusively (boxed recursive fields, no sharing), and nothing mutates a
// node after the parser builds it, so dropping the root releases the
// whole tree.

use std::fmt;

/// Boolean connectives. `Not` is unary; its operand lives in the
/// expression's `left` slot and `right` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "and"),
            BoolOp::Or => write!(f, "or"),
            BoolOp::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn from_symbol(sym: &str) -> Option<CmpOp> {
        match sym {
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Le),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Ge),
            "==" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            _ => None,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sym = match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        write!(f, "{}", sym)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn from_symbol(sym: &str) -> Option<ArithOp> {
        match sym {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            "%" => Some(ArithOp::Mod),
            _ => None,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sym = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        write!(f, "{}", sym)
    }
}

/// Represents an expression - something that evaluates to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Variable(String),
    Int(i64),
    Float(f64),
    Str(String),
    /// `and` / `or` / `not`. For `not`, `right` is `None`.
    Boolean { op: BoolOp, left: Box<Expr>, right: Option<Box<Expr>> },
    Comparison { op: CmpOp, left: Box<Expr>, right: Box<Expr> },
    /// `+ - * / %`. Unary minus is `op: Sub` with `right` absent.
    Arith { op: ArithOp, left: Box<Expr>, right: Option<Box<Expr>> },
    Call { name: String, args: Vec<Expr> },
}

/// An ordered sequence of statements; execution order is source order.
pub type Block = Vec<Stmt>;

/// Represents a statement - an action or declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
    },
    Print(Vec<Expr>),
    If {
        cond: Expr,
        body: Block,
        elifs: Vec<(Expr, Block)>,
        else_body: Option<Block>,
    },
    /// `for NAME in range(args): body`. The (start, end, step) triple is
    /// derived from `args` by arity at evaluation time.
    ForRange {
        var: String,
        args: Vec<Expr>,
        body: Block,
    },
    FuncDef {
        name: String,
        params: Vec<String>,
        body: Block,
    },
    /// A bare function call on its own line; any returned value is
    /// discarded.
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Return(Option<Expr>),
}

const DUMP_STEP: &str = "  ";

impl Expr {
    /// Appends an indented rendering of this subtree to `out`.
    pub fn dump(&self, out: &mut String, depth: usize) {
        let pad = DUMP_STEP.repeat(depth);
        match self {
            Expr::Variable(name) => out.push_str(&format!("{}Variable {}\n", pad, name)),
            Expr::Int(v) => out.push_str(&format!("{}Int {}\n", pad, v)),
            Expr::Float(v) => out.push_str(&format!("{}Float {}\n", pad, v)),
            Expr::Str(s) => out.push_str(&format!("{}Str {:?}\n", pad, s)),
            Expr::Boolean { op, left, right } => {
                out.push_str(&format!("{}Boolean {}\n", pad, op));
                left.dump(out, depth + 1);
                if let Some(right) = right {
                    right.dump(out, depth + 1);
                }
            }
            Expr::Comparison { op, left, right } => {
                out.push_str(&format!("{}Comparison {}\n", pad, op));
                left.dump(out, depth + 1);
                right.dump(out, depth + 1);
            }
            Expr::Arith { op, left, right } => {
                let label = if right.is_none() && *op == ArithOp::Sub { "Negate" } else { "Arith" };
                out.push_str(&format!("{}{} {}\n", pad, label, op));
                left.dump(out, depth + 1);
                if let Some(right) = right {
                    right.dump(out, depth + 1);
                }
            }
            Expr::Call { name, args } => {
                out.push_str(&format!("{}Call {}\n", pad, name));
                for arg in args {
                    arg.dump(out, depth + 1);
                }
            }
        }
    }
}

impl Stmt {
    /// Appends an indented rendering of this statement to `out`.
    pub fn dump(&self, out: &mut String, depth: usize) {
        let pad = DUMP_STEP.repeat(depth);
        match self {
            Stmt::Assign { name, value } => {
                out.push_str(&format!("{}Assign {}\n", pad, name));
                value.dump(out, depth + 1);
            }
            Stmt::Print(exprs) => {
                out.push_str(&format!("{}Print\n", pad));
                for expr in exprs {
                    expr.dump(out, depth + 1);
                }
            }
            Stmt::If { cond, body, elifs, else_body } => {
                out.push_str(&format!("{}If\n", pad));
                cond.dump(out, depth + 1);
                dump_block(body, out, depth + 1);
                for (elif_cond, elif_body) in elifs {
                    out.push_str(&format!("{}Elif\n", pad));
                    elif_cond.dump(out, depth + 1);
                    dump_block(elif_body, out, depth + 1);
                }
                if let Some(else_body) = else_body {
                    out.push_str(&format!("{}Else\n", pad));
                    dump_block(else_body, out, depth + 1);
                }
            }
            Stmt::ForRange { var, args, body } => {
                out.push_str(&format!("{}ForRange {}\n", pad, var));
                for arg in args {
                    arg.dump(out, depth + 1);
                }
                dump_block(body, out, depth + 1);
            }
            Stmt::FuncDef { name, params, body } => {
                out.push_str(&format!("{}FuncDef {}({})\n", pad, name, params.join(", ")));
                dump_block(body, out, depth + 1);
            }
            Stmt::Call { name, args } => {
                out.push_str(&format!("{}CallStmt {}\n", pad, name));
                for arg in args {
                    arg.dump(out, depth + 1);
                }
            }
            Stmt::Return(value) => {
                out.push_str(&format!("{}Return\n", pad));
                if let Some(value) = value {
                    value.dump(out, depth + 1);
                }
            }
        }
    }
}

fn dump_block(block: &Block, out: &mut String, depth: usize) {
    for stmt in block {
        stmt.dump(out, depth);
    }
}

/// Renders a whole parsed program as an indented tree, one statement per
/// top-level entry. Used by `hiss run --dump-ast` and the tests.
pub fn dump_program(program: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in program {
        stmt.dump(&mut out, 0);
    }
    out
}
