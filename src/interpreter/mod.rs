// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the Hiss scripting language.
// Executes Hiss programs by traversing the Abstract Syntax Tree (AST).
//
// The interpreter maintains a frame-stack environment for variables and
// a separate registry for functions, evaluates expressions to Values,
// and executes statements for their side effects. Evaluation is
// single-threaded, synchronous, and depth-first; every failure is a
// structured HissError propagated to the caller.

mod control_flow;
mod environment;
mod value;

pub use self::environment::Environment;
pub use self::value::Value;

use self::control_flow::Flow;

use crate::ast::{Block, BoolOp, Expr, Stmt};
use crate::errors::{CallFailure, HissError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// A user-defined function. The body is shared, not copied, between the
/// registry and any re-definition of the same name.
#[derive(Debug, Clone)]
struct Function {
    params: Vec<String>,
    body: Rc<Block>,
}

pub struct Interpreter {
    pub env: Environment,
    functions: HashMap<String, Function>,
    output: Option<Arc<Mutex<Vec<u8>>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter { env: Environment::new(), functions: HashMap::new(), output: None }
    }

    /// Sets the output sink for print statements (used for testing).
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    /// Runs a whole program against the current environment. A `return`
    /// that unwinds all the way here had no function to stop at.
    pub fn run(&mut self, program: &[Stmt]) -> Result<()> {
        match self.eval_block(program)? {
            Flow::Normal => Ok(()),
            Flow::Return(_) => Err(HissError::ReturnOutsideFunction),
        }
    }

    fn eval_block(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.eval_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Assign { name, value } => {
                let val = self.eval_expr(value)?;
                self.env.define(name.clone(), val);
                Ok(Flow::Normal)
            }
            Stmt::Print(exprs) => {
                let mut rendered = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    rendered.push(self.eval_expr(expr)?.to_string());
                }
                self.write_output(&rendered.join(" "));
                Ok(Flow::Normal)
            }
            Stmt::If { cond, body, elifs, else_body } => {
                self.eval_if(cond, body, elifs, else_body.as_deref())
            }
            Stmt::ForRange { var, args, body } => self.eval_for_range(var, args, body),
            Stmt::FuncDef { name, params, body } => {
                self.functions.insert(
                    name.clone(),
                    Function { params: params.clone(), body: Rc::new(body.clone()) },
                );
                Ok(Flow::Normal)
            }
            Stmt::Call { name, args } => {
                // Statement position: any returned value is discarded.
                self.call_function(name, args)?;
                Ok(Flow::Normal)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    /// Evaluates one guarded arm: returns Some(flow) when the guard was
    /// true and the body ran, None when the guard declined. The arms of
    /// an if/elif chain are asked in source order and the first one that
    /// ran wins.
    fn eval_guarded(&mut self, cond: &Expr, body: &Block) -> Result<Option<Flow>> {
        let guard = self.eval_expr(cond)?;
        match guard {
            Value::Bool(true) => Ok(Some(self.eval_block(body)?)),
            Value::Bool(false) => Ok(None),
            other => Err(HissError::Type {
                op: "if".to_string(),
                operands: other.type_name().to_string(),
            }),
        }
    }

    fn eval_if(
        &mut self,
        cond: &Expr,
        body: &Block,
        elifs: &[(Expr, Block)],
        else_body: Option<&[Stmt]>,
    ) -> Result<Flow> {
        if let Some(flow) = self.eval_guarded(cond, body)? {
            return Ok(flow);
        }
        for (elif_cond, elif_body) in elifs {
            if let Some(flow) = self.eval_guarded(elif_cond, elif_body)? {
                return Ok(flow);
            }
        }
        if let Some(else_body) = else_body {
            return self.eval_block(else_body);
        }
        Ok(Flow::Normal)
    }

    /// Resolves the (start, end, step) triple from the range argument
    /// list by arity and drives the loop. The loop variable is bound in
    /// the enclosing frame before each iteration and stays bound, at its
    /// final value, after the loop exits.
    fn eval_for_range(&mut self, var: &str, args: &[Expr], body: &Block) -> Result<Flow> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval_expr(arg)?;
            match value {
                Value::Int(v) => resolved.push(v),
                other => {
                    return Err(HissError::Type {
                        op: "range".to_string(),
                        operands: other.type_name().to_string(),
                    })
                }
            }
        }

        let (start, end, step) = match resolved.as_slice() {
            [end] => (0, *end, 1),
            [start, end] => (*start, *end, 1),
            [start, end, step] => (*start, *end, *step),
            _ => {
                return Err(HissError::Type {
                    op: "range".to_string(),
                    operands: format!("{} arguments", resolved.len()),
                })
            }
        };

        if step == 0 {
            return Err(HissError::InvalidRangeStep);
        }

        let mut counter = start;
        while (step > 0 && counter < end) || (step < 0 && counter > end) {
            self.env.define(var.to_string(), Value::Int(counter));
            if let Flow::Return(value) = self.eval_block(body)? {
                return Ok(Flow::Return(value));
            }
            counter += step;
        }
        Ok(Flow::Normal)
    }

    /// Calls a user-defined function: arguments are evaluated in the
    /// caller's frame, then a fresh frame holds the parameter bindings
    /// for the body. The frame is popped on every exit path.
    fn call_function(&mut self, name: &str, args: &[Expr]) -> Result<Option<Value>> {
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| HissError::Call {
                name: name.to_string(),
                reason: CallFailure::UnknownFunction,
            })?;

        if function.params.len() != args.len() {
            return Err(HissError::Call {
                name: name.to_string(),
                reason: CallFailure::ArityMismatch {
                    expected: function.params.len(),
                    got: args.len(),
                },
            });
        }

        let mut bound = Vec::with_capacity(args.len());
        for arg in args {
            bound.push(self.eval_expr(arg)?);
        }

        self.env.push_frame();
        for (param, value) in function.params.iter().zip(bound) {
            self.env.define(param.clone(), value);
        }
        let outcome = self.eval_block(&function.body);
        self.env.pop_frame();

        match outcome? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(None),
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Variable(name) => self
                .env
                .get(name)
                .ok_or_else(|| HissError::UndefinedVariable { name: name.clone() }),
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Boolean { op, left, right } => self.eval_boolean(*op, left, right.as_deref()),
            Expr::Comparison { op, left, right } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                value::compare(*op, &lhs, &rhs)
            }
            Expr::Arith { op, left, right } => match right {
                Some(right) => {
                    let lhs = self.eval_expr(left)?;
                    let rhs = self.eval_expr(right)?;
                    value::arith(*op, &lhs, &rhs)
                }
                None => {
                    let operand = self.eval_expr(left)?;
                    value::negate(&operand)
                }
            },
            Expr::Call { name, args } => {
                self.call_function(name, args)?.ok_or_else(|| HissError::Call {
                    name: name.clone(),
                    reason: CallFailure::NoValue,
                })
            }
        }
    }

    /// Boolean connectives are strict about operand types and
    /// short-circuit: the right operand is not evaluated when the left
    /// one already decides the result.
    fn eval_boolean(&mut self, op: BoolOp, left: &Expr, right: Option<&Expr>) -> Result<Value> {
        let lhs = self.eval_expr(left)?;
        let lhs = expect_bool(op, lhs)?;
        match op {
            BoolOp::Not => Ok(Value::Bool(!lhs)),
            BoolOp::And => {
                if !lhs {
                    return Ok(Value::Bool(false));
                }
                let rhs = self.eval_operand(op, right)?;
                Ok(Value::Bool(rhs))
            }
            BoolOp::Or => {
                if lhs {
                    return Ok(Value::Bool(true));
                }
                let rhs = self.eval_operand(op, right)?;
                Ok(Value::Bool(rhs))
            }
        }
    }

    fn eval_operand(&mut self, op: BoolOp, operand: Option<&Expr>) -> Result<bool> {
        // The parser always supplies a right operand for and/or.
        debug_assert!(operand.is_some(), "binary boolean operator without right operand");
        match operand {
            Some(expr) => {
                let value = self.eval_expr(expr)?;
                expect_bool(op, value)
            }
            None => Ok(false),
        }
    }

    /// Helper to write program output to either the sink or stdout.
    fn write_output(&self, msg: &str) {
        if let Some(out) = &self.output {
            if let Ok(mut buffer) = out.lock() {
                let _ = writeln!(buffer, "{}", msg);
            }
        } else {
            println!("{}", msg);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_bool(op: BoolOp, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(HissError::Type {
            op: op.to_string(),
            operands: other.type_name().to_string(),
        }),
    }
}
