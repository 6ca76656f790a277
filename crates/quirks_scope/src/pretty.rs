//! Source text for declared functions.
//!
//! The text is what `Function.prototype.toString` returns for functions
//! created from a [`FunctionDecl`].

use std::fmt::Write;

use quirks_foundation::{Value, number_to_string};

use crate::ast::{Expr, FunctionDecl, Stmt};

/// Indentation unit.
const INDENT: &str = "  ";

/// Renders a function declaration as source text.
#[must_use]
pub fn function_source(decl: &FunctionDecl) -> String {
    let mut printer = PrettyPrinter::default();
    printer.function(decl);
    printer.output
}

/// Renders an expression as source text.
#[must_use]
pub fn expr_source(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::default();
    printer.expr(expr);
    printer.output
}

#[derive(Default)]
struct PrettyPrinter {
    output: String,
    depth: usize,
}

impl PrettyPrinter {
    fn function(&mut self, decl: &FunctionDecl) {
        self.output.push_str("function ");
        self.output.push_str(&decl.name);
        self.output.push('(');
        self.output.push_str(&decl.params.join(", "));
        self.output.push_str(") ");
        self.block(&decl.body);
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.depth += 1;
        for stmt in body {
            self.output.push_str(&INDENT.repeat(self.depth));
            self.stmt(stmt);
            self.output.push('\n');
        }
        self.depth -= 1;
        self.output.push_str(&INDENT.repeat(self.depth));
        self.output.push('}');
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declare { kind, name, init } => {
                self.output.push_str(kind.as_str());
                self.output.push(' ');
                self.output.push_str(name);
                if let Some(init) = init {
                    self.output.push_str(" = ");
                    self.expr(init);
                }
                self.output.push(';');
            }
            Stmt::Function(decl) => self.function(decl),
            Stmt::Assign { name, value } => {
                self.output.push_str(name);
                self.output.push_str(" = ");
                self.expr(value);
                self.output.push(';');
            }
            Stmt::Expr(expr) => {
                self.expr(expr);
                self.output.push(';');
            }
            Stmt::Block(body) => self.block(body),
            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.expr(value);
                }
                self.output.push(';');
            }
            Stmt::Observe { label, expr } => {
                let _ = write!(self.output, "observe({label:?}, ");
                self.expr(expr);
                self.output.push_str(");");
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(Value::Number(n)) => self.output.push_str(&number_to_string(*n)),
            Expr::Literal(value) => {
                let _ = write!(self.output, "{value:?}");
            }
            Expr::Ident(name) => self.output.push_str(name),
            Expr::Add(left, right) => {
                self.expr(left);
                self.output.push_str(" + ");
                self.expr(right);
            }
            Expr::TypeOf(operand) => {
                self.output.push_str("typeof ");
                self.expr(operand);
            }
            Expr::Call { callee, args } => {
                self.expr(callee);
                self.output.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.output.push(')');
            }
        }
    }
}
