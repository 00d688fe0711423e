use std::fmt::Write as _;

use crate::pyast::{Expr, Module, Stmt};

const INDENT: &str = "    ";

/// Prints `module` as Python source.
///
/// Header statements are printed back to back; every other statement is preceded by a blank
/// line. Block expressions put each element on its own line, one level deeper.
pub fn unparse(module: &Module) -> String {
    let mut printer = Printer::default();
    for (i, stmt) in module.body.iter().enumerate() {
        if i > 0 && !stmt.is_header() {
            printer.out.push('\n');
        }
        printer.stmt(stmt);
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Comment(text) => {
                self.out.push_str("# ");
                self.out.push_str(text);
            }
            Stmt::ImportFrom { module, names } => {
                let _ = write!(self.out, "from {module} import {}", names.join(", "));
            }
            Stmt::Assign { target, value } => {
                self.out.push_str(target);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Stmt::AnnAssign {
                target,
                annotation,
                value,
            } => {
                self.out.push_str(target);
                self.out.push_str(": ");
                self.expr(annotation);
                self.out.push_str(" = ");
                self.expr(value);
            }
        }
        self.out.push('\n');
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(name) => self.out.push_str(name),
            Expr::Str(value) => self.string_literal(value),
            Expr::Int(value) => {
                let _ = write!(self.out, "{value}");
            }
            Expr::Subscript { value, slice } => {
                self.expr(value);
                self.out.push('[');
                self.inline_list(slice);
                self.out.push(']');
            }
            Expr::Call { func, args } => {
                self.expr(func);
                self.out.push('(');
                if expr.is_block() {
                    self.indent += 1;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.out.push(',');
                        }
                        self.newline();
                        self.expr(arg);
                    }
                    self.indent -= 1;
                    self.newline();
                } else {
                    self.inline_list(args);
                }
                self.out.push(')');
            }
            Expr::Dict(entries) if entries.is_empty() => self.out.push_str("{}"),
            Expr::Dict(entries) => {
                self.out.push('{');
                self.indent += 1;
                for (key, value) in entries {
                    self.newline();
                    self.expr(key);
                    self.out.push_str(": ");
                    self.expr(value);
                    self.out.push(',');
                }
                self.indent -= 1;
                self.newline();
                self.out.push('}');
            }
        }
    }

    fn inline_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(expr);
        }
    }

    fn string_literal(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}
