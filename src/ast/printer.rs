use crate::ast::*;

pub fn to_sexp(program: &Program) -> String {
    let mut buf = String::new();
    for stmt in &program.statements {
        sexp_stmt(&mut buf, stmt);
        buf.push('\n');
    }
    buf
}

pub fn expr_to_sexp(expr: &Expr) -> String {
    let mut buf = String::new();
    sexp_expr(&mut buf, expr);
    buf
}

pub fn to_json(program: &Program) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(program)
}

pub fn from_json(json: &str) -> Result<Program, serde_json::Error> {
    serde_json::from_str(json)
}

fn sexp_stmt(buf: &mut String, stmt: &Stmt) {
    match stmt {
        Stmt::Declaration(d) => {
            buf.push('(');
            buf.push_str(binding_keyword(&d.identifier));
            buf.push(' ');
            buf.push_str(&d.identifier.name);
            buf.push_str(": ");
            buf.push_str(&d.declared_type.to_string());
            buf.push(')');
        }
        Stmt::DeclarationAndAssignment(d) => {
            buf.push('(');
            buf.push_str(binding_keyword(&d.identifier));
            buf.push(' ');
            buf.push_str(&d.identifier.name);
            buf.push_str(": ");
            buf.push_str(&d.declared_type.to_string());
            buf.push(' ');
            sexp_expr(buf, &d.initializer);
            buf.push(')');
        }
        Stmt::Assignment(a) => {
            buf.push_str("(= ");
            buf.push_str(&a.identifier.name);
            buf.push(' ');
            sexp_expr(buf, &a.value);
            buf.push(')');
        }
        Stmt::If(i) => {
            buf.push_str("(if ");
            buf.push_str(&i.condition.name);
            buf.push(' ');
            sexp_stmt(buf, &i.then_branch);
            if let Some(ref else_branch) = i.else_branch {
                buf.push(' ');
                sexp_stmt(buf, else_branch);
            }
            buf.push(')');
        }
        Stmt::Print(p) => {
            buf.push_str("(println ");
            sexp_expr(buf, &p.value);
            buf.push(')');
        }
    }
}

fn binding_keyword(identifier: &DeclaredIdentifier) -> &'static str {
    if identifier.mutable { "let" } else { "const" }
}

fn sexp_expr(buf: &mut String, expr: &Expr) {
    match expr {
        Expr::Binary(b) => {
            buf.push('(');
            buf.push_str(&b.operator.to_string());
            buf.push(' ');
            sexp_expr(buf, &b.left);
            buf.push(' ');
            sexp_expr(buf, &b.right);
            buf.push(')');
        }
        Expr::Literal(l) => match l.kind {
            LiteralKind::String => {
                buf.push('"');
                buf.push_str(&l.text);
                buf.push('"');
            }
            LiteralKind::Number | LiteralKind::Boolean => buf.push_str(&l.text),
        },
        Expr::Identifier(i) => buf.push_str(&i.name),
        Expr::ReadInput(r) => {
            buf.push_str("(readInput \"");
            buf.push_str(&r.prompt);
            buf.push_str("\")");
        }
        Expr::ReadEnv(r) => {
            buf.push_str("(readEnv ");
            buf.push_str(&r.source);
            buf.push(')');
        }
    }
}
