pub mod environment;
pub mod value;

use std::io::{BufRead, BufReader, Write};

use log::{debug, trace};

use crate::ast::*;
use crate::error::RuntimeError;
use crate::interpreter::environment::{Binding, Environment};
use crate::interpreter::value::Value;

pub struct Interpreter {
    environment: Environment,
    output: Vec<String>,
    /// Writer for println output and input prompts
    writer: Box<dyn Write>,
    /// Source of readInput lines
    reader: Box<dyn BufRead>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter reading from stdin and printing to stdout.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    pub fn with_io(reader: impl BufRead + 'static, writer: impl Write + 'static) -> Self {
        Self {
            environment: Environment::new(),
            output: Vec::new(),
            writer: Box::new(writer),
            reader: Box::new(reader),
        }
    }

    /// Run every statement in order, stopping at the first error.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for stmt in &program.statements {
            self.execute(stmt)?;
        }
        debug!(
            "executed {} statement(s), {} binding(s) live",
            program.statements.len(),
            self.environment.len()
        );
        Ok(())
    }

    /// Lines printed so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Errors without a more precise location point at the statement.
    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        trace!("executing statement at {}", stmt.position());
        self.execute_statement(stmt)
            .map_err(|e| e.at(stmt.position()))
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Declaration(d) => {
                let binding = Binding {
                    kind: d.declared_type.into(),
                    value: None,
                    mutable: d.identifier.mutable,
                };
                self.environment
                    .declare(&d.identifier.name, binding)
                    .map_err(|e| e.at(d.identifier.position))?;
                debug!("declared {}: {}", d.identifier.name, d.declared_type);
                Ok(())
            }
            Stmt::DeclarationAndAssignment(d) => {
                let name = &d.identifier.name;
                let at = d.identifier.position;
                if self.environment.contains(name) {
                    return Err(RuntimeError::already_exists(name).at(at));
                }
                let kind = LiteralKind::from(d.declared_type);
                let value = self.evaluate_as(&d.initializer, name, kind)?;
                if value.kind != kind {
                    return Err(RuntimeError::type_mismatch(name, kind, value.kind).at(at));
                }
                debug!("declared {name}: {kind} = {value}");
                self.environment.declare(
                    name,
                    Binding {
                        kind,
                        value: Some(value),
                        mutable: d.identifier.mutable,
                    },
                )
            }
            Stmt::Assignment(a) => {
                let name = &a.identifier.name;
                let at = a.identifier.position;
                let kind = self.environment.get(name).map_err(|e| e.at(at))?.kind;
                let value = self.evaluate_as(&a.value, name, kind)?;
                self.environment.assign(name, value).map_err(|e| e.at(at))
            }
            Stmt::Print(p) => {
                let value = self.evaluate(&p.value)?;
                writeln!(self.writer, "{value}")?;
                self.output.push(value.text);
                Ok(())
            }
            Stmt::If(i) => {
                let name = &i.condition.name;
                let at = i.condition.position;
                let binding = self.environment.get(name).map_err(|e| e.at(at))?;
                let condition = binding
                    .value
                    .as_ref()
                    .and_then(Value::as_bool)
                    .ok_or_else(|| RuntimeError::invalid_if_condition(name).at(at))?;
                if condition {
                    self.execute(&i.then_branch)
                } else if let Some(ref else_branch) = i.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Evaluate the value bound to `name` of `kind`; input is coerced to it.
    fn evaluate_as(
        &mut self,
        expr: &Expr,
        name: &str,
        kind: LiteralKind,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::ReadInput(r) => {
                let line = self.read_input(&r.prompt)?;
                Value::coerce(&line, kind)
                    .ok_or_else(|| RuntimeError::type_mismatch(name, kind, line).at(r.position))
            }
            _ => self.evaluate(expr),
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(l) => {
                Value::from_literal(l.kind, &l.text).map_err(|e| e.at(l.position))
            }
            Expr::Identifier(i) => self.environment.lookup(&i.name).map_err(|e| e.at(i.position)),
            Expr::Binary(b) => {
                let left = self.evaluate(&b.left)?;
                let right = self.evaluate(&b.right)?;
                Value::binary(b.operator, &left, &right).map_err(|e| e.at(b.position))
            }
            Expr::ReadInput(r) => self.read_input(&r.prompt).map(Value::string),
            Expr::ReadEnv(r) => self
                .environment
                .lookup(&r.source)
                .map_err(|e| e.at(r.position)),
        }
    }

    /// Write the prompt, then read one line without its line terminator.
    fn read_input(&mut self, prompt: &str) -> Result<String, RuntimeError> {
        if !prompt.is_empty() {
            write!(self.writer, "{prompt}")?;
            self.writer.flush()?;
        }
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        trace!("read input line {line:?}");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner;
    use crate::scanner::profile::Version;
    use crate::scanner::token::Position;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    /// Writer whose bytes stay inspectable after the interpreter owns it.
    #[derive(Clone, Default)]
    struct SharedWriter(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn program(source: &str) -> Program {
        let tokens = scanner::scan(source, Version::V1_1).expect("scan should succeed");
        Parser::new(tokens).parse().expect("parse should succeed")
    }

    fn capturing(input: &str) -> Interpreter {
        Interpreter::with_io(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn run(source: &str) -> Vec<String> {
        run_with_input(source, "")
    }

    fn run_with_input(source: &str, input: &str) -> Vec<String> {
        let mut interp = capturing(input);
        interp
            .interpret(&program(source))
            .expect("interpret should succeed");
        interp.output.clone()
    }

    fn run_err(source: &str) -> RuntimeError {
        let mut interp = capturing("");
        interp.interpret(&program(source)).unwrap_err()
    }

    #[rstest]
    #[case("println(1 + 2);", "3")]
    #[case("println(5 - 5);", "0")]
    #[case("println(5 * 5);", "25")]
    #[case("println(5 / 2);", "2.5")]
    #[case("println(1 / 0);", "inf")]
    #[case("println(2 + 3 * 4);", "14")]
    #[case("println((2 + 3) * 4);", "20")]
    #[case("println(0.1 * 3);", "0.30000000000000004")]
    #[case("println(\"hello\" + \" world\");", "hello world")]
    #[case("println(\"n: \" + 5);", "n: 5")]
    #[case("println(5 + \" apples\");", "5 apples")]
    #[case("println(true);", "true")]
    fn arithmetic_and_concatenation(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(run(source), vec![expected]);
    }

    #[test]
    fn declared_number_prints_canonically() {
        assert_eq!(run("let x: number = 5; println(x);"), vec!["5"]);
        assert_eq!(run("let x: number = 2.50; println(x);"), vec!["2.5"]);
    }

    #[test]
    fn declare_then_assign() {
        let output = run("let x: number; x = 3; x = x * 2; println(x);");
        assert_eq!(output, vec!["6"]);
    }

    #[test]
    fn statements_run_in_order() {
        let output = run("let s: string = \"a\"; println(s); s = s + \"b\"; println(s);");
        assert_eq!(output, vec!["a", "ab"]);
    }

    #[test]
    fn conditional_runs_matching_branch() {
        let source = "let a: boolean = true; if (a) { println(\"yes\"); } else { println(\"no\"); }";
        assert_eq!(run(source), vec!["yes"]);
        let source = "let a: boolean = false; if (a) { println(\"yes\"); } else { println(\"no\"); }";
        assert_eq!(run(source), vec!["no"]);
        let source = "let a: boolean = false; if (a) { println(\"yes\"); } println(\"after\");";
        assert_eq!(run(source), vec!["after"]);
    }

    #[test]
    fn branch_declarations_stay_visible() {
        let source = "let a: boolean = true; if (a) { let b: number = 1; } println(b);";
        assert_eq!(run(source), vec!["1"]);
    }

    #[test]
    fn nested_conditionals() {
        let source = "let a: boolean = true; let b: boolean = false; \
                      if (a) { if (b) { println(1); } else { println(2); } }";
        assert_eq!(run(source), vec!["2"]);
    }

    #[rstest]
    #[case("let x: number = 1; let x: number = 2;", "Variable x already exists")]
    #[case("let x: number; let x: string;", "Variable x already exists")]
    #[case("println(y);", "Variable y not found")]
    #[case("y = 1;", "Variable y not found")]
    #[case(
        "let x: number = \"a\";",
        "Type mismatch for variable x: expected number, found string"
    )]
    #[case(
        "let x: number = 1; x = \"a\";",
        "Type mismatch for variable x: expected number, found string"
    )]
    #[case("const x: number = 1; x = 2;", "Variable x is not mutable")]
    #[case("const x: number; x = 2;", "Variable x is not mutable")]
    #[case("let x: number; println(x);", "Variable x is not initialized")]
    #[case("let c: number = 1; if (c) { println(1); }", "Invalid argument type for if statement: c")]
    #[case("let c: boolean; if (c) { println(1); }", "Invalid argument type for if statement: c")]
    #[case("println(\"a\" - 1);", "Invalid operand 'a' for operator '-'")]
    fn runtime_errors(#[case] source: &str, #[case] message: &str) {
        let err = run_err(source);
        assert!(
            err.to_string().starts_with(message),
            "unexpected message: {err}"
        );
        assert!(err.position().is_some(), "no location on: {err}");
    }

    #[rstest]
    #[case(
        "let x: number = 5;\nx = \"hi\";",
        "Type mismatch for variable x: expected number, found string in line 1 and column 0"
    )]
    #[case("let a: number = 1;\nprintln(a);\nprintln(b);", "Variable b not found in line 2 and column 8")]
    #[case("let a: number = 1;\n  let a: string;", "Variable a already exists in line 1 and column 6")]
    #[case("const k: number = 1;\nk = 2;", "Variable k is not mutable in line 1 and column 0")]
    #[case("let s: string = \"a\";\nprintln(1 + s * 2);", "Invalid operand 'a' for operator '*' in line 1 and column 14")]
    #[case(
        "let flag: number = 0;\nif (flag) { println(1); }",
        "Invalid argument type for if statement: flag in line 1 and column 4"
    )]
    fn runtime_errors_name_their_location(#[case] source: &str, #[case] message: &str) {
        assert_eq!(run_err(source).to_string(), message);
    }

    #[test]
    fn error_inside_branch_points_into_branch() {
        let source = "let a: boolean = true;\nif (a) {\n    println(missing);\n}";
        let err = run_err(source);
        assert_eq!(err.position(), Some(Position::new(2, 12)));
    }

    #[test]
    fn first_error_stops_execution() {
        let mut interp = capturing("");
        let result = interp.interpret(&program("println(1); println(z); println(2);"));
        assert!(result.is_err());
        assert_eq!(interp.output(), ["1"]);
    }

    #[test]
    fn declaration_binds_canonical_value() {
        let mut interp = capturing("");
        interp.interpret(&program("let x: number = 5;")).unwrap();
        let binding = interp.environment().get("x").unwrap();
        assert_eq!(
            *binding,
            Binding {
                kind: LiteralKind::Number,
                value: Some(Value::number(5.0)),
                mutable: true,
            }
        );
        assert_eq!(binding.value.as_ref().unwrap().text, "5");
    }

    #[test]
    fn only_the_taken_branch_binds() {
        let mut interp = capturing("");
        interp
            .interpret(&program(
                "let a: boolean = true; if (a) { let b: number = 1; } else { let x: number = 0; };",
            ))
            .unwrap();
        assert_eq!(interp.environment().lookup("b").unwrap().text, "1");
        assert!(!interp.environment().contains("x"));
    }

    #[test]
    fn nothing_runs_after_redeclaration() {
        let mut interp = capturing("");
        let err = interp
            .interpret(&program(
                "let x: number = 1; println(x); let x: number = 2; println(x);",
            ))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyExists { .. }));
        assert_eq!(interp.output(), ["1"]);
    }

    #[test]
    fn mutability_survives_assignment() {
        let mut interp = capturing("");
        interp
            .interpret(&program("let x: number = 1; x = 2;"))
            .unwrap();
        let binding = interp.environment().get("x").unwrap();
        assert!(binding.mutable);
        assert_eq!(binding.value.as_ref().unwrap().text, "2");
    }

    #[test]
    fn read_input_coerces_to_declared_type() {
        let source = "let n: number = readInput(\"n? \"); let s: string = readInput(); \
                      let b: boolean = readInput(); println(n + 1); println(s); println(b);";
        let output = run_with_input(source, "41\nhello there\ntrue\n");
        assert_eq!(output, vec!["42", "hello there", "true"]);
    }

    #[test]
    fn read_input_writes_prompt_but_not_into_output() {
        let writer = SharedWriter::default();
        let mut interp = Interpreter::with_io(Cursor::new(b"Ada\n".to_vec()), writer.clone());
        interp
            .interpret(&program(
                "let name: string = readInput(\"Name: \"); println(\"hi \" + name);",
            ))
            .unwrap();
        assert_eq!(interp.output(), ["hi Ada"]);
        let written = String::from_utf8(writer.0.borrow().clone()).unwrap();
        assert_eq!(written, "Name: hi Ada\n");
    }

    #[test]
    fn read_input_into_assignment() {
        let output = run_with_input("let x: number = 1; x = readInput(); println(x);", "7.50\r\n");
        assert_eq!(output, vec!["7.5"]);
    }

    #[test]
    fn read_input_rejects_bad_number() {
        let mut interp = capturing("abc\n");
        let err = interp
            .interpret(&program("let n: number = readInput();"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch for variable n: expected number, found abc in line 0 and column 16"
        );
    }

    #[test]
    fn nan_is_an_ordinary_number() {
        let source = "let z: number = 0 / 0; println(z); println(z * 2); \
                      let w: number = z + 1; println(w);";
        assert_eq!(run(source), vec!["NaN", "NaN", "NaN"]);
    }

    #[test]
    fn nan_input_is_rejected() {
        let mut interp = capturing("NaN\n");
        let err = interp
            .interpret(&program("let n: number = readInput();"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { ref found, .. } if found == "NaN"));
    }

    #[test]
    fn read_env_copies_another_variable() {
        let source = "let home: string = \"/root\"; let h: string = readEnv(home); \
                      home = \"/tmp\"; println(h); println(home);";
        assert_eq!(run(source), vec!["/root", "/tmp"]);
    }

    #[rstest]
    #[case("let h: string = readEnv(missing);", "Variable missing not found")]
    #[case(
        "let n: number = 1; let s: string = readEnv(n);",
        "Type mismatch for variable s: expected string, found number"
    )]
    fn read_env_errors(#[case] source: &str, #[case] message: &str) {
        let err = run_err(source).to_string();
        assert!(err.starts_with(message), "unexpected message: {err}");
    }
}
