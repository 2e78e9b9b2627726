use pretty_assertions::assert_eq;
use crate::interpreter::builtins::default_builtins;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::{ObjectType, FALSE, TRUE};
use crate::interpreter::parser::Parser;
use super::*;

fn eval_in(input: &str, env: &Rc<Environment>) -> Option<Object> {
    let mut parser = Parser::new(Lexer::new(input).tokenize());
    let (program, ok) = parser.parse_program();
    assert!(ok, "unexpected diagnostics for {:?}: {:?}", input, parser.errors());

    Evaluator::new(default_builtins()).eval_program(&program, env)
}

fn eval(input: &str) -> Object {
    eval_in(input, &Environment::new_global()).unwrap_or_else(|| panic!("no value for {:?}", input))
}

fn string(value: &str) -> Object {
    Object::String(value.to_owned())
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_integers() {
        assert_eq!(Object::Integer(10), eval("5 + 5 * 2 - 10 / 2"));
        assert_eq!(Object::Integer(-7), eval("-(3 + 4)"));
        assert_eq!(Object::Integer(3), eval("7 / 2"));
    }

    #[test]
    pub fn test_numeric_promotion() {
        assert_eq!(Object::Float(2.5), eval("1 + 1.5"));
        assert_eq!(Object::Complex(Complex::new(1.0, 1.5)), eval("1 + 1.5i"));
        assert_eq!(Object::Complex(Complex::new(-0.5, 2.0)), eval("2i - 0.5"));
        assert_eq!(Object::Complex(Complex::new(-1.0, 0.0)), eval("1i * 1i"));
    }

    #[test]
    pub fn test_comparisons() {
        assert_eq!(TRUE, eval("1 < 2"));
        assert_eq!(TRUE, eval("1 <= 1.0"));
        assert_eq!(FALSE, eval("2.5 > 3"));
        assert_eq!(TRUE, eval("\"abc\" < \"abd\""));
        assert_eq!(TRUE, eval("1 == 1.0"));
        assert_eq!(TRUE, eval("\"a\" != \"b\""));
        assert_eq!(FALSE, eval("true == false"));
    }

    #[test]
    pub fn test_identity_equality() {
        assert_eq!(FALSE, eval("[1] == [1]"));
        assert_eq!(TRUE, eval("imm a = [1]; a == a"));
        assert_eq!(FALSE, eval("1 == \"1\""));
    }

    #[test]
    pub fn test_division_by_zero() {
        assert_eq!(Object::Error(RuntimeError::DivisionByZero), eval("1 / 0"));
        assert_eq!(Object::Float(f64::INFINITY), eval("1.0 / 0"));
    }
}

mod strings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_concatenation() {
        assert_eq!(string("hello world"), eval("\"hello\" + \" \" + \"world\""));
        assert_eq!(string("n=3"), eval("\"n=\" + 3"));
        assert_eq!(string("true!"), eval("true + \"!\""));
    }

    #[test]
    pub fn test_interpolation() {
        assert_eq!(string("1 and 2"), eval("imm a = 1; imm b = 2; \"${a} and ${b}\""));
        assert_eq!(string("area: 6!"), eval("imm w = 2; imm h = 3; \"area: ${w * h}!\""));
        assert_eq!(string("value: 2"), eval("imm h = {v: 2}; \"value: ${h.v}\""));
    }

    #[test]
    pub fn test_containers_do_not_concatenate() {
        assert_eq!(Object::Error(RuntimeError::TypeMismatch {
            left: ObjectType::String,
            operator: TokenType::Plus,
            right: ObjectType::Array,
        }), eval("\"a\" + [1]"));
    }
}

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_truthiness() {
        assert_eq!(Object::Integer(1), eval("if (0) { 1 } else { 2 }"));
        assert_eq!(Object::Integer(1), eval("if (\"\") { 1 } else { 2 }"));
        assert_eq!(Object::Integer(2), eval("imm nothing = () => { return }; if (nothing()) { 1 } else { 2 }"));
        assert_eq!(Object::Integer(2), eval("if (false) { 1 } else { 2 }"));
        assert_eq!(NULL, eval("if (false) { 1 }"));
        assert_eq!(TRUE, eval("imm nothing = () => { return }; !nothing()"));
        assert_eq!(FALSE, eval("!0"));
    }

    #[test]
    pub fn test_return_stops_program() {
        assert_eq!(Object::Integer(10), eval("9; return 10; 11"));
        assert_eq!(Object::Integer(10), eval("if (true) { if (true) { return 10 } return 1 }"));
    }

    #[test]
    pub fn test_loop_break() {
        let env = Environment::new_global();
        eval_in("mut seen = {}; loop (imm e = {a: \"x\", b: \"y\", c: \"z\"}) { seen[e.k] = e.i; if (e.v == \"y\") break }", &env);

        let seen = env.get("seen").map(|seen| seen.inspect());
        assert_eq!(Some(String::from("{a: 0, b: 1}")), seen);
    }

    #[test]
    pub fn test_loop_continue() {
        assert_eq!(Object::Integer(4), eval("mut sum = 0; loop (imm e = [1, 2, 3]) { if (e.v == 2) continue; sum = sum + e.v } sum"));
    }

    #[test]
    pub fn test_loop_return_propagates() {
        assert_eq!(string("b"), eval("imm find = (h) => { loop (imm e = h) { if (e.v == 2) { return e.k } } return }; find({a: 1, b: 2})"));
    }

    #[test]
    pub fn test_loop_yields_nothing() {
        assert_eq!(None, eval_in("loop (imm e = [1]) { e }", &Environment::new_global()));
        assert_eq!(None, eval_in("loop (imm e = 5) { e }", &Environment::new_global()));
    }

    #[test]
    pub fn test_break_does_not_escape_call() {
        assert_eq!(NULL, eval("imm f = () => { break }; f()"));
    }
}

mod bindings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_bare_let_yields_nothing() {
        let env = Environment::new_global();

        assert_eq!(None, eval_in("mut a", &env));
        assert_eq!(Some(Object::Undefined), env.get("a"));
    }

    #[test]
    pub fn test_assignment_mutates_owning_scope() {
        assert_eq!(Object::Integer(3), eval("mut n = 0; imm inc = () => { n = n + 1 }; inc(); inc(); inc(); n"));
    }

    #[test]
    pub fn test_assignment_to_unknown_name() {
        assert_eq!(Object::Error(RuntimeError::IdentifierNotFound(String::from("x"))), eval("x = 1"));
    }

    #[test]
    pub fn test_member_assignment() {
        assert_eq!(Object::Integer(2), eval("mut a = {b: 1}; a.b = {c: 2}; a.b.c"));
        assert_eq!(Object::Integer(5), eval("imm a = {}; imm b = a; b[\"x\"] = 5; a.x"));
        assert_eq!(Object::Undefined, eval("imm a = {}; a.missing"));
    }

    #[test]
    pub fn test_array_index_asymmetry() {
        assert_eq!(NULL, eval("imm a = [1, 2]; a[5]"));
        assert_eq!(NULL, eval("imm a = [1, 2]; a[-1]"));
        assert_eq!(Object::Error(RuntimeError::IndexOutOfRange { index: 5, length: 2 }), eval("imm a = [1, 2]; a[5] = 1"));
        assert_eq!(Object::Integer(9), eval("imm a = [1, 2]; a[1] = 9; a[1]"));
        assert_eq!(Object::Error(RuntimeError::ArrayIndexNotInteger(ObjectType::String)), eval("imm a = [1]; a[\"0\"] = 1"));
    }

    #[test]
    pub fn test_closures() {
        assert_eq!(Object::Integer(5), eval("imm adder = (x) => { (y) => { x + y } }; imm add2 = adder(2); add2(3)"));
    }

    #[test]
    pub fn test_arguments() {
        assert_eq!(Object::Undefined, eval("imm f = (a, b) => { b }; f(1)"));
        assert_eq!(Object::Integer(1), eval("imm f = (a) => { a }; f(1, 2, 3)"));
    }
}

mod classes {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONSTRUCTORS: &str = "imm Base = () => { imm v = 1; return this }; \
        imm Child = () => { ...Base(); imm w = 2; return this }; \
        imm c = Child();";

    #[test]
    pub fn test_derive_from_constructor() {
        assert_eq!(Object::Integer(1), eval(&format!("{} c.v", CONSTRUCTORS)));
        assert_eq!(Object::Integer(2), eval(&format!("{} c.w", CONSTRUCTORS)));
        assert_eq!(TRUE, eval(&format!("{} c instanceof Base", CONSTRUCTORS)));
        assert_eq!(TRUE, eval(&format!("{} c instanceof Child", CONSTRUCTORS)));
        assert_eq!(FALSE, eval(&format!("{} Base() instanceof Child", CONSTRUCTORS)));
    }

    #[test]
    pub fn test_naming_is_write_once() {
        let env = Environment::new_global();
        eval_in("imm F = () => { return this }; imm G = (o) => { return o }; imm a = F(); imm b = G(a)", &env);

        match (env.get("b"), env.get("F")) {
            (Some(Object::Class(class)), Some(Object::Function(function))) => assert_eq!(function.name, class.borrow().name()),
            other => panic!("expected class and function, got {:?}", other),
        }
        assert_eq!(Some(TRUE), eval_in("a instanceof F", &env));
        assert_eq!(Some(FALSE), eval_in("a instanceof G", &env));
    }

    #[test]
    pub fn test_names_are_unique_across_evaluations() {
        let env = Environment::new_global();
        eval_in("imm A = () => { return this }", &env);

        assert_eq!(Some(FALSE), eval_in("imm B = () => { return this }; imm b = B(); b instanceof A", &env));
        assert_eq!(Some(TRUE), eval_in("b instanceof B", &env));
    }

    #[test]
    pub fn test_derive_from_hash() {
        assert_eq!(Object::Integer(3), eval("imm f = () => { ...{x: 1, y: 2}; x + y }; f()"));
        assert_eq!(Object::Error(RuntimeError::DeriveRequiresHash(ObjectType::Integer)), eval("...1"));
    }

    #[test]
    pub fn test_this_in_scope() {
        assert_eq!(Object::Integer(4), eval("imm make = () => { imm a = 4; this }; make().a"));
        assert_eq!(Object::Integer(4), eval("imm make = () => { imm a = 4; this }; make()[\"a\"]"));
    }

    #[test]
    pub fn test_instanceof_types() {
        assert_eq!(TRUE, eval("1 instanceof number"));
        assert_eq!(TRUE, eval("1.5i instanceof number"));
        assert_eq!(TRUE, eval("{} instanceof object"));
        assert_eq!(TRUE, eval("\"s\" instanceof string"));
        assert_eq!(FALSE, eval("\"s\" instanceof array"));
        assert_eq!(TRUE, eval("[] instanceof any"));
        assert_eq!(FALSE, eval("imm f = () => { 1 }; {} instanceof f"));
        assert_eq!(Object::Error(RuntimeError::InvalidInstanceOf(ObjectType::Integer)), eval("1 instanceof 2"));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_error_messages() {
        let cases = [
            ("5 + true", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false", "unknown operator: BOOLEAN + BOOLEAN"),
            ("\"a\" - \"b\"", "unknown operator: STRING - STRING"),
            ("if (10 > 1) { true + false; 1 }", "unknown operator: BOOLEAN + BOOLEAN"),
            ("foobar", "identifier not found: foobar"),
            ("{\"name\": 1}[[]]", "unusable as hash key: ARRAY"),
            ("{[1]: 2}", "unusable as hash key: ARRAY"),
            ("1()", "not a function: INTEGER"),
            ("1.x", "not a hash: INTEGER"),
            ("1[0]", "index operator not supported: INTEGER"),
        ];

        for (input, message) in cases {
            match eval(input) {
                Object::Error(error) => assert_eq!(message, error.to_string(), "for {:?}", input),
                other => panic!("expected error for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    pub fn test_error_short_circuits_arguments() {
        let env = Environment::new_global();
        let result = eval_in("mut n = 0; imm f = (a, b) => { n = 1 }; f(missing, 2)", &env);

        assert_eq!(Some(Object::Error(RuntimeError::IdentifierNotFound(String::from("missing")))), result);
        assert_eq!(Some(Object::Integer(0)), env.get("n"));
    }
}

mod builtins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_builtin_lookup() {
        assert_eq!(Object::Integer(3), eval("len([1, 2, 3])"));
        assert_eq!(Object::Integer(2), eval("imm len = (x) => { 2 }; len([1])"));
        assert_eq!("[a, b]", eval("keys({a: 1, b: 2})").inspect());
    }

    #[test]
    pub fn test_without_builtins() {
        let mut parser = Parser::new(Lexer::new("len").tokenize());
        let (program, _) = parser.parse_program();

        assert_eq!(Some(Object::Error(RuntimeError::IdentifierNotFound(String::from("len")))),
                   Evaluator::new(Builtins::default()).evaluate(Node::from(&program), &Environment::new_global()));
    }
}
