use lazy_static::lazy_static;
use regex::Regex;

use std::{collections::HashMap, fmt::Display};

use crate::{
    equality,
    error::{self as e, LispError},
    value::{Args, BuiltinFunction, EvalResult, Value},
};

lazy_static! {
    static ref LEADING_INT_RE: Regex = Regex::new(r"^\s*(-?[0-9]+)").unwrap();
    static ref PRIMITIVES: HashMap<&'static str, BuiltinFunction> = {
        let mut table: HashMap<&'static str, BuiltinFunction> = HashMap::with_capacity(32);

        table.insert("+", add);
        table.insert("-", subtract);
        table.insert("*", multiply);
        table.insert("/", divide);
        table.insert("mod", modulo);
        table.insert("quotient", quotient);
        table.insert("remainder", remainder);

        table.insert("=", num_equal);
        table.insert("<", less);
        table.insert(">", greater);
        table.insert("!=", not_equal);
        table.insert("/=", not_equal);
        table.insert(">=", greater_equal);
        table.insert("<=", less_equal);

        table.insert("and", and);
        table.insert("or", or);

        table.insert("string=?", string_equal);
        table.insert("string<?", string_less);
        table.insert("string>?", string_greater);
        table.insert("string<=?", string_less_equal);
        table.insert("string>=?", string_greater_equal);

        table.insert("car", car);
        table.insert("cdr", cdr);
        table.insert("cons", cons);
        table.insert("list", list);

        table.insert("eq?", eqvp);
        table.insert("eqv?", eqvp);
        table.insert("equal?", equalp);
        table
    };
}

/// Finds a primitive by name. The table is built once and never changes.
pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    PRIMITIVES.get(name).copied()
}

pub fn names() -> impl Iterator<Item = &'static str> {
    PRIMITIVES.keys().copied()
}

pub fn unpack_num(value: &Value) -> Result<i128, LispError> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::String(s) => LEADING_INT_RE
            .captures(s)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .map_or_else(|| e::type_mismatch("number", value), Ok),
        Value::List(l) if l.len() == 1 => unpack_num(&l[0]),
        other => e::type_mismatch("number", other),
    }
}

pub fn unpack_str(value: &Value) -> Result<String, LispError> {
    match value {
        Value::String(s) => Ok(s.as_ref().clone()),
        Value::Integer(n) => Ok(n.to_string()),
        Value::Bool(_) => Ok(value.to_string()),
        other => e::type_mismatch("string", other),
    }
}

pub fn unpack_bool(value: &Value) -> Result<bool, LispError> {
    value
        .bool()
        .map_or_else(|| e::type_mismatch("boolean", value), Ok)
}

pub fn add(args: Args) -> EvalResult {
    numeric_fold(args, i128::checked_add, '+')
}

pub fn subtract(args: Args) -> EvalResult {
    numeric_fold(args, i128::checked_sub, '-')
}

pub fn multiply(args: Args) -> EvalResult {
    numeric_fold(args, i128::checked_mul, '*')
}

pub fn divide(args: Args) -> EvalResult {
    numeric_fold(args, floor_div, '/')
}

pub fn modulo(args: Args) -> EvalResult {
    numeric_fold(args, floor_mod, "mod")
}

pub fn quotient(args: Args) -> EvalResult {
    numeric_fold(args, i128::checked_div, "quotient")
}

pub fn remainder(args: Args) -> EvalResult {
    numeric_fold(args, i128::checked_rem, "remainder")
}

pub fn num_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::eq)
}

pub fn less(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::lt)
}

pub fn greater(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::gt)
}

pub fn not_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::ne)
}

pub fn greater_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::ge)
}

pub fn less_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_num, i128::le)
}

pub fn and(args: Args) -> EvalResult {
    bool_binop(args, unpack_bool, |a: &bool, b: &bool| *a && *b)
}

pub fn or(args: Args) -> EvalResult {
    bool_binop(args, unpack_bool, |a: &bool, b: &bool| *a || *b)
}

pub fn string_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_str, |a: &String, b: &String| a == b)
}

pub fn string_less(args: Args) -> EvalResult {
    bool_binop(args, unpack_str, String::lt)
}

pub fn string_greater(args: Args) -> EvalResult {
    bool_binop(args, unpack_str, String::gt)
}

pub fn string_less_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_str, String::le)
}

pub fn string_greater_equal(args: Args) -> EvalResult {
    bool_binop(args, unpack_str, String::ge)
}

pub fn car(args: Args) -> EvalResult {
    ensure_len(&args, |n| n == 1, 1)?;

    match &args[0] {
        Value::List(l) if !l.is_empty() => Ok(l[0].clone()),
        other => e::type_mismatch("pair", other),
    }
}

pub fn cdr(args: Args) -> EvalResult {
    ensure_len(&args, |n| n == 1, 1)?;

    match &args[0] {
        Value::List(l) if !l.is_empty() => Ok(Value::List(l.skip(1))),
        other => e::type_mismatch("pair", other),
    }
}

pub fn cons(args: Args) -> EvalResult {
    ensure_len(&args, |n| n == 2, 2)?;

    let mut iter = args.iter();
    let elm = iter.next().unwrap().clone();
    match iter.next().unwrap() {
        Value::List(list) => {
            let mut list = list.clone();
            list.push_front(elm);
            Ok(Value::List(list))
        }
        other => Ok(Value::make_list(vec![elm, other.clone()])),
    }
}

pub fn list(args: Args) -> EvalResult {
    Ok(Value::List(args))
}

pub fn eqvp(args: Args) -> EvalResult {
    ensure_len(&args, |n| n == 2, 2)?;

    Ok(Value::Bool(equality::eqv(&args[0], &args[1])))
}

pub fn equalp(args: Args) -> EvalResult {
    ensure_len(&args, |n| n == 2, 2)?;

    Ok(Value::Bool(equality::equal(&args[0], &args[1])))
}

// Division by zero and overflow both surface as `None` from the operation;
// a zero right operand tells them apart.
#[inline]
fn numeric_fold<D: Display>(
    args: Args,
    operation: fn(i128, i128) -> Option<i128>,
    name: D,
) -> EvalResult {
    ensure_len(&args, |n| n >= 2, 2)?;

    let numbers = args
        .iter()
        .map(unpack_num)
        .collect::<Result<Vec<_>, _>>()?;

    numbers[1..]
        .iter()
        .try_fold(numbers[0], |acc, &n| match operation(acc, n) {
            Some(result) => Ok(result),
            None if n == 0 => e::division_by_zero(&name, acc),
            None => e::numeric_overflow(&name, acc, n),
        })
        .map(Value::Integer)
}

#[inline]
fn bool_binop<T, U>(args: Args, unpack: U, compare: fn(&T, &T) -> bool) -> EvalResult
where
    U: Fn(&Value) -> Result<T, LispError>,
{
    ensure_len(&args, |n| n == 2, 2)?;

    let left = unpack(&args[0])?;
    let right = unpack(&args[1])?;
    Ok(Value::Bool(compare(&left, &right)))
}

fn floor_div(a: i128, b: i128) -> Option<i128> {
    let q = a.checked_div(b)?;
    if a.checked_rem(b)? != 0 && (a < 0) != (b < 0) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_mod(a: i128, b: i128) -> Option<i128> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}

#[inline]
pub fn ensure_len<F>(args: &Args, p: F, expected: usize) -> Result<(), LispError>
where
    F: Fn(usize) -> bool,
{
    if p(args.len()) {
        Ok(())
    } else {
        e::arg_count(expected, args)
    }
}

#[cfg(test)]
mod core_tests {
    use super::*;
    use im_rc::vector;

    fn int(n: i128) -> Value {
        Value::Integer(n)
    }

    fn string(s: &str) -> Value {
        Value::make_string(s)
    }

    #[test]
    fn table_has_every_primitive() {
        for name in &[
            "+", "-", "*", "/", "mod", "quotient", "remainder", "=", "<", ">", "!=", ">=", "<=",
            "and", "or", "string=?", "string<?", "string>?", "string<=?", "string>=?", "car",
            "cdr", "cons", "eq?", "eqv?", "equal?",
        ] {
            assert!(lookup(name).is_some(), "missing {}", name);
        }
        assert!(lookup("frobnicate").is_none());
        assert_eq!(names().count(), 28);
    }

    #[test]
    fn arithmetic_folds_left() {
        assert_eq!(add(vector![int(1), int(2), int(3)]), Ok(int(6)));
        assert_eq!(subtract(vector![int(10), int(3), int(2)]), Ok(int(5)));
        assert_eq!(multiply(vector![int(2), int(3), int(4)]), Ok(int(24)));
        assert_eq!(divide(vector![int(100), int(5), int(2)]), Ok(int(10)));
    }

    #[test]
    fn arithmetic_needs_two_args() {
        assert_eq!(
            add(vector![int(5)]),
            Err(LispError::WrongArgumentCount(2, vec![int(5)]))
        );
        assert_eq!(
            multiply(vector![]),
            Err(LispError::WrongArgumentCount(2, vec![]))
        );
    }

    #[test]
    fn division_rounding() {
        assert_eq!(divide(vector![int(-7), int(2)]), Ok(int(-4)));
        assert_eq!(quotient(vector![int(-7), int(2)]), Ok(int(-3)));
        assert_eq!(modulo(vector![int(-7), int(2)]), Ok(int(1)));
        assert_eq!(modulo(vector![int(7), int(-2)]), Ok(int(-1)));
        assert_eq!(remainder(vector![int(-7), int(2)]), Ok(int(-1)));
        assert_eq!(modulo(vector![int(6), int(3)]), Ok(int(0)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        for f in &[divide as BuiltinFunction, modulo, quotient, remainder] {
            match f(vector![int(1), int(0)]) {
                Err(LispError::Generic(msg)) => assert!(msg.starts_with("Division by zero")),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn argument_errors_come_before_arithmetic_faults() {
        assert_eq!(
            divide(vector![int(1), int(0), string("x")]),
            Err(LispError::TypeMismatch("number".into(), string("x")))
        );
        assert_eq!(
            add(vector![int(i128::MAX), int(1), Value::Bool(true)]),
            Err(LispError::TypeMismatch("number".into(), Value::Bool(true)))
        );
    }

    #[test]
    fn overflow_is_an_error() {
        match add(vector![int(i128::MAX), int(1)]) {
            Err(LispError::Generic(msg)) => assert!(msg.starts_with("Numeric overflow")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn numeric_unpacking() {
        assert_eq!(unpack_num(&string("42")), Ok(42));
        assert_eq!(unpack_num(&string(" 12abc")), Ok(12));
        assert_eq!(unpack_num(&string("-4")), Ok(-4));
        assert_eq!(unpack_num(&Value::make_list(vec![int(9)])), Ok(9));
        assert_eq!(
            unpack_num(&Value::make_list(vec![Value::make_list(vec![string("3")])])),
            Ok(3)
        );
        assert_eq!(
            unpack_num(&string("abc")),
            Err(LispError::TypeMismatch("number".into(), string("abc")))
        );
        assert_eq!(
            unpack_num(&Value::Bool(true)),
            Err(LispError::TypeMismatch("number".into(), Value::Bool(true)))
        );
        assert!(unpack_num(&Value::make_list(vec![int(1), int(2)])).is_err());
        assert!(unpack_num(&Value::Decimal(1.5)).is_err());
        assert_eq!(add(vector![string("2"), int(3)]), Ok(int(5)));
    }

    #[test]
    fn comparisons() {
        assert_eq!(less(vector![int(1), int(2)]), Ok(Value::Bool(true)));
        assert_eq!(greater(vector![int(1), int(2)]), Ok(Value::Bool(false)));
        assert_eq!(num_equal(vector![int(2), string("2")]), Ok(Value::Bool(true)));
        assert_eq!(not_equal(vector![int(2), int(3)]), Ok(Value::Bool(true)));
        assert_eq!(greater_equal(vector![int(3), int(3)]), Ok(Value::Bool(true)));
        assert_eq!(less_equal(vector![int(4), int(3)]), Ok(Value::Bool(false)));
        assert_eq!(
            less(vector![int(1), int(2), int(3)]),
            Err(LispError::WrongArgumentCount(2, vec![int(1), int(2), int(3)]))
        );
    }

    #[test]
    fn string_comparisons() {
        assert_eq!(string_equal(vector![string("a"), string("a")]), Ok(Value::Bool(true)));
        assert_eq!(string_less(vector![string("abc"), string("abd")]), Ok(Value::Bool(true)));
        assert_eq!(string_greater(vector![string("b"), string("a")]), Ok(Value::Bool(true)));
        assert_eq!(string_less_equal(vector![string("b"), string("a")]), Ok(Value::Bool(false)));
        assert_eq!(string_greater_equal(vector![string("a"), string("a")]), Ok(Value::Bool(true)));
        assert_eq!(string_equal(vector![int(12), string("12")]), Ok(Value::Bool(true)));
        assert_eq!(string_equal(vector![Value::Bool(true), string("#t")]), Ok(Value::Bool(true)));
        assert_eq!(
            string_equal(vector![Value::make_symbol("a"), string("a")]),
            Err(LispError::TypeMismatch("string".into(), Value::make_symbol("a")))
        );
    }

    #[test]
    fn boolean_ops() {
        let (t, f) = (Value::Bool(true), Value::Bool(false));
        assert_eq!(and(vector![t.clone(), f.clone()]), Ok(f.clone()));
        assert_eq!(or(vector![t.clone(), f.clone()]), Ok(t.clone()));
        assert_eq!(
            and(vector![t.clone(), int(1)]),
            Err(LispError::TypeMismatch("boolean".into(), int(1)))
        );
        assert_eq!(
            or(vector![t.clone()]),
            Err(LispError::WrongArgumentCount(2, vec![t]))
        );
    }

    #[test]
    fn list_ops() {
        let l = Value::make_list(vec![int(1), int(2), int(3)]);
        assert_eq!(car(vector![l.clone()]), Ok(int(1)));
        assert_eq!(cdr(vector![l.clone()]), Ok(Value::make_list(vec![int(2), int(3)])));
        assert_eq!(
            cdr(vector![Value::make_list(vec![int(1)])]),
            Ok(Value::make_list(vec![]))
        );
        assert_eq!(
            cons(vector![int(0), l]),
            Ok(Value::make_list(vec![int(0), int(1), int(2), int(3)]))
        );
        assert_eq!(cons(vector![int(1), int(2)]), Ok(Value::make_list(vec![int(1), int(2)])));
        assert_eq!(
            cons(vector![int(1), Value::make_list(vec![])]),
            Ok(Value::make_list(vec![int(1)]))
        );
        assert_eq!(list(vector![int(1), int(2)]), Ok(Value::make_list(vec![int(1), int(2)])));
    }

    #[test]
    fn list_op_errors() {
        let empty = Value::make_list(vec![]);
        assert_eq!(
            car(vector![empty.clone()]),
            Err(LispError::TypeMismatch("pair".into(), empty.clone()))
        );
        assert_eq!(
            cdr(vector![empty.clone()]),
            Err(LispError::TypeMismatch("pair".into(), empty.clone()))
        );
        assert_eq!(
            cdr(vector![int(3)]),
            Err(LispError::TypeMismatch("pair".into(), int(3)))
        );
        assert_eq!(
            car(vector![empty.clone(), empty.clone()]),
            Err(LispError::WrongArgumentCount(1, vec![empty.clone(), empty]))
        );
        assert_eq!(
            cons(vector![int(1)]),
            Err(LispError::WrongArgumentCount(2, vec![int(1)]))
        );
    }

    #[test]
    fn equality_primitives_check_arity() {
        assert_eq!(eqvp(vector![int(1), int(1)]), Ok(Value::Bool(true)));
        assert_eq!(equalp(vector![int(1), string("1")]), Ok(Value::Bool(true)));
        assert_eq!(
            eqvp(vector![int(1)]),
            Err(LispError::WrongArgumentCount(2, vec![int(1)]))
        );
        assert_eq!(
            equalp(vector![int(1), int(2), int(3)]),
            Err(LispError::WrongArgumentCount(2, vec![int(1), int(2), int(3)]))
        );
    }
}
