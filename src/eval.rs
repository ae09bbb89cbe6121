use im_rc::Vector;
use log::{debug, trace};

use crate::{
    core,
    error as e,
    value::{Args, EvalResult, Value},
};

/// Reduces an expression to a value. There are no bindings, so the result
/// depends on `ast` alone.
pub fn eval(ast: Value) -> EvalResult {
    match ast {
        Value::String(_)
        | Value::Integer(_)
        | Value::Bool(_)
        | Value::Decimal(_)
        | Value::Char(_) => Ok(ast),
        Value::List(form) => eval_list(form),
        other => e::bad_special_form(other),
    }
}

fn eval_list(form: Vector<Value>) -> EvalResult {
    match form.front() {
        Some(Value::Symbol(s)) if s.as_ref() == "quote" && form.len() == 2 => {
            trace!("eval::eval_list(), quote: {}", form[1]);
            Ok(form[1].clone())
        }

        Some(Value::Symbol(s)) if s.as_ref() == "if" && form.len() == 4 => {
            let mut form_iter = form.iter().skip(1);
            let pred = form_iter.next().unwrap().clone();
            let conseq = form_iter.next().unwrap().clone();
            let alt = form_iter.next().unwrap().clone();

            trace!("eval::eval_list(), if: {}", pred);
            match eval(pred)? {
                Value::Bool(false) => eval(alt),
                _ => eval(conseq),
            }
        }

        Some(Value::Symbol(name)) => {
            let args = form
                .iter()
                .skip(1)
                .map(|arg| eval(arg.clone()))
                .collect::<Result<Args, _>>()?;
            apply(name, args)
        }

        _ => e::bad_special_form(Value::List(form.clone())),
    }
}

pub fn apply(name: &str, args: Args) -> EvalResult {
    debug!("eval::apply(), function: {}, {} args", name, args.len());

    match core::lookup(name) {
        Some(func) => func(args),
        None => e::unknown_function(name),
    }
}
