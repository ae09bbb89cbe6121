use im_rc::Vector;

use crate::{
    core::{unpack_bool, unpack_num, unpack_str},
    value::Value,
};

/// Same variant and same contents. Lists compare element by element; any
/// other pairing is simply unequal.
pub fn eqv(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => lists_match(xs, ys, eqv),
        _ => false,
    }
}

/// Like `eqv`, but two atoms are also equal when both coerce to the same
/// number, string, or boolean.
pub fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(xs), Value::List(ys)) => lists_match(xs, ys, equal),
        _ => {
            unpacks_equal(a, b, unpack_num)
                || unpacks_equal(a, b, unpack_str)
                || unpacks_equal(a, b, unpack_bool)
                || eqv(a, b)
        }
    }
}

fn lists_match(xs: &Vector<Value>, ys: &Vector<Value>, same: fn(&Value, &Value) -> bool) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| same(x, y))
}

// An unpack failure on either side counts as a mismatch.
fn unpacks_equal<T, E, U>(a: &Value, b: &Value, unpack: U) -> bool
where
    T: PartialEq,
    U: Fn(&Value) -> Result<T, E>,
{
    match (unpack(a), unpack(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
