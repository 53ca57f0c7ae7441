use jl_core::{check_arity, eval, Context, JlError, Value};

use crate::{eval_int, register_special};

/// Longest-valid-prefix integer parse: leading whitespace, optional sign,
/// then digits in `base`; no valid digits parse as 0.
fn parse_int(s: &str, base: u32) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut value: i64 = 0;
    for c in digits.chars() {
        match c.to_digit(base) {
            Some(d) => value = value.wrapping_mul(base as i64).wrapping_add(d as i64),
            None => break,
        }
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Render `n` in `base`, always emitting at least one digit. Base 10
/// negatives get a leading minus; other bases render the two's-complement
/// bit pattern. Digits above 9 are uppercase letters.
fn render_int(n: i64, base: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let negative = base == 10 && n < 0;
    let mut magnitude: u128 = if negative {
        u128::from(n.unsigned_abs())
    } else if base == 10 {
        n as u128
    } else {
        u128::from(n as u64)
    };
    let mut out = String::new();
    loop {
        out.push(DIGITS[(magnitude % u128::from(base)) as usize] as char);
        magnitude /= u128::from(base);
        if magnitude == 0 {
            break;
        }
    }
    if negative {
        out.push('-');
    }
    out.chars().rev().collect()
}

fn check_base(op: &str, base: i64) -> Result<u32, JlError> {
    if (2..=36).contains(&base) {
        Ok(base as u32)
    } else {
        Err(JlError::eval(format!("{op}: unsupported base {base}")))
    }
}

pub fn register(ctx: &Context) {
    register_special(ctx, "substr", |ctx, form| {
        check_arity!(form, "substr", 1..=3);
        let sv = eval(ctx, &form[1])?;
        let Some(s) = sv.as_str() else {
            return Err(JlError::type_error("substr", "string", sv.type_name()));
        };
        let start = match form.get(2) {
            Some(expr) => eval_int(ctx, "substr", expr)?,
            None => 0,
        };
        let char_count = s.chars().count();
        if start < 0 || start as usize >= char_count {
            return Ok(Value::Nil);
        }
        let start = start as usize;
        let len = match form.get(3) {
            Some(expr) => eval_int(ctx, "substr", expr)?,
            None => (char_count - start) as i64,
        };
        if len <= 0 {
            return Ok(Value::Nil);
        }
        let taken: String = s.chars().skip(start).take(len as usize).collect();
        Ok(Value::string(taken))
    });

    register_special(ctx, "concat", |ctx, form| {
        let mut out = String::new();
        for expr in &form[1..] {
            let v = eval(ctx, expr)?;
            match v.as_str() {
                Some(s) => out.push_str(s),
                None => return Err(JlError::type_error("concat", "string", v.type_name())),
            }
        }
        Ok(Value::string(out))
    });

    register_special(ctx, "int", |ctx, form| {
        check_arity!(form, "int", 2);
        let sv = eval(ctx, &form[1])?;
        let Some(s) = sv.as_str() else {
            return Err(JlError::type_error("int", "string", sv.type_name()));
        };
        let base = check_base("int", eval_int(ctx, "int", &form[2])?)?;
        Ok(Value::Number(parse_int(s, base) as f64))
    });

    register_special(ctx, "str", |ctx, form| {
        check_arity!(form, "str", 2);
        let n = eval_int(ctx, "str", &form[1])?;
        let base = check_base("str", eval_int(ctx, "str", &form[2])?)?;
        Ok(Value::string(render_int(n, base)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42", 10), 42);
        assert_eq!(parse_int("  -17", 10), -17);
        assert_eq!(parse_int("+8", 10), 8);
        assert_eq!(parse_int("ff", 16), 255);
        assert_eq!(parse_int("FF", 16), 255);
        assert_eq!(parse_int("101", 2), 5);
        // strtol semantics: stop at the first invalid character.
        assert_eq!(parse_int("12abc", 10), 12);
        assert_eq!(parse_int("abc", 10), 0);
        assert_eq!(parse_int("", 10), 0);
    }

    #[test]
    fn test_render_int() {
        assert_eq!(render_int(0, 10), "0");
        assert_eq!(render_int(1, 10), "1");
        assert_eq!(render_int(120, 10), "120");
        assert_eq!(render_int(-42, 10), "-42");
        assert_eq!(render_int(255, 16), "FF");
        assert_eq!(render_int(5, 2), "101");
        assert_eq!(render_int(35, 36), "Z");
    }

    #[test]
    fn test_render_int_negative_non_decimal_is_twos_complement() {
        assert_eq!(render_int(-1, 16), "FFFFFFFFFFFFFFFF");
        assert_eq!(render_int(-1, 2), "1".repeat(64));
    }

    #[test]
    fn test_render_int_min() {
        assert_eq!(render_int(i64::MIN, 10), "-9223372036854775808");
        assert_eq!(render_int(i64::MIN, 16), "8000000000000000");
    }
}
