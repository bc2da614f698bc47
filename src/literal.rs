//! Literal rendering for the target expression language.
//!
//! Renderings follow the target's own `repr` conventions so that an emitted
//! literal reads back as the same value:
//!
//! - **Integers** render in decimal, negative ones parenthesized
//! - **Floats** use the shortest round-trip digits, positional for decimal
//!   exponents in `[-4, 16)` and scientific (`1e+16`, `1e-05`) otherwise
//! - **Strings** are single-quoted unless only double quotes avoid escaping;
//!   non-printable characters become `\x`, `\u` or `\U` escapes
//!
//! # Examples
//!
//! ```
//! use funcadl_lower::literal::{render_float, render_int, render_str};
//!
//! assert_eq!(render_int(-3), "(-3)");
//! assert_eq!(render_float(0.5), "0.5");
//! assert_eq!(render_float(1e16), "1e+16");
//! assert_eq!(render_str("it's"), "\"it's\"");
//! ```

pub fn render_int(value: i64) -> String {
    if value < 0 {
        format!("({value})")
    } else {
        value.to_string()
    }
}

pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return "float('nan')".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "(-float('inf'))".to_string()
        };
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.25e-7"
    let formatted = format!("{:e}", value.abs());
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exponent) {
        positional(&digits, exponent)
    } else {
        scientific(&digits, exponent)
    };

    if value.is_sign_negative() {
        format!("(-{body})")
    } else {
        body
    }
}

fn positional(digits: &str, exponent: i32) -> String {
    let point = exponent + 1;
    let len = digits.len() as i32;
    if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point >= len {
        format!("{}{}.0", digits, "0".repeat((point - len) as usize))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    }
}

fn scientific(digits: &str, exponent: i32) -> String {
    let (first, rest) = digits.split_at(1);
    let sign = if exponent < 0 { '-' } else { '+' };
    if rest.is_empty() {
        format!("{first}e{sign}{:02}", exponent.abs())
    } else {
        format!("{first}.{rest}e{sign}{:02}", exponent.abs())
    }
}

pub fn render_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let escaped: String = value
        .chars()
        .flat_map(|c| match c {
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c == quote => vec!['\\', c],
            c if !is_printable(c) => {
                let code = c as u32;
                let escape = if code <= 0xff {
                    format!("\\x{code:02x}")
                } else if code <= 0xffff {
                    format!("\\u{code:04x}")
                } else {
                    format!("\\U{code:08x}")
                };
                escape.chars().collect()
            }
            c => vec![c],
        })
        .collect();

    format!("{quote}{escaped}{quote}")
}

/// Whether `repr` leaves `c` as is: everything but control, format,
/// private-use and separator characters (the plain space excepted).
///
/// Unassigned code points are not tracked and stay unescaped.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || c.is_whitespace()
        || is_format(c)
        || is_private_use(c)
        || is_noncharacter(c))
}

fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{890}'..='\u{891}'
            | '\u{8e2}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{110bd}'
            | '\u{110cd}'
            | '\u{13430}'..='\u{1343f}'
            | '\u{1bca0}'..='\u{1bca3}'
            | '\u{1d173}'..='\u{1d17a}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{e000}'..='\u{f8ff}' | '\u{f0000}'..='\u{ffffd}' | '\u{100000}'..='\u{10fffd}')
}

fn is_noncharacter(c: char) -> bool {
    let code = c as u32;
    (0xfdd0..=0xfdef).contains(&code) || code & 0xfffe == 0xfffe
}

pub fn render_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

pub const NONE: &str = "None";

/// Renders a list literal of strings, e.g. `['a.root', 'b.root']`.
pub fn render_str_list<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|v| render_str(v.as_ref())).collect();
    format!("[{}]", items.join(", "))
}
