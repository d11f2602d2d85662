//! Multi-line rendering in the layout of PHP's `print_r`.
//!
//! ```text
//! User Object
//! (
//!     [name] => alice
//!     [roles:protected] => Array
//!         (
//!             [0] => admin
//!         )
//!
//!     [token:User:private] =>
//! )
//! ```

use std::fmt::Write;

use crate::model::{Array, Object, Value, Visibility};

const INDENT: usize = 4;

/// Renders `value` the way `print_r` does.
///
/// Scalars render bare (`nil` and `false` as the empty string, `true` as
/// `1`); containers end with a newline.
pub fn dump(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Nil | Value::Bool(false) => {}
        Value::Bool(true) => out.push('1'),
        Value::Long(v) => {
            let _ = write!(out, "{v}");
        }
        Value::Double(v) => write_double(out, *v),
        Value::Str(bytes) => out.push_str(&String::from_utf8_lossy(bytes)),
        Value::Array(array) => write_array(out, array, indent),
        Value::Object(object) => write_object(out, object, indent),
    }
}

fn write_double(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NAN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "INF" } else { "-INF" });
    } else {
        let _ = write!(out, "{v}");
    }
}

fn write_array(out: &mut String, array: &Array, indent: usize) {
    out.push_str("Array\n");
    write_entries(
        out,
        array
            .iter()
            .map(|(key, value)| (String::from_utf8_lossy(key).into_owned(), value)),
        indent,
    );
}

fn write_object(out: &mut String, object: &Object, indent: usize) {
    let class = String::from_utf8_lossy(object.class_name());
    let _ = writeln!(out, "{class} Object");
    write_entries(
        out,
        object.members().map(|member| {
            let label = match member.visibility() {
                Visibility::Public => member.name().to_string(),
                Visibility::Protected => format!("{}:protected", member.name()),
                Visibility::Private => format!("{}:{}:private", member.name(), class),
                Visibility::InheritedPrivate => format!(
                    "{}:{}:private",
                    member.name(),
                    member.declaring_class().unwrap_or_default()
                ),
            };
            (label, member.value())
        }),
        indent,
    );
}

fn write_entries<'a>(
    out: &mut String,
    entries: impl Iterator<Item = (String, &'a Value)>,
    indent: usize,
) {
    pad(out, indent);
    out.push_str("(\n");
    for (label, value) in entries {
        pad(out, indent + INDENT);
        let _ = write!(out, "[{label}] => ");
        write_value(out, value, indent + 2 * INDENT);
        out.push('\n');
    }
    pad(out, indent);
    out.push_str(")\n");
}

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}
