//! Simple decoder to inspect serialized files.
//!
//! Prints type statistics and a `print_r`-style dump of the decoded value.

use std::fs;

use phpobject::{dump, unserialize, Value, ValueType, Visibility};

#[derive(Default)]
struct Stats {
    counts: [usize; 7],
    members: [usize; 4],
    max_depth: usize,
}

impl Stats {
    fn visit(&mut self, value: &Value, depth: usize) {
        let slot = match value.value_type() {
            ValueType::Nil => 0,
            ValueType::Bool => 1,
            ValueType::Long => 2,
            ValueType::Double => 3,
            ValueType::Str => 4,
            ValueType::Array => 5,
            ValueType::Object => 6,
        };
        self.counts[slot] += 1;
        self.max_depth = self.max_depth.max(depth);

        match value {
            Value::Array(array) => {
                for child in array.values() {
                    self.visit(child, depth + 1);
                }
            }
            Value::Object(object) => {
                for member in object.members() {
                    let slot = match member.visibility() {
                        Visibility::Public => 0,
                        Visibility::Protected => 1,
                        Visibility::Private => 2,
                        Visibility::InheritedPrivate => 3,
                    };
                    self.members[slot] += 1;
                    self.visit(member.value(), depth + 1);
                }
            }
            _ => {}
        }
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "../../data/cities.ser".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let value = match unserialize(&data) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Failed to decode ({}): {}", err.kind().name(), err);
            std::process::exit(1);
        }
    };

    let mut stats = Stats::default();
    stats.visit(&value, 0);

    println!("\n=== Values ===");
    for (slot, value_type) in [
        ValueType::Nil,
        ValueType::Bool,
        ValueType::Long,
        ValueType::Double,
        ValueType::Str,
        ValueType::Array,
        ValueType::Object,
    ]
    .into_iter()
    .enumerate()
    {
        println!("  {}: {}", value_type, stats.counts[slot]);
    }
    println!("  max depth: {}", stats.max_depth);

    println!("\n=== Object Members ===");
    for (slot, visibility) in [
        Visibility::Public,
        Visibility::Protected,
        Visibility::Private,
        Visibility::InheritedPrivate,
    ]
    .into_iter()
    .enumerate()
    {
        println!("  {}: {}", visibility.name(), stats.members[slot]);
    }

    // Show the first lines of the dump
    println!("\n=== Dump (first 40 lines) ===");
    let rendered = dump(&value);
    for line in rendered.lines().take(40) {
        println!("{}", line);
    }
    let total = rendered.lines().count();
    if total > 40 {
        println!("... and {} more lines", total - 40);
    }
}
