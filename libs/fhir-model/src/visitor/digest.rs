use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{walk, Position, Value, Visitable, Visitor};

/// Hashes the traversal of a node: every node's type and position, every
/// leaf value and every list length, with markers where nodes and lists
/// close. Two graphs that compare equal produce the same digest.
#[derive(Debug, Default)]
struct Digest {
    hasher: DefaultHasher,
}

impl Digest {
    fn position(&mut self, at: Position<'_>) {
        at.name.hash(&mut self.hasher);
        at.index.hash(&mut self.hasher);
    }
}

impl Visitor for Digest {
    fn visit_start(&mut self, at: Position<'_>, node: &dyn Visitable) {
        self.hasher.write_u8(b'{');
        self.position(at);
        node.type_name().hash(&mut self.hasher);
    }

    fn visit_end(&mut self, _at: Position<'_>, _node: &dyn Visitable) {
        self.hasher.write_u8(b'}');
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        self.hasher.write_u8(b'[');
        name.hash(&mut self.hasher);
        self.hasher.write_usize(len);
    }

    fn visit_list_end(&mut self, _name: &str, _len: usize) {
        self.hasher.write_u8(b']');
    }

    fn visit_value(&mut self, at: Position<'_>, value: Value<'_>) {
        self.position(at);
        match value {
            Value::Boolean(b) => {
                self.hasher.write_u8(0);
                b.hash(&mut self.hasher);
            }
            Value::Integer(i) => {
                self.hasher.write_u8(1);
                i.hash(&mut self.hasher);
            }
            Value::Decimal(d) => {
                self.hasher.write_u8(2);
                d.hash(&mut self.hasher);
                self.hasher.write_u32(d.scale());
            }
            Value::String(s) => {
                self.hasher.write_u8(3);
                s.hash(&mut self.hasher);
            }
        }
    }
}

/// Deterministic structural hash of `root` and everything it owns.
pub fn structural_hash(root: &dyn Visitable) -> u64 {
    let mut digest = Digest::default();
    walk(root, &mut digest);
    digest.hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coding, Code, Decimal, Quantity, Uri};

    fn coding(code: &str) -> Coding {
        Coding::builder()
            .system(Uri::new("http://loinc.org").unwrap())
            .code(Code::new(code).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_equal_graphs_hash_equal() {
        assert_eq!(structural_hash(&coding("1")), structural_hash(&coding("1")));
        assert_ne!(structural_hash(&coding("1")), structural_hash(&coding("2")));
    }

    #[test]
    fn test_position_matters() {
        // same value under different field names
        let as_code = Coding::builder().code(Code::new("x").unwrap()).build().unwrap();
        let as_display = Coding::builder()
            .display(crate::types::FhirString::new("x").unwrap())
            .build()
            .unwrap();
        assert_ne!(structural_hash(&as_code), structural_hash(&as_display));
    }

    #[test]
    fn test_decimal_scale_is_hashed() {
        let quantity = |text: &str| {
            Quantity::builder()
                .value(Decimal::from(text.parse::<rust_decimal::Decimal>().unwrap()))
                .build()
                .unwrap()
        };
        assert_ne!(structural_hash(&quantity("1.0")), structural_hash(&quantity("1.00")));
        assert_eq!(structural_hash(&quantity("1.00")), structural_hash(&quantity("1.00")));
    }
}
