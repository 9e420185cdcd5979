//! Deterministic schema fingerprinting.

use blake3::Hasher;

use crate::{FieldKind, Schema};

/// Computes a deterministic fingerprint of the parts of a schema that shape
/// encoded strings: field names and order, variants, and choice option order.
///
/// Defaults are not included since they never appear in encoded output.
#[must_use]
pub fn schema_fingerprint(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_len(&mut hasher, schema.len());

    for (name, def) in schema.fields() {
        write_str(&mut hasher, name);
        write_kind(&mut hasher, &def.kind);
    }

    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn write_kind(hasher: &mut Hasher, kind: &FieldKind) {
    match kind {
        FieldKind::String => write_u8(hasher, 0),
        FieldKind::Int => write_u8(hasher, 1),
        FieldKind::Boolean => write_u8(hasher, 2),
        FieldKind::List => write_u8(hasher, 3),
        FieldKind::Choice(options) => {
            write_u8(hasher, 4);
            write_len(hasher, options.len());
            for option in options.names() {
                write_str(hasher, option);
            }
        }
        FieldKind::Timestamp => write_u8(hasher, 5),
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_len(hasher: &mut Hasher, value: usize) {
    hasher.update(&(value as u64).to_le_bytes());
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}
