//! Writing raw source strings into record fields.
//!
//! Conversion never fails the walk: a value that does not parse is treated as
//! the zero value of the field type, and what happens to zero values depends
//! on the [`Policy`].

use std::str::FromStr;

use crate::record::{Record, Slot};

/// How a converted source value is applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Write strings only when non-empty and numbers only when non-zero;
    /// booleans are always written. A source value of `0` cannot override a
    /// previous non-zero value because it is indistinguishable from "unset".
    Overlay,
    /// Write whatever the conversion produced, zero and empty included.
    Replace,
}

/// Walk `record` and overlay the string `lookup` returns for each leaf path.
///
/// An empty string means "no value": strings and numbers keep their current
/// value, booleans become `false`.
pub fn write<F>(record: &mut dyn Record, mut lookup: F)
where
    F: FnMut(&str) -> String,
{
    write_with(record, Policy::Overlay, |path| Some(lookup(path)));
}

/// Walk `record` applying `policy` to the values `lookup` returns.
///
/// `None` leaves the field untouched under [`Policy::Replace`] and counts as
/// an empty string under [`Policy::Overlay`].
pub fn write_with<F>(record: &mut dyn Record, policy: Policy, mut lookup: F)
where
    F: FnMut(&str) -> Option<String>,
{
    write_into(record, policy, "", &mut lookup);
}

fn write_into(
    record: &mut dyn Record,
    policy: Policy,
    prefix: &str,
    lookup: &mut dyn FnMut(&str) -> Option<String>,
) {
    record.visit_mut(&mut |field, slot| {
        let path = format!("{prefix}{}", field.name());
        if let Slot::Record(nested) = slot {
            write_into(nested, policy, &format!("{path}."), lookup);
            return;
        }

        let raw = match (lookup(&path), policy) {
            (Some(raw), _) => raw,
            (None, Policy::Overlay) => String::new(),
            (None, Policy::Replace) => return,
        };
        store(slot, &raw, policy);
    });
}

fn store(slot: Slot<'_>, raw: &str, policy: Policy) {
    match slot {
        Slot::String(dst) => {
            if !raw.is_empty() || policy == Policy::Replace {
                *dst = raw.to_string();
            }
        }
        Slot::I8(dst) => store_number(dst, raw, policy),
        Slot::I16(dst) => store_number(dst, raw, policy),
        Slot::I32(dst) => store_number(dst, raw, policy),
        Slot::I64(dst) => store_number(dst, raw, policy),
        Slot::Isize(dst) => store_number(dst, raw, policy),
        Slot::U8(dst) => store_number(dst, raw, policy),
        Slot::U16(dst) => store_number(dst, raw, policy),
        Slot::U32(dst) => store_number(dst, raw, policy),
        Slot::U64(dst) => store_number(dst, raw, policy),
        Slot::Usize(dst) => store_number(dst, raw, policy),
        Slot::F32(dst) => store_number(dst, raw, policy),
        Slot::F64(dst) => store_number(dst, raw, policy),
        Slot::Bool(dst) => *dst = parse_bool(raw).unwrap_or(false),
        Slot::Record(_) => {}
    }
}

/// Parse as base 10 (or as a float); failures and out-of-range values read as zero.
fn store_number<T>(dst: &mut T, raw: &str, policy: Policy)
where
    T: FromStr + Default + PartialEq,
{
    let parsed = raw.parse::<T>().unwrap_or_default();
    if policy == Policy::Replace || parsed != T::default() {
        *dst = parsed;
    }
}

/// Parse a boolean the way command-line tools usually accept them.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
