//! Default values declared with `#[conf(default = ...)]`.

use crate::record::Record;
use crate::scan::scan;
use crate::write::write;

/// Annotation holding a field's default value.
pub const DEFAULT: &str = "default";

/// Stamp every declared default into `record` using the overlay policy.
///
/// Fields without a default keep their value, except booleans which become
/// `false`; a default of `0` or `""` cannot clear an existing value.
pub fn stamp_defaults(record: &mut dyn Record) {
    let index = scan(record, &[DEFAULT]);
    tracing::debug!(fields = index.len(), "applying default values");
    write(record, |path| index.value(path).to_string());
}
