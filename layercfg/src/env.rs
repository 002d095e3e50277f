//! Environment-style sources: the process environment, dotenv files and
//! plain maps, all keyed by the `env` annotation.

use crate::record::Record;
use crate::scan::scan;
use crate::write::{write, write_with, Policy};

/// Environment variable name annotation.
pub const ENV: &str = "env";

/// Overlay values looked up by each leaf's `annotation` value.
///
/// Leaves without the annotation, and keys `source` does not know, read as
/// empty strings and get the usual overlay treatment.
pub(crate) fn write_keyed<F>(record: &mut dyn Record, annotation: &str, mut source: F)
where
    F: FnMut(&str) -> Option<String>,
{
    let index = scan(record, &[annotation]);
    tracing::debug!(annotation, fields = index.len(), "writing keyed values");
    write(record, |path| {
        index
            .get(path)
            .and_then(|a| source(&a.value))
            .unwrap_or_default()
    });
}

/// Replace every leaf carrying `annotation` with the value `source` has for
/// its key (empty when unknown); other leaves are untouched.
pub(crate) fn replace_keyed<F>(record: &mut dyn Record, annotation: &str, mut source: F)
where
    F: FnMut(&str) -> Option<String>,
{
    let index = scan(record, &[annotation]);
    write_with(record, Policy::Replace, |path| {
        index
            .get(path)
            .map(|a| source(&a.value).unwrap_or_default())
    });
}

/// Read one variable from the process environment; unset and non-UTF-8
/// values are both treated as absent.
pub(crate) fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use std::collections::HashMap;

    #[derive(Debug, Default, PartialEq, Record)]
    struct Http {
        #[conf(env = "HTTP_HOST")]
        host: String,
        #[conf(env = "HTTP_PORT")]
        port: u16,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Config {
        #[conf(env = "MODE")]
        mode: String,
        #[conf(env = "DEBUG")]
        debug: bool,
        untagged: String,
        http: Http,
    }

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_write_keyed_by_annotation() {
        let vars = table(&[("MODE", "prod"), ("HTTP_PORT", "8080"), ("DEBUG", "true")]);
        let mut config = Config {
            untagged: "kept".to_string(),
            ..Default::default()
        };
        write_keyed(&mut config, ENV, |key| vars.get(key).cloned());

        assert_eq!(config.mode, "prod");
        assert!(config.debug);
        assert_eq!(config.untagged, "kept");
        assert_eq!(config.http.host, "");
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_replace_keyed_clears_missing_keys() {
        let vars = table(&[("HTTP_HOST", "localhost")]);
        let mut config = Config {
            mode: "dev".to_string(),
            untagged: "kept".to_string(),
            http: Http {
                host: String::new(),
                port: 80,
            },
            ..Default::default()
        };
        replace_keyed(&mut config, ENV, |key| vars.get(key).cloned());

        assert_eq!(config.mode, "");
        assert_eq!(config.untagged, "kept");
        assert_eq!(config.http.host, "localhost");
        assert_eq!(config.http.port, 0);
    }
}
