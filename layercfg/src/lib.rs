//! Layered configuration for annotated structs
//!
//! `layercfg` fills the fields of a struct from environment variables,
//! command-line flags and configuration files (JSON, YAML, TOML, dotenv),
//! guided by per-field annotations that name the key in each source. Declared
//! defaults are stamped in before any source is applied.
//!
//! # Features
//!
//! - **Declarative**: field tables generated by `#[derive(Record)]`
//! - **Nested records**: fields are addressed by dot-joined paths
//! - **Layered**: read several sources into the same record, later ones win
//! - **Best effort**: a value that does not parse leaves the field as it was
//!
//! # Example
//!
//! ```rust
//! use layercfg::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct Http {
//!     #[conf(env = "HTTP_HOST", flag = "http-host", default = "127.0.0.1")]
//!     pub host: String,
//!
//!     #[conf(env = "HTTP_PORT", flag = "http-port", s_flag = "p", default = 8080)]
//!     pub port: u16,
//! }
//!
//! #[derive(Debug, Default, Record)]
//! struct Config {
//!     #[conf(env = "MODE", flag = "mode", description = "Application mode")]
//!     pub mode: String,
//!
//!     pub http: Http,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("HTTP_PORT", "9090");
//! let mut config = Config::default();
//! layercfg::read_env(&mut config)?;
//! assert_eq!(config.http.host, "127.0.0.1");
//! assert_eq!(config.http.port, 9090);
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! Every `key = literal` pair in `#[conf(...)]` becomes an annotation;
//! underscores in keys stand for dashes.
//!
//! | Attribute | Used by |
//! |---|---|
//! | `env = "NAME"` | [`read_env`], `.env` files, [`from_map`] |
//! | `flag = "name"` | [`read_flags`] (`--name`) |
//! | `s_flag = "n"` | [`read_flags`] (`-n`) |
//! | `description = "..."` | [`read_flags`] help text |
//! | `default = value` | every entry point, before the source |
//! | `json`, `yaml`, `toml` | [`read_file`] with the matching extension |
//! | `skip` | leaves the field out |
//!
//! # Overlay rules
//!
//! Values from the environment, flags and dotenv files are strings, applied
//! per field type:
//!
//! - strings are written unless empty;
//! - integers and floats are parsed and written unless the result is zero
//!   (including when parsing fails), so an explicit `0` cannot override a
//!   default;
//! - booleans are always written, `false` when absent or unparsable.
//!
//! JSON, YAML and TOML documents write every value they contain, zero
//! included, and leave fields they do not mention alone.
//!
//! # Reading several sources
//!
//! Every read function stamps defaults before applying its source. To layer
//! sources onto one record, open a [`Layers`] session, which stamps defaults
//! once and then applies each source in turn:
//!
//! ```rust,no_run
//! # use layercfg::{Loader, Record};
//! # #[derive(Default, Record)]
//! # struct Config { #[conf(env = "MODE", json = "mode")] mode: String }
//! # fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! let mut loader = Loader::new();
//! let mut layers = loader.layer(&mut config);
//! layers.read_file("config.json")?;
//! layers.read_env()?;
//! layers.read_flags()?;
//! # Ok(())
//! # }
//! ```
//!
//! Population is meant to run once at start-up on one thread; a loader is
//! not shared between threads.

// Lets the derive macro's `::layercfg::` paths resolve inside this crate.
extern crate self as layercfg;

mod defaults;
mod env;
mod error;
mod file;
mod flag;
mod loader;
mod record;
mod scan;
mod target;
mod write;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

pub use defaults::DEFAULT;
pub use env::ENV;
pub use error::ConfError;
pub use file::Format;
pub use flag::{DESCRIPTION, FLAG, SHORT_FLAG};
pub use layercfg_derive::Record;
pub use loader::{Layers, Loader};
pub use record::{Field, FieldValue, Node, Record, Slot};
pub use scan::{scan, Annotation, AnnotationIndex};
pub use target::{validate, Shape, Target};
pub use write::{parse_bool, write, write_with, Policy};

// Re-export for error handling in callers
#[doc(hidden)]
pub use anyhow;

/// Read environment variables into `target`.
///
/// Defaults are stamped first, then each leaf with an `env` annotation is
/// overlaid with the variable of that name.
///
/// # Errors
///
/// Fails only when `target` is not a `&mut` to a record.
pub fn read_env<T: Target>(target: T) -> anyhow::Result<()> {
    Loader::new().read_env(target)
}

/// Like [`read_env`], but panics on failure.
pub fn must_read_env<T: Target>(target: T) {
    if let Err(err) = read_env(target) {
        panic!("{err:#}");
    }
}

/// Read command-line flags into `target`.
///
/// # Errors
///
/// - `target` is not a `&mut` to a record
/// - the process arguments cannot be parsed (unknown option, missing value,
///   `--help`)
pub fn read_flags<T: Target>(target: T) -> anyhow::Result<()> {
    Loader::new().read_flags(target)
}

/// Like [`read_flags`], but panics on failure.
pub fn must_read_flags<T: Target>(target: T) {
    if let Err(err) = read_flags(target) {
        panic!("{err:#}");
    }
}

/// Read the configuration file at `path` into `target`.
///
/// # Errors
///
/// - `target` is not a `&mut` to a record
/// - the file cannot be read
/// - the content is malformed or a value does not fit its field
pub fn read_file<P: AsRef<Path>, T: Target>(path: P, target: T) -> anyhow::Result<()> {
    Loader::new().read_file(path, target)
}

/// Like [`read_file`], but panics on failure.
pub fn must_read_file<P: AsRef<Path>, T: Target>(path: P, target: T) {
    if let Err(err) = read_file(path, target) {
        panic!("{err:#}");
    }
}

/// Stamp the declared defaults into `target`.
///
/// # Errors
///
/// Fails only when `target` is not a `&mut` to a record.
pub fn apply_defaults<T: Target>(target: T) -> anyhow::Result<()> {
    Loader::new().apply_defaults(target)
}

/// Set every `env`-annotated leaf of `target` from `map`, keyed by the
/// annotation value.
///
/// Unlike [`read_env`] nothing is guarded: keys missing from `map` clear
/// strings, and unparsable numbers or booleans become zero or `false`.
/// Leaves without an `env` annotation are untouched and no defaults are
/// applied.
///
/// # Errors
///
/// Fails only when `target` is not a `&mut` to a record.
pub fn from_map<T: Target>(map: &HashMap<String, String>, mut target: T) -> anyhow::Result<()> {
    let record = validate(&mut target).context("failed to validate target")?;
    env::replace_keyed(record, ENV, |key| map.get(key).cloned());
    Ok(())
}
