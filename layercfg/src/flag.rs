//! Command-line flag registration and parsing.
//!
//! Every leaf carrying a `flag` and/or `s-flag` annotation becomes one
//! string-valued option; both spellings land in the same destination. The
//! registry lives in a [`Loader`](crate::Loader), so registrations never leak
//! between unrelated population calls.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::record::{Node, Record};

/// Long option name annotation.
pub const FLAG: &str = "flag";
/// Single-character alias annotation.
pub const SHORT_FLAG: &str = "s-flag";
/// Help text annotation.
pub const DESCRIPTION: &str = "description";

/// Id of the catch-all for positional arguments that belong to someone else.
const POSITIONAL: &str = "__layercfg_positional";

#[derive(Debug, Clone, PartialEq, Eq)]
struct FlagSpec {
    path: String,
    long: Option<&'static str>,
    short: Option<char>,
    help: Option<&'static str>,
}

/// Options registered so far, deduplicated by field path and by name.
#[derive(Debug, Default)]
pub(crate) struct FlagRegistry {
    specs: Vec<FlagSpec>,
    paths: HashSet<String>,
    longs: HashSet<&'static str>,
    shorts: HashSet<char>,
}

impl FlagRegistry {
    /// Register one option per annotated leaf of `record` not seen before.
    pub(crate) fn register(&mut self, record: &dyn Record) {
        self.register_prefixed(record, "");
    }

    fn register_prefixed(&mut self, record: &dyn Record, prefix: &str) {
        record.visit(&mut |field, node| {
            let path = format!("{prefix}{}", field.name());
            if let Node::Record(nested) = node {
                self.register_prefixed(nested, &format!("{path}."));
                return;
            }

            let mut long = field.annotation(FLAG);
            let mut short = field.annotation(SHORT_FLAG).and_then(|s| s.chars().next());
            if long.is_none() && short.is_none() {
                return;
            }
            if self.paths.contains(&path) {
                return;
            }
            if long.is_some_and(|name| self.longs.contains(name)) {
                tracing::warn!(path = %path, flag = ?long, "flag already registered, skipping");
                return;
            }
            if short.is_some_and(|c| self.shorts.contains(&c)) {
                tracing::warn!(path = %path, short = ?short, "short flag already registered, dropping alias");
                short = None;
                if long.is_none() {
                    return;
                }
            }

            long = long.filter(|name| self.longs.insert(*name));
            short = short.filter(|c| self.shorts.insert(*c));
            self.paths.insert(path.clone());
            tracing::debug!(path = %path, long = ?long, short = ?short, "registered flag");
            self.specs.push(FlagSpec {
                path,
                long,
                short,
                help: field.annotation(DESCRIPTION),
            });
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.specs.len()
    }

    /// Build the clap command describing every registered option.
    pub(crate) fn command(&self, program: &str) -> Command {
        let mut command = Command::new(program.to_string())
            .no_binary_name(true)
            .args_override_self(true)
            .disable_version_flag(true)
            // `-h` belongs to the record if a field claims it
            .disable_help_flag(self.shorts.contains(&'h') || self.longs.contains("help"))
            .arg(
                Arg::new(POSITIONAL)
                    .action(ArgAction::Append)
                    .num_args(1..)
                    .hide(true),
            );

        for spec in &self.specs {
            let mut arg = Arg::new(spec.path.clone())
                .action(ArgAction::Set)
                .num_args(1)
                .value_name("VALUE")
                .allow_hyphen_values(true);
            if let Some(long) = spec.long {
                arg = arg.long(long);
            }
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            if let Some(help) = spec.help {
                arg = arg.help(help);
            }
            command = command.arg(arg);
        }

        command
    }

    /// Parse `args` (program name excluded) into field path → raw value.
    ///
    /// Options absent from `args` are absent from the map. When an option is
    /// given more than once, under either spelling, the last occurrence wins.
    pub(crate) fn parse<I>(&self, program: &str, args: I) -> Result<HashMap<String, String>, clap::Error>
    where
        I: IntoIterator<Item = OsString>,
    {
        let matches = self.command(program).try_get_matches_from(args)?;

        let mut values = HashMap::new();
        for spec in &self.specs {
            if let Some(value) = matches.get_one::<String>(&spec.path) {
                values.insert(spec.path.clone(), value.clone());
            }
        }
        Ok(values)
    }
}
