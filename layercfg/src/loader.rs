//! Per-call-site population state.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::defaults::stamp_defaults;
use crate::env::{process_var, write_keyed, ENV};
use crate::error::ConfError;
use crate::file::{apply_document, parse_document, parse_dotenv, Format};
use crate::flag::FlagRegistry;
use crate::record::Record;
use crate::target::{validate, Target};
use crate::write::write;

/// Populates records from the environment, command-line flags and files.
///
/// A loader carries the sources (the process environment and arguments, or
/// injected replacements) and the command-line options registered so far,
/// which are shared by every later flag read.
///
/// Each `read_*` call stamps the declared defaults before applying its
/// source. To stack several sources onto one record, open a [`Layers`]
/// session with [`Loader::layer`]: it stamps defaults once when it is
/// created and holds the record until it is dropped.
///
/// ```rust
/// use layercfg::{Loader, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Config {
///     #[conf(env = "APP_PORT", flag = "port", default = 8080)]
///     port: u16,
///     #[conf(env = "APP_NAME", default = "app")]
///     name: String,
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let mut config = Config::default();
/// let mut loader = Loader::new()
///     .with_env([("APP_NAME", "demo")])
///     .with_args(["--port", "7070"]);
///
/// let mut layers = loader.layer(&mut config);
/// layers.read_env()?;
/// layers.read_flags()?;
/// drop(layers);
///
/// assert_eq!(config.port, 7070);
/// assert_eq!(config.name, "demo");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Loader {
    env: Option<HashMap<String, String>>,
    args: Option<Vec<OsString>>,
    program: Option<String>,
    flags: FlagRegistry,
}

impl Loader {
    /// Loader reading the process environment and arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `vars` instead of the process environment.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Use `args` instead of the process arguments (without the program name).
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Program name shown in flag errors and help.
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    /// Stamp the declared defaults into `record` and start layering sources
    /// onto it.
    pub fn layer<'a, R: Record>(&'a mut self, record: &'a mut R) -> Layers<'a> {
        stamp_defaults(record);
        Layers {
            loader: self,
            record,
        }
    }

    /// Validate `target` and stamp its declared defaults.
    pub fn apply_defaults<T: Target>(&mut self, mut target: T) -> anyhow::Result<()> {
        let record = validate(&mut target).context("failed to validate target")?;
        stamp_defaults(record);
        Ok(())
    }

    /// Stamp defaults, then overlay environment variables named by the `env`
    /// annotations.
    pub fn read_env<T: Target>(&mut self, mut target: T) -> anyhow::Result<()> {
        let record = validate(&mut target).context("failed to validate target")?;
        stamp_defaults(record);
        self.env_into(record);
        Ok(())
    }

    /// Stamp defaults, then overlay command-line options named by the `flag`
    /// / `s-flag` annotations.
    ///
    /// Every annotated leaf becomes a string option taking one value
    /// (`--name=value`, `--name value`, `-n=value`, `-n value`). Annotated
    /// booleans that are not given on the command line become `false`.
    pub fn read_flags<T: Target>(&mut self, mut target: T) -> anyhow::Result<()> {
        let record = validate(&mut target).context("failed to validate target")?;
        stamp_defaults(record);
        self.flags_into(record)
    }

    /// Stamp defaults, then overlay the file at `path`, decoded according to
    /// its extension.
    ///
    /// `.json`, `.yaml`/`.yml` and `.toml` documents write every value they
    /// contain, matched by the `json`, `yaml` and `toml` annotations. `.env`
    /// files are read like the environment. Any other extension is accepted
    /// and ignored once the file has been read, whatever its content.
    pub fn read_file<P, T>(&mut self, path: P, mut target: T) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
        T: Target,
    {
        let record = validate(&mut target).context("failed to validate target")?;
        stamp_defaults(record);
        file_into(path.as_ref(), record)
    }

    fn env_into(&self, record: &mut dyn Record) {
        match &self.env {
            Some(vars) => write_keyed(record, ENV, |key| vars.get(key).cloned()),
            None => write_keyed(record, ENV, process_var),
        }
    }

    fn flags_into(&mut self, record: &mut dyn Record) -> anyhow::Result<()> {
        self.flags.register(record);
        let args = match &self.args {
            Some(args) => args.clone(),
            None => std::env::args_os().skip(1).collect(),
        };
        let values = self
            .flags
            .parse(&self.program_name(), args)
            .map_err(ConfError::from)
            .context("failed to parse command-line flags")?;
        tracing::debug!(flags = self.flags.len(), given = values.len(), "parsed command-line flags");

        write(record, |path| values.get(path).cloned().unwrap_or_default());
        Ok(())
    }

    fn program_name(&self) -> String {
        if let Some(name) = &self.program {
            return name.clone();
        }
        std::env::args_os()
            .next()
            .as_deref()
            .map(Path::new)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string())
    }
}

/// Sources layered onto one record, later reads overriding earlier ones.
///
/// Created by [`Loader::layer`], which has already stamped the defaults;
/// reads through a session never stamp them again.
pub struct Layers<'a> {
    loader: &'a mut Loader,
    record: &'a mut dyn Record,
}

impl Layers<'_> {
    /// Overlay environment variables, as [`Loader::read_env`] without the
    /// defaults.
    pub fn read_env(&mut self) -> anyhow::Result<()> {
        self.loader.env_into(self.record);
        Ok(())
    }

    /// Overlay command-line options, as [`Loader::read_flags`] without the
    /// defaults.
    pub fn read_flags(&mut self) -> anyhow::Result<()> {
        self.loader.flags_into(self.record)
    }

    /// Overlay a file, as [`Loader::read_file`] without the defaults.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        file_into(path.as_ref(), self.record)
    }
}

impl std::fmt::Debug for Layers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layers")
            .field("loader", &self.loader)
            .field("fields", &self.record.fields().len())
            .finish()
    }
}

fn file_into(path: &Path, record: &mut dyn Record) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)
        .map_err(|source| ConfError::Open {
            path: PathBuf::from(path),
            source,
        })
        .context("failed to open file")?;

    let Some(format) = Format::from_path(path) else {
        tracing::warn!(path = %path.display(), "unsupported file extension, nothing read");
        return Ok(());
    };
    tracing::debug!(path = %path.display(), format = format.name(), "reading file");

    let content = String::from_utf8(bytes)
        .map_err(|e| ConfError::decode(format.name(), e))
        .with_context(|| format!("failed to decode {} file", format.name()))?;

    match format {
        Format::Dotenv => {
            let values = parse_dotenv(&content).context("failed to decode dotenv file")?;
            write_keyed(record, ENV, |key| values.get(key).cloned());
        }
        Format::Json | Format::Yaml | Format::Toml => {
            let document = parse_document(format, &content)
                .with_context(|| format!("failed to decode {} file", format.name()))?;
            apply_document(record, &document, format)
                .with_context(|| format!("failed to write {} values", format.name()))?;
        }
    }
    Ok(())
}
