//! Layering a file, the environment and command-line flags
//!
//! ```sh
//! HTTP_PORT=9090 cargo run --example layered -- --mode=prod -w 8
//! RUST_LOG=layercfg=debug cargo run --example layered
//! ```

use layercfg::{Loader, Record};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Record)]
struct Http {
    #[conf(env = "HTTP_HOST", flag = "http-host", default = "127.0.0.1", json = "host")]
    pub host: String,

    #[conf(env = "HTTP_PORT", flag = "http-port", default = 8080, json = "port")]
    pub port: u16,
}

#[derive(Debug, Default, Record)]
struct Config {
    #[conf(
        env = "MODE",
        flag = "mode",
        default = "dev",
        json = "mode",
        description = "Application mode"
    )]
    pub mode: String,

    #[conf(
        env = "WORKERS",
        flag = "workers",
        s_flag = "w",
        default = 4,
        json = "workers",
        description = "Number of worker threads"
    )]
    pub workers: usize,

    #[conf(json = "http")]
    pub http: Http,

    // Never touched by any source
    #[conf(skip)]
    pub started: bool,
}

const SETTINGS: &str = r#"{
    "mode": "staging",
    "http": { "host": "0.0.0.0" }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = std::env::temp_dir().join("layercfg-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("settings.json");
    std::fs::write(&path, SETTINGS)?;

    // Defaults are stamped once when the session opens
    let mut config = Config::default();
    let mut loader = Loader::new().with_program_name("layered");
    let mut layers = loader.layer(&mut config);
    layers.read_file(&path)?;
    layers.read_env()?;
    layers.read_flags()?;
    drop(layers);

    println!("{config:#?}");
    Ok(())
}
