//! Basic usage example

use layercfg::Record;

#[derive(Debug, Default, Record)]
struct Config {
    // Loaded from DATABASE_URL
    #[conf(env = "DATABASE_URL")]
    pub database_url: String,

    // With default value
    #[conf(env = "SERVER_ADDR", default = "127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type
    #[conf(env = "MAX_CONNECTIONS", default = 10)]
    pub max_connections: u32,

    // Boolean type: written on every read, false when unset
    #[conf(env = "DEBUG_MODE")]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");

    // Load configuration
    let mut config = Config::default();
    layercfg::read_env(&mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}
