//! Basic usage: alternate keys, defaults, lists and a nested struct

use envtag::Unmarshal;

#[derive(Debug, Default, Unmarshal)]
struct DatabaseConfig {
    #[env("DATABASE_HOST|DB_HOST,default=localhost")]
    host: String,
    #[env("DATABASE_PORT|DB_PORT,default=3306")]
    port: u16,
    #[env("DATABASE_USERNAME|DB_USER,default=root")]
    username: String,
    #[env("DATABASE_PASSWORD|DB_PASS")]
    password: String,
    #[env("DATABASE_NAME|DB_NAME")]
    name: String,
}

#[derive(Debug, Default, Unmarshal)]
struct Config {
    #[env("DEBUG")]
    debug: bool,
    #[env("PORT,default=8080")]
    port: String,
    #[env("REDIS_HOST|REDIS_HOSTS,default=localhost:6379")]
    redis_hosts: Vec<String>,
    // No tag: fields are read without a prefix
    database: DatabaseConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    envtag::getters::set("DEBUG", "true")?;
    envtag::getters::set("PORT", "9090")?;
    envtag::getters::set("REDIS_HOST", "host1,host2")?;
    envtag::getters::set("DB_HOST", "dbhost")?;
    envtag::getters::set("DATABASE_PORT", "5432")?;
    envtag::getters::set("DATABASE_USERNAME", "admin")?;
    envtag::getters::set("DATABASE_PASSWORD", "secret")?;
    envtag::getters::set("DATABASE_NAME", "mydb")?;

    let config = Config::from_env()?;

    println!("Configuration:");
    println!("  Debug: {}", config.debug);
    println!("  Port: {}", config.port);
    println!("  Redis hosts: {:?}", config.redis_hosts);
    println!(
        "  Database: {}@{}:{}/{}",
        config.database.username, config.database.host, config.database.port, config.database.name
    );
    println!("  Password set: {}", !config.database.password.is_empty());

    Ok(())
}
