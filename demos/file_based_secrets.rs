//! File-based secrets: the variable holds a path, the field gets the content

use envtag::Unmarshal;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Default, Unmarshal)]
struct Config {
    // API_KEY=/run/secrets/api_key
    #[env("API_KEY,file,required")]
    api_key: String,

    #[env("DATABASE_PASSWORD,file")]
    database_password: String,

    // Regular environment variable
    #[env("DATABASE_HOST,default=localhost")]
    database_host: String,
}

fn main() -> anyhow::Result<()> {
    let mut api_key_file = NamedTempFile::new()?;
    writeln!(api_key_file, "super_secret_api_key_12345")?;

    let mut db_password_file = NamedTempFile::new()?;
    writeln!(db_password_file, "db_password_67890")?;

    std::env::set_var("API_KEY", api_key_file.path());
    std::env::set_var("DATABASE_PASSWORD", db_password_file.path());

    let config = Config::from_env()?;

    println!("Configuration loaded from files:");
    println!("  API Key: {} bytes", config.api_key.len());
    println!("  Database Password: {} bytes", config.database_password.len());
    println!("  Database Host: {}", config.database_host);

    // A path that cannot be read is a hard error
    std::env::set_var("API_KEY", "/run/secrets/does-not-exist");
    match Config::from_env() {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Error: {e}"),
    }

    Ok(())
}
