//! Nested structs: tags on struct fields become key prefixes

use envtag::Unmarshal;

#[derive(Debug, Default, Unmarshal)]
struct Pool {
    #[env("MIN,default=1")]
    min: u32,
    #[env("MAX,default=10")]
    max: u32,
}

#[derive(Debug, Default, Unmarshal)]
struct Database {
    #[env("URL,required")]
    url: String,
    // Read from MYAPP_DATABASE_POOL_MIN / MYAPP_DATABASE_POOL_MAX
    #[env("POOL")]
    pool: Pool,
}

#[derive(Debug, Default, Unmarshal)]
struct Settings {
    #[env("DATABASE")]
    database: Database,
    #[env("LOG_LEVEL,default=info")]
    log_level: String,
}

#[derive(Debug, Default, Unmarshal)]
struct Config {
    #[env("MYAPP")]
    settings: Settings,
}

fn main() -> anyhow::Result<()> {
    envtag::getters::set("MYAPP_DATABASE_URL", "postgres://localhost/db")?;
    envtag::getters::set("MYAPP_DATABASE_POOL_MAX", "32")?;

    println!("Variables read by Config:");
    for var in envtag::variables::<Config>() {
        let required = if var.required { " (required)" } else { "" };
        println!("  {} = {:?}{}", var.keys.join("|"), var.fallback, required);
    }

    let config = Config::from_env()?;
    println!("{config:#?}");

    Ok(())
}
