//! Interpolation: `${NAME}` and `$NAME` in values and defaults

use envtag::Unmarshal;

#[derive(Debug, Default, Unmarshal)]
struct Config {
    #[env("HOST,default=localhost")]
    host: String,
    #[env("PORT,default=8080")]
    port: u16,
    // HOST and PORT come from the environment, or from the defaults above
    #[env("BASE_URL,default=http://${HOST}:${PORT}/api,expand")]
    base_url: String,
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    println!("Base URL: {}", config.base_url);

    envtag::getters::set("HOST", "api.internal")?;
    envtag::getters::set("BASE_URL", "https://${HOST}")?;

    let config = Config::from_env()?;
    println!("Base URL: {}", config.base_url);
    println!("Port: {}", config.port);
    println!("Host: {}", config.host);

    Ok(())
}
