//! Custom field types: implement `Scalar` and register with `impl_field!`

use envtag::{Scalar, Unmarshal};
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum RedisMode {
    #[default]
    Standalone,
    Cluster,
}

impl Scalar for RedisMode {
    type Err = String;

    fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "standalone" => Ok(Self::Standalone),
            "cluster" => Ok(Self::Cluster),
            other => Err(format!("unknown redis mode '{other}'")),
        }
    }
}

/// Whole seconds, e.g. `TIMEOUT=30`
#[derive(Debug, Default)]
struct Seconds(Duration);

impl Scalar for Seconds {
    type Err = std::num::ParseIntError;

    fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
        value.parse().map(|s| Seconds(Duration::from_secs(s)))
    }
}

envtag::impl_field!(RedisMode, Seconds);

#[derive(Debug, Default, Unmarshal)]
struct Config {
    #[env("REDIS_MODE,default=standalone")]
    mode: RedisMode,
    #[env("TIMEOUT,default=30")]
    timeout: Seconds,
    // Types without a `Field` impl must be skipped
    #[env(skip)]
    started: Option<std::time::Instant>,
}

fn main() -> anyhow::Result<()> {
    envtag::getters::set("REDIS_MODE", "cluster")?;

    let mut config = Config::from_env()?;
    config.started = Some(std::time::Instant::now());

    println!("Mode: {:?}", config.mode);
    println!("Timeout: {:?}", config.timeout.0);

    envtag::getters::set("REDIS_MODE", "sentinel")?;
    if let Err(e) = Config::from_env() {
        println!("Error: {e}");
    }

    Ok(())
}
