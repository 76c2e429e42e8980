use crate::{
    Result,
    config::Config,
};

/// Prints the effective configuration. The api key is never serialized.
pub fn run(config: &Config) -> Result<()> {
    println!("{}", config.to_json(true)?);
    Ok(())
}
