pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod tools;
pub mod www;

use std::sync::Arc;

use crate::{
    color::ColorNamer,
    config::{ Config, LoggingConfig },
    error::{ Error, ErrorKind, Result },
    extract::MedianCut,
};

fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message,
            ))
        })
        .level(config.level)
        .chain(std::io::stdout());

    if let Some(file) = &config.file {
        dispatch = dispatch.chain(fern::log_file(file).map_err(|err| Error::from(ErrorKind::LogFile, err))?);
    }

    dispatch.apply().map_err(|err| Error::from(ErrorKind::Logging, err))
}

fn serve(config: Config) -> Result<()> {
    setup_logging(&config.logging)?;
    let api_key = config.www.require_api_key()?.to_string();

    let namer = Arc::new(ColorNamer::new()?);
    log::info!("Loaded {} reference colors.", namer.reference_colors().len());

    let data = www::Data {
        namer,
        extractor: Arc::new(MedianCut::default()),
        api_key,
        max_upload_size: config.www.max_upload_size,
    };

    log::info!("Server is running on {}", config.www.base_url);
    actix_web::rt::System::new().block_on(www::start(&config.www, data))?;
    log::info!("Shutting down.");

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::load()?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("serve") => serve(config),
        Some("client") => tools::analyze_client::run(&config, args.next(), args.next()),
        Some("print-config") => tools::print_config::run(&config),
        Some(other) => Err(Error::with_message(ErrorKind::Other, format!("unknown command `{}`, expected serve, client or print-config", other))),
    }
}
