use std::{
    path::Path,
    time::Duration,
};

use crate::{
    Error, ErrorKind, Result,
    config::Config,
};

use indicatif::{ ProgressBar, ProgressStyle };
use reqwest::blocking::{ Client, multipart::Form };

#[derive(serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Posts an image to the running service and prints what comes back.
pub fn run(config: &Config, image_path: Option<String>, api_key: Option<String>) -> Result<()> {
    let (image_path, api_key) = match (image_path, api_key) {
        (Some(image_path), Some(api_key)) => (image_path, api_key),
        _ => {
            return Err(Error::custom("Missing arguments. Usage: hueprint client <image path> <api key>"));
        },
    };

    let path = Path::new(&image_path);
    if !path.is_file() {
        let full_path = std::env::current_dir()?.join(path);
        return Err(Error::with_message(ErrorKind::IO, format!("could not find image file '{}'", full_path.display())));
    }
    let file_name = path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| image_path.clone());

    let url = config.www.analyze_url();
    println!("Sending request to {}...", url);
    println!("   - image: {}", file_name);
    println!("   - api key: {}", mask_key(&api_key));

    let form = Form::new()
                    .file("image", path)?
                    .text("key", api_key);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner()
                    .template("{spinner} {msg}")
                    .map_err(|err| Error::from(ErrorKind::Other, err))?);
    pb.set_message("waiting for the server");
    pb.enable_steady_tick(Duration::from_millis(100));
    let res = Client::new().post(&url).multipart(form).send();
    pb.finish_and_clear();

    let res = match res {
        Ok(res) => res,
        Err(err) if err.is_connect() => {
            return Err(Error::with_message(ErrorKind::Reqwest, format!("no response, is the server running at {}?", config.www.base_url)));
        },
        Err(err) => return Err(err.into()),
    };

    let status = res.status();
    let text = res.text()?;
    if !status.is_success() {
        println!("\nRequest failed!");
        println!("Server status: {}", status);
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(res) => res.error,
            Err(_err) => text,
        };
        println!("Error message: {}", message);
        return Err(Error::with_message(ErrorKind::Reqwest, format!("server answered with status {}", status.as_u16())));
    }

    let body: serde_json::Value = serde_json::from_str(&text)?;
    println!("\nRequest succeeded!");
    println!("Server status: {}", status);
    println!("Response:");
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}

/// Hides all but the last three characters.
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    let hidden = len.saturating_sub(3);

    key.chars()
       .enumerate()
       .map(|(i, c)| if i < hidden { '*' } else { c })
       .collect()
}
