use super::{ Data, upload::Upload };

use crate::{
    color::{ ColorDescription, Rgb },
    error::Result,
};

use actix_multipart::Multipart;
use actix_web::{ post, web, HttpResponse };
use futures_util::future::try_join;
use serde::Serialize;

pub const PALETTE_SIZE: usize = 6;

#[derive(Debug, Serialize)]
pub struct Analysis {
    pub dominant: ColorDescription,
    pub palette: Vec<ColorDescription>,
}

#[post("/analyze")]
pub async fn handler(payload: Multipart, data: web::Data<Data>) -> Result<HttpResponse> {
    let upload = Upload::read(payload, data.max_upload_size).await?;
    let image = upload.into_image(&data.api_key)?;

    let analysis = analyze(&data, image).await.map_err(|err| {
        log::error!("Error during color analysis: {}", err);
        err
    })?;

    Ok(HttpResponse::Ok().json(analysis))
}

/// Runs dominant color and palette extraction side by side on the blocking
/// pool, then names every color.
pub async fn analyze(data: &Data, image: web::Bytes) -> Result<Analysis> {
    let dominant = {
        let extractor = data.extractor.clone();
        let image = image.clone();
        async move { web::block(move || extractor.dominant(&image)).await? }
    };
    let palette = {
        let extractor = data.extractor.clone();
        async move { web::block(move || extractor.palette(&image, PALETTE_SIZE)).await? }
    };

    let (dominant, palette): (Rgb, Vec<Rgb>) = try_join(dominant, palette).await?;

    Ok(Analysis {
        dominant: data.namer.describe(dominant),
        palette: palette.into_iter()
                        .take(PALETTE_SIZE)
                        .map(|rgb| data.namer.describe(rgb))
                        .collect(),
    })
}
