mod analyze;
mod health;
mod upload;

use std::sync::Arc;

use crate::{
    color::ColorNamer,
    config::WwwConfig,
    error::{ Error, ErrorKind, Result },
    extract::ColorExtractor,
};

use actix_web::{ middleware, web, App, HttpServer };

/// Shared by every worker, never mutated after startup.
pub struct Data {
    pub namer: Arc<ColorNamer>,
    pub extractor: Arc<dyn ColorExtractor>,
    pub api_key: String,
    pub max_upload_size: usize,
}

pub async fn start(config: &WwwConfig, data: Data) -> Result<()> {
    let data = web::Data::new(data);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
            .default_service(web::to(not_found))
    })
    .workers(config.workers)
    .bind((config.bind_host.as_str(), config.bind_port))?
    .run()
    .await?;

    Ok(())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::handler)
       .service(analyze::handler);
}

pub async fn not_found() -> Result<&'static str> {
    Err(Error::new(ErrorKind::NotFound))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{
        Arc,
        atomic::{ AtomicUsize, Ordering },
    };

    use super::*;
    use crate::{ color::Rgb, extract::MedianCut };

    use actix_web::{ dev::ServiceResponse, test, App };

    /// Delegates to [`MedianCut`] and counts how often it was asked.
    #[derive(Default)]
    pub struct CountingExtractor {
        inner: MedianCut,
        pub calls: AtomicUsize,
    }

    impl CountingExtractor {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ColorExtractor for CountingExtractor {
        fn dominant(&self, image: &[u8]) -> Result<Rgb> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.dominant(image)
        }

        fn palette(&self, image: &[u8], count: usize) -> Result<Vec<Rgb>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.palette(image, count)
        }
    }

    pub const API_KEY: &str = "correct horse";

    pub fn data(extractor: Arc<CountingExtractor>, max_upload_size: usize) -> web::Data<Data> {
        web::Data::new(Data {
            namer: Arc::new(ColorNamer::new().unwrap()),
            extractor,
            api_key: API_KEY.to_string(),
            max_upload_size,
        })
    }

    pub async fn call(data: web::Data<Data>, req: test::TestRequest) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(routes)
                .default_service(web::to(not_found))
        ).await;

        test::call_service(&app, req.to_request()).await
    }

    pub enum Part<'a> {
        Text(&'a str, &'a str),
        RawText(&'a str, &'a [u8]),
        File(&'a str, &'a str, &'a [u8]),
    }

    const BOUNDARY: &str = "------------------------hueprint-test";

    /// Encodes `parts` as a multipart/form-data body, returning the content
    /// type to send with it.
    pub fn multipart(parts: &[Part]) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
                    body.extend_from_slice(value.as_bytes());
                },
                Part::RawText(name, value) => {
                    body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
                    body.extend_from_slice(value);
                },
                Part::File(name, file_name, bytes) => {
                    body.extend_from_slice(format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, file_name,
                    ).as_bytes());
                    body.extend_from_slice(bytes);
                },
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        (format!("multipart/form-data; boundary={}", BOUNDARY), body)
    }

    pub fn analyze_request(parts: &[Part]) -> test::TestRequest {
        let (content_type, body) = multipart(parts);
        test::TestRequest::post()
            .uri("/analyze")
            .insert_header((actix_web::http::header::CONTENT_TYPE, content_type))
            .set_payload(body)
    }
}
