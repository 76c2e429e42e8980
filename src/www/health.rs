use actix_web::{ get, HttpResponse };
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[get("/health")]
pub async fn handler() -> HttpResponse {
    HttpResponse::Ok().json(Health { status: "ok" })
}
