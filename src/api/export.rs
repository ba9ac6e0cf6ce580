// src/api/export.rs
use crate::export::businesses_to_csv;
use chrono::Utc;
use rocket::get;
use rocket::http::{ContentType, Header, Status};
use rocket::request::Request;
use rocket::response::{self, status, Responder, Response};
use rocket::serde::json::Json;
use serde_json::{json, Map, Value};
use tracing::error;

/// CSV download with an attachment filename.
pub struct CsvAttachment {
    pub filename: String,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for CsvAttachment {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.body.respond_to(request)?)
            .header(ContentType::CSV)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            ))
            .ok()
    }
}

#[get("/download-csv?<data>")]
pub async fn download_csv(
    data: Option<String>,
) -> Result<CsvAttachment, status::Custom<Json<Value>>> {
    let data = match data {
        Some(data) if !data.is_empty() => data,
        _ => {
            return Err(status::Custom(
                Status::BadRequest,
                Json(json!({ "error": "No data provided" })),
            ))
        }
    };

    let records: Vec<Map<String, Value>> = serde_json::from_str(&data).map_err(|e| {
        status::Custom(
            Status::BadRequest,
            Json(json!({ "error": format!("Invalid data payload: {}", e) })),
        )
    })?;

    let body = businesses_to_csv(&records).map_err(|e| {
        error!("CSV export failed: {}", e);
        status::Custom(
            Status::InternalServerError,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    let filename = format!("business_data_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    Ok(CsvAttachment { filename, body })
}
