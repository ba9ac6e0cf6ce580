// src/server/routes.rs

pub mod health {
    use rocket::{get, serde::json::Json};
    use serde_json::{json, Value};

    #[get("/health")]
    pub async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "service": "lead-finder-api"
        }))
    }

    #[get("/")]
    pub async fn index() -> Json<Value> {
        Json(json!({
            "name": "Lead Finder API",
            "version": "0.1.0",
            "description": "Location + keyword business search with optional email and screenshot enrichment",
            "endpoints": {
                "health": "/health",
                "search": "/search",
                "download_csv": "/download-csv"
            }
        }))
    }
}
