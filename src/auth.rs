//! # auth — API Key Middleware
//!
//! ป้องกันทุก Endpoint ด้วย `X-API-Key` header
//!
//! ## Mode
//! - `API_KEY` ไม่ได้ตั้ง (หรือ empty) → **Allow All** (Dev Mode)
//! - `API_KEY` ตั้งค่า → ทุก Request ต้องแนบ `X-API-Key: <key>`
//!
//! Health check ไม่ต้อง auth — probe ภายนอกต้องเช็คได้เสมอ
//!
//! ## Usage
//! ```bash
//! API_KEY=super-secret cargo run
//! curl -H "X-API-Key: super-secret" http://localhost:3000/api/market/assets
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

/// Path ที่เปิดผ่านตลอดไม่ว่า API_KEY จะตั้งหรือไม่
const EXEMPT_PATHS: &[&str] = &["/api/health", "/health"];

/// Axum middleware — ตรวจสอบ X-API-Key header
pub async fn require_api_key(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    if EXEMPT_PATHS.contains(&path) {
        return next.run(request).await;
    }

    // Dev Mode: ไม่ตั้ง API_KEY → ผ่านหมด
    let expected = std::env::var("API_KEY").unwrap_or_default();
    if expected.is_empty() {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == expected {
        next.run(request).await
    } else {
        warn!(path, "❌ Request rejected — invalid or missing X-API-Key");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "ok":    false,
                "error": "Unauthorized: invalid or missing X-API-Key header",
            })),
        )
            .into_response()
    }
}
