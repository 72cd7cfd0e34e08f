use axum::{
    extract::{Multipart, Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// A decoded text field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoField {
    pub name: String,
    pub value: String,
}

/// A decoded file part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoFile {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// What the server decoded from a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub fields: Vec<EchoField>,
    pub files: Vec<EchoFile>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo_query))
        .route("/form", post(echo_form))
        .route("/upload", post(echo_upload))
        .route("/cookies/set", get(set_cookies))
        .route("/status/{code}", get(status))
        .route("/binary", get(binary))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn echo_from(headers: &HeaderMap, pairs: Vec<(String, String)>) -> Echo {
    Echo {
        content_type: header_string(headers, header::CONTENT_TYPE),
        cookie: header_string(headers, header::COOKIE),
        fields: pairs
            .into_iter()
            .map(|(name, value)| EchoField { name, value })
            .collect(),
        files: Vec::new(),
    }
}

async fn echo_query(headers: HeaderMap, Query(pairs): Query<Vec<(String, String)>>) -> Json<Echo> {
    Json(echo_from(&headers, pairs))
}

async fn echo_form(headers: HeaderMap, Form(pairs): Form<Vec<(String, String)>>) -> Json<Echo> {
    Json(echo_from(&headers, pairs))
}

async fn echo_upload(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Echo>, (StatusCode, String)> {
    let mut echo = echo_from(&headers, Vec::new());
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;

        if filename.is_some() {
            tracing::debug!(%name, len = data.len(), "decoded file part");
            echo.files.push(EchoFile {
                name,
                filename,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = String::from_utf8(data.to_vec())
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            tracing::debug!(%name, "decoded text part");
            echo.fields.push(EchoField { name, value });
        }
    }
    Ok(Json(echo))
}

/// Answer with one `Set-Cookie` header per query pair.
async fn set_cookies(Query(pairs): Query<Vec<(String, String)>>) -> impl IntoResponse {
    let cookies: Vec<_> = pairs
        .into_iter()
        .map(|(name, value)| (header::SET_COOKIE, format!("{name}={value}; Path=/")))
        .collect();
    (AppendHeaders(cookies), "cookies set")
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

/// A body that is not valid UTF-8.
async fn binary() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        vec![0x66u8, 0xff, 0xfe, 0x00],
    )
}
