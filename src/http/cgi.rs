//! CGI execution handler (`--cgi` mode).
//!
//! # Responsibilities
//! - Execute files under `/cgi-bin/` as child processes
//! - Populate the standard CGI/1.1 environment
//! - Parse the child's stdout as a CGI header block plus body
//!
//! # Design Decisions
//! - Only `/cgi-bin/` is script territory; everything else stays static
//! - The first path segment after `/cgi-bin/` names the script, the rest
//!   becomes `PATH_INFO`
//! - A `Status:` header from the script sets the response code, default 200
//! - Script failures (spawn error, nonzero exit, malformed output) answer
//!   502 for that request only

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderName, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ServerConfig;
use crate::http::relay::UpstreamResponse;

/// Directory prefix under which requests execute scripts.
pub const CGI_PREFIX: &str = "/cgi-bin/";

/// Whether a request path is CGI territory.
pub fn is_cgi_path(path: &str) -> bool {
    path.starts_with(CGI_PREFIX)
}

/// Execute the script a `/cgi-bin/` request names and relay its output.
pub async fn execute(config: &ServerConfig, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let rest = &path[CGI_PREFIX.len()..];
    let (script_name, path_info) = match rest.split_once('/') {
        Some((name, info)) => (name.to_string(), format!("/{}", info)),
        None => (rest.to_string(), String::new()),
    };

    if script_name.is_empty() || script_name.contains("..") {
        return (StatusCode::NOT_FOUND, "No such CGI script\n").into_response();
    }

    let script_path = config.static_dir.join("cgi-bin").join(&script_name);
    if !script_path.is_file() {
        return (StatusCode::NOT_FOUND, "No such CGI script\n").into_response();
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let executable = script_path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false);
        if !executable {
            return (StatusCode::FORBIDDEN, "CGI script is not executable\n").into_response();
        }
    }

    let method = request.method().clone();
    let query = request.uri().query().unwrap_or("").to_string();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body_bytes = match to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(script = %script_name, error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body\n").into_response();
        }
    };

    let mut command = Command::new(&script_path);
    command
        .env("GATEWAY_INTERFACE", "CGI/1.1")
        .env("SERVER_PROTOCOL", "HTTP/1.1")
        .env("SERVER_NAME", config.listener.bind.as_deref().unwrap_or("localhost"))
        .env("SERVER_PORT", config.listener.port.to_string())
        .env("REQUEST_METHOD", method.as_str())
        .env("SCRIPT_NAME", format!("{}{}", CGI_PREFIX, script_name))
        .env("PATH_INFO", &path_info)
        .env("QUERY_STRING", &query)
        .env("CONTENT_LENGTH", body_bytes.len().to_string())
        .current_dir(&config.static_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(ct) = &content_type {
        command.env("CONTENT_TYPE", ct);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(script = %script_name, error = %e, "Failed to spawn CGI script");
            return (StatusCode::BAD_GATEWAY, "CGI script failed to start\n").into_response();
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(&body_bytes).await {
            tracing::warn!(script = %script_name, error = %e, "Failed to write CGI stdin");
        }
    }

    let output = match child.wait_with_output().await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(script = %script_name, error = %e, "CGI script failed");
            return (StatusCode::BAD_GATEWAY, "CGI script failed\n").into_response();
        }
    };

    if !output.status.success() {
        tracing::warn!(
            script = %script_name,
            exit = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "CGI script exited with failure"
        );
        return (StatusCode::BAD_GATEWAY, "CGI script failed\n").into_response();
    }

    tracing::info!(
        script = %script_name,
        method = %method,
        path_info = %path_info,
        "CGI"
    );

    match parse_cgi_output(&output.stdout) {
        Some(response) => response.into_response(),
        None => {
            tracing::warn!(script = %script_name, "Malformed CGI output");
            (StatusCode::BAD_GATEWAY, "Malformed CGI output\n").into_response()
        }
    }
}

/// Parse a CGI stdout stream: header block, blank line, body.
///
/// Accepts both CRLF and bare LF line endings. A `Status:` header sets the
/// response code and is not forwarded; all other headers pass through.
fn parse_cgi_output(output: &[u8]) -> Option<UpstreamResponse> {
    let (head, body) = split_head_body(output)?;
    let head = std::str::from_utf8(head).ok()?;

    let mut status = StatusCode::OK;
    let mut headers = Vec::new();

    for line in head.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':')?;
        let value = value.trim();
        if name.eq_ignore_ascii_case("status") {
            let code = value.split_whitespace().next()?;
            status = code.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok())?;
        } else {
            let name = HeaderName::try_from(name.trim()).ok()?;
            let value = HeaderValue::try_from(value).ok()?;
            headers.push((name, value));
        }
    }

    Some(UpstreamResponse {
        status,
        headers,
        body: Bytes::copy_from_slice(body),
    })
}

/// Split CGI output at the first blank line (CRLF or LF variant).
fn split_head_body(output: &[u8]) -> Option<(&[u8], &[u8])> {
    let crlf = find(output, b"\r\n\r\n").map(|i| (i, i + 4));
    let lf = find(output, b"\n\n").map(|i| (i, i + 2));
    let (head_end, body_start) = match (crlf, lf) {
        (Some(a), Some(b)) if a.0 <= b.0 => a,
        (_, Some(b)) => b,
        (Some(a), None) => a,
        (None, None) => return None,
    };
    Some((&output[..head_end], &output[body_start..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
