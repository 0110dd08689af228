//! Minimal HTTP front end, built on tokio sockets directly.
//!
//! Routes:
//! - `GET /`              question page
//! - `GET /api/health`    liveness
//! - `GET /api/examples`  sidebar questions
//! - `POST /api/ask`      `{"query": "..."}` -> [`Reply`](crate::shell::Reply)

use crate::dataset::Tables;
use crate::shell::{self, EXAMPLE_QUESTIONS};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

const MAX_REQUEST_BYTES: usize = 64 * 1024;
const READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct AskRequest {
    query: String,
}

/// Accept connections forever, one task per connection.
pub async fn serve(listener: TcpListener, tables: Arc<Tables>) -> std::io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("New connection from: {}", addr);
        let tables = Arc::clone(&tables);
        tokio::spawn(async move {
            handle_connection(stream, &tables).await;
        });
    }
}

pub async fn handle_connection<S>(mut stream: S, tables: &Tables)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match tokio::time::timeout(READ_TIMEOUT, read_request(&mut stream)).await {
        Err(_) => {
            warn!("Timed out after {:?} waiting for request", READ_TIMEOUT);
            let response = create_response(408, "Request Timeout", r#"{"error":"Request timeout"}"#);
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Ok(Err(e)) => {
            error!("Failed to read from stream: {}", e);
        }
        Ok(Ok(request)) => {
            let response = handle_request(&request, tables);
            if let Err(e) = stream.write_all(response.as_bytes()).await {
                error!("Failed to write response: {}", e);
            }
            let _ = stream.shutdown().await;
        }
    }
}

/// Read headers plus as much body as `Content-Length` announces.
async fn read_request<S>(stream: &mut S) -> std::io::Result<String>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..header_end]);
            let body_len = parse_headers(&head)
                .get("content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + body_len {
                break;
            }
        }

        if buf.len() > MAX_REQUEST_BYTES {
            warn!("Request exceeds {} bytes, truncating", MAX_REQUEST_BYTES);
            break;
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_headers(head: &str) -> HashMap<String, String> {
    head.lines()
        .skip(1)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect()
}

/// Route one raw HTTP request to a raw HTTP response.
pub fn handle_request(request: &str, tables: &Tables) -> String {
    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return create_response(400, "Bad Request", r#"{"error":"Malformed request"}"#);
    }

    let method = parts[0];
    let mut path = parts[1];
    if let Some(query_start) = path.find('?') {
        path = &path[..query_start];
    }
    let path = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };

    info!("Request: {} {}", method, path);

    match (method, path) {
        ("GET", "/") => create_html_response(&render_page()),
        ("GET", "/api/health") => {
            create_response(200, "OK", r#"{"status":"ok","service":"agri-qa"}"#)
        }
        ("GET", "/api/examples") => {
            let body = serde_json::json!({ "examples": EXAMPLE_QUESTIONS });
            create_response(200, "OK", &body.to_string())
        }
        ("POST", "/api/ask") => {
            let body = request
                .find("\r\n\r\n")
                .map(|idx| &request[idx + 4..])
                .unwrap_or("")
                .trim();

            let ask: AskRequest = match serde_json::from_str(body) {
                Ok(ask) => ask,
                Err(e) => {
                    warn!("Rejecting /api/ask body: {}", e);
                    return create_response(
                        400,
                        "Bad Request",
                        r#"{"error":"Expected a JSON body like {\"query\": \"...\"}"}"#,
                    );
                }
            };

            let reply = shell::ask(&ask.query, tables);
            match serde_json::to_string(&reply) {
                Ok(json) => create_response(200, "OK", &json),
                Err(e) => {
                    error!("Failed to serialize reply: {}", e);
                    create_response(500, "Internal Server Error", r#"{"error":"Failed to serialize response"}"#)
                }
            }
        }
        ("OPTIONS", _) => create_response(204, "No Content", ""),
        _ => create_response(404, "Not Found", r#"{"error":"Not found"}"#),
    }
}

fn create_response(status: u16, status_text: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        status,
        status_text,
        body.len(),
        body
    )
}

fn create_html_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        body.len(),
        body
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_page() -> String {
    let examples: String = EXAMPLE_QUESTIONS
        .iter()
        .map(|q| format!("<li>{}</li>", escape_html(q)))
        .collect();

    PAGE_TEMPLATE
        .replace("@TITLE@", &escape_html(shell::TITLE))
        .replace("@CAPTION@", &escape_html(shell::CAPTION))
        .replace("@EXAMPLES@", &examples)
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>@TITLE@</title>
<style>
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 260px; padding: 1rem; background: #f3f5f0; min-height: 100vh; }
main { flex: 1; padding: 1rem 2rem; }
input { width: 60%; padding: .4rem; }
#answer { margin-top: 1rem; padding: .6rem; border-radius: 4px; display: none; }
#answer.success { display: block; background: #e5f5e5; }
#answer.warning { display: block; background: #fff4d6; }
#chart { margin-top: 1rem; }
</style>
</head>
<body>
<aside>
<h3>Example Questions</h3>
<ul>@EXAMPLES@</ul>
</aside>
<main>
<h1>@TITLE@</h1>
<p>@CAPTION@</p>
<label for="q">Type your question here:</label><br>
<input id="q" type="text">
<button id="go">Get Answer</button>
<div id="answer"></div>
<svg id="chart" width="640" height="260"></svg>
</main>
<script>
const answer = document.getElementById('answer');
const chart = document.getElementById('chart');

function drawChart(points) {
  chart.innerHTML = '';
  if (!points || points.length === 0) return;
  const w = 640, h = 260, pad = 30;
  const series = [['annual_rainfall', '#1f77b4'], ['production', '#ff7f0e']];
  const years = points.map(p => p.year);
  const x0 = Math.min(...years), x1 = Math.max(...years);
  const sx = y => pad + (x1 === x0 ? 0.5 : (y - x0) / (x1 - x0)) * (w - 2 * pad);
  for (const [key, color] of series) {
    const vals = points.filter(p => p[key] !== null).map(p => [p.year, p[key]]);
    if (vals.length === 0) continue;
    const lo = Math.min(...vals.map(v => v[1])), hi = Math.max(...vals.map(v => v[1]));
    const sy = v => h - pad - (hi === lo ? 0.5 : (v - lo) / (hi - lo)) * (h - 2 * pad);
    const line = document.createElementNS('http://www.w3.org/2000/svg', 'polyline');
    line.setAttribute('points', vals.map(v => sx(v[0]) + ',' + sy(v[1])).join(' '));
    line.setAttribute('fill', 'none');
    line.setAttribute('stroke', color);
    chart.appendChild(line);
  }
}

document.getElementById('go').addEventListener('click', async () => {
  const query = document.getElementById('q').value;
  const res = await fetch('/api/ask', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ query })
  });
  const reply = await res.json();
  answer.className = reply.status;
  answer.textContent = reply.answer.text;
  drawChart(reply.answer.chart ? reply.answer.chart.points : null);
});
</script>
</body>
</html>
"#;
