//! Index page

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(
        r#"<h1>Phishing Detection API</h1>
<p>Available endpoints:</p>
<ul>
    <li><a href="/api/test">/api/test</a> - Component diagnostics</li>
    <li><a href="/api/stats">/api/stats</a> - Scan statistics (optional <code>?days=N</code>)</li>
    <li><a href="/api/stats/daily">/api/stats/daily</a> - Per-day scan counts</li>
    <li><a href="/api/recent">/api/recent</a> - Most recent scans</li>
    <li>POST /api/scan-url - Scan a URL, body <code>{"url": "..."}</code></li>
</ul>
"#,
    )
}
