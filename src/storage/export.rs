//! Leaderboard exports.
//!
//! Both renderers take an already loaded and ranked list and only format it:
//! the HTML page shows the first [`HTML_LIMIT`] entries, the JSON document the
//! first [`JSON_LIMIT`].

use std::fmt::Write as FmtWrite;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::leaderboard::LeaderboardEntry;
use super::{StoreError, write_file};

pub const HTML_LIMIT: usize = 200;
pub const JSON_LIMIT: usize = 1000;

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Cantarell,Noto Sans,sans-serif;\
background:#0f1115;color:#e6e6e6;margin:24px}\
h1{font-size:20px;margin:0 0 16px}\
table{width:100%;border-collapse:collapse;border:1px solid #2b2f3a;border-radius:8px;overflow:hidden}\
th,td{padding:10px 12px;border-bottom:1px solid #2b2f3a;font-size:14px;text-align:left}\
th{background:#171a21}tr:nth-child(even){background:#12141a}\
.sub{color:#b0b5c0;font-size:12px}code{background:#171a21;padding:2px 6px;border-radius:6px}";

/// Self-contained HTML page for the top entries
pub fn render_html(entries: &[LeaderboardEntry]) -> String {
    let shown = &entries[..entries.len().min(HTML_LIMIT)];
    let mut html = String::with_capacity(1024 + shown.len() * 256);

    html.push_str("<!doctype html><html><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">");
    html.push_str("<title>gridsnake leaderboard</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><h1>gridsnake leaderboard</h1>");
    let _ = write!(html, "<div class=\"sub\">Rows: {}</div>", entries.len());
    html.push_str(
        "<table><thead><tr><th>#</th><th>Name</th><th>Score</th><th>Profile</th>\
         <th>Grid</th><th>Wrap</th><th>Speed</th><th>Preset</th><th>Seed</th>\
         <th>Time</th></tr></thead><tbody>",
    );

    for (i, e) in shown.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}×{}</td><td>{}</td>\
             <td>{} ms</td><td>{}</td><td><code>{}</code></td><td>{}</td></tr>",
            i + 1,
            escape_html(&e.name),
            e.score,
            e.profile,
            e.cols,
            e.rows,
            if e.wrap { "On" } else { "Off" },
            e.speed,
            e.preset,
            e.seed,
            e.timestamp
        );
    }

    html.push_str("</tbody></table></body></html>");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    rank: usize,
    name: &'a str,
    score: u32,
    profile: u32,
    seed: u32,
    cols: u32,
    rows: u32,
    wrap: bool,
    speed_ms: u32,
    preset: u32,
    timestamp: u64,
}

/// JSON document `{"entries": [...]}` for the top entries
pub fn render_json(entries: &[LeaderboardEntry]) -> Result<String, StoreError> {
    let doc = JsonDocument {
        entries: entries
            .iter()
            .take(JSON_LIMIT)
            .enumerate()
            .map(|(i, e)| JsonEntry {
                rank: i + 1,
                name: &e.name,
                score: e.score,
                profile: e.profile,
                seed: e.seed,
                cols: e.cols,
                rows: e.rows,
                wrap: e.wrap,
                speed_ms: e.speed,
                preset: e.preset,
                timestamp: e.timestamp,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&doc)?;
    json.push('\n');
    Ok(json)
}

pub fn export_html(path: &Path, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
    write_file(path, &render_html(entries))?;
    info!(path = %path.display(), rows = entries.len().min(HTML_LIMIT), "exported HTML leaderboard");
    Ok(())
}

pub fn export_json(path: &Path, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
    write_file(path, &render_json(entries)?)?;
    info!(path = %path.display(), rows = entries.len().min(JSON_LIMIT), "exported JSON leaderboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(n: u32) -> Vec<LeaderboardEntry> {
        (0..n)
            .rev()
            .map(|score| LeaderboardEntry {
                score,
                profile: 2,
                seed: 7,
                cols: 32,
                rows: 24,
                wrap: score % 2 == 0,
                speed: 120,
                preset: 1,
                name: format!("p{score}"),
                timestamp: u64::from(score),
            })
            .collect()
    }

    #[test]
    fn test_html_is_capped() {
        let html = render_html(&entries(250));
        assert_eq!(html.matches("<tr><td>").count(), HTML_LIMIT);
        assert!(html.contains("Rows: 250"));
        assert!(html.contains("<td>1</td><td>p249</td><td>249</td>"));
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_html_escapes_names() {
        let mut list = entries(1);
        list[0].name = "<b>&".to_string();
        let html = render_html(&list);
        assert!(html.contains("<td>&lt;b&gt;&amp;</td>"));
    }

    #[test]
    fn test_json_is_capped_and_ranked() {
        let json = render_json(&entries(1200)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        let list = doc["entries"].as_array().unwrap();

        assert_eq!(list.len(), JSON_LIMIT);
        assert_eq!(list[0]["rank"], 1);
        assert_eq!(list[0]["score"], 1199);
        assert_eq!(list[0]["name"], "p1199");
        assert_eq!(list[0]["speed_ms"], 120);
        assert_eq!(list[0]["wrap"], false);
        assert_eq!(list[999]["rank"], 1000);
    }

    #[test]
    fn test_json_empty() {
        let json = render_json(&[]).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(doc["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_export_writes_files() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("leaderboard.html");
        let json = dir.path().join("leaderboard.json");

        export_html(&html, &entries(3)).unwrap();
        export_json(&json, &entries(3)).unwrap();

        assert!(std::fs::read_to_string(&html).unwrap().contains("p2"));
        assert!(std::fs::read_to_string(&json).unwrap().contains("\"rank\": 3"));
    }
}
