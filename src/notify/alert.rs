// src/notify/alert.rs
use crate::health::StatusRecord;
use std::fmt::Display;

pub const SUBJECT_PREFIX: &str = "[Uptime]";

/// Rendered alert email for a down observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}

impl Alert {
    pub fn from_record(record: &StatusRecord) -> Self {
        let status = or_none(record.status_code.as_ref());
        let error = or_none(record.error.as_ref());
        let latency = or_none(record.latency_ms.as_ref());

        let subject = format!(
            "{} DOWN: {} (status={}, err={})",
            SUBJECT_PREFIX, record.url, status, error
        );

        let body = format!(
            "<h3>{} is DOWN</h3>\n\
             <p><b>URL:</b> {}</p>\n\
             <p><b>Status:</b> {}</p>\n\
             <p><b>Error:</b> {}</p>\n\
             <p><b>Latency:</b> {} ms</p>\n\
             <p><b>Checked at (UTC):</b> {}</p>\n",
            escape_html(&record.url),
            escape_html(&record.url),
            escape_html(&status),
            escape_html(&error),
            latency,
            record.checked_at.format("%Y-%m-%d %H:%M:%S"),
        );

        Self { subject, body }
    }
}

fn or_none<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
