//! Parsing for the stringly CLI surface: header lists and POST form fields.

use std::collections::HashMap;

use crate::error::DownloadError;

/// Header key the `--user-agent` flag is merged under.
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Parses a `"Header1: value1, Header2: value2"` list into a header map.
///
/// Entries are split on commas; each entry must contain a colon. Keys are
/// unique; a repeated key keeps the last value. The first colon splits name
/// from value, so values may themselves contain colons.
pub fn parse_header_list(spec: &str) -> Result<HashMap<String, String>, DownloadError> {
    let mut headers = HashMap::new();
    for entry in spec.split(',') {
        let (name, value) = entry.split_once(':').ok_or_else(|| {
            DownloadError::Malformed(format!("header entry has no colon: {:?}", entry.trim()))
        })?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// Merges a user-agent string into `headers` under `User-Agent`,
/// overriding any value already present under that exact key.
pub fn apply_user_agent(headers: &mut HashMap<String, String>, user_agent: &str) {
    headers.insert(USER_AGENT_HEADER.to_string(), user_agent.to_string());
}

/// Parses a `"key1=v1&key2=v2"` string into POST form fields.
pub fn parse_body_fields(data: &str) -> Result<HashMap<String, String>, DownloadError> {
    let mut fields = HashMap::new();
    for item in data.split('&') {
        let (key, value) = item.split_once('=').ok_or_else(|| {
            DownloadError::Malformed(format!("form field has no '=': {item:?}"))
        })?;
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}
