use std::str::FromStr;

use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Failure;

/// Fields the API uses to report errors and quota notices instead of data.
const ERROR_FIELD: &str = "Error Message";
const NOTICE_FIELDS: [&str; 2] = ["Note", "Information"];

pub async fn make_request(
    client: &Client,
    base_url: &str,
    params: &[(&str, &str)],
    api_key: &str,
) -> Result<Value, Failure> {
    debug!("GET {} {:?}", base_url, params);

    let res = client
        .get(base_url)
        .query(params)
        .query(&[("apikey", api_key)])
        .send()
        .await
        .map_err(request_failure)?;

    if !res.status().is_success() {
        return Err(Failure::RateLimitedOrInvalid(format!(
            "Request failed: {}",
            res.status()
        )));
    }

    let text = res.text().await.map_err(request_failure)?;

    serde_json::from_str::<Value>(&text)
        .map_err(|e| Failure::MalformedResponse(format!("Response is not valid JSON: {}", e)))
}

fn request_failure(err: reqwest::Error) -> Failure {
    if err.is_timeout() {
        Failure::RateLimitedOrInvalid(String::from("Request timed out"))
    } else {
        // The URL carries the API key.
        Failure::RateLimitedOrInvalid(format!("Request failed: {}", err.without_url()))
    }
}

/// Rejects bodies carrying an explicit error message or a rate-limit notice.
pub fn check_api_notice(data: &Value) -> Result<(), Failure> {
    if let Some(message) = data.get(ERROR_FIELD) {
        return Err(Failure::RateLimitedOrInvalid(value_text(message)));
    }

    for field in NOTICE_FIELDS {
        if let Some(notice) = data.get(field) {
            return Err(Failure::RateLimitedOrInvalid(format!(
                "API rate limit exceeded: {}",
                value_text(notice)
            )));
        }
    }

    Ok(())
}

fn value_text(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Parses numbers such as `"340.50"`, `"-1.5"`, `"+0.68%"`.
pub fn parse_decimal(field: &str, field_name: &str) -> Result<Decimal, Failure> {
    let trimmed = field.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let number = unsigned.strip_suffix('%').unwrap_or(unsigned).trim_end();

    Decimal::from_str(number).map_err(|_| {
        Failure::MalformedResponse(format!("Failed to parse {} '{}'", field_name, field))
    })
}

/// Deserializes every entry that fits `T`, skipping the rest.
pub fn parse_response_array<T>(data: &[Value]) -> Vec<T>
where
    T: DeserializeOwned,
{
    data.iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

pub fn parse_response_object<T>(data: &Value, error_msg: &str) -> Result<T, Failure>
where
    T: DeserializeOwned,
{
    match data {
        Value::Object(_) => serde_json::from_value(data.clone())
            .map_err(|e| Failure::MalformedResponse(format!("{}: {}", error_msg, e))),
        _ => Err(Failure::MalformedResponse(String::from(
            "Unexpected API response format: not an object",
        ))),
    }
}
