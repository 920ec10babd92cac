use crate::error::{FetchError, FetchResult};
use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, RequestBuilder,
};
use serde_json::Value;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

pub(crate) async fn get_json(request: RequestBuilder) -> FetchResult<Value> {
    let res = request.send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::HttpError(status));
    }
    let body = res.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::MalformedPayload(e.to_string()))
}

/// Reads a JSON number, or a string holding one (DexScreener and LunarCrush
/// send both).
pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

pub(crate) fn number_or_zero(value: &Value) -> f64 {
    number(value).unwrap_or(0.0)
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

/// Collapses an adapter result into the "no data" outcome, logging the cause.
pub(crate) fn no_data_on_err<T>(provider: &str, id: &str, result: FetchResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(FetchError::HttpError(status)) if status.as_u16() == 404 => {
            debug!("{}: no entry for {}", provider, id);
            None
        }
        Err(error) => {
            warn!("{}: no data for {}: {}", provider, id, error);
            None
        }
    }
}
