use crate::net::Response;
use url::Url;

/// Fetches `url` with `client` and buffers the whole response.
///
/// Only transport failures are errors; a non-success status is returned as a normal
/// response for the caller to inspect.
pub async fn fetch(client: &reqwest::Client, url: Url) -> Result<Response, reqwest::Error> {
    log::debug!("fetching {url}");
    let res = client.get(url).send().await?;

    let final_url = res.url().clone();
    let status = res.status().as_u16();
    let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
    let headers = res.headers().clone();

    // Card assets are small; no streaming
    let body = res.bytes().await?.to_vec();

    Ok(Response {
        url: final_url,
        status,
        status_text,
        headers,
        body,
    })
}
