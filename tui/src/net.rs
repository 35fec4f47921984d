//! Executes the core's `HttpRequest` values over reqwest.

use todo_core::{HttpMethod, HttpRequest, HttpResponse};

fn prepare(client: &reqwest::Client, request: &HttpRequest) -> reqwest::RequestBuilder {
    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    };
    let mut builder = client.request(method, &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }
    builder
}

/// Run the round-trip. Transport failures (refused connection, timeout)
/// come back as the error string the controller reports to the user.
pub async fn execute(
    client: &reqwest::Client,
    request: &HttpRequest,
) -> Result<HttpResponse, String> {
    let response = prepare(client, request)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|err| err.to_string())?;
    Ok(HttpResponse { status, body })
}
