//! Request dispatching.
//!
//! # Design
//! Sending is split in two steps, as in a host-does-IO client:
//! `RequestDescriptor::resolve` turns a method, URL template and payload into
//! a plain `HttpRequest` without touching the network, and a `Transport`
//! performs the single round trip. `Dispatcher` glues the two together and
//! hands back the response untouched; it never looks at status or body.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result, TransportError};
use crate::http::{Headers, HttpMethod, HttpRequest, Response};
use crate::json;

/// Bytes escaped in a substituted path segment; same set the `url` crate
/// uses for path segments.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// JSON object supplying path parameters, query parameters or a body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Build a payload from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value).map_err(|e| HarnessError::Payload(e.to_string()))? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(HarnessError::Payload(format!(
                "expected a JSON object, got {}",
                json::kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Everything needed to build one request. Consumed by [`resolve`].
///
/// [`resolve`]: RequestDescriptor::resolve
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url_template: String,
    payload: Option<Payload>,
    headers: Headers,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, url_template: &str) -> Self {
        Self {
            method,
            url_template: url_template.to_string(),
            payload: None,
            headers: Headers::new(),
        }
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn headers(mut self, headers: &Headers) -> Self {
        self.headers.merge(headers);
        self
    }

    /// Resolve against `config`:
    ///
    /// - `{name}` slots in the template are filled from (and removed from)
    ///   the payload, percent-encoded as a single path segment;
    /// - leftover entries become query pairs for GET/DELETE or the JSON body
    ///   for POST/PUT;
    /// - caller headers override the configured defaults, and a body gets
    ///   `content-type: application/json` unless one was supplied.
    pub fn resolve(self, config: &HarnessConfig) -> Result<HttpRequest> {
        let mut entries = self.payload.map(|p| p.0).unwrap_or_default();
        let path = fill_placeholders(&self.url_template, &mut entries)?;
        let url = absolute_url(config.base_url(), path);

        let mut headers = config.default_headers().clone();
        headers.merge(&self.headers);

        let (query, body) = if self.method.carries_body() {
            let body = (!entries.is_empty()).then(|| Value::Object(entries).to_string());
            (Vec::new(), body)
        } else {
            (query_pairs(entries), None)
        };
        if body.is_some() && !headers.contains("content-type") {
            headers.insert("content-type", "application/json");
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            query,
            headers,
            body,
        })
    }
}

fn fill_placeholders(template: &str, entries: &mut Map<String, Value>) -> Result<String> {
    let mut url = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let end = rest[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| {
                HarnessError::InvalidRequest(format!("unclosed placeholder in `{template}`"))
            })?;
        let name = &rest[start + 1..end];
        let value = entries.remove(name).ok_or_else(|| {
            HarnessError::InvalidRequest(format!("no value for `{{{name}}}` in `{template}`"))
        })?;
        url.push_str(&rest[..start]);
        url.extend(utf8_percent_encode(&scalar_text(&value), PATH_SEGMENT));
        rest = &rest[end + 1..];
    }
    url.push_str(rest);
    Ok(url)
}

fn absolute_url(base_url: &str, path: String) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path
    } else if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

/// Arrays expand to repeated keys; nulls are dropped.
fn query_pairs(entries: Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in entries {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.clone(), scalar_text(item))));
            }
            other => pairs.push((key, scalar_text(&other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Performs exactly one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> std::result::Result<Response, TransportError>;
}

/// `ureq`-backed transport. Non-2xx statuses come back as responses, not
/// errors; only failures to complete the exchange are `TransportError`s.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> std::result::Result<Response, TransportError> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => prepare(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                prepare(self.agent.put(url), request).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => prepare(self.agent.put(url), request).send_empty(),
        };
        let mut response = result.map_err(|e| transport_error(request, e))?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| transport_error(request, e))?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in request.headers.iter() {
        builder = builder.header(name, value);
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

fn transport_error(request: &HttpRequest, source: ureq::Error) -> TransportError {
    TransportError {
        method: request.method,
        url: request.url.clone(),
        source: Box::new(source),
    }
}

/// Builds and sends requests for one scenario.
#[derive(Clone)]
pub struct Dispatcher<T = UreqTransport> {
    config: HarnessConfig,
    transport: T,
}

impl Dispatcher<UreqTransport> {
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: HarnessConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve and send one request, returning the response as received.
    pub fn send(
        &self,
        method: HttpMethod,
        url_template: &str,
        data: Option<Payload>,
        headers: Option<&Headers>,
    ) -> Result<Response> {
        let mut descriptor = RequestDescriptor::new(method, url_template);
        if let Some(payload) = data {
            descriptor = descriptor.payload(payload);
        }
        if let Some(headers) = headers {
            descriptor = descriptor.headers(headers);
        }
        let request = descriptor.resolve(&self.config)?;
        self.dispatch(&request)
    }

    pub fn dispatch(&self, request: &HttpRequest) -> Result<Response> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            query = ?request.query,
            "sending request"
        );
        let response = self
            .transport
            .execute(request)
            .inspect_err(|err| tracing::warn!(error = %err, "transport failure"))?;
        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );
        Ok(response)
    }

    pub fn get(&self, url_template: &str, data: Option<Payload>) -> Result<Response> {
        self.send(HttpMethod::Get, url_template, data, None)
    }

    pub fn post(&self, url_template: &str, body: Payload) -> Result<Response> {
        self.send(HttpMethod::Post, url_template, Some(body), None)
    }

    pub fn put(&self, url_template: &str, body: Payload) -> Result<Response> {
        self.send(HttpMethod::Put, url_template, Some(body), None)
    }

    pub fn delete(&self, url_template: &str, data: Option<Payload>) -> Result<Response> {
        self.send(HttpMethod::Delete, url_template, data, None)
    }
}
