//! Requests prepared for signing.
//!
//! A [`PendingRequest`] is plain data: method, URL, headers and an optional
//! body. Auth strategies transform it before the client builds the actual
//! `reqwest` request, which keeps signing testable without a network.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::FetchError;

/// Request body variants used by provider APIs.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(serde_json::Value),
}

/// An outbound request that has not been sent yet.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// HTTP method.
    pub method: Method,
    /// Full URL including query.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Optional body.
    pub body: Option<RequestBody>,
}

impl PendingRequest {
    /// Creates a request.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a GET request from a URL string.
    pub fn get(url: &str) -> Result<Self, FetchError> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    /// Creates a POST request from a URL string.
    pub fn post(url: &str) -> Result<Self, FetchError> {
        Ok(Self::new(Method::POST, Url::parse(url)?))
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.url.query_pairs_mut().append_pair(key, value.as_ref());
        self
    }

    /// Appends query parameters.
    #[must_use]
    pub fn query_pairs<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        {
            let mut serializer = self.url.query_pairs_mut();
            for (key, value) in pairs {
                serializer.append_pair(key, &value);
            }
        }
        self
    }

    /// Sets a header. Invalid header values are ignored.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets a form body.
    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// The request-URI as used by Digest auth: path plus query.
    pub fn request_uri(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// Returns a query parameter's first value.
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Builds the `reqwest` request.
    pub(crate) fn build(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        match &self.body {
            Some(RequestBody::Form(fields)) => builder.form(fields),
            Some(RequestBody::Json(value)) => builder.json(value),
            None => builder,
        }
    }
}
