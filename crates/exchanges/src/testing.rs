//! In-process transport for unit tests

use crate::errors::Result;
use crate::traits::HttpTransport;
use crate::types::HttpResponse;
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Handler = Box<dyn Fn(&str, usize) -> Result<HttpResponse>>;

/// Answers each GET from a closure of (url, call index) and records the URLs.
pub struct MockTransport {
    handler: Handler,
    requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&str, usize) -> Result<HttpResponse> + 'static) -> Rc<Self> {
        Rc::new(Self {
            handler: Box::new(handler),
            requests: RefCell::new(Vec::new()),
        })
    }

    /// Same body with status 200 for every call
    pub fn always(body: &'static str) -> Rc<Self> {
        Self::new(move |_, _| Ok(HttpResponse::new(200, body)))
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn headers(&self, call: usize) -> Vec<(String, String)> {
        self.requests.borrow()[call].1.clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str, headers: &[(String, String)], _timeout: Duration) -> Result<HttpResponse> {
        let call = self.calls();
        self.requests.borrow_mut().push((url.to_string(), headers.to_vec()));
        (self.handler)(url, call)
    }
}
