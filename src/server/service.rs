use super::request::parse_request;
use super::response::write_api_response;
use crate::dispatcher::{ApiResponse, Dispatcher};
use http::StatusCode;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::warn;

/// `may_minihttp` service that hands every request to a [`Dispatcher`].
///
/// Cloned once per connection; the dispatcher itself is shared.
#[derive(Clone, Debug)]
pub struct ApiService {
    dispatcher: Arc<Dispatcher>,
}

impl ApiService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl HttpService for ApiService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let response = match parse_request(req) {
            Ok(request) => self.dispatcher.handle(&request),
            Err(err) => {
                warn!(error = %err, "Rejected request with invalid method");
                ApiResponse::message(StatusCode::BAD_REQUEST, "Invalid method")
            }
        };
        write_api_response(res, response);
        Ok(())
    }
}
