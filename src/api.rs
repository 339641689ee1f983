use serde::Serialize;

use crate::id::FacebookId;

const INPUT_PARAM: &str = "input";

#[derive(Debug, Default)]
pub struct QueryParams {
    pub input: Option<String>,
}

impl QueryParams {
    /// Reads the query string leniently: the first `input` wins and repeated
    /// or unknown keys are ignored, so no request is rejected before it
    /// reaches the resolver.
    pub fn from_query(raw: Option<&str>) -> Self {
        let input = raw.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == INPUT_PARAM)
                .map(|(_, value)| value.into_owned())
        });
        QueryParams { input }
    }
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: FacebookId,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new_from_code(code: &str) -> Self {
        return ErrorResponse {
            error: code.to_owned(),
        };
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new_from_msg(msg: &str) -> Self {
        return StatusResponse {
            status: msg.to_owned(),
        };
    }
}
