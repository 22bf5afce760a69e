use thiserror::Error;

const BODY_SNIPPET_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decoding response failed: {source} (body: {body})")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

impl FetchError {
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: snippet(body),
        }
    }

    pub fn decode(source: serde_json::Error, body: &str) -> Self {
        Self::Decode {
            source,
            body: snippet(body),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    #[error("no movies matched the current filters")]
    NoResults,
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(1000);
        assert_eq!(snippet(&long).len(), BODY_SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn status_error_keeps_code_and_snippet() {
        let err = FetchError::status(reqwest::StatusCode::UNAUTHORIZED, "invalid token");
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid token");
            }
            other => panic!("unexpected error variant: {:?}", other),
        }
    }
}
