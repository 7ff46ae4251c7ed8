use std::fmt;

#[derive(Debug)]
pub enum OWMError {
    NotFound(String),
    Status(u16, String),
    Request(String),
    Document(String),
}

impl OWMError {
    /// Returns the upstream http status code, if the error carries one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OWMError::NotFound(_) => Some(404),
            OWMError::Status(code, _) => Some(*code),
            OWMError::Request(_) | OWMError::Document(_) => None,
        }
    }
}

impl fmt::Display for OWMError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OWMError::NotFound(e) => write!(f, "OWMError::NotFound: {}", e),
            OWMError::Status(code, e) => write!(f, "OWMError::Status({}): {}", code, e),
            OWMError::Request(e) => write!(f, "OWMError::Request: {}", e),
            OWMError::Document(e) => write!(f, "OWMError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for OWMError {
    fn from(e: reqwest::Error) -> Self {
        OWMError::Request(e.to_string())
    }
}
impl From<serde_json::Error> for OWMError {
    fn from(e: serde_json::Error) -> Self {
        OWMError::Document(e.to_string())
    }
}
