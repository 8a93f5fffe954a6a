use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    Transport(reqwest::Error),
    Status(u16),
    NotFound(String),
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ClientError::*;
        match self {
            Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ClientError::*;
        match self {
            Transport(e) => write!(f, "Transport: {}", e),
            Status(code) => write!(f, "Status: {}", code),
            NotFound(id) => write!(f, "NotFound: {}", id),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Transport(error)
    }
}
