use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Non-blocking message returned next to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    pub notices: Vec<Notice>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T, notices: Vec<Notice>) -> Self {
        Self { data, notices }
    }

    pub fn quiet(data: T) -> Self {
        Self {
            data,
            notices: Vec::new(),
        }
    }
}
