use std::{
    error, fmt,
    convert::From,
};

use actix_web::{
    HttpResponse, ResponseError,
    http::StatusCode,
};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Other,
    ConfigurationRead,
    ConfigurationParse,
    MissingApiKey,
    Logging,
    LogFile,
    ParseWwwBaseUrl,
    ParseHex,
    IO,
    Serde,
    Reqwest,
    Forbidden,
    MissingImage,
    MalformedUpload,
    UploadTooLarge,
    NotFound,
    ImageDecode,
    NoColors,
    Blocking,
}

#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            message: Self::type_to_str(&kind),
            kind,
        }
    }

    pub fn from<E>(kind: ErrorKind, err: E) -> Self
    where E: error::Error {
        let mut message = Self::type_to_str(&kind);
        if !message.is_empty() {
            message = format!("{}: {}", message, err);
        } else {
            message = format!("{}", err);
        }

        Self {
            kind,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
        }
    }

    pub fn custom(message: &str) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    fn type_to_str(kind: &ErrorKind) -> String {
        match kind {
            ErrorKind::Other | ErrorKind::IO => "",
            ErrorKind::ConfigurationRead => "could not read the configuration",
            ErrorKind::ConfigurationParse => "could not parse the configuration",
            ErrorKind::MissingApiKey => "no api key configured, set API_KEY or www.api_key",
            ErrorKind::Logging => "could not setup logging",
            ErrorKind::LogFile => "could not write to log file",
            ErrorKind::ParseWwwBaseUrl => "could not parse www config base url",
            ErrorKind::ParseHex => "could not parse hex color",
            ErrorKind::Serde => "could not serialize/deserialize JSON",
            ErrorKind::Reqwest => "reqwest error",
            ErrorKind::Forbidden => "api key mismatch",
            ErrorKind::MissingImage => "no image field in upload",
            ErrorKind::MalformedUpload => "malformed multipart upload",
            ErrorKind::UploadTooLarge => "upload exceeds the size limit",
            ErrorKind::NotFound => "no route matched",
            ErrorKind::ImageDecode => "could not decode image",
            ErrorKind::NoColors => "image has no usable pixels",
            ErrorKind::Blocking => "blocking task failed",
        }.into()
    }

    /// Text sent back to HTTP clients. Server-side failures never expose their
    /// internal message.
    pub fn public_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::Forbidden => "權限拒絕 (Permission Denied)",
            ErrorKind::MissingImage => "圖片未上傳 (Image not uploaded)",
            ErrorKind::MalformedUpload => "上傳格式錯誤 (Malformed upload)",
            ErrorKind::UploadTooLarge => "圖片檔案過大 (Image too large)",
            ErrorKind::NotFound => "Not Found",
            _ => "發生錯誤 (An error occurred during analysis)",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

// This is important for other errors to wrap this one.
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        // Generic error, underlying cause isn't tracked.
        None
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::MissingImage | ErrorKind::MalformedUpload => StatusCode::BAD_REQUEST,
            ErrorKind::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::from(ErrorKind::IO, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::from(ErrorKind::Serde, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::from(ErrorKind::Reqwest, err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::Foreign(_) | config::ConfigError::NotFound(_) =>
                Self::from(ErrorKind::ConfigurationRead, err),
            _ => Self::from(ErrorKind::ConfigurationParse, err),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::from(ErrorKind::ImageDecode, err)
    }
}

impl From<actix_web::error::BlockingError> for Error {
    fn from(err: actix_web::error::BlockingError) -> Self {
        Self::from(ErrorKind::Blocking, err)
    }
}
