use crate::error::{ Error, ErrorKind, Result };

use actix_multipart::{ Field, Multipart };
use actix_web::web::{ Bytes, BytesMut };
use futures_util::TryStreamExt;

pub const IMAGE_FIELD: &str = "image";
pub const KEY_FIELD: &str = "key";

/// Cap for every field that is not a file.
pub const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// A multipart form held entirely in memory.
#[derive(Debug, Default)]
pub struct Upload {
    pub key: Option<Bytes>,
    pub image: Option<Bytes>,
    pub malformed: bool,
}

impl Upload {
    /// Drains the form. Fails as soon as a file field grows past `limit`
    /// bytes or a text field past [`TEXT_FIELD_LIMIT`]; a broken stream only
    /// flags the upload as malformed.
    pub async fn read(mut payload: Multipart, limit: usize) -> Result<Self> {
        let mut upload = Self::default();

        loop {
            let mut field = match payload.try_next().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(err) => {
                    log::warn!("Could not read multipart field: {}", err);
                    upload.malformed = true;
                    break;
                },
            };

            let name = field.name().unwrap_or_default().to_owned();
            let is_file = field.content_disposition()
                               .and_then(|disposition| disposition.get_filename())
                               .is_some();

            let cap = if is_file { limit } else { TEXT_FIELD_LIMIT };
            let bytes = match read_field(&mut field, cap).await? {
                Some(bytes) => bytes,
                None => {
                    upload.malformed = true;
                    break;
                },
            };

            match (name.as_str(), is_file) {
                (IMAGE_FIELD, true) if upload.image.is_none() => upload.image = Some(bytes),
                (KEY_FIELD, false) => upload.key = Some(bytes),
                (_, true) => {
                    log::warn!("Unexpected file field `{}` in upload", name);
                    upload.malformed = true;
                },
                _ => {},
            }
        }

        Ok(upload)
    }

    pub fn is_authorized(&self, api_key: &str) -> bool {
        self.key.as_deref() == Some(api_key.as_bytes())
    }

    /// Gives back the image once the key matches and the form is sound.
    pub fn into_image(self, api_key: &str) -> Result<Bytes> {
        if !self.is_authorized(api_key) {
            return Err(Error::new(ErrorKind::Forbidden));
        }
        if self.malformed {
            return Err(Error::new(ErrorKind::MalformedUpload));
        }

        self.image.ok_or_else(|| Error::new(ErrorKind::MissingImage))
    }
}

// `None` when the field stream breaks off.
async fn read_field(field: &mut Field, limit: usize) -> Result<Option<Bytes>> {
    let mut buf = BytesMut::new();

    loop {
        match field.try_next().await {
            Ok(Some(chunk)) => {
                if buf.len() + chunk.len() > limit {
                    return Err(Error::new(ErrorKind::UploadTooLarge));
                }
                buf.extend_from_slice(&chunk);
            },
            Ok(None) => return Ok(Some(buf.freeze())),
            Err(err) => {
                log::warn!("Could not read multipart field body: {}", err);
                return Ok(None);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(key: Option<&'static str>, image: Option<&'static [u8]>, malformed: bool) -> Upload {
        Upload {
            key: key.map(|key| Bytes::from_static(key.as_bytes())),
            image: image.map(Bytes::from_static),
            malformed,
        }
    }

    #[test]
    fn key_must_match_exactly() {
        assert!(upload(Some("secret"), None, false).is_authorized("secret"));
        assert!(!upload(Some("Secret"), None, false).is_authorized("secret"));
        assert!(!upload(Some("secret "), None, false).is_authorized("secret"));
        assert!(!upload(None, None, false).is_authorized("secret"));
    }

    #[test]
    fn key_is_compared_as_raw_bytes() {
        let key = Upload {
            key: Some(Bytes::from_static(b"\xFF")),
            ..Upload::default()
        };
        assert!(!key.is_authorized("\u{FFFD}"));

        let key = Upload {
            key: Some(Bytes::from_static("\u{FFFD}".as_bytes())),
            ..Upload::default()
        };
        assert!(key.is_authorized("\u{FFFD}"));
    }

    #[test]
    fn forbidden_takes_priority() {
        let err = upload(Some("nope"), None, true).into_image("secret").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Forbidden);
    }

    #[test]
    fn malformed_then_missing_image() {
        let err = upload(Some("secret"), Some(b"png"), true).into_image("secret").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedUpload);

        let err = upload(Some("secret"), None, false).into_image("secret").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingImage);

        let image = upload(Some("secret"), Some(b"png"), false).into_image("secret").unwrap();
        assert_eq!(&image[..], b"png");
    }
}
