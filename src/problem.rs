//! Turning handler outcomes into response bodies.
//!
//! A success becomes the value serialized as `application/json`. A failure
//! becomes an `application/problem+json` body sent with the HTTP status of
//! its [`Code`]:
//!
//! ```json
//! {"code":3,"message":"name required","instance":"/items"}
//! ```
//!
//! `details` appears only when the status carries some. `instance` is the
//! request path.

use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{error, warn};

use crate::code::Code;
use crate::handler::BoxError;
use crate::response::ContentType;
use crate::status::Status;
use crate::writer::ResponseWriter;

/// Wire shape of an error body.
#[derive(Debug, Serialize)]
pub struct ProblemJson<'a> {
    #[serde(flatten)]
    pub status: &'a Status,
    pub instance: &'a str,
}

/// Writes `value` as a success body, or `status` as a problem body when it
/// is present and not OK.
pub fn write_json<T>(w: &mut dyn ResponseWriter, instance: &str, value: &T, status: Option<&Status>)
where
    T: Serialize + ?Sized,
{
    match status {
        Some(status) if status.code() != Code::Ok => {
            let problem = ProblemJson { status, instance };
            encode(w, ContentType::ProblemJson, status.code().http_status(), &problem);
        }
        _ => encode(w, ContentType::Json, StatusCode::OK, value),
    }
}

/// Writes a handler's result.
///
/// Errors that do not carry a [`Status`] are answered as
/// [`Code::Unknown`] with the error's message, and a warning is logged so
/// the missing mapping can be added.
pub fn respond<T: Serialize>(w: &mut dyn ResponseWriter, instance: &str, result: Result<T, BoxError>) {
    match result {
        Ok(value) => write_json(w, instance, &value, None),
        Err(err) => {
            let (status, matched) = Status::from_error(&*err);
            if !matched {
                warn!(error = %err, path = instance, "handler error carries no status, answering with Unknown");
            }
            write_json(w, instance, &(), Some(&status));
        }
    }
}

/// Serializes first so nothing reaches the writer unless encoding succeeded.
fn encode<T>(w: &mut dyn ResponseWriter, content_type: ContentType, status: StatusCode, value: &T)
where
    T: Serialize + ?Sized,
{
    let body = match serde_json::to_vec(value) {
        Ok(body) => body,
        Err(e) => {
            error!(content_type = content_type.as_str(), "cannot encode response json: {e}");
            w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };
    w.headers_mut().insert(CONTENT_TYPE, content_type.header_value());
    w.write_header(status);
    if let Err(e) = w.write(&body) {
        error!("cannot write response body: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BufferedWriter;
    use serde::ser::Error as _;
    use serde_json::{Value, json};

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    fn body_json(w: &BufferedWriter) -> Value {
        serde_json::from_slice(w.body()).unwrap()
    }

    fn content_type(w: &BufferedWriter) -> &str {
        w.headers()[CONTENT_TYPE].to_str().unwrap()
    }

    #[test]
    fn ok_status_writes_the_value() {
        for status in [None, Some(Status::new(Code::Ok, "ignored"))] {
            let mut w = BufferedWriter::new();
            write_json(&mut w, "/items", &json!({"id": 1}), status.as_ref());
            assert_eq!(w.status(), StatusCode::OK);
            assert_eq!(content_type(&w), "application/json");
            assert_eq!(body_json(&w), json!({"id": 1}));
        }
    }

    #[test]
    fn failure_writes_a_problem() {
        let status = Status::new(Code::InvalidArgument, "name required");
        let mut w = BufferedWriter::new();
        write_json(&mut w, "/items", &(), Some(&status));

        assert_eq!(w.status(), StatusCode::BAD_REQUEST);
        assert_eq!(content_type(&w), "application/problem+json");
        assert_eq!(
            body_json(&w),
            json!({"code": 3, "message": "name required", "instance": "/items"})
        );
    }

    #[test]
    fn problem_carries_details() {
        let status = Status::new(Code::NotFound, "gone")
            .with_details([json!({"resource": "item", "id": 9})])
            .unwrap();
        let mut w = BufferedWriter::new();
        write_json(&mut w, "/items/9", &(), Some(&status));

        assert_eq!(body_json(&w)["details"], json!([{"resource": "item", "id": 9}]));
    }

    #[test]
    fn respond_keeps_status_errors() {
        let err = Status::error(Code::PermissionDenied, "nope");
        let mut w = BufferedWriter::new();
        respond::<()>(&mut w, "/admin", Err(err.into()));

        assert_eq!(w.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(&w)["code"], 7);
    }

    #[test]
    fn respond_coerces_foreign_errors_to_unknown() {
        let mut w = BufferedWriter::new();
        respond::<()>(&mut w, "/items", Err("database is down".into()));

        assert_eq!(w.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&w),
            json!({"code": 2, "message": "database is down", "instance": "/items"})
        );
    }

    #[test]
    fn encode_failure_is_a_bare_500() {
        let mut w = BufferedWriter::new();
        write_json(&mut w, "/items", &Unencodable, None);

        assert_eq!(w.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(w.body().is_empty());
        assert!(w.headers().get(CONTENT_TYPE).is_none());
    }
}
