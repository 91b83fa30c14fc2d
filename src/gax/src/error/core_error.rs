// Copyright 2025 Stratus Cloud Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::rpc::Status;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may return an error, the transport may be unable to create the
/// necessary connection to make a request, or the library may be unable to
/// parse the response.
///
/// Most applications will just return the error or log it, without any
/// further action. However, some applications may need to interrogate the
/// error details. This type offers a series of predicates to determine the
/// error kind. The type also offers accessors to query the most common error
/// details. Applications can query the error
/// [source][std::error::Error::source] for deeper information.
///
/// # Example
/// ```
/// use stratus_gax::error::Error;
/// match example_function() {
///     Err(e) if matches!(e.status(), Some(_)) => {
///         println!("service error {e}, debug using {:?}", e.status().unwrap());
///     },
///     Err(e) if e.is_io() => { println!("connection problem {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use stratus_gax::error::rpc::{Code, Status};
///     # Err(Error::service(Status::default().set_code(Code::NotFound).set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::Error;
    /// use stratus_gax::error::rpc::{Code, Status};
    /// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        let details = ServiceDetails {
            status,
            status_code: None,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// Creates a service error including the HTTP status code of the
    /// response that carried it.
    pub fn service_with_http_status(status: Status, status_code: u16) -> Self {
        let details = ServiceDetails {
            status,
            status_code: Some(status_code),
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// The [Status] payload associated with this error.
    ///
    /// The service returns a detailed `Status` message including a code for
    /// the error type and a human-readable message. Only errors created with
    /// [service][Error::service] carry one.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::{Error, rpc::{Code, Status}};
    /// let error = Error::service(Status::default().set_code(Code::NotFound));
    /// if let Some(status) = error.status() {
    ///     if status.code == Code::NotFound {
    ///         println!("cannot find the thing: {}", status.message);
    ///     }
    /// }
    /// ```
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().status),
            _ => None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::{Error, rpc::{Code, Status}};
    /// let error = Error::service_with_http_status(
    ///     Status::default().set_code(Code::NotFound), 404);
    /// assert_eq!(error.http_status_code(), Some(404));
    /// ```
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// Creates an error representing a connection or I/O problem.
    ///
    /// Examples include: the connection could not be established, or was
    /// broken after the request was sent. The service did not return a full
    /// response.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_gax::error::Error;
    /// let error = Error::io("simulated connection reset");
    /// assert!(error.is_io());
    /// assert!(error.source().is_some());
    /// ```
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The request did not complete due to a connection or I/O problem.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a problem creating the authentication
    /// headers for a request.
    pub fn authentication<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// The client could not create the authentication headers before sending
    /// the request.
    ///
    /// Typically this indicates a misconfigured credentials environment for
    /// the application. No request was sent to the service.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// The most common cause for deserialization problems are bugs in the
    /// client library and (rarely) bugs in the service.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a request serialization problem.
    ///
    /// This is always a client-side generated error, generated before the
    /// request is made. It is never transient: serialization is deterministic
    /// and will fail on future attempts with the same input data.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an unclassified error.
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(source.into()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Authentication, Some(e)) => {
                write!(f, "cannot create the authentication headers {e}")
            }
            (ErrorKind::Io, Some(e)) => {
                write!(f, "the transport reports a problem making the request: {e}")
            }
            (ErrorKind::Service(d), _) => {
                write!(
                    f,
                    "the service reports an error with code {} described as: {}",
                    d.status.code, d.status.message
                )
            }
            (ErrorKind::Other, Some(e)) => {
                write!(f, "an unclassified problem making a request: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Serialization,
    Deserialization,
    Authentication,
    Io,
    Service(Box<ServiceDetails>),
    /// An uncategorized error.
    Other,
}

#[derive(Debug)]
struct ServiceDetails {
    status: Status,
    status_code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::Code;
    use anyhow::Result;

    #[test]
    fn service() {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("resource not found");
        let error = Error::service(status.clone());
        assert_eq!(error.status(), Some(&status));
        assert_eq!(error.http_status_code(), None);
        assert!(!error.is_io());
        let got = format!("{error}");
        assert!(got.contains("NOT_FOUND"), "{got}");
        assert!(got.contains("resource not found"), "{got}");
    }

    #[test]
    fn service_with_http_status() {
        let status = Status::default().set_code(Code::PermissionDenied);
        let error = Error::service_with_http_status(status.clone(), 403);
        assert_eq!(error.status(), Some(&status));
        assert_eq!(error.http_status_code(), Some(403));
    }

    #[test]
    fn io() -> Result<()> {
        let error = Error::io("simulated");
        assert!(error.is_io());
        assert!(!error.is_authentication());
        assert!(error.source().is_some());
        let got = format!("{error}");
        assert!(got.contains("simulated"), "{got}");
        Ok(())
    }

    #[test]
    fn authentication() {
        let error = Error::authentication("missing token");
        assert!(error.is_authentication());
        assert!(error.status().is_none());
        let got = format!("{error}");
        assert!(got.contains("missing token"), "{got}");
    }

    #[test]
    fn deser() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = Error::deser(source);
        assert!(error.is_deserialization());
        assert!(!error.is_serialization());
        assert!(error.source().is_some());
    }

    #[test]
    fn ser() {
        let error = Error::ser("simulated");
        assert!(error.is_serialization());
        assert!(!error.is_deserialization());
    }

    #[test]
    fn other() {
        let error = Error::other("something else");
        assert!(error.status().is_none());
        let got = format!("{error}");
        assert!(got.contains("something else"), "{got}");
    }
}
