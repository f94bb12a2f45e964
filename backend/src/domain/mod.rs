//! Domain primitives, services and ports.
//!
//! Purpose: keep the user model, error taxonomy and use-cases independent of
//! Actix, GraphQL and Diesel. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::error::{DUPLICATE_EMAIL_MESSAGE, Error, ErrorCode};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserDraft, UserId, UserName, UserValidationError};
pub use self::user_directory::UserDirectoryService;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
