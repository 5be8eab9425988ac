//! Session handling: the session cookie, the route guards and the log-in,
//! registration and log-out pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod session;

pub use cookie::{DEFAULT_COOKIE_DURATION, current_session};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use register::{RegistrationState, get_register_page, post_register, post_send_otp};
pub use session::{Role, Session};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_SESSION, set_session_cookie};
#[cfg(test)]
pub(crate) use session::test_session;

/// The ways reading or writing the session cookie can fail.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum AuthError {
    /// Nobody is logged in.
    #[error("the session cookie is missing")]
    CookieMissing,

    /// The cookie could not be decrypted or does not hold a session.
    #[error("the session cookie is invalid")]
    InvalidCookie,

    /// The session is past its expiry time.
    #[error("the session has expired")]
    Expired,

    /// Adding the cookie duration to the current time overflowed.
    #[error("could not compute the session expiry")]
    DateError,

    /// The session could not be written as JSON.
    #[error("could not serialize the session: {0}")]
    Serialization(String),
}
