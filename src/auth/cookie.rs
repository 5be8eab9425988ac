//! Stores the [Session] in a private (encrypted) cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::auth::{AuthError, Session};

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

mod datetime_format {
    //! Serializes [time::OffsetDateTime] with two digit hours so that
    //! expiry times at midnight survive a round trip.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The cookie payload: the session and when it stops being accepted.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SessionToken {
    session: Session,

    #[serde(with = "datetime_format")]
    expires_at: OffsetDateTime,
}

fn build_cookie(value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION, value))
        .path("/")
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

fn add_session_token(
    jar: PrivateCookieJar,
    token: &SessionToken,
) -> Result<PrivateCookieJar, AuthError> {
    let value = serde_json::to_string(token)
        .map_err(|error| AuthError::Serialization(error.to_string()))?;

    Ok(jar.add(build_cookie(value, token.expires_at)))
}

fn get_session_token(jar: &PrivateCookieJar) -> Result<SessionToken, AuthError> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(AuthError::CookieMissing)?;

    serde_json::from_str(cookie.value_trimmed()).map_err(|_| AuthError::InvalidCookie)
}

/// Add the session cookie to the jar, marking `session` as logged in.
///
/// The cookie expires `duration` from now.
///
/// # Errors
///
/// Returns [AuthError::DateError] if the expiry overflows, or
/// [AuthError::Serialization] if the session cannot be written as JSON.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
) -> Result<PrivateCookieJar, AuthError> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    add_session_token(
        jar,
        &SessionToken {
            session: session.clone(),
            expires_at,
        },
    )
}

/// Read the session from the cookie jar.
///
/// # Errors
///
/// Returns [AuthError::CookieMissing] when nobody is logged in,
/// [AuthError::InvalidCookie] if the cookie cannot be read and
/// [AuthError::Expired] if the session is past its expiry.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, AuthError> {
    let token = get_session_token(jar)?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(AuthError::Expired);
    }

    Ok(token.session)
}

/// The logged in user, or `None` if there is no valid session.
pub fn current_session(jar: &PrivateCookieJar) -> Option<Session> {
    get_session_from_cookies(jar).ok()
}

/// Set the session expiry to the later of now plus `duration` and the current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_session_cookie_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, AuthError> {
    let token = get_session_token(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    add_session_token(
        jar,
        &SessionToken {
            expires_at: max(token.expires_at, new_expiry),
            session: token.session,
        },
    )
}

/// Overwrite the session cookie with an expired one, which deletes it on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}
