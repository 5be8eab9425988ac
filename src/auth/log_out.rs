//! Log-out route handler that invalidates the session cookie and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_session_cookie, endpoints};

/// Invalidate the session cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{
        body::Body,
        http::{Response, StatusCode, header::SET_COOKIE},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::OffsetDateTime;

    use crate::{
        auth::{
            COOKIE_SESSION, DEFAULT_COOKIE_DURATION, Role, cookie::invalidate_session_cookie,
            current_session, set_session_cookie, test_session,
        },
        endpoints,
    };

    use super::get_log_out;

    fn get_jar() -> PrivateCookieJar {
        let key = Key::from(&Sha512::digest("42"));
        PrivateCookieJar::new(key)
    }

    #[tokio::test]
    async fn log_out_invalidates_session_cookie_and_redirects() {
        let cookie_jar = set_session_cookie(
            get_jar(),
            &test_session(Role::Approver),
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();

        let response = get_log_out(cookie_jar).await;

        assert_redirect(&response, endpoints::LOG_IN_VIEW);
        assert_cookie_expired(&response);
    }

    #[test]
    fn session_is_gone_after_log_out() {
        let jar = set_session_cookie(
            get_jar(),
            &test_session(Role::Maker),
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();
        assert!(current_session(&jar).is_some());

        let jar = invalidate_session_cookie(jar);

        assert_eq!(current_session(&jar), None);
    }

    fn assert_redirect(response: &Response<Body>, want_location: &str) {
        let redirect_location = response.headers().get("location").unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect_location, want_location);
    }

    fn assert_cookie_expired(response: &Response<Body>) {
        let mut found = false;

        for cookie_header in response.headers().get_all(SET_COOKIE) {
            let cookie_string = cookie_header.to_str().unwrap();
            let cookie = Cookie::parse(cookie_string).unwrap();

            if cookie.name() != COOKIE_SESSION {
                continue;
            }

            found = true;
            assert_eq!(
                cookie.expires_datetime(),
                Some(OffsetDateTime::UNIX_EPOCH),
                "got expires {:?}, want {:?}",
                cookie.expires_datetime(),
                Some(OffsetDateTime::UNIX_EPOCH),
            );
        }

        assert!(found, "want a session cookie in the response");
    }
}
