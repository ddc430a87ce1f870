//! One-shot flash messages carried in a cookie.
//!
//! A mutating route sets the cookie and redirects; the next page that reads
//! it renders the message and expires the cookie.

use axum::http::{HeaderMap, HeaderName, header};
use axum::response::{IntoResponse, Redirect, Response};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

pub const COOKIE_NAME: &str = "flash";

/// `Set-Cookie` header carrying `message`.
pub fn set(message: &str) -> [(HeaderName, String); 1] {
    let value = utf8_percent_encode(message, NON_ALPHANUMERIC);
    [(
        header::SET_COOKIE,
        format!("{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax"),
    )]
}

/// `Set-Cookie` header expiring the flash cookie.
pub fn clear() -> [(HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )]
}

/// Read the pending flash message from the request cookies, if any.
pub fn read(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .and_then(|(_, value)| percent_decode_str(value).decode_utf8().ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}

/// 303 redirect to `to` with a flash message.
pub fn redirect_with(to: &str, message: &str) -> Response {
    (set(message), Redirect::to(to)).into_response()
}

/// Render `page` and expire the flash cookie if one was shown.
pub fn consume(shown: bool, page: Response) -> Response {
    if shown {
        (clear(), page).into_response()
    } else {
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookie_value(message: &str) -> HeaderValue {
        let [(_, set_cookie)] = set(message);
        let pair = set_cookie.split(';').next().unwrap().to_string();
        HeaderValue::from_str(&pair).unwrap()
    }

    #[test]
    fn umlauts_survive_the_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie_value("Position gelöscht."));
        assert_eq!(read(&headers).as_deref(), Some("Position gelöscht."));
    }

    #[test]
    fn other_cookies_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; flash=Hallo%20Welt"));
        assert_eq!(read(&headers).as_deref(), Some("Hallo Welt"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(read(&headers), None);
    }

    #[test]
    fn expired_cookie_reads_as_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash="));
        assert_eq!(read(&headers), None);
    }

    #[test]
    fn redirect_is_see_other_with_cookie() {
        let response = redirect_with("/lists/1", "Liste wurde archiviert.");
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/lists/1");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=Liste%20wurde%20archiviert%2E;"));
    }
}
