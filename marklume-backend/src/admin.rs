//! Process-lifetime admin secret and the cookie that carries it.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::HttpRequest;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

pub const ADMIN_COOKIE_NAME: &str = "marklume_admin_key";
pub const ADMIN_COOKIE_MAX_AGE_HOURS: i64 = 72;

const KEY_BYTES: usize = 32;

#[derive(Clone)]
pub struct AdminKey(String);

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey(<redacted>)")
    }
}

impl AdminKey {
    /// Fresh random key, URL-safe base64 of 32 random bytes
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Use the configured key if there is a non-empty one, else generate
    pub fn from_config(configured: Option<&str>) -> Self {
        match configured.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Self(key.to_string()),
            None => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// True when the request carries the key in the admin cookie or as a
    /// `Bearer` token
    pub fn is_admin_request(&self, req: &HttpRequest) -> bool {
        if let Some(cookie) = req.cookie(ADMIN_COOKIE_NAME) {
            if self.matches(cookie.value()) {
                return true;
            }
        }

        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|token| self.matches(token))
            .unwrap_or(false)
    }

    pub fn login_cookie(&self) -> Cookie<'static> {
        Cookie::build(ADMIN_COOKIE_NAME, self.0.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::hours(ADMIN_COOKIE_MAX_AGE_HOURS))
            .finish()
    }

    pub fn logout_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(ADMIN_COOKIE_NAME, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_generated_keys_are_random_and_url_safe() {
        let a = AdminKey::generate();
        let b = AdminKey::generate();
        assert_ne!(a.as_str(), b.as_str());
        assert_eq!(a.as_str().len(), 43);
        assert!(a
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_from_config() {
        assert_eq!(AdminKey::from_config(Some("s3cret")).as_str(), "s3cret");
        assert_eq!(AdminKey::from_config(Some("  ")).as_str().len(), 43);
        assert_eq!(AdminKey::from_config(None).as_str().len(), 43);
    }

    #[test]
    fn test_matches() {
        let key = AdminKey::from_config(Some("s3cret"));
        assert!(key.matches("s3cret"));
        assert!(!key.matches("s3cre"));
        assert!(!key.matches("s3creT"));
        assert!(!key.matches(""));
    }

    #[test]
    fn test_request_with_cookie_or_bearer() {
        let key = AdminKey::from_config(Some("s3cret"));

        let req = TestRequest::default()
            .cookie(Cookie::new(ADMIN_COOKIE_NAME, "s3cret"))
            .to_http_request();
        assert!(key.is_admin_request(&req));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer s3cret"))
            .to_http_request();
        assert!(key.is_admin_request(&req));

        let req = TestRequest::default()
            .cookie(Cookie::new(ADMIN_COOKIE_NAME, "wrong"))
            .to_http_request();
        assert!(!key.is_admin_request(&req));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer s3cret "))
            .to_http_request();
        assert!(!key.is_admin_request(&req));

        assert!(!key.is_admin_request(&TestRequest::default().to_http_request()));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = AdminKey::from_config(Some("s3cret"));
        assert!(!format!("{:?}", key).contains("s3cret"));
    }

    #[test]
    fn test_login_cookie_attributes() {
        let cookie = AdminKey::from_config(Some("s3cret")).login_cookie();
        assert_eq!(cookie.name(), ADMIN_COOKIE_NAME);
        assert_eq!(cookie.value(), "s3cret");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(72)));
    }
}
