use std::time::Duration;

use anyhow::Context;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use poem::web::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::db::auth::Session;

pub const MAX_CHUNK_SIZE: usize = 3180;

// sb-<ref>-auth-token=base64-<base64url(session json)>, 过长时拆成 <name>.0, <name>.1 ...
const BASE64_PREFIX: &str = "base64-";

// 400 天, 浏览器允许的上限
const COOKIE_MAX_AGE: Duration = Duration::from_secs(400 * 24 * 60 * 60);

pub fn encode_session(session: &Session) -> anyhow::Result<String> {
    let json = serde_json::to_string(session)?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

pub fn decode_session(value: &str) -> anyhow::Result<Session> {
    let json = match value.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .context("session cookie is not base64url")?;
            String::from_utf8(bytes)?
        }
        None => value.to_string(),
    };

    Ok(serde_json::from_str(&json)?)
}

fn chunk_name(name: &str, idx: usize) -> String {
    format!("{name}.{idx}")
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value_str().to_string())
        .filter(|v| !v.is_empty())
}

fn chunk_count(jar: &CookieJar, name: &str) -> usize {
    (0..)
        .take_while(|idx| cookie_value(jar, &chunk_name(name, *idx)).is_some())
        .count()
}

pub fn read_value(jar: &CookieJar, name: &str) -> Option<String> {
    if let Some(value) = cookie_value(jar, name) {
        return Some(value);
    }

    let count = chunk_count(jar, name);
    if count == 0 {
        return None;
    }

    let value: String = (0..count)
        .filter_map(|idx| cookie_value(jar, &chunk_name(name, idx)))
        .collect();
    Some(value)
}

pub fn read_session(jar: &CookieJar, name: &str) -> Option<Session> {
    let value = read_value(jar, name)?;

    match decode_session(&value) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("ignore undecodable session cookie {name}: {e}");
            None
        }
    }
}

pub fn write_session(jar: &CookieJar, name: &str, session: &Session) -> anyhow::Result<()> {
    let value = encode_session(session)?;
    let stale_chunks = chunk_count(jar, name);

    if value.len() <= MAX_CHUNK_SIZE {
        jar.add(session_cookie(name, &value));
        (0..stale_chunks).for_each(|idx| expire(jar, &chunk_name(name, idx)));
        return Ok(());
    }

    let chunks: Vec<&[u8]> = value.as_bytes().chunks(MAX_CHUNK_SIZE).collect();
    for (idx, chunk) in chunks.iter().enumerate() {
        // base64url 只含 ASCII
        let chunk = std::str::from_utf8(chunk)?;
        jar.add(session_cookie(&chunk_name(name, idx), chunk));
    }

    (chunks.len()..stale_chunks).for_each(|idx| expire(jar, &chunk_name(name, idx)));
    if cookie_value(jar, name).is_some() {
        expire(jar, name);
    }

    Ok(())
}

pub fn clear_session(jar: &CookieJar, name: &str) {
    let chunks = chunk_count(jar, name);

    if cookie_value(jar, name).is_some() {
        expire(jar, name);
    }
    (0..chunks).for_each(|idx| expire(jar, &chunk_name(name, idx)));
}

fn session_cookie(name: &str, value: &str) -> Cookie {
    let mut cookie = Cookie::new_with_str(name, value);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(false);
    cookie.set_max_age(COOKIE_MAX_AGE);
    cookie
}

fn expire(jar: &CookieJar, name: &str) {
    let mut cookie = session_cookie(name, "");
    cookie.set_max_age(Duration::ZERO);
    jar.add(cookie);
}
