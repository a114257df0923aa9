use rand_agents::user_agent;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, DNT, HeaderMap, HeaderValue,
    InvalidHeaderValue, PRAGMA, USER_AGENT,
};

/// Browser-like headers so the platform serves the same markup a new tab would get
pub fn generate_headers(cookies: Option<&str>) -> Result<HeaderMap<HeaderValue>, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    let user_agent = user_agent();

    headers.insert(CACHE_CONTROL, "no-cache".parse()?);
    headers.insert(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8".parse()?);
    headers.insert(USER_AGENT, user_agent.parse()?);
    headers.insert(DNT, "1".parse()?);
    headers.insert(ACCEPT_LANGUAGE, "en-US,en;q=0.9,en-GB;q=0.8".parse()?);
    headers.insert(PRAGMA, "no-cache".parse()?);
    headers.insert("Sec-Fetch-Dest", "document".parse()?);
    headers.insert("Sec-Fetch-Mode", "navigate".parse()?);
    headers.insert("Sec-Fetch-Site", "none".parse()?);
    headers.insert("Sec-Fetch-User", "?1".parse()?);
    headers.insert("Upgrade-Insecure-Requests", "1".parse()?);

    if let Some(cookies) = cookies.filter(|cookies| !cookies.is_empty()) {
        headers.insert(COOKIE, cookies.parse()?);
    }

    Ok(headers)
}
