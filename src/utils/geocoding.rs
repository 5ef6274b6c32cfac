use crate::config::GeocodingConfig;
use crate::utils::distance::Coordinate;

/// Best-effort forward geocode of a street address. Any failure (disabled,
/// network, malformed response, no match) yields None; a restaurant without
/// a coordinate is simply hidden from the distance-sorted feed.
pub fn geocode_address(config: &GeocodingConfig, address: &str) -> Option<Coordinate> {
    if !config.enabled || address.trim().is_empty() {
        return None;
    }

    let url = format!(
        "{}?format=json&limit=1&q={}",
        config.base_url,
        urlencode(address)
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .user_agent(&config.user_agent)
        .build()
        .ok()?;

    let response = client.get(&url).send().ok()?;
    let json: serde_json::Value = response.json().ok()?;

    let hit = json.as_array()?.first()?;
    let latitude: f64 = hit.get("lat")?.as_str()?.parse().ok()?;
    let longitude: f64 = hit.get("lon")?.as_str()?.parse().ok()?;

    Some(Coordinate::new(latitude, longitude))
}

fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_returns_none() {
        let config = GeocodingConfig {
            enabled: false,
            ..GeocodingConfig::default()
        };
        assert!(geocode_address(&config, "233 S Wacker Dr, Chicago").is_none());
    }

    #[test]
    fn test_empty_address_returns_none() {
        let config = GeocodingConfig::default();
        assert!(geocode_address(&config, "   ").is_none());
    }

    #[test]
    fn test_urlencode_escapes_reserved_characters() {
        assert_eq!(urlencode("233 S Wacker Dr"), "233+S+Wacker+Dr");
        assert_eq!(urlencode("a&b"), "a%26b");
    }
}
