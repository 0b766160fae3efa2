use crate::types::Platform;

const MOBILE_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Classify a browser user-agent string.
pub fn platform_from_user_agent(user_agent: &str) -> Platform {
    let ua = user_agent.to_ascii_lowercase();
    if MOBILE_AGENTS.iter().any(|needle| ua.contains(needle)) {
        Platform::Mobile
    } else {
        Platform::Desktop
    }
}

/// URL of a track asset, relative to the page.
/// Desktop builds ship Ogg Vorbis, mobile builds AAC in a separate folder.
pub fn track_url(platform: Platform, stem: &str) -> String {
    match platform {
        Platform::Desktop => format!("./audio/{stem}.ogg"),
        Platform::Mobile => format!("./mobile_audio/{stem}.m4a"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_agents() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile";
        let opera = "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80) Presto/2.5.25";
        assert_eq!(platform_from_user_agent(iphone), Platform::Mobile);
        assert_eq!(platform_from_user_agent(android), Platform::Mobile);
        assert_eq!(platform_from_user_agent(opera), Platform::Mobile);
    }

    #[test]
    fn test_desktop_agents() {
        let chrome = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
        let firefox = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:130.0) Gecko/20100101 Firefox/130.0";
        assert_eq!(platform_from_user_agent(chrome), Platform::Desktop);
        assert_eq!(platform_from_user_agent(firefox), Platform::Desktop);
        assert_eq!(platform_from_user_agent(""), Platform::Desktop);
    }

    #[test]
    fn test_track_urls() {
        assert_eq!(track_url(Platform::Desktop, "007_1"), "./audio/007_1.ogg");
        assert_eq!(
            track_url(Platform::Mobile, "007_1"),
            "./mobile_audio/007_1.m4a"
        );
    }
}
