//! Platform-specific prompt prefixes

/// Prefix for a known platform name, case-insensitive
pub fn platform_prefix(platform: &str) -> Option<&'static str> {
    match platform.trim().to_ascii_lowercase().as_str() {
        "twitter" => Some("Create a concise, engaging tweet (max 280 characters)"),
        "linkedin" => Some("Create a professional LinkedIn post (max 3000 characters)"),
        "facebook" => Some("Create a friendly, engaging Facebook post"),
        _ => None,
    }
}

/// Prepend the platform prefix to `prompt`. Unknown platforms leave it unchanged.
pub fn apply_platform(platform: Option<&str>, prompt: &str) -> String {
    match platform.and_then(platform_prefix) {
        Some(prefix) => format!("{}\n\n{}", prefix, prompt),
        None => prompt.to_string(),
    }
}
