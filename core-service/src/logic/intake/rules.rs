//! Intake Rules - fixed package and phrase lists

/// OS packages never analysed; the app's own id is checked separately
pub const SYSTEM_PACKAGES: &[&str] = &["android", "com.android.systemui"];

/// Foreground-service chatter, matched on the lowercased merged text
pub const BACKGROUND_PHRASES: &[&str] = &["is running", "doing work in the background"];

/// Separator between title and body in the merged text
pub const MERGE_SEPARATOR: &str = ". ";

pub fn is_system_package(package: &str, self_package: &str) -> bool {
    package == self_package || SYSTEM_PACKAGES.contains(&package)
}

pub fn is_background_chatter(merged_text: &str) -> bool {
    let lowered = merged_text.to_lowercase();
    BACKGROUND_PHRASES.iter().any(|p| lowered.contains(p))
}

/// `title + ". " + body`, empty segments omitted
pub fn merge_text(title: &str, body: &str) -> String {
    let parts: Vec<&str> = [title.trim(), body.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(MERGE_SEPARATOR)
}
