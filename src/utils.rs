use std::ffi::OsStr;
use std::path::Path;

pub fn get_language_tag(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "rs" => "rust",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "go" => "go",
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "rb" => "ruby",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" => "cpp",
        "h" => "c",
        "m" => "objectivec",
        "sh" => "bash",
        "html" => "html",
        "css" => "css",
        "md" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "xml" | "plist" => "xml",
        _ => "",
    }
}

/// Derives the anchor slug for a section name.
///
/// The name is trimmed and lower-cased, every whitespace character becomes
/// a `-`, and characters that would break an HTML attribute or a Markdown
/// link target are dropped. Applying it to its own output returns the same
/// string.
pub fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !matches!(c, '"' | '\'' | '<' | '>' | '&' | '(' | ')'))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Calculates the appropriate fence string for wrapping content.
///
/// Returns a fence with at least 3 backticks, or more if the content
/// contains backtick sequences that would interfere with parsing.
pub fn calculate_fence(content: &str) -> String {
    let max_backtick_run = content
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('`') {
                Some(trimmed.chars().take_while(|&c| c == '`').count())
            } else {
                None
            }
        })
        .max()
        .unwrap_or(0);

    let fence_len = max_backtick_run.max(2) + 1;
    "`".repeat(fence_len)
}
