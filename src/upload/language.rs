//! Language detection from file extensions.

/// Tag used for files whose extension is not recognized.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Infers a syntax-highlighting language tag from `file_name`.
///
/// The extension is the text after the last `.`, compared case-insensitively.
/// A name without a dot is treated as its own extension.
#[must_use]
pub fn detect_language(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or(file_name).to_ascii_lowercase();
    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "md" => "markdown",
        "sql" => "sql",
        "sh" => "bash",
        "yaml" | "yml" => "yaml",
        _ => DEFAULT_LANGUAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(detect_language("x.tsx"), "typescript");
        assert_eq!(detect_language("lib.rs"), "rust");
        assert_eq!(detect_language("config.yml"), "yaml");
        assert_eq!(detect_language("README.MD"), "markdown");
        assert_eq!(detect_language("archive.tar.sh"), "bash");
    }

    #[test]
    fn unknown_extensions_fall_back_to_text() {
        assert_eq!(detect_language("x.unknownext"), "text");
        assert_eq!(detect_language("Makefile"), "text");
        assert_eq!(detect_language(".gitignore"), "text");
    }

    #[test]
    fn bare_extension_name_matches_itself() {
        assert_eq!(detect_language("go"), "go");
    }
}
