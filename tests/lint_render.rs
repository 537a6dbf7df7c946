//! Lint: key hints like `[c]` must be tappable wherever they are drawn.
//!
//! On a phone there is no keyboard, so a line that shows `[s] Start` but was
//! added with `cl.push(...)` instead of `cl.push_clickable(...)` is a dead
//! button. This scans every `render.rs` under `src/games/` for such lines.

use std::fs;
use std::path::{Path, PathBuf};

/// Symbols that appear as single-key hints besides letters and digits.
const HINT_SYMBOLS: &[u8] = b"-+=!~|\\";

/// True if `s` contains a one-character hint such as `[c]`, `[1]` or `[+]`.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || HINT_SYMBOLS.contains(&w[1]))
    })
}

/// `(line number, trimmed line)` for each plain `.push(` with a bracket hint.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| {
            !line.starts_with("//")
                && line.contains(".push(")
                && !line.contains("push_clickable(")
                && contains_bracket_key(line)
        })
        .map(|(n, line)| (n, line.to_string()))
        .collect()
}

/// Every `render.rs` below `dir`, depth first.
fn render_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            found.extend(render_files(&path));
        } else if path.file_name().is_some_and(|n| n == "render.rs") {
            found.push(path);
        }
    }
    found
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let games_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games");
    let mut report = String::new();
    for path in render_files(&games_dir) {
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        for (line_num, line) in find_bracket_key_in_push(&source) {
            report.push_str(&format!("  {}:{}: {}\n", path.display(), line_num, line));
        }
    }
    assert!(
        report.is_empty(),
        "key hints drawn with plain push(), use push_clickable() with the action id:\n{}",
        report
    );
}

#[test]
fn render_files_are_scanned() {
    let games_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games");
    let files = render_files(&games_dir);
    assert!(files.iter().any(|p| p.ends_with("boba/render.rs")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [s] Start  [r] Reset"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [c] Brew"), BREW);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [w] Save"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_indexing_outside_push() {
        let source = "render_counter(game, f, chunks[0], click_state, narrow);";
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[c]"));
        assert!(contains_bracket_key("[X]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[+]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[{}]"));
        assert!(!contains_bracket_key("abc"));
    }
}
