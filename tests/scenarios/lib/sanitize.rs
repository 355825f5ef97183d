use std::{path::Path, sync::LazyLock};

use regex::Regex;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches: 2026-10-18T09:41:07.123456Z
    Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?Z").unwrap()
});

static PADDING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Normalize log lines: timestamps, the temporary directory and level padding.
pub fn sanitize_log_output(input: &str, tmp: &Path) -> String {
    let tmp = tmp.display().to_string();
    let out = TIMESTAMP_RE.replace_all(input, "<time>");
    let out = out.replace(&tmp, "<tmp>").replace('\\', "/");
    PADDING_RE.replace_all(&out, " ").into_owned()
}
