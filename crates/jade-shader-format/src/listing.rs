/// Formats `source` with right-aligned line numbers followed by a driver `log`.
///
/// Compiler logs refer to line numbers of the stage body, so the listing is
/// numbered from the first line of the body, not of the whole file.
pub fn numbered_listing(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!("{:>width$}: {line}\n", i + 1));
    }

    if !log.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(log.trim_end());
    }

    out.trim_end_matches('\n').to_string()
}
