/// Strip HTML markup from a comment body and decode entities.
///
/// Returns one entry per line of text. Line breaks (`<br>`, `<p>`) are
/// kept, runs of blank lines collapse to one, and whitespace inside a
/// line is normalized. Inline formatting becomes markdown-style markers:
/// - `<i>`/`<em>` → `_italic_`
/// - `<b>`/`<strong>` → `*bold*`
/// - `<code>` → `` `code` ``
/// - Links → just the link text
pub fn to_lines(html: &str) -> Vec<String> {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        text.push_str(tag_replacement(&rest[start + 1..start + len]));
        rest = &rest[start + len + 1..];
    }
    text.push_str(rest);

    let decoded = html_escape::decode_html_entities(&text);
    let mut lines: Vec<String> = Vec::new();
    for line in decoded.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().is_none_or(String::is_empty) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn tag_replacement(tag: &str) -> &'static str {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match name.as_str() {
        "br" | "p" | "div" => "\n",
        "i" | "em" => "_",
        "b" | "strong" => "*",
        "code" => "`",
        _ => "",
    }
}
