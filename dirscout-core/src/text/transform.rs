//! Text formatting transforms and the markdown/HTML converters.
//!
//! The converters are deliberately line-oriented and regex-based, covering
//! headers, blockquotes, bold/italic, images, and links. They are preview
//! helpers, not a compliant markdown implementation.

use anyhow::Result;
use regex::Regex;

/// Uppercase the first character of every word.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_word = false;
    for c in text.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// Uppercase the first word character of the text and of every sentence
/// following a `.`, `!`, or `?`.
pub fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    for c in text.chars() {
        if capitalize_next && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            if matches!(c, '.' | '!' | '?') {
                capitalize_next = true;
            }
            out.push(c);
        }
    }
    out
}

/// Keep at most `max_lines` lines, dropping the rest.
pub fn limit_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= max_lines {
        return text.to_string();
    }
    lines[..max_lines].join("\n")
}

/// Replace every match of `pattern` with `replacement`. The pattern is
/// caller-supplied, so compilation errors surface to the caller.
pub fn replace_all(text: &str, pattern: &str, replacement: &str) -> Result<String> {
    let regex = Regex::new(pattern)?;
    Ok(regex.replace_all(text, replacement).into_owned())
}

/// Wrap every match of `pattern` in a `<span>` carrying `class_name`, for
/// rendering alongside the HTML the markdown converter emits.
pub fn highlight(text: &str, pattern: &str, class_name: &str) -> Result<String> {
    let regex = Regex::new(pattern)?;
    Ok(regex
        .replace_all(text, |caps: &regex::Captures| {
            format!("<span class=\"{class_name}\">{}</span>", &caps[0])
        })
        .into_owned())
}

pub fn markdown_to_html(text: &str) -> String {
    let rules = [
        (r"(?m)^### (.*)$", "<h3>$1</h3>"),
        (r"(?m)^## (.*)$", "<h2>$1</h2>"),
        (r"(?m)^# (.*)$", "<h1>$1</h1>"),
        (r"(?m)^> (.*)$", "<blockquote>$1</blockquote>"),
        (r"\*\*(.*?)\*\*", "<b>$1</b>"),
        (r"\*(.*?)\*", "<i>$1</i>"),
        (r"!\[(.*?)\]\((.*?)\)", "<img alt='$1' src='$2' />"),
        (r"\[(.*?)\]\((.*?)\)", "<a href='$2'>$1</a>"),
        // A newline at end of line (blank line or trailing) becomes a break;
        // the inverse rule in html_to_markdown undoes it
        (r"(?m)\n$", "<br />"),
    ];
    let mut out = text.to_string();
    for (pattern, replacement) in rules {
        let regex = Regex::new(pattern).expect("static pattern");
        out = regex.replace_all(&out, replacement).into_owned();
    }
    out
}

pub fn html_to_markdown(text: &str) -> String {
    let rules = [
        (r"<h1>(.*?)</h1>", "# $1"),
        (r"<h2>(.*?)</h2>", "## $1"),
        (r"<h3>(.*?)</h3>", "### $1"),
        (r"<b>(.*?)</b>", "**$1**"),
        (r"<i>(.*?)</i>", "*$1*"),
        (r"<blockquote>(.*?)</blockquote>", "> $1"),
        (r"<img alt='(.*?)' src='(.*?)' />", "![$1]($2)"),
        (r"<a href='(.*?)'>(.*?)</a>", "[$2]($1)"),
        (r"<br />", "\n"),
    ];
    let mut out = text.to_string();
    for (pattern, replacement) in rules {
        let regex = Regex::new(pattern).expect("static pattern");
        out = regex.replace_all(&out, replacement).into_owned();
    }
    out
}
