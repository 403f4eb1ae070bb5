//! Collapse notebook "form" cells into `<details>` disclosure blocks.
//!
//! A form cell is exported as a fenced code block whose first line is a
//! `#@title` comment. The collapser walks the document once, line by line,
//! so every form is rewritten exactly once and the scan always terminates.

use std::sync::LazyLock;

use regex::Regex;

/// Marker that opens a form cell.
const TITLE_MARKER: &str = "#@title";

/// Summary used when a form has no title text.
const DEFAULT_TITLE: &str = "Code";

/// Output of [`collapse_forms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseResult {
    /// The rewritten Markdown.
    pub markdown: String,
    /// Number of form cells that were collapsed.
    pub collapsed: usize,
}

/// Replace every `language` form cell in `md` with a disclosure block.
///
/// Code blocks in other languages, code blocks without a title comment and
/// unterminated fences are copied through untouched.
pub fn collapse_forms(md: &str, language: &str) -> CollapseResult {
    let opening = format!("```{language}");
    let lines: Vec<&str> = md.split_inclusive('\n').collect();

    let mut out = String::with_capacity(md.len());
    let mut collapsed = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim_end() == opening {
            if let Some(form) = parse_form(&lines[i + 1..]) {
                out.push_str(&render_disclosure(&form, language));
                collapsed += 1;
                // opening fence + title line + body + closing fence
                i += form.consumed + 1;
                continue;
            }
        }

        out.push_str(line);
        i += 1;
    }

    CollapseResult {
        markdown: out,
        collapsed,
    }
}

/// A form cell found right after an opening fence.
struct Form<'a> {
    title: String,
    code: String,
    /// Line ending of the closing fence, reused after `</details>`.
    trailer: &'a str,
    /// Lines consumed after the opening fence, closing fence included.
    consumed: usize,
}

fn parse_form<'a>(lines: &[&'a str]) -> Option<Form<'a>> {
    let (title_line, rest) = lines.split_first()?;
    let raw_title = title_line.trim_end().strip_prefix(TITLE_MARKER)?;

    let close = rest
        .iter()
        .position(|line| line.trim_end() == "```")?;
    if close == 0 {
        return None;
    }

    let body: String = rest[..close].concat();
    let code = body
        .strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(&body)
        .to_string();
    let closing = rest[close];

    Some(Form {
        title: clean_title(raw_title),
        code,
        trailer: &closing[closing.trim_end().len()..],
        consumed: close + 2,
    })
}

/// Trim the title and drop a trailing `{ display-mode: "form" }` style annotation.
fn clean_title(raw: &str) -> String {
    static PARAMS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s*\{[^{}]*\}\s*$").expect("valid regex"));

    let title = PARAMS_RE.replace(raw, "");
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn render_disclosure(form: &Form<'_>, language: &str) -> String {
    format!(
        "<details>\n<summary>{title}</summary>\n\n```{language}\n{code}\n```\n\n</details>{trailer}",
        title = form.title,
        code = form.code,
        trailer = form.trailer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_single_form() {
        let input = "Intro\n\n```python\n#@title Load data\nimport pandas as pd\ndf = pd.read_csv(\"x.csv\")\n```\n\nOutro\n";
        let result = collapse_forms(input, "python");

        assert_eq!(result.collapsed, 1);
        assert_eq!(result.markdown.matches("<details>").count(), 1);
        assert!(result.markdown.contains("<summary>Load data</summary>"));
        assert!(
            result
                .markdown
                .contains("```python\nimport pandas as pd\ndf = pd.read_csv(\"x.csv\")\n```")
        );
        assert!(!result.markdown.contains(TITLE_MARKER));
        assert!(result.markdown.starts_with("Intro\n\n<details>"));
        assert!(result.markdown.ends_with("</details>\n\nOutro\n"));
    }

    #[test]
    fn exact_disclosure_layout() {
        let input = "```python\n#@title Setup\nx = 1\n```\n";
        let result = collapse_forms(input, "python");
        assert_eq!(
            result.markdown,
            "<details>\n<summary>Setup</summary>\n\n```python\nx = 1\n```\n\n</details>\n"
        );
    }

    #[test]
    fn empty_title_defaults_to_code() {
        let input = "```python\n#@title\nx = 1\n```\n";
        let result = collapse_forms(input, "python");
        assert!(result.markdown.contains("<summary>Code</summary>"));
    }

    #[test]
    fn strips_colab_form_annotation() {
        let input = "```python\n#@title Imports { display-mode: \"form\" }\nimport os\n```\n";
        let result = collapse_forms(input, "python");
        assert!(result.markdown.contains("<summary>Imports</summary>"));
        assert!(!result.markdown.contains("display-mode"));
    }

    #[test]
    fn plain_code_blocks_untouched() {
        let input = "```python\nprint('hi')\n```\n\n```bash\n#@title not python\nls\n```\n";
        let result = collapse_forms(input, "python");
        assert_eq!(result.collapsed, 0);
        assert_eq!(result.markdown, input);
    }

    #[test]
    fn unterminated_fence_untouched() {
        let input = "```python\n#@title Broken\nx = 1\n";
        let result = collapse_forms(input, "python");
        assert_eq!(result.collapsed, 0);
        assert_eq!(result.markdown, input);
    }

    #[test]
    fn title_only_form_untouched() {
        let input = "```python\n#@title Nothing here\n```\n";
        let result = collapse_forms(input, "python");
        assert_eq!(result.collapsed, 0);
        assert_eq!(result.markdown, input);
    }

    #[test]
    fn collapses_multiple_forms_in_order() {
        let input = "```python\n#@title First\na = 1\n```\n\ntext\n\n```python\n#@title Second\nb = 2\n```\n";
        let result = collapse_forms(input, "python");

        assert_eq!(result.collapsed, 2);
        let first = result.markdown.find("<summary>First</summary>").unwrap();
        let second = result.markdown.find("<summary>Second</summary>").unwrap();
        assert!(first < second);
        assert!(result.markdown.contains("\ntext\n"));
    }

    #[test]
    fn uses_configured_language() {
        let input = "```julia\n#@title Plot\nplot(x)\n```\n";
        assert_eq!(collapse_forms(input, "python").collapsed, 0);

        let result = collapse_forms(input, "julia");
        assert_eq!(result.collapsed, 1);
        assert!(result.markdown.contains("```julia\nplot(x)\n```"));
    }

    #[test]
    fn preserves_missing_trailing_newline() {
        let input = "```python\n#@title End\nx = 1\n```";
        let result = collapse_forms(input, "python");
        assert!(result.markdown.ends_with("</details>"));
    }
}
