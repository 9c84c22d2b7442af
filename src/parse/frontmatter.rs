use crate::model::task::Task;

const DELIMITER: &str = "---\n";

/// Error type for task file parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing YAML frontmatter")]
    MissingFrontmatter,
    #[error("unterminated YAML frontmatter")]
    Unterminated,
    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Render a task as a Markdown file: YAML frontmatter, a title heading and
/// the description as body.
pub fn render_task(task: &Task) -> Result<String, ParseError> {
    let yaml = serde_yaml::to_string(task)?;
    let mut out = String::with_capacity(yaml.len() + task.title.len() + 16);
    out.push_str(DELIMITER);
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&format!("# {}\n\n", task.title));
    if !task.description.is_empty() {
        out.push_str(&task.description);
        out.push_str("\n\n");
    }
    Ok(out)
}

/// Split a task file into its frontmatter and body.
pub fn split_frontmatter(content: &str) -> Result<(&str, &str), ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix(DELIMITER)
        .ok_or(ParseError::MissingFrontmatter)?;
    if let Some(body) = rest.strip_prefix(DELIMITER) {
        return Ok(("", body));
    }
    let end = rest.find("\n---\n").ok_or(ParseError::Unterminated)?;
    Ok((&rest[..end + 1], &rest[end + 5..]))
}

/// Parse a task file. Only the frontmatter is authoritative; the body is
/// regenerated on every write.
pub fn parse_task(content: &str) -> Result<Task, ParseError> {
    let (yaml, _body) = split_frontmatter(content)?;
    Ok(serde_yaml::from_str(yaml)?)
}
