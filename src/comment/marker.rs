/// Build the hidden HTML marker identifying comments from one workflow/context.
///
/// Example: `<!-- tf-pr-comment:deploy:terraform-plan:networking:dev -->`
pub fn default_marker(
    workflow: &str,
    title: &str,
    workspace: Option<&str>,
    environment: Option<&str>,
) -> String {
    let parts: Vec<String> = [Some(workflow), Some(title), workspace, environment]
        .into_iter()
        .flatten()
        .map(slugify)
        .filter(|p| !p.is_empty())
        .collect();

    format!("<!-- tf-pr-comment:{} -->", parts.join(":"))
}

/// Lowercase, keep alphanumerics, collapse everything else to single dashes
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
