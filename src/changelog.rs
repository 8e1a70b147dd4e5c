//! Markdown rendering of grouped pull requests using Tera templates.
use serde::Serialize;

use crate::{
    Result,
    orchestrator::group::{GroupedResult, LabelGroup},
};

/// Default changelog body. One section per non-empty bucket; unlabeled pull
/// requests are listed under "Other Changes".
pub const DEFAULT_BODY: &str = r#"## What's Changed{% if since_tag %} since {{ since_tag }}{% endif %}
{% for group in groups %}{% if group.pull_requests | length > 0 %}
### {% if group.label == "nolabel" %}Other Changes{% else %}{{ group.label }}{% endif %}

{% for pr in group.pull_requests -%}
- {{ pr.title }} (#{{ pr.number }}){% if pr.author %} by @{{ pr.author.login }}{% endif %}
{% endfor -%}
{% endif %}{% endfor %}"#;

#[derive(Serialize)]
struct ChangelogContext<'a> {
    since_tag: Option<&'a str>,
    groups: &'a [LabelGroup],
}

/// Render `grouped` through `template`. `since_tag` is the tag of the
/// release the changes were collected from, if any.
pub fn render(
    template: &str,
    grouped: &GroupedResult,
    since_tag: Option<&str>,
) -> Result<String> {
    let context = tera::Context::from_serialize(ChangelogContext {
        since_tag,
        groups: grouped.groups(),
    })?;

    Ok(tera::Tera::one_off(template, &context, false)?)
}
