//! Plain-text rendering of enriched deployments.

use deploylens_core::EnrichedDeployment;

/// One line per deployment: status, project, URL, age.
///
/// In-progress deployments are marked with `*`.
pub fn render_table(deployments: &[EnrichedDeployment]) -> String {
    if deployments.is_empty() {
        return "No deployments found\n".to_string();
    }

    let name_width = deployments
        .iter()
        .map(|d| d.deployment.display_name().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for d in deployments {
        let marker = if d.status_class.is_in_progress() { '*' } else { ' ' };
        out.push_str(&format!(
            "{} {:<9} {:<width$}  {}  {}\n",
            marker,
            d.deployment.status_label(),
            d.deployment.display_name(),
            d.canonical_url,
            d.relative_age,
            width = name_width,
        ));
    }
    out
}
