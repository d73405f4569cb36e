//! Setup display formatting

use crate::models::Setup;

use super::truncate;

/// Format a list of setups as a table
pub fn format_setup_list(setups: &[Setup]) -> String {
    if setups.is_empty() {
        return "No setups found.".to_string();
    }

    let name_width = setups
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(4)
        .clamp(4, 30);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:>5}  {}\n",
        "ID",
        "Name",
        "Rules",
        "Description",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:->5}  {:-<20}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for setup in setups {
        let mut description = truncate(&setup.description, 40);
        if setup.is_deleted {
            description = format!("[deleted] {}", description);
        }
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:>5}  {}\n",
            setup.id.short(),
            truncate(&setup.name, name_width),
            setup.rules.len(),
            description,
            name_width = name_width,
        ));
    }

    output
}
