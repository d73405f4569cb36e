//! Backup display formatting

use chrono::{DateTime, Utc};

use crate::models::BackupSummary;

/// Format backup summaries, newest first as given
pub fn format_backup_list(backups: &[BackupSummary], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<19}  {:>9}  {:>8}  {:>8}  {:>6}\n",
        "ID", "Created", "Age", "Accounts", "Trades", "Setups"
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<19}  {:->9}  {:->8}  {:->8}  {:->6}\n",
        "", "", "", "", "", ""
    ));

    for backup in backups {
        output.push_str(&format!(
            "{:<12}  {:<19}  {:>9}  {:>8}  {:>8}  {:>6}\n",
            backup.id.short(),
            backup.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_age(now.signed_duration_since(backup.timestamp)),
            backup.accounts,
            backup.trades,
            backup.setups,
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} backup(s)\n", backups.len()));
    output
}

/// Human-readable age such as "3h" or "2d"
pub fn format_age(age: chrono::Duration) -> String {
    if age.num_days() > 0 {
        format!("{}d", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m", age.num_minutes())
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackupId;
    use chrono::Duration;

    #[test]
    fn test_format_backup_list() {
        let now = Utc::now();
        let summary = BackupSummary {
            id: BackupId::new(),
            timestamp: now - Duration::hours(3),
            accounts: 2,
            trades: 14,
            setups: 3,
        };

        let output = format_backup_list(&[summary], now);
        assert!(output.contains(&summary.id.short()));
        assert!(output.contains("3h"));
        assert!(output.contains("14"));
        assert!(output.contains("Total: 1 backup(s)"));
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(10)), "just now");
        assert_eq!(format_age(Duration::minutes(5)), "5m");
        assert_eq!(format_age(Duration::days(2)), "2d");
    }
}
