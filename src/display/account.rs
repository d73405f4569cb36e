//! Account display formatting

use crate::models::Account;

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let broker_width = accounts
        .iter()
        .map(|a| a.broker.as_deref().unwrap_or("").len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<broker_width$}  {:<8}  {:>12}  {}\n",
        "ID",
        "Name",
        "Broker",
        "Currency",
        "Initial",
        "Status",
        name_width = name_width,
        broker_width = broker_width,
    ));

    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<broker_width$}  {:-<8}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        broker_width = broker_width,
    ));

    for account in accounts {
        let status = if account.is_deleted {
            "Deleted"
        } else if account.restored_at.is_some() {
            "Restored"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<broker_width$}  {:<8}  {:>12.2}  {}\n",
            account.id.short(),
            account.name,
            account.broker.as_deref().unwrap_or(""),
            account.currency,
            account.initial_balance,
            status,
            name_width = name_width,
            broker_width = broker_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountDraft;

    #[test]
    fn test_format_account_list() {
        let demo = Account::new(AccountDraft::named("Demo"));
        let mut funded = Account::new(AccountDraft {
            name: "Funded 100k".into(),
            broker: Some("FTMO".into()),
            currency: None,
            initial_balance: 100_000.0,
        });
        funded.is_deleted = true;

        let output = format_account_list(&[demo, funded]);
        assert!(output.contains("Demo"));
        assert!(output.contains("Funded 100k"));
        assert!(output.contains("FTMO"));
        assert!(output.contains("100000.00"));
        assert!(output.contains("Deleted"));
    }

    #[test]
    fn test_format_empty_account_list() {
        assert_eq!(format_account_list(&[]), "No accounts found.");
    }
}
