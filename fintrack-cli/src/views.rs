//! Plain-text renderings of the list, transfer and category views.

use crossterm::style::Stylize;
use fintrack_core::{format_amount, CategorySummary, TransactionRecord, TransferPair};

pub const NO_TRANSACTIONS: &str = "No transactions found. Upload a statement to get started.";
pub const NO_TRANSFERS: &str = "No linked transfers found.";
pub const CATEGORY_NOTICE: &str = "Category management will be available in the next update.\n\
For now, categories are automatically assigned by the AI.";

const DESCRIPTION_WIDTH: usize = 40;

pub fn render_transactions(txns: &[TransactionRecord], color: bool) -> String {
    if txns.is_empty() {
        return format!("{NO_TRANSACTIONS}\n");
    }

    let rows: Vec<[String; 4]> = txns
        .iter()
        .map(|t| {
            [
                t.date.clone(),
                truncate(&t.description, DESCRIPTION_WIDTH),
                t.category.clone().unwrap_or_default(),
                format_amount(t.amount),
            ]
        })
        .collect();

    let header = ["Date", "Description", "Category", "Amount"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}\n",
        header[0],
        header[1],
        header[2],
        header[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    for (row, txn) in rows.iter().zip(txns) {
        let amount = format!("{:>w$}", row[3], w = widths[3]);
        let amount = if color && txn.is_income() {
            amount.green().to_string()
        } else {
            amount
        };
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {}\n",
            row[0],
            row[1],
            row[2],
            amount,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        ));
    }
    out.push_str(&format!("\n{} transactions\n", txns.len()));
    out
}

pub fn render_transfers(pairs: &[TransferPair], color: bool) -> String {
    let mut out = String::from("Transfer Review\n\n");
    if pairs.is_empty() {
        out.push_str(NO_TRANSFERS);
        out.push('\n');
        return out;
    }

    for pair in pairs {
        let legs = pair.legs();
        let debit_amount = format_amount(legs.debit.amount);
        let credit_amount = format_amount(legs.credit.amount);
        let (debit_amount, credit_amount) = if color {
            (debit_amount.red().to_string(), credit_amount.green().to_string())
        } else {
            (debit_amount, credit_amount)
        };

        out.push_str(&format!(
            "{}  {}  {}\n  -> {}  {}  {}\n  unlink: fintrack transfers unlink {}\n\n",
            legs.debit.account_label(),
            legs.debit.date,
            debit_amount,
            legs.credit.account_label(),
            legs.credit.date,
            credit_amount,
            pair.unlink_id(),
        ));
    }
    out.push_str(&format!("{} linked transfers\n", pairs.len()));
    out
}

pub fn render_categories(summary: &[CategorySummary]) -> String {
    let mut out = format!("{CATEGORY_NOTICE}\n\n");
    if summary.is_empty() {
        out.push_str("No categories yet.\n");
        return out;
    }

    let name_width = summary
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());
    out.push_str(&format!("{:<name_width$}  {:>5}  {:>12}\n", "Category", "Count", "Total"));
    for s in summary {
        out.push_str(&format!(
            "{:<name_width$}  {:>5}  {:>12}\n",
            s.name,
            s.count,
            format_amount(s.total)
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(3)).collect();
    t.push_str("...");
    t
}
