//! Console formatting for activities and custom fields.

use std::io::{self, Write};

use serde_json::Value;

use crate::model::{Activity, CustomFieldValue, Transaction};

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn scalar(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `[offset:index] id form-name date type donation amount`, with the form name
/// padded to 30 columns.
pub fn activity_line(offset: u64, index: usize, activity: &Activity) -> String {
    format!(
        "[{:3}:{:3}] {} {:<30} {} {} {} {}",
        offset,
        index,
        text(&activity.activity_id),
        text(&activity.activity_form_name),
        text(&activity.activity_date),
        text(&activity.activity_type),
        text(&activity.donation_id),
        scalar(&activity.total_received_amount),
    )
}

pub fn transaction_line(transaction: &Transaction) -> String {
    format!(
        "Transaction: {} {} {} {} {} {} {}",
        text(&transaction.transaction_type),
        text(&transaction.reason),
        text(&transaction.date),
        scalar(&transaction.amount),
        scalar(&transaction.deductible_amount),
        scalar(&transaction.fees_paid),
        text(&transaction.gateway_transaction_id),
    )
}

pub fn end_of_search_line(offset: u64) -> String {
    format!("[{:5}:00] end of search", offset)
}

/// Writes `\t<fieldId> <name> <type> = '<value>'`, plus `\t*** <message>` for
/// the first error the server attached to the field.
pub fn write_custom_field<W: Write>(out: &mut W, field: &CustomFieldValue) -> io::Result<()> {
    writeln!(
        out,
        "\t{} {} {} = '{}'",
        text(&field.field_id),
        text(&field.name),
        text(&field.field_type),
        text(&field.value),
    )?;
    if let Some(error) = field.first_error() {
        writeln!(out, "\t*** {}", text(&error.message))?;
    }
    Ok(())
}

pub fn write_custom_fields<W: Write>(out: &mut W, fields: &[CustomFieldValue]) -> io::Result<()> {
    for field in fields {
        write_custom_field(out, field)?;
    }
    Ok(())
}
