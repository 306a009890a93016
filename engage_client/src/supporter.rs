//! Supporter lookup by email and the custom-field update round trip.

use std::io::{self, Write};

use log::{info, warn};
use thiserror::Error;

use crate::client::EngageApi;
use crate::config::UpdateConfig;
use crate::error::ApiError;
use crate::model::{Supporter, SupporterSearch};
use crate::printer;

#[derive(Debug, Error)]
pub enum SupporterError {
    #[error("Sorry, can't find supporter for '{email}'.")]
    NotFound { email: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

impl SupporterError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 1,
            Self::Api(err) => err.exit_code(),
            Self::Io(_) => 1,
        }
    }
}

/// Single-shot search by email. Only the first returned entry is considered,
/// and only if the server marked it `FOUND`.
pub async fn find_by_email<A: EngageApi>(api: &A, email: &str) -> Result<Option<Supporter>, ApiError> {
    let response = api.search_supporters(&SupporterSearch::by_email(email)).await?;
    Ok(response.supporters.into_iter().next().filter(Supporter::is_found))
}

async fn require_by_email<A: EngageApi>(api: &A, email: &str) -> Result<Supporter, SupporterError> {
    find_by_email(api, email)
        .await?
        .ok_or_else(|| SupporterError::NotFound {
            email: email.to_string(),
        })
}

/// Overwrites the value of the first custom field called `name`. Returns
/// false, leaving the record untouched, when there is no such field.
pub fn set_custom_field(supporter: &mut Supporter, name: &str, value: &str) -> bool {
    match supporter
        .custom_fields_mut()
        .iter_mut()
        .find(|field| field.name.as_deref() == Some(name))
    {
        Some(field) => {
            field.value = Some(value.to_string());
            true
        }
        None => false,
    }
}

/// Finds the supporter, rewrites the configured custom field, sends the whole
/// record back and then looks the supporter up again to show what the server
/// actually stored.
///
/// Output has three sections: `Before:` (the record as it is being sent),
/// `Error analysis:` (fields the server annotated with errors) and `After:`.
pub async fn update_custom_field<A, W>(
    api: &A,
    config: &UpdateConfig,
    out: &mut W,
) -> Result<Supporter, SupporterError>
where
    A: EngageApi,
    W: Write,
{
    let mut supporter = require_by_email(api, &config.email).await?;

    if !set_custom_field(&mut supporter, &config.field_name, &config.field_value) {
        warn!(
            "supporter for '{}' has no custom field named '{}', sending it unchanged",
            config.email, config.field_name
        );
    }

    writeln!(out, "\nBefore:")?;
    printer::write_custom_fields(out, supporter.custom_fields())?;

    let response = api.update_supporters(std::slice::from_ref(&supporter)).await?;

    writeln!(out, "\nError analysis:")?;
    if let Some(updated) = response.supporters.first() {
        for field in updated.custom_fields().iter().filter(|f| f.errors.is_some()) {
            printer::write_custom_field(out, field)?;
        }
    }

    // The update response is not trusted as the final state.
    let after = require_by_email(api, &config.email).await?;
    writeln!(out, "\nAfter:")?;
    printer::write_custom_fields(out, after.custom_fields())?;

    info!("updated '{}' for '{}'", config.field_name, config.email);
    Ok(after)
}

/// Writes the supporter record found for `email` as pretty-printed JSON.
pub async fn print_supporter_json<A, W>(api: &A, email: &str, out: &mut W) -> Result<Supporter, SupporterError>
where
    A: EngageApi,
    W: Write,
{
    let supporter = require_by_email(api, email).await?;
    let pretty = serde_json::to_string_pretty(&supporter).map_err(ApiError::from)?;
    writeln!(out, "{}", pretty)?;
    Ok(supporter)
}
