//! The query form: three text inputs, one submit action, an error region and
//! a result region.
//!
//! All state lives in [`SolarForm`] and is only written by the setters and by
//! [`SolarForm::submit`]. Since `submit` borrows the form mutably, a second
//! submission cannot start while one is pending. The response is applied
//! inside the `submit` future after its only `.await`, so dropping that
//! future (teardown, Ctrl-C) discards the response without touching state.

use std::fmt;

use crate::{
    error::QueryError,
    model::{Revision, SolarQuery, SolarResult},
    provider::nrel::NrelClient,
};

#[derive(Debug)]
pub struct SolarForm {
    revision: Revision,
    client: NrelClient,
    query: SolarQuery,
    result: Option<SolarResult>,
    error: Option<QueryError>,
}

impl SolarForm {
    pub fn new(revision: Revision, client: NrelClient) -> Self {
        Self { revision, client, query: SolarQuery::default(), result: None, error: None }
    }

    /// Form for a revision that takes its key from configuration instead of
    /// the user.
    pub fn with_configured_credential(
        revision: Revision,
        client: NrelClient,
        api_key: impl Into<String>,
    ) -> Self {
        let mut form = Self::new(revision, client);
        form.query.credential = api_key.into();
        form
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn set_latitude(&mut self, value: impl Into<String>) {
        self.query.latitude = value.into();
    }

    pub fn set_longitude(&mut self, value: impl Into<String>) {
        self.query.longitude = value.into();
    }

    pub fn set_credential(&mut self, value: impl Into<String>) {
        self.query.credential = value.into();
    }

    pub fn query(&self) -> &SolarQuery {
        &self.query
    }

    /// Last successful result. Not cleared by later failures.
    pub fn result(&self) -> Option<&SolarResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Text of the error region; empty when there is nothing to show.
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Validates the inputs, performs one request and records the outcome.
    ///
    /// On success the result is replaced and the error cleared. On failure
    /// only the error is set; the previous result stays.
    pub async fn submit(&mut self) -> Result<&SolarResult, QueryError> {
        if let Err(err) = self.query.validate(self.revision) {
            tracing::debug!("submission rejected: {err}");
            self.error = Some(err.clone());
            return Err(err);
        }

        match self.client.fetch(&self.query, self.revision).await {
            Ok(result) => {
                tracing::info!(
                    dni = result.dni_kwh_m2_day,
                    ghi = ?result.ghi_kwh_m2_day,
                    "solar resource received"
                );
                self.error = None;
                Ok(&*self.result.insert(result))
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn render(&self) -> Rendered {
        let mut rendered = Rendered::default();

        if let Some(err) = &self.error {
            rendered.error = Some(err.to_string());
        }

        if let Some(result) = &self.result {
            if self.revision.reads_ghi() {
                rendered.result.push(format!("Annual Average DNI: {}", result.dni_display()));
                rendered.result.push(format!("Annual Average GHI: {}", result.ghi_display()));
            } else {
                rendered
                    .result
                    .push(format!("Estimated Annual Solar Radiation: {}", result.dni_display()));
            }
        }

        rendered
    }
}

/// Visible output of the form: error region and result region, each
/// independently present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub error: Option<String>,
    pub result: Vec<String>,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.error.iter().chain(self.result.iter());
        for (i, line) in lines.enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
