//! Durable parameter storage port.

use crate::domain::error::FinstreamError;
use crate::domain::params::Parameters;

pub trait ParameterPort {
    /// `Ok(None)` when nothing has been stored yet. Malformed storage is an
    /// error, never a silent default.
    fn read(&self) -> Result<Option<Parameters>, FinstreamError>;

    /// Replaces everything previously stored.
    fn write(&self, params: &Parameters) -> Result<(), FinstreamError>;

    /// Stored parameters, or the defaults persisted on first run.
    fn load(&self) -> Result<Parameters, FinstreamError> {
        match self.read()? {
            Some(params) => Ok(params),
            None => {
                let params = Parameters::default();
                tracing::info!("no stored parameters, writing defaults");
                self.write(&params)?;
                Ok(params)
            }
        }
    }

    fn save(&self, params: &Parameters) -> Result<(), FinstreamError> {
        self.write(params)
    }
}
