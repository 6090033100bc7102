pub mod firebase;
pub mod static_file;

use crate::config::CompanyConfig;
use crate::error::Result;
use crate::types::ScheduleSource;

/// Build the right source for a company: a static file reader when the
/// company is flagged as static, a remote database client otherwise.
pub fn create_source(company: &CompanyConfig) -> Result<Box<dyn ScheduleSource>> {
    if company.static_schedule {
        Ok(Box::new(static_file::StaticFileSource::new(
            company.clone(),
        )?))
    } else {
        Ok(Box::new(firebase::FirebaseSource::new(company.clone())?))
    }
}
