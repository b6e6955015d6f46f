//! Session log output port.

use crate::domain::error::VatraderError;
use crate::domain::session::SessionRecord;
use std::path::Path;

pub trait ReportPort {
    fn write(
        &self,
        code: &str,
        records: &[SessionRecord],
        output_path: &Path,
    ) -> Result<(), VatraderError>;
}
