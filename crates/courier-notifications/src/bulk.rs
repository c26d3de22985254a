use tracing::info;

use courier_core::BulkJob;

use crate::error::NotificationError;
use crate::types::BulkSendRequest;

/// Maximum number of data rows a bulk request may carry.
pub const MAX_BULK_ROWS: usize = 50_000;

/// Validates the shape and size of a bulk send request and creates the
/// pending job record.
///
/// Admission is a pure gate: rows are not parsed, the template id is not
/// dereferenced, and no message is delivered here. The first row (or csv
/// line) is the header and is excluded from the count.
pub fn admit(request: &BulkSendRequest) -> Result<BulkJob, NotificationError> {
    let row_count = match (&request.rows, &request.csv) {
        (Some(rows), _) => rows.len().saturating_sub(1),
        (None, Some(csv)) => csv.split('\n').count().saturating_sub(1),
        (None, None) => {
            return Err(NotificationError::bad_request(
                "You should specify either rows or csv",
            ));
        }
    };

    if row_count > MAX_BULK_ROWS {
        return Err(NotificationError::bad_request(format!(
            "Too many rows. Maximum number of rows allowed is {MAX_BULK_ROWS}"
        )));
    }

    let job = BulkJob::pending(request.template_id.clone(), row_count);
    info!(
        job_id = %job.id,
        template_id = %request.template_id,
        notification_count = row_count,
        "Admitted bulk job"
    );
    Ok(job)
}
