pub mod bulk;
pub mod error;
pub mod id;
pub mod sender;
pub mod template;
pub mod time;

pub use bulk::{BulkJob, JobStatus};
pub use error::{CoreError, Result};
pub use id::generate_id;
pub use sender::{Sender, SenderDraft, SenderPatch, SenderType};
pub use template::{Template, TemplateDraft, TemplatePatch, TemplateType};
pub use time::{Timestamp, now_utc};
