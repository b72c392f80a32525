//! Well status, progress and dashboard figures

pub mod dashboard;
pub mod format;
pub mod phase_status;
pub mod progress;
pub mod well;

pub use dashboard::DashboardSummary;
pub use format::format_currency;
pub use phase_status::{PhaseStatus, phase_status};
pub use progress::{WellProgress, well_progress};
pub use well::{PhaseOperation, WellDetail};
