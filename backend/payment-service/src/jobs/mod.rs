pub mod reconcile;

pub use reconcile::{ReconcileError, ReconcileJob, ReconcileOptions, ReconcileSummary};
