pub mod app_stores;
pub mod command_runner;
pub mod package_update;
pub mod preflight;
pub mod reboot;
pub mod snapshot;
pub mod step;
pub mod tool_locator;

#[cfg(test)]
pub mod testing;

pub use app_stores::StoreRefreshStep;
pub use command_runner::SystemRunner;
pub use package_update::PackageUpdateStep;
pub use preflight::{NetworkCheck, PrivilegeCheck, Reachability, TcpProbe};
pub use reboot::RebootCheckStep;
pub use snapshot::SnapshotStep;
pub use step::{Step, StepContext};
pub use tool_locator::PathLocator;
