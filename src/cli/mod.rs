pub mod orchestration;

pub use orchestration::{
    ChangelogStep, ReleaseContext, ReleaseOutcome, ReleaseRequest, ReleaseWorkflow,
};
