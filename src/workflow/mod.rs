pub mod cancel;
pub mod pipeline_state;
pub mod run_ctx;

pub use cancel::CancelToken;
pub use pipeline_state::{PipelineState, RunStateMachine};
pub use run_ctx::RunCtx;
