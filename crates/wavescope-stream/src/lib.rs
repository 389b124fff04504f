pub mod pipeline;
pub mod provider;
pub mod scheduler;
pub mod session;
pub mod viewer;
pub mod window;

// Public API
pub use pipeline::{render, RenderFrame, RenderOutcome};
pub use provider::{
    ChannelInfo, Chunk, InletOptions, StreamCandidate, StreamInlet, StreamMetadata,
    StreamProvider,
};
pub use scheduler::{Scheduler, SchedulerConfig, TaskHandle};
pub use session::StreamSession;
pub use viewer::Viewer;
pub use window::WindowBuffer;
