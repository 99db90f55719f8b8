pub mod result;
pub mod runner;
pub mod step;
pub mod verify;

pub use result::{Verdict, WorkflowResult};
pub use runner::WorkflowRunner;
pub use step::{WorkflowStep, login_steps};
pub use verify::Verifier;
