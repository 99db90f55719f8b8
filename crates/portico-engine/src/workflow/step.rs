use super::runner::WorkflowRunner;
use crate::backend::Backend;
use futures::future::BoxFuture;
use tracing::info;

/// A step's operation: runs against the live runner and reports success.
pub type StepAction<B> = for<'a> fn(&'a mut WorkflowRunner<B>) -> BoxFuture<'a, bool>;

/// A named unit of work. Steps run in list order.
pub struct WorkflowStep<B: Backend> {
    pub name: &'static str,
    pub action: StepAction<B>,
}

impl<B: Backend> WorkflowStep<B> {
    pub fn new(name: &'static str, action: StepAction<B>) -> Self {
        Self { name, action }
    }
}

/// The fixed login sequence.
pub fn login_steps<B: Backend>() -> Vec<WorkflowStep<B>> {
    vec![
        WorkflowStep::new("initialize", initialize::<B>),
        WorkflowStep::new("navigate", navigate::<B>),
        WorkflowStep::new("fill-username", fill_username::<B>),
        WorkflowStep::new("fill-password", fill_password::<B>),
        WorkflowStep::new("submit", submit::<B>),
    ]
}

fn initialize<B: Backend>(runner: &mut WorkflowRunner<B>) -> BoxFuture<'_, bool> {
    Box::pin(runner.initialize())
}

fn navigate<B: Backend>(runner: &mut WorkflowRunner<B>) -> BoxFuture<'_, bool> {
    Box::pin(runner.navigate())
}

fn fill_username<B: Backend>(runner: &mut WorkflowRunner<B>) -> BoxFuture<'_, bool> {
    Box::pin(async move {
        let group = runner.config().selectors.username.clone();
        let username = runner.config().username.clone();
        let filled = runner.fill_field(&group, &username).await;
        if filled {
            info!("Username filled: {}", username);
        }
        filled
    })
}

fn fill_password<B: Backend>(runner: &mut WorkflowRunner<B>) -> BoxFuture<'_, bool> {
    Box::pin(async move {
        let group = runner.config().selectors.password.clone();
        let password = runner.config().password.clone();
        let filled = runner.fill_field(&group, &password).await;
        if filled {
            info!("Password filled");
        }
        filled
    })
}

fn submit<B: Backend>(runner: &mut WorkflowRunner<B>) -> BoxFuture<'_, bool> {
    Box::pin(async move {
        let group = runner.config().selectors.login_button.clone();
        runner.submit(&group).await
    })
}
