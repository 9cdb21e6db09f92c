use std::{
    fmt::{self, Display},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration as StdDuration,
};

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock, time::sleep};

use crate::time;

use super::Task;

pub const TASK_RUNNER_API_PORT: u16 = 4646;

type ScheduledTasks = Arc<RwLock<Vec<ScheduledTask>>>;

struct ScheduledTask {
    next_execution: DateTime<Utc>,
    inner: Box<dyn Task + Send + Sync>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum RunnerMode {
    /// Execute tasks on their interval. Normal operation.
    Timer,
    /// Execute tasks only when triggered over the web API. Useful in testing.
    ManuallyTriggered,
    /// Interval execution with the web API also available, for poking at a
    /// production-like environment without interrupting normal operation.
    TimerAndManuallyTriggered,
}

impl RunnerMode {
    pub fn triggerable(&self) -> bool {
        matches!(
            self,
            Self::ManuallyTriggered | Self::TimerAndManuallyTriggered
        )
    }

    pub fn timer_based(&self) -> bool {
        matches!(self, Self::Timer | Self::TimerAndManuallyTriggered)
    }
}

impl Display for RunnerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Runs registered tasks on their interval, on demand over a small web
/// API, or both, depending on the mode.
///
/// Tasks run serially on the timer loop, so a task never overlaps a
/// previous invocation of itself.
pub struct TaskRunner {
    mode: RunnerMode,
    tasks: ScheduledTasks,
}

impl TaskRunner {
    pub fn new(mode: RunnerMode) -> Self {
        Self {
            mode,
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add_task(&self, task: impl Task + Send + Sync + 'static) -> &Self {
        tracing::debug!("Adding task '{}'", task.name());

        let mut tasks = self.tasks.write().await;

        tasks.push(ScheduledTask {
            // Run immediately on startup, then every `interval()`
            next_execution: time::now(),
            inner: Box::new(task),
        });

        self
    }

    pub async fn run(&mut self) {
        tracing::info!("Starting task runner in {} mode", self.mode);

        if self.mode.triggerable() {
            let tasks = self.tasks.clone();

            // The trigger API only exists for testing and operational
            // poking, so its failures are allowed to panic the server task
            tokio::task::spawn(async move {
                let app = Router::new()
                    .route("/tasks", get(get_tasks))
                    .route("/tasks/{name}/trigger", post(post_task_trigger))
                    .with_state(tasks);

                let socket_addr =
                    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), TASK_RUNNER_API_PORT);

                tracing::info!("Starting task trigger server on http://{:?}", socket_addr);

                let listener = TcpListener::bind(&socket_addr).await.expect("bind socket");

                axum::serve(listener, app)
                    .await
                    .expect("task trigger server to run")
            });
        }

        if self.mode.timer_based() {
            loop {
                // Open new scope so we don't sleep with the write lock held
                {
                    let mut tasks = self.tasks.write().await;
                    for task in tasks.iter_mut() {
                        let now = time::now();

                        if task.next_execution < now {
                            tracing::info!("Running task: {}", task.inner.name());

                            if let Err(e) = task.inner.run().await {
                                tracing::error!(
                                    "Failed to run task {}: {}",
                                    task.inner.name(),
                                    e
                                );
                            }

                            task.next_execution = now + task.inner.interval();
                        }
                    }
                }

                // Poll every second rather than sleeping until the next
                // task is due so that fake-time jumps are picked up promptly
                sleep(StdDuration::from_secs(1)).await;
            }
        } else {
            // Manual triggers only, nothing to do on this task
            loop {
                sleep(StdDuration::from_secs(60)).await;
            }
        }
    }
}

#[derive(Debug, Error)]
enum TaskError {
    #[error("task not found")]
    NotFound,
    #[error("task execution failed")]
    ExecutionFailed,
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let (status, err_msg): (StatusCode, String) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "task not found".into()),
            Self::ExecutionFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "task execution failed".into(),
            ),
        };

        tracing::error!("Error from task trigger server: {}", err_msg);

        let body = Json(json!({
            "error": err_msg,
        }));

        (status, body).into_response()
    }
}

async fn post_task_trigger(
    Path(name): Path<String>,
    State(tasks): State<ScheduledTasks>,
) -> Result<(), TaskError> {
    let mut tasks = tasks.write().await;

    let Some(task) = tasks.iter_mut().find(|task| task.inner.name() == name) else {
        return Err(TaskError::NotFound);
    };

    tracing::info!("Manually triggered task: {}", task.inner.name());

    if let Err(e) = task.inner.run().await {
        tracing::error!("Failed to manually run task {}: {}", task.inner.name(), e);
        return Err(TaskError::ExecutionFailed);
    }

    task.next_execution = time::now() + task.inner.interval();
    Ok(())
}

async fn get_tasks(State(tasks): State<ScheduledTasks>) -> Json<Vec<String>> {
    let tasks = tasks.read().await;

    let task_names = tasks.iter().map(|task| task.inner.name().to_string()).collect();

    Json(task_names)
}
