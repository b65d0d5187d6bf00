//! Task service: the save, lookup and execution surfaces
//!
//! [`TaskService`] ties the command validator, a [`TaskStore`], a
//! [`ProcessRunner`] and an [`ExecutionLog`] together. Every operation is a
//! synchronous unit of work on the calling thread; the service holds no
//! mutable state of its own.

use chrono::Utc;
use tracing::{debug, info};

use taskrun_config::DEFAULT_TARGET;
use taskrun_runner::{NativeRunner, ProcessRunner, Shell};
use taskrun_store::TaskStore;
use taskrun_utils::error::TaskRunError;
use taskrun_utils::logging;
use taskrun_utils::task_id::sanitize_task_id;
use taskrun_utils::types::{Task, TaskDraft, TaskExecution};
use taskrun_validation::CommandValidator;

use crate::execution_log::{ExecutionLog, TracingExecutionLog};

const NEVER_VALIDATED: &str = "its command never passed the safety check";

/// Save, look up and execute tasks.
///
/// # Example
///
/// ```rust
/// use taskrun_engine::TaskService;
/// use taskrun_store::InMemoryTaskStore;
/// use taskrun_utils::types::TaskDraft;
///
/// let service = TaskService::new(InMemoryTaskStore::new());
/// let task = service.save(TaskDraft::new("list", "echo hello")).unwrap();
/// assert!(task.is_validated());
///
/// let err = service.save(TaskDraft::new("wipe", "rm -rf /tmp/x")).unwrap_err();
/// assert!(err.to_string().contains("rm "));
/// ```
#[derive(Debug)]
pub struct TaskService<S, R = NativeRunner, L = TracingExecutionLog> {
    store: S,
    runner: R,
    log: L,
    shell: Shell,
    default_target: String,
}

impl<S: TaskStore> TaskService<S> {
    /// Service over `store` running commands natively through the platform
    /// shell, logging through `tracing`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            runner: NativeRunner::new(),
            log: TracingExecutionLog,
            shell: Shell::default(),
            default_target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl<S, R, L> TaskService<S, R, L>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    /// Replace the process runner.
    #[must_use]
    pub fn with_runner<R2: ProcessRunner>(self, runner: R2) -> TaskService<S, R2, L> {
        TaskService {
            store: self.store,
            runner,
            log: self.log,
            shell: self.shell,
            default_target: self.default_target,
        }
    }

    /// Replace the execution log.
    #[must_use]
    pub fn with_log<L2: ExecutionLog>(self, log: L2) -> TaskService<S, R, L2> {
        TaskService {
            store: self.store,
            runner: self.runner,
            log,
            shell: self.shell,
            default_target: self.default_target,
        }
    }

    /// Run commands through `shell` instead of the platform default.
    #[must_use]
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// Label recorded when [`execute`](Self::execute) gets no target.
    #[must_use]
    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = target.into();
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Validate a draft's command and persist it.
    ///
    /// A client-supplied id is sanitized first. Saving over an existing id
    /// replaces name and command but keeps the stored execution history.
    ///
    /// # Errors
    ///
    /// `Validation` when the command is unsafe or the id is unusable; the
    /// store is not touched in that case. `Store` when persistence fails.
    pub fn save(&self, draft: TaskDraft) -> Result<Task, TaskRunError> {
        check_command(&draft.command)?;
        let id = draft.id.as_deref().map(sanitize_task_id).transpose()?;
        self.store_validated(id, draft.name, draft.command)
    }

    /// Change the name and/or command of an existing task.
    ///
    /// The merged command is validated exactly as [`save`](Self::save) does.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` does not resolve, then as for `save`.
    pub fn update(
        &self,
        id: &str,
        name: Option<String>,
        command: Option<String>,
    ) -> Result<Task, TaskRunError> {
        let existing = self.find_by_id(id)?;
        let command = command.unwrap_or(existing.command);
        check_command(&command)?;
        self.store_validated(
            Some(existing.id.unwrap_or_else(|| id.to_string())),
            name.unwrap_or(existing.name),
            command,
        )
    }

    /// Run a task's command and append the result to its history.
    ///
    /// The command is not re-validated; a task that never passed validation
    /// is refused instead. A non-zero exit status is not an error.
    ///
    /// # Errors
    ///
    /// * `NotFound` - `id` does not resolve
    /// * `Rejected` - the task has no validation stamp
    /// * `Io` / `Interrupted` - the process could not be run to completion;
    ///   nothing is recorded
    /// * `Store` - the updated history could not be persisted
    pub fn execute(&self, id: &str, target: Option<&str>) -> Result<TaskExecution, TaskRunError> {
        let target = target.unwrap_or(&self.default_target);
        let mut task = self.find_by_id(id)?;

        if !task.is_validated() {
            debug!(task_id = %id, "Refusing to run unvalidated task");
            return Err(TaskRunError::Rejected {
                id: id.to_string(),
                reason: NEVER_VALIDATED.to_string(),
            });
        }

        let span = logging::execution_span(id, target);
        let _guard = span.enter();

        self.log.started(id, &task, target);

        let output = match self.runner.run(&self.shell.script(&task.command)) {
            Ok(output) => output,
            Err(err) => {
                let err = TaskRunError::from(err);
                self.log.failed(id, &err);
                return Err(err);
            }
        };

        let execution = TaskExecution::new(
            output.started_at,
            output.finished_at,
            output.merged_output(),
        );
        self.log.completed(id, &output, &execution);

        task.record_execution(execution.clone());
        self.store.save(task)?;

        Ok(execution)
    }

    pub fn find_all(&self) -> Result<Vec<Task>, TaskRunError> {
        Ok(self.store.find_all()?)
    }

    /// # Errors
    ///
    /// `NotFound` when `id` does not resolve.
    pub fn find_by_id(&self, id: &str) -> Result<Task, TaskRunError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| TaskRunError::NotFound { id: id.to_string() })
    }

    /// Tasks whose name contains `name`, ignoring case. May be empty.
    pub fn search_by_name(&self, name: &str) -> Result<Vec<Task>, TaskRunError> {
        Ok(self.store.find_by_name_containing(name)?)
    }

    /// Remove a task together with its history.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` does not resolve.
    pub fn delete(&self, id: &str) -> Result<(), TaskRunError> {
        if self.store.delete_by_id(id)? {
            info!(task_id = %id, "Task deleted");
            Ok(())
        } else {
            Err(TaskRunError::NotFound { id: id.to_string() })
        }
    }

    /// Execution history of a task, oldest first.
    ///
    /// With a `limit`, only the most recent `limit` records are returned
    /// (still oldest first).
    pub fn history(&self, id: &str, limit: Option<usize>) -> Result<Vec<TaskExecution>, TaskRunError> {
        let mut executions = self.find_by_id(id)?.executions;
        if let Some(limit) = limit {
            let skip = executions.len().saturating_sub(limit);
            executions.drain(..skip);
        }
        Ok(executions)
    }

    fn store_validated(
        &self,
        id: Option<String>,
        name: String,
        command: String,
    ) -> Result<Task, TaskRunError> {
        let executions = match &id {
            Some(id) => self
                .store
                .find_by_id(id)?
                .map(|existing| existing.executions)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let task = Task {
            id,
            name,
            command,
            validated_at: Some(Utc::now()),
            executions,
        };

        let saved = self.store.save(task)?;
        info!(
            task_id = saved.id.as_deref().unwrap_or_default(),
            name = %saved.name,
            "Task saved"
        );
        Ok(saved)
    }
}

fn check_command(command: &str) -> Result<(), TaskRunError> {
    CommandValidator::check(Some(command)).map_err(|reason| {
        debug!(%reason, "Rejected task command");
        TaskRunError::Validation {
            reason: reason.to_string(),
        }
    })
}
