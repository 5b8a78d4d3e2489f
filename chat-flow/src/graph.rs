use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    context::Context,
    error::{GraphError, Result},
    task::{NextAction, Task, TaskResult},
};

/// Upper bound on task executions for a single run unless overridden
pub const DEFAULT_MAX_STEPS: usize = 64;

/// Type alias for edge condition functions
pub type EdgeCondition = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// Edge between tasks in the graph
#[derive(Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: Option<EdgeCondition>,
}

/// An immutable graph of tasks. Build it once with [`GraphBuilder`] and run it
/// as many times as needed; every run gets its own [`Context`].
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
    max_steps: usize,
}

impl Graph {
    /// Run the graph from its start task until a task returns
    /// [`NextAction::End`] or no outgoing edge applies.
    pub async fn execute(&self, context: Context) -> Result<ExecutionResult> {
        let start = self
            .start_task_id
            .clone()
            .ok_or_else(|| GraphError::NoStartTask(self.id.clone()))?;
        self.execute_from(&start, context).await
    }

    /// Run the graph starting from a specific task
    pub async fn execute_from(&self, task_id: &str, context: Context) -> Result<ExecutionResult> {
        let mut current = task_id.to_string();
        let mut steps = 0;

        loop {
            if steps == self.max_steps {
                return Err(GraphError::StepLimitExceeded(self.max_steps));
            }
            steps += 1;

            let result = self.execute_single_task(&current, context.clone()).await?;

            match result.next_action {
                NextAction::End => {
                    return Ok(ExecutionResult {
                        response: result.response,
                        last_task_id: result.task_id,
                        steps,
                    });
                }
                NextAction::GoTo(target_id) => {
                    if !self.tasks.contains_key(&target_id) {
                        return Err(GraphError::TaskNotFound(target_id));
                    }
                    current = target_id;
                }
                NextAction::Continue => match self.find_next_task(&current, &context) {
                    Some(next_task_id) => current = next_task_id,
                    None => {
                        return Ok(ExecutionResult {
                            response: result.response,
                            last_task_id: result.task_id,
                            steps,
                        });
                    }
                },
            }
        }
    }

    async fn execute_single_task(&self, task_id: &str, context: Context) -> Result<TaskResult> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| GraphError::TaskNotFound(task_id.to_string()))?;

        debug!(graph_id = %self.id, task_id = %task_id, "executing task");
        let mut result = task.run(context).await?;
        result.task_id = task_id.to_string();

        Ok(result)
    }

    /// Find the next task: the first edge leaving `current_task_id` whose
    /// condition holds, in insertion order
    pub fn find_next_task(&self, current_task_id: &str, context: &Context) -> Option<String> {
        self.edges
            .iter()
            .filter(|edge| edge.from == current_task_id)
            .find(|edge| edge.condition.as_ref().is_none_or(|condition| condition(context)))
            .map(|edge| edge.to.clone())
    }

    pub fn start_task_id(&self) -> Option<&str> {
        self.start_task_id.as_deref()
    }

    pub fn get_task(&self, task_id: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(task_id).cloned()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph {
                id: id.into(),
                tasks: HashMap::new(),
                edges: Vec::new(),
                start_task_id: None,
                max_steps: DEFAULT_MAX_STEPS,
            },
        }
    }

    /// Add a task; the first task added becomes the start task
    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        let task_id = task.id().to_string();
        if self.graph.tasks.is_empty() {
            self.graph.start_task_id = Some(task_id.clone());
        }
        self.graph.tasks.insert(task_id, task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: None,
        });
        self
    }

    /// Route from `from` to `yes` when `condition` holds, otherwise to `no`
    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        condition: F,
        yes: impl Into<String>,
        no: impl Into<String>,
    ) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        let from = from.into();
        let condition: EdgeCondition = Arc::new(condition);
        let negated = {
            let condition = condition.clone();
            Arc::new(move |ctx: &Context| !condition(ctx)) as EdgeCondition
        };

        self.graph.edges.push(Edge {
            from: from.clone(),
            to: yes.into(),
            condition: Some(condition),
        });
        self.graph.edges.push(Edge {
            from,
            to: no.into(),
            condition: Some(negated),
        });
        self
    }

    /// Set the starting task; ignored when the task is unknown
    pub fn set_start_task(mut self, task_id: impl Into<String>) -> Self {
        let task_id = task_id.into();
        if self.graph.tasks.contains_key(&task_id) {
            self.graph.start_task_id = Some(task_id);
        }
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.graph.max_steps = max_steps;
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Outcome of a completed graph execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Response of the last task that ran
    pub response: Option<String>,
    pub last_task_id: String,
    pub steps: usize,
}
