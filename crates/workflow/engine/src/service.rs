//! Workflow service: the facade the API layer talks to
//!
//! Composes an injected store with the validator, the transition
//! evaluator and the permission matcher. Every definition handed out
//! or routed against has passed validation. Errors from the store are
//! propagated unchanged.

use crate::evaluator::{AlwaysTrue, ConditionEvaluator, EvaluationContext, TransitionEvaluator};
use crate::permissions::can_transition;
use crate::store::{WorkflowStore, WritableWorkflowStore};
use crate::validator::Validator;
use routeflow_types::{Step, WorkflowDefinition, WorkflowId, WorkflowResult};

/// Routing facade over a workflow store
#[derive(Clone, Debug)]
pub struct WorkflowService<S, C = AlwaysTrue> {
    store: S,
    validator: Validator,
    evaluator: TransitionEvaluator<C>,
}

impl<S: WorkflowStore> WorkflowService<S, AlwaysTrue> {
    /// Create a service with the always-true condition evaluator
    pub fn new(store: S) -> Self {
        Self::with_evaluator(store, TransitionEvaluator::new())
    }
}

impl<S: WorkflowStore, C: ConditionEvaluator> WorkflowService<S, C> {
    pub fn with_evaluator(store: S, evaluator: TransitionEvaluator<C>) -> Self {
        Self {
            store,
            validator: Validator::new(),
            evaluator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a definition and validate it before handing it out
    pub async fn get_definition(
        &self,
        id: &WorkflowId,
        version: Option<u32>,
    ) -> WorkflowResult<WorkflowDefinition> {
        let definition = self.store.get_definition(id, version).await?;
        self.validator.validate(&definition)?;
        Ok(definition)
    }

    /// Latest definition per workflow id, as held by the store
    pub async fn list_definitions(&self) -> WorkflowResult<Vec<WorkflowDefinition>> {
        self.store.list_definitions().await
    }

    /// Next steps of the latest version of `id` that the actor may enter
    pub async fn allowed_next_steps<R, P>(
        &self,
        id: &WorkflowId,
        current_step_id: &str,
        context: &EvaluationContext,
        user_roles: &[R],
        user_perms: &[P],
    ) -> WorkflowResult<Vec<Step>>
    where
        R: AsRef<str> + Sync,
        P: AsRef<str> + Sync,
    {
        let definition = self.get_definition(id, None).await?;
        let candidates = self
            .evaluator
            .next_steps(&definition, current_step_id, context)
            .await;
        Ok(filter_permitted(candidates, user_roles, user_perms))
    }

    /// Route within an already validated definition
    pub async fn permitted_next_steps<R, P>(
        &self,
        definition: &WorkflowDefinition,
        current_step_id: &str,
        context: &EvaluationContext,
        user_roles: &[R],
        user_perms: &[P],
    ) -> Vec<Step>
    where
        R: AsRef<str> + Sync,
        P: AsRef<str> + Sync,
    {
        let candidates = self
            .evaluator
            .next_steps(definition, current_step_id, context)
            .await;
        filter_permitted(candidates, user_roles, user_perms)
    }
}

impl<S: WritableWorkflowStore, C: ConditionEvaluator> WorkflowService<S, C> {
    /// Validate a definition and store it as an active version
    pub async fn publish(&self, definition: WorkflowDefinition) -> WorkflowResult<()> {
        self.validator.validate(&definition)?;
        let (id, version) = definition.key();
        let replaced = self.store.put_definition(definition).await?;
        tracing::info!(
            workflow_id = %id,
            version,
            replaced = replaced.is_some(),
            "Workflow definition published"
        );
        Ok(())
    }
}

fn filter_permitted<R: AsRef<str>, P: AsRef<str>>(
    candidates: Vec<Step>,
    user_roles: &[R],
    user_perms: &[P],
) -> Vec<Step> {
    candidates
        .into_iter()
        .filter(|step| can_transition(step, user_roles, user_perms))
        .collect()
}
