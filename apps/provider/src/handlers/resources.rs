use authress_core::AppError;

use super::*;

pub async fn validate_resource_config_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ValidateResourceConfigRequest>,
) -> PluginResult<Json<DiagnosticsResponse>> {
    let diagnostics = state
        .provider
        .validate_resource_config(payload.type_name.as_str(), &payload.config)?;

    Ok(Json(diagnostics.into()))
}

pub async fn plan_resource_change_handler(
    State(state): State<PluginState>,
    Json(payload): Json<PlanResourceChangeRequest>,
) -> PluginResult<Json<PlanResourceChangeResponse>> {
    let resource = state.provider.resource(payload.type_name.as_str()).await?;
    let plan = resource.plan(payload.prior_state.as_ref(), payload.proposed_new_state);

    Ok(Json(PlanResourceChangeResponse {
        planned_state: plan.planned_state,
        requires_replace: plan.requires_replace,
        diagnostics: plan.diagnostics,
    }))
}

/// Dispatches an apply to create, update or delete from the state pair.
pub async fn apply_resource_change_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ApplyResourceChangeRequest>,
) -> PluginResult<Json<ResourceStateResponse>> {
    let resource = state.provider.resource(payload.type_name.as_str()).await?;

    let result = match (payload.prior_state.as_ref(), payload.planned_state.as_ref()) {
        (None, Some(planned)) => resource.create(planned).await,
        (Some(prior), Some(planned)) => resource.update(prior, planned).await,
        (Some(prior), None) => resource.delete(prior).await,
        (None, None) => {
            return Err(AppError::Validation(
                "apply requires a prior state, a planned state, or both".to_owned(),
            )
            .into());
        }
    };

    Ok(Json(ResourceStateResponse {
        new_state: result.new_state,
        diagnostics: result.diagnostics,
    }))
}

pub async fn read_resource_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ReadResourceRequest>,
) -> PluginResult<Json<ResourceStateResponse>> {
    let resource = state.provider.resource(payload.type_name.as_str()).await?;
    let result = resource.read(&payload.current_state).await;

    Ok(Json(ResourceStateResponse {
        new_state: result.new_state,
        diagnostics: result.diagnostics,
    }))
}

pub async fn import_resource_state_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ImportResourceStateRequest>,
) -> PluginResult<Json<ImportResourceStateResponse>> {
    let resource = state.provider.resource(payload.type_name.as_str()).await?;
    let result = resource.import_state(payload.id.as_str());

    Ok(Json(ImportResourceStateResponse {
        imported_resources: result
            .new_state
            .into_iter()
            .map(|state| ImportedResource {
                type_name: payload.type_name.clone(),
                state,
            })
            .collect(),
        diagnostics: result.diagnostics,
    }))
}
