//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//! Each handler validates its body at the boundary, then calls the core.

use super::{
    AppState,
    error::ApiError,
    messages::{goal_message, prediction_message, suggestion_message},
    types::{
        AverageRequest, AverageResponse, GoalRequest, GoalResponse, GradebookGoalRequest,
        GradebookGoalResponse, GradebookPredictRequest, GradebookPredictResponse,
        GradebookRequest, GradebookResponse, HealthResponse,
        PredictRequest, PredictResponse, SuggestRequest, SuggestResponse, TrendRequest,
        TrendResponse, resolve_count, to_gradebook,
    },
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use chemediaho_core::{
    Band, CSV_FILENAME, GradeScope, MediaError, current_average, export_csv,
    period_trend, plan_goal, predict_average,
    primitives::{validate_grades, validate_target},
    subject_trend, suggest_subjects,
};

/// Cap a requested suggestion limit to at least one entry.
fn suggestion_limit(requested: Option<usize>, state: &AppState) -> usize {
    requested
        .unwrap_or(state.config.grades.max_suggestions)
        .max(1)
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CALCULATOR HANDLERS
// =============================================================================

/// Average of a grade list.
pub async fn average_handler(
    payload: Result<Json<AverageRequest>, JsonRejection>,
) -> Result<Json<AverageResponse>, ApiError> {
    let Json(request) = payload?;
    validate_grades(&request.grades, true)?;

    let average = current_average(&request.grades).ok_or(MediaError::EmptyGrades)?;

    Ok(Json(AverageResponse {
        success: true,
        average,
        count: request.grades.len(),
        band: Band::of(average),
    }))
}

/// Grade(s) needed to reach a target average.
pub async fn goal_handler(
    payload: Result<Json<GoalRequest>, JsonRejection>,
) -> Result<Json<GoalResponse>, ApiError> {
    let Json(request) = payload?;
    validate_grades(&request.grades, false)?;
    let target = validate_target(request.target_average)?;
    let count = resolve_count(request.num_grades.as_ref())?;

    let goal = plan_goal(&request.grades, target, count);
    tracing::debug!(
        target_average = target,
        required = goal.required_grade,
        grade_count = goal.grade_count,
        "Goal planned"
    );

    let message = goal_message(&goal);
    Ok(Json(GoalResponse::new(goal, message)))
}

/// Average after hypothetical grades.
pub async fn predict_handler(
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    validate_grades(&request.grades, true)?;
    validate_grades(&request.predicted_grades, false)?;

    let prediction = predict_average(&request.grades, &request.predicted_grades)?;
    let message = prediction_message(&prediction);

    Ok(Json(PredictResponse::new(prediction, message)))
}

/// Subjects ranked by how easily each reaches the target.
pub async fn suggest_handler(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let Json(request) = payload?;
    let target = validate_target(request.target_average)?;
    for grades in request.subjects.values() {
        validate_grades(grades, false)?;
    }
    let count = resolve_count(request.num_grades.as_ref())?;

    let set = suggest_subjects(&request.subjects, target, count)
        .top(suggestion_limit(request.limit, &state));
    let message = suggestion_message(&set, None);

    Ok(Json(SuggestResponse {
        success: true,
        set,
        message,
    }))
}

// =============================================================================
// GRADE BOOK HANDLERS
// =============================================================================

/// Summary of a portal payload.
pub async fn gradebook_handler(
    State(state): State<AppState>,
    payload: Result<Json<GradebookRequest>, JsonRejection>,
) -> Result<Json<GradebookResponse>, ApiError> {
    let Json(request) = payload?;
    let policy = state.config.blue_policy(request.include_blue_grades);
    let book = to_gradebook(request.grades)?;

    tracing::debug!(grades = book.grade_count(), ?policy, "Grade book parsed");

    Ok(Json(GradebookResponse {
        success: true,
        subjects: book.subject_names().into_iter().map(String::from).collect(),
        summary: book.summary(policy),
    }))
}

/// Goal over a scope of a portal payload.
///
/// Period and overall scopes also rank the subjects that could lift them,
/// unless the scope already meets the target.
pub async fn gradebook_goal_handler(
    State(state): State<AppState>,
    payload: Result<Json<GradebookGoalRequest>, JsonRejection>,
) -> Result<Json<GradebookGoalResponse>, ApiError> {
    let Json(request) = payload?;
    let target = validate_target(request.target_average)?;
    let count = resolve_count(request.num_grades.as_ref())?;
    let scope = request.scope()?;
    let policy = state.config.blue_policy(request.include_blue_grades);
    let book = to_gradebook(request.grades)?;

    let values = book.scope_values(&scope, policy)?;
    let goal = plan_goal(&values, target, count);
    let message = goal_message(&goal);

    let per_subject = match &scope {
        _ if goal.already_met => None,
        GradeScope::Subject { .. } => None,
        GradeScope::Period { period } => Some(book.per_subject_values(Some(*period), policy)?),
        GradeScope::Overall => Some(book.per_subject_values(None, policy)?),
    };
    let suggestions = per_subject.map(|per_subject| {
        suggest_subjects(&per_subject, target, count).top(suggestion_limit(None, &state))
    });
    let suggestion_text = suggestions
        .as_ref()
        .map(|set| suggestion_message(set, Some(&scope)));

    Ok(Json(GradebookGoalResponse {
        result: GoalResponse::new(goal, message),
        scope: scope.to_string(),
        suggestions,
        suggestion_message: suggestion_text,
    }))
}

/// Average of a scope of a portal payload after hypothetical grades.
pub async fn gradebook_predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<GradebookPredictRequest>, JsonRejection>,
) -> Result<Json<GradebookPredictResponse>, ApiError> {
    let Json(request) = payload?;
    validate_grades(&request.predicted_grades, false)?;
    let scope = request.scope()?;
    let policy = state.config.blue_policy(request.include_blue_grades);
    let book = to_gradebook(request.grades)?;

    let values = book.scope_values(&scope, policy)?;
    let prediction = predict_average(&values, &request.predicted_grades)?;
    tracing::debug!(
        scope = %scope,
        change = prediction.change,
        "Scoped prediction"
    );
    let message = prediction_message(&prediction);

    Ok(Json(GradebookPredictResponse {
        result: PredictResponse::new(prediction, message),
        scope: scope.to_string(),
    }))
}

/// Running-average series of a subject, or period averages.
pub async fn trend_handler(
    State(state): State<AppState>,
    payload: Result<Json<TrendRequest>, JsonRejection>,
) -> Result<Json<TrendResponse>, ApiError> {
    let Json(request) = payload?;
    let policy = state.config.blue_policy(request.include_blue_grades);
    let book = to_gradebook(request.grades)?;

    let points = match request.subject.as_deref() {
        Some(subject) => subject_trend(&book, subject, policy)?,
        None => period_trend(&book, policy),
    };

    Ok(Json(TrendResponse {
        success: true,
        subject: request.subject,
        points,
    }))
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Every grade of the payload as a CSV attachment.
pub async fn export_csv_handler(
    payload: Result<Json<GradebookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let book = to_gradebook(request.grades)?;
    let data = export_csv(&book)?;

    tracing::info!("Exported {} grades ({} bytes)", book.grade_count(), data.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILENAME),
            ),
        ],
        data,
    ))
}
