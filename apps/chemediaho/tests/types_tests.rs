//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chemediaho::api::{
    ErrorResponse, GoalRequest, GoalResponse, GradebookGoalRequest, GradebookPredictRequest,
    HealthResponse, NumGrades, SuggestRequest, grade_scope, resolve_count,
};
use chemediaho_core::{GradeCount, GradeScope, PeriodId, plan_goal};

// =============================================================================
// HEALTH / ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_error_response_serialization() {
    let json = serde_json::to_string(&ErrorResponse::new("Nessun voto")).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"error\":\"Nessun voto\""));
}

// =============================================================================
// NUM GRADES TESTS
// =============================================================================

#[test]
fn test_num_grades_accepts_number_or_auto() {
    let req: GoalRequest =
        serde_json::from_str(r#"{"grades":[6],"target_average":7,"num_grades":3}"#).unwrap();
    assert_eq!(req.num_grades, Some(NumGrades::Count(3)));

    let req: GoalRequest =
        serde_json::from_str(r#"{"grades":[6],"target_average":7,"num_grades":"auto"}"#).unwrap();
    assert_eq!(
        resolve_count(req.num_grades.as_ref()).unwrap(),
        GradeCount::Auto
    );
}

#[test]
fn test_num_grades_defaults_to_one() {
    let req: GoalRequest = serde_json::from_str(r#"{"target_average":7}"#).unwrap();
    assert!(req.grades.is_empty());
    assert!(req.num_grades.is_none());
    assert_eq!(resolve_count(None).unwrap(), GradeCount::default());
}

#[test]
fn test_num_grades_range() {
    assert!(NumGrades::Count(10).resolve().is_ok());
    assert!(NumGrades::Count(0).resolve().is_err());
    assert!(NumGrades::Count(11).resolve().is_err());
    assert!(NumGrades::Keyword("4".to_string()).resolve().is_ok());
    assert!(NumGrades::Keyword("12".to_string()).resolve().is_err());
}

#[test]
fn test_negative_num_grades_is_rejected_by_parser() {
    let result: Result<GoalRequest, _> =
        serde_json::from_str(r#"{"grades":[6],"target_average":7,"num_grades":-2}"#);
    assert!(result.is_err());
}

// =============================================================================
// GOAL RESPONSE TESTS
// =============================================================================

#[test]
fn test_goal_response_flattens_goal() {
    let goal = plan_goal(&[6.0, 7.0, 8.0], 7.5, GradeCount::default());
    let response = GoalResponse::new(goal, "msg".to_string());

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["required_grade"], 9.0);
    assert_eq!(value["display_grade"], 9.0);
    assert_eq!(value["feasibility"], "reachable");
    assert_eq!(value["effort"], "demanding");
    assert_eq!(value["band"], "excellent");
    assert_eq!(value["required_grades"], serde_json::json!([9.0]));

    let back: GoalResponse = serde_json::from_value(value).unwrap();
    assert_eq!(back.goal.grade_count, 1);
}

// =============================================================================
// SCOPE TESTS
// =============================================================================

fn goal_request(period: Option<u32>, subject: Option<&str>) -> GradebookGoalRequest {
    GradebookGoalRequest {
        grades: Vec::new(),
        include_blue_grades: None,
        period,
        subject: subject.map(String::from),
        target_average: 7.0,
        num_grades: None,
    }
}

#[test]
fn test_gradebook_goal_scope() {
    assert_eq!(
        goal_request(Some(2), Some("ARTE")).scope().unwrap(),
        GradeScope::Subject {
            period: PeriodId::new(2),
            subject: "ARTE".to_string()
        }
    );
    assert_eq!(
        goal_request(Some(1), None).scope().unwrap(),
        GradeScope::Period { period: PeriodId::new(1) }
    );
    assert_eq!(goal_request(None, None).scope().unwrap(), GradeScope::Overall);
    assert!(goal_request(None, Some("ARTE")).scope().is_err());
}

#[test]
fn test_scope_period_zero_is_first_period() {
    assert_eq!(
        grade_scope(Some(0), None).unwrap(),
        GradeScope::Period {
            period: PeriodId::new(1)
        }
    );
    assert_eq!(
        goal_request(Some(0), Some("ARTE")).scope().unwrap(),
        GradeScope::Subject {
            period: PeriodId::new(1),
            subject: "ARTE".to_string()
        }
    );
}

#[test]
fn test_gradebook_predict_request_scope() {
    let req: GradebookPredictRequest =
        serde_json::from_str(r#"{"period":2,"predicted_grades":[8,9]}"#).unwrap();
    assert!(req.grades.is_empty());
    assert_eq!(req.predicted_grades, vec![8.0, 9.0]);
    assert_eq!(
        req.scope().unwrap(),
        GradeScope::Period {
            period: PeriodId::new(2)
        }
    );

    let req: GradebookPredictRequest =
        serde_json::from_str(r#"{"subject":"ARTE","predicted_grades":[8]}"#).unwrap();
    assert!(req.scope().is_err());
}

#[test]
fn test_suggest_request_deserialization() {
    let req: SuggestRequest = serde_json::from_str(
        r#"{"subjects":{"ARTE":[6,7],"STORIA":[]},"target_average":7.5,"num_grades":"auto","limit":2}"#,
    )
    .unwrap();
    assert_eq!(req.subjects.len(), 2);
    assert_eq!(req.limit, Some(2));
    assert_eq!(req.num_grades, Some(NumGrades::Keyword("auto".to_string())));
}
