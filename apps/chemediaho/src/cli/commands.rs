//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! JSON mode prints the same bodies the HTTP API returns.

use crate::api::{
    self, AverageResponse, GoalResponse, GradebookResponse, NumGrades, PredictResponse,
    SuggestResponse, TrendResponse, goal_message, prediction_message, resolve_count,
    suggestion_message,
};
use crate::config::AppConfig;
use chemediaho_core::{
    Band, GradeBook, GradeScope, MediaError, PeriodId, current_average, export_csv,
    parse_gradebook, period_trend, plan_goal, predict_average,
    primitives::{validate_grades, validate_target},
    subject_trend, suggest_subjects,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT HELPERS
// =============================================================================

/// Maximum grades file size (10 MB).
const MAX_GRADES_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Where a goal or prediction takes its current grades from.
#[derive(Debug, Clone)]
pub enum GradeSource {
    /// Comma-separated list.
    List(String),
    /// Scope of a ClasseViva grades file.
    File {
        file: PathBuf,
        period: Option<u32>,
        subject: Option<String>,
    },
}

impl GradeSource {
    /// File scope when a file is given, the grade list otherwise.
    #[must_use]
    pub fn new(
        grades: String,
        file: Option<PathBuf>,
        period: Option<u32>,
        subject: Option<String>,
    ) -> Self {
        match file {
            Some(file) => Self::File {
                file,
                period,
                subject,
            },
            None => Self::List(grades),
        }
    }

    /// Current grades of the source, with the grade-book scope they came from.
    fn values(&self, config: &AppConfig) -> Result<(Vec<f64>, Option<GradeScope>), MediaError> {
        match self {
            Self::List(raw) => {
                let values = parse_grades(raw)?;
                validate_grades(&values, false)?;
                Ok((values, None))
            }
            Self::File {
                file,
                period,
                subject,
            } => {
                let book = load_gradebook(file)?;
                let scope = api::grade_scope(*period, subject.as_deref())?;
                let values = book.scope_values(&scope, config.blue_policy(None))?;
                Ok((values, Some(scope)))
            }
        }
    }
}

/// Parse a comma-separated grade list. Blank input is an empty list.
pub fn parse_grades(input: &str) -> Result<Vec<f64>, MediaError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| MediaError::ParseError(format!("Invalid grade '{}'", s)))
        })
        .collect()
}

/// Parse `NAME=6,7,8` subject arguments.
pub fn parse_subjects(args: &[String]) -> Result<BTreeMap<String, Vec<f64>>, MediaError> {
    let mut subjects = BTreeMap::new();
    for arg in args {
        let (name, grades) = arg.split_once('=').ok_or_else(|| {
            MediaError::ParseError(format!("Expected NAME=GRADES, got '{}'", arg))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(MediaError::ParseError(format!("Missing subject name in '{}'", arg)));
        }
        subjects.insert(name.to_string(), parse_grades(grades)?);
    }
    Ok(subjects)
}

/// Resolve the `--num-grades` argument.
fn parse_count(raw: &str) -> Result<chemediaho_core::GradeCount, MediaError> {
    resolve_count(Some(&NumGrades::Keyword(raw.to_string())))
}

/// Read and parse a ClasseViva grades file.
///
/// The path is canonicalized and its size checked before reading.
pub fn load_gradebook(path: &Path) -> Result<GradeBook, MediaError> {
    let canonical = path.canonicalize().map_err(|e| {
        MediaError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;
    if !canonical.is_file() {
        return Err(MediaError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| MediaError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_GRADES_FILE_SIZE {
        return Err(MediaError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_GRADES_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(&canonical)
        .map_err(|e| MediaError::IoError(format!("Read file: {}", e)))?;
    parse_gradebook(&text)
}

/// Validate the output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, MediaError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let canonical_parent = parent.canonicalize().map_err(|e| {
        MediaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    let filename = path
        .file_name()
        .ok_or_else(|| MediaError::IoError("Output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

/// Print a value as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), MediaError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| MediaError::ExportError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Format an optional average.
fn fmt_average(average: Option<f64>) -> String {
    average.map_or_else(|| "-".to_string(), |avg| format!("{:.2}", avg))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: AppConfig) -> Result<(), MediaError> {
    println!("che media ho? Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:        {}", config.server.host);
    println!("  Port:        {}", config.server.port);
    println!("  Rate limit:  {} req/s", config.security.rate_limit);
    println!("  Blue grades: {}", config.grades.include_blue_grades);
    println!();
    println!("Endpoints:");
    println!("  POST /average            - Average of a grade list");
    println!("  POST /goal               - Grade(s) needed for a target");
    println!("  POST /predict            - Average after hypothetical grades");
    println!("  POST /suggest            - Easiest subjects for a target");
    println!("  POST /gradebook          - Summary of a grades payload");
    println!("  POST /gradebook/goal     - Goal over a period or subject");
    println!("  POST /gradebook/predict  - Prediction over a period or subject");
    println!("  POST /gradebook/trend    - Trend series");
    println!("  POST /export/csv         - CSV export");
    println!("  GET  /health             - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// CALCULATOR COMMANDS
// =============================================================================

/// Average of a grade list.
pub fn cmd_average(json_mode: bool, grades: &str) -> Result<(), MediaError> {
    let grades = parse_grades(grades)?;
    validate_grades(&grades, true)?;
    let average = current_average(&grades).ok_or(MediaError::EmptyGrades)?;

    if json_mode {
        return print_json(&AverageResponse {
            success: true,
            average,
            count: grades.len(),
            band: Band::of(average),
        });
    }

    println!("Media: {:.2} ({} voti)", average, grades.len());
    Ok(())
}

/// Grade(s) needed for a target.
pub fn cmd_goal(
    config: &AppConfig,
    json_mode: bool,
    source: &GradeSource,
    target: f64,
    num_grades: &str,
) -> Result<(), MediaError> {
    let target = validate_target(target)?;
    let count = parse_count(num_grades)?;

    let (values, scope) = source.values(config)?;

    let goal = plan_goal(&values, target, count);
    let message = goal_message(&goal);

    if json_mode {
        return print_json(&GoalResponse::new(goal, message));
    }

    if let Some(scope) = scope {
        println!("Ambito:         {}", scope);
    }
    println!("Media attuale:  {}", fmt_average(goal.current_average));
    println!("Obiettivo:      {}", goal.target_average);
    println!(
        "Voti futuri:    {}{}",
        goal.grade_count,
        if goal.auto_calculated { " (auto)" } else { "" }
    );
    println!("Voto richiesto: {:.2} -> {}", goal.required_grade, goal.display_grade);
    println!();
    println!("{}", message);
    Ok(())
}

/// Average after hypothetical grades.
pub fn cmd_predict(
    config: &AppConfig,
    json_mode: bool,
    source: &GradeSource,
    predicted: &str,
) -> Result<(), MediaError> {
    let (grades, scope) = source.values(config)?;
    let predicted = parse_grades(predicted)?;
    validate_grades(&predicted, false)?;

    let prediction = predict_average(&grades, &predicted)?;
    let message = prediction_message(&prediction);

    if json_mode {
        return print_json(&PredictResponse::new(prediction, message));
    }

    if let Some(scope) = scope {
        println!("Ambito:          {}", scope);
    }
    println!("Media attuale:   {:.2}", prediction.current_average);
    println!("Media prevista:  {:.2}", prediction.predicted_average);
    println!("Variazione:      {:+.2}", prediction.change);
    println!();
    println!("{}", message);
    Ok(())
}

/// Subjects ranked by ease of reaching the target.
pub fn cmd_suggest(
    config: &AppConfig,
    json_mode: bool,
    subject_args: &[String],
    file: Option<&Path>,
    period: Option<u32>,
    target: f64,
    num_grades: &str,
    limit: Option<usize>,
) -> Result<(), MediaError> {
    let target = validate_target(target)?;
    let count = parse_count(num_grades)?;

    let (subjects, scope) = match file {
        Some(file) => {
            let book = load_gradebook(file)?;
            let period = period.map(PeriodId::new);
            let scope = match period {
                Some(period) => GradeScope::Period { period },
                None => GradeScope::Overall,
            };
            (
                book.per_subject_values(period, config.blue_policy(None))?,
                Some(scope),
            )
        }
        None => {
            let subjects = parse_subjects(subject_args)?;
            for grades in subjects.values() {
                validate_grades(grades, false)?;
            }
            (subjects, None)
        }
    };

    let set = suggest_subjects(&subjects, target, count)
        .top(limit.unwrap_or(config.grades.max_suggestions).max(1));
    let message = suggestion_message(&set, scope.as_ref());

    if json_mode {
        return print_json(&SuggestResponse {
            success: true,
            set,
            message,
        });
    }

    println!(
        "Obiettivo {} con {} voti{}",
        set.target_average,
        set.grade_count,
        if set.auto_calculated { " (auto)" } else { "" }
    );
    println!();
    for (rank, s) in set.suggestions.iter().enumerate() {
        println!(
            "  {}. {:<24} media {:.2} ({} voti) -> serve {:.2} ({})",
            rank + 1,
            s.subject,
            s.current_average,
            s.num_current_grades,
            s.required_grade,
            s.display_grade
        );
    }
    println!();
    println!("{}", message);
    Ok(())
}

// =============================================================================
// GRADE BOOK COMMANDS
// =============================================================================

/// Summary of a grades file.
pub fn cmd_summary(config: &AppConfig, json_mode: bool, file: &Path) -> Result<(), MediaError> {
    let book = load_gradebook(file)?;
    let policy = config.blue_policy(None);
    let summary = book.summary(policy);

    if json_mode {
        return print_json(&GradebookResponse {
            success: true,
            subjects: book.subject_names().into_iter().map(String::from).collect(),
            summary,
        });
    }

    println!("Riepilogo voti");
    println!("==============");
    println!("Voti totali:    {}", summary.grade_count);
    println!("Media generale: {}", fmt_average(summary.overall_average));
    for period in &summary.periods {
        println!();
        println!("Periodo {} - media {}", period.period, fmt_average(period.average));
        for subject in &period.subjects {
            println!(
                "  {:<24} {:>6}  ({} voti)",
                subject.subject,
                fmt_average(subject.average),
                subject.count
            );
        }
    }
    Ok(())
}

/// Trend series of a grades file.
pub fn cmd_trend(
    config: &AppConfig,
    json_mode: bool,
    file: &Path,
    subject: Option<&str>,
) -> Result<(), MediaError> {
    let book = load_gradebook(file)?;
    let policy = config.blue_policy(None);
    let points = match subject {
        Some(subject) => subject_trend(&book, subject, policy)?,
        None => period_trend(&book, policy),
    };

    if json_mode {
        return print_json(&TrendResponse {
            success: true,
            subject: subject.map(String::from),
            points,
        });
    }

    for point in &points {
        match point.grade {
            Some(grade) => println!("{:<12} voto {:>5}  media {:.2}", point.label, grade, point.average),
            None => println!("{:<12} media {:.2}", point.label, point.average),
        }
    }
    Ok(())
}

/// Export a grades file to CSV.
pub fn cmd_export(file: &Path, output: &Path) -> Result<(), MediaError> {
    let validated_output = validate_output_path(output)?;
    let book = load_gradebook(file)?;
    let data = export_csv(&book)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| MediaError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} grades ({} bytes) to {:?}",
        book.grade_count(),
        data.len(),
        validated_output
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAYLOAD: &str = r#"{"grades": [
        {"subjectDesc": "MATEMATICA", "periodPos": 2, "decimalValue": 6.0, "evtDate": "2024-10-01"},
        {"subjectDesc": "MATEMATICA", "periodPos": 2, "decimalValue": 8.0, "evtDate": "2024-10-20"},
        {"subjectDesc": "INGLESE", "periodPos": 3, "decimalValue": 7.5}
    ]}"#;

    fn payload_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(PAYLOAD.as_bytes()).expect("write payload");
        file
    }

    #[test]
    fn test_parse_grades() {
        assert_eq!(parse_grades("6, 7.5,8").expect("valid"), vec![6.0, 7.5, 8.0]);
        assert!(parse_grades("").expect("blank").is_empty());
        assert!(matches!(parse_grades("6,sette"), Err(MediaError::ParseError(_))));
    }

    #[test]
    fn test_parse_subjects() {
        let args = vec!["ARTE=6,7".to_string(), "STORIA = 8".to_string()];
        let subjects = parse_subjects(&args).expect("valid");
        assert_eq!(subjects.get("ARTE"), Some(&vec![6.0, 7.0]));
        assert_eq!(subjects.get("STORIA"), Some(&vec![8.0]));

        assert!(parse_subjects(&["ARTE".to_string()]).is_err());
        assert!(parse_subjects(&["=6".to_string()]).is_err());
    }

    #[test]
    fn test_parse_count_bounds() {
        assert!(parse_count("auto").is_ok());
        assert!(parse_count("10").is_ok());
        assert!(parse_count("11").is_err());
        assert!(parse_count("0").is_err());
    }

    #[test]
    fn test_load_gradebook() {
        let file = payload_file();
        let book = load_gradebook(file.path()).expect("valid file");
        assert_eq!(book.grade_count(), 3);
        assert!(book.period(PeriodId::new(1)).is_ok());
        assert!(book.period(PeriodId::new(2)).is_ok());
    }

    #[test]
    fn test_load_gradebook_missing_file() {
        let result = load_gradebook(Path::new("/nonexistent/voti.json"));
        assert!(matches!(result, Err(MediaError::IoError(_))));
    }

    #[test]
    fn test_export_writes_csv() {
        let file = payload_file();
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("voti.csv");

        cmd_export(file.path(), &output).expect("export");

        let csv = std::fs::read_to_string(&output).expect("read csv");
        assert!(csv.starts_with("Periodo,Materia,Voto"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_goal_from_file_scope() {
        let file = payload_file();
        let source = GradeSource::File {
            file: file.path().to_path_buf(),
            period: Some(1),
            subject: Some("MATEMATICA".to_string()),
        };
        assert!(cmd_goal(&AppConfig::default(), true, &source, 7.5, "1").is_ok());

        let missing = GradeSource::File {
            file: file.path().to_path_buf(),
            period: Some(1),
            subject: Some("LATINO".to_string()),
        };
        assert!(matches!(
            cmd_goal(&AppConfig::default(), true, &missing, 7.5, "1"),
            Err(MediaError::SubjectNotFound(_))
        ));
    }

    #[test]
    fn test_goal_rejects_bad_target() {
        let source = GradeSource::List("6,7".to_string());
        assert!(matches!(
            cmd_goal(&AppConfig::default(), true, &source, 11.0, "1"),
            Err(MediaError::TargetOutOfRange(_))
        ));
    }

    #[test]
    fn test_predict_from_file_scope() {
        let file = payload_file();
        let source = GradeSource::new(
            String::new(),
            Some(file.path().to_path_buf()),
            Some(1),
            Some("MATEMATICA".to_string()),
        );
        let (values, scope) = source.values(&AppConfig::default()).expect("scope");
        assert_eq!(values, vec![6.0, 8.0]);
        assert_eq!(scope.expect("file scope").to_string(), "MATEMATICA (periodo 1)");

        assert!(cmd_predict(&AppConfig::default(), true, &source, "10").is_ok());
    }

    #[test]
    fn test_predict_from_list_needs_grades() {
        let source = GradeSource::new(String::new(), None, None, None);
        assert!(matches!(
            cmd_predict(&AppConfig::default(), true, &source, "8"),
            Err(MediaError::EmptyGrades)
        ));
    }

    #[test]
    fn test_file_scope_period_zero_reads_first_period() {
        let file = payload_file();
        let source =
            GradeSource::new(String::new(), Some(file.path().to_path_buf()), Some(0), None);
        let (values, _) = source.values(&AppConfig::default()).expect("first period");
        assert_eq!(values, vec![6.0, 8.0]);
    }
}
