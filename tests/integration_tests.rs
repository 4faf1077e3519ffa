use std::collections::BTreeSet;
use std::io::Write;

use attendance_insights::{
    department_attendance, job_role_attendance, overall_attendance, peer_rating_attendance,
    Dataset, Insight, Intent, IntentClassifier, QueryRouter, Rejection, Response, RouterConfig,
};
use env_logger::{Builder, Env};
use tempfile::NamedTempFile;

// Initialize test logger
fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

const EMPLOYEES: &str = "\
Employee ID,Name,Department,Job Role,Peer Rating,Attendance (%),Location
E01,Ann,Sales,Account Executive,4,90,Berlin
E02,Bob,Engineering,Developer,5,95,Paris
E03,Cid,Sales,Sales Manager,3,80,Berlin
E04,Dee,Engineering,Developer,4,85,Madrid
E05,Eve,Support,Support Agent,2,72.5,Paris
E06,Fay,Support,Support Agent,3,88,Berlin
E07,Gus,Engineering,Architect,5,91,Paris
";

fn write_csv(contents: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn load_employees() -> Result<Dataset, Box<dyn std::error::Error>> {
    let file = write_csv(EMPLOYEES)?;
    Ok(Dataset::from_path(file.path())?)
}

#[test]
fn test_department_example_from_two_teams() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let file = write_csv(
        "Department,Peer Rating,Job Role,Attendance (%)\n\
         Sales,3,Rep,90\n\
         Sales,4,Rep,80\n\
         Engineering,4,Dev,95\n\
         Engineering,5,Dev,85\n",
    )?;
    let dataset = Dataset::from_path(file.path())?;

    let result = department_attendance(&dataset);
    let pairs: Vec<(&str, f64)> = result.groups.iter().map(|g| (g.key.as_str(), g.mean)).collect();
    assert_eq!(pairs, vec![("Engineering", 90.0), ("Sales", 85.0)]);
    Ok(())
}

#[test]
fn test_department_means_cover_all_departments() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let result = department_attendance(&dataset);

    let means: Vec<f64> = result.means().collect();
    assert!(means.windows(2).all(|w| w[0] >= w[1]), "not descending: {:?}", means);

    let keys: BTreeSet<&str> = result.keys().collect();
    let departments: BTreeSet<&str> = dataset.records().iter().map(|r| r.department.as_str()).collect();
    assert_eq!(keys, departments);
    assert_eq!(result.len(), departments.len());
    Ok(())
}

#[test]
fn test_peer_rating_keys_ascending_and_complete() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let result = peer_rating_attendance(&dataset);

    let keys: Vec<&str> = result.keys().collect();
    assert_eq!(keys, vec!["2", "3", "4", "5"]);
    assert_eq!(result.get("5"), Some(93.0));
    Ok(())
}

#[test]
fn test_job_roles_sorted_descending() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let result = job_role_attendance(&dataset);

    let means: Vec<f64> = result.means().collect();
    assert!(means.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(result.keys().next(), Some("Architect"));
    assert_eq!(result.get("Developer"), Some(90.0));
    Ok(())
}

#[test]
fn test_overall_summary_bounds() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let summary = overall_attendance(&dataset);

    assert_eq!(summary.count, dataset.len());
    assert!(summary.min <= summary.mean && summary.mean <= summary.max);
    assert!(summary.min <= summary.q1 && summary.q1 <= summary.median);
    assert!(summary.median <= summary.q3 && summary.q3 <= summary.max);
    assert_eq!(summary.min, 72.5);
    assert_eq!(summary.max, 95.0);
    assert_eq!(summary.median, 88.0);
    Ok(())
}

#[test]
fn test_aggregations_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let before = dataset.clone();

    assert_eq!(department_attendance(&dataset), department_attendance(&dataset));
    assert_eq!(peer_rating_attendance(&dataset), peer_rating_attendance(&dataset));
    assert_eq!(job_role_attendance(&dataset), job_role_attendance(&dataset));
    assert_eq!(overall_attendance(&dataset), overall_attendance(&dataset));
    assert_eq!(dataset, before);
    Ok(())
}

#[test]
fn test_router_answers_each_kind_of_question() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dataset = load_employees()?;
    let router = QueryRouter::with_defaults()?;

    let cases = [
        ("Which department has the heighest attendance?", Intent::DepartmentAttendance),
        ("What is the average attendance by Employee Peer rating?", Intent::PeerRatingAttendance),
        ("Show attendance by roles.", Intent::JobRoleAttendance),
        ("Describe the attendance data", Intent::OverallAttendance),
    ];
    for (query, intent) in cases {
        let response = router.answer(query, &dataset);
        assert_eq!(response.insight().map(Insight::intent), Some(intent), "query {:?}", query);
    }

    match router.answer("Give overall attendance summary", &dataset) {
        Response::Answer(Insight::Summary { summary, .. }) => assert_eq!(summary.count, 7),
        other => panic!("expected a summary, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_weather_question_with_default_router() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let router = QueryRouter::with_defaults()?;

    let response = router.answer("What's the weather today?", &dataset);
    assert_eq!(response.insight().map(Insight::intent), Some(Intent::OverallAttendance));
    Ok(())
}

#[test]
fn test_weather_question_with_confidence_threshold() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let config = RouterConfig::default().with_min_confidence(Some(0.5));
    let router = QueryRouter::new(IntentClassifier::new()?, config)?;

    match router.answer("What's the weather today?", &dataset) {
        Response::NotUnderstood(Rejection::LowConfidence { confidence, threshold }) => {
            assert!(confidence < threshold);
            assert_eq!(threshold, 0.5);
        }
        other => panic!("expected a low-confidence rejection, got {:?}", other),
    }

    // a training phrase clears the same threshold
    assert!(router.answer("Attendance by peer rating", &dataset).is_understood());
    Ok(())
}

#[test]
fn test_routed_query_serializes_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_employees()?;
    let router = QueryRouter::with_defaults()?;

    let routed = router.route("Attendance in each department?", &dataset);
    let json: serde_json::Value = serde_json::to_value(&routed)?;
    assert_eq!(json["response"]["status"], "answer");
    assert_eq!(json["response"]["result"]["kind"], "table");
    assert_eq!(json["response"]["result"]["intent"], "department_attendance");
    assert_eq!(json["prediction"]["label"], "department_attendance");

    let rejected = router.route("zzz", &dataset);
    let json = serde_json::to_value(&rejected)?;
    assert_eq!(json["response"]["status"], "not_understood");
    assert_eq!(json["response"]["result"]["reason"], "unknown_vocabulary");
    Ok(())
}
