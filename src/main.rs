//! Stdin/stdout JSON adapter.
//!
//! Reads one solve request document from stdin, writes one response
//! document to stdout, and exits non-zero only on `ERROR`. Infeasible
//! and unknown verdicts are ordinary responses with exit code zero.

use std::io::Read;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use shift_planner::cp::SolverConfig;
use shift_planner::engine::plan;
use shift_planner::protocol::{SolveRequest, SolveResponse};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        error!("failed to read request from stdin: {err}");
        return ExitCode::FAILURE;
    }

    let response = handle(&input);
    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!("failed to encode response: {err}");
            return ExitCode::FAILURE;
        }
    }

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn handle(input: &str) -> SolveResponse {
    let request: SolveRequest = match serde_json::from_str(input) {
        Ok(request) => request,
        Err(err) => {
            return SolveResponse {
                status: "ERROR".to_string(),
                schedule: None,
                objective_value: None,
                start_date: None,
                message: Some(format!("invalid request document: {err}")),
                problems: vec![err.to_string()],
                diagnostics: Vec::new(),
                solve_time_ms: 0,
            }
        }
    };

    let problem = request.to_problem();
    let config = request.planner_config();

    match plan(&problem, &config, &SolverConfig::default()) {
        Ok(outcome) => SolveResponse::from_outcome(&outcome, request.start_date),
        Err(error) => SolveResponse::from_error(&error, request.start_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rejects_invalid_json() {
        let response = handle("not json");
        assert!(response.is_error());
        assert!(response.message.unwrap().contains("invalid request document"));
    }

    #[test]
    fn test_handle_solves_a_small_request() {
        let response = handle(
            r#"{
                "staff_list": [
                    {"id": 1, "name": "A"},
                    {"id": 2, "name": "B"},
                    {"id": 3, "name": "C"}
                ],
                "days": 3,
                "start_date": "2026-04-06",
                "early_need": 1,
                "late_need": 1,
                "config": {"objective": "None"}
            }"#,
        );

        assert!(!response.is_error(), "status was {}", response.status);
        let schedule = response.schedule.expect("feasible request");
        assert_eq!(schedule.len(), 3);
        assert!(schedule.values().all(|days| days.len() == 3));
        assert_eq!(response.start_date.as_deref(), Some("2026-04-06"));
    }

    #[test]
    fn test_handle_reports_malformed_problem() {
        let response = handle(r#"{"staff_list": [{"id": 1, "name": "A"}], "days": 0}"#);
        assert!(response.is_error());
        assert!(!response.problems.is_empty());
    }
}
