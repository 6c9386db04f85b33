//! crates/legal_shield_core/src/parsing.rs
//!
//! Turns the model's free-form reply into an `AnalysisReport`. Models often
//! wrap JSON in a markdown code fence, so the fence is removed before decoding.

use serde_json::Value;

use crate::domain::{AnalysisReport, MAX_RISK_SCORE, MIN_RISK_SCORE};
use crate::ports::{PortError, PortResult};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns the payload inside the first markdown code fence, or the whole
/// reply when there is none. The result is trimmed.
///
/// A "```json" fence wins over a bare one. An unterminated fence runs to the
/// end of the text.
pub fn strip_code_fence(content: &str) -> &str {
    let inner = if let Some(start) = content.find(JSON_FENCE) {
        let rest = &content[start + JSON_FENCE.len()..];
        rest.find(FENCE).map_or(rest, |end| &rest[..end])
    } else if let Some(start) = content.find(FENCE) {
        let rest = &content[start + FENCE.len()..];
        rest.find(FENCE).map_or(rest, |end| &rest[..end])
    } else {
        content
    };
    inner.trim()
}

/// Decodes the model's reply into an `AnalysisReport`.
///
/// Any JSON object is accepted as-is. The one field inspected is
/// `overall_risk_score`, and only when it is an integer: it must lie in 1-10.
pub fn parse_analysis(content: &str) -> PortResult<AnalysisReport> {
    let payload = strip_code_fence(content);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| PortError::UpstreamParse(e.to_string()))?;

    let Value::Object(report) = value else {
        return Err(PortError::UpstreamParse(format!(
            "expected a JSON object, got: {}",
            value
        )));
    };

    if let Some(score) = report.get("overall_risk_score").and_then(Value::as_i64) {
        if !(MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&score) {
            return Err(PortError::UpstreamParse(format!(
                "overall_risk_score {} is outside {}-{}",
                score, MIN_RISK_SCORE, MAX_RISK_SCORE
            )));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYLOAD: &str = r#"{"overall_risk_score":7,"risky_clauses":[{"clause_text":"Tenant forfeits the deposit.","risk_level":"high","explanation":"One-sided.","suggestion":"Cap it."}],"summary":"ok","negotiation_points":["deposit"]}"#;

    #[test]
    fn all_fence_styles_yield_the_same_payload() {
        let fenced_json = format!("Here you go:\n```json\n{}\n```\nGood luck!", PAYLOAD);
        let bare = format!("```\n{}\n```", PAYLOAD);

        assert_eq!(strip_code_fence(&fenced_json), PAYLOAD);
        assert_eq!(strip_code_fence(&bare), PAYLOAD);
        assert_eq!(strip_code_fence(PAYLOAD), PAYLOAD);
        assert_eq!(strip_code_fence(&format!("  {}\n", PAYLOAD)), PAYLOAD);
    }

    #[test]
    fn stripping_is_idempotent() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        let once = strip_code_fence(&fenced);
        assert_eq!(strip_code_fence(once), once);
    }

    #[test]
    fn json_fence_takes_precedence_over_an_earlier_bare_fence() {
        let content = format!("```\nnoise\n```\n```json\n{}\n```", PAYLOAD);
        assert_eq!(strip_code_fence(&content), PAYLOAD);
    }

    #[test]
    fn unterminated_fence_runs_to_the_end() {
        let content = format!("```json\n{}", PAYLOAD);
        assert_eq!(strip_code_fence(&content), PAYLOAD);
    }

    #[test]
    fn parses_a_fenced_reply() {
        let report = parse_analysis(&format!("```json\n{}\n```", PAYLOAD)).unwrap();
        assert_eq!(report["overall_risk_score"], 7);
        assert_eq!(report["risky_clauses"][0]["risk_level"], "high");
        assert_eq!(report["negotiation_points"], json!(["deposit"]));
        assert!(!report.contains_key("filename"));
    }

    #[test]
    fn values_outside_the_requested_schema_are_kept() {
        let reply = r#"{"overall_risk_score":7,"risky_clauses":[{"clause_text":"c","risk_level":"critical","explanation":"e","suggestion":"s"}],"summary":"ok","negotiation_points":[],"key_dates":["2025-03-01"]}"#;
        let report = parse_analysis(reply).unwrap();

        assert_eq!(report["risky_clauses"][0]["risk_level"], "critical");
        assert_eq!(report["key_dates"], json!(["2025-03-01"]));
        let original: Value = serde_json::from_str(reply).unwrap();
        assert_eq!(Value::Object(report), original);
    }

    #[test]
    fn non_integer_scores_pass_through() {
        let float_score = PAYLOAD.replace("\"overall_risk_score\":7", "\"overall_risk_score\":7.0");
        let report = parse_analysis(&float_score).unwrap();
        assert_eq!(report["overall_risk_score"], json!(7.0));

        let missing_score = r#"{"summary":"no score given"}"#;
        assert!(parse_analysis(missing_score).is_ok());
    }

    #[test]
    fn non_object_json_is_an_upstream_parse_error() {
        for reply in ["[1, 2, 3]", "\"just a string\"", "42"] {
            assert!(matches!(parse_analysis(reply), Err(PortError::UpstreamParse(_))));
        }
    }

    #[test]
    fn malformed_json_is_an_upstream_parse_error() {
        let err = parse_analysis("```json\n{\"overall_risk_score\": \n```").unwrap_err();
        assert!(matches!(err, PortError::UpstreamParse(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn prose_reply_is_an_upstream_parse_error() {
        let err = parse_analysis("I cannot analyze this contract.").unwrap_err();
        assert!(matches!(err, PortError::UpstreamParse(_)));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let zero = PAYLOAD.replace("\"overall_risk_score\":7", "\"overall_risk_score\":0");
        let eleven = PAYLOAD.replace("\"overall_risk_score\":7", "\"overall_risk_score\":11");

        assert!(matches!(parse_analysis(&zero), Err(PortError::UpstreamParse(_))));
        assert!(matches!(parse_analysis(&eleven), Err(PortError::UpstreamParse(_))));
    }
}
