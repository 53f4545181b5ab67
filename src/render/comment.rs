//! Pull request comment rendering for plan-preview results.

use crate::domain::{ApplicationInfo, EventDescriptor, PlanPreviewResult};

const DETAILS_BEGIN: &str = "---DETAILS_BEGIN---";
const DETAILS_END: &str = "---DETAILS_END---";

/// Render the comment body for `result`.
///
/// Sections always appear in the same order: planned applications, failed
/// applications, failed pipeds. Each list is numbered from 1 on its own and
/// a section is only written when it has entries.
pub fn render_comment(event: &EventDescriptor, result: &PlanPreviewResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("@{}, ", event.sender_login));

    if result.is_empty() {
        out.push_str("This pull request does not touch any applications\n");
        return out;
    }

    out.push_str(&format!("Here are plan-preview result for commit {}:\n", event.head_commit));

    if !result.applications.is_empty() {
        let count = result.applications.len();
        if count > 1 {
            out.push_str(&format!("\nHere are plan-preview for {count} applications:\n"));
        } else {
            out.push_str("\nHere are plan-preview for 1 application:\n");
        }
        for (i, app) in result.applications.iter().enumerate() {
            push_app_line(&mut out, i + 1, &app.info);
            out.push_str(&format!("  sync strategy: {}\n", app.sync_strategy));
            out.push_str(&format!("  summary: {}\n", app.plan_summary));
            push_details(&mut out, &app.plan_details);
        }
    }

    if !result.failure_applications.is_empty() {
        let count = result.failure_applications.len();
        if count > 1 {
            out.push_str(&format!(
                "\nNOTE: An error occurred while building plan-preview for the following {count} applications:\n"
            ));
        } else {
            out.push_str(
                "\nNOTE: An error occurred while building plan-preview for the following application:\n",
            );
        }
        for (i, app) in result.failure_applications.iter().enumerate() {
            push_app_line(&mut out, i + 1, &app.info);
            out.push_str(&format!("  reason: {}\n", app.reason));
            if !app.plan_details.is_empty() {
                push_details(&mut out, &app.plan_details);
            }
        }
    }

    if !result.failure_pipeds.is_empty() {
        let count = result.failure_pipeds.len();
        if count > 1 {
            out.push_str(&format!(
                "\nNOTE: An error occurred while building plan-preview for applications of the following {count} Pipeds:\n"
            ));
        } else {
            out.push_str(
                "\nNOTE: An error occurred while building plan-preview for applications of the following Piped:\n",
            );
        }
        for (i, piped) in result.failure_pipeds.iter().enumerate() {
            out.push_str(&format!("\n{}. piped: {}\n", i + 1, piped.info.id));
            out.push_str(&format!("  reason: {}\n", piped.reason));
        }
    }

    out
}

fn push_app_line(out: &mut String, number: usize, info: &ApplicationInfo) {
    out.push_str(&format!(
        "\n{}. app: {}, env: {}, kind: {}\n",
        number, info.name, info.env_name, info.kind
    ));
}

// Details are copied verbatim between the sentinels.
fn push_details(out: &mut String, details: &str) {
    out.push_str(&format!("  details:\n\n  {DETAILS_BEGIN}\n{details}\n  {DETAILS_END}\n"));
}

#[cfg(test)]
mod tests {
    use super::render_comment;
    use crate::domain::{
        ApplicationInfo, ApplicationKind, ApplicationResult, EventDescriptor, FailureApplication,
        FailurePiped, PipedInfo, PlanPreviewResult, SyncStrategy,
    };
    use similar_asserts::assert_eq;

    fn event() -> EventDescriptor {
        EventDescriptor {
            owner: "acme".to_string(),
            repo: "deploys".to_string(),
            pr_number: 12,
            head_commit: "abc123".to_string(),
            is_comment: true,
            sender_login: "alice".to_string(),
            ..Default::default()
        }
    }

    fn info(name: &str, env: &str, kind: ApplicationKind) -> ApplicationInfo {
        ApplicationInfo {
            name: name.to_string(),
            env_name: env.to_string(),
            kind,
            ..Default::default()
        }
    }

    fn success(name: &str, details: &str) -> ApplicationResult {
        ApplicationResult {
            info: info(name, "prod", ApplicationKind::Kubernetes),
            sync_strategy: SyncStrategy::QuickSync,
            plan_summary: "2 resources changed".to_string(),
            plan_details: details.to_string(),
        }
    }

    fn failure(name: &str, details: &str) -> FailureApplication {
        FailureApplication {
            info: info(name, "dev", ApplicationKind::Terraform),
            reason: "failed to plan".to_string(),
            plan_details: details.to_string(),
        }
    }

    fn piped(id: &str) -> FailurePiped {
        FailurePiped {
            info: PipedInfo { id: id.to_string(), url: String::new() },
            reason: "unreachable".to_string(),
        }
    }

    #[test]
    fn empty_result_says_nothing_is_touched() {
        let body = render_comment(&event(), &PlanPreviewResult::default());
        assert_eq!(body.as_str(), "@alice, This pull request does not touch any applications\n");
    }

    #[test]
    fn missing_sender_is_rendered_as_is() {
        let event = EventDescriptor { sender_login: String::new(), ..event() };
        let body = render_comment(&event, &PlanPreviewResult::default());
        assert!(body.starts_with("@, This pull request"));
    }

    #[test]
    fn single_application() {
        let result =
            PlanPreviewResult { applications: vec![success("svc-a", "diff...")], ..Default::default() };
        let body = render_comment(&event(), &result);
        assert_eq!(
            body.as_str(),
            "@alice, Here are plan-preview result for commit abc123:\n\
             \n\
             Here are plan-preview for 1 application:\n\
             \n\
             1. app: svc-a, env: prod, kind: KUBERNETES\n  sync strategy: QUICK_SYNC\n  summary: 2 resources changed\n  details:\n\n  ---DETAILS_BEGIN---\ndiff...\n  ---DETAILS_END---\n"
        );
        assert!(!body.contains("NOTE"));
    }

    #[test]
    fn plural_headers_carry_the_count() {
        let result = PlanPreviewResult {
            applications: vec![success("a", ""), success("b", ""), success("c", "")],
            failure_applications: vec![failure("d", ""), failure("e", "")],
            failure_pipeds: vec![piped("p1"), piped("p2"), piped("p3"), piped("p4")],
        };
        let body = render_comment(&event(), &result);
        assert!(body.contains("\nHere are plan-preview for 3 applications:\n"));
        assert!(body.contains(
            "\nNOTE: An error occurred while building plan-preview for the following 2 applications:\n"
        ));
        assert!(body.contains(
            "\nNOTE: An error occurred while building plan-preview for applications of the following 4 Pipeds:\n"
        ));
        assert!(!body.contains("1 application:"));
    }

    #[test]
    fn singular_headers_for_each_failure_section() {
        let result = PlanPreviewResult {
            failure_applications: vec![failure("d", "")],
            failure_pipeds: vec![piped("p1")],
            ..Default::default()
        };
        let body = render_comment(&event(), &result);
        assert!(body.contains(
            "\nNOTE: An error occurred while building plan-preview for the following application:\n"
        ));
        assert!(body.contains(
            "\nNOTE: An error occurred while building plan-preview for applications of the following Piped:\n"
        ));
        assert!(!body.contains("Here are plan-preview for"));
    }

    #[test]
    fn numbering_restarts_per_section() {
        let result = PlanPreviewResult {
            applications: vec![success("a", "x"), success("b", "y")],
            failure_applications: vec![failure("c", ""), failure("d", "")],
            failure_pipeds: vec![piped("p1"), piped("p2")],
        };
        let body = render_comment(&event(), &result);
        assert!(body.contains("\n1. app: a, env: prod, kind: KUBERNETES\n"));
        assert!(body.contains("\n2. app: b, env: prod, kind: KUBERNETES\n"));
        assert!(body.contains("\n1. app: c, env: dev, kind: TERRAFORM\n"));
        assert!(body.contains("\n2. app: d, env: dev, kind: TERRAFORM\n"));
        assert!(body.contains("\n1. piped: p1\n  reason: unreachable\n"));
        assert!(body.contains("\n2. piped: p2\n  reason: unreachable\n"));
        assert!(!body.contains("\n3. "));
    }

    #[test]
    fn failure_details_block_only_when_present() {
        let result = PlanPreviewResult {
            failure_applications: vec![failure("c", ""), failure("d", "partial output")],
            ..Default::default()
        };
        let body = render_comment(&event(), &result);
        assert_eq!(body.matches("---DETAILS_BEGIN---").count(), 1);
        assert!(body.contains(
            "\n1. app: c, env: dev, kind: TERRAFORM\n  reason: failed to plan\n\n2. app: d"
        ));
        assert!(body.contains(
            "  reason: failed to plan\n  details:\n\n  ---DETAILS_BEGIN---\npartial output\n  ---DETAILS_END---\n"
        ));
    }

    #[test]
    fn pipeds_never_get_details() {
        let result =
            PlanPreviewResult { failure_pipeds: vec![piped("p1")], ..Default::default() };
        let body = render_comment(&event(), &result);
        assert!(!body.contains("details:"));
        assert!(!body.contains("---DETAILS_BEGIN---"));
    }

    #[test]
    fn sections_follow_fixed_order() {
        let json = r#"{
            "FailurePipeds": [{"PipedID": "p1", "Reason": "down"}],
            "FailureApplications": [{"ApplicationName": "f", "ApplicationKind": "LAMBDA", "Reason": "bad"}],
            "Applications": [{"ApplicationName": "s", "ApplicationKind": "ECS", "SyncStrategy": "PIPELINE"}]
        }"#;
        let result = PlanPreviewResult::from_json(json.as_bytes()).expect("decode");
        let body = render_comment(&event(), &result);

        let ok = body.find("Here are plan-preview for 1 application").expect("successes");
        let failed_apps = body.find("for the following application:").expect("failed apps");
        let failed_pipeds = body.find("of the following Piped:").expect("failed pipeds");
        assert!(ok < failed_apps && failed_apps < failed_pipeds);
        assert!(body.contains("  sync strategy: PIPELINE\n  summary: \n"));
    }

    #[test]
    fn multiline_details_are_kept_verbatim() {
        let details = "--- a\n+++ b\n@@ -1 +1 @@\n-replicas: 1\n+replicas: 2";
        let result =
            PlanPreviewResult { applications: vec![success("svc", details)], ..Default::default() };
        let body = render_comment(&event(), &result);
        assert!(body.contains(&format!("---DETAILS_BEGIN---\n{details}\n  ---DETAILS_END---")));
    }
}
