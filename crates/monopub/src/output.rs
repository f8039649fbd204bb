use std::fmt::Write as _;

use monopub_operations::types::{GitState, PublishOutcome, PublishReport, ReleasePlan};

pub(crate) fn render_outcome(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::NoChanges => "No changed packages to publish.\n".to_string(),
        PublishOutcome::Declined => "Publish cancelled.\n".to_string(),
        PublishOutcome::DryRun(plan) => {
            let mut output = String::from("Dry run - no changes will be made.\n\n");
            render_plan(&mut output, plan);
            output
        }
        PublishOutcome::Completed(report) => render_report(report),
    }
}

fn render_plan(output: &mut String, plan: &ReleasePlan) {
    let _ = writeln!(output, "Planned releases ({} mode):", plan.mode);
    for (name, version) in &plan.versions {
        let _ = writeln!(output, "  {name} -> {version}");
    }
}

fn render_report(report: &PublishReport) -> String {
    let mut output = String::from("Released:\n");
    for (name, version) in &report.plan.versions {
        let published = report.published.iter().find(|t| &t.package == name);
        match published {
            Some(target) => {
                let _ = writeln!(output, "  {name}@{version} ({})", target.dist_tag);
            }
            None => {
                let _ = writeln!(output, "  {name}@{version} (not published)");
            }
        }
    }

    if !report.tags.is_empty() {
        let _ = writeln!(output, "\nTags: {}", report.tags.join(", "));
    }

    match report.git_state {
        GitState::Pushed => output.push_str("\nRelease commit and tags pushed.\n"),
        GitState::Reverted => output.push_str("\nCanary manifest changes restored.\n"),
        GitState::Idle => output.push_str("\nNo git changes were made.\n"),
        GitState::Staged | GitState::Committed | GitState::Tagged => {
            let _ = writeln!(output, "\nGit release stopped at: {}", report.git_state);
        }
    }
    output
}
