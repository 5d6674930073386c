//! Text generated for a proposed fix: commit message, branch name, PR title/body.
//! No I/O - all functions are data in, data out.

use super::types::PullRequestDraft;

/// Number of commit-hash characters embedded in a patch branch name.
pub const BRANCH_HASH_LEN: usize = 10;

/// Deterministic name of the branch carrying one rule's fix.
///
/// `<prefix>-<first 10 chars of commit>_<rule>`
pub fn patch_branch_name(prefix: &str, commit_id: &str, rule: &str) -> String {
    let short: String = commit_id.chars().take(BRANCH_HASH_LEN).collect();
    format!("{}-{}_{}", prefix, short, rule)
}

pub fn commit_message(tool_name: &str, rule: &str) -> String {
    format!("Proposal for patching the {} rule {}", tool_name, rule)
}

pub fn pull_request_title(tool_name: &str) -> String {
    format!("Fix {} violations", tool_name)
}

/// PR body: which rule was fixed, where it is documented, and how to opt out.
pub fn pull_request_body(tool_name: &str, rule_doc_url: &str, rule: &str) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "This PR fixes the violations for the following {} rule: \n",
        tool_name
    ));
    body.push_str(&format!("{}{}\n", rule_doc_url, rule));
    body.push_str(&format!(
        "If you do not want to receive automated PRs for {} warnings, reply to this PR with 'STOP'",
        tool_name
    ));
    body
}

pub fn pull_request_draft(
    tool_name: &str,
    rule_doc_url: &str,
    rule: &str,
    base_branch: &str,
    head_branch: &str,
) -> PullRequestDraft {
    PullRequestDraft {
        title: pull_request_title(tool_name),
        body: pull_request_body(tool_name, rule_doc_url, rule),
        base_branch: base_branch.to_string(),
        head_branch: head_branch.to_string(),
    }
}
