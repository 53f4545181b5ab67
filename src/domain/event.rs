//! The pull request a run is about.

/// Who triggered the run and which pull request it concerns.
///
/// Built once per process by [`crate::event::parse_event`]. For comment
/// triggered runs the branch and commit fields start out empty and are filled
/// from the pull request itself before planning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDescriptor {
    pub owner: String,
    pub repo: String,
    pub repo_remote: String,
    pub pr_number: u64,
    pub head_branch: String,
    pub head_commit: String,
    pub base_branch: String,
    pub is_comment: bool,
    /// Only set for comment triggered runs.
    pub sender_login: String,
    /// Body of the triggering comment, empty for pull request events.
    pub comment_body: String,
}

impl EventDescriptor {
    /// `owner/repo`, as used in REST paths and log lines.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Whether head and base are known, i.e. planning can start.
    pub fn has_refs(&self) -> bool {
        !self.head_branch.is_empty() && !self.head_commit.is_empty() && !self.base_branch.is_empty()
    }

    pub fn with_pull_request_refs(
        self,
        head_branch: String,
        head_commit: String,
        base_branch: String,
    ) -> Self {
        Self { head_branch, head_commit, base_branch, ..self }
    }
}
