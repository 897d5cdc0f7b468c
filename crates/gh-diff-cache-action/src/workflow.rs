//! Diagnostic logging of the current workflow run

use gh_client::GitHubClient;
use gh_diff_cache::Repository;
use log::{info, warn};

/// Log which workflow file the run belongs to
///
/// Purely informational, a failed lookup only warns.
pub async fn log_workflow(client: &dyn GitHubClient, repository: &Repository, run_id: u64) {
    match client
        .fetch_workflow_run(&repository.owner, &repository.name, run_id)
        .await
    {
        Ok(run) => {
            info!("Workflow: {}", run.workflow_url);
            if let Some(path) = run.path {
                info!("Workflow file: {}", path);
            }
        }
        Err(e) => warn!("Failed to look up workflow run {}: {:#}", run_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gh_client::{ChangedFile, GitTree, RepoPublicKey, SecretMetadata, WorkflowRun};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Client that only knows workflow run 42
    #[derive(Default)]
    struct RunLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GitHubClient for RunLookup {
        async fn compare_commits(
            &self,
            _owner: &str,
            _repo: &str,
            _base: &str,
            _head: &str,
        ) -> anyhow::Result<Vec<ChangedFile>> {
            unimplemented!()
        }

        async fn fetch_tree(&self, _owner: &str, _repo: &str, _sha: &str) -> anyhow::Result<GitTree> {
            unimplemented!()
        }

        async fn fetch_public_key(&self, _owner: &str, _repo: &str) -> anyhow::Result<RepoPublicKey> {
            unimplemented!()
        }

        async fn fetch_secret_metadata(
            &self,
            _owner: &str,
            _repo: &str,
            _secret_name: &str,
        ) -> anyhow::Result<Option<SecretMetadata>> {
            unimplemented!()
        }

        async fn put_secret(
            &self,
            _owner: &str,
            _repo: &str,
            _secret_name: &str,
            _encrypted_value: &str,
            _key_id: &str,
        ) -> anyhow::Result<()> {
            unimplemented!()
        }

        async fn fetch_workflow_run(
            &self,
            _owner: &str,
            _repo: &str,
            run_id: u64,
        ) -> anyhow::Result<WorkflowRun> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::ensure!(run_id == 42, "HTTP 404 Not Found");
            Ok(WorkflowRun {
                id: run_id,
                name: Some("Lint".to_string()),
                workflow_url: "https://api.github.com/repos/o/r/actions/workflows/7".to_string(),
                path: Some(".github/workflows/lint.yml".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_abort() {
        let client = RunLookup::default();
        let repository = Repository::new("o", "r");

        log_workflow(&client, &repository, 42).await;
        log_workflow(&client, &repository, 7).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
