use anyhow::{Context as AnyhowContext, Result};
use tracing::info;

use super::inputs::{CommentArgs, GitHubArgs, report_failures};
use super::render::RenderCommand;
use crate::comment::build_comment;
use crate::context::Context;
use crate::github::{
    CommentApi, DEFAULT_API_URL, GitHubClient, PullRequestRef, post_comment, resolve_pull_request,
    superseded_updates,
};

/// Handles the 'post' command - renders the comment and publishes it
pub struct PostCommand;

impl PostCommand {
    /// Execute the post command
    pub fn execute(
        ctx: &Context,
        args: &CommentArgs,
        github: &GitHubArgs,
        dry_run: bool,
    ) -> Result<()> {
        let config = args.load_config(ctx)?;
        let options = args.to_options(ctx, &config)?;
        report_failures(ctx, &options);
        let document = build_comment(&options);

        let pr = resolve_pull_request(
            &*ctx.fs,
            github.repo.as_deref(),
            github.pr,
            github.event_path.as_deref(),
        )?;

        let api_url = github
            .api_url
            .as_deref()
            .or(config.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        let token = github
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("GitHub token is required (--token or GITHUB_TOKEN)")?;

        info!(pull_request = %pr, api_url, "Publishing comment");
        let client = GitHubClient::new(api_url, token)?;

        Self::publish(ctx, &client, &pr, &options.marker, &document, dry_run)
    }

    /// Publish an already rendered document through the given API
    pub fn publish(
        ctx: &Context,
        api: &dyn CommentApi,
        pr: &PullRequestRef,
        marker: &str,
        document: &str,
        dry_run: bool,
    ) -> Result<()> {
        ctx.output.section("Pull Request Comment");
        ctx.output.key_value("Pull request", &pr.to_string());
        ctx.output.key_value("Marker", marker);

        if dry_run {
            let updates = superseded_updates(api, pr, marker)?;
            for (id, _) in &updates {
                ctx.output
                    .dimmed(&format!("Would mark comment {} as superseded", id));
            }
            ctx.output.info(&format!(
                "Dry run: {} comment(s) would be superseded, nothing was posted",
                updates.len()
            ));
            RenderCommand::print(document);
            return Ok(());
        }

        let created = post_comment(api, pr, marker, document)?;
        ctx.output
            .success(&format!("Posted comment {} on {}", created.id, pr));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ApiCall, IssueComment, MockCommentApi};
    use crate::traits::{MockFileSystem, MockOutput, OutputMessage};
    use std::sync::Arc;

    const MARKER: &str = "<!-- tf-pr-comment:ci:terraform-plan -->";

    fn pr() -> PullRequestRef {
        PullRequestRef {
            owner: "acme".to_string(),
            repo: "infra".to_string(),
            number: 3,
        }
    }

    fn api() -> MockCommentApi {
        MockCommentApi::with_comments(vec![
            IssueComment {
                id: 10,
                body: Some(format!("{}\nprevious run", MARKER)),
            },
            IssueComment {
                id: 11,
                body: Some("unrelated".to_string()),
            },
        ])
    }

    #[test]
    fn test_publish_supersedes_and_creates() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(Arc::new(MockFileSystem::new()), output.clone());
        let api = api();

        PostCommand::publish(&ctx, &api, &pr(), MARKER, "new document", false).unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], ApiCall::Update(10, _)));
        assert_eq!(calls[2], ApiCall::Create("new document".to_string()));
        assert!(output.contains_message(&OutputMessage::Success(
            "Posted comment 12 on acme/infra#3".to_string()
        )));
    }

    #[test]
    fn test_dry_run_only_lists() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(Arc::new(MockFileSystem::new()), output.clone());
        let api = api();

        PostCommand::publish(&ctx, &api, &pr(), MARKER, "new document", true).unwrap();

        assert_eq!(api.calls(), vec![ApiCall::List(100)]);
        assert!(output.contains_message(&OutputMessage::Dimmed(
            "Would mark comment 10 as superseded".to_string()
        )));
    }

    #[test]
    fn test_execute_requires_token() {
        let ctx = Context::test();
        let args = CommentArgs::default();
        let github = GitHubArgs {
            repo: Some("acme/infra".to_string()),
            pr: Some(3),
            ..GitHubArgs::default()
        };

        let err = PostCommand::execute(&ctx, &args, &github, false).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_execute_requires_pull_request() {
        let ctx = Context::test();
        let args = CommentArgs::default();
        let github = GitHubArgs {
            token: Some("t".to_string()),
            repo: Some("acme/infra".to_string()),
            ..GitHubArgs::default()
        };

        assert!(PostCommand::execute(&ctx, &args, &github, false).is_err());
    }
}
