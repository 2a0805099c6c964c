use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used when listing comments; only the first page is read
pub const COMMENTS_PER_PAGE: u8 = 100;

/// Owner/repository/number triple addressing a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// An issue comment as returned by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub body: Option<String>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Hosting API operations the publisher relies on
pub trait CommentApi: Send + Sync {
    /// List up to `per_page` comments on the pull request (first page only)
    fn list_comments(&self, pr: &PullRequestRef, per_page: u8) -> Result<Vec<IssueComment>>;

    /// Replace the body of an existing comment
    fn update_comment(&self, pr: &PullRequestRef, comment_id: u64, body: &str) -> Result<()>;

    /// Create a new comment on the pull request
    fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<IssueComment>;
}

/// GitHub REST client using reqwest
pub struct GitHubClient {
    http: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("tf-pr-comment"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .context("Invalid GitHub authorization header")?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create GitHub API client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn issue_comments_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, pr.owner, pr.repo, pr.number
        )
    }

    fn comment_url(&self, pr: &PullRequestRef, comment_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, pr.owner, pr.repo, comment_id
        )
    }

    /// Send a request and fail on any non-2xx status
    fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .with_context(|| format!("GitHub request failed: {}", operation))?;

        let status = response.status();
        debug!(operation, %status, "GitHub API response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("GitHub {} failed with status {}: {}", operation, status, body.trim());
        }

        Ok(response)
    }
}

impl CommentApi for GitHubClient {
    fn list_comments(&self, pr: &PullRequestRef, per_page: u8) -> Result<Vec<IssueComment>> {
        let request = self
            .http
            .get(self.issue_comments_url(pr))
            .query(&[("per_page", per_page.to_string())]);

        self.send("list comments", request)?
            .json()
            .context("Failed to decode comment list")
    }

    fn update_comment(&self, pr: &PullRequestRef, comment_id: u64, body: &str) -> Result<()> {
        let request = self
            .http
            .patch(self.comment_url(pr, comment_id))
            .json(&CommentBody { body });

        self.send("update comment", request)?;
        Ok(())
    }

    fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<IssueComment> {
        let request = self
            .http
            .post(self.issue_comments_url(pr))
            .json(&CommentBody { body });

        self.send("create comment", request)?
            .json()
            .context("Failed to decode created comment")
    }
}

/// Recording in-memory API for tests
#[cfg(test)]
pub struct MockCommentApi {
    comments: std::sync::Mutex<Vec<IssueComment>>,
    calls: std::sync::Mutex<Vec<ApiCall>>,
    fail_list: bool,
    fail_updates: bool,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List(u8),
    Update(u64, String),
    Create(String),
}

#[cfg(test)]
impl MockCommentApi {
    pub fn with_comments(comments: Vec<IssueComment>) -> Self {
        Self {
            comments: std::sync::Mutex::new(comments),
            calls: std::sync::Mutex::new(Vec::new()),
            fail_list: false,
            fail_updates: false,
        }
    }

    /// Make every list call return an error
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make every update call return an error after recording it
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn comment(&self, id: u64) -> Option<IssueComment> {
        self.comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[cfg(test)]
impl CommentApi for MockCommentApi {
    fn list_comments(&self, _pr: &PullRequestRef, per_page: u8) -> Result<Vec<IssueComment>> {
        self.calls.lock().unwrap().push(ApiCall::List(per_page));
        if self.fail_list {
            bail!("GitHub list comments failed with status 500 Internal Server Error");
        }
        let comments = self.comments.lock().unwrap();
        Ok(comments.iter().take(per_page as usize).cloned().collect())
    }

    fn update_comment(&self, _pr: &PullRequestRef, comment_id: u64, body: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Update(comment_id, body.to_string()));
        if self.fail_updates {
            bail!("GitHub update comment failed with status 403 Forbidden");
        }

        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .with_context(|| format!("Comment {} not found", comment_id))?;
        comment.body = Some(body.to_string());
        Ok(())
    }

    fn create_comment(&self, _pr: &PullRequestRef, body: &str) -> Result<IssueComment> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Create(body.to_string()));

        let mut comments = self.comments.lock().unwrap();
        let id = comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let comment = IssueComment {
            id,
            body: Some(body.to_string()),
        };
        comments.push(comment.clone());
        Ok(comment)
    }
}
