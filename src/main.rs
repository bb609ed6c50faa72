mod adapters;
mod config;
mod core;
mod error;
mod github;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use adapters::llm::{CompletionRequest, ModelConfig, TextModel};
use adapters::GeminiAdapter;
use config::PublishTarget;
use error::ReviewError;
use github::GitHubClient;

#[derive(Parser)]
#[command(name = "diffsage")]
#[command(about = "Send a diff to Gemini for review and post the result as a PR comment", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the diff file (defaults to diff.txt, or stdin when piped)
    #[arg(long)]
    diff: Option<PathBuf>,

    /// Model to request the review from
    #[arg(long)]
    model: Option<String>,

    /// Repository in owner/name form (defaults to $REPO)
    #[arg(long)]
    repo: Option<String>,

    /// Pull request number (defaults to $PR_NUMBER)
    #[arg(long)]
    pr: Option<u64>,

    /// Print the review to stdout instead of posting it
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = config::Config::load()?;
    config.merge_with_cli(cli.model.clone());

    review_command(config, cli).await
}

async fn review_command(config: config::Config, cli: Cli) -> Result<()> {
    info!("Starting diff review with model: {}", config.model);

    // Resolve every deployment value up front, so a missing token fails the
    // run before the model call instead of after it.
    let destination = if cli.dry_run {
        Destination::Stdout
    } else {
        let target = PublishTarget::from_env(cli.repo.clone(), cli.pr)?;
        let client = GitHubClient::new(
            target.github_token.clone(),
            config.github_base_url.clone(),
        )?;
        Destination::PullRequest {
            client,
            repo: target.repo,
            pr_number: target.pr_number,
        }
    };

    let model_config = ModelConfig {
        model_name: config.model.clone(),
        api_key: config::gemini_api_key()?,
        base_url: config.gemini_base_url.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    };
    let adapter = GeminiAdapter::new(model_config)?;

    let prompt_config = core::prompt::PromptConfig {
        max_diff_chars: config.max_diff_chars,
        ..Default::default()
    };
    let builder = core::PromptBuilder::new(prompt_config);

    run_review(&adapter, &builder, &destination, cli.diff.as_deref()).await?;

    Ok(())
}

enum Destination {
    Stdout,
    PullRequest {
        client: GitHubClient,
        repo: String,
        pr_number: u64,
    },
}

/// The whole pipeline: load diff, build prompt, generate, publish.
///
/// Strictly sequential, and the review text is passed through to the
/// comment body unmodified. The publish step never starts if loading or
/// generation failed.
async fn run_review(
    model: &dyn TextModel,
    builder: &core::PromptBuilder,
    destination: &Destination,
    diff_path: Option<&Path>,
) -> Result<(), ReviewError> {
    let diff = core::input::load_diff(diff_path).await?;
    info!("Loaded diff ({} bytes)", diff.len());

    let prompt = builder.build(&diff);
    debug!("Prompt is {} bytes", prompt.len());

    let response = model.complete(CompletionRequest { prompt }).await?;
    info!(
        "Received review from {} ({} bytes)",
        response.model,
        response.content.len()
    );

    match destination {
        Destination::Stdout => {
            println!("{}", response.content);
        }
        Destination::PullRequest {
            client,
            repo,
            pr_number,
        } => {
            client.post_comment(repo, *pr_number, &response.content).await?;
            println!("Review posted to PR #{pr_number} in {repo}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::llm::CompletionResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;

    struct CannedModel(String);

    #[async_trait]
    impl TextModel for CannedModel {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ReviewError> {
            Ok(CompletionResponse {
                content: self.0.clone(),
                model: "canned".to_string(),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl TextModel for FailingModel {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ReviewError> {
            Err(ReviewError::Llm("model unavailable".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn default_builder() -> core::PromptBuilder {
        core::PromptBuilder::new(core::prompt::PromptConfig::default())
    }

    fn pr_destination(server: &mockito::ServerGuard) -> Destination {
        Destination::PullRequest {
            client: GitHubClient::new("test-token".to_string(), Some(server.url())).unwrap(),
            repo: "octo/widgets".to_string(),
            pr_number: 7,
        }
    }

    fn diff_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[tokio::test]
    async fn review_text_becomes_the_comment_body() {
        let mut server = mockito::Server::new_async().await;
        let review = "## Review\n\nNo issues found.";
        let mock = server
            .mock("POST", "/repos/octo/widgets/issues/7/comments")
            .match_body(mockito::Matcher::Json(json!({ "body": review })))
            .with_status(201)
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;

        let file = diff_file("+fn main() {}\n");
        let model = CannedModel(review.to_string());
        run_review(
            &model,
            &default_builder(),
            &pr_destination(&server),
            Some(file.path()),
        )
        .await
        .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn model_failure_prevents_the_publish_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/octo/widgets/issues/7/comments")
            .expect(0)
            .create_async()
            .await;

        let file = diff_file("+fn main() {}\n");
        let err = run_review(
            &FailingModel,
            &default_builder(),
            &pr_destination(&server),
            Some(file.path()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ReviewError::Llm(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_diff_fails_before_any_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/octo/widgets/issues/7/comments")
            .expect(0)
            .create_async()
            .await;

        // a FailingModel would turn any model call into an Llm error, so a
        // DiffRead error proves the pipeline stopped at the loader
        let err = run_review(
            &FailingModel,
            &default_builder(),
            &pr_destination(&server),
            Some(Path::new("/nonexistent/diff.txt")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ReviewError::DiffRead { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_publish_fails_the_run() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/repos/octo/widgets/issues/7/comments")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let file = diff_file("+fn main() {}\n");
        let model = CannedModel("review".to_string());
        let err = run_review(
            &model,
            &default_builder(),
            &pr_destination(&server),
            Some(file.path()),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ReviewError::PublishStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn dry_run_never_touches_github() {
        let file = diff_file("+fn main() {}\n");
        let model = CannedModel("review".to_string());
        run_review(
            &model,
            &default_builder(),
            &Destination::Stdout,
            Some(file.path()),
        )
        .await
        .unwrap();
    }
}
