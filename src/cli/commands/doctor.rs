//! Doctor command - verify environment configuration and the Pinecone index.

use crate::cli::Output;
use crate::config::{
    mask_secret, Config, EnvSource, ProcessEnv, Settings, PINECONE_INDEX, PINECONE_CLOUD,
    PINECONE_REGION, REQUIRED_VARS,
};
use crate::vector_store::PineconeStore;
use console::style;
use std::time::Duration;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("tubeask Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Environment").bold());
    for check in check_env_vars(&ProcessEnv) {
        check.print();
        checks.push(check);
    }
    println!();

    if let Ok(config) = Config::from_env() {
        println!("{}", style("Pinecone").bold());
        let check = check_pinecone_index(&config, settings).await;
        check.print();
        checks.push(check);
        println!();
    }

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. The server will refuse to start until they are fixed.",
            errors
        ));
        anyhow::bail!("{} configuration error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! tubeask is ready to serve.");
    }

    Ok(())
}

/// Check each required variable, masking secrets.
fn check_env_vars(env: &dyn EnvSource) -> Vec<CheckResult> {
    REQUIRED_VARS
        .iter()
        .map(|name| match env.var(name) {
            Some(value) if !value.is_empty() => {
                let shown = if is_secret(name) {
                    mask_secret(&value)
                } else {
                    value
                };
                CheckResult::ok(name, &format!("set ({})", shown))
            }
            Some(_) => CheckResult::error(name, "empty", &format!("Set it in .env or export {}=...", name)),
            None => CheckResult::error(name, "not set", &format!("Set it in .env or export {}=...", name)),
        })
        .collect()
}

fn is_secret(name: &str) -> bool {
    !matches!(name, PINECONE_INDEX | PINECONE_CLOUD | PINECONE_REGION)
}

/// Confirm the index exists and sits where the environment says it does.
async fn check_pinecone_index(config: &Config, settings: &Settings) -> CheckResult {
    let name = format!("Index '{}'", config.pinecone_index);
    let http = match reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.llm.timeout_seconds))
        .build()
    {
        Ok(http) => http,
        Err(e) => return CheckResult::error(&name, &e.to_string(), "Check TLS configuration"),
    };

    match PineconeStore::new(http, config).describe().await {
        Ok(description) => compare_placement(&name, config, description.placement(), description.dimension, settings),
        Err(e) => CheckResult::error(&name, &e.to_string(), "Check PINECONE_API_KEY and PINECONE_INDEX"),
    }
}

fn compare_placement(
    name: &str,
    config: &Config,
    placement: Option<(&str, &str)>,
    dimension: Option<u32>,
    settings: &Settings,
) -> CheckResult {
    if let Some(dim) = dimension {
        if dim != settings.llm.embedding_dimensions {
            return CheckResult::error(
                name,
                &format!(
                    "dimension {} does not match embedding dimensions {}",
                    dim, settings.llm.embedding_dimensions
                ),
                "Set llm.embedding_dimensions (and a matching model) in the config file",
            );
        }
    }

    match placement {
        Some((cloud, region))
            if cloud.eq_ignore_ascii_case(&config.pinecone_cloud)
                && region.eq_ignore_ascii_case(&config.pinecone_region) =>
        {
            CheckResult::ok(name, &format!("reachable ({}/{})", cloud, region))
        }
        Some((cloud, region)) => CheckResult::warning(
            name,
            &format!(
                "index is in {}/{}, environment says {}/{}",
                cloud, region, config.pinecone_cloud, config.pinecone_region
            ),
            "Update PINECONE_CLOUD and PINECONE_REGION",
        ),
        None => CheckResult::ok(name, "reachable (pod-based index)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env() -> HashMap<String, String> {
        REQUIRED_VARS
            .iter()
            .map(|name| (name.to_string(), "a-fairly-long-value".to_string()))
            .collect()
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_env_checks_mask_secrets_only() {
        let checks = check_env_vars(&env());
        assert!(checks.iter().all(|c| c.status == CheckStatus::Ok));

        let gemini = checks.iter().find(|c| c.name == "GEMINI_API_KEY").unwrap();
        assert_eq!(gemini.message, "set (a-fa...alue)");
        let index = checks.iter().find(|c| c.name == "PINECONE_INDEX").unwrap();
        assert_eq!(index.message, "set (a-fairly-long-value)");
    }

    #[test]
    fn test_env_checks_report_missing_and_empty() {
        let mut env = env();
        env.remove("YOUTUBE_API_KEY");
        env.insert("PINECONE_REGION".to_string(), String::new());

        let checks = check_env_vars(&env);
        let errors: Vec<_> = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Error)
            .map(|c| (c.name.as_str(), c.message.as_str()))
            .collect();
        assert_eq!(errors, vec![("YOUTUBE_API_KEY", "not set"), ("PINECONE_REGION", "empty")]);
    }

    #[test]
    fn test_compare_placement() {
        let config = Config::from_source(&{
            let mut e = env();
            e.insert("PINECONE_CLOUD".to_string(), "aws".to_string());
            e.insert("PINECONE_REGION".to_string(), "us-east-1".to_string());
            e
        })
        .unwrap();
        let settings = Settings::default();

        let ok = compare_placement("idx", &config, Some(("aws", "us-east-1")), Some(768), &settings);
        assert_eq!(ok.status, CheckStatus::Ok);

        let moved = compare_placement("idx", &config, Some(("gcp", "us-central1")), None, &settings);
        assert_eq!(moved.status, CheckStatus::Warning);

        let wrong_dim = compare_placement("idx", &config, Some(("aws", "us-east-1")), Some(1536), &settings);
        assert_eq!(wrong_dim.status, CheckStatus::Error);
    }
}
