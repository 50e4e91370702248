use bakebot_agent::AgentRuntime;
use bakebot_core::config::AppConfig;

use super::{CommandResult, EXIT_BOOTSTRAP};

pub fn run(config: &AppConfig) -> CommandResult {
    match AgentRuntime::bootstrap(config) {
        Ok(runtime) => CommandResult::success(
            "check",
            format!(
                "assistant ready: {} products, {} flavor entries, {} intents",
                runtime.catalog().products().len(),
                runtime.extractor().index().len(),
                runtime.engine().intent_count(),
            ),
        ),
        Err(error) => {
            CommandResult::failure("check", error.error_class(), error.to_string(), EXIT_BOOTSTRAP)
        }
    }
}
