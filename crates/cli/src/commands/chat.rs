use std::io::{BufRead, Write};

use anyhow::Context as _;
use bakebot_agent::{AgentRuntime, DialogueError, Session};
use bakebot_core::config::AppConfig;
use tracing::info;

use super::{CommandResult, EXIT_BOOTSTRAP};

const BOT_PREFIX: &str = "🤖: ";
const USER_PROMPT: &str = "Você: ";

pub fn run(config: &AppConfig, input: impl BufRead, output: impl Write) -> CommandResult {
    let runtime = match AgentRuntime::bootstrap(config) {
        Ok(runtime) => runtime,
        Err(error) => {
            let class = error.error_class();
            return CommandResult::failure("chat", class, error.to_string(), EXIT_BOOTSTRAP);
        }
    };

    let mut session = runtime.new_session();
    match converse(&runtime, &mut session, input, output) {
        Ok(turns) => {
            info!(
                event_name = "chat.finished",
                turns,
                finished = runtime.is_finished(&session),
                "chat session ended"
            );
            CommandResult::plain(String::new())
        }
        Err(error) => {
            let error_class = if error.downcast_ref::<DialogueError>().is_some() {
                "dialogue_render"
            } else {
                "io"
            };
            CommandResult::failure("chat", error_class, format!("{error:#}"), 1)
        }
    }
}

/// Runs the greeting and then one turn per input line until EOF or the exit flag.
/// Returns the number of user turns handled.
pub fn converse(
    runtime: &AgentRuntime,
    session: &mut Session,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<usize> {
    let greeting = runtime.greet(session)?;
    writeln!(output, "{BOT_PREFIX}{greeting}").context("failed to write greeting")?;

    let mut turns = 0;
    let mut line = String::new();
    while !runtime.is_finished(session) {
        write!(output, "{USER_PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).context("failed to read user input")? == 0 {
            writeln!(output)?;
            break;
        }

        for message in runtime.handle_message(session, line.trim_end())? {
            writeln!(output, "{BOT_PREFIX}{message}")?;
        }
        turns += 1;
    }

    Ok(turns)
}
