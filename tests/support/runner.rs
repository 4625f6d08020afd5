// ABOUTME: CommandRunner fake that records every command line and replays scripted outputs.
// ABOUTME: Rules match on command-line prefix; the newest matching rule wins.

use async_trait::async_trait;
use hoist::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use parking_lot::Mutex;
use std::sync::Arc;

type Responder = Box<dyn Fn(&[String]) -> CommandOutput + Send + Sync>;

struct Rule {
    prefix: String,
    respond: Responder,
    once: bool,
}

/// Records commands; unmatched commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
    hangs: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every command starting with `prefix` returns `output`.
    pub fn on(&self, prefix: &str, output: CommandOutput) {
        self.push(prefix, Box::new(move |_| output.clone()), false);
    }

    /// The next command starting with `prefix` returns `output`.
    pub fn once(&self, prefix: &str, output: CommandOutput) {
        self.push(prefix, Box::new(move |_| output.clone()), true);
    }

    /// Compute the output from the commands recorded so far (this one included).
    pub fn respond_with<F>(&self, prefix: &str, respond: F)
    where
        F: Fn(&[String]) -> CommandOutput + Send + Sync + 'static,
    {
        self.push(prefix, Box::new(respond), false);
    }

    fn push(&self, prefix: &str, respond: Responder, once: bool) {
        self.rules.lock().push(Rule {
            prefix: prefix.to_string(),
            respond,
            once,
        });
    }

    /// Commands starting with `prefix` never finish.
    pub fn hang(&self, prefix: &str) {
        self.hangs.lock().push(prefix.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }

    /// Index of the first recorded command starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls.lock().iter().position(|c| c.starts_with(prefix))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let line = spec.command_line();
        let calls = {
            let mut calls = self.calls.lock();
            calls.push(line.clone());
            calls.clone()
        };

        let hangs = self.hangs.lock().iter().any(|p| line.starts_with(p));
        if hangs {
            std::future::pending::<()>().await;
        }

        let mut rules = self.rules.lock();
        let matched = rules.iter().rposition(|rule| line.starts_with(&rule.prefix));
        let output = match matched {
            Some(index) if rules[index].once => {
                let rule = rules.remove(index);
                (rule.respond)(&calls)
            }
            Some(index) => (rules[index].respond)(&calls),
            None => CommandOutput::ok(""),
        };
        Ok(output)
    }
}

/// Project name from the recorded `vercel --prod` call, if any.
pub fn deployed_project(calls: &[String]) -> Option<String> {
    calls.iter().find_map(|call| {
        call.strip_prefix("vercel --prod --yes --name ")
            .map(|name| name.trim().to_string())
    })
}
