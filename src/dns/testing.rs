//! Scripted resolver used by the measurement tests.

use crate::dns::trial::Resolve;
use crate::dns::types::AddressFamily;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted lookup: how long it takes and whether it succeeds.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub delay: Duration,
    pub success: bool,
}

impl Step {
    pub fn ok(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            success: true,
        }
    }

    pub fn fail(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            success: false,
        }
    }
}

type Call = (String, IpAddr, AddressFamily);

/// Replays `steps` in order, then `fallback` forever. Servers marked as
/// failing fail immediately without consuming a step.
pub struct ScriptedResolver {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    failing: HashSet<IpAddr>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedResolver {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: Step::ok(1),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, step: Step) -> Self {
        self.fallback = step;
        self
    }

    pub fn with_failing_server(mut self, server: &str) -> Self {
        self.failing.insert(server.parse().unwrap());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resolve for ScriptedResolver {
    async fn lookup(&self, hostname: &str, server: IpAddr, family: AddressFamily) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((hostname.to_string(), server, family));

        if self.failing.contains(&server) {
            return Err(Error::Io(std::io::Error::other(format!(
                "{server} unreachable"
            ))));
        }

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        tokio::time::sleep(step.delay).await;

        if step.success {
            Ok(())
        } else {
            Err(Error::Io(std::io::Error::other("scripted failure")))
        }
    }
}
