use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use github_user_search::model::types::{ResultSet, UserRecord};
use github_user_search::search::client::{LookupError, ProfileLookup};
use github_user_search::search::debounce::{DEFAULT_DEBOUNCE, Debouncer, SystemClock};
use github_user_search::ui::driver::SessionDriver;
use github_user_search::ui::state::SearchScreen;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// `n` profiles with ids `1..=n` and logins `{prefix}{i}`.
#[allow(dead_code)]
pub fn users(prefix: &str, n: u64) -> ResultSet {
    ResultSet::new(
        (1..=n)
            .map(|i| UserRecord::new(i, format!("{prefix}{i}")))
            .collect(),
    )
}

type Scripted = (Duration, Result<ResultSet, LookupError>);

/// Lookup double answering from a per-query script, after a per-answer delay.
/// Unscripted queries answer 404 immediately.
#[derive(Default)]
pub struct ScriptedLookup {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        self,
        query: &str,
        delay: Duration,
        outcome: Result<ResultSet, LookupError>,
    ) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back((delay, outcome));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProfileLookup for ScriptedLookup {
    fn search_profiles(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ResultSet, LookupError>> + Send {
        self.calls.lock().unwrap().push(query.to_string());
        let (delay, outcome) = self
            .responses
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(VecDeque::pop_front)
            .unwrap_or((Duration::ZERO, Err(LookupError::Status(404))));
        async move {
            tokio::time::sleep(delay).await;
            outcome
        }
    }
}

/// Driver on tokio's clock with the default quiet window.
#[allow(dead_code)]
pub fn driver(lookup: Arc<ScriptedLookup>) -> SessionDriver<ScriptedLookup, SystemClock> {
    SessionDriver::new(SearchScreen::new(Debouncer::new(DEFAULT_DEBOUNCE)), lookup)
}
