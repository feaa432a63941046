//! In-memory backend that replays scripted replies, used to drive the relay
//! and turn logic in tests without a network.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;

use crate::domain::models::Backend;
use crate::domain::models::ChatSession;
use crate::domain::models::FragmentStream;
use crate::domain::models::SessionBox;
use crate::domain::models::SessionConfig;
use crate::domain::models::SessionInitError;
use crate::domain::models::StreamError;

pub enum Reply {
    Fragments(Vec<Result<String, StreamError>>),
    Rejected(StreamError),
}

impl Reply {
    pub fn ok(fragments: &[&str]) -> Reply {
        return Reply::Fragments(
            fragments
                .iter()
                .map(|fragment| return Ok(fragment.to_string()))
                .collect(),
        );
    }
}

#[derive(Clone, Default)]
pub struct Probe {
    pub sessions_created: Arc<AtomicUsize>,
    pub configs: Arc<Mutex<Vec<SessionConfig>>>,
    /// (session number, text) for every message sent.
    pub sent: Arc<Mutex<Vec<(usize, String)>>>,
}

impl Probe {
    pub fn sessions_created(&self) -> usize {
        return self.sessions_created.load(Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(usize, String)> {
        return self.sent.lock().unwrap().clone();
    }
}

pub struct ScriptedBackend {
    init_error: Option<SessionInitError>,
    probe: Probe,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> ScriptedBackend {
        return ScriptedBackend {
            init_error: None,
            probe: Probe::default(),
            replies: Arc::new(Mutex::new(replies.into())),
        };
    }

    pub fn failing(err: SessionInitError) -> ScriptedBackend {
        let mut backend = ScriptedBackend::new(vec![]);
        backend.init_error = Some(err);
        return backend;
    }

    pub fn probe(&self) -> Probe {
        return self.probe.clone();
    }
}

struct ScriptedSession {
    number: usize,
    probe: Probe,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    #[allow(clippy::implicit_return)]
    async fn send_message_stream(&mut self, text: &str) -> Result<FragmentStream, StreamError> {
        self.probe
            .sent
            .lock()
            .unwrap()
            .push((self.number, text.to_string()));

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Fragments(items)) => return Ok(stream::iter(items).boxed()),
            Some(Reply::Rejected(err)) => return Err(err),
            None => return Ok(stream::empty::<Result<String, StreamError>>().boxed()),
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        return "scripted";
    }

    #[allow(clippy::implicit_return)]
    async fn create_session(&self, config: SessionConfig) -> Result<SessionBox, SessionInitError> {
        if let Some(err) = &self.init_error {
            return Err(err.clone());
        }

        self.probe.configs.lock().unwrap().push(config);
        let number = self.probe.sessions_created.fetch_add(1, Ordering::SeqCst) + 1;

        return Ok(Box::new(ScriptedSession {
            number,
            probe: self.probe.clone(),
            replies: Arc::clone(&self.replies),
        }));
    }
}
