//! Deterministic in-memory backend for native tests. Platform callbacks
//! are queued and delivered on an explicit `pump`, mirroring browser
//! event-loop turns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::recorder::backend::{
    AcquireCallback, FinalizeCallback, FragmentCallback, MediaBackend, StreamConstraints,
};
use crate::recorder::error::{CaptureError, SaveError, SessionError};

type Job = Box<dyn FnOnce()>;

#[derive(Default)]
struct SessionState {
    on_fragment: Option<Box<dyn FnMut(Vec<u8>)>>,
    on_finalize: Option<Box<dyn FnOnce()>>,
    started: bool,
    paused: bool,
    stopped: bool,
}

pub struct FakeSession {
    state: Rc<RefCell<SessionState>>,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Job>,
    next_stream_id: u32,
    acquire_failures: VecDeque<CaptureError>,
    open_failure: Option<SessionError>,
    start_failure: Option<SessionError>,
    stop_failure: Option<SessionError>,
    bound: Vec<u32>,
    released: Vec<u32>,
    alerts: Vec<String>,
    downloads: Vec<(String, Vec<u8>)>,
    sessions_opened: usize,
    last_session: Option<Rc<RefCell<SessionState>>>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Rc<RefCell<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver queued platform callbacks until none remain.
    pub fn pump(&self) {
        loop {
            let job = self.inner.borrow_mut().queue.pop_front();
            match job {
                Some(job) => job(),
                None => break,
            }
        }
    }

    pub fn plan_acquire_failure(&self, err: CaptureError) {
        self.inner.borrow_mut().acquire_failures.push_back(err);
    }

    pub fn plan_open_failure(&self, err: SessionError) {
        self.inner.borrow_mut().open_failure = Some(err);
    }

    pub fn plan_start_failure(&self, err: SessionError) {
        self.inner.borrow_mut().start_failure = Some(err);
    }

    pub fn plan_stop_failure(&self, err: SessionError) {
        self.inner.borrow_mut().stop_failure = Some(err);
    }

    /// Queue one data fragment on the open session.
    pub fn emit_fragment(&self, bytes: &[u8]) {
        let mut inner = self.inner.borrow_mut();
        let session = inner.last_session.clone().expect("no session open");
        let bytes = bytes.to_vec();
        inner.queue.push_back(Box::new(move || {
            let mut state = session.borrow_mut();
            if let Some(on_fragment) = state.on_fragment.as_mut() {
                on_fragment(bytes);
            }
        }));
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner.borrow().alerts.clone()
    }

    pub fn downloads(&self) -> Vec<(String, Vec<u8>)> {
        self.inner.borrow().downloads.clone()
    }

    pub fn bound_streams(&self) -> Vec<u32> {
        self.inner.borrow().bound.clone()
    }

    pub fn released_streams(&self) -> Vec<u32> {
        self.inner.borrow().released.clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.inner.borrow().sessions_opened
    }

    fn last_session(&self) -> Rc<RefCell<SessionState>> {
        self.inner
            .borrow()
            .last_session
            .clone()
            .expect("no session open")
    }

    pub fn last_session_started(&self) -> bool {
        self.last_session().borrow().started
    }

    pub fn last_session_paused(&self) -> bool {
        self.last_session().borrow().paused
    }

    pub fn last_session_stopped(&self) -> bool {
        self.last_session().borrow().stopped
    }
}

impl MediaBackend for FakeBackend {
    type Stream = u32;
    type Session = FakeSession;
    type Fragment = Vec<u8>;
    type Clip = Vec<u8>;

    fn acquire(&mut self, _constraints: StreamConstraints, done: AcquireCallback<u32>) {
        let inner = Rc::clone(&self.inner);
        let planned = self.inner.borrow_mut().acquire_failures.pop_front();
        self.inner.borrow_mut().queue.push_back(Box::new(move || {
            let result = match planned {
                Some(err) => Err(err),
                None => {
                    let mut inner = inner.borrow_mut();
                    inner.next_stream_id += 1;
                    Ok(inner.next_stream_id)
                }
            };
            done(result);
        }));
    }

    fn bind_preview(&mut self, stream: &u32) {
        self.inner.borrow_mut().bound.push(*stream);
    }

    fn release(&mut self, stream: u32) {
        self.inner.borrow_mut().released.push(stream);
    }

    fn open_session(
        &mut self,
        _stream: &u32,
        on_fragment: FragmentCallback<Vec<u8>>,
        on_finalize: FinalizeCallback,
    ) -> Result<FakeSession, SessionError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(err) = inner.open_failure.take() {
            return Err(err);
        }
        inner.sessions_opened += 1;
        let state = Rc::new(RefCell::new(SessionState {
            on_fragment: Some(on_fragment),
            on_finalize: Some(on_finalize),
            ..Default::default()
        }));
        inner.last_session = Some(Rc::clone(&state));
        Ok(FakeSession { state })
    }

    fn start(&mut self, session: &FakeSession) -> Result<(), SessionError> {
        if let Some(err) = self.inner.borrow_mut().start_failure.take() {
            return Err(err);
        }
        session.state.borrow_mut().started = true;
        Ok(())
    }

    fn pause(&mut self, session: &FakeSession) -> Result<(), SessionError> {
        session.state.borrow_mut().paused = true;
        Ok(())
    }

    fn resume(&mut self, session: &FakeSession) -> Result<(), SessionError> {
        session.state.borrow_mut().paused = false;
        Ok(())
    }

    fn stop(&mut self, session: &FakeSession) -> Result<(), SessionError> {
        if let Some(err) = self.inner.borrow_mut().stop_failure.take() {
            return Err(err);
        }
        session.state.borrow_mut().stopped = true;
        // Finalize is queued behind any fragments emitted so far, matching
        // the platform's ordering guarantee.
        let state = Rc::clone(&session.state);
        self.inner.borrow_mut().queue.push_back(Box::new(move || {
            let on_finalize = state.borrow_mut().on_finalize.take();
            if let Some(on_finalize) = on_finalize {
                on_finalize();
            }
        }));
        Ok(())
    }

    fn assemble(&mut self, fragments: Vec<Vec<u8>>) -> Result<Vec<u8>, SaveError> {
        Ok(fragments.concat())
    }

    fn download(&mut self, clip: Vec<u8>, filename: &str) -> Result<(), SaveError> {
        self.inner
            .borrow_mut()
            .downloads
            .push((filename.to_string(), clip));
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.inner.borrow_mut().alerts.push(message.to_string());
    }
}
