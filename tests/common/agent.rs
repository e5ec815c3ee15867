//! In-process SNMP agent for testing.
//!
//! Answers v1/v2c GET requests from a `BTreeMap` over a real UDP socket on an
//! ephemeral localhost port, and shuts down on drop. Missing objects produce
//! `noSuchName` for v1 and `noSuchObject` for v2c, as real agents do.

use crate::common::fixtures;

use bytes::Bytes;
use snmp_get::message::CommunityMessage;
use snmp_get::pdu::{Pdu, PduType};
use snmp_get::{ErrorStatus, Oid, Value, VarBind, Version};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct AgentState {
    data: Mutex<BTreeMap<Oid, Value>>,
    /// OIDs answered with an error status instead of a value.
    failures: Mutex<BTreeMap<Oid, ErrorStatus>>,
    /// Requests still to be ignored, simulating loss.
    drop_remaining: AtomicUsize,
    /// Requests still to be preceded by a reply carrying a wrong request-id.
    stale_remaining: AtomicUsize,
    requests: AtomicUsize,
}

/// An in-process SNMP agent for testing.
///
/// # Example
///
/// ```ignore
/// let agent = TestAgent::new().await;
/// let client = Client::builder(agent.addr().to_string(), Auth::v2c("public"))
///     .connect().await?;
/// let result = client.get(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).await?;
/// ```
pub struct TestAgent {
    addr: SocketAddr,
    state: Arc<AgentState>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestAgent {
    /// Create an agent with default system MIB data.
    pub async fn new() -> Self {
        TestAgentBuilder::new().build().await
    }

    /// Create an agent with custom initial data.
    pub async fn with_data(data: BTreeMap<Oid, Value>) -> Self {
        TestAgentBuilder::new().data(data).build().await
    }

    /// Get the agent's listening address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Insert or update a value.
    pub fn set(&self, oid: Oid, value: Value) {
        lock(&self.state.data).insert(oid, value);
    }

    /// Answer requests for `oid` with `status`.
    pub fn fail_with(&self, oid: Oid, status: ErrorStatus) {
        lock(&self.state.failures).insert(oid, status);
    }

    /// Ignore the next `count` requests.
    pub fn drop_next(&self, count: usize) {
        self.state.drop_remaining.store(count, Ordering::SeqCst);
    }

    /// Precede the next `count` replies with one for another request-id.
    pub fn send_stale_first(&self, count: usize) {
        self.state.stale_remaining.store(count, Ordering::SeqCst);
    }

    /// Requests received, including dropped ones.
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Explicitly stop the agent.
    ///
    /// Called automatically on drop, but can be called early if needed.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Builder for TestAgent.
pub struct TestAgentBuilder {
    data: BTreeMap<Oid, Value>,
    community: Bytes,
}

impl TestAgentBuilder {
    pub fn new() -> Self {
        Self {
            data: fixtures::system_mib(),
            community: Bytes::from_static(fixtures::COMMUNITY.as_bytes()),
        }
    }

    /// Set the initial MIB data.
    pub fn data(mut self, data: BTreeMap<Oid, Value>) -> Self {
        self.data = data;
        self
    }

    /// Community the agent accepts; requests with any other are ignored.
    pub fn community(mut self, community: &str) -> Self {
        self.community = Bytes::copy_from_slice(community.as_bytes());
        self
    }

    pub async fn build(self) -> TestAgent {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().expect("test agent has no address");

        let state = Arc::new(AgentState {
            data: Mutex::new(self.data),
            ..Default::default()
        });
        let cancel = CancellationToken::new();

        let task = tokio::spawn(serve(
            socket,
            self.community,
            state.clone(),
            cancel.clone(),
        ));

        TestAgent {
            addr,
            state,
            cancel,
            _task: task,
        }
    }
}

impl Default for TestAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

async fn serve(
    socket: UdpSocket,
    community: Bytes,
    state: Arc<AgentState>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; 65535];
    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => return,
            received = socket.recv_from(&mut buf) => match received {
                Ok(r) => r,
                Err(_) => continue,
            },
        };

        state.requests.fetch_add(1, Ordering::SeqCst);
        if take_one(&state.drop_remaining) {
            continue;
        }

        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        if request.community != community || request.pdu.pdu_type != PduType::GetRequest {
            continue;
        }

        if take_one(&state.stale_remaining) {
            let mut stale = request.pdu.to_response();
            stale.request_id = stale.request_id.wrapping_add(1000);
            let reply = CommunityMessage::new(request.version, community.clone(), stale);
            let _ = socket.send_to(&reply.encode(), peer).await;
        }

        let response = answer(&state, request.version, &request.pdu);
        let reply = CommunityMessage::new(request.version, community.clone(), response);
        let _ = socket.send_to(&reply.encode(), peer).await;
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn answer(state: &AgentState, version: Version, request: &Pdu) -> Pdu {
    let data = lock(&state.data);
    let failures = lock(&state.failures);

    let mut varbinds = Vec::with_capacity(request.varbinds.len());
    for (i, vb) in request.varbinds.iter().enumerate() {
        let index = i as i32 + 1;
        if let Some(status) = failures.get(&vb.oid) {
            return request.to_error_response(*status, index);
        }
        match data.get(&vb.oid) {
            Some(value) => varbinds.push(VarBind::new(vb.oid.clone(), value.clone())),
            None if version == Version::V1 => {
                return request.to_error_response(ErrorStatus::NoSuchName, index);
            }
            None => varbinds.push(VarBind::new(vb.oid.clone(), Value::NoSuchObject)),
        }
    }

    Pdu {
        varbinds,
        ..request.to_response()
    }
}
