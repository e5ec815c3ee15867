//! Scripted transport for tests.
//!
//! Responses are queued ahead of time and handed out one per `recv`. Every
//! request that goes through `send` is recorded, as is every `close`.

use super::Transport;
use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// What the next `recv` produces.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// This message, with its request-id rewritten to the last request's.
    Data(Bytes),
    /// This datagram exactly as given.
    RawData(Bytes),
    Timeout,
    IoError(String),
}

/// A request observed by the mock.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub data: Bytes,
    /// `None` if the bytes were not a decodable community message.
    pub request_id: Option<i32>,
    pub oids: Vec<Oid>,
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    default_response: Option<MockResponse>,
    last_request_id: Option<i32>,
    close_count: usize,
}

/// Scripted [`Transport`].
///
/// Clones share state, so a test can keep one handle for inspection while
/// the client owns another.
///
/// ```rust,ignore
/// use snmp_get::transport::{MockTransport, ResponseBuilder};
/// use snmp_get::{Value, oid};
///
/// let mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(1)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("router"))
///         .build_v1(b"public"),
/// );
/// mock.queue_timeout();
/// assert_eq!(mock.queued_response_count(), 2);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                default_response: None,
                last_request_id: None,
                close_count: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        // A panicking test thread must not hide the state from the others.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a response whose request-id is patched to match the request.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(MockResponse::Data(data.into()));
    }

    /// Queue a datagram delivered untouched (for stale or foreign responses).
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        self.lock()
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    pub fn queue_timeout(&self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::IoError(msg.into()));
    }

    /// Response used once the queue is empty. Without one, `recv` times out.
    pub fn set_default_response(&self, response: MockResponse) {
        self.lock().default_response = Some(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }

    /// How many times `close` has been called.
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    fn patch_request_id(data: Bytes, request_id: i32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = request_id;
                msg.encode()
            }
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(data);
        let decoded = CommunityMessage::decode(data.clone()).ok();
        let request_id = decoded.as_ref().map(|m| m.pdu.request_id);
        let oids = decoded
            .map(|m| m.pdu.varbinds.into_iter().map(|vb| vb.oid).collect())
            .unwrap_or_default();

        let mut inner = self.lock();
        inner.requests.push(RecordedRequest {
            data,
            request_id,
            oids,
        });
        inner.last_request_id = request_id;
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let (response, target, last_request_id) = {
            let mut inner = self.lock();
            let response = inner
                .responses
                .pop_front()
                .or_else(|| inner.default_response.clone());
            (response, inner.target, inner.last_request_id)
        };

        let timed_out = || Error::Timeout {
            target: Some(target),
            elapsed: timeout,
            request_id,
            retries: 0,
        };

        match response {
            Some(MockResponse::Data(data)) => {
                let data = match last_request_id {
                    Some(id) => Self::patch_request_id(data, id),
                    None => data,
                };
                Ok((data, target))
            }
            Some(MockResponse::RawData(data)) => Ok((data, target)),
            Some(MockResponse::IoError(msg)) => {
                Err(Error::io(Some(target), std::io::Error::other(msg)))
            }
            Some(MockResponse::Timeout) | None => Err(timed_out()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    async fn close(&self) {
        self.lock().close_count += 1;
    }
}

/// Builds encoded Response messages for queuing on a [`MockTransport`].
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    pub fn error_status(mut self, status: i32) -> Self {
        self.error_status = status;
        self
    }

    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    pub fn build(self, version: Version, community: &[u8]) -> Bytes {
        let pdu = Pdu {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: self.error_status,
            error_index: self.error_index,
            varbinds: self.varbinds,
        };
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu).encode()
    }

    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }

    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn mock() -> MockTransport {
        MockTransport::new("127.0.0.1:161".parse().unwrap())
    }

    fn request(id: i32) -> Bytes {
        CommunityMessage::v1(&b"public"[..], Pdu::get_request(id, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]))
            .encode()
    }

    #[tokio::test]
    async fn records_requests_with_ids_and_oids() {
        let mock = mock();
        mock.send(&request(5)).await.unwrap();
        mock.send(b"garbage").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].request_id, Some(5));
        assert_eq!(requests[0].oids, vec![oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
        assert_eq!(requests[1].request_id, None);
        assert!(requests[1].oids.is_empty());
    }

    #[tokio::test]
    async fn patches_request_id() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("router"))
                .build_v1(b"public"),
        );

        mock.send(&request(999)).await.unwrap();
        let (data, _) = mock.recv(999, Duration::from_secs(1)).await.unwrap();
        let msg = CommunityMessage::decode(data).unwrap();
        assert_eq!(msg.pdu.request_id, 999);
        assert_eq!(msg.pdu.varbinds[0].value, Value::from("router"));
    }

    #[tokio::test]
    async fn raw_response_is_untouched() {
        let mock = mock();
        let raw = ResponseBuilder::new(1).build_v1(b"public");
        mock.queue_raw_response(raw.clone());

        mock.send(&request(2)).await.unwrap();
        let (data, _) = mock.recv(2, Duration::from_secs(1)).await.unwrap();
        assert_eq!(data, raw);
    }

    #[tokio::test]
    async fn empty_queue_times_out() {
        let mock = mock();
        mock.queue_io_error("unreachable");

        assert!(matches!(
            mock.recv(1, Duration::from_millis(10)).await,
            Err(Error::Io { .. })
        ));
        assert!(matches!(
            mock.recv(1, Duration::from_millis(10)).await,
            Err(Error::Timeout { request_id: 1, .. })
        ));
    }

    #[tokio::test]
    async fn default_response_repeats() {
        let mock = mock();
        let response = ResponseBuilder::new(1).build_v2c(b"public");
        mock.set_default_response(MockResponse::RawData(response.clone()));

        for id in 1..=3 {
            let (data, _) = mock.recv(id, Duration::from_secs(1)).await.unwrap();
            assert_eq!(data, response);
        }
    }

    #[tokio::test]
    async fn counts_closes() {
        let mock = mock();
        let handle = mock.clone();
        assert_eq!(handle.close_count(), 0);
        mock.close().await;
        assert_eq!(handle.close_count(), 1);
    }
}
