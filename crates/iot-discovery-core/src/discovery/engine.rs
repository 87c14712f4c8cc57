//! Discovery engine.
//!
//! Owns the roster and drives two independent paths against it: a duty-cycle
//! timer that broadcasts `DISCOVER` requests, and a receive loop that
//! reconciles announcements. Both paths go through one `RwLock`, so a
//! snapshot never observes a half-applied upsert.

use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::config::DiscoveryConfig;
use crate::device::{HttpSilencer, SilenceNotifier};
use crate::error::{CoreError, DiscoveryError};
use crate::net::{advertised_ip, create_discovery_socket};
use crate::protocol::{decode, encode_request, Announcement, InboundMessage};
use crate::types::DiscoverableDevice;

use super::notifier::ChangeNotifier;
use super::roster::{DeviceRoster, UpsertResult};

/// Largest datagram accepted; anything longer is truncated and fails to parse
const RECEIVE_BUFFER_SIZE: usize = 8192;

/// Pause after a failed receive so a persistent socket error cannot spin
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
}

/// What happened to a single inbound datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Not parseable or neither message shape
    Invalid,
    /// A request from another server
    IgnoredRequest,
    Reconciled(UpsertResult),
}

struct EngineInner {
    config: DiscoveryConfig,
    roster: RwLock<DeviceRoster>,
    changes: ChangeNotifier,
    silencer: Arc<dyn SilenceNotifier>,
    state: Mutex<EngineState>,
}

/// Cheaply cloneable handle to a discovery engine.
#[derive(Clone)]
pub struct DiscoveryEngine {
    inner: Arc<EngineInner>,
}

impl DiscoveryEngine {
    pub fn new(config: DiscoveryConfig, silencer: Arc<dyn SilenceNotifier>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                roster: RwLock::new(DeviceRoster::new()),
                changes: ChangeNotifier::new(),
                silencer,
                state: Mutex::new(EngineState::Uninitialized),
            }),
        }
    }

    /// Engine that silences devices over HTTP.
    pub fn with_http_silencer(config: DiscoveryConfig) -> Result<Self, CoreError> {
        let silencer = HttpSilencer::new(config.silence_timeout())?;
        Ok(Self::new(config, Arc::new(silencer)))
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.inner.config
    }

    pub fn state(&self) -> EngineState {
        *self.lock_state()
    }

    /// Signal fired after every roster insert or address update.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.inner.changes.subscribe()
    }

    /// Current roster contents in insertion order.
    pub async fn devices(&self) -> Vec<DiscoverableDevice> {
        self.inner.roster.read().await.snapshot()
    }

    pub async fn device_count(&self) -> usize {
        self.inner.roster.read().await.len()
    }

    /// Bind the discovery port and start the receive loop and duty cycle.
    ///
    /// An invalid configuration or a bind failure leaves the engine
    /// `Uninitialized`; retrying is up to the caller. Dropping the returned
    /// handle stops both tasks.
    pub async fn start(&self) -> Result<EngineHandle, DiscoveryError> {
        if self.state() == EngineState::Running {
            return Err(DiscoveryError::AlreadyRunning);
        }

        log::info!("Discovery System: Initializing");

        if let Err(e) = self.inner.config.validate() {
            log::error!("Discovery System: Failure");
            log::error!("Reason: {}", e);
            return Err(DiscoveryError::InvalidConfig(e));
        }

        let port = self.inner.config.port;
        let (socket, local_addr) = match bind_socket(port, self.inner.config.reuse_port) {
            Ok(bound) => bound,
            Err(source) => {
                log::error!("Discovery System: Failure");
                log::error!("Reason: {}", source);
                return Err(DiscoveryError::Bind { port, source });
            }
        };
        let socket = Arc::new(socket);

        {
            let mut state = self.lock_state();
            if *state == EngineState::Running {
                return Err(DiscoveryError::AlreadyRunning);
            }
            *state = EngineState::Running;
        }

        let target = self.broadcast_target(local_addr.port());

        let receiver = tokio::spawn(receive_loop(self.clone(), Arc::clone(&socket)));
        let ticker = tokio::spawn(broadcast_loop(self.clone(), socket, target));

        log::info!(
            "Discovery System: Initialized on port {}",
            local_addr.port()
        );

        Ok(EngineHandle {
            engine: self.clone(),
            local_addr,
            tasks: vec![receiver, ticker],
        })
    }

    /// Run the receive algorithm for one datagram from `sender`.
    ///
    /// Never fails: every problem is terminal to the packet and only logged.
    pub async fn handle_packet(&self, data: &[u8], sender: IpAddr) -> PacketOutcome {
        log::debug!("Discovery System: Received UDP packet from {}", sender);
        log::trace!("   >>> {}", String::from_utf8_lossy(data));

        match decode(data, &sender.to_string()) {
            Ok(InboundMessage::DiscoveryRequest) => {
                log::debug!("Discovery System: Ignoring discovery request");
                PacketOutcome::IgnoredRequest
            }
            Ok(InboundMessage::Announcement(announcement)) => {
                PacketOutcome::Reconciled(self.reconcile(announcement).await)
            }
            Err(e) => {
                log::debug!("Discovery System: UDP packet not valid: {}", e);
                PacketOutcome::Invalid
            }
        }
    }

    async fn reconcile(&self, announcement: Announcement) -> UpsertResult {
        let mut roster = self.inner.roster.write().await;

        let previous_ip = roster
            .find_by_name(&announcement.name)
            .map(|device| device.ip_address.clone());

        // Silence from the incoming announcement, before the roster changes.
        if let Some(callback) = announcement.callback_address() {
            self.inner.silencer.silence(&callback);
        }

        let result = roster.upsert(announcement.to_device());
        match result {
            UpsertResult::Inserted => log::info!(
                "Discovery System: Added {} @ {}",
                announcement.name,
                announcement.ip_address
            ),
            UpsertResult::Updated => log::info!(
                "Discovery System: Updated {} @ {} (was {})",
                announcement.name,
                announcement.ip_address,
                previous_ip.unwrap_or_default()
            ),
            UpsertResult::Unchanged => log::debug!(
                "Discovery System: {} @ {} already known",
                announcement.name,
                announcement.ip_address
            ),
        }

        if result.is_change() {
            self.inner.changes.notify();
        }

        result
    }

    /// Serialize a discovery request embedding the current roster.
    pub async fn build_request(&self) -> Vec<u8> {
        let known_devices = self.devices().await;
        let self_ip = advertised_ip(self.inner.config.advertise_ip);
        encode_request(&known_devices, &self.inner.config.product, &self_ip)
    }

    /// Requests go to the broadcast address on the port we listen on.
    fn broadcast_target(&self, listen_port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(self.inner.config.broadcast_address), listen_port)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Running engine. Dropping it stops the background tasks.
pub struct EngineHandle {
    engine: DiscoveryEngine,
    local_addr: SocketAddr,
    tasks: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn engine(&self) -> &DiscoveryEngine {
        &self.engine
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        *self.engine.lock_state() = EngineState::Uninitialized;
    }
}

fn bind_socket(port: u16, reuse_port: bool) -> Result<(UdpSocket, SocketAddr), std::io::Error> {
    let socket = UdpSocket::from_std(create_discovery_socket(port, reuse_port)?)?;
    let local_addr = socket.local_addr()?;
    Ok((socket, local_addr))
}

async fn receive_loop(engine: DiscoveryEngine, socket: Arc<UdpSocket>) {
    let mut buf = vec![0u8; RECEIVE_BUFFER_SIZE];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, addr)) => {
                engine.handle_packet(&buf[..len], addr.ip()).await;
            }
            Err(e) => receive_failed(e).await,
        }
    }
}

async fn receive_failed(e: std::io::Error) {
    log::warn!("Discovery System: UDP receive error: {}", e);
    tokio::time::sleep(RECEIVE_ERROR_BACKOFF).await;
}

async fn broadcast_loop(engine: DiscoveryEngine, socket: Arc<UdpSocket>, target: SocketAddr) {
    let mut ticker = interval(engine.config().interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let send_timeout = engine.config().send_timeout();

    loop {
        ticker.tick().await;

        log::debug!("Discovery System: Sending Discovery Request");
        let payload = engine.build_request().await;
        log::trace!("   >>> {}", String::from_utf8_lossy(&payload));

        tokio::spawn(send_request(
            Arc::clone(&socket),
            payload,
            target,
            send_timeout,
        ));
    }
}

async fn send_request(
    socket: Arc<UdpSocket>,
    payload: Vec<u8>,
    target: SocketAddr,
    send_timeout: Duration,
) {
    match timeout(send_timeout, socket.send_to(&payload, target)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            log::warn!("Discovery System: {}", DiscoveryError::Send(e));
        }
        Err(_) => {
            log::warn!(
                "Discovery System: Discovery request to {} timed out",
                target
            );
        }
    }
}
