//! Host/joiner session protocol.
//!
//! Inbound relay events are queued by the transport and applied here once
//! per tick, so a payload never lands in the middle of a step. The host is
//! the only authority: it merges joiner debris and actions into its world,
//! while a joiner throws its world away and takes each snapshot verbatim.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::game::body::{Body, BodyKind, WireBody};
use crate::game::context::{MatchContext, MatchMode};
use crate::util::rate_limit::DebrisRateLimiter;

use super::address::SessionId;
use super::protocol::{self, Channel, ClientPayload, HostPayload};
use super::transport::{Connector, Envelope, Transport, TransportError};

/// An open relay session
pub struct ActiveSession {
    id: SessionId,
    transport: Box<dyn Transport>,
    inbound: mpsc::UnboundedReceiver<Envelope>,
    debris_limiter: DebrisRateLimiter,
}

impl ActiveSession {
    pub fn open(
        connector: &dyn Connector,
        id: SessionId,
        debris_per_second: u32,
    ) -> Result<Self, TransportError> {
        let connection = connector.connect(id)?;
        Ok(Self {
            id,
            transport: connection.transport,
            inbound: connection.inbound,
            debris_limiter: DebrisRateLimiter::new(debris_per_second),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Close the transport and drop anything still queued
    pub fn close(mut self) {
        self.transport.close();
        self.inbound.close();
        debug!(session_id = %self.id, "Session closed");
    }

    /// Fire-and-forget send; failures are logged, never retried
    fn send<T: Serialize>(&self, channel: Channel, payload: &T) {
        let text = match protocol::encode(payload) {
            Ok(text) => text,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Failed to encode payload");
                return;
            }
        };
        if let Err(e) = self.transport.emit(channel, text) {
            warn!(
                session_id = %self.id,
                channel = channel.event_name(),
                error = %e,
                "Transport send failed"
            );
        }
    }

    fn take_inbound(&mut self) -> Vec<Envelope> {
        let mut pending = Vec::new();
        while let Ok(envelope) = self.inbound.try_recv() {
            pending.push(envelope);
        }
        pending
    }
}

/// Apply every queued relay event to the match; returns how many were applied
pub fn drain_inbound(ctx: &mut MatchContext) -> usize {
    let pending = match ctx.session.as_mut() {
        Some(session) => session.take_inbound(),
        None => return 0,
    };

    let mut applied = 0;
    for envelope in pending {
        match (ctx.mode, envelope.channel) {
            (MatchMode::Host, Channel::ClientPayloadFromServer) => {
                match protocol::decode::<ClientPayload>(envelope.channel, &envelope.text) {
                    Ok(payload) => {
                        apply_client_payload(ctx, payload);
                        applied += 1;
                    }
                    Err(e) => warn!(error = %e, "Dropping client payload"),
                }
            }
            (MatchMode::Joiner, Channel::HostPayloadFromServer) => {
                match protocol::decode::<HostPayload>(envelope.channel, &envelope.text) {
                    Ok(payload) => {
                        apply_host_payload(ctx, payload);
                        applied += 1;
                    }
                    Err(e) => warn!(error = %e, "Dropping host payload"),
                }
            }
            (mode, channel) => {
                debug!(?mode, channel = channel.event_name(), "Ignoring event for another role");
            }
        }
    }
    applied
}

/// Host side: merge joiner debris and take the joiner's latest actions
pub fn apply_client_payload(ctx: &mut MatchContext, payload: ClientPayload) {
    if let Some(debris) = payload.debris {
        for wire in debris.into_vec() {
            let Some(body) = rehydrate(wire) else {
                continue;
            };
            if body.kind != BodyKind::Debris {
                warn!(body_id = body.id.0, "Joiner sent a non-debris body, ignoring");
                continue;
            }
            let allowed = ctx
                .session
                .as_ref()
                .map(|s| s.debris_limiter.check())
                .unwrap_or(true);
            if !allowed {
                warn!(body_id = body.id.0, "Rate limited joiner debris");
                continue;
            }
            ctx.world.push(body);
        }
    }

    if let Some(actions) = payload.actions.as_ref().and_then(|a| a.first()) {
        if let Some(remote) = ctx.agents.remote_mut() {
            remote.actions = *actions;
        }
    }
}

/// Joiner side: the snapshot replaces the whole world
pub fn apply_host_payload(ctx: &mut MatchContext, payload: HostPayload) {
    let bodies: Vec<Body> = payload.all_objects.into_iter().filter_map(rehydrate).collect();
    ctx.world.replace(bodies);
    ctx.agents.adopt_remote_actions(&ctx.world);
}

/// Give a received body back its behavioural type, or skip it
fn rehydrate(wire: WireBody) -> Option<Body> {
    match Body::try_from(wire) {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(error = %e, "Skipping undecodable body");
            None
        }
    }
}

/// Joiner side: send this tick's local actions
pub fn emit_actions(ctx: &MatchContext) {
    let (Some(session), Some(local)) = (ctx.session.as_ref(), ctx.agents.local()) else {
        return;
    };
    session.send(Channel::ClientPayload, &ClientPayload::actions(local.actions));
}

/// Host side: send the full body set
pub fn emit_snapshot(ctx: &MatchContext) {
    if let Some(session) = ctx.session.as_ref() {
        session.send(Channel::HostPayload, &HostPayload::from_world(&ctx.world));
    }
}

/// Joiner side: ask the host to spawn a debris body
pub fn emit_debris(ctx: &MatchContext, body: &Body) {
    if let Some(session) = ctx.session.as_ref() {
        session.send(Channel::ClientPayload, &ClientPayload::debris(body));
    }
}
