//! The pacemaker actor loop.
//!
//! One tokio task owns the [`Pacemaker`] and serialises every event: an
//! inbound message from the transport channel, or the round deadline. The
//! actor terminates only on a fatal (locally produced) encoding error or
//! when the transport channel closes.

use crate::error::ConsensusError;
use crate::pacemaker::{ChainDriver, MsgOutbound, Pacemaker};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use volta_messages::ConsensusMessage;
use volta_types::{NetAddress, Timestamp};

/// An inbound consensus message with its sender.
#[derive(Debug)]
pub struct Inbound {
    pub msg: ConsensusMessage,
    pub from: NetAddress,
}

/// Run the pacemaker until the channel closes or a fatal error occurs.
pub async fn run<O, D>(
    mut pacemaker: Pacemaker<O, D>,
    mut rx: mpsc::Receiver<Inbound>,
) -> Result<(), ConsensusError>
where
    O: MsgOutbound,
    D: ChainDriver,
{
    let mut deadline = Instant::now() + pacemaker.timer.interval();

    loop {
        tokio::select! {
            inbound = rx.recv() => {
                let Some(Inbound { msg, from }) = inbound else {
                    tracing::info!("transport channel closed, pacemaker stopping");
                    return Ok(());
                };
                let now = Timestamp::now().as_secs();
                pacemaker.handle_message(msg, from, now)?;
                deadline = Instant::now() + pacemaker.timer.interval();
            }
            _ = sleep_until(deadline) => {
                let now = Timestamp::now().as_secs();
                if let Err(e) = pacemaker.on_round_timeout(now) {
                    match e {
                        ConsensusError::Fatal(_) => return Err(e),
                        other => tracing::warn!(error = %other, "timeout handling failed"),
                    }
                }
                deadline = Instant::now() + pacemaker.timer.interval();
            }
        }
    }
}
