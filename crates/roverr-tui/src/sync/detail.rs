//! Per-entity poller for the movie detail view.

use std::future::Future;
use std::time::Duration;

use roverr_proto::client::{ApiClient, ApiResult};
use roverr_proto::protocol::{LiveFields, MovieDetail, Status};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::store::View;

/// What one fetched detail means for the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Status changed: rebuild the whole view.
    Rerender { terminal: bool },
    /// Same status: touch only the live figures.
    Patch(Option<LiveFields>),
}

#[derive(Debug, Clone)]
pub struct EntityPoller {
    id: String,
    last_status: Status,
}

impl EntityPoller {
    /// Only entities that can still change on their own are polled.
    pub fn should_start(initial: &MovieDetail) -> bool {
        initial.status().is_live()
    }

    pub fn new(initial: &MovieDetail) -> Self {
        Self {
            id: initial.id().to_string(),
            last_status: initial.status(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Still looking at this entity?
    pub fn guard(&self, view: &View) -> bool {
        view.detail_id() == Some(self.id.as_str())
    }

    pub fn observe(&mut self, detail: &MovieDetail) -> Observation {
        let status = detail.status();
        if status != self.last_status {
            debug!(
                "[detail] {} {} -> {}",
                self.id, self.last_status, status
            );
            self.last_status = status;
            Observation::Rerender {
                terminal: status.is_terminal(),
            }
        } else {
            Observation::Patch(detail.live_fields())
        }
    }
}

pub trait DetailSource: Send + Sync + 'static {
    fn detail(&self, id: &str) -> impl Future<Output = ApiResult<MovieDetail>> + Send;
}

impl DetailSource for ApiClient {
    async fn detail(&self, id: &str) -> ApiResult<MovieDetail> {
        self.movie_detail(id).await
    }
}

#[derive(Debug)]
pub enum DetailEvent {
    Rerender(Box<MovieDetail>),
    Patch {
        id: String,
        live: Option<LiveFields>,
    },
}

pub struct DetailPoller<S> {
    source: S,
    poller: EntityPoller,
    interval: Duration,
    view: watch::Receiver<View>,
    events: mpsc::Sender<DetailEvent>,
    cancel: CancellationToken,
}

impl<S: DetailSource> DetailPoller<S> {
    pub fn new(
        source: S,
        poller: EntityPoller,
        interval: Duration,
        view: watch::Receiver<View>,
        events: mpsc::Sender<DetailEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            poller,
            interval,
            view,
            events,
            cancel,
        }
    }

    pub async fn run(mut self) {
        info!("[detail] polling {}", self.poller.id());
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let in_view = self.poller.guard(&self.view.borrow());
            if !in_view {
                debug!("[detail] {} left view", self.poller.id());
                break;
            }

            let detail = match self.source.detail(self.poller.id()).await {
                Ok(d) => d,
                Err(e) => {
                    warn!("[detail] {} fetch failed: {}", self.poller.id(), e);
                    continue;
                }
            };

            let event = match self.poller.observe(&detail) {
                Observation::Rerender { terminal } => {
                    let sent = self
                        .events
                        .send(DetailEvent::Rerender(Box::new(detail)))
                        .await;
                    if terminal || sent.is_err() {
                        break;
                    }
                    continue;
                }
                Observation::Patch(live) => DetailEvent::Patch {
                    id: self.poller.id().to_string(),
                    live,
                },
            };
            if self.events.send(event).await.is_err() {
                break;
            }
        }
        info!("[detail] stopped polling {}", self.poller.id());
    }
}
