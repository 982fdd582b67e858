use crate::calendar::DateKey;
use crate::store::{NoteMap, NotesStore, StoreError};
use crate::view::{FetchRequest, UpsertRequest};
use log::{debug, warn};
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{Builder, JoinHandle};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum StoreRequest {
    Fetch(FetchRequest),
    Upsert(UpsertRequest),
}

#[derive(Debug)]
pub(crate) enum StoreResponse {
    Fetched {
        request: FetchRequest,
        result: Result<NoteMap, StoreError>,
    },
    Upserted {
        key: DateKey,
        result: Result<(), StoreError>,
    },
}

/// Runs a [`NotesStore`] on its own thread so that the UI never waits on it.
/// Requests are handled one at a time in the order they were sent.
#[derive(Debug)]
pub(crate) struct StoreWorker {
    requests: Option<Sender<StoreRequest>>,
    responses: Receiver<StoreResponse>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    pub(crate) fn spawn(store: Box<dyn NotesStore>) -> io::Result<StoreWorker> {
        let (req_tx, req_rx) = channel();
        let (resp_tx, resp_rx) = channel();
        let handle = Builder::new()
            .name(String::from("notes-store"))
            .spawn(move || serve(store, &req_rx, &resp_tx))?;
        Ok(StoreWorker {
            requests: Some(req_tx),
            responses: resp_rx,
            handle: Some(handle),
        })
    }

    pub(crate) fn send(&self, request: StoreRequest) -> Result<(), StoreError> {
        self.requests
            .as_ref()
            .ok_or(StoreError::Disconnected)?
            .send(request)
            .map_err(|_| StoreError::Disconnected)
    }

    /// Returns the next finished request, if any, without blocking
    pub(crate) fn try_recv(&self) -> Option<StoreResponse> {
        self.responses.try_recv().ok()
    }

    #[cfg(test)]
    pub(crate) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<StoreResponse> {
        self.responses.recv_timeout(timeout).ok()
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker's loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            debug!("event=worker_drain");
            if handle.join().is_err() {
                warn!("event=worker_exit status=panicked");
            }
        }
    }
}

fn serve(
    mut store: Box<dyn NotesStore>,
    requests: &Receiver<StoreRequest>,
    responses: &Sender<StoreResponse>,
) {
    debug!("event=worker_start");
    for request in requests {
        let response = match request {
            StoreRequest::Fetch(request) => {
                let result = store.fetch_month(request.cursor);
                if let Err(e) = &result {
                    warn!(
                        "event=fetch_failed month={} generation={} error={e}",
                        request.cursor, request.generation
                    );
                }
                StoreResponse::Fetched { request, result }
            }
            StoreRequest::Upsert(UpsertRequest { key, text }) => {
                let result = store.upsert_note(key, &text);
                if let Err(e) = &result {
                    warn!("event=commit_failed date={key} error={e}");
                }
                StoreResponse::Upserted { key, result }
            }
        };
        if responses.send(response).is_err() {
            break;
        }
    }
    debug!("event=worker_stop");
}
