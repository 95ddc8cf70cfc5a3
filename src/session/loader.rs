use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::nutrients::NutrientAmounts;
use crate::source::{FetchError, NutrientSource};

pub(super) struct Response {
    pub(super) generation: u64,
    pub(super) food_id: u64,
    pub(super) result: Result<NutrientAmounts, FetchError>,
}

/// Runs fetches on background threads. Each request gets a new generation;
/// only a response carrying the newest generation is ever handed out.
pub(super) struct Loader {
    generation: u64,
    tx: Sender<Response>,
    rx: Receiver<Response>,
}

impl Loader {
    pub(super) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generation: 0,
            tx,
            rx,
        }
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn request<S: NutrientSource>(&mut self, source: Arc<S>, food_id: u64) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();

        thread::spawn(move || {
            let result = source.fetch_amounts(food_id);
            let _ = tx.send(Response {
                generation,
                food_id,
                result,
            });
        });

        generation
    }

    fn accept(&self, response: Response) -> Option<Response> {
        if response.generation == self.generation {
            Some(response)
        } else {
            log::debug!(
                "dropping superseded response for food {} (generation {} < {})",
                response.food_id,
                response.generation,
                self.generation
            );
            None
        }
    }

    /// Drains every response that has arrived and returns the current one, if
    /// it is among them.
    pub(super) fn try_latest(&mut self) -> Option<Response> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(response) => {
                    if let Some(response) = self.accept(response) {
                        latest = Some(response);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }

    /// Blocks until the current generation's response arrives or `timeout`
    /// elapses. Superseded responses received meanwhile are dropped.
    pub(super) fn wait_latest(&mut self, timeout: Duration) -> Option<Response> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(response) => {
                    if let Some(response) = self.accept(response) {
                        return Some(response);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    #[cfg(test)]
    pub(super) fn sender(&self) -> Sender<Response> {
        self.tx.clone()
    }

    #[cfg(test)]
    pub(super) fn advance(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(generation: u64, food_id: u64) -> Response {
        Response {
            generation,
            food_id,
            result: Ok(NutrientAmounts::new()),
        }
    }

    #[test]
    fn superseded_responses_are_dropped() {
        let mut loader = Loader::new();
        let first = loader.advance();
        let second = loader.advance();
        let tx = loader.sender();

        tx.send(response(second, 2)).unwrap();
        tx.send(response(first, 1)).unwrap();

        let latest = loader.try_latest().unwrap();
        assert_eq!(latest.food_id, 2);
        assert!(loader.try_latest().is_none());
    }

    #[test]
    fn late_stale_response_never_surfaces() {
        let mut loader = Loader::new();
        let first = loader.advance();
        loader.advance();
        loader.sender().send(response(first, 1)).unwrap();

        assert!(loader.try_latest().is_none());
        assert!(loader.wait_latest(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn waits_for_background_fetch() {
        struct Fixed;
        impl NutrientSource for Fixed {
            fn fetch_amounts(&self, _food_id: u64) -> Result<NutrientAmounts, FetchError> {
                Ok(NutrientAmounts::from_iter([("Water", 90.0)]))
            }
        }

        let mut loader = Loader::new();
        let generation = loader.request(Arc::new(Fixed), 5);
        let response = loader.wait_latest(Duration::from_secs(5)).unwrap();

        assert_eq!(response.generation, generation);
        assert_eq!(response.food_id, 5);
        assert_eq!(response.result.unwrap().positive("water"), Some(90.0));
    }
}
