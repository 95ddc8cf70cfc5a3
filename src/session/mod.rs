//! Command-driven recompute loop. Each command describes one user interaction;
//! anything that changes what is shown ends in a single `build → layout`
//! recompute that replaces the previous frame wholesale.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::flow::{FlowGraph, FlowOptions, build};
use crate::layout::{LaidOutGraph, LayoutConfig, layout};
use crate::nutrients::{NutrientAmounts, ResolvedQuantities, resolve};
use crate::source::NutrientSource;

mod debounce;
mod loader;

pub use debounce::Debouncer;

use loader::{Loader, Response};

pub const RESIZE_QUIET_PERIOD: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SelectFood(u64),
    SetOptions(FlowOptions),
    SetReverseFlow(bool),
    Resize { width: f64, height: f64 },
    /// Re-issues the fetch for a food whose load failed with a retryable error.
    Retry,
}

/// Everything needed to draw one food.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub food_id: u64,
    pub quantities: ResolvedQuantities,
    pub graph: FlowGraph,
    pub layout: LaidOutGraph,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Loading {
        food_id: u64,
    },
    Ready(Box<Frame>),
    Failed {
        food_id: u64,
        error: String,
        retryable: bool,
    },
}

pub struct Session<S: NutrientSource> {
    source: Arc<S>,
    options: FlowOptions,
    config: LayoutConfig,
    loader: Loader,
    resize: Debouncer<(f64, f64)>,
    loaded: Option<(u64, NutrientAmounts)>,
    state: SessionState,
}

impl<S: NutrientSource> Session<S> {
    pub fn new(source: Arc<S>, config: LayoutConfig) -> Self {
        Self {
            source,
            options: FlowOptions::default(),
            config,
            loader: Loader::new(),
            resize: Debouncer::new(RESIZE_QUIET_PERIOD),
            loaded: None,
            state: SessionState::Idle,
        }
    }

    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn frame(&self) -> Option<&Frame> {
        match &self.state {
            SessionState::Ready(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn options(&self) -> FlowOptions {
        self.options
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Whether a resize is waiting for its quiet period to end.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::SelectFood(food_id) => self.load(food_id),
            Command::SetOptions(options) => {
                if options != self.options {
                    self.options = options;
                    self.recompute();
                }
            }
            Command::SetReverseFlow(reverse_flow) => {
                if reverse_flow != self.config.reverse_flow {
                    self.config.reverse_flow = reverse_flow;
                    self.recompute();
                }
            }
            Command::Resize { width, height } => self.resize.push((width, height), now),
            Command::Retry => match self.state {
                SessionState::Failed {
                    food_id,
                    retryable: true,
                    ..
                } => self.load(food_id),
                _ => log::debug!("nothing to retry"),
            },
        }
    }

    /// Applies a finished fetch, if the newest one has arrived. Returns whether
    /// the state changed.
    pub fn poll(&mut self) -> bool {
        match self.loader.try_latest() {
            Some(response) => {
                self.apply(response);
                true
            }
            None => false,
        }
    }

    /// Like [`Session::poll`], but blocks up to `timeout` for the newest fetch.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        if !matches!(self.state, SessionState::Loading { .. }) {
            return false;
        }

        match self.loader.wait_latest(timeout) {
            Some(response) => {
                self.apply(response);
                true
            }
            None => false,
        }
    }

    /// Applies a debounced resize once it has settled. Returns whether the
    /// layout was recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some((width, height)) = self.resize.flush(now) else {
            return false;
        };

        self.config.width = width;
        self.config.height = height;
        self.recompute();
        true
    }

    fn load(&mut self, food_id: u64) {
        let generation = self.loader.request(Arc::clone(&self.source), food_id);
        log::debug!("loading food {food_id} (generation {generation})");
        self.loaded = None;
        self.state = SessionState::Loading { food_id };
    }

    fn apply(&mut self, response: Response) {
        let Response {
            generation,
            food_id,
            result,
        } = response;
        debug_assert_eq!(generation, self.loader.generation());

        match result {
            Ok(amounts) => {
                self.loaded = Some((food_id, amounts));
                self.recompute();
            }
            Err(error) => {
                log::warn!("failed to load food {food_id}: {error}");
                self.state = SessionState::Failed {
                    food_id,
                    retryable: error.is_retryable(),
                    error: error.to_string(),
                };
            }
        }
    }

    fn recompute(&mut self) {
        let Some((food_id, amounts)) = &self.loaded else {
            return;
        };

        let quantities = resolve(amounts);
        let graph = build(&quantities, self.options);
        let config = self
            .config
            .with_reverse_hierarchy(self.options.reverse_hierarchy);
        let laid_out = layout(&graph, &config);

        self.state = SessionState::Ready(Box::new(Frame {
            food_id: *food_id,
            quantities,
            graph,
            layout: laid_out,
        }));
    }
}
