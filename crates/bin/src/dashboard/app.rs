//! Dashboard state.

use std::time::Instant;

use ff5::PredictionSession;
use ff5_data::parse_date_label;
use ff5_model::{Factor, format_input};

/// How long a status message stays visible, in seconds.
const STATUS_TTL_SECS: u64 = 5;

/// Input mode of the factor fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum InputMode {
    /// Keys navigate and nudge
    #[default]
    Normal,
    /// Keys edit the focused value as text
    Editing,
}

/// Everything the charts and result line need for the selected stock.
#[derive(Debug, Clone)]
pub(crate) struct View {
    /// Predicted excess return for the current inputs
    pub(crate) prediction: f64,
    /// In-sample R-squared
    pub(crate) r_squared: f64,
    /// Number of observations
    pub(crate) nobs: usize,
    /// Sample date labels
    pub(crate) dates: Vec<String>,
    /// Observed excess returns, indexed by position
    pub(crate) actual: Vec<(f64, f64)>,
    /// Fitted excess returns, indexed by position
    pub(crate) fitted: Vec<(f64, f64)>,
    /// Compounded factor returns, indexed by position
    pub(crate) growth: Vec<(Factor, Vec<(f64, f64)>)>,
}

impl View {
    /// Axis labels for the first, middle and last sample dates.
    pub(crate) fn date_labels(&self) -> Vec<String> {
        let label = |i: usize| {
            self.dates
                .get(i)
                .map(|d| {
                    parse_date_label(d)
                        .map_or_else(|| d.clone(), |date| date.format("%Y-%m").to_string())
                })
                .unwrap_or_default()
        };

        match self.dates.len() {
            0 => Vec::new(),
            n => vec![label(0), label(n / 2), label(n - 1)],
        }
    }
}

fn indexed(values: impl IntoIterator<Item = f64>) -> Vec<(f64, f64)> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect()
}

/// Main application state.
#[derive(Debug)]
pub(crate) struct App {
    /// Data, selection, inputs and cached fits
    pub(crate) session: PredictionSession,
    /// Input field with keyboard focus
    pub(crate) focus: Factor,
    /// Current input mode
    pub(crate) input_mode: InputMode,
    /// Text being typed while editing
    pub(crate) edit_buffer: String,
    /// Status message with the time it was set
    pub(crate) status_message: Option<(String, Instant)>,
    /// Whether the app should quit
    pub(crate) should_quit: bool,
    /// Render data for the selected stock, or why it could not be fitted
    pub(crate) view: Result<View, String>,
}

impl App {
    pub(crate) fn new(session: PredictionSession) -> Self {
        let mut app = Self {
            session,
            focus: Factor::MarketExcess,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            status_message: None,
            should_quit: false,
            view: Err(String::new()),
        };
        app.refresh();
        app
    }

    /// Set a status message that will be displayed temporarily.
    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clear expired status messages.
    pub(crate) fn clear_expired_status(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed().as_secs() > STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    /// Recompute the view from the session. Fits come from the cache after
    /// the first time a stock is shown.
    pub(crate) fn refresh(&mut self) {
        self.view = self.build_view().map_err(|err| {
            tracing::warn!(symbol = self.session.selected(), %err, "could not fit model");
            err.to_string()
        });
        if let Err(message) = &self.view {
            let message = format!("{}: {}", self.session.selected(), message);
            self.set_status(message);
        }
    }

    fn build_view(&mut self) -> ff5::Result<View> {
        let growth = self
            .session
            .cumulative_factor_returns()?
            .into_iter()
            .map(|(factor, values)| (factor, indexed(values)))
            .collect();

        let (model, prediction) = self.session.predict()?;
        let series = model.fitted_series();

        Ok(View {
            prediction,
            r_squared: model.ols().r_squared(),
            nobs: model.ols().nobs(),
            dates: model.dates().to_vec(),
            actual: indexed(series.iter().map(|p| p.actual)),
            fitted: indexed(series.iter().map(|p| p.fitted)),
            growth,
        })
    }

    /// Only the prediction depends on the inputs; charts stay as they are.
    fn refresh_prediction(&mut self) {
        let inputs = *self.session.inputs();
        if let Ok(view) = &mut self.view {
            if let Ok(model) = self.session.model() {
                view.prediction = model.predict(&inputs);
            }
        }
    }

    pub(crate) fn next_stock(&mut self) {
        self.session.select_next();
        self.refresh();
    }

    pub(crate) fn previous_stock(&mut self) {
        self.session.select_previous();
        self.refresh();
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = Factor::ALL[(self.focus.index() + 1) % Factor::ALL.len()];
    }

    pub(crate) fn focus_previous(&mut self) {
        let count = Factor::ALL.len();
        self.focus = Factor::ALL[(self.focus.index() + count - 1) % count];
    }

    /// Move the focused input by `steps` increments.
    pub(crate) fn nudge(&mut self, steps: i64) {
        self.session.nudge_input(self.focus, steps);
        self.refresh_prediction();
    }

    /// Start editing the focused input with its current value.
    pub(crate) fn start_editing(&mut self) {
        self.edit_buffer = format_input(self.session.inputs().get(self.focus));
        self.input_mode = InputMode::Editing;
    }

    /// Parse and apply the edit buffer. The old value stays on failure.
    pub(crate) fn commit_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        let text = std::mem::take(&mut self.edit_buffer);

        let value = match text.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                self.set_status(format!("{}: '{}' is not a number", self.focus, text.trim()));
                return;
            }
        };

        match self.session.set_input(self.focus, value) {
            Ok(()) => self.refresh_prediction(),
            Err(err) => self.set_status(err.to_string()),
        }
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }
}
