use futures::channel::oneshot;
use tracing::error;
use vtc_shared::debug_panic;

#[derive(Debug)]
pub struct AwaitingType<T>(pub oneshot::Receiver<anyhow::Result<T>>);

/// Lifecycle of data requested from the backend by a page
#[derive(Debug, Default)]
pub enum DataState<T> {
    #[default]
    None,
    AwaitingResponse(AwaitingType<T>),
    Present(T),
    Failed(String),
}

impl<T> DataState<T> {
    /// Starts the request if nothing was requested yet, otherwise checks if the
    /// response has arrived. With a `ui` spinners and errors (with a retry
    /// button) are shown as applicable.
    ///
    /// `fetch_fn` is only called when a request is started
    pub fn get<F>(&mut self, ui: Option<&mut egui::Ui>, retry_msg: Option<&str>, fetch_fn: F)
    where
        F: FnOnce() -> AwaitingType<T>,
    {
        match self {
            DataState::None => {
                if let Some(ui) = ui {
                    ui.spinner();
                }
                *self = DataState::AwaitingResponse(fetch_fn());
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = Self::await_data(ui, rx) {
                    *self = new_state;
                }
            }
            DataState::Present(_) => {
                error!("data requested when already present");
                debug_panic!("precondition not satisfied: data is already present");
            }
            DataState::Failed(e) => {
                if let Some(ui) = ui {
                    ui.colored_label(ui.visuals().error_fg_color, e.as_str());
                    if ui.button(retry_msg.unwrap_or("Retry")).clicked() {
                        *self = DataState::default();
                    }
                }
            }
        }
    }

    /// Returns the new state once the response has arrived
    pub fn await_data(ui: Option<&mut egui::Ui>, rx: &mut AwaitingType<T>) -> Option<Self> {
        Some(match rx.0.try_recv() {
            Ok(Some(Ok(data))) => DataState::Present(data),
            Ok(Some(Err(e))) => {
                error!(?e, "error response received instead of the data");
                DataState::Failed(e.to_string())
            }
            Ok(None) => {
                if let Some(ui) = ui {
                    ui.spinner();
                }
                return None;
            }
            Err(e) => {
                let err_msg = format!("Error receiving on channel. Error: {e:?}");
                error!(err_msg, "error receiving on channel");
                DataState::Failed(err_msg)
            }
        })
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            DataState::Present(data) => Some(data),
            _ => None,
        }
    }

    pub fn present_mut(&mut self) -> Option<&mut T> {
        match self {
            DataState::Present(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(..))
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingResponse(..))
    }
}
