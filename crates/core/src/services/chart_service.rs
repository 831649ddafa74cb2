use reqwest::Method;

use crate::api::gateway::Gateway;
use crate::errors::ClientError;
use crate::models::chart::{ChartDataset, ChartKind, ChartSpec};

/// Adapter over whatever actually draws charts.
///
/// `create` binds a new instance to the canvas; `dispose` releases it.
/// The presenter guarantees at most one live handle at a time.
pub trait ChartRenderer {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Result<Self::Handle, ClientError>;

    fn dispose(&mut self, handle: Self::Handle);
}

/// Result of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartOutcome {
    Rendered(ChartKind),
    /// Endpoint returned no labels; no instance exists afterwards
    NoData,
}

/// Owns the "current chart" slot of one canvas.
///
/// The core computes what to draw; the renderer only draws it.
pub struct ChartPresenter<R: ChartRenderer> {
    renderer: R,
    active: Option<(ChartKind, R::Handle)>,
}

impl<R: ChartRenderer> ChartPresenter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            active: None,
        }
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Kind of the chart currently on the canvas, if any.
    #[must_use]
    pub fn active_kind(&self) -> Option<ChartKind> {
        self.active.as_ref().map(|(kind, _)| *kind)
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Fetch a fresh dataset for `kind` and put exactly one chart on the canvas.
    ///
    /// - empty dataset → previous chart disposed, `NoData`
    /// - otherwise → previous chart disposed, new one created
    /// - fetch failure → canvas untouched, error returned
    pub async fn render(&mut self, gateway: &Gateway, kind: ChartKind) -> Result<ChartOutcome, ClientError> {
        let dataset: ChartDataset = gateway.call(Method::GET, kind.endpoint(), None).await?;
        dataset.validate()?;
        self.show(kind, dataset)
    }

    /// Replace the canvas contents with `dataset`.
    pub fn show(&mut self, kind: ChartKind, dataset: ChartDataset) -> Result<ChartOutcome, ClientError> {
        self.clear();

        if dataset.is_empty() {
            tracing::debug!(%kind, "No chart data");
            return Ok(ChartOutcome::NoData);
        }

        let spec = ChartSpec::from_dataset(kind, dataset);
        let handle = self.renderer.create(&spec)?;
        self.active = Some((kind, handle));
        Ok(ChartOutcome::Rendered(kind))
    }

    /// Dispose the current chart, if any.
    pub fn clear(&mut self) {
        if let Some((_, handle)) = self.active.take() {
            self.renderer.dispose(handle);
        }
    }
}

impl<R: ChartRenderer> Drop for ChartPresenter<R> {
    fn drop(&mut self) {
        self.clear();
    }
}
