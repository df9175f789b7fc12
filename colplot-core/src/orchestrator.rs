use crate::binning::BinningPolicy;
use crate::canvas::{CanvasPool, SurfaceId};
use crate::plot::{build_histogram_1d, build_histogram_2d, build_scatter, Dimension, PlotKind, PlotObject};
use crate::style::RenderStyle;
use crate::table::{NumericColumn, Table};
use colplot_common::{ColplotError, Config, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub x_index: usize,
    pub y_index: Option<usize>,
    pub kind: PlotKind,
    pub dimension: Dimension,
}

/// The one live plot object and the surface it is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetainedPlot {
    pub surface: SurfaceId,
    pub plot: PlotObject,
    pub x_dropped: usize,
    pub y_dropped: Option<usize>,
}

#[derive(Debug)]
pub struct PlotOrchestrator {
    pool: CanvasPool,
    style: RenderStyle,
    policy: BinningPolicy,
    retained: Option<RetainedPlot>,
}

impl PlotOrchestrator {
    pub fn new(pool: CanvasPool, style: RenderStyle, policy: BinningPolicy) -> Self {
        Self { pool, style, policy, retained: None }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            CanvasPool::from_config(&cfg.plot),
            RenderStyle::from_config(&cfg.style),
            BinningPolicy::from_config(&cfg.plot),
        )
    }

    /// Build the plot described by `request` on a fresh surface.
    ///
    /// An out-of-range X column is rejected before anything changes. Every other problem
    /// (unparseable rows, a missing or mismatched Y column, degenerate samples) degrades
    /// to a valid plot instead of an error. A Y index past the last column counts as no
    /// Y column: 2D requests then plot X alone, as a 1D histogram or an index scatter.
    pub fn plot(&mut self, table: &Table, request: &PlotRequest) -> Result<&RetainedPlot> {
        if request.x_index >= table.column_count() {
            return Err(ColplotError::InvalidColumn {
                index: request.x_index,
                columns: table.column_count(),
            });
        }
        let x = NumericColumn::extract(table, request.x_index);
        let y = match (request.dimension, request.y_index) {
            (Dimension::Two, Some(yi)) if yi < table.column_count() => Some(NumericColumn::extract(table, yi)),
            _ => None,
        };

        if let Some(previous) = self.retained.take() {
            tracing::debug!(surface = %previous.surface, kind = ?previous.plot.kind(), "released previous plot");
        }

        let acquisition = self.pool.acquire();
        let Some(surface) = self.pool.get_mut(acquisition.surface) else {
            return Err(ColplotError::Other("acquired surface missing from pool".into()));
        };
        let margins = *surface.margins();
        let plot = match request.kind {
            PlotKind::Histogram => match request.dimension {
                Dimension::One => PlotObject::Histogram1D(build_histogram_1d(&x, &self.policy, &self.style, &margins)),
                Dimension::Two => build_histogram_2d(&x, y.as_ref(), &self.policy, &self.style, &margins),
            },
            PlotKind::Scatter => PlotObject::Scatter(build_scatter(&x, y.as_ref(), &self.style)),
        };
        surface.update();
        tracing::info!(
            surface = %surface.name(),
            kind = ?plot.kind(),
            title = %plot.title(),
            rows = table.row_count(),
            "plot built"
        );
        let retained = self.retained.insert(RetainedPlot {
            surface: acquisition.surface,
            plot,
            x_dropped: x.dropped,
            y_dropped: y.as_ref().map(|c| c.dropped),
        });
        Ok(&*retained)
    }

    pub fn current(&self) -> Option<&RetainedPlot> {
        self.retained.as_ref()
    }

    /// Drop the retained plot without building a new one.
    pub fn clear(&mut self) {
        self.retained = None;
    }

    pub fn pool(&self) -> &CanvasPool {
        &self.pool
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    pub fn policy(&self) -> &BinningPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: BinningPolicy) {
        self.policy = policy;
    }
}

impl Default for PlotOrchestrator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{PlotObjectKind, ScatterMode};

    fn table() -> Table {
        Table::from_strings(
            &["energy__MeV", "angle__deg", "label"],
            &[
                vec!["1.5", "10", "a"],
                vec!["2.5", "20", "b"],
                vec!["3.5", "x", "c"],
                vec!["4.5", "40", "d"],
                vec!["5.5", "", "e"],
            ],
        )
    }

    fn req(x: usize, y: Option<usize>, kind: PlotKind, dimension: Dimension) -> PlotRequest {
        PlotRequest { x_index: x, y_index: y, kind, dimension }
    }

    #[test]
    fn invalid_x_is_rejected_without_side_effects() {
        let mut o = PlotOrchestrator::default();
        o.plot(&table(), &req(0, None, PlotKind::Histogram, Dimension::One)).unwrap();
        let before = o.current().cloned();
        let err = o.plot(&table(), &req(7, None, PlotKind::Histogram, Dimension::One)).unwrap_err();
        assert!(matches!(err, ColplotError::InvalidColumn { index: 7, columns: 3 }));
        assert_eq!(o.current().cloned(), before);
        assert_eq!(o.pool().len(), 1);
    }

    #[test]
    fn histogram_1d_ignores_y() {
        let mut o = PlotOrchestrator::default();
        let r = o.plot(&table(), &req(0, Some(1), PlotKind::Histogram, Dimension::One)).unwrap();
        assert_eq!(r.plot.kind(), PlotObjectKind::Histogram1D);
        assert_eq!(r.y_dropped, None);
        assert_eq!(r.plot.title(), "energy (MeV)");
    }

    #[test]
    fn mismatched_2d_histogram_falls_back() {
        let mut o = PlotOrchestrator::default();
        // angle has 3 valid values against 5 for energy
        let r = o.plot(&table(), &req(0, Some(1), PlotKind::Histogram, Dimension::Two)).unwrap();
        assert_eq!(r.plot.kind(), PlotObjectKind::Histogram1D);
        assert_eq!(r.y_dropped, Some(2));
    }

    #[test]
    fn matched_2d_histogram() {
        let mut o = PlotOrchestrator::default();
        let r = o.plot(&table(), &req(0, Some(0), PlotKind::Histogram, Dimension::Two)).unwrap();
        assert_eq!(r.plot.kind(), PlotObjectKind::Histogram2D);
        assert_eq!(r.plot.title(), "2D Histogram of energy (MeV) vs energy (MeV)");
    }

    #[test]
    fn scatter_modes() {
        let mut o = PlotOrchestrator::default();
        let r = o.plot(&table(), &req(0, Some(1), PlotKind::Scatter, Dimension::Two)).unwrap();
        let PlotObject::Scatter(s) = &r.plot else { panic!("expected scatter") };
        assert_eq!(s.mode, ScatterMode::Index);
        assert_eq!(s.points.len(), 5);
        let r = o.plot(&table(), &req(1, Some(1), PlotKind::Scatter, Dimension::Two)).unwrap();
        let PlotObject::Scatter(s) = &r.plot else { panic!("expected scatter") };
        assert_eq!(s.mode, ScatterMode::Paired);
        assert_eq!(s.points, vec![(10.0, 10.0), (20.0, 20.0), (40.0, 40.0)]);
    }

    #[test]
    fn y_past_last_column_counts_as_no_y() {
        let mut o = PlotOrchestrator::default();
        let r = o.plot(&table(), &req(0, Some(99), PlotKind::Scatter, Dimension::Two)).unwrap();
        let PlotObject::Scatter(s) = &r.plot else { panic!("expected scatter") };
        assert_eq!(s.mode, ScatterMode::Index);
        assert_eq!(r.y_dropped, None);
        let r = o.plot(&table(), &req(0, Some(3), PlotKind::Histogram, Dimension::Two)).unwrap();
        assert_eq!(r.plot.kind(), PlotObjectKind::Histogram1D);
        assert_eq!(r.y_dropped, None);
    }

    #[test]
    fn style_and_policy_can_be_replaced() {
        let mut o = PlotOrchestrator::default();
        o.set_style(RenderStyle { stat_fields: Vec::new(), ..RenderStyle::default() });
        o.set_policy(BinningPolicy { default_count: 4, ..BinningPolicy::default() });
        assert!(o.style().stat_fields.is_empty());
        assert_eq!(o.policy().default_count, 4);
        let r = o.plot(&table(), &req(2, None, PlotKind::Histogram, Dimension::One)).unwrap();
        let PlotObject::Histogram1D(h) = &r.plot else { panic!("expected 1D histogram") };
        assert_eq!(h.bins.count, 4);
        assert!(h.stats_box.lines.is_empty());
    }

    #[test]
    fn text_column_yields_empty_but_valid_plot() {
        let mut o = PlotOrchestrator::default();
        let r = o.plot(&table(), &req(2, None, PlotKind::Histogram, Dimension::One)).unwrap();
        let PlotObject::Histogram1D(h) = &r.plot else { panic!("expected 1D histogram") };
        assert_eq!(h.entries, 0);
        assert_eq!(h.bins.count, 10);
        assert_eq!(r.x_dropped, 5);
    }

    #[test]
    fn each_plot_takes_a_new_surface_and_replaces_the_last() {
        let mut o = PlotOrchestrator::default();
        let mut surfaces = Vec::new();
        for i in 0..5 {
            let kind = if i % 2 == 0 { PlotKind::Histogram } else { PlotKind::Scatter };
            surfaces.push(o.plot(&table(), &req(0, None, kind, Dimension::One)).unwrap().surface);
        }
        assert_eq!(o.pool().len(), 3);
        assert_eq!(o.pool().ids(), surfaces[2..].to_vec());
        let current = o.current().unwrap();
        assert_eq!(current.surface, surfaces[4]);
        assert_eq!(current.plot.kind(), PlotObjectKind::Histogram1D);
        assert_eq!(o.pool().get(current.surface).unwrap().refreshes(), 1);
        o.clear();
        assert!(o.current().is_none());
    }
}
