//! Chart Window
//! One native window per chart; `run_native` blocks until the user closes it.

use crate::charts::{ChartPlotter, ScatterData};
use crate::data::{MergedTable, ProcessorError, SuburbCrime};
use crate::menu::ChartRenderer;
use crate::stats::StatsCalculator;
use egui::{RichText, SidePanel};
use log::info;
use thiserror::Error;

const SCATTER_TITLE: &str = "Median Household Income vs Crime in August 2021";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to open chart window: {0}")]
    Window(#[from] eframe::Error),
    #[error("Failed to prepare chart data: {0}")]
    Data(#[from] ProcessorError),
}

enum ChartKind {
    Scatter(ScatterData),
    TopSuburbs(Vec<SuburbCrime>),
}

/// Window content for a single chart.
struct ChartWindow {
    title: String,
    chart: ChartKind,
}

impl ChartWindow {
    /// Open the window and block until it is closed.
    fn run(self, size: [f32; 2]) -> Result<(), RenderError> {
        let title = self.title.clone();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(size)
                .with_min_inner_size([600.0, 400.0])
                .with_title(&title),
            ..Default::default()
        };

        eframe::run_native(&title, options, Box::new(|_cc| Ok(Box::new(self))))?;
        Ok(())
    }
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("chart_title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(4.0);
                ui.label(RichText::new(&self.title).size(18.0).strong());
                ui.add_space(4.0);
            });
        });

        match &self.chart {
            ChartKind::Scatter(data) => {
                SidePanel::right("correlation_panel")
                    .min_width(220.0)
                    .show(ctx, |ui| {
                        ui.label(RichText::new("Summary").size(14.0).strong());
                        ui.add_space(5.0);
                        ChartPlotter::draw_summary_table(ui, &data.summary);
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    ChartPlotter::draw_scatter_chart(ui, data);
                });
            }
            ChartKind::TopSuburbs(suburbs) => {
                SidePanel::right("ranking_panel")
                    .min_width(240.0)
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            ChartPlotter::draw_ranking_table(ui, suburbs);
                        });
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    ChartPlotter::draw_top_suburbs_chart(ui, suburbs);
                });
            }
        }
    }
}

/// Renders charts into native windows.
pub struct WindowRenderer {
    top_suburbs: usize,
}

impl WindowRenderer {
    pub fn new(top_suburbs: usize) -> Self {
        Self { top_suburbs }
    }
}

impl ChartRenderer for WindowRenderer {
    type Error = RenderError;

    fn show_scatter(&mut self, table: &MergedTable) -> Result<(), RenderError> {
        let points = table.income_vs_crime()?;
        let summary = StatsCalculator::income_crime_summary(&points);
        if let Some(r) = summary.pearson_r {
            info!("Income vs crime over {} suburbs: r = {:.3}", summary.count, r);
        }

        ChartWindow {
            title: SCATTER_TITLE.to_string(),
            chart: ChartKind::Scatter(ScatterData { points, summary }),
        }
        .run([1000.0, 600.0])
    }

    fn show_top_suburbs(&mut self, table: &MergedTable) -> Result<(), RenderError> {
        let suburbs = table.top_suburbs_by_crime(self.top_suburbs)?;

        ChartWindow {
            title: format!("Top {} Suburbs by Crime in August 2021", self.top_suburbs),
            chart: ChartKind::TopSuburbs(suburbs),
        }
        .run([1200.0, 600.0])
    }
}
