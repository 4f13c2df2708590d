//! Chart Plotter Module
//! Draws the income/crime scatter and the top suburbs bar chart using egui_plot.

use crate::data::SuburbCrime;
use crate::stats::CorrelationSummary;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

pub const SCATTER_COLOR: Color32 = Color32::from_rgb(31, 119, 180); // Blue
pub const BAR_COLOR: Color32 = Color32::from_rgb(255, 165, 0); // Orange
const SIGNIFICANT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Data behind the income vs crime scatter plot
#[derive(Clone)]
pub struct ScatterData {
    pub points: Vec<[f64; 2]>,
    pub summary: CorrelationSummary,
}

/// Creates the two suburb charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Scatter of weekly household income (x) against crime count (y)
    pub fn draw_scatter_chart(ui: &mut egui::Ui, data: &ScatterData) {
        Plot::new("income_vs_crime")
            .x_axis_label("Median Total Household Income Weekly")
            .y_axis_label("August 2021 Crime Count")
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(data.points.clone()))
                        .radius(3.0)
                        .color(SCATTER_COLOR.gamma_multiply(0.6))
                        .name(format!("Suburbs ({})", data.points.len())),
                );
            });
    }

    /// Bar chart of suburbs in the order given (highest crime first)
    pub fn draw_top_suburbs_chart(ui: &mut egui::Ui, suburbs: &[SuburbCrime]) {
        let labels: Vec<String> = suburbs.iter().map(|s| s.suburb.clone()).collect();
        let n = labels.len();

        let bars: Vec<Bar> = suburbs
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Bar::new(i as f64, s.crime_count)
                    .name(&s.suburb)
                    .width(0.7)
                    .fill(BAR_COLOR)
            })
            .collect();

        Plot::new("top_suburbs")
            .x_axis_label("Suburb in New South Wales")
            .y_axis_label("Crime Count")
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            // One tick per bar
            .x_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < labels.len() {
                    labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Crime Count"));
            });
    }

    /// Draw correlation summary table
    pub fn draw_summary_table(ui: &mut egui::Ui, summary: &CorrelationSummary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("correlation_summary")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").size(11.0));
                        ui.label(RichText::new("Income").strong().size(11.0));
                        ui.label(RichText::new("Crime").strong().size(11.0));
                        ui.end_row();

                        ui.label(RichText::new("Mean").strong().size(11.0));
                        ui.label(RichText::new(Self::format_value(summary.income_mean)).size(11.0));
                        ui.label(RichText::new(Self::format_value(summary.crime_mean)).size(11.0));
                        ui.end_row();

                        ui.label(RichText::new("Median").strong().size(11.0));
                        ui.label(RichText::new(Self::format_value(summary.income_median)).size(11.0));
                        ui.label(RichText::new(Self::format_value(summary.crime_median)).size(11.0));
                        ui.end_row();
                    });

                ui.add_space(6.0);

                let r_text = summary
                    .pearson_r
                    .map(|r| format!("{:.3}", r))
                    .unwrap_or_else(|| "-".to_string());
                let p_text = summary
                    .p_value
                    .map(|p| format!("{:.4}", p))
                    .unwrap_or_else(|| "-".to_string());
                let p_color = if summary.is_significant {
                    SIGNIFICANT_COLOR
                } else {
                    ui.visuals().text_color()
                };

                ui.label(RichText::new(format!("N = {}", summary.count)).size(11.0));
                ui.label(RichText::new(format!("Pearson r = {}", r_text)).size(11.0));
                ui.label(
                    RichText::new(format!("P-value = {}", p_text))
                        .size(11.0)
                        .color(p_color),
                );
            });
    }

    /// Ranked list of suburbs and their counts
    pub fn draw_ranking_table(ui: &mut egui::Ui, suburbs: &[SuburbCrime]) {
        egui::Grid::new("top_suburbs_ranking")
            .striped(true)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("#").strong().size(11.0));
                ui.label(RichText::new("Suburb").strong().size(11.0));
                ui.label(RichText::new("Crimes").strong().size(11.0));
                ui.end_row();

                for (rank, s) in suburbs.iter().enumerate() {
                    ui.label(RichText::new((rank + 1).to_string()).size(11.0));
                    ui.label(RichText::new(&s.suburb).size(11.0));
                    ui.label(RichText::new(format!("{:.0}", s.crime_count)).size(11.0));
                    ui.end_row();
                }
            });
    }

    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "-".to_string()
        } else {
            format!("{:.1}", value)
        }
    }
}
