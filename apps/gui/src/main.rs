use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};
use egui_plot::{Line, Plot, PlotPoints};
use rfd::FileDialog;
use shmlab_core::display::{parameter_caption, parameter_color, AMPLITUDE_COLOR};
use shmlab_core::{
    default_presets, equation_numeric, equation_symbolic, format_tooltip, load_preset, save_preset,
    ChartBounds, Frame, Parameter, ParameterUpdate, Preset, Simulation,
};

const BODY_SIZE: f32 = 48.0;
const WALL_WIDTH: f32 = 24.0;
const TRACK_HEIGHT: f32 = 192.0;
const CHART_HEIGHT: f32 = 256.0;

struct AppState {
    simulation: Simulation,
    presets: Vec<Preset>,
    selected_preset: Option<usize>,
    last_frame: Option<Frame>,
    status: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let presets = default_presets();
        let mut simulation = Simulation::with_monotonic_clock(&presets[0].config);
        simulation.start();
        Self {
            simulation,
            presets,
            selected_preset: Some(0),
            last_frame: None,
            status: None,
        }
    }
}

impl AppState {
    fn select_preset(&mut self, idx: usize) {
        self.selected_preset = Some(idx);
        let config = self.presets[idx].config.clone();
        self.simulation.load_config(&config);
    }

    fn save_preset(&mut self) {
        let preset = Preset {
            name: format!("Custom {}", self.presets.len() + 1),
            config: self.simulation.config(),
        };
        let save_path = FileDialog::new()
            .set_file_name("shmlab_preset.json")
            .add_filter("Preset", &["json"])
            .save_file();
        let Some(path) = save_path else {
            return;
        };
        match save_preset(&path, &preset) {
            Ok(()) => self.status = Some("Preset saved.".to_string()),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to save preset");
                self.status = Some(format!("Failed to save preset: {err:#}"));
            }
        }
    }

    fn load_preset(&mut self) {
        let open_path = FileDialog::new().add_filter("Preset", &["json"]).pick_file();
        let Some(path) = open_path else {
            return;
        };
        match load_preset(&path) {
            Ok(preset) => {
                self.presets.push(preset);
                self.select_preset(self.presets.len() - 1);
                self.status = Some("Preset loaded.".to_string());
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to load preset");
                self.status = Some(format!("Failed to load preset: {err:#}"));
            }
        }
    }

    fn parameter_slider(&mut self, ui: &mut egui::Ui, parameter: Parameter) {
        let range = parameter.range();
        let mut value = self.simulation.params().get(parameter);
        let color = rgb(parameter_color(parameter));
        ui.colored_label(color, parameter_caption(parameter, value));
        let response = ui.add(
            egui::Slider::new(&mut value, range.min..=range.max)
                .step_by(range.step)
                .show_value(false),
        );
        if response.changed() && self.simulation.apply(ParameterUpdate::new(parameter, value)) {
            let config = self.simulation.config();
            self.selected_preset = self.presets.iter().position(|preset| preset.matches(&config));
        }
    }

    fn draw_equations(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(equation_symbolic());
            ui.label(egui::RichText::new(equation_numeric(&self.simulation.params())).size(18.0));
        });
    }

    fn draw_spring(&self, ui: &mut egui::Ui, position: f64) {
        let size = Vec2::new(ui.available_width(), TRACK_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 6.0, Color32::from_rgb(0xf8, 0xfa, 0xfc));
        painter.rect_stroke(rect, 6.0, Stroke::new(1.0, Color32::from_rgb(0xd1, 0xd5, 0xdb)));

        let wall = Rect::from_min_size(rect.min, Vec2::new(WALL_WIDTH, rect.height()));
        painter.rect_filled(wall, 0.0, Color32::from_rgb(0x9c, 0xa3, 0xaf));

        let center = rect.center();
        let body_center = Pos2::new(center.x + position as f32, center.y);
        painter.line_segment(
            [Pos2::new(rect.left() + WALL_WIDTH / 2.0, center.y), body_center],
            Stroke::new(4.0, Color32::from_rgb(0x37, 0x41, 0x51)),
        );
        let body = Rect::from_center_size(body_center, Vec2::splat(BODY_SIZE));
        painter.rect_filled(body, 6.0, rgb(AMPLITUDE_COLOR));
    }

    fn draw_chart(&mut self, ui: &mut egui::Ui) {
        let bounds = ChartBounds::for_window(&self.simulation.window());
        let table = self.simulation.waveform();
        let points: PlotPoints = table.iter().map(|sample| [sample.t, sample.x]).collect();
        let line = Line::new(points).color(rgb(AMPLITUDE_COLOR)).name("x(t)");

        Plot::new("waveform")
            .height(CHART_HEIGHT)
            .include_x(bounds.t_min)
            .include_x(bounds.t_max)
            .include_y(bounds.x_min)
            .include_y(bounds.x_max)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .x_axis_label("t (s)")
            .y_axis_label("x (px)")
            .label_formatter(|_name, value| format!("t = {:.2} s\n{}", value.x, format_tooltip(value.y)))
            .show(ui, |plot_ui| plot_ui.line(line));
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(frame) = self.simulation.tick() {
            self.last_frame = Some(frame);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Restart").clicked() {
                    self.simulation.start();
                }
                if self.simulation.is_running() && ui.button("Stop").clicked() {
                    self.simulation.cancel();
                }
                ui.separator();
                if ui.button("Save Preset").clicked() {
                    self.save_preset();
                }
                if ui.button("Load Preset").clicked() {
                    self.load_preset();
                }
            });
        });

        egui::SidePanel::left("left_panel").show(ctx, |ui| {
            ui.heading("Presets");
            let selected_text = self
                .selected_preset
                .and_then(|idx| self.presets.get(idx))
                .map_or_else(|| "Custom".to_string(), |preset| preset.name.clone());
            egui::ComboBox::from_id_source("preset_combo")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    let mut chosen = None;
                    for (idx, preset) in self.presets.iter().enumerate() {
                        if ui.selectable_label(self.selected_preset == Some(idx), &preset.name).clicked() {
                            chosen = Some(idx);
                        }
                    }
                    if let Some(idx) = chosen {
                        self.select_preset(idx);
                    }
                });

            ui.separator();
            ui.heading("Parameters");
            for parameter in Parameter::ALL {
                self.parameter_slider(ui, parameter);
                ui.add_space(8.0);
            }

            ui.separator();
            ui.label(format!("t = {:.2} s", self.simulation.elapsed()));
            if let Some(frame) = self.last_frame {
                ui.label(format!("x = {}", format_tooltip(frame.position)));
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_equations(ui);
            ui.add_space(16.0);
            self.draw_spring(ui, self.simulation.position());
            ui.add_space(16.0);
            self.draw_chart(ui);
        });

        if self.simulation.is_running() {
            ctx.request_repaint();
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([720.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SHM Lab",
        options,
        Box::new(|_cc| Box::<AppState>::default()),
    )
}
