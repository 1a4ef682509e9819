//! Interactive viewer for Pendulab scenarios
//!
//! Draws every pendulum of a `SimulationManager` through an egui-backed
//! `Canvas`, exposes the control panel and reloads the scenario file
//! whenever it changes on disk.

use anyhow::Result;
use eframe::egui;
use egui::{Color32, Pos2, Stroke};
use glam::DVec2;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use pendulab_core::history::BoundedHistory;
use pendulab_core::{
    build_manager_from_source, format_scenario_error, Canvas, Drawable, EnergySample, InitialField,
    PaintRole, PhysicalField, SimulationManager, MAX_INSTANCES,
};
use std::f64::consts::PI;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::mpsc;

const ENERGY_GRAPH_SAMPLES: usize = 300;
const PHASE_HISTORY: usize = 600;

pub fn launch(source_path: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pendulab",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(source_path, cc)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

/// Paints onto an egui painter with the pivot at `origin`
struct EguiCanvas {
    painter: egui::Painter,
    origin: Pos2,
    scale: f32,
}

impl EguiCanvas {
    fn to_screen(&self, point: DVec2) -> Pos2 {
        self.origin + egui::vec2(point.x as f32 * self.scale, point.y as f32 * self.scale)
    }
}

impl Canvas for EguiCanvas {
    type Color = Color32;

    fn palette(&self, role: PaintRole) -> Color32 {
        match role {
            PaintRole::Trail => Color32::from_rgba_unmultiplied(100, 150, 255, 150),
            PaintRole::Arm => Color32::from_gray(200),
            PaintRole::FirstBob => Color32::from_rgb(255, 100, 100),
            PaintRole::SecondBob => Color32::from_rgb(100, 150, 255),
        }
    }

    fn polyline(&mut self, points: &[DVec2], color: Color32, width: f32) {
        let screen: Vec<Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter
            .add(egui::Shape::line(screen, Stroke::new(width, color)));
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Color32, width: f32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(width, color),
        );
    }

    fn circle(&mut self, center: DVec2, diameter: f64, color: Color32) {
        // bobs keep their pixel size at any zoom
        self.painter
            .circle_filled(self.to_screen(center), diameter as f32 * 0.5, color);
    }
}

/// Colour of instance `index` out of `count`, spread around the hue wheel
fn instance_color(index: usize, count: usize) -> Color32 {
    let hue = (index as f32 * (360.0 / count.max(MAX_INSTANCES) as f32)) % 360.0;
    hsla(hue, 0.8, 0.5, 0.7)
}

/// HSL rather than `ecolor::Hsva`: the instance palette is specified as
/// hue/saturation/lightness in sRGB, and `Hsva` converts through linear space.
fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgba_unmultiplied(channel(r), channel(g), channel(b), channel_alpha(alpha))
}

fn channel_alpha(alpha: f32) -> u8 {
    (alpha * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Wrap an angle into (-π, π]
fn wrap_angle(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

pub struct ViewerApp {
    source_path: Option<PathBuf>,
    manager: SimulationManager,
    last_load_error: Option<String>,
    warnings: Vec<String>,
    time_scale: f64,
    phase: Vec<BoundedHistory<[f64; 4]>>,
    _file_watcher: Option<RecommendedWatcher>,
    file_receiver: Option<mpsc::Receiver<notify::Result<Event>>>,
}

impl ViewerApp {
    pub fn new(source_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let mut file_watcher = None;
        let mut file_receiver = None;

        if let Some(path) = &source_path {
            let (tx, rx) = mpsc::channel();
            match notify::recommended_watcher(move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            }) {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(path, RecursiveMode::NonRecursive) {
                        tracing::warn!(error = %e, "hot reload disabled");
                    }
                    file_watcher = Some(watcher);
                    file_receiver = Some(rx);
                }
                Err(e) => tracing::warn!(error = %e, "could not create file watcher"),
            }
        }

        let mut app = Self {
            source_path,
            manager: SimulationManager::default(),
            last_load_error: None,
            warnings: Vec::new(),
            time_scale: 1.0,
            phase: Vec::new(),
            _file_watcher: file_watcher,
            file_receiver,
        };
        app.reload_scenario();
        app
    }

    fn reload_scenario(&mut self) {
        let Some(path) = &self.source_path else {
            return;
        };

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                self.last_load_error = Some(format!("failed to read {}: {}", path.display(), e));
                return;
            }
        };

        // a broken file keeps the last good simulation on screen
        match build_manager_from_source(&source) {
            Ok((manager, diagnostics)) => {
                self.manager = manager;
                self.warnings = diagnostics.iter().map(|d| d.to_string()).collect();
                self.last_load_error = None;
                self.time_scale = self.manager.primary().time_scale();
                self.phase.clear();
                tracing::info!(path = %path.display(), "scenario loaded");
            }
            Err(e) => {
                let message = format_scenario_error(&e, &source);
                tracing::warn!(%message, "scenario rejected");
                self.last_load_error = Some(message);
            }
        }
    }

    fn check_file_changes(&mut self) {
        let Some(receiver) = &self.file_receiver else {
            return;
        };

        let mut needs_reload = false;
        while let Ok(event) = receiver.try_recv() {
            match event {
                Ok(Event { kind, .. }) if kind.is_modify() || kind.is_create() => {
                    needs_reload = true;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            }
        }

        if needs_reload {
            self.reload_scenario();
        }
    }

    fn record_phase(&mut self) {
        self.phase
            .resize_with(self.manager.len(), || BoundedHistory::new(PHASE_HISTORY));
        for (history, pendulum) in self.phase.iter_mut().zip(self.manager.instances()) {
            if pendulum.is_running() {
                let s = pendulum.state();
                history.push([wrap_angle(s.theta1), s.omega1, wrap_angle(s.theta2), s.omega2]);
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let running = self.manager.any_running();
            if ui.button(if running { "⏸ Stop" } else { "▶ Start" }).clicked() {
                if running {
                    self.manager.stop_all();
                } else {
                    self.manager.start_all();
                }
            }
            if ui.button("⏮ Reset").clicked() {
                self.manager.reset_all();
                self.phase.clear();
            }

            ui.separator();

            if ui
                .add_enabled(self.manager.can_add(), egui::Button::new("➕ Add"))
                .clicked()
            {
                if let Err(e) = self.manager.add_instance() {
                    tracing::warn!(error = %e, "could not add pendulum");
                }
            }
            if ui
                .add_enabled(self.manager.can_remove(), egui::Button::new("➖ Remove"))
                .clicked()
            {
                self.manager.remove_instance();
                self.phase.truncate(self.manager.len());
            }
            ui.label(format!("{} / {}", self.manager.len(), MAX_INSTANCES));

            ui.separator();

            ui.label("Time scale:");
            if ui
                .add(egui::Slider::new(&mut self.time_scale, 0.0..=5.0))
                .changed()
            {
                if let Err(e) = self.manager.set_time_scale_all(self.time_scale) {
                    tracing::warn!(error = %e, "time scale rejected");
                }
            }
        });
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Display");
        let mut settings = self.manager.primary().visualization();
        let mut changed = false;
        changed |= ui.checkbox(&mut settings.show_trail, "Trail").changed();
        changed |= ui.checkbox(&mut settings.show_minimal, "Minimal").changed();
        changed |= ui.checkbox(&mut settings.show_energy, "Energy graph").changed();
        changed |= ui
            .checkbox(&mut settings.show_phase_space, "Phase space")
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut settings.trail_length, 1..=5000).text("Trail length"))
            .changed();
        if changed {
            // every instance shares the first one's display settings
            if let Err(e) = self.manager.apply_visualization(settings) {
                tracing::warn!(error = %e, "display settings rejected");
            }
        }

        ui.separator();
        ui.heading("Initial conditions");
        let initial = *self.manager.primary().initial_conditions();
        for field in InitialField::ALL {
            let range = match field {
                InitialField::Theta1 | InitialField::Theta2 => -PI..=PI,
                InitialField::Omega1 | InitialField::Omega2 => -5.0..=5.0,
            };
            let mut value = initial.get(field);
            if slider(ui, &mut value, range, field.name()) {
                if let Err(e) = self
                    .manager
                    .primary_mut()
                    .set_initial_condition(field, value)
                {
                    tracing::warn!(error = %e, "initial condition rejected");
                }
            }
        }

        ui.separator();
        ui.heading("Physical parameters");
        let params = *self.manager.primary().physical_parameters();
        for field in PhysicalField::ALL {
            let range = match field {
                PhysicalField::M1 | PhysicalField::M2 => 0.1..=10.0,
                PhysicalField::L1 | PhysicalField::L2 => 10.0..=200.0,
                PhysicalField::G => 0.0..=20.0,
                PhysicalField::Damping => 0.999..=1.0,
            };
            let mut value = params.get(field);
            if slider(ui, &mut value, range, field.name()) {
                if let Err(e) = self
                    .manager
                    .primary_mut()
                    .set_physical_parameter(field, value)
                {
                    tracing::warn!(error = %e, "physical parameter rejected");
                }
            }
        }

        if !self.warnings.is_empty() {
            ui.separator();
            for warning in &self.warnings {
                ui.label(egui::RichText::new(warning).color(Color32::YELLOW));
            }
        }
    }

    fn draw_pendulums(&self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let reach = self
            .manager
            .instances()
            .iter()
            .map(|p| p.physical_parameters().reach())
            .fold(1.0, f64::max);
        let scale = rect.width().min(rect.height()) * 0.45 / reach as f32;

        let mut canvas = EguiCanvas {
            painter: ui.painter_at(rect),
            origin: rect.center(),
            scale,
        };
        let count = self.manager.len();
        for (index, pendulum) in self.manager.instances().iter().enumerate() {
            pendulum.draw(&mut canvas, Some(instance_color(index, count)));
        }
    }

    fn energy_graph(&self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(egui::vec2(ui.available_width(), 160.0), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 4.0, Color32::from_gray(20));

        let history = self.manager.primary().energy_history();
        let skip = history.len().saturating_sub(ENERGY_GRAPH_SAMPLES);
        let samples: Vec<_> = history.samples().skip(skip).copied().collect();
        if samples.len() < 2 {
            return;
        }

        let (lo, hi) = samples
            .iter()
            .flat_map(|s| [s.kinetic, s.potential, s.total()])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let span = (hi - lo).max(1e-9);
        let step = rect.width() / (ENERGY_GRAPH_SAMPLES - 1) as f32;

        let series: [(fn(&EnergySample) -> f64, Color32); 3] = [
            (|s: &EnergySample| s.kinetic, Color32::from_rgb(255, 99, 132)),
            (|s: &EnergySample| s.potential, Color32::from_rgb(54, 162, 235)),
            (|s: &EnergySample| s.total(), Color32::from_rgb(75, 192, 192)),
        ];
        for (value, color) in series {
            let points: Vec<Pos2> = samples
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let t = ((value(s) - lo) / span) as f32;
                    Pos2::new(rect.left() + i as f32 * step, rect.bottom() - t * rect.height())
                })
                .collect();
            painter.add(egui::Shape::line(points, Stroke::new(1.5, color)));
        }
    }

    fn phase_space(&self, ui: &mut egui::Ui) {
        let width = (ui.available_width() - 8.0) / 2.0;
        ui.horizontal(|ui| {
            for arm in 0..2 {
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(width, width), egui::Sense::hover());
                let rect = response.rect;
                painter.rect_filled(rect, 4.0, Color32::from_gray(20));

                let omega_max = self
                    .phase
                    .iter()
                    .flat_map(|h| h.iter().map(move |p| p[arm * 2 + 1].abs()))
                    .fold(1.0, f64::max);

                let count = self.phase.len();
                for (index, history) in self.phase.iter().enumerate() {
                    let color = instance_color(index, count);
                    for point in history.iter() {
                        let x = (point[arm * 2] / PI) as f32;
                        let y = (point[arm * 2 + 1] / omega_max) as f32;
                        let pos = rect.center()
                            + egui::vec2(x * rect.width() * 0.5, -y * rect.height() * 0.5);
                        painter.circle_filled(pos, 1.0, color);
                    }
                }
            }
        });
    }
}

fn slider(ui: &mut egui::Ui, value: &mut f64, range: RangeInclusive<f64>, label: &str) -> bool {
    // scenario values outside the slider range stay untouched until dragged
    ui.add(egui::Slider::new(value, range).text(label).clamp_to_range(false))
        .changed()
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        let wall_dt = ctx.input(|i| i.stable_dt) as f64;
        let report = self.manager.step_all(wall_dt);
        for index in report.degenerate {
            tracing::warn!(index, "pendulum went degenerate; reset it to continue");
        }
        self.record_phase();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        egui::SidePanel::right("settings")
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.settings_panel(ui));
            });

        let settings = self.manager.primary().visualization();
        if settings.show_energy || settings.show_phase_space {
            egui::TopBottomPanel::bottom("analysis").show(ctx, |ui| {
                if settings.show_energy {
                    ui.label("Energy (kinetic, potential, total)");
                    self.energy_graph(ui);
                }
                if settings.show_phase_space {
                    ui.label("Phase space (θ, ω)");
                    self.phase_space(ui);
                }
            });
        }

        if let Some(error) = &self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(120.0);
                ui.label(egui::RichText::new(error).color(Color32::RED).monospace());
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_pendulums(ui));

        if self.manager.any_running() {
            ctx.request_repaint();
        }
    }
}
