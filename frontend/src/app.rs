use crate::draw_graph;
use eframe::emath::Align;
use egui::{Button, DragValue, Slider, TextEdit};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{info, warn};
use tuner::{Analysis, Form, Isolation, MemorySize, Settings, Summary};

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RightSizing {
    pub form: Form,

    pub settings: Settings,

    pub line_width: f32,

    #[serde(skip)]
    pending: Option<oneshot::Receiver<Analysis>>,

    #[serde(skip)]
    errors: Vec<String>,

    #[serde(skip)]
    summary: Option<Summary>,
}

impl Default for RightSizing {
    fn default() -> Self {
        Self {
            form: Form::default(),
            settings: Settings::default(),
            line_width: 3.2,
            pending: None,
            errors: Vec::new(),
            summary: None,
        }
    }
}

impl RightSizing {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }

        Default::default()
    }

    fn analyze(&mut self, ctx: &egui::Context) {
        self.errors.clear();
        self.summary = None;

        let job = match tuner::submit(&self.form, &self.settings, |request| async move {
            tuner::lambda::client(request.credentials(), request.region()).await
        }) {
            Ok(job) => job,
            Err(err) => {
                warn!("{}", err);
                self.errors.push(err.to_string());
                return;
            }
        };

        let (sender, receiver) = oneshot::channel();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            // The receiver is gone only if the window closed mid-run.
            let _ = sender.send(job.await);
            ctx.request_repaint();
        });

        self.pending = Some(receiver);
    }

    fn poll(&mut self) {
        let Some(receiver) = self.pending.as_mut() else {
            return;
        };

        match receiver.try_recv() {
            Ok(analysis) => {
                self.pending = None;
                self.show(analysis);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending = None;
                self.errors
                    .push("The analysis stopped before reporting any results.".to_string());
            }
        }
    }

    fn show(&mut self, analysis: Analysis) {
        self.errors = analysis.failures.iter().map(ToString::to_string).collect();

        match tuner::summarize(&analysis.results, self.settings.unit_price) {
            Ok(summary) => {
                info!("{}", summary.performance_line());
                info!("{}", summary.cost_line());
                self.summary = Some(summary);
            }
            Err(err) => self.errors.push(err.to_string()),
        }
    }

    fn form_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Target");

        ui.label("Lambda Function ARN");
        ui.text_edit_singleline(&mut self.form.function);

        ui.label("AWS Access Key");
        ui.text_edit_singleline(&mut self.form.access_key);

        ui.label("AWS Secret Key");
        ui.add(TextEdit::singleline(&mut self.form.secret_key).password(true));

        ui.label("AWS Region");
        ui.text_edit_singleline(&mut self.form.region);

        ui.separator();

        ui.label("Select memory configurations to test (MB)");
        ui.horizontal_wrapped(|ui| {
            for &memory in MemorySize::variants() {
                let mut selected = self.form.memories.contains(&memory);
                if ui.checkbox(&mut selected, memory.to_string()).changed() {
                    self.form.toggle(memory);
                }
            }
        });

        ui.separator();

        let running = self.pending.is_some();
        if ui
            .add_enabled(!running, Button::new("Analyze Lambda"))
            .clicked()
        {
            self.analyze(ctx);
        }
    }

    fn results_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Lambda Performance vs Cost");

        if self.pending.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analyzing Lambda function...");
            });
        }

        let error_color = ui.visuals().error_fg_color;
        for error in &self.errors {
            ui.colored_label(error_color, error.as_str());
        }

        let Some(summary) = &self.summary else {
            return;
        };

        let height = (ui.available_height() - 60.0).max(240.0);
        draw_graph(
            ui,
            summary.durations(),
            summary.costs(),
            height,
            self.line_width,
        );

        ui.separator();
        ui.label(summary.performance_line());
        ui.label(summary.cost_line());
    }
}

impl eframe::App for RightSizing {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.with_layout(egui::Layout::left_to_right(Align::Center), |ui| {
                    ui.heading("AWS Lambda Right-Sizing Tool");
                });
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    egui::widgets::global_dark_light_mode_buttons(ui);
                });
            });

            egui::CollapsingHeader::new("Settings")
                .default_open(false)
                .show(ui, |ui| {
                    let mut delay = self.settings.propagation_delay.as_secs_f32();
                    if ui
                        .add(
                            Slider::new(&mut delay, 0.0..=30.0)
                                .clamp_to_range(true)
                                .text("Propagation delay (s)"),
                        )
                        .changed()
                    {
                        self.settings.propagation_delay = Duration::from_secs_f32(delay);
                    }

                    ui.horizontal(|ui| {
                        ui.label("Updates");
                        for isolation in Isolation::variants() {
                            ui.selectable_value(
                                &mut self.settings.isolation,
                                *isolation,
                                isolation.to_string(),
                            );
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Price per GB-second ($)");
                        ui.add(
                            DragValue::new(&mut self.settings.unit_price)
                                .speed(0.000_000_1)
                                .clamp_range(0.0..=1.0)
                                .min_decimals(10),
                        );
                    });

                    ui.add(
                        Slider::new(&mut self.line_width, 0.0..=10.0)
                            .clamp_to_range(true)
                            .smart_aim(true)
                            .text("Line Width")
                            .trailing_fill(true),
                    );
                });

            ui.collapsing("Instructions", |ui| {
                ui.label("Each selected size updates the function, waits, then times one invocation.");
                ui.label("Parallel updates finish sooner but may time a size set by another task.");
                ui.label("Pan by dragging, or scroll (+ shift = horizontal).");
                ui.label("Box zooming: Right click to zoom in and zoom out using a selection.");
                if cfg!(target_os = "macos") {
                    ui.label("Zoom with ctrl / ⌘ + scroll.");
                } else {
                    ui.label("Zoom with ctrl + scroll.");
                }
                ui.label("Reset view with double-click.");
            });
        });

        egui::SidePanel::left("form_panel")
            .resizable(true)
            .show(ctx, |ui| self.form_panel(ui, ctx));

        egui::CentralPanel::default().show(ctx, |ui| self.results_panel(ui));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
