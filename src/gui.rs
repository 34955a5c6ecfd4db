// src/gui.rs
use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::Color32;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chart::PlotWidget;
use crate::config::DashboardConfig;
use crate::drivers::{render_window_png, FileSource, PlotStyle};
use crate::session::{SensorSession, SeriesOrigin};
use crate::types::Alert;

pub struct SensorApp {
    session: SensorSession<PlotWidget>,
    // 当前弹出的提示框 (模态, 打开期间暂停回放)
    alert: Option<Alert>,
    sensor_input: String,
    log_messages: Vec<String>,
}

impl SensorApp {
    pub fn new(sensor_id: &str, config: &DashboardConfig) -> Self {
        let now = Instant::now();
        let mut session = SensorSession::new(
            sensor_id,
            config,
            PlotWidget::new(sensor_id),
            StdRng::from_entropy(),
        );
        // 启动后台加载
        session.begin_load(Box::new(FileSource::new(&config.data_path)), now);
        Self {
            session,
            alert: None,
            sensor_input: sensor_id.to_owned(),
            log_messages: vec!["Sensor dashboard ready.".to_owned()],
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    fn import_bytes(&mut self, name: &str, bytes: &[u8]) {
        let now = Instant::now();
        match self.session.import_manual(bytes, now) {
            Ok(()) => {
                let rows = self.session.table().map(|t| t.len()).unwrap_or(0);
                self.log(&format!("Imported {name} ({rows} rows)"));
            }
            Err(e) => self.log(&format!("Import of {name} failed: {e}")),
        }
    }

    fn import_path(&mut self, path: &Path) {
        let name = path.display().to_string();
        match std::fs::read(path) {
            Ok(bytes) => self.import_bytes(&name, &bytes),
            Err(e) => {
                error!("cannot read {name}: {e}");
                self.alert = Some(Alert::ManualParse(e.to_string()));
            }
        }
    }

    fn pick_and_import(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv", "txt"])
            .pick_file()
        {
            self.import_path(&path);
        }
    }

    fn save_snapshot(&mut self) {
        let default_name = format!("sensor_{}_window.png", self.session.sensor_id());
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };
        let points = self.session.replay().snapshot();
        let written = render_window_png(self.session.sensor_id(), &points, PlotStyle::default())
            .map_err(|e| e.to_string())
            .and_then(|png| std::fs::write(&path, png).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                info!("saved chart snapshot to {}", path.display());
                self.log(&format!("Saved {}", path.display()));
            }
            Err(reason) => {
                error!("snapshot failed: {reason}");
                self.alert = Some(Alert::SnapshotFailed(reason));
            }
        }
    }

    fn switch_sensor(&mut self) {
        let id = self.sensor_input.trim().to_owned();
        self.session.widget_mut().set_sensor(&id);
        self.session.select_sensor(&id, Instant::now());
        self.log(&format!("Showing sensor {id}"));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = &file.bytes {
                let name = file.name.clone();
                self.import_bytes(&name, bytes);
            } else if let Some(path) = &file.path {
                self.import_path(path);
            }
        }
    }

    fn status_line(&self) -> String {
        let source = match self.session.origin() {
            SeriesOrigin::Pending => "loading",
            SeriesOrigin::Table => "data file",
            SeriesOrigin::Synthetic => "synthetic",
        };
        let replay = self.session.replay();
        format!(
            "{} points ({}) | window {}/{} | cursor {} | lap {} | redraws {}",
            self.session.series().len(),
            source,
            replay.len(),
            replay.capacity(),
            replay.cursor(),
            replay.laps(),
            self.session.widget().redraws()
        )
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = &self.alert else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(alert.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(alert.message());
                if let Some(detail) = alert.detail() {
                    ui.label(egui::RichText::new(detail).small().color(Color32::GRAY));
                }
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

impl eframe::App for SensorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // 1. 拖放导入
        self.handle_dropped_files(ctx);

        // 2. 提示框未关闭时不推进会话
        if self.alert.is_none() {
            self.alert = self.session.take_alert();
        }
        if self.alert.is_none() {
            self.session.poll(now);
        }

        // 3. UI 绘制
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(format!("SENSOR {}", self.session.sensor_id()));
                ui.separator();
                ui.label("Sensor:");
                let edit = ui.add(egui::TextEdit::singleline(&mut self.sensor_input).desired_width(48.0));
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Show").clicked() || submitted {
                    self.switch_sensor();
                }
                ui.separator();
                if ui.button("📂 Import CSV").clicked() {
                    self.pick_and_import();
                }
                if ui.button("💾 Save PNG").clicked() {
                    self.save_snapshot();
                }
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("log").show(ctx, |ui| {
            ui.label(egui::RichText::new(self.status_line()).small());
            egui::ScrollArea::vertical().max_height(100.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.is_loading() {
                ui.label(egui::RichText::new("Loading sensor data...").color(Color32::YELLOW));
            }
            self.session.widget().show(ui, now);
        });

        self.show_alert(ctx);

        // 4. 按计时器安排下一帧
        if self.session.widget().is_animating(now) {
            ctx.request_repaint();
        } else if let Some(wait) = self.session.next_wake(now) {
            ctx.request_repaint_after(wait.max(Duration::from_millis(10)));
        }
    }
}

impl Drop for SensorApp {
    fn drop(&mut self) {
        self.session.teardown();
    }
}
