use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use audio_selector::{
    AudioSelector, InputSymbol, PlaybackBackend, SegmentEngine, SegmentEngineConfig,
};
use egui::{Color32, Key, Pos2, Rect, Sense, Stroke};
use rodio::Source;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let path = env::args().nth(1).map(PathBuf::from);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "ReBeat Example",
        native_options,
        Box::new(move |_cc| Ok(Box::new(RebeatApp::new(path)))),
    )
}

struct LoadedSignal {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
    name: String,
}

fn load_audio(path: &Path) -> Result<LoadedSignal, String> {
    let file = File::open(path).map_err(|e| format!("open {}: {}", path.display(), e))?;
    let decoder = rodio::Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
    if samples.is_empty() {
        return Err("no samples decoded".to_string());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedSignal {
        samples,
        channels,
        sample_rate,
        name,
    })
}

/// Synthesized fallback so the example runs without an audio file:
/// four seconds of decaying sine bursts, accented on the downbeat.
fn click_track() -> LoadedSignal {
    let sample_rate = 44_100u32;
    let total = 4 * sample_rate as usize;
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / sample_rate as f32;
        let beat_t = t % 0.5;
        let tone = if (t / 0.5) as usize % 4 == 0 { 880.0 } else { 440.0 };
        let env = (-beat_t * 18.0).exp();
        samples.push((beat_t * tone * std::f32::consts::TAU).sin() * env * 0.6);
    }
    LoadedSignal {
        samples,
        channels: 1,
        sample_rate,
        name: "built-in click track".to_string(),
    }
}

/// Min/max peaks per bucket over a mono mixdown, for waveform drawing.
fn build_peaks(samples: &[f32], channels: u16, buckets: usize) -> Vec<(f32, f32)> {
    let channels = channels.max(1) as usize;
    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }
    let buckets = buckets.min(frames).max(1);
    let mut peaks = Vec::with_capacity(buckets);
    for b in 0..buckets {
        let start = b * frames / buckets;
        let end = (((b + 1) * frames) / buckets).max(start + 1);
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for frame in start..end {
            let mut mix = 0.0f32;
            for ch in 0..channels {
                mix += samples[frame * channels + ch];
            }
            mix /= channels as f32;
            lo = lo.min(mix);
            hi = hi.max(mix);
        }
        peaks.push((lo, hi));
    }
    peaks
}

fn format_time(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}.{:03}",
        total_ms / 60_000,
        total_ms / 1000 % 60,
        total_ms % 1000
    )
}

/// The original key table: arrows step the cursor, Enter drops a mark,
/// Space toggles the selection, Escape cancels it.
fn translate_key(key: Key) -> Option<InputSymbol> {
    match key {
        Key::ArrowRight => Some(InputSymbol::StepForward),
        Key::ArrowLeft => Some(InputSymbol::StepBackward),
        Key::ArrowUp => Some(InputSymbol::JumpForward),
        Key::ArrowDown => Some(InputSymbol::JumpBackward),
        Key::Enter => Some(InputSymbol::PlaceMark),
        Key::Space => Some(InputSymbol::ToggleSelection),
        Key::Escape => Some(InputSymbol::CancelSelection),
        _ => None,
    }
}

struct RebeatApp {
    selector: AudioSelector,
    engine: SegmentEngine,
    peaks: Vec<(f32, f32)>,
    duration: f64,
    signal_name: String,
    volume: f32,
}

impl RebeatApp {
    fn new(path: Option<PathBuf>) -> Self {
        let signal = match path {
            Some(path) => load_audio(&path).unwrap_or_else(|err| {
                log::error!("failed to load {}: {}, falling back", path.display(), err);
                click_track()
            }),
            None => click_track(),
        };
        Self::from_signal(signal)
    }

    fn from_signal(signal: LoadedSignal) -> Self {
        let LoadedSignal {
            samples,
            channels,
            sample_rate,
            name,
        } = signal;
        let frames = samples.len() / channels.max(1) as usize;
        let duration = frames as f64 / sample_rate as f64;

        let mut selector = AudioSelector::new(duration).expect("signal duration must be positive");
        selector.on_create_mark(|index, times| {
            log::info!("mark #{} created, all marks: {:?}", index, times);
        });
        selector.on_create_selection(|start, end| {
            log::info!("selection committed: [{:.3}, {:.3}]", start, end);
        });

        let peaks = build_peaks(&samples, channels, 2000);
        // Each segment is looped five times, the classic re-beat effect
        let engine = SegmentEngine::with_config(
            samples,
            channels,
            sample_rate,
            SegmentEngineConfig {
                repeats: 5,
                volume: 1.0,
            },
        );

        Self {
            selector,
            engine,
            peaks,
            duration,
            signal_name: name,
            volume: 1.0,
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Don't steal keys while a widget (slider, button) has focus
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::Key {
                key,
                pressed: true,
                ..
            } = event
            {
                match translate_key(key) {
                    Some(symbol) => self.selector.handle_input(symbol),
                    None => log::debug!("unmapped key: {:?}", key),
                }
            }
        }
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("audio", &["wav", "flac", "ogg", "mp3"])
                    .pick_file()
                {
                    match load_audio(&path) {
                        Ok(signal) => *self = Self::from_signal(signal),
                        Err(err) => log::error!("failed to load {}: {}", path.display(), err),
                    }
                }
            }
            if ui.button("Play").clicked() {
                self.engine
                    .play_marked(&self.selector.marks(), self.selector.duration());
            }
            if ui.button("Stop").clicked() {
                self.engine.stop();
            }
            if ui
                .add(egui::Slider::new(&mut self.volume, 0.0..=2.0).text("volume"))
                .changed()
            {
                self.engine.set_volume(self.volume);
            }
            ui.separator();
            ui.label(&self.signal_name);
        });
    }

    fn waveform_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let rect = response.rect;
        let duration = self.duration;
        let to_x = move |time: f64| rect.left() + (time / duration) as f32 * rect.width();

        painter.rect_filled(rect, 0.0, Color32::from_gray(24));

        // Committed selections, then the open candidate on top
        for (start, end) in self.selector.selections() {
            let span = Rect::from_min_max(
                Pos2::new(to_x(start), rect.top()),
                Pos2::new(to_x(end), rect.bottom()),
            );
            painter.rect_filled(span, 0.0, Color32::from_rgba_unmultiplied(120, 170, 255, 40));
        }
        if let Some((anchor, head)) = self.selector.candidate() {
            let (lo, hi) = if anchor <= head {
                (anchor, head)
            } else {
                (head, anchor)
            };
            let span = Rect::from_min_max(
                Pos2::new(to_x(lo), rect.top()),
                Pos2::new(to_x(hi), rect.bottom()),
            );
            painter.rect_filled(span, 0.0, Color32::from_rgba_unmultiplied(255, 210, 120, 40));
        }

        // Waveform peaks
        let mid = rect.center().y;
        let half = rect.height() * 0.45;
        let count = self.peaks.len();
        for (i, &(lo, hi)) in self.peaks.iter().enumerate() {
            let x = rect.left() + (i as f32 + 0.5) / count as f32 * rect.width();
            painter.line_segment(
                [Pos2::new(x, mid - hi * half), Pos2::new(x, mid - lo * half)],
                Stroke::new(1.0, Color32::from_gray(180)),
            );
        }

        // Marks
        for time in self.selector.marks() {
            let x = to_x(time);
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, Color32::from_rgb(90, 160, 255)),
            );
        }

        // Cursor
        let x = to_x(self.selector.cursor());
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.5, Color32::from_rgb(255, 90, 90)),
        );

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let time = ((pos.x - rect.left()) / rect.width()) as f64 * self.duration;
                self.selector.handle_input(InputSymbol::SeekTo(time));
            }
        }
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("cursor {}", format_time(self.selector.cursor())));
            ui.separator();
            ui.label(format!("{} marks", self.selector.marks().len()));
            ui.separator();
            ui.label(format!("{} selections", self.selector.selections().len()));
            if self.selector.is_selecting() {
                ui.separator();
                ui.label("selecting…");
            }
            ui.separator();
            ui.label("←/→ step  ↑/↓ jump  Enter mark  Space selection  Esc cancel");
        });
    }
}

impl eframe::App for RebeatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar_ui(ui);
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.status_ui(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.waveform_ui(ui);
        });
    }
}
