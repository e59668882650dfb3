// ============================================================================
// WINDOW RUNTIME
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::compose::{compose_header, GaugeView};
use crate::config::EditField;
use crate::error::GaugeError;
use crate::host::{LogNotifier, MemorySignalFeed, ProjectStore, SignalDefinition};
use crate::render::{load_font, Canvas, Scene};

/// Messages a running gauge window accepts from other threads.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    /// New reading for a signal.
    Sample { qualified_name: String, value: f64 },
    SelectSignal(SignalDefinition),
    /// Opens the configuration dialog, types each value into its field and
    /// saves.
    Configure(Vec<(EditField, String)>),
}

/// Redraw interval for `max_framerate`, which is floored at one frame per
/// second.
fn frame_interval(max_framerate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / max_framerate.max(1.0))
}

impl<S: ProjectStore> GaugeView<S, MemorySignalFeed> {
    pub fn show(&mut self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    pub fn show_with_commands(&mut self, receiver: Receiver<GaugeCommand>) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }

    /// Applies one command. Failures are logged; the gauge keeps running.
    pub fn handle_command(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::Sample {
                qualified_name,
                value,
            } => self.feed().publish(&qualified_name, value),
            GaugeCommand::SelectSignal(signal) => {
                if let Err(err) = self.apply_signal(&signal) {
                    error!(error = %err, "signal selection failed");
                }
            }
            GaugeCommand::Configure(edits) => {
                self.open_config();
                for (field, input) in edits {
                    let result = self
                        .dialog_mut()
                        .buffer_mut()
                        .and_then(|buffer| buffer.set_text(field, &input));
                    if let Err(err) = result {
                        warn!(field = field.label(), error = %err, "edit rejected");
                    }
                }
                if let Err(err) = self.save_config(&LogNotifier) {
                    warn!(error = %err, "configuration not saved");
                }
            }
        }
    }

    /// Frame for a `width` x `height` framebuffer. A degenerate domain
    /// leaves only the background and header.
    fn frame_scene(&self, width: usize, height: usize, degenerate_logged: &mut bool) -> Scene {
        match self.render(width as f64, height as f64) {
            Ok(scene) => {
                *degenerate_logged = false;
                scene
            }
            Err(err) => {
                if !*degenerate_logged {
                    error!(instance_id = self.instance_id(), error = %err, "gauge not drawable");
                    *degenerate_logged = true;
                }
                compose_header(&self.configuration(), width as f64, self.style())
            }
        }
    }

    fn run_window(&mut self, receiver: Option<Receiver<GaugeCommand>>) -> Result<(), GaugeError> {
        let font: Option<Font<'static>> = match &self.style().font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                warn!("no font configured; text will not be drawn");
                None
            }
        };
        let title = self
            .configuration()
            .signal_name
            .unwrap_or_else(|| "Signal Gauge".to_string());

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(LogicalSize::new(
                self.style().window_width as f64,
                self.style().window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = frame_interval(self.style().max_framerate);
        let mut last_frame = Instant::now();
        let mut degenerate_logged = false;
        info!(instance_id = self.instance_id(), %title, width = fb_width, height = fb_height, "gauge window started");

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            error!(error = %err, "framebuffer resize failed");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            error!(error = %err, "surface resize failed");
                        }
                        debug!(width = fb_width, height = fb_height, "window resized");
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = &receiver {
                            while let Ok(command) = receiver.try_recv() {
                                self.handle_command(command);
                            }
                        }

                        let scene = self.frame_scene(fb_width, fb_height, &mut degenerate_logged);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        scene.render(&mut canvas, font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!(error = %err, "render failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
