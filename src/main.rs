mod clipboard;
mod config;
mod font;
mod format;
mod graphics;
mod grid;
mod input;
mod layout;
mod session;
mod shape;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use winit::{
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::config::WidgetConfig;
use crate::format::{pattern_string, Readout};
use crate::graphics::{DotStyle, GraphicsRenderer};
use crate::grid::Grid;
use crate::input::{InputAction, InputHandler};
use crate::layout::GridLayout;
use crate::session::{GestureSession, Phase, SessionEvent};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 640;

/// How long the readout stays in its "copied" state.
const COPIED_FLASH: Duration = Duration::from_secs(2);
/// Selection flash decay time when the animation is enabled.
const PULSE_DURATION: Duration = Duration::from_millis(350);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config = WidgetConfig::load();
    config.apply_args(std::env::args().skip(1));

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Tracelock")
        .with_inner_size(winit::dpi::LogicalSize::new(WIDTH, HEIGHT))
        .with_resizable(true)
        .build(&event_loop)?;

    let mut graphics = GraphicsRenderer::new(&window, WIDTH, HEIGHT)?;
    let mut input_handler = InputHandler::new();

    let mut grid = Grid::new(config.rows, config.shape);
    let mut layout = GridLayout::new(&grid, WIDTH, HEIGHT);
    let mut session = GestureSession::new();
    let mut readout = Readout::new();

    // Surface-space cursor position, updated on every move event.
    let mut cursor: (f32, f32) = (0.0, 0.0);
    let mut pulses: HashMap<(u32, u32), Instant> = HashMap::new();
    let mut copied_at: Option<Instant> = None;
    let mut redraw_requested = true;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    graphics.resize(size.width, size.height);
                    redraw_requested = true;
                }
                WindowEvent::KeyboardInput { input, .. } => {
                    let action = input_handler.handle_keyboard_input(&input);
                    let mut config_changed = false;
                    match action {
                        InputAction::SetRows(rows) => {
                            config.set_rows(rows);
                            config_changed = true;
                        }
                        InputAction::AdjustRows(delta) => {
                            config.adjust_rows(delta);
                            config_changed = true;
                        }
                        InputAction::CycleShape(step) => {
                            config.shape = if step >= 0 {
                                config.shape.next()
                            } else {
                                config.shape.prev()
                            };
                            config_changed = true;
                        }
                        InputAction::ToggleAnimation => {
                            config.animate = !config.animate;
                            if !config.animate {
                                pulses.clear();
                            }
                            if let Err(err) = config.save() {
                                log::error!("Failed to save settings: {}", err);
                            }
                        }
                        InputAction::CopyResult => {
                            copy_readout(&readout, &mut copied_at);
                            redraw_requested = true;
                        }
                        InputAction::ClearPattern => {
                            session.reset();
                            graphics.clear_lines();
                            readout.clear();
                            pulses.clear();
                            copied_at = None;
                            redraw_requested = true;
                        }
                        InputAction::None => {}
                    }
                    if config_changed {
                        // A new grid invalidates any in-progress gesture.
                        grid = Grid::new(config.rows, config.shape);
                        layout = GridLayout::new(&grid, WIDTH, HEIGHT);
                        session.reset();
                        graphics.clear_lines();
                        readout.clear();
                        pulses.clear();
                        copied_at = None;
                        if let Err(err) = config.save() {
                            log::error!("Failed to save settings: {}", err);
                        }
                        redraw_requested = true;
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = graphics.window_to_surface(position.x as f32, position.y as f32);
                    if session.phase() == Phase::Drawing {
                        let hit = layout.hit_test(&grid, cursor.0, cursor.1);
                        match session.pointer_move(hit) {
                            SessionEvent::Extended { from, to } => {
                                graphics.draw_segment(
                                    layout.dot_center(&grid, from),
                                    layout.dot_center(&grid, to),
                                );
                                readout.push_cell(to);
                                if config.animate {
                                    pulses.insert((to.row, to.col), Instant::now());
                                }
                                redraw_requested = true;
                            }
                            SessionEvent::Started(cell) => {
                                readout.push_cell(cell);
                                redraw_requested = true;
                            }
                            _ => {}
                        }
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if button != MouseButton::Left {
                        return;
                    }
                    match state {
                        ElementState::Pressed => {
                            if graphics.in_readout_band(cursor.0, cursor.1) {
                                copy_readout(&readout, &mut copied_at);
                                redraw_requested = true;
                                return;
                            }
                            let hit = layout.hit_test(&grid, cursor.0, cursor.1);
                            if let SessionEvent::Started(cell) = session.pointer_down(hit) {
                                // Clean slate before the new gesture shows up.
                                graphics.clear_lines();
                                readout.clear();
                                pulses.clear();
                                copied_at = None;
                                readout.push_cell(cell);
                                if config.animate {
                                    pulses.insert((cell.row, cell.col), Instant::now());
                                }
                                redraw_requested = true;
                            }
                        }
                        ElementState::Released => {
                            if let SessionEvent::Completed(cells) = session.pointer_up() {
                                log::info!("Pattern complete: {}", pattern_string(&cells));
                                redraw_requested = true;
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();

                if let Some(at) = copied_at {
                    if now.duration_since(at) >= COPIED_FLASH {
                        copied_at = None;
                    }
                    redraw_requested = true;
                }
                if !pulses.is_empty() {
                    pulses.retain(|_, at| now.duration_since(*at) < PULSE_DURATION);
                    redraw_requested = true;
                }

                if redraw_requested {
                    let styles: Vec<DotStyle> = grid
                        .cells()
                        .iter()
                        .map(|&cell| DotStyle {
                            selected: session.is_selected(cell),
                            pulse: pulse_intensity(&pulses, (cell.row, cell.col), now),
                        })
                        .collect();
                    graphics.render(&grid, &layout, &styles, readout.text(), copied_at.is_some());
                    if let Err(err) = graphics.present() {
                        log::error!("Render error: {}", err);
                        *control_flow = ControlFlow::Exit;
                    }
                    redraw_requested = false;
                }
            }
            _ => {}
        }
    });
}

/// Copies the readout text and arms the transient "copied" acknowledgment.
fn copy_readout(readout: &Readout, copied_at: &mut Option<Instant>) {
    if readout.is_empty() {
        return;
    }
    match clipboard::copy_text(readout.text()) {
        Ok(program) => {
            log::info!("Pattern copied via {}: {}", program, readout.text());
            *copied_at = Some(Instant::now());
        }
        Err(err) => {
            log::warn!("Copy failed: {}", err);
        }
    }
}

fn pulse_intensity(pulses: &HashMap<(u32, u32), Instant>, key: (u32, u32), now: Instant) -> f32 {
    match pulses.get(&key) {
        Some(&at) => {
            let elapsed = now.duration_since(at).as_secs_f32();
            (1.0 - elapsed / PULSE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}
