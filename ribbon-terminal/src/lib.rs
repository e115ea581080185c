/// Terminal front end for the ribbon viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Vector3;
use ribbon_core::{
    ControlState, RenderConfig, RenderError, RenderSession, SurfaceVariant, UserPointKey,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiContext;

/// Rotation applied per arrow key press (radians)
const KEY_ROTATION: f32 = 0.1;

/// Rotation angle change per bracket key press (degrees)
const ANGLE_STEP: f32 = 5.0;

const HELP: &str = "drag/arrows=rotate f=detail wasd=point []=angle r=reset q=quit";

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    ToggleDetailed,
    MoveUserPoint(UserPointKey),
    Rotate { axis: [f32; 3], angle: f32 },
    TurnTexture(f32),
    ResetView,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('f') => Some(Self::ToggleDetailed),
            KeyCode::Char('r') => Some(Self::ResetView),
            KeyCode::Char('[') => Some(Self::TurnTexture(-ANGLE_STEP)),
            KeyCode::Char(']') => Some(Self::TurnTexture(ANGLE_STEP)),
            KeyCode::Up => Some(Self::Rotate { axis: [1.0, 0.0, 0.0], angle: -KEY_ROTATION }),
            KeyCode::Down => Some(Self::Rotate { axis: [1.0, 0.0, 0.0], angle: KEY_ROTATION }),
            KeyCode::Left => Some(Self::Rotate { axis: [0.0, 1.0, 0.0], angle: -KEY_ROTATION }),
            KeyCode::Right => Some(Self::Rotate { axis: [0.0, 1.0, 0.0], angle: KEY_ROTATION }),
            KeyCode::Char(c) => {
                UserPointKey::from_key(c.encode_utf8(&mut [0; 4])).map(Self::MoveUserPoint)
            }
            _ => None,
        }
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    session: RenderSession<AsciiContext>,
    controls: ControlState,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(
        config: RenderConfig,
        variant: SurfaceVariant,
        controls: ControlState,
    ) -> Result<Self, RenderError> {
        let (width, height) = terminal::size()
            .map_err(|e| RenderError::NoContext(format!("terminal size unavailable: {e}")))?;
        Self::with_size(config, variant, controls, width as usize, height as usize)
    }

    /// Build an app drawing into a grid of the given size
    pub fn with_size(
        config: RenderConfig,
        variant: SurfaceVariant,
        controls: ControlState,
        width: usize,
        height: usize,
    ) -> Result<Self, RenderError> {
        // Leave the top row for the status line
        let context = AsciiContext::new(width, height.saturating_sub(1));
        let session = RenderSession::new(context, config, variant, &controls)?;

        Ok(Self {
            session,
            controls,
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn session(&self) -> &RenderSession<AsciiContext> {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Render only when something changed
            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the controls and the trackball
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = Action::from_key(code) {
                    self.apply(action);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.session
                    .context_mut()
                    .resize(width as usize, (height as usize).saturating_sub(1));
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (width, height) = {
            let context = self.session.context();
            (context.width() as f32, context.height() as f32)
        };
        // Status line occupies row 0
        let x = mouse.column as f32;
        let y = mouse.row as f32 - 1.0;
        let rotator = self.session.rotator_mut();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => rotator.begin_drag(x, y, width, height),
            MouseEventKind::Drag(MouseButton::Left) => {
                if rotator.drag_to(x, y, width, height) {
                    self.dirty = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => rotator.end_drag(),
            _ => {}
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleDetailed => {
                self.controls.detailed = !self.controls.detailed;
                self.session.regenerate(&self.controls);
            }
            Action::MoveUserPoint(key) => self.controls.apply_key(key),
            Action::Rotate { axis, angle } => {
                self.session.rotator_mut().rotate(Vector3::from(axis), angle)
            }
            Action::TurnTexture(delta) => self.controls.rotation_angle += delta,
            Action::ResetView => self.session.rotator_mut().reset(),
        }
        self.dirty = true;
    }

    fn render(&mut self) -> io::Result<()> {
        self.session.draw(&self.controls);

        let mut stdout = stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            ResetColor,
            cursor::MoveTo(0, 1)
        )?;

        self.session.context().present(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let point = self.controls.user_point;
        format!(
            "Ribbon | {} vertices | {} | FPS: {:.1} | point ({}, {}) angle {}° | {}",
            self.session.vertex_count(),
            if self.controls.detailed { "fan" } else { "strips" },
            self.fps,
            point.x,
            point.y,
            self.controls.rotation_angle,
            HELP,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app(variant: SurfaceVariant) -> TerminalApp {
        TerminalApp::with_size(
            RenderConfig::default(),
            variant,
            ControlState::new([0.0, 10.0, 10.0]),
            80,
            41,
        )
        .unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(
            Action::from_key(KeyCode::Char('w')),
            Some(Action::MoveUserPoint(UserPointKey::Up))
        );
        assert_eq!(Action::from_key(KeyCode::Char(']')), Some(Action::TurnTexture(5.0)));
        assert_eq!(Action::from_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_toggle_detailed_regenerates() {
        let mut app = app(SurfaceVariant::Shaded);
        assert_eq!(app.session().vertex_count(), 360 * 51);

        app.handle_event(key(KeyCode::Char('f')));
        assert!(app.controls().detailed);
        assert_eq!(app.session().vertex_count(), 1800 * 255);
    }

    #[test]
    fn test_user_point_and_quit() {
        let mut app = app(SurfaceVariant::Textured);
        app.handle_event(key(KeyCode::Char('d')));
        app.handle_event(key(KeyCode::Char('s')));
        assert_eq!(app.controls().user_point, nalgebra::Point2::new(1.0, -1.0));

        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_drag_rotates() {
        let mut app = app(SurfaceVariant::Shaded);
        let before = app.session().model_view_projection();

        let mouse = |kind, column, row| {
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 21));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 21));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 50, 21));

        assert!((app.session().model_view_projection() - before).norm() > 1e-3);
    }
}
