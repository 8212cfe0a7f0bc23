use crate::config::RenderConfig;
use crate::form::{self, Form};
use crate::input::{map_key, Action, SceneKind};
use crate::model::FieldId;
use crate::plot::{draw_figure, Figure, View};
use crate::render::{draw_center_box, draw_form, Terminal};
use crossterm::event::{self, Event};

const INPUT_ERROR_TITLE: &str = "Input error";

pub(crate) enum Scene {
    Form,
    Dialog { title: String, body: String },
    /// The figure lives only while it is on screen.
    Figure { figure: Figure, view: View },
}

/// Everything the UI knows besides the terminal itself.
pub(crate) struct Session {
    pub(crate) form: Form,
    pub(crate) scene: Scene,
    /// Fields rejected by the last submission.
    pub(crate) invalid: Vec<FieldId>,
    pub(crate) sample_count: usize,
    pub(crate) should_quit: bool,
}

impl Session {
    pub(crate) fn new(sample_count: usize) -> Self {
        Self {
            form: Form::default(),
            scene: Scene::Form,
            invalid: Vec::new(),
            sample_count,
            should_quit: false,
        }
    }

    pub(crate) fn scene_kind(&self) -> SceneKind {
        match self.scene {
            Scene::Form => SceneKind::Form,
            Scene::Dialog { .. } => SceneKind::Dialog,
            Scene::Figure { .. } => SceneKind::Figure,
        }
    }

    fn submit(&mut self) {
        match form::submit(self.form.snapshot(), self.sample_count) {
            Ok(figure) => {
                self.invalid.clear();
                self.scene = Scene::Figure {
                    figure,
                    view: View::default(),
                };
            }
            Err(e) => {
                self.invalid = e.fields().collect();
                self.scene = Scene::Dialog {
                    title: INPUT_ERROR_TITLE.to_string(),
                    body: e.dialog_message(),
                };
            }
        }
    }

    pub(crate) fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusNext => self.form.focus_next(),
            Action::FocusPrev => self.form.focus_prev(),
            Action::Edit(e) => self.form.edit(e),
            Action::Submit => self.submit(),
            Action::Dismiss | Action::CloseFigure => self.scene = Scene::Form,
            Action::ZoomIn | Action::ZoomOut | Action::Pan(..) | Action::ResetView => {
                if let Scene::Figure { view, .. } = &mut self.scene {
                    match action {
                        Action::ZoomIn => view.zoom_in(),
                        Action::ZoomOut => view.zoom_out(),
                        Action::Pan(dx, dy) => view.pan_by(dx, dy),
                        _ => view.reset(),
                    }
                }
            }
        }
    }
}

pub(crate) struct App {
    term: Terminal,
    session: Session,
}

impl App {
    fn run(&mut self) -> anyhow::Result<()> {
        self.render_frame()?;

        // event-driven: block until the user does something, then redraw
        while !self.session.should_quit {
            match event::read()? {
                Event::Key(k) => {
                    if let Some(action) = map_key(self.session.scene_kind(), k) {
                        tracing::trace!(?action, "key");
                        self.session.apply(action);
                    }
                }
                Event::Resize(..) => {
                    self.term.resize_if_needed()?;
                }
                _ => continue,
            }
            if !self.session.should_quit {
                self.render_frame()?;
            }
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let Terminal {
            cur,
            canvas,
            config,
            ..
        } = &mut self.term;
        let s = &self.session;

        match &s.scene {
            Scene::Form => draw_form(cur, &s.form, &s.invalid),
            Scene::Dialog { title, body } => {
                draw_form(cur, &s.form, &s.invalid);
                draw_center_box(cur, title, body);
            }
            Scene::Figure { figure, view } => draw_figure(cur, canvas, figure, *view, *config),
        }

        self.term.present(true)
    }
}

pub(crate) fn run(config: RenderConfig, sample_count: usize) -> anyhow::Result<()> {
    tracing::info!(?config, samples = sample_count, "starting");
    let term = Terminal::begin(config)?;
    let mut app = App {
        term,
        session: Session::new(sample_count),
    };
    let res = app.run();
    if let Err(e) = &res {
        tracing::error!("ui loop failed: {e:#}");
    }
    let res = settle_exit(res, app.term.end());
    tracing::info!("exiting");
    res
}

/// The loop's own error wins over a failed terminal restore; the latter is only logged then.
fn settle_exit(ui: anyhow::Result<()>, restore: anyhow::Result<()>) -> anyhow::Result<()> {
    match (ui, restore) {
        (Err(e), Err(r)) => {
            tracing::error!("terminal restore failed: {r:#}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restore) => restore,
    }
}
