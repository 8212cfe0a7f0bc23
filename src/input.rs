use crate::form::Edit;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which scene currently owns the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SceneKind {
    Form,
    Dialog,
    Figure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    Edit(Edit),
    Submit,
    Dismiss,
    ZoomIn,
    ZoomOut,
    Pan(i8, i8),
    ResetView,
    CloseFigure,
}

pub(crate) fn map_key(scene: SceneKind, k: KeyEvent) -> Option<Action> {
    if k.kind == KeyEventKind::Release {
        return None;
    }

    // Global
    if matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && k.modifiers.contains(KeyModifiers::CONTROL)
    {
        return Some(Action::Quit);
    }

    match scene {
        SceneKind::Form => match k.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
            KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrev),
            KeyCode::Backspace => Some(Action::Edit(Edit::Backspace)),
            KeyCode::Delete => Some(Action::Edit(Edit::Delete)),
            KeyCode::Left => Some(Action::Edit(Edit::Left)),
            KeyCode::Right => Some(Action::Edit(Edit::Right)),
            KeyCode::Home => Some(Action::Edit(Edit::Home)),
            KeyCode::End => Some(Action::Edit(Edit::End)),
            KeyCode::Char(ch)
                if !ch.is_control() && !k.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Action::Edit(Edit::Insert(ch)))
            }
            _ => None,
        },
        SceneKind::Dialog => match k.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::Dismiss),
            _ => None,
        },
        SceneKind::Figure => match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::CloseFigure),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ZoomIn),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::ZoomOut),
            KeyCode::Left => Some(Action::Pan(-1, 0)),
            KeyCode::Right => Some(Action::Pan(1, 0)),
            KeyCode::Up => Some(Action::Pan(0, 1)),
            KeyCode::Down => Some(Action::Pan(0, -1)),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::ResetView),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let k = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for scene in [SceneKind::Form, SceneKind::Dialog, SceneKind::Figure] {
            assert_eq!(map_key(scene, k), Some(Action::Quit));
        }
    }

    #[test]
    fn form_keys() {
        assert_eq!(map_key(SceneKind::Form, key(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(map_key(SceneKind::Form, key(KeyCode::Tab)), Some(Action::FocusNext));
        assert_eq!(map_key(SceneKind::Form, key(KeyCode::BackTab)), Some(Action::FocusPrev));
        assert_eq!(
            map_key(SceneKind::Form, key(KeyCode::Char('7'))),
            Some(Action::Edit(Edit::Insert('7')))
        );
        // letters are typed, not shortcuts: validation decides
        assert_eq!(
            map_key(SceneKind::Form, key(KeyCode::Char('q'))),
            Some(Action::Edit(Edit::Insert('q')))
        );
        assert_eq!(map_key(SceneKind::Form, key(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn dialog_only_dismisses() {
        assert_eq!(map_key(SceneKind::Dialog, key(KeyCode::Enter)), Some(Action::Dismiss));
        assert_eq!(map_key(SceneKind::Dialog, key(KeyCode::Esc)), Some(Action::Dismiss));
        assert_eq!(map_key(SceneKind::Dialog, key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(SceneKind::Dialog, key(KeyCode::Tab)), None);
    }

    #[test]
    fn figure_keys() {
        assert_eq!(map_key(SceneKind::Figure, key(KeyCode::Char('q'))), Some(Action::CloseFigure));
        assert_eq!(map_key(SceneKind::Figure, key(KeyCode::Char('+'))), Some(Action::ZoomIn));
        assert_eq!(map_key(SceneKind::Figure, key(KeyCode::Up)), Some(Action::Pan(0, 1)));
        assert_eq!(map_key(SceneKind::Figure, key(KeyCode::Char('r'))), Some(Action::ResetView));
    }

    #[test]
    fn releases_are_ignored() {
        let mut k = key(KeyCode::Enter);
        k.kind = KeyEventKind::Release;
        assert_eq!(map_key(SceneKind::Form, k), None);
    }
}
